//! Interactive menu shell
//!
//! The default experience when the binary is started with no subcommand.
//! Every action traps its error, shows it red, and drops back to the menu.

use crate::buildsys::BuildSystem;
use crate::config::{Config, Paths};
use crate::dotfiles::DotfilesManager;
use crate::error::Result;
use crate::project::ProjectManager;
use crate::ssl::SslManager;
use crate::template::TemplateManager;
use crate::types::{CertKind, CertStatus, ProjectKind, ServiceKind};
use crate::versions::VersionManager;
use crate::wordpress::WordPressScaffold;
use crate::{output, utils};
use colored::Colorize;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use std::str::FromStr;

/// The interactive menu application
#[derive(Debug)]
pub struct Menu {
    paths: Paths,
    ssl: SslManager,
    templates: TemplateManager,
    versions: VersionManager,
    projects: ProjectManager,
    dotfiles: DotfilesManager,
    wordpress: WordPressScaffold,
}

impl Menu {
    /// Wire up every manager against the standard layout
    pub fn new(config: Config, paths: Paths) -> Result<Self> {
        Ok(Self {
            ssl: SslManager::new(config.clone(), paths.clone())?,
            templates: TemplateManager::new(&paths)?,
            versions: VersionManager::load(&paths)?,
            projects: ProjectManager::new(&paths),
            dotfiles: DotfilesManager::new(&config, &paths),
            wordpress: WordPressScaffold::new(&paths),
            paths,
        })
    }

    fn theme() -> ColorfulTheme {
        ColorfulTheme::default()
    }

    /// Run the main menu loop
    pub async fn run(&mut self) -> Result<()> {
        loop {
            output::heading("🚀 Development Environment Manager");

            let options = [
                "🆕 Create New Project",
                "📋 List Projects",
                "🐳 Manage Containers",
                "🌐 Manage Sites",
                "🔒 SSL Certificate Manager",
                "📦 Template Management",
                "🔧 Version Management",
                "📁 Dotfiles Management",
                "⚙️  Infrastructure",
                "❌ Exit",
            ];

            let choice = Select::with_theme(&Self::theme())
                .with_prompt("Choose an action")
                .items(&options)
                .default(0)
                .interact()?;

            let result = match choice {
                0 => self.new_project_wizard().await,
                1 => self.list_projects(),
                2 => self.manage_containers(),
                3 => self.manage_sites().await,
                4 => self.ssl_menu().await,
                5 => self.template_menu(),
                6 => self.versions_menu().await,
                7 => self.dotfiles_menu(),
                8 => self.infrastructure_menu(),
                _ => {
                    println!("{}", "Goodbye!".yellow());
                    return Ok(());
                }
            };

            if let Err(e) = result {
                output::failure(&e.to_string());
                output::pause();
            }
        }
    }

    /// Project creation wizard (also reachable as `devforge new`)
    pub async fn new_project_wizard(&mut self) -> Result<()> {
        output::heading("🆕 Create New Project");

        let kinds = ["website", "script", "wordpress"];
        let kind = Select::with_theme(&Self::theme())
            .with_prompt("Project type")
            .items(&kinds)
            .default(0)
            .interact()?;

        match kinds[kind] {
            "wordpress" => self.create_wordpress_project().await,
            other => {
                let kind = if other == "website" {
                    ProjectKind::Website
                } else {
                    ProjectKind::Script
                };
                self.create_template_project(kind).await
            }
        }
    }

    async fn create_wordpress_project(&mut self) -> Result<()> {
        let project_name: String = Input::with_theme(&Self::theme())
            .with_prompt("Project name")
            .interact_text()?;
        let domain: String = Input::with_theme(&Self::theme())
            .with_prompt("Domain name (e.g., mysite.com)")
            .interact_text()?;
        let ssl_enabled = Confirm::with_theme(&Self::theme())
            .with_prompt("Enable SSL certificate?")
            .default(true)
            .interact()?;

        println!("\n{}", "WordPress Project Summary:".cyan());
        println!("• Name: {}", project_name);
        println!("• Domain: {}", domain);
        println!("• SSL: {}", if ssl_enabled { "Enabled" } else { "Disabled" });

        if Confirm::with_theme(&Self::theme())
            .with_prompt("Create WordPress project?")
            .default(true)
            .interact()?
        {
            self.wordpress
                .create(&project_name, &domain, ssl_enabled, &self.ssl)
                .await?;
            output::success("WordPress project created successfully!");
        }

        output::pause();
        Ok(())
    }

    async fn create_template_project(&mut self, kind: ProjectKind) -> Result<()> {
        let templates = self.templates.discover()?;
        if templates.is_empty() {
            output::warn(&format!(
                "No templates found in {}",
                self.paths.templates_dir().display()
            ));
            output::pause();
            return Ok(());
        }

        let names: Vec<&String> = templates.keys().collect();
        let template_idx = Select::with_theme(&Self::theme())
            .with_prompt("Template")
            .items(&names)
            .default(0)
            .interact()?;
        let template_name = names[template_idx].clone();

        let project_name: String = Input::with_theme(&Self::theme())
            .with_prompt("Project name")
            .interact_text()?;

        let domain = if kind == ProjectKind::Website {
            let domain: String = Input::with_theme(&Self::theme())
                .with_prompt("Domain name (e.g., example.com)")
                .default(format!("{}.local", project_name))
                .interact_text()?;
            Some(domain)
        } else {
            None
        };

        let version_specs = self.select_versions(&templates[&template_name].tech_stack)?;

        let ssl_enabled = match &domain {
            Some(_) => Confirm::with_theme(&Self::theme())
                .with_prompt("Enable SSL certificate?")
                .default(true)
                .interact()?,
            None => false,
        };

        let path = self.templates.create_project(
            &template_name,
            &project_name,
            domain.as_deref(),
            &version_specs,
        )?;
        output::success(&format!("Project {} created successfully!", project_name));
        output::info(&format!("Location: {}", path.display()));

        self.dotfiles.write_project_zshrc(&path)?;

        if ssl_enabled {
            if let Some(domain) = &domain {
                self.ssl
                    .add(domain, CertKind::Letsencrypt, ServiceKind::Website, None)
                    .await?;
            }
        }

        output::pause();
        Ok(())
    }

    fn select_versions(&self, tech_stack: &[String]) -> Result<Vec<(String, String)>> {
        let mut specs = Vec::new();

        for tool in tech_stack {
            let tool = tool.to_lowercase();
            let available = self.versions.available_versions(&tool);
            if available.is_empty() {
                continue;
            }

            let default_version = self.versions.default_version(&tool);
            let default_idx = available
                .iter()
                .position(|v| v == &default_version)
                .unwrap_or(0);

            let idx = Select::with_theme(&Self::theme())
                .with_prompt(format!("{} version", tool))
                .items(&available)
                .default(default_idx)
                .interact()?;
            specs.push((tool, available[idx].clone()));
        }

        Ok(specs)
    }

    /// Overview of all discovered projects
    pub fn list_projects(&self) -> Result<()> {
        output::heading("📋 Project Overview");

        let projects = self.projects.list()?;

        println!("{}", "📝 Script Projects:".cyan());
        let scripts: Vec<Vec<String>> = projects
            .iter()
            .filter(|p| p.kind == ProjectKind::Script)
            .map(|p| {
                vec![
                    p.name.clone(),
                    output::project_status_cell(self.projects.status(p)),
                    p.path.display().to_string(),
                ]
            })
            .collect();
        output::table(&["Name", "Status", "Path"], &scripts);

        println!("\n{}", "🌐 Website Projects:".cyan());
        let sites: Vec<Vec<String>> = projects
            .iter()
            .filter(|p| p.kind != ProjectKind::Script)
            .map(|p| {
                vec![
                    p.name.clone(),
                    output::project_status_cell(self.projects.status(p)),
                    p.path.display().to_string(),
                ]
            })
            .collect();
        output::table(&["Domain", "Status", "Path"], &sites);

        output::pause();
        Ok(())
    }

    fn manage_containers(&mut self) -> Result<()> {
        loop {
            output::heading("🐳 Container Management");

            let projects = self.projects.list()?;
            if projects.is_empty() {
                output::warn("No projects found");
            } else {
                let rows: Vec<Vec<String>> = projects
                    .iter()
                    .map(|p| {
                        vec![
                            p.name.clone(),
                            p.kind.to_string(),
                            output::project_status_cell(self.projects.status(p)),
                        ]
                    })
                    .collect();
                output::table(&["Name", "Type", "Status"], &rows);
                println!();
            }

            let actions = [
                "Start project",
                "Stop project",
                "Restart project",
                "View logs",
                "Open shell",
                "Run build target",
                "Stop all containers",
                "Back to main menu",
            ];
            let choice = Select::with_theme(&Self::theme())
                .with_prompt("Choose action")
                .items(&actions)
                .default(0)
                .interact()?;

            let result = match choice {
                0 => self.with_selected_project(|m, p| m.projects.start(p)),
                1 => self.with_selected_project(|m, p| m.projects.stop(p)),
                2 => self.with_selected_project(|m, p| m.projects.restart(p)),
                3 => self.with_selected_project(|m, p| m.projects.logs(p, true)),
                4 => self.with_selected_project(|m, p| m.projects.shell(p)),
                5 => self.with_selected_project(|_m, p| BuildSystem::load(&p.path)?.run("dev")),
                6 => {
                    let stopped = self.stop_all_projects()?;
                    output::success(&format!("Stopped {} projects", stopped));
                    Ok(())
                }
                _ => break,
            };

            if let Err(e) = result {
                output::failure(&e.to_string());
            }
            output::pause();
        }
        Ok(())
    }

    fn with_selected_project<F>(&mut self, action: F) -> Result<()>
    where
        F: FnOnce(&mut Self, &crate::types::ProjectInfo) -> Result<()>,
    {
        let projects = self.projects.list()?;
        if projects.is_empty() {
            output::warn("No projects found");
            return Ok(());
        }

        let labels: Vec<String> = projects
            .iter()
            .map(|p| format!("{} ({})", p.name, p.kind))
            .collect();
        let idx = Select::with_theme(&Self::theme())
            .with_prompt("Select project")
            .items(&labels)
            .default(0)
            .interact()?;

        let project = projects[idx].clone();
        action(self, &project)
    }

    async fn manage_sites(&mut self) -> Result<()> {
        output::heading("🌐 Website Management");

        let actions = [
            "List websites",
            "SSL certificates",
            "Back to main menu",
        ];
        let choice = Select::with_theme(&Self::theme())
            .with_prompt("Choose action")
            .items(&actions)
            .default(0)
            .interact()?;

        match choice {
            0 => {
                let rows: Vec<Vec<String>> = self
                    .projects
                    .list()?
                    .into_iter()
                    .filter(|p| p.kind != ProjectKind::Script)
                    .map(|p| {
                        vec![
                            p.name.clone(),
                            output::project_status_cell(self.projects.status(&p)),
                            p.path.display().to_string(),
                        ]
                    })
                    .collect();
                output::table(&["Domain", "Status", "Path"], &rows);
                output::pause();
            }
            1 => self.ssl_menu().await?,
            _ => {}
        }
        Ok(())
    }

    /// SSL certificate menu (also reachable as `devforge ssl`)
    pub async fn ssl_menu(&mut self) -> Result<()> {
        loop {
            output::heading("🔒 SSL Certificate Manager");

            let certificates = self.ssl.certificates()?;
            if certificates.is_empty() {
                output::warn("No certificates configured");
            } else {
                let active = certificates.iter().filter(|c| c.status == CertStatus::Active).count();
                let pending = certificates.iter().filter(|c| c.status == CertStatus::Pending).count();
                let failed = certificates.iter().filter(|c| c.status == CertStatus::Failed).count();
                println!(
                    "{} | {} | {}\n",
                    format!("Active: {}", active).green(),
                    format!("Pending: {}", pending).yellow(),
                    format!("Failed: {}", failed).red(),
                );
            }

            let actions = [
                "Add new certificate",
                "List all certificates",
                "Renew certificates",
                "Delete certificate",
                "Check certificate status",
                "Configuration settings",
                "View renewal logs",
                "Back to main menu",
            ];
            let choice = Select::with_theme(&Self::theme())
                .with_prompt("Choose action")
                .items(&actions)
                .default(0)
                .interact()?;

            let result = match choice {
                0 => self.add_certificate_interactive().await,
                1 => self.list_certificates(),
                2 => self.renew_certificates_interactive().await,
                3 => self.delete_certificate_interactive(),
                4 => self.check_certificates().await,
                5 => self.ssl_configuration_menu(),
                6 => self.view_renewal_logs(),
                _ => break,
            };

            if let Err(e) = result {
                output::failure(&e.to_string());
                output::pause();
            }
        }
        Ok(())
    }

    async fn add_certificate_interactive(&mut self) -> Result<()> {
        output::heading("🆕 Add New Certificate");

        let domain: String = Input::with_theme(&Self::theme())
            .with_prompt("Domain name (e.g., example.com)")
            .interact_text()?;

        let kinds = ["letsencrypt", "self-signed"];
        let kind_idx = Select::with_theme(&Self::theme())
            .with_prompt("Certificate type")
            .items(&kinds)
            .default(0)
            .interact()?;
        let kind = CertKind::from_str(kinds[kind_idx])?;

        let services = ServiceKind::all();
        let service_idx = Select::with_theme(&Self::theme())
            .with_prompt("Service type")
            .items(&services.map(|s| s.to_string()))
            .default(0)
            .interact()?;
        let service = services[service_idx];

        let container_name = if service == ServiceKind::Docker {
            let name: String = Input::with_theme(&Self::theme())
                .with_prompt("Container name (optional)")
                .allow_empty(true)
                .interact_text()?;
            (!name.is_empty()).then_some(name)
        } else {
            None
        };

        println!("\n{}", "Certificate Details:".cyan());
        println!("Domain: {}", domain);
        println!("Type: {}", kind);
        println!("Service: {}", service);
        if let Some(container) = &container_name {
            println!("Container: {}", container);
        }

        if Confirm::with_theme(&Self::theme())
            .with_prompt("Add this certificate?")
            .default(true)
            .interact()?
        {
            match self
                .ssl
                .add(&domain, kind, service, container_name.as_deref())
                .await
            {
                Ok(()) => output::success(&format!("Certificate added for {}", domain)),
                Err(e) => output::failure(&format!("Failed to add certificate for {}: {}", domain, e)),
            }
        }

        output::pause();
        Ok(())
    }

    /// Certificate table (also reachable as `devforge ssl list`)
    pub fn list_certificates(&self) -> Result<()> {
        output::heading("📋 Certificate List");

        let certificates = self.ssl.certificates()?;
        if certificates.is_empty() {
            output::warn("No certificates found");
            output::pause();
            return Ok(());
        }

        let rows: Vec<Vec<String>> = certificates
            .iter()
            .map(|cert| {
                vec![
                    cert.domain.clone(),
                    cert.kind.to_string(),
                    output::cert_status_cell(cert.status),
                    cert.expiry_date.clone().unwrap_or_else(|| "Unknown".to_string()),
                    if cert.auto_renew { "yes" } else { "no" }.to_string(),
                    cert.service.to_string(),
                ]
            })
            .collect();
        output::table(
            &["Domain", "Type", "Status", "Expires", "Auto Renew", "Service"],
            &rows,
        );

        output::pause();
        Ok(())
    }

    async fn renew_certificates_interactive(&mut self) -> Result<()> {
        output::heading("🔄 Certificate Renewal");

        let renewable: Vec<_> = self
            .ssl
            .certificates()?
            .into_iter()
            .filter(|c| c.status == CertStatus::Active)
            .collect();

        if renewable.is_empty() {
            output::warn("No certificates available for renewal");
            output::pause();
            return Ok(());
        }

        println!("Found {} certificates that can be renewed:", renewable.len());
        for cert in &renewable {
            println!(
                "  • {} (expires: {})",
                cert.domain,
                cert.expiry_date.as_deref().unwrap_or("Unknown")
            );
        }

        if Confirm::with_theme(&Self::theme())
            .with_prompt("Renew all certificates?")
            .default(true)
            .interact()?
        {
            let results = self.ssl.renew_all().await?;
            let succeeded = results.iter().filter(|(_, ok)| *ok).count();
            output::success(&format!(
                "Successfully renewed {} out of {} certificates",
                succeeded,
                results.len()
            ));

            if succeeded < results.len() {
                println!("\n{}", "Failed renewals:".yellow());
                for (domain, ok) in &results {
                    if !ok {
                        println!("  • {}", domain);
                    }
                }
            }
        }

        output::pause();
        Ok(())
    }

    fn delete_certificate_interactive(&mut self) -> Result<()> {
        output::heading("🗑️ Delete Certificate");

        let certificates = self.ssl.certificates()?;
        if certificates.is_empty() {
            output::warn("No certificates to delete");
            output::pause();
            return Ok(());
        }

        let labels: Vec<String> = certificates
            .iter()
            .map(|c| format!("{} ({})", c.domain, c.status))
            .collect();
        let idx = Select::with_theme(&Self::theme())
            .with_prompt("Select certificate to delete")
            .items(&labels)
            .default(0)
            .interact()?;
        let domain = certificates[idx].domain.clone();

        println!(
            "\n{}",
            format!("⚠ Warning: This will delete the certificate for {}", domain).red()
        );

        if Confirm::with_theme(&Self::theme())
            .with_prompt("Are you sure you want to delete this certificate?")
            .default(false)
            .interact()?
        {
            self.ssl.delete(&domain)?;
            output::success(&format!("Certificate deleted for {}", domain));
        }

        output::pause();
        Ok(())
    }

    async fn check_certificates(&mut self) -> Result<()> {
        output::heading("🔍 Certificate Status Check");

        let changed = self.ssl.check_all().await?;
        if changed.is_empty() {
            output::success("Certificate status check completed, no changes");
        } else {
            output::success("Certificate status check completed");
            for (domain, status) in changed {
                println!("  • {} → {}", domain, output::cert_status_cell(status));
            }
        }

        output::pause();
        Ok(())
    }

    fn ssl_configuration_menu(&mut self) -> Result<()> {
        loop {
            output::heading("⚙️ SSL Manager Configuration");

            let config = self.ssl.config().clone();
            println!("{}", "Current Settings:".cyan());
            println!("Let's Encrypt Email: {}", config.letsencrypt.email);
            println!("Staging Mode: {}", config.letsencrypt.staging);
            println!("Renewal Days Before: {}", config.notifications.renewal_days_before);
            println!("Traefik Container: {}", config.docker.traefik_container);
            println!();

            let actions = [
                "Update Let's Encrypt email",
                "Toggle staging mode",
                "Set renewal notification days",
                "Update Docker container names",
                "Back to SSL menu",
            ];
            let choice = Select::with_theme(&Self::theme())
                .with_prompt("Choose action")
                .items(&actions)
                .default(0)
                .interact()?;

            let mut updated = config.clone();
            match choice {
                0 => {
                    updated.letsencrypt.email = Input::with_theme(&Self::theme())
                        .with_prompt("Enter Let's Encrypt email")
                        .default(config.letsencrypt.email.clone())
                        .interact_text()?;
                    self.ssl.update_config(updated)?;
                    output::success("Email updated successfully");
                }
                1 => {
                    updated.letsencrypt.staging = !config.letsencrypt.staging;
                    let state = if updated.letsencrypt.staging { "enabled" } else { "disabled" };
                    self.ssl.update_config(updated)?;
                    output::success(&format!("Staging mode {}", state));
                }
                2 => {
                    updated.notifications.renewal_days_before = Input::with_theme(&Self::theme())
                        .with_prompt("Days before expiry to renew")
                        .default(config.notifications.renewal_days_before)
                        .interact_text()?;
                    self.ssl.update_config(updated)?;
                    output::success("Renewal days updated");
                }
                3 => {
                    updated.docker.traefik_container = Input::with_theme(&Self::theme())
                        .with_prompt("Traefik container name")
                        .default(config.docker.traefik_container.clone())
                        .interact_text()?;
                    updated.docker.nginx_container = Input::with_theme(&Self::theme())
                        .with_prompt("Nginx container name")
                        .default(config.docker.nginx_container.clone())
                        .interact_text()?;
                    self.ssl.update_config(updated)?;
                    output::success("Container names updated");
                }
                _ => break,
            }

            output::pause();
        }
        Ok(())
    }

    /// Renewal-log table (also reachable as `devforge ssl logs`)
    pub fn view_renewal_logs(&self) -> Result<()> {
        output::heading("📜 Renewal Logs");

        let logs = self.ssl.recent_logs(50)?;
        if logs.is_empty() {
            output::warn("No logs found");
        } else {
            let rows: Vec<Vec<String>> = logs
                .iter()
                .map(|log| {
                    vec![
                        log.timestamp.clone(),
                        log.domain.clone(),
                        log.action.clone(),
                        log.status.clone(),
                        log.message.clone().unwrap_or_default(),
                    ]
                })
                .collect();
            output::table(&["Timestamp", "Domain", "Action", "Status", "Message"], &rows);
        }

        output::pause();
        Ok(())
    }

    /// Template listing and details
    pub fn template_menu(&mut self) -> Result<()> {
        loop {
            output::heading("📦 Template Management");

            let actions = ["List templates", "Template details", "Back to main menu"];
            let choice = Select::with_theme(&Self::theme())
                .with_prompt("Choose action")
                .items(&actions)
                .default(0)
                .interact()?;

            match choice {
                0 => {
                    self.list_templates()?;
                    output::pause();
                }
                1 => {
                    let templates = self.templates.discover()?;
                    if templates.is_empty() {
                        output::warn("No templates found");
                        output::pause();
                        continue;
                    }
                    let names: Vec<&String> = templates.keys().collect();
                    let idx = Select::with_theme(&Self::theme())
                        .with_prompt("Template")
                        .items(&names)
                        .default(0)
                        .interact()?;
                    let spec = &templates[names[idx]];

                    output::panel(
                        names[idx],
                        &format!(
                            "Description: {}
Tech Stack: {}
Features: {}
Overlay: {}
Ports: {}",
                            spec.description,
                            spec.tech_stack.join(", "),
                            spec.features.join(", "),
                            spec.base_overlay,
                            spec.ports.clone().unwrap_or_default().join(", "),
                        ),
                    );
                    output::pause();
                }
                _ => break,
            }
        }
        Ok(())
    }

    /// Template table (also reachable as `devforge template list`)
    pub fn list_templates(&self) -> Result<()> {
        let templates = self.templates.discover()?;
        let rows: Vec<Vec<String>> = templates
            .iter()
            .map(|(name, spec)| {
                vec![
                    name.clone(),
                    if spec.description.is_empty() {
                        "No description".to_string()
                    } else {
                        spec.description.clone()
                    },
                    spec.tech_stack.join(", "),
                    spec.features.join(", "),
                ]
            })
            .collect();
        output::table(&["Template", "Description", "Tech Stack", "Features"], &rows);
        Ok(())
    }

    /// Version management menu
    pub async fn versions_menu(&mut self) -> Result<()> {
        loop {
            output::heading("🔧 Version Management");

            let rows: Vec<Vec<String>> = self
                .versions
                .tools()
                .iter()
                .map(|tool| {
                    let available = self.versions.available_versions(tool);
                    let mut shown = available.iter().take(5).cloned().collect::<Vec<_>>().join(", ");
                    if available.len() > 5 {
                        shown.push_str("...");
                    }
                    vec![tool.clone(), self.versions.default_version(tool), shown]
                })
                .collect();
            output::table(&["Tool", "Default Version", "Available Versions"], &rows);
            println!();

            let actions = [
                "Set default version",
                "Check latest versions",
                "Generate Dockerfile",
                "Back to main menu",
            ];
            let choice = Select::with_theme(&Self::theme())
                .with_prompt("Choose action")
                .items(&actions)
                .default(0)
                .interact()?;

            match choice {
                0 => self.set_default_version_interactive()?,
                1 => self.check_latest_versions_interactive().await?,
                2 => self.generate_dockerfile_interactive()?,
                _ => break,
            }
        }
        Ok(())
    }

    fn set_default_version_interactive(&mut self) -> Result<()> {
        let tools = self.versions.tools();
        let tool_idx = Select::with_theme(&Self::theme())
            .with_prompt("Select tool")
            .items(&tools)
            .default(0)
            .interact()?;
        let tool = &tools[tool_idx];

        let available = self.versions.available_versions(tool);
        let current = self.versions.default_version(tool);
        let labels: Vec<String> = available
            .iter()
            .map(|v| {
                if v == &current {
                    format!("{} (current)", v)
                } else {
                    v.clone()
                }
            })
            .collect();
        let version_idx = Select::with_theme(&Self::theme())
            .with_prompt("Select version")
            .items(&labels)
            .default(0)
            .interact()?;

        self.versions
            .set_default_version(tool, &available[version_idx])?;
        output::success(&format!("Set {} default version to {}", tool, available[version_idx]));
        output::pause();
        Ok(())
    }

    async fn check_latest_versions_interactive(&mut self) -> Result<()> {
        output::info("Checking latest versions...");
        let latest = self.versions.check_latest_versions().await;

        if latest.is_empty() {
            output::warn("Could not fetch latest versions");
            output::pause();
            return Ok(());
        }

        let rows: Vec<Vec<String>> = latest
            .iter()
            .map(|(tool, version)| {
                let current = self.versions.default_version(tool);
                let update = if version != &current { "Yes" } else { "No" };
                vec![tool.clone(), current, version.clone(), update.to_string()]
            })
            .collect();
        output::table(
            &["Tool", "Current Default", "Latest Available", "Update Available"],
            &rows,
        );

        if Confirm::with_theme(&Self::theme())
            .with_prompt("Update defaults to latest versions?")
            .default(false)
            .interact()?
        {
            for (tool, version) in &latest {
                self.versions.set_default_version(tool, version)?;
            }
            output::success("Defaults updated to latest versions");
        }

        output::pause();
        Ok(())
    }

    fn generate_dockerfile_interactive(&mut self) -> Result<()> {
        let tools = ["php", "node", "python", "wordpress"];
        let tool_idx = Select::with_theme(&Self::theme())
            .with_prompt("Select tool")
            .items(&tools)
            .default(0)
            .interact()?;
        let tool = tools[tool_idx];

        let available = self.versions.available_versions(tool);
        let version_idx = Select::with_theme(&Self::theme())
            .with_prompt("Select version")
            .items(&available)
            .default(0)
            .interact()?;
        let version = &available[version_idx];

        let dockerfile = self.versions.generate_dockerfile(tool, version)?;

        let target: String = Input::with_theme(&Self::theme())
            .with_prompt("Write Dockerfile to")
            .default(
                self.paths
                    .docker_dir()
                    .join("overlays")
                    .join(tool)
                    .join("Dockerfile")
                    .display()
                    .to_string(),
            )
            .interact_text()?;

        let target = std::path::PathBuf::from(target);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&target, dockerfile)?;
        output::success(&format!("Dockerfile written to {}", target.display()));
        output::pause();
        Ok(())
    }

    /// Dotfiles menu
    pub fn dotfiles_menu(&mut self) -> Result<()> {
        output::heading("📁 Dotfiles Management");

        if self.dotfiles.is_present() {
            output::success("Dotfiles repository found");
            match self.dotfiles.is_clean() {
                Ok(true) => output::success("Repository is clean"),
                Ok(false) => output::warn("Local changes detected"),
                Err(_) => {}
            }
        } else {
            output::failure("Dotfiles repository not found");
        }
        println!();

        let actions = [
            "Sync from remote",
            "Install/Update dotfiles",
            "Push local changes",
            "View status",
            "Back to main menu",
        ];
        let choice = Select::with_theme(&Self::theme())
            .with_prompt("Choose action")
            .items(&actions)
            .default(0)
            .interact()?;

        match choice {
            0 => {
                self.dotfiles.sync()?;
                output::success("Dotfiles synced successfully!");
                if Confirm::with_theme(&Self::theme())
                    .with_prompt("Install/update dotfiles configuration?")
                    .default(true)
                    .interact()?
                {
                    self.dotfiles.install()?;
                }
            }
            1 => {
                self.dotfiles.install()?;
                output::success("Dotfiles installed successfully!");
                output::info("Restart your terminal or run 'source ~/.zshrc' to apply changes");
            }
            2 => {
                let message: String = Input::with_theme(&Self::theme())
                    .with_prompt("Commit message")
                    .default("Update dotfiles configuration".to_string())
                    .interact_text()?;
                if self.dotfiles.push(&message)? {
                    output::success("Changes pushed successfully!");
                } else {
                    output::warn("No changes to push");
                }
            }
            3 => println!("{}", self.dotfiles.status_report()?),
            _ => return Ok(()),
        }

        output::pause();
        Ok(())
    }

    /// Infrastructure menu
    pub fn infrastructure_menu(&mut self) -> Result<()> {
        output::heading("⚙️ Infrastructure Management");

        println!(
            "Status: {}\n",
            output::project_status_cell(self.projects.infrastructure_status())
        );

        let actions = [
            "Start infrastructure",
            "Stop infrastructure",
            "View status",
            "Back to main menu",
        ];
        let choice = Select::with_theme(&Self::theme())
            .with_prompt("Choose action")
            .items(&actions)
            .default(0)
            .interact()?;

        match choice {
            0 => self.projects.infrastructure_up()?,
            1 => {
                self.projects.infrastructure_down()?;
                output::success("Infrastructure stopped");
            }
            2 => println!(
                "Infrastructure: {}",
                output::project_status_cell(self.projects.infrastructure_status())
            ),
            _ => return Ok(()),
        }

        output::pause();
        Ok(())
    }

    /// Direct (non-interactive) project creation used by `devforge new`
    pub async fn create_project_direct(
        &mut self,
        template: &str,
        name: &str,
        domain: Option<&str>,
        version_specs: &[(String, String)],
    ) -> Result<()> {
        let path = self
            .templates
            .create_project(template, name, domain, version_specs)?;
        output::success(&format!("Project {} created successfully!", name));
        output::info(&format!("Location: {}", path.display()));
        self.dotfiles.write_project_zshrc(&path)?;
        Ok(())
    }

    /// Borrow the SSL manager for direct subcommands
    pub fn ssl_manager(&self) -> &SslManager {
        &self.ssl
    }

    /// Borrow the project manager for direct subcommands
    pub fn project_manager(&self) -> &ProjectManager {
        &self.projects
    }

    /// Borrow the version manager mutably for direct subcommands
    pub fn version_manager_mut(&mut self) -> &mut VersionManager {
        &mut self.versions
    }

    /// Borrow the dotfiles manager for direct subcommands
    pub fn dotfiles_manager(&self) -> &DotfilesManager {
        &self.dotfiles
    }

    /// Stop every project's containers, returning how many were stopped
    pub fn stop_all_projects(&self) -> Result<usize> {
        let mut stopped = 0;
        for project in self.projects.list()? {
            if utils::command_exists("docker") && self.projects.stop(&project).is_ok() {
                stopped += 1;
            }
        }
        Ok(stopped)
    }
}
