// DevForge: Interactive manager for Docker-based development environments
// Copyright (c) 2024 DevForge Core Team

use clap::Parser;
use colored::Colorize;
use devforge::{
    buildsys::BuildSystem,
    config::{Config, Paths},
    dotfiles::DotfilesManager,
    error::Result,
    menu::Menu,
    output,
    project::ProjectManager,
    server::ServerSetup,
    ssl::SslManager,
    template::TemplateManager,
    types::{CertKind, ServiceKind},
    utils,
    versions::VersionManager,
};
use std::str::FromStr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
use cli::{
    Cli, Commands, DotfilesArgs, InfraAction, NewArgs, ProjectAction, ServerAction, SslAction,
    TemplateAction, VersionsAction,
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    if let Err(e) = init_logging(&cli) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(cli).await {
        tracing::error!("Error: {}", e);
        eprintln!("{}", format!("Error: {}", e).red());
        std::process::exit(1);
    }
}

/// Initialize logging based on verbosity level
/// - 0: errors only (menu mode stays quiet)
/// - 1 (-v): devforge INFO
/// - 2 (-vv): devforge DEBUG
/// - 3+ (-vvv): TRACE everywhere
fn init_logging(cli: &Cli) -> Result<()> {
    let filter_str = match cli.verbose {
        0 => "error".to_string(),
        1 => "devforge=info".to_string(),
        2 => "devforge=debug".to_string(),
        _ => "trace".to_string(),
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    let fmt_layer = tracing_subscriber::fmt::layer().with_target(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let paths = Paths::resolve()?;
    let config = Config::load_or_init(&paths)?;
    config.validate()?;

    let command = match cli.command {
        Some(command) => command,
        None => return run_menu(config, paths).await,
    };

    match command {
        Commands::Menu => run_menu(config, paths).await,
        Commands::New(args) => cmd_new(config, paths, args).await,
        Commands::List => cmd_list(&paths),
        Commands::Project(cmd) => cmd_project(&paths, cmd.action),
        Commands::Ssl(cmd) => cmd_ssl(config, paths, cmd.action).await,
        Commands::Template(cmd) => cmd_template(&paths, cmd.action),
        Commands::Versions(cmd) => cmd_versions(&paths, cmd.action).await,
        Commands::Dotfiles(args) => cmd_dotfiles(&config, &paths, args),
        Commands::Infra(cmd) => cmd_infra(&paths, cmd.action),
        Commands::Build(args) => cmd_build(args),
        Commands::Server(cmd) => match cmd.action {
            ServerAction::Setup => ServerSetup::new().run(),
        },
    }
}

async fn run_menu(config: Config, paths: Paths) -> Result<()> {
    devforge::banner::display_banner();
    let mut menu = Menu::new(config, paths)?;
    menu.run().await
}

async fn cmd_new(config: Config, paths: Paths, args: NewArgs) -> Result<()> {
    let version_specs = args
        .versions
        .as_deref()
        .map(utils::parse_version_specs)
        .unwrap_or_default();

    match (&args.template, &args.name) {
        (Some(template), Some(name)) => {
            let mut menu = Menu::new(config, paths)?;
            menu.create_project_direct(template, name, args.domain.as_deref(), &version_specs)
                .await
        }
        _ => {
            // Without both a template and a name, fall back to the wizard.
            let mut menu = Menu::new(config, paths)?;
            menu.new_project_wizard().await
        }
    }
}

fn cmd_list(paths: &Paths) -> Result<()> {
    let projects = ProjectManager::new(paths);
    let rows: Vec<Vec<String>> = projects
        .list()?
        .iter()
        .map(|p| {
            vec![
                p.name.clone(),
                p.kind.to_string(),
                output::project_status_cell(projects.status(p)),
                p.path.display().to_string(),
            ]
        })
        .collect();
    output::table(&["Name", "Type", "Status", "Path"], &rows);
    Ok(())
}

fn cmd_project(paths: &Paths, action: ProjectAction) -> Result<()> {
    let projects = ProjectManager::new(paths);

    match action {
        ProjectAction::Start { name } => projects.start(&projects.find(&name)?),
        ProjectAction::Stop { name } => {
            projects.stop(&projects.find(&name)?)?;
            output::success(&format!("{} stopped", name));
            Ok(())
        }
        ProjectAction::Restart { name } => projects.restart(&projects.find(&name)?),
        ProjectAction::Logs { name, follow } => projects.logs(&projects.find(&name)?, follow),
        ProjectAction::Shell { name } => projects.shell(&projects.find(&name)?),
        ProjectAction::Status => cmd_list(paths),
    }
}

async fn cmd_ssl(config: Config, paths: Paths, action: SslAction) -> Result<()> {
    let ssl = SslManager::new(config, paths)?;

    match action {
        SslAction::Add {
            domain,
            cert_type,
            service,
            container,
        } => {
            let kind = CertKind::from_str(&cert_type)?;
            let service = ServiceKind::from_str(&service)?;
            ssl.add(&domain, kind, service, container.as_deref()).await?;
            output::success(&format!("Certificate added for {}", domain));
            Ok(())
        }
        SslAction::List => {
            let rows: Vec<Vec<String>> = ssl
                .certificates()?
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
            Ok(())
        }
        SslAction::Renew => {
            let results = ssl.renew_all().await?;
            let succeeded = results.iter().filter(|(_, ok)| *ok).count();
            output::success(&format!(
                "Renewed {} out of {} certificates",
                succeeded,
                results.len()
            ));
            for (domain, ok) in results {
                if !ok {
                    output::failure(&format!("Renewal failed for {}", domain));
                }
            }
            Ok(())
        }
        SslAction::Delete { domain, yes } => {
            if !yes {
                let confirmed = dialoguer::Confirm::new()
                    .with_prompt(format!("Delete the certificate for {}?", domain))
                    .default(false)
                    .interact()?;
                if !confirmed {
                    return Ok(());
                }
            }
            ssl.delete(&domain)?;
            output::success(&format!("Certificate deleted for {}", domain));
            Ok(())
        }
        SslAction::Check => {
            let changed = ssl.check_all().await?;
            if changed.is_empty() {
                output::success("Certificate status check completed, no changes");
            } else {
                for (domain, status) in changed {
                    println!("{} → {}", domain, output::cert_status_cell(status));
                }
            }
            Ok(())
        }
        SslAction::Logs { limit } => {
            let rows: Vec<Vec<String>> = ssl
                .recent_logs(limit)?
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
            Ok(())
        }
    }
}

fn cmd_template(paths: &Paths, action: TemplateAction) -> Result<()> {
    let templates = TemplateManager::new(paths)?;

    match action {
        TemplateAction::List => {
            let rows: Vec<Vec<String>> = templates
                .discover()?
                .iter()
                .map(|(name, spec)| {
                    vec![
                        name.clone(),
                        spec.description.clone(),
                        spec.tech_stack.join(", "),
                        spec.features.join(", "),
                    ]
                })
                .collect();
            output::table(&["Template", "Description", "Tech Stack", "Features"], &rows);
            Ok(())
        }
        TemplateAction::Info { name } => {
            let spec = templates.get(&name)?;
            output::panel(
                &name,
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
                    spec.ports.unwrap_or_default().join(", "),
                ),
            );
            Ok(())
        }
    }
}

async fn cmd_versions(paths: &Paths, action: VersionsAction) -> Result<()> {
    let mut versions = VersionManager::load(paths)?;

    match action {
        VersionsAction::List => {
            let rows: Vec<Vec<String>> = versions
                .tools()
                .iter()
                .map(|tool| {
                    vec![
                        tool.clone(),
                        versions.default_version(tool),
                        versions.available_versions(tool).join(", "),
                    ]
                })
                .collect();
            output::table(&["Tool", "Default", "Available"], &rows);
            Ok(())
        }
        VersionsAction::Set { tool, version } => {
            versions.set_default_version(&tool, &version)?;
            output::success(&format!("Set {} default version to {}", tool, version));
            Ok(())
        }
        VersionsAction::Check => {
            let latest = versions.check_latest_versions().await;
            if latest.is_empty() {
                output::warn("Could not fetch latest versions");
                return Ok(());
            }
            let rows: Vec<Vec<String>> = latest
                .iter()
                .map(|(tool, version)| {
                    let current = versions.default_version(tool);
                    let update = if version != &current { "Yes" } else { "No" };
                    vec![tool.clone(), current, version.clone(), update.to_string()]
                })
                .collect();
            output::table(&["Tool", "Current", "Latest", "Update Available"], &rows);
            Ok(())
        }
        VersionsAction::Dockerfile {
            tool,
            version,
            output: target,
        } => {
            let version = version.unwrap_or_else(|| versions.default_version(&tool));
            let dockerfile = versions.generate_dockerfile(&tool, &version)?;
            match target {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, dockerfile)?;
                    output::success(&format!("Dockerfile written to {}", path.display()));
                }
                None => print!("{}", dockerfile),
            }
            Ok(())
        }
    }
}

fn cmd_dotfiles(config: &Config, paths: &Paths, args: DotfilesArgs) -> Result<()> {
    let dotfiles = DotfilesManager::new(config, paths);

    if args.sync {
        dotfiles.sync()?;
        output::success("Dotfiles synced successfully!");
    }
    if args.install {
        dotfiles.install()?;
        output::success("Dotfiles installed successfully!");
    }
    if args.push {
        if dotfiles.push("Update dotfiles configuration")? {
            output::success("Changes pushed successfully!");
        } else {
            output::warn("No changes to push");
        }
    }

    if !args.sync && !args.install && !args.push {
        println!("{}", dotfiles.status_report()?);
    }
    Ok(())
}

fn cmd_infra(paths: &Paths, action: InfraAction) -> Result<()> {
    let projects = ProjectManager::new(paths);

    match action {
        InfraAction::Up => projects.infrastructure_up(),
        InfraAction::Down => {
            projects.infrastructure_down()?;
            output::success("Infrastructure stopped");
            Ok(())
        }
        InfraAction::Status => {
            println!(
                "Infrastructure: {}",
                output::project_status_cell(projects.infrastructure_status())
            );
            Ok(())
        }
    }
}

fn cmd_build(args: cli::BuildArgs) -> Result<()> {
    let path = match args.path {
        Some(path) => path,
        None => std::env::current_dir()?,
    };

    let system = BuildSystem::load(path)?;
    if args.watch {
        system.watch()
    } else {
        system.run(&args.target)
    }
}
