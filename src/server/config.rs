//! Provisioning configuration collected before the task run

use crate::error::Result;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};

/// How the user's SSH key is obtained
#[derive(Debug, Clone)]
pub enum SshKeySource {
    /// Generate a fresh RSA keypair on the server
    Generate,
    /// Use a public key pasted by the operator
    Provided(String),
}

/// Everything the provisioning tasks need to know
#[derive(Debug, Clone)]
pub struct SetupConfig {
    /// Development user to create
    pub username: String,
    /// Contact email
    pub email: String,
    /// SSH daemon port
    pub ssh_port: u16,
    /// SSH key source
    pub ssh_key: SshKeySource,
    /// Server domain, if any
    pub domain: Option<String>,
    /// GitHub username for dotfiles cloning
    pub github_username: Option<String>,
    /// Install the Docker engine
    pub install_docker: bool,
    /// Install the nginx proxy manager stack
    pub install_nginx: bool,
    /// Configure ufw
    pub setup_firewall: bool,
    /// Configure backups
    pub setup_backups: bool,
}

impl Default for SetupConfig {
    fn default() -> Self {
        Self {
            username: "developer".to_string(),
            email: "dev@example.com".to_string(),
            ssh_port: 22,
            ssh_key: SshKeySource::Generate,
            domain: None,
            github_username: None,
            install_docker: true,
            install_nginx: true,
            setup_firewall: true,
            setup_backups: true,
        }
    }
}

impl SetupConfig {
    /// Home directory of the development user
    pub fn user_home(&self) -> String {
        format!("/home/{}", self.username)
    }

    /// Collect the configuration interactively, with a confirmation summary
    pub fn collect() -> Result<Self> {
        let theme = ColorfulTheme::default();
        let defaults = Self::default();

        let username: String = Input::with_theme(&theme)
            .with_prompt("Username")
            .default(defaults.username)
            .interact_text()?;

        let email: String = Input::with_theme(&theme)
            .with_prompt("Email")
            .default(defaults.email)
            .interact_text()?;

        let ssh_port: u16 = Input::with_theme(&theme)
            .with_prompt("SSH Port")
            .default(defaults.ssh_port)
            .interact_text()?;

        let key_choice = Select::with_theme(&theme)
            .with_prompt("SSH Key")
            .items(&["generate", "paste"])
            .default(0)
            .interact()?;
        let ssh_key = if key_choice == 0 {
            SshKeySource::Generate
        } else {
            let key: String = Input::with_theme(&theme)
                .with_prompt("Paste your public SSH key")
                .interact_text()?;
            SshKeySource::Provided(key)
        };

        let domain: String = Input::with_theme(&theme)
            .with_prompt("Domain (optional)")
            .allow_empty(true)
            .interact_text()?;

        let github_username: String = Input::with_theme(&theme)
            .with_prompt("GitHub username (optional)")
            .allow_empty(true)
            .interact_text()?;

        let install_docker = Confirm::with_theme(&theme)
            .with_prompt("Install Docker?")
            .default(true)
            .interact()?;
        let install_nginx = Confirm::with_theme(&theme)
            .with_prompt("Install Nginx Proxy Manager?")
            .default(true)
            .interact()?;
        let setup_firewall = Confirm::with_theme(&theme)
            .with_prompt("Setup firewall?")
            .default(true)
            .interact()?;
        let setup_backups = Confirm::with_theme(&theme)
            .with_prompt("Setup backups?")
            .default(true)
            .interact()?;

        let config = Self {
            username,
            email,
            ssh_port,
            ssh_key,
            domain: (!domain.is_empty()).then_some(domain),
            github_username: (!github_username.is_empty()).then_some(github_username),
            install_docker,
            install_nginx,
            setup_firewall,
            setup_backups,
        };

        println!("\nConfiguration Summary:");
        println!("  username: {}", config.username);
        println!("  email: {}", config.email);
        println!("  ssh_port: {}", config.ssh_port);
        println!("  domain: {}", config.domain.as_deref().unwrap_or("-"));
        println!(
            "  github_username: {}",
            config.github_username.as_deref().unwrap_or("-")
        );
        println!("  install_docker: {}", config.install_docker);
        println!("  install_nginx: {}", config.install_nginx);
        println!("  setup_firewall: {}", config.setup_firewall);
        println!("  setup_backups: {}", config.setup_backups);

        let proceed = Confirm::with_theme(&theme)
            .with_prompt("Proceed with setup?")
            .default(true)
            .interact()?;
        if !proceed {
            return Err(crate::error::Error::config("Setup cancelled"));
        }

        Ok(config)
    }
}
