//! Remote development server provisioning
//!
//! Collects a configuration interactively, then runs a fixed sequence of
//! provisioning tasks. A failing task is recorded and the sequence carries
//! on; the run ends with a summary panel.

pub mod config;
pub mod tasks;

use crate::error::{Error, Result};
use crate::output;
use crate::utils;
use colored::Colorize;
use config::SetupConfig;
use indicatif::{ProgressBar, ProgressStyle};
use tasks::TaskOutcome;
use tracing::{error, info};

type TaskFn = fn(&SetupConfig) -> Result<TaskOutcome>;

const TASKS: &[(&str, TaskFn)] = &[
    ("System Updates", tasks::system::run),
    ("User Management", tasks::user::run),
    ("SSH Configuration", tasks::ssh::run),
    ("Security Setup", tasks::security::run),
    ("Docker Installation", tasks::docker::run),
    ("Development Tools", tasks::dev_tools::run),
    ("Web Infrastructure", tasks::web_server::run),
    ("Final Configuration", tasks::finalize::run),
];

/// Provisioning driver
#[derive(Debug, Default)]
pub struct ServerSetup {
    log: Vec<String>,
}

impl ServerSetup {
    /// Create a driver
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the complete setup: root check, config collection, task sequence,
    /// summary
    pub fn run(&mut self) -> Result<()> {
        output::heading("Development Server Setup");

        if !running_as_root() {
            return Err(Error::config(
                "This command must be run as root (use sudo)",
            ));
        }

        let config = SetupConfig::collect()?;
        self.run_tasks(&config);
        self.show_summary(&config);
        Ok(())
    }

    fn run_tasks(&mut self, config: &SetupConfig) {
        println!("\n{}", "Running Setup Tasks".bold().green());

        let bar = ProgressBar::new(TASKS.len() as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .expect("static progress template"),
        );

        for (name, task) in TASKS {
            bar.set_message(name.to_string());

            match task(config) {
                Ok(TaskOutcome::Done) => {
                    info!(task = name, "completed");
                    self.log.push(format!("{} {}", "✅".green(), name));
                }
                Ok(TaskOutcome::Skipped) => {
                    info!(task = name, "skipped");
                    self.log.push(format!("{} {} (Skipped)", "⚠".yellow(), name));
                }
                Err(e) => {
                    error!(task = name, error = %e, "failed");
                    self.log.push(format!("{} {}: {}", "❌".red(), name, e));
                    println!("{}", format!("Error in {}: {}", name, e).red());
                }
            }

            bar.inc(1);
        }

        bar.finish_and_clear();

        println!();
        for line in &self.log {
            println!("  {}", line);
        }
    }

    fn show_summary(&self, config: &SetupConfig) {
        output::panel(
            "Development Server Ready",
            &format!(
                "Setup Complete!

Server Details:
• User: {user}
• SSH Port: {port}
• Domain: {domain}

Access:
• SSH: ssh {user}@your-server -p {port}
• VS Code: http://your-server:8080
• Proxy Manager: http://your-server:81

Commands:
• dev - Development manager
• devforge new - Create projects",
                user = config.username,
                port = config.ssh_port,
                domain = config.domain.as_deref().unwrap_or("Not set"),
            ),
        );
    }
}

fn running_as_root() -> bool {
    utils::capture("id", &["-u"])
        .map(|uid| uid == "0")
        .unwrap_or(false)
}
