//! fail2ban and firewall hardening

use super::TaskOutcome;
use crate::error::Result;
use crate::server::config::SetupConfig;
use crate::utils;

/// Configure fail2ban, then the firewall when enabled
pub fn run(config: &SetupConfig) -> Result<TaskOutcome> {
    let jail = format!(
        "[DEFAULT]
bantime = 1h
findtime = 10m
maxretry = 3

[sshd]
enabled = true
port = {}
",
        config.ssh_port
    );
    std::fs::write("/etc/fail2ban/jail.local", jail)?;

    utils::run_checked("systemctl", &["enable", "fail2ban"])?;
    utils::run_checked("systemctl", &["start", "fail2ban"])?;

    if config.setup_firewall {
        setup_firewall(config)?;
    }

    Ok(TaskOutcome::Done)
}

fn setup_firewall(config: &SetupConfig) -> Result<()> {
    utils::run_checked("ufw", &["--force", "reset"])?;
    utils::run_checked("ufw", &["default", "deny", "incoming"])?;
    utils::run_checked("ufw", &["default", "allow", "outgoing"])?;

    let ssh_port = config.ssh_port.to_string();
    for port in [ssh_port.as_str(), "80", "443", "8080", "81", "9000"] {
        utils::run_checked("ufw", &["allow", port])?;
    }

    utils::run_checked("ufw", &["--force", "enable"])?;
    Ok(())
}
