//! Shared web infrastructure: proxy manager and portainer compose stack

use super::TaskOutcome;
use crate::error::Result;
use crate::project;
use crate::server::config::SetupConfig;
use crate::utils;
use std::path::PathBuf;

/// Write the infrastructure compose file into the user's home
pub fn run(config: &SetupConfig) -> Result<TaskOutcome> {
    if !config.install_nginx {
        return Ok(TaskOutcome::Skipped);
    }

    let infra_dir = PathBuf::from(config.user_home()).join("infrastructure");
    std::fs::create_dir_all(&infra_dir)?;

    let compose = infra_dir.join("docker-compose.yml");
    if !compose.exists() {
        std::fs::write(&compose, project::INFRASTRUCTURE_COMPOSE)?;
    }

    let owner = format!("{}:{}", config.username, config.username);
    utils::run_checked("chown", &["-R", &owner, infra_dir.to_str().unwrap_or_default()])?;

    Ok(TaskOutcome::Done)
}
