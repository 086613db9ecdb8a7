//! Development user creation and home layout

use super::TaskOutcome;
use crate::error::Result;
use crate::server::config::SetupConfig;
use crate::utils;
use std::path::PathBuf;
use tracing::info;

const HOME_DIRECTORIES: &[&str] = &["scripts", "sites", "docker", "workspace", ".ssh"];

/// Create the development user (if missing) and its directory layout
pub fn run(config: &SetupConfig) -> Result<TaskOutcome> {
    let username = &config.username;

    if utils::run_checked("id", &[username]).is_ok() {
        info!(username, "user already exists");
    } else {
        utils::run_checked("useradd", &["-m", "-s", "/bin/bash", username])?;
        utils::run_checked("usermod", &["-aG", "sudo", username])?;
    }

    let owner = format!("{}:{}", username, username);
    let home = PathBuf::from(config.user_home());
    for directory in HOME_DIRECTORIES {
        let path = home.join(directory);
        std::fs::create_dir_all(&path)?;
        utils::run_checked("chown", &[&owner, path.to_str().unwrap_or_default()])?;
    }

    Ok(TaskOutcome::Done)
}
