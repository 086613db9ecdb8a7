//! System updates and base packages

use super::TaskOutcome;
use crate::error::Result;
use crate::server::config::SetupConfig;
use crate::utils;

const BASE_PACKAGES: &[&str] = &[
    "curl",
    "wget",
    "git",
    "unzip",
    "software-properties-common",
    "apt-transport-https",
    "ca-certificates",
    "gnupg",
    "lsb-release",
    "build-essential",
    "htop",
    "tree",
    "vim",
    "nano",
    "tmux",
    "ufw",
    "fail2ban",
    "python3-pip",
];

/// Update the package index, upgrade, and install the base package set
pub fn run(_config: &SetupConfig) -> Result<TaskOutcome> {
    utils::run_checked("apt", &["update"])?;
    utils::run_checked("apt", &["upgrade", "-y"])?;

    let mut args = vec!["install", "-y"];
    args.extend_from_slice(BASE_PACKAGES);
    utils::run_checked("apt", &args)?;

    Ok(TaskOutcome::Done)
}
