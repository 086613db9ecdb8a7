//! Docker engine installation from the upstream apt repository

use super::TaskOutcome;
use crate::error::Result;
use crate::server::config::SetupConfig;
use crate::utils;

/// Add the Docker apt repository, install the engine and compose plugin
pub fn run(config: &SetupConfig) -> Result<TaskOutcome> {
    if !config.install_docker {
        return Ok(TaskOutcome::Skipped);
    }

    let gpg_key = utils::capture(
        "curl",
        &["-fsSL", "https://download.docker.com/linux/ubuntu/gpg"],
    )?;
    std::fs::write("/tmp/docker.gpg", gpg_key)?;
    utils::run_checked(
        "gpg",
        &[
            "--yes",
            "--dearmor",
            "-o",
            "/usr/share/keyrings/docker.gpg",
            "/tmp/docker.gpg",
        ],
    )?;

    let codename = utils::capture("lsb_release", &["-cs"])?;
    std::fs::write(
        "/etc/apt/sources.list.d/docker.list",
        format!(
            "deb [arch=amd64 signed-by=/usr/share/keyrings/docker.gpg] \
             https://download.docker.com/linux/ubuntu {} stable\n",
            codename
        ),
    )?;

    utils::run_checked("apt", &["update"])?;
    utils::run_checked(
        "apt",
        &[
            "install",
            "-y",
            "docker-ce",
            "docker-ce-cli",
            "containerd.io",
            "docker-compose-plugin",
        ],
    )?;

    utils::run_checked("usermod", &["-aG", "docker", &config.username])?;
    utils::run_checked("systemctl", &["enable", "docker"])?;
    utils::run_checked("systemctl", &["start", "docker"])?;

    Ok(TaskOutcome::Done)
}
