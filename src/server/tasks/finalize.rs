//! Final touches: helper script, dotfiles, welcome message

use super::TaskOutcome;
use crate::error::Result;
use crate::server::config::SetupConfig;
use crate::utils;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use tracing::warn;

const DEV_SCRIPT: &str = r#"#!/bin/bash
echo "Development Environment Manager"
echo "Available commands:"
echo "  dev start    - Start infrastructure"
echo "  dev stop     - Stop infrastructure"
echo "  dev status   - Show status"
echo ""
case "$1" in
    start)
        cd ~/infrastructure && docker compose up -d
        ;;
    stop)
        cd ~/infrastructure && docker compose down
        ;;
    status)
        docker ps
        ;;
    *)
        echo "Usage: dev {start|stop|status}"
        ;;
esac
"#;

/// Install the `dev` helper, clone dotfiles, write the welcome banner
pub fn run(config: &SetupConfig) -> Result<TaskOutcome> {
    let owner = format!("{}:{}", config.username, config.username);
    let home = PathBuf::from(config.user_home());

    // dev helper command
    let scripts_dir = home.join("scripts");
    std::fs::create_dir_all(&scripts_dir)?;
    let dev_script = scripts_dir.join("dev");
    std::fs::write(&dev_script, DEV_SCRIPT)?;
    std::fs::set_permissions(&dev_script, std::fs::Permissions::from_mode(0o755))?;
    utils::run_checked("chown", &[&owner, dev_script.to_str().unwrap_or_default()])?;
    utils::run_checked(
        "ln",
        &["-sf", dev_script.to_str().unwrap_or_default(), "/usr/local/bin/dev"],
    )?;

    // dotfiles, best effort
    if let Some(github_username) = &config.github_username {
        let repo = format!("https://github.com/{}/dotfiles", github_username);
        let target = home.join("dotfiles");
        if let Err(e) = utils::run_checked(
            "sudo",
            &[
                "-u",
                &config.username,
                "git",
                "clone",
                &repo,
                target.to_str().unwrap_or_default(),
            ],
        ) {
            warn!(error = %e, "could not clone dotfiles repository");
        }
    }

    write_welcome(&home, &owner)?;

    Ok(TaskOutcome::Done)
}

fn write_welcome(home: &PathBuf, owner: &str) -> Result<()> {
    let welcome = "
echo \"Welcome to your Development Server!\"
echo \"\"
echo \"Quick commands:\"
echo \"  dev start    - Start infrastructure\"
echo \"  dev status   - Show running containers\"
echo \"\"
echo \"Web interfaces:\"
echo \"  http://localhost:81  - Nginx Proxy Manager\"
echo \"  http://localhost:9000 - Portainer\"
echo \"  http://localhost:8080 - VS Code Server\"
echo \"\"
";

    let welcome_file = home.join(".welcome");
    std::fs::write(&welcome_file, welcome)?;

    use std::io::Write;
    let mut bashrc = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(home.join(".bashrc"))?;
    bashrc.write_all(b"\n# Show welcome\nbash ~/.welcome\n")?;

    utils::run_checked("chown", &[owner, welcome_file.to_str().unwrap_or_default()])?;
    Ok(())
}
