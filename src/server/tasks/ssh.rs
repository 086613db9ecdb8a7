//! SSH key installation and daemon hardening

use super::TaskOutcome;
use crate::error::{Error, Result};
use crate::server::config::{SetupConfig, SshKeySource};
use crate::utils;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;

/// Install the SSH key, write authorized_keys, and harden sshd
pub fn run(config: &SetupConfig) -> Result<TaskOutcome> {
    let ssh_dir = PathBuf::from(config.user_home()).join(".ssh");
    std::fs::create_dir_all(&ssh_dir)?;
    std::fs::set_permissions(&ssh_dir, std::fs::Permissions::from_mode(0o700))?;

    let public_key = match &config.ssh_key {
        SshKeySource::Generate => {
            let key_path = ssh_dir.join("id_rsa");
            utils::run_checked(
                "ssh-keygen",
                &[
                    "-t",
                    "rsa",
                    "-b",
                    "4096",
                    "-f",
                    key_path.to_str().unwrap_or_default(),
                    "-N",
                    "",
                    "-C",
                    &format!("{}@server", config.username),
                ],
            )?;
            std::fs::read_to_string(key_path.with_extension("pub"))?
                .trim()
                .to_string()
        }
        SshKeySource::Provided(key) => key.trim().to_string(),
    };

    let auth_keys = ssh_dir.join("authorized_keys");
    std::fs::write(&auth_keys, format!("{}\n", public_key))?;
    std::fs::set_permissions(&auth_keys, std::fs::Permissions::from_mode(0o600))?;

    let owner = format!("{}:{}", config.username, config.username);
    utils::run_checked("chown", &["-R", &owner, ssh_dir.to_str().unwrap_or_default()])?;

    configure_sshd(config)?;

    Ok(TaskOutcome::Done)
}

fn configure_sshd(config: &SetupConfig) -> Result<()> {
    let sshd_config = format!(
        "
# Custom SSH Configuration
Port {port}
PermitRootLogin no
PasswordAuthentication no
PubkeyAuthentication yes
X11Forwarding no
AllowUsers {user}
",
        port = config.ssh_port,
        user = config.username,
    );

    use std::io::Write;
    let mut file = std::fs::OpenOptions::new()
        .append(true)
        .open("/etc/ssh/sshd_config")
        .map_err(|e| Error::provision("ssh", format!("cannot open sshd_config: {}", e)))?;
    file.write_all(sshd_config.as_bytes())?;

    utils::run_checked("systemctl", &["restart", "sshd"])?;
    Ok(())
}
