//! Docker and Docker Compose plumbing
//!
//! Thin blocking wrappers over the `docker` CLI. Compose operations run with
//! the project directory as the working directory so the default project name
//! matches the directory, the same contract `docker compose` gives a shell
//! user in that directory.

use crate::error::{Error, Result};
use crate::types::ProjectStatus;
use std::collections::HashMap;
use std::path::Path;
use std::process::{Command, Stdio};

/// Check if the Docker CLI is installed
pub fn docker_available() -> bool {
    Command::new("docker")
        .arg("--version")
        .output()
        .map(|out| out.status.success())
        .unwrap_or(false)
}

/// Check if the Docker daemon is running
pub fn daemon_running() -> bool {
    Command::new("docker")
        .args(["ps", "-q"])
        .output()
        .map(|out| out.status.success())
        .unwrap_or(false)
}

/// Fail early when the daemon is unreachable
pub fn require_daemon() -> Result<()> {
    if !docker_available() {
        return Err(Error::DockerUnavailable("docker CLI not found".to_string()));
    }
    if !daemon_running() {
        return Err(Error::DockerUnavailable("daemon is not running".to_string()));
    }
    Ok(())
}

fn compose(dir: &Path, args: &[&str]) -> Result<std::process::Output> {
    Command::new("docker")
        .arg("compose")
        .args(args)
        .current_dir(dir)
        .output()
        .map_err(|e| Error::command("docker compose", e.to_string()))
}

fn compose_checked(dir: &Path, args: &[&str]) -> Result<()> {
    let output = compose(dir, args)?;
    if output.status.success() {
        Ok(())
    } else {
        Err(Error::command(
            "docker compose",
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ))
    }
}

/// `docker compose pull` in a project directory
pub fn compose_pull(dir: &Path) -> Result<()> {
    compose_checked(dir, &["pull"])
}

/// `docker compose up -d` in a project directory
pub fn compose_up(dir: &Path) -> Result<()> {
    compose_checked(dir, &["up", "-d"])
}

/// `docker compose down` in a project directory
pub fn compose_down(dir: &Path) -> Result<()> {
    compose_checked(dir, &["down"])
}

/// `docker compose restart` in a project directory
pub fn compose_restart(dir: &Path) -> Result<()> {
    compose_checked(dir, &["restart"])
}

/// Container IDs belonging to a compose project (including stopped ones)
pub fn compose_ps_ids(dir: &Path) -> Result<Vec<String>> {
    let output = compose(dir, &["ps", "-a", "-q"])?;
    if !output.status.success() {
        return Err(Error::command(
            "docker compose",
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ));
    }

    Ok(String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect())
}

/// Stream compose logs to the terminal until interrupted
pub fn compose_logs(dir: &Path, follow: bool) -> Result<()> {
    let mut args = vec!["compose", "logs"];
    if follow {
        args.push("-f");
    }

    let status = Command::new("docker")
        .args(&args)
        .current_dir(dir)
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .map_err(|e| Error::command("docker compose", e.to_string()))?;

    if status.success() {
        Ok(())
    } else {
        Err(Error::command("docker compose", format!("logs exited with {}", status)))
    }
}

/// Open an interactive shell inside a compose service
pub fn compose_shell(dir: &Path, service: &str) -> Result<()> {
    let status = Command::new("docker")
        .args(["compose", "exec", service, "bash"])
        .current_dir(dir)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .map_err(|e| Error::command("docker compose", e.to_string()))?;

    if status.success() {
        Ok(())
    } else {
        Err(Error::command("docker compose", format!("exec exited with {}", status)))
    }
}

/// Whether a container (by id or name) is currently running
pub fn container_running(container: &str) -> bool {
    Command::new("docker")
        .args(["inspect", "-f", "{{.State.Running}}", container])
        .output()
        .map(|out| {
            out.status.success() && String::from_utf8_lossy(&out.stdout).trim() == "true"
        })
        .unwrap_or(false)
}

/// Whether a container with the given name exists at all
pub fn container_exists(container: &str) -> bool {
    Command::new("docker")
        .args(["inspect", container])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Names of all running containers
pub fn running_container_names() -> Result<Vec<String>> {
    let output = Command::new("docker")
        .args(["ps", "--format", "{{.Names}}"])
        .output()
        .map_err(|e| Error::command("docker", e.to_string()))?;

    if !output.status.success() {
        return Err(Error::command(
            "docker",
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ));
    }

    Ok(String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect())
}

/// Labels of a container, from `docker inspect`
pub fn container_labels(container: &str) -> Result<HashMap<String, String>> {
    let output = Command::new("docker")
        .args(["inspect", "-f", "{{json .Config.Labels}}", container])
        .output()
        .map_err(|e| Error::command("docker", e.to_string()))?;

    if !output.status.success() {
        return Err(Error::command(
            "docker",
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ));
    }

    let raw = String::from_utf8_lossy(&output.stdout);
    let raw = raw.trim();
    if raw.is_empty() || raw == "null" {
        return Ok(HashMap::new());
    }

    Ok(serde_json::from_str(raw)?)
}

/// Run a one-shot container to completion, capturing output
pub fn run_one_shot(args: &[&str]) -> Result<()> {
    let output = Command::new("docker")
        .arg("run")
        .args(args)
        .output()
        .map_err(|e| Error::command("docker", e.to_string()))?;

    if output.status.success() {
        Ok(())
    } else {
        Err(Error::command(
            "docker run",
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ))
    }
}

/// Aggregate container state of a compose project directory
pub fn project_status(dir: &Path) -> ProjectStatus {
    let ids = match compose_ps_ids(dir) {
        Ok(ids) => ids,
        Err(_) => return ProjectStatus::Unknown,
    };

    if ids.is_empty() {
        return ProjectStatus::NotCreated;
    }

    let running = ids.iter().filter(|id| container_running(id)).count();
    if running == ids.len() {
        ProjectStatus::Running
    } else if running > 0 {
        ProjectStatus::Partial
    } else {
        ProjectStatus::Stopped
    }
}
