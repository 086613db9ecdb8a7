//! Utility functions and helpers

use crate::error::{Error, Result};
use std::path::Path;
use std::process::{Command, Stdio};

/// Run a command, discarding output, failing on non-zero exit
pub fn run_checked(program: &str, args: &[&str]) -> Result<()> {
    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|e| Error::command(program, e.to_string()))?;

    if output.status.success() {
        Ok(())
    } else {
        Err(Error::command(
            program,
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ))
    }
}

/// Run a command in a working directory, discarding output
pub fn run_checked_in(dir: &Path, program: &str, args: &[&str]) -> Result<()> {
    let output = Command::new(program)
        .args(args)
        .current_dir(dir)
        .output()
        .map_err(|e| Error::command(program, e.to_string()))?;

    if output.status.success() {
        Ok(())
    } else {
        Err(Error::command(
            program,
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ))
    }
}

/// Run a command and capture trimmed stdout
pub fn capture(program: &str, args: &[&str]) -> Result<String> {
    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|e| Error::command(program, e.to_string()))?;

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    } else {
        Err(Error::command(
            program,
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ))
    }
}

/// Run a command in a working directory and capture trimmed stdout
pub fn capture_in(dir: &Path, program: &str, args: &[&str]) -> Result<String> {
    let output = Command::new(program)
        .args(args)
        .current_dir(dir)
        .output()
        .map_err(|e| Error::command(program, e.to_string()))?;

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    } else {
        Err(Error::command(
            program,
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ))
    }
}

/// Run a shell command line in a working directory, inheriting stdio
pub fn run_shell(dir: &Path, command_line: &str) -> Result<()> {
    let status = Command::new("sh")
        .arg("-c")
        .arg(command_line)
        .current_dir(dir)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .map_err(|e| Error::command("sh", e.to_string()))?;

    if status.success() {
        Ok(())
    } else {
        Err(Error::command("sh", format!("'{}' exited with {}", command_line, status)))
    }
}

/// Check whether a program is on PATH and runnable
pub fn command_exists(program: &str) -> bool {
    Command::new(program)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Generate a random password from letters, digits and shell-safe symbols
pub fn generate_password(length: usize) -> String {
    const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*";
    (0..length)
        .map(|_| ALPHABET[fastrand::usize(..ALPHABET.len())] as char)
        .collect()
}

/// Parse a `tool:version` list like `php:8.1,node:18` into pairs
pub fn parse_version_specs(spec: &str) -> Vec<(String, String)> {
    spec.split(',')
        .filter_map(|part| {
            let part = part.trim();
            part.split_once(':')
                .map(|(tool, version)| (tool.trim().to_string(), version.trim().to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_has_requested_length_and_charset() {
        let password = generate_password(16);
        assert_eq!(password.len(), 16);
        assert!(password
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "!@#$%^&*".contains(c)));
    }

    #[test]
    fn version_specs_parse_pairs_and_skip_garbage() {
        let specs = parse_version_specs("php:8.1, node:18,broken,python: 3.11");
        assert_eq!(
            specs,
            vec![
                ("php".to_string(), "8.1".to_string()),
                ("node".to_string(), "18".to_string()),
                ("python".to_string(), "3.11".to_string()),
            ]
        );
    }
}
