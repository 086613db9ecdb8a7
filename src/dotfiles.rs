//! Dotfiles repository management
//!
//! Clones and updates the configured dotfiles repository, runs its install
//! script, and pushes local edits back. Mutating git operations go through
//! the system `git` binary; `git2` reads repository state for the
//! clean/dirty indicator.

use crate::config::{Config, Paths};
use crate::error::{Error, Result};
use crate::utils;
use git2::{Repository, StatusOptions};
use std::path::{Path, PathBuf};
use tracing::info;

/// Dotfiles repository manager
#[derive(Debug)]
pub struct DotfilesManager {
    repo_url: String,
    dotfiles_dir: PathBuf,
}

impl DotfilesManager {
    /// Create a manager for the configured repository
    pub fn new(config: &Config, paths: &Paths) -> Self {
        Self {
            repo_url: config.dotfiles.repo.clone(),
            dotfiles_dir: paths.dotfiles_dir(),
        }
    }

    /// Local checkout directory
    pub fn dir(&self) -> &Path {
        &self.dotfiles_dir
    }

    /// Whether the repository has been cloned
    pub fn is_present(&self) -> bool {
        self.dotfiles_dir.exists()
    }

    /// Clone the repository, or pull if already present
    pub fn sync(&self) -> Result<()> {
        if self.is_present() {
            info!(dir = %self.dotfiles_dir.display(), "updating dotfiles");
            utils::run_checked_in(&self.dotfiles_dir, "git", &["pull"])?;
        } else {
            info!(repo = %self.repo_url, "cloning dotfiles");
            utils::run_checked(
                "git",
                &[
                    "clone",
                    &self.repo_url,
                    self.dotfiles_dir.to_str().unwrap_or_default(),
                ],
            )?;
        }
        Ok(())
    }

    /// Run the repository's install script
    pub fn install(&self) -> Result<()> {
        if !self.is_present() {
            return Err(Error::config("Dotfiles not found. Run sync first."));
        }

        let script = self.dotfiles_dir.join("install.sh");
        if !script.exists() {
            return Err(Error::FileNotFound(script));
        }

        utils::run_shell(&self.dotfiles_dir, "bash install.sh")?;
        info!("dotfiles installed");
        Ok(())
    }

    /// Whether the working tree is clean (no staged, modified or untracked
    /// files)
    pub fn is_clean(&self) -> Result<bool> {
        let repo = Repository::open(&self.dotfiles_dir)?;
        let mut options = StatusOptions::new();
        options.include_untracked(true);
        let statuses = repo.statuses(Some(&mut options))?;
        Ok(statuses.is_empty())
    }

    /// Short status plus recent commits, for display
    pub fn status_report(&self) -> Result<String> {
        if !self.is_present() {
            return Err(Error::config("Dotfiles repository not found"));
        }

        let status = utils::capture_in(&self.dotfiles_dir, "git", &["status", "--short"])?;
        let log = utils::capture_in(&self.dotfiles_dir, "git", &["log", "--oneline", "-5"])?;

        let mut report = String::new();
        report.push_str("Repository Status:\n");
        report.push_str(if status.is_empty() { "clean" } else { &status });
        report.push_str("\n\nRecent Commits:\n");
        report.push_str(&log);
        Ok(report)
    }

    /// Commit and push local changes; no-op when the tree is clean
    pub fn push(&self, message: &str) -> Result<bool> {
        if !self.is_present() {
            return Err(Error::config("Dotfiles repository not found"));
        }

        let status = utils::capture_in(&self.dotfiles_dir, "git", &["status", "--porcelain"])?;
        if status.is_empty() {
            return Ok(false);
        }

        utils::run_checked_in(&self.dotfiles_dir, "git", &["add", "."])?;
        utils::run_checked_in(&self.dotfiles_dir, "git", &["commit", "-m", message])?;
        utils::run_checked_in(&self.dotfiles_dir, "git", &["push"])?;
        info!("dotfiles changes pushed");
        Ok(true)
    }

    /// Write a project-specific `.zshrc` with convenience aliases
    pub fn write_project_zshrc(&self, project_path: &Path) -> Result<()> {
        let zshrc = project_path.join(".zshrc");
        if zshrc.exists() {
            return Ok(());
        }

        let name = project_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let path = project_path.display();

        let content = format!(
            r#"# Project-specific zsh configuration for {name}

# Load main dotfiles configuration
source ~/.zshrc

# Project aliases
alias proj='cd {path}'
alias start='docker compose up -d'
alias stop='docker compose down'
alias logs='docker compose logs -f'
alias shell='docker compose exec dev bash'

# Project environment
export PROJECT_PATH="{path}"
export PROJECT_NAME="{name}"

start-dev() {{
    cd {path}
    docker compose up -d
    echo "Development environment started!"
    echo "Code Server: http://localhost:8080"
    echo "Application: http://localhost:3000"
}}

stop-dev() {{
    cd {path}
    docker compose down
    echo "Development environment stopped!"
}}
"#,
        );

        std::fs::write(&zshrc, content)?;
        info!(project = %name, "project zshrc written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn project_zshrc_is_written_once() {
        let home = TempDir::new().unwrap();
        let paths = Paths::rooted_at(home.path());
        let manager = DotfilesManager::new(&Config::default(), &paths);

        let project = home.path().join("sites").join("blog.test");
        std::fs::create_dir_all(&project).unwrap();

        manager.write_project_zshrc(&project).unwrap();
        let content = std::fs::read_to_string(project.join(".zshrc")).unwrap();
        assert!(content.contains("PROJECT_NAME=\"blog.test\""));
        assert!(content.contains("alias proj="));

        // Existing files are not clobbered.
        std::fs::write(project.join(".zshrc"), "custom").unwrap();
        manager.write_project_zshrc(&project).unwrap();
        assert_eq!(std::fs::read_to_string(project.join(".zshrc")).unwrap(), "custom");
    }

    #[test]
    fn install_requires_a_checkout() {
        let home = TempDir::new().unwrap();
        let paths = Paths::rooted_at(home.path());
        let manager = DotfilesManager::new(&Config::default(), &paths);
        assert!(manager.install().is_err());
        assert!(!manager.is_present());
    }
}
