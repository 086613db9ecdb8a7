//! Configuration management for DevForge

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure, persisted at `~/.ssl-manager/config.yml`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Let's Encrypt account settings
    pub letsencrypt: LetsEncryptConfig,
    /// Renewal notification settings
    pub notifications: NotificationConfig,
    /// Names of the proxy containers
    pub docker: ContainerConfig,
    /// Backup settings
    pub backup: BackupConfig,
    /// Dotfiles repository settings
    pub dotfiles: DotfilesConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            letsencrypt: LetsEncryptConfig::default(),
            notifications: NotificationConfig::default(),
            docker: ContainerConfig::default(),
            backup: BackupConfig::default(),
            dotfiles: DotfilesConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("Failed to read config file: {}", e)))?;

        serde_yaml::from_str(&content)
            .map_err(|e| Error::config(format!("Invalid YAML config: {}", e)))
    }

    /// Save configuration to file, creating the parent directory if needed
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| Error::config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Load from the default location, writing defaults on first run
    pub fn load_or_init(paths: &Paths) -> Result<Self> {
        let path = paths.manager_config();
        if path.exists() {
            Self::from_file(&path)
        } else {
            let config = Self::default();
            config.save(&path)?;
            Ok(config)
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.letsencrypt.email.is_empty() {
            return Err(Error::config("Let's Encrypt email must not be empty"));
        }

        if self.notifications.renewal_days_before == 0 {
            return Err(Error::config("Renewal horizon must be greater than 0 days"));
        }

        Ok(())
    }
}

/// Let's Encrypt account settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LetsEncryptConfig {
    /// Registration/notification email
    pub email: String,
    /// Use the staging CA instead of production
    pub staging: bool,
    /// Key type requested from the CA
    pub key_type: String,
}

impl Default for LetsEncryptConfig {
    fn default() -> Self {
        Self {
            email: "admin@example.com".to_string(),
            staging: false,
            key_type: "rsa2048".to_string(),
        }
    }
}

/// Renewal notification settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Whether notifications are enabled
    pub enabled: bool,
    /// Notification recipient
    pub email: String,
    /// Renew certificates expiring within this many days
    pub renewal_days_before: u32,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            email: "admin@example.com".to_string(),
            renewal_days_before: 30,
        }
    }
}

/// Names of the proxy containers the manager talks to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerConfig {
    /// Traefik container name
    pub traefik_container: String,
    /// Nginx proxy manager container name
    pub nginx_container: String,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            traefik_container: "traefik".to_string(),
            nginx_container: "nginx-proxy-manager".to_string(),
        }
    }
}

/// Backup settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupConfig {
    /// Whether backups are enabled
    pub enabled: bool,
    /// Days to keep backups
    pub retention_days: u32,
    /// Backup destination
    pub backup_path: PathBuf,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            retention_days: 90,
            backup_path: Paths::data_dir_default().join("backups"),
        }
    }
}

/// Dotfiles repository settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DotfilesConfig {
    /// Git URL of the dotfiles repository
    pub repo: String,
}

impl Default for DotfilesConfig {
    fn default() -> Self {
        Self {
            repo: "https://github.com/devforge/dotfiles".to_string(),
        }
    }
}

/// Well-known filesystem locations used throughout the tool
#[derive(Debug, Clone)]
pub struct Paths {
    home: PathBuf,
}

impl Paths {
    /// Resolve against the current user's home directory
    pub fn resolve() -> Result<Self> {
        let home = dirs::home_dir().ok_or_else(|| Error::config("Failed to get home directory"))?;
        Ok(Self { home })
    }

    /// Build paths rooted at an explicit directory (used by tests)
    pub fn rooted_at(home: impl Into<PathBuf>) -> Self {
        Self { home: home.into() }
    }

    fn data_dir_default() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".ssl-manager")
    }

    /// Home directory
    pub fn home(&self) -> &Path {
        &self.home
    }

    /// `~/.ssl-manager` data directory
    pub fn data_dir(&self) -> PathBuf {
        self.home.join(".ssl-manager")
    }

    /// `~/.ssl-manager/ssl_manager.db` certificate store
    pub fn cert_db(&self) -> PathBuf {
        self.data_dir().join("ssl_manager.db")
    }

    /// `~/.ssl-manager/config.yml` manager configuration
    pub fn manager_config(&self) -> PathBuf {
        self.data_dir().join("config.yml")
    }

    /// `~/scripts` script projects
    pub fn scripts_dir(&self) -> PathBuf {
        self.home.join("scripts")
    }

    /// `~/sites` website projects
    pub fn sites_dir(&self) -> PathBuf {
        self.home.join("sites")
    }

    /// `~/docker` docker build context root
    pub fn docker_dir(&self) -> PathBuf {
        self.home.join("docker")
    }

    /// `~/docker/templates` project templates
    pub fn templates_dir(&self) -> PathBuf {
        self.docker_dir().join("templates")
    }

    /// `~/config/versions/versions.yml` version table
    pub fn versions_config(&self) -> PathBuf {
        self.home.join("config").join("versions").join("versions.yml")
    }

    /// `~/infrastructure` shared proxy/portainer stack
    pub fn infrastructure_dir(&self) -> PathBuf {
        self.home.join("infrastructure")
    }

    /// `~/dotfiles` dotfiles checkout
    pub fn dotfiles_dir(&self) -> PathBuf {
        self.home.join("dotfiles")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn zero_renewal_horizon_is_rejected() {
        let mut config = Config::default();
        config.notifications.renewal_days_before = 0;
        assert!(config.validate().is_err());
    }
}
