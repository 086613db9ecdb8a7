//! Error types for DevForge
//!
//! Context-rich error handling shared by every subsystem.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for DevForge operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for DevForge
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Certificate lifecycle errors
    #[error("Certificate error for {domain}: {message}")]
    Certificate {
        /// Domain the certificate belongs to
        domain: String,
        /// Error message
        message: String,
    },

    /// Certificate not present in the store
    #[error("Certificate not found: {0}")]
    CertificateNotFound(String),

    /// Project template errors
    #[error("Template error in {name}: {message}")]
    Template {
        /// Template name
        name: String,
        /// Error message
        message: String,
    },

    /// Template not found
    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    /// Project not found
    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    /// External command failure
    #[error("Command '{program}' failed: {message}")]
    CommandFailed {
        /// Program that was invoked
        program: String,
        /// Captured stderr or exit description
        message: String,
    },

    /// Docker engine missing or daemon not running
    #[error("Docker unavailable: {0}")]
    DockerUnavailable(String),

    /// Server provisioning task failure
    #[error("Provisioning task '{task}' failed: {message}")]
    Provision {
        /// Task name
        task: String,
        /// Error message
        message: String,
    },

    /// Parsing errors
    #[error("Parse error: {0}")]
    Parse(String),

    /// YAML parsing error
    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Certificate store error
    #[error("Certificate store error: {0}")]
    Database(#[from] rusqlite::Error),

    /// HTTP request error
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// Git repository error
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    /// Interactive prompt error
    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),
}

impl Error {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Error::Config(message.into())
    }

    /// Create a certificate error
    pub fn certificate(domain: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Certificate {
            domain: domain.into(),
            message: message.into(),
        }
    }

    /// Create a template error
    pub fn template(name: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Template {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create a command failure error
    pub fn command(program: impl Into<String>, message: impl Into<String>) -> Self {
        Error::CommandFailed {
            program: program.into(),
            message: message.into(),
        }
    }

    /// Create a provisioning error
    pub fn provision(task: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Provision {
            task: task.into(),
            message: message.into(),
        }
    }

    /// Create a parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Error::Parse(message.into())
    }
}
