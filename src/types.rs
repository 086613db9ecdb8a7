//! Core type definitions for DevForge

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// Certificate provisioning mechanism
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CertKind {
    /// Issued by Let's Encrypt (Traefik resolver or standalone certbot)
    Letsencrypt,
    /// Locally generated self-signed certificate
    SelfSigned,
}

impl CertKind {
    /// Stable text form used in the store and on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            CertKind::Letsencrypt => "letsencrypt",
            CertKind::SelfSigned => "self-signed",
        }
    }
}

impl std::fmt::Display for CertKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CertKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "letsencrypt" => Ok(CertKind::Letsencrypt),
            "self-signed" => Ok(CertKind::SelfSigned),
            other => Err(Error::parse(format!("unknown certificate type: {}", other))),
        }
    }
}

/// Certificate lifecycle status
///
/// Created `pending`, transitions to `active` on successful generation and
/// `failed` on error. The store enforces the same three values with a CHECK
/// constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CertStatus {
    /// Requested, generation not yet confirmed
    Pending,
    /// Certificate present and serving
    Active,
    /// Generation or validation failed
    Failed,
}

impl CertStatus {
    /// Stable text form used in the store
    pub fn as_str(&self) -> &'static str {
        match self {
            CertStatus::Pending => "pending",
            CertStatus::Active => "active",
            CertStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for CertStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CertStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(CertStatus::Pending),
            "active" => Ok(CertStatus::Active),
            "failed" => Ok(CertStatus::Failed),
            other => Err(Error::parse(format!("unknown certificate status: {}", other))),
        }
    }
}

/// Kind of service a certificate fronts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceKind {
    /// Plain website
    Website,
    /// API backend
    Api,
    /// A specific Docker container
    Docker,
    /// Anything else
    Other,
}

impl ServiceKind {
    /// Stable text form used in the store
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceKind::Website => "website",
            ServiceKind::Api => "api",
            ServiceKind::Docker => "docker",
            ServiceKind::Other => "other",
        }
    }

    /// All variants, menu order
    pub fn all() -> [ServiceKind; 4] {
        [
            ServiceKind::Website,
            ServiceKind::Api,
            ServiceKind::Docker,
            ServiceKind::Other,
        ]
    }
}

impl std::fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "website" => Ok(ServiceKind::Website),
            "api" => Ok(ServiceKind::Api),
            "docker" => Ok(ServiceKind::Docker),
            "other" => Ok(ServiceKind::Other),
            other => Err(Error::parse(format!("unknown service type: {}", other))),
        }
    }
}

/// A certificate row from the store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CertificateRecord {
    /// Domain name, unique per row
    pub domain: String,
    /// Provisioning mechanism
    pub kind: CertKind,
    /// Lifecycle status
    pub status: CertStatus,
    /// RFC 3339 issue timestamp, if known
    pub issued_date: Option<String>,
    /// RFC 3339 expiry timestamp, if known
    pub expiry_date: Option<String>,
    /// Whether the renewal pass may regenerate this certificate
    pub auto_renew: bool,
    /// Kind of service fronted
    pub service: ServiceKind,
    /// Container name, for docker services
    pub container_name: Option<String>,
}

/// An audit row from the renewal log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenewalLogEntry {
    /// Domain the action applied to
    pub domain: String,
    /// Action recorded (status_update, delete, ...)
    pub action: String,
    /// Status at the time of the action
    pub status: String,
    /// Free-form detail
    pub message: Option<String>,
    /// Store-assigned timestamp
    pub timestamp: String,
}

/// Project category, decides where the project lives on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectKind {
    /// Utility/script project under ~/scripts
    Script,
    /// Website project under ~/sites/<domain>
    Website,
    /// WordPress site under ~/sites/<domain>
    Wordpress,
}

impl std::fmt::Display for ProjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjectKind::Script => write!(f, "script"),
            ProjectKind::Website => write!(f, "website"),
            ProjectKind::Wordpress => write!(f, "wordpress"),
        }
    }
}

/// Aggregate container state of a compose project
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectStatus {
    /// Every container running
    Running,
    /// Some containers running
    Partial,
    /// Containers exist but none running
    Stopped,
    /// No containers created yet
    NotCreated,
    /// Status could not be determined
    Unknown,
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjectStatus::Running => write!(f, "Running"),
            ProjectStatus::Partial => write!(f, "Partial"),
            ProjectStatus::Stopped => write!(f, "Stopped"),
            ProjectStatus::NotCreated => write!(f, "Not Created"),
            ProjectStatus::Unknown => write!(f, "Unknown"),
        }
    }
}

/// A discovered project on disk
#[derive(Debug, Clone)]
pub struct ProjectInfo {
    /// Directory name (project name or domain)
    pub name: String,
    /// Absolute path
    pub path: PathBuf,
    /// Script or website
    pub kind: ProjectKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cert_enums_round_trip_store_text() {
        for kind in [CertKind::Letsencrypt, CertKind::SelfSigned] {
            assert_eq!(kind.as_str().parse::<CertKind>().unwrap(), kind);
        }
        for status in [CertStatus::Pending, CertStatus::Active, CertStatus::Failed] {
            assert_eq!(status.as_str().parse::<CertStatus>().unwrap(), status);
        }
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!("unknown".parse::<CertStatus>().is_err());
        assert!("wildcard".parse::<CertKind>().is_err());
    }
}
