// DevForge: Interactive manager for Docker-based development environments
// Copyright (c) 2024 DevForge Core Team

//! # DevForge Library
//!
//! Scaffolds local development projects behind Docker Compose, tracks TLS
//! certificates in a local SQLite store, manages tool version defaults for
//! generated Dockerfiles, and provisions remote development servers.

#![warn(
    missing_docs,
    rust_2018_idioms,
    unused_qualifications,
    missing_debug_implementations
)]
#![forbid(unsafe_code)]

// Core modules
pub mod banner;
pub mod buildsys;
pub mod certdb;
pub mod config;
pub mod docker;
pub mod dotfiles;
pub mod error;
pub mod menu;
pub mod output;
pub mod project;
pub mod server;
pub mod ssl;
pub mod template;
pub mod types;
pub mod utils;
pub mod versions;
pub mod wordpress;

// Re-exports for convenience
pub use crate::config::{Config, Paths};
pub use crate::error::{Error, Result};
pub use crate::ssl::SslManager;
pub use crate::template::TemplateManager;
pub use crate::types::{CertKind, CertStatus, CertificateRecord, ProjectKind, ServiceKind};
pub use crate::versions::VersionManager;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    pub use crate::config::{Config, Paths};
    pub use crate::error::{Error, Result};
    pub use crate::ssl::SslManager;
    pub use crate::template::TemplateManager;
    pub use crate::types::{
        CertKind, CertStatus, CertificateRecord, ProjectKind, ProjectStatus, RenewalLogEntry,
        ServiceKind,
    };
    pub use crate::versions::VersionManager;
}
