//! Traefik ACME storage parsing
//!
//! Traefik persists issued certificates in a JSON file keyed by resolver
//! name. Only the domain bookkeeping is read here; keys and chains stay
//! untouched.

use crate::error::Result;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// One resolver's slice of the ACME file
#[derive(Debug, Deserialize)]
pub struct AcmeResolver {
    /// Certificates issued through this resolver
    #[serde(rename = "Certificates")]
    pub certificates: Option<Vec<AcmeCertificate>>,
}

/// A single issued certificate entry
#[derive(Debug, Deserialize)]
pub struct AcmeCertificate {
    /// Domains the certificate covers
    pub domain: Option<AcmeDomain>,
}

/// Main domain plus subject alternative names
#[derive(Debug, Deserialize)]
pub struct AcmeDomain {
    /// Primary domain
    pub main: Option<String>,
    /// Subject alternative names
    pub sans: Option<Vec<String>>,
}

/// Whether the ACME JSON text contains a certificate for the domain,
/// checking `main` and `sans` across every resolver
pub fn document_contains(json: &str, domain: &str) -> Result<bool> {
    let resolvers: HashMap<String, serde_json::Value> = serde_json::from_str(json)?;

    for value in resolvers.into_values() {
        let resolver: AcmeResolver = match serde_json::from_value(value) {
            Ok(resolver) => resolver,
            // Non-resolver entries (metadata keys) are skipped.
            Err(_) => continue,
        };

        for cert in resolver.certificates.unwrap_or_default() {
            let Some(cert_domain) = cert.domain else { continue };
            if cert_domain.main.as_deref() == Some(domain) {
                return Ok(true);
            }
            if cert_domain
                .sans
                .unwrap_or_default()
                .iter()
                .any(|san| san == domain)
            {
                return Ok(true);
            }
        }
    }

    Ok(false)
}

/// Whether the ACME file on disk contains a certificate for the domain
pub fn file_contains(path: &Path, domain: &str) -> bool {
    match std::fs::read_to_string(path) {
        Ok(content) => document_contains(&content, domain).unwrap_or(false),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACME_FIXTURE: &str = r#"{
        "letsencrypt": {
            "Account": {"Email": "admin@example.com"},
            "Certificates": [
                {
                    "domain": {"main": "example.com", "sans": ["www.example.com"]},
                    "certificate": "ZmFrZQ==",
                    "key": "ZmFrZQ==",
                    "Store": "default"
                }
            ]
        },
        "staging": {
            "Certificates": null
        }
    }"#;

    #[test]
    fn finds_main_domain() {
        assert!(document_contains(ACME_FIXTURE, "example.com").unwrap());
    }

    #[test]
    fn finds_san_domain() {
        assert!(document_contains(ACME_FIXTURE, "www.example.com").unwrap());
    }

    #[test]
    fn misses_absent_domain() {
        assert!(!document_contains(ACME_FIXTURE, "other.com").unwrap());
    }

    #[test]
    fn tolerates_null_certificate_lists() {
        assert!(!document_contains(r#"{"resolver": {"Certificates": null}}"#, "x.com").unwrap());
    }
}
