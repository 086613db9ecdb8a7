//! TLS certificate lifecycle management
//!
//! Certificates are tracked in the SQLite store and generated through one of
//! three paths: Traefik's ACME resolver (for domains it already routes),
//! standalone certbot in a one-shot container, or a locally minted
//! self-signed pair. Generation is confirmed by polling Traefik's ACME file
//! or the certbot live directory.

pub mod acme;
pub mod probe;

use crate::certdb::CertStore;
use crate::config::{Config, Paths};
use crate::error::{Error, Result};
use crate::types::{CertKind, CertStatus, CertificateRecord, RenewalLogEntry, ServiceKind};
use crate::{docker, utils};
use chrono::{Duration as ChronoDuration, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Traefik's ACME storage, as mounted by the infrastructure stack
const TRAEFIK_ACME_FILE: &str = "/var/lib/docker/volumes/traefik_letsencrypt/_data/acme.json";

/// certbot's live certificate directory
const LETSENCRYPT_LIVE_DIR: &str = "/etc/letsencrypt/live";

/// Poll budget for certificate generation: 30 attempts, 10 seconds apart
const GENERATION_ATTEMPTS: u32 = 30;
const GENERATION_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Certificate lifecycle manager
#[derive(Debug)]
pub struct SslManager {
    config: Config,
    paths: Paths,
    store: CertStore,
    acme_file: PathBuf,
    live_dir: PathBuf,
}

impl SslManager {
    /// Open the manager against the default store location
    pub fn new(config: Config, paths: Paths) -> Result<Self> {
        let store = CertStore::open(paths.cert_db())?;
        Ok(Self {
            config,
            paths,
            store,
            acme_file: PathBuf::from(TRAEFIK_ACME_FILE),
            live_dir: PathBuf::from(LETSENCRYPT_LIVE_DIR),
        })
    }

    /// Current configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Replace and persist the configuration
    pub fn update_config(&mut self, config: Config) -> Result<()> {
        config.validate()?;
        config.save(self.paths.manager_config())?;
        self.config = config;
        Ok(())
    }

    /// All tracked certificates
    pub fn certificates(&self) -> Result<Vec<CertificateRecord>> {
        self.store.list()
    }

    /// Recent renewal-log rows
    pub fn recent_logs(&self, limit: u32) -> Result<Vec<RenewalLogEntry>> {
        self.store.recent_logs(limit)
    }

    /// Request a certificate: record it as pending, then generate
    pub async fn add(
        &self,
        domain: &str,
        kind: CertKind,
        service: ServiceKind,
        container_name: Option<&str>,
    ) -> Result<()> {
        self.store
            .upsert_pending(domain, kind, service, container_name)?;
        self.generate(domain).await
    }

    /// Generate (or regenerate) the certificate for a tracked domain
    pub async fn generate(&self, domain: &str) -> Result<()> {
        let record = self
            .store
            .get(domain)?
            .ok_or_else(|| Error::CertificateNotFound(domain.to_string()))?;

        info!(domain, kind = %record.kind, "generating certificate");

        let result = match record.kind {
            CertKind::SelfSigned => self.generate_self_signed(domain),
            CertKind::Letsencrypt => {
                if self.is_traefik_managed(domain) {
                    self.generate_via_traefik(domain).await
                } else {
                    self.generate_standalone(domain)
                }
            }
        };

        if let Err(e) = &result {
            warn!(domain, error = %e, "certificate generation failed");
            self.store
                .update_status(domain, CertStatus::Failed, Some(&e.to_string()))?;
        }

        result
    }

    /// Whether any running container routes this domain through Traefik
    pub fn is_traefik_managed(&self, domain: &str) -> bool {
        let names = match docker::running_container_names() {
            Ok(names) => names,
            Err(_) => return false,
        };

        let host_rule = format!("Host(`{}`)", domain);
        for name in names {
            let labels = match docker::container_labels(&name) {
                Ok(labels) => labels,
                Err(_) => continue,
            };

            if labels.get("traefik.enable").map(String::as_str) != Some("true") {
                continue;
            }

            let routed = labels.iter().any(|(key, value)| {
                key.starts_with("traefik.http.routers.")
                    && key.ends_with(".rule")
                    && value.contains(&host_rule)
            });
            if routed {
                return true;
            }
        }

        false
    }

    async fn generate_via_traefik(&self, domain: &str) -> Result<()> {
        let traefik = &self.config.docker.traefik_container;
        if !docker::container_exists(traefik) {
            return Err(Error::certificate(
                domain,
                format!("Traefik container '{}' not found", traefik),
            ));
        }
        if !docker::container_running(traefik) {
            return Err(Error::certificate(domain, "Traefik container not running"));
        }

        // A request to the domain makes Traefik kick off ACME issuance.
        probe::trigger_request(domain).await;

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .expect("static spinner template"),
        );
        spinner.enable_steady_tick(Duration::from_millis(120));

        for attempt in 1..=GENERATION_ATTEMPTS {
            spinner.set_message(format!(
                "Waiting for certificate for {} ({}/{})",
                domain, attempt, GENERATION_ATTEMPTS
            ));

            if self.certificate_exists(domain) {
                spinner.finish_and_clear();
                self.mark_active(domain)?;
                info!(domain, "certificate generated through Traefik");
                return Ok(());
            }

            debug!(domain, attempt, "certificate not present yet");
            tokio::time::sleep(GENERATION_POLL_INTERVAL).await;
        }

        spinner.finish_and_clear();
        Err(Error::certificate(domain, "Generation timeout"))
    }

    fn generate_standalone(&self, domain: &str) -> Result<()> {
        let email = self.config.letsencrypt.email.as_str();

        let mut args: Vec<&str> = vec![
            "--rm",
            "-v",
            "/etc/letsencrypt:/etc/letsencrypt",
            "-v",
            "/var/lib/letsencrypt:/var/lib/letsencrypt",
            "-p",
            "80:80",
            "certbot/certbot:latest",
            "certonly",
            "--standalone",
            "--email",
            email,
            "--agree-tos",
            "--no-eff-email",
            "-d",
            domain,
        ];
        if self.config.letsencrypt.staging {
            args.push("--staging");
        }

        docker::run_one_shot(&args)
            .map_err(|e| Error::certificate(domain, format!("certbot failed: {}", e)))?;

        self.mark_active(domain)?;
        info!(domain, "standalone certificate generated");
        Ok(())
    }

    fn generate_self_signed(&self, domain: &str) -> Result<()> {
        let cert_dir = self.paths.data_dir().join("self-signed").join(domain);
        std::fs::create_dir_all(&cert_dir)?;

        let key_path = cert_dir.join(format!("{}.key", domain));
        let crt_path = cert_dir.join(format!("{}.crt", domain));
        let subject = format!("/CN={}", domain);

        utils::run_checked(
            "openssl",
            &[
                "req",
                "-x509",
                "-nodes",
                "-days",
                "365",
                "-newkey",
                "rsa:2048",
                "-keyout",
                key_path.to_str().unwrap_or_default(),
                "-out",
                crt_path.to_str().unwrap_or_default(),
                "-subj",
                &subject,
            ],
        )
        .map_err(|e| Error::certificate(domain, e.to_string()))?;

        let expiry = (Utc::now() + ChronoDuration::days(365)).to_rfc3339();
        self.store.update_status(domain, CertStatus::Active, None)?;
        self.store.update_expiry(domain, &expiry)?;
        info!(domain, "self-signed certificate generated");
        Ok(())
    }

    /// Whether the certificate is already present in Traefik's ACME file or
    /// certbot's live directory
    fn certificate_exists(&self, domain: &str) -> bool {
        if acme::file_contains(&self.acme_file, domain) {
            return true;
        }
        self.live_dir.join(domain).join("fullchain.pem").exists()
    }

    fn mark_active(&self, domain: &str) -> Result<()> {
        self.store.update_status(domain, CertStatus::Active, None)?;
        if let Some(expiry) = probe::certificate_expiry(domain) {
            self.store.update_expiry(domain, &expiry)?;
        }
        Ok(())
    }

    /// Regenerate every certificate due within the configured horizon,
    /// returning per-domain outcomes
    pub async fn renew_all(&self) -> Result<Vec<(String, bool)>> {
        let due = self
            .store
            .due_for_renewal(self.config.notifications.renewal_days_before)?;

        let mut results = Vec::with_capacity(due.len());
        for cert in due {
            info!(domain = %cert.domain, "renewing certificate");
            let ok = self.generate(&cert.domain).await.is_ok();
            results.push((cert.domain, ok));
        }
        Ok(results)
    }

    /// Probe every tracked domain and write back changed statuses, returning
    /// the domains whose status moved
    pub async fn check_all(&self) -> Result<Vec<(String, CertStatus)>> {
        let mut changed = Vec::new();
        for cert in self.store.list()? {
            let Some(status) = probe::https_status(&cert.domain).await else {
                continue;
            };
            if status != cert.status {
                self.store.update_status(&cert.domain, status, None)?;
                changed.push((cert.domain, status));
            }
        }
        Ok(changed)
    }

    /// Delete a certificate and its on-disk material
    pub fn delete(&self, domain: &str) -> Result<()> {
        self.store.delete(domain)?;

        let live_path = self.live_dir.join(domain);
        if live_path.exists() {
            std::fs::remove_dir_all(&live_path)?;
        }

        let self_signed = self.paths.data_dir().join("self-signed").join(domain);
        if self_signed.exists() {
            std::fs::remove_dir_all(&self_signed)?;
        }

        info!(domain, "certificate deleted");
        Ok(())
    }
}
