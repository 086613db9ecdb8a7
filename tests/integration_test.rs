//! Integration tests for DevForge

use devforge::{
    certdb::CertStore,
    config::{Config, Paths},
    types::{CertKind, CertStatus, ServiceKind},
    versions,
};
use tempfile::TempDir;

#[test]
fn config_save_and_load_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.yml");

    let mut config = Config::default();
    config.letsencrypt.email = "ops@devforge.test".to_string();
    config.letsencrypt.staging = true;
    config.notifications.renewal_days_before = 14;

    config.save(&path).unwrap();
    let loaded = Config::from_file(&path).unwrap();

    assert_eq!(loaded.letsencrypt.email, "ops@devforge.test");
    assert!(loaded.letsencrypt.staging);
    assert_eq!(loaded.notifications.renewal_days_before, 14);
    assert_eq!(loaded.docker.traefik_container, "traefik");
    assert!(loaded.validate().is_ok());
}

#[test]
fn config_first_run_writes_defaults() {
    let home = TempDir::new().unwrap();
    let paths = Paths::rooted_at(home.path());

    assert!(!paths.manager_config().exists());
    let config = Config::load_or_init(&paths).unwrap();
    assert!(paths.manager_config().exists());
    assert_eq!(config.notifications.renewal_days_before, 30);

    // Second load reads the file it just wrote.
    let again = Config::load_or_init(&paths).unwrap();
    assert_eq!(again.letsencrypt.email, config.letsencrypt.email);
}

#[test]
fn paths_follow_the_standard_layout() {
    let paths = Paths::rooted_at("/home/dev");
    assert_eq!(paths.cert_db().to_str().unwrap(), "/home/dev/.ssl-manager/ssl_manager.db");
    assert_eq!(paths.manager_config().to_str().unwrap(), "/home/dev/.ssl-manager/config.yml");
    assert_eq!(paths.scripts_dir().to_str().unwrap(), "/home/dev/scripts");
    assert_eq!(paths.sites_dir().to_str().unwrap(), "/home/dev/sites");
    assert_eq!(paths.templates_dir().to_str().unwrap(), "/home/dev/docker/templates");
    assert_eq!(
        paths.versions_config().to_str().unwrap(),
        "/home/dev/config/versions/versions.yml"
    );
}

#[test]
fn cert_store_persists_across_reopens() {
    let home = TempDir::new().unwrap();
    let paths = Paths::rooted_at(home.path());

    {
        let store = CertStore::open(paths.cert_db()).unwrap();
        store
            .upsert_pending("persist.test", CertKind::Letsencrypt, ServiceKind::Website, None)
            .unwrap();
        store
            .update_status("persist.test", CertStatus::Active, None)
            .unwrap();
    }

    let store = CertStore::open(paths.cert_db()).unwrap();
    let cert = store.get("persist.test").unwrap().unwrap();
    assert_eq!(cert.status, CertStatus::Active);
    assert_eq!(cert.kind, CertKind::Letsencrypt);

    let logs = store.recent_logs(10).unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].domain, "persist.test");
}

#[test]
fn docker_service_certificates_keep_their_container() {
    let store = CertStore::open_in_memory().unwrap();
    store
        .upsert_pending(
            "svc.test",
            CertKind::SelfSigned,
            ServiceKind::Docker,
            Some("svc-container"),
        )
        .unwrap();

    let cert = store.get("svc.test").unwrap().unwrap();
    assert_eq!(cert.service, ServiceKind::Docker);
    assert_eq!(cert.container_name.as_deref(), Some("svc-container"));
}

#[test]
fn version_table_defaults_are_complete() {
    let config = versions::default_config();
    assert_eq!(config.tools["php"].default_version, "8.2");
    assert_eq!(config.tools["python"].default_version, "3.11");
    assert_eq!(config.tools["wordpress"].php_version.as_deref(), Some("8.2"));
    assert_eq!(
        config.tools["laravel"].installer.as_deref(),
        Some("composer create-project laravel/laravel:{version}")
    );
    assert!(config.preferences.check_latest);
    assert_eq!(config.preferences.cache_duration, 24);
}

#[test]
fn version_manager_persists_default_changes() {
    let home = TempDir::new().unwrap();
    let paths = Paths::rooted_at(home.path());

    let mut manager = devforge::VersionManager::load(&paths).unwrap();
    manager.set_default_version("php", "8.3").unwrap();

    let reloaded = devforge::VersionManager::load(&paths).unwrap();
    assert_eq!(reloaded.default_version("php"), "8.3");
    assert_eq!(reloaded.default_version("node"), "18");
}

#[test]
fn dockerfile_generation_respects_stored_defaults() {
    let home = TempDir::new().unwrap();
    let paths = Paths::rooted_at(home.path());

    let manager = devforge::VersionManager::load(&paths).unwrap();
    let dockerfile = manager.generate_dockerfile("python", "3.12").unwrap();
    assert!(dockerfile.starts_with("FROM python:3.12-slim"));
    assert!(dockerfile.contains("fastapi uvicorn requests pytest black flake8"));

    assert!(manager.generate_dockerfile("laravel", "10").is_err());
}
