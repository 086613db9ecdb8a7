//! SQLite-backed certificate store
//!
//! Two tables: `certificates` (one row per domain) and `renewal_logs`
//! (append-only audit trail). Uniqueness and the status/type vocabularies are
//! enforced by SQL constraints.

use crate::error::Result;
use crate::types::{CertKind, CertStatus, CertificateRecord, RenewalLogEntry, ServiceKind};
use chrono::{Duration, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::str::FromStr;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS certificates (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    domain TEXT UNIQUE NOT NULL,
    type TEXT NOT NULL CHECK (type IN ('letsencrypt', 'self-signed')),
    status TEXT NOT NULL CHECK (status IN ('pending', 'active', 'failed')),
    issued_date TEXT,
    expiry_date TEXT,
    auto_renew BOOLEAN DEFAULT 1,
    service_type TEXT,
    container_name TEXT,
    created_at TEXT DEFAULT CURRENT_TIMESTAMP,
    updated_at TEXT DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS renewal_logs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    domain TEXT NOT NULL,
    action TEXT NOT NULL,
    status TEXT NOT NULL,
    message TEXT,
    timestamp TEXT DEFAULT CURRENT_TIMESTAMP
);
";

/// Certificate store handle
#[derive(Debug)]
pub struct CertStore {
    conn: Connection,
}

impl CertStore {
    /// Open (and if necessary create) the store at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.execute_batch(SCHEMA)?;

        Ok(Self { conn })
    }

    /// Open an in-memory store (tests)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Insert or replace a certificate request as `pending`
    pub fn upsert_pending(
        &self,
        domain: &str,
        kind: CertKind,
        service: ServiceKind,
        container_name: Option<&str>,
    ) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO certificates
             (domain, type, status, service_type, container_name, auto_renew)
             VALUES (?1, ?2, ?3, ?4, ?5, 1)",
            params![
                domain,
                kind.as_str(),
                CertStatus::Pending.as_str(),
                service.as_str(),
                container_name,
            ],
        )?;
        Ok(())
    }

    /// Update a certificate's status, recording an audit row
    pub fn update_status(
        &self,
        domain: &str,
        status: CertStatus,
        message: Option<&str>,
    ) -> Result<()> {
        self.conn.execute(
            "UPDATE certificates
             SET status = ?1, updated_at = CURRENT_TIMESTAMP
             WHERE domain = ?2",
            params![status.as_str(), domain],
        )?;

        self.log(domain, "status_update", status.as_str(), message)?;
        Ok(())
    }

    /// Record issue/expiry timestamps after successful generation
    pub fn update_expiry(&self, domain: &str, expiry_date: &str) -> Result<()> {
        self.conn.execute(
            "UPDATE certificates
             SET expiry_date = ?1, issued_date = CURRENT_TIMESTAMP
             WHERE domain = ?2",
            params![expiry_date, domain],
        )?;
        Ok(())
    }

    /// Fetch a single certificate by domain
    pub fn get(&self, domain: &str) -> Result<Option<CertificateRecord>> {
        let record = self
            .conn
            .query_row(
                "SELECT domain, type, status, issued_date, expiry_date,
                        auto_renew, service_type, container_name
                 FROM certificates WHERE domain = ?1",
                params![domain],
                row_to_record,
            )
            .optional()?;
        Ok(record)
    }

    /// All certificates, ordered by domain
    pub fn list(&self) -> Result<Vec<CertificateRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT domain, type, status, issued_date, expiry_date,
                    auto_renew, service_type, container_name
             FROM certificates ORDER BY domain",
        )?;

        let rows = stmt.query_map([], row_to_record)?;
        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }

    /// Active auto-renew certificates expiring within the horizon (or with
    /// no recorded expiry)
    pub fn due_for_renewal(&self, horizon_days: u32) -> Result<Vec<CertificateRecord>> {
        let horizon = (Utc::now() + Duration::days(i64::from(horizon_days))).to_rfc3339();

        let mut stmt = self.conn.prepare(
            "SELECT domain, type, status, issued_date, expiry_date,
                    auto_renew, service_type, container_name
             FROM certificates
             WHERE auto_renew = 1 AND status = 'active'
               AND (expiry_date < ?1 OR expiry_date IS NULL)
             ORDER BY domain",
        )?;

        let rows = stmt.query_map(params![horizon], row_to_record)?;
        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }

    /// Delete a certificate row, recording an audit row
    pub fn delete(&self, domain: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM certificates WHERE domain = ?1", params![domain])?;
        self.log(domain, "delete", "success", Some("Certificate deleted"))?;
        Ok(())
    }

    /// Append a renewal-log row
    pub fn log(&self, domain: &str, action: &str, status: &str, message: Option<&str>) -> Result<()> {
        self.conn.execute(
            "INSERT INTO renewal_logs (domain, action, status, message)
             VALUES (?1, ?2, ?3, ?4)",
            params![domain, action, status, message],
        )?;
        Ok(())
    }

    /// Most recent renewal-log rows, newest first
    pub fn recent_logs(&self, limit: u32) -> Result<Vec<RenewalLogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT domain, action, status, message, timestamp
             FROM renewal_logs
             ORDER BY timestamp DESC, id DESC
             LIMIT ?1",
        )?;

        let rows = stmt.query_map(params![limit], |row| {
            Ok(RenewalLogEntry {
                domain: row.get(0)?,
                action: row.get(1)?,
                status: row.get(2)?,
                message: row.get(3)?,
                timestamp: row.get(4)?,
            })
        })?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?);
        }
        Ok(entries)
    }
}

fn row_to_record(row: &Row<'_>) -> rusqlite::Result<CertificateRecord> {
    let kind: String = row.get(1)?;
    let status: String = row.get(2)?;
    let service: Option<String> = row.get(6)?;

    Ok(CertificateRecord {
        domain: row.get(0)?,
        kind: CertKind::from_str(&kind).unwrap_or(CertKind::Letsencrypt),
        status: CertStatus::from_str(&status).unwrap_or(CertStatus::Pending),
        issued_date: row.get(3)?,
        expiry_date: row.get(4)?,
        auto_renew: row.get(5)?,
        service: service
            .as_deref()
            .and_then(|s| ServiceKind::from_str(s).ok())
            .unwrap_or(ServiceKind::Other),
        container_name: row.get(7)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> CertStore {
        CertStore::open_in_memory().unwrap()
    }

    #[test]
    fn lifecycle_pending_to_active_writes_audit_rows() {
        let db = store();
        db.upsert_pending("example.com", CertKind::Letsencrypt, ServiceKind::Website, None)
            .unwrap();

        let record = db.get("example.com").unwrap().unwrap();
        assert_eq!(record.status, CertStatus::Pending);
        assert!(record.auto_renew);

        db.update_status("example.com", CertStatus::Active, None).unwrap();
        db.update_expiry("example.com", "2026-11-01T00:00:00+00:00").unwrap();

        let record = db.get("example.com").unwrap().unwrap();
        assert_eq!(record.status, CertStatus::Active);
        assert_eq!(record.expiry_date.as_deref(), Some("2026-11-01T00:00:00+00:00"));
        assert!(record.issued_date.is_some());

        let logs = db.recent_logs(10).unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].action, "status_update");
        assert_eq!(logs[0].status, "active");
    }

    #[test]
    fn upsert_replaces_existing_domain() {
        let db = store();
        db.upsert_pending("example.com", CertKind::Letsencrypt, ServiceKind::Website, None)
            .unwrap();
        db.update_status("example.com", CertStatus::Failed, Some("boom")).unwrap();

        // A second request for the same domain resets it to pending.
        db.upsert_pending("example.com", CertKind::SelfSigned, ServiceKind::Api, None)
            .unwrap();

        let all = db.list().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].status, CertStatus::Pending);
        assert_eq!(all[0].kind, CertKind::SelfSigned);
    }

    #[test]
    fn renewal_query_matches_expiring_and_unknown_expiry() {
        let db = store();
        for domain in ["soon.com", "later.com", "unknown.com", "manual.com"] {
            db.upsert_pending(domain, CertKind::Letsencrypt, ServiceKind::Website, None)
                .unwrap();
            db.update_status(domain, CertStatus::Active, None).unwrap();
        }

        let soon = (Utc::now() + Duration::days(5)).to_rfc3339();
        let later = (Utc::now() + Duration::days(90)).to_rfc3339();
        db.update_expiry("soon.com", &soon).unwrap();
        db.update_expiry("later.com", &later).unwrap();
        db.update_expiry("manual.com", &soon).unwrap();
        db.conn
            .execute("UPDATE certificates SET auto_renew = 0 WHERE domain = 'manual.com'", [])
            .unwrap();

        let due: Vec<String> = db
            .due_for_renewal(30)
            .unwrap()
            .into_iter()
            .map(|c| c.domain)
            .collect();
        assert_eq!(due, vec!["soon.com".to_string(), "unknown.com".to_string()]);
    }

    #[test]
    fn status_vocabulary_is_constrained() {
        let db = store();
        let result = db.conn.execute(
            "INSERT INTO certificates (domain, type, status) VALUES ('x.com', 'letsencrypt', 'unknown')",
            [],
        );
        assert!(result.is_err());
    }

    #[test]
    fn delete_removes_row_and_logs() {
        let db = store();
        db.upsert_pending("gone.com", CertKind::Letsencrypt, ServiceKind::Website, None)
            .unwrap();
        db.delete("gone.com").unwrap();

        assert!(db.get("gone.com").unwrap().is_none());
        let logs = db.recent_logs(5).unwrap();
        assert_eq!(logs[0].action, "delete");
    }
}
