//! Certificate probing: expiry via the `openssl` binary, liveness via HTTPS

use crate::error::{Error, Result};
use crate::types::CertStatus;
use chrono::{NaiveDateTime, TimeZone, Utc};
use std::io::Write;
use std::process::{Command, Stdio};
use std::time::Duration;

/// Read the served certificate's expiry for a domain, as RFC 3339
///
/// Shells out to `openssl s_client` and pipes the presented chain through
/// `openssl x509 -noout -dates`, the same way an operator would by hand.
pub fn certificate_expiry(domain: &str) -> Option<String> {
    let chain = s_client_output(domain)?;

    let mut child = Command::new("openssl")
        .args(["x509", "-noout", "-dates"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .ok()?;

    if let Some(mut stdin) = child.stdin.take() {
        let _ = stdin.write_all(chain.as_bytes());
    }

    let output = child.wait_with_output().ok()?;
    if !output.status.success() {
        return None;
    }

    String::from_utf8_lossy(&output.stdout)
        .lines()
        .find_map(|line| line.strip_prefix("notAfter=").map(str::to_string))
        .and_then(|date| parse_openssl_date(&date).ok())
}

fn s_client_output(domain: &str) -> Option<String> {
    let mut child = Command::new("openssl")
        .args([
            "s_client",
            "-connect",
            &format!("{}:443", domain),
            "-servername",
            domain,
        ])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .ok()?;

    // Closing stdin makes s_client hand back the session and exit.
    drop(child.stdin.take());

    let output = child.wait_with_output().ok()?;
    if output.status.success() {
        Some(String::from_utf8_lossy(&output.stdout).to_string())
    } else {
        None
    }
}

/// Parse openssl's `notAfter` date (`%b %d %H:%M:%S %Y %Z`) into RFC 3339
pub fn parse_openssl_date(raw: &str) -> Result<String> {
    // openssl pads single-digit days with an extra space; normalise first.
    let tokens: Vec<&str> = raw.split_whitespace().collect();
    if tokens.len() < 4 {
        return Err(Error::parse(format!("unexpected openssl date: {}", raw)));
    }

    let normalized = format!("{} {} {} {}", tokens[0], tokens[1], tokens[2], tokens[3]);
    let parsed = NaiveDateTime::parse_from_str(&normalized, "%b %d %H:%M:%S %Y")
        .map_err(|e| Error::parse(format!("invalid openssl date '{}': {}", raw, e)))?;

    Ok(Utc.from_utc_datetime(&parsed).to_rfc3339())
}

/// Classify a domain's live TLS state
///
/// `< 400` over verified HTTPS means the certificate is serving; a TLS-layer
/// failure means it is broken; any other connection problem reads as still
/// pending. An HTTP error status proves nothing about the certificate, so it
/// maps to `None` and the stored status is left alone.
pub async fn https_status(domain: &str) -> Option<CertStatus> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .ok()?;

    match client.get(format!("https://{}", domain)).send().await {
        Ok(response) if response.status().as_u16() < 400 => Some(CertStatus::Active),
        Ok(_) => None,
        Err(e) => {
            if is_certificate_error(&e) {
                Some(CertStatus::Failed)
            } else {
                Some(CertStatus::Pending)
            }
        }
    }
}

fn is_certificate_error(error: &reqwest::Error) -> bool {
    let mut source: Option<&(dyn std::error::Error + 'static)> = Some(error);
    while let Some(current) = source {
        let text = current.to_string().to_lowercase();
        if text.contains("certificate") || text.contains("tls") || text.contains("ssl") {
            return true;
        }
        source = current.source();
    }
    false
}

/// Fire a best-effort request at the domain so Traefik starts ACME issuance
pub async fn trigger_request(domain: &str) {
    let client = match reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .danger_accept_invalid_certs(true)
        .build()
    {
        Ok(client) => client,
        Err(_) => return,
    };

    if client.get(format!("https://{}", domain)).send().await.is_err() {
        let _ = client.get(format!("http://{}", domain)).send().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_padded_day() {
        let rfc = parse_openssl_date("Jun  4 11:04:38 2027 GMT").unwrap();
        assert!(rfc.starts_with("2027-06-04T11:04:38"));
    }

    #[test]
    fn parses_two_digit_day() {
        let rfc = parse_openssl_date("Nov 15 23:59:59 2026 GMT").unwrap();
        assert!(rfc.starts_with("2026-11-15T23:59:59"));
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_openssl_date("not a date").is_err());
    }
}
