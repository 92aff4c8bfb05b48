//! Reads and decrypts Firefox's `logins.json` store.

use std::fs;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::Deserialize;
use thiserror::Error;

use crate::crypto::asn1::{self, Asn1Error};
use crate::crypto::des3;
use crate::records::LoginRecord;
use crate::snapshot::SnapshotError;
use crate::timestamp::Timestamp;

use super::key::FirefoxMasterKey;
use super::paths::PathProvider;

#[derive(Debug, Error)]
pub enum FirefoxPasswordsError {
    #[error("failed to snapshot logins.json: {0}")]
    Snapshot(#[from] SnapshotError),

    #[error("failed to read logins.json: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse logins.json: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct LoginsFile {
    logins: Vec<RawLogin>,
}

#[derive(Debug, Deserialize)]
struct RawLogin {
    hostname: String,
    #[serde(rename = "encryptedUsername")]
    encrypted_username: String,
    #[serde(rename = "encryptedPassword")]
    encrypted_password: String,
    #[serde(rename = "timeCreated")]
    time_created: i64,
}

/// Read, decrypt and normalize every saved login, sorted by `created_at` descending.
pub fn extract(
    path_provider: &PathProvider,
    scratch_dir: &std::path::Path,
    master_key: &FirefoxMasterKey,
) -> Result<Vec<LoginRecord>, FirefoxPasswordsError> {
    // logins.json is read directly: unlike the SQLite stores it is not subject to a WAL lock
    // that a running browser would hold, so a snapshot provides no safety benefit here, but a
    // plain read is taken to avoid tearing on a concurrent write.
    let contents = fs::read_to_string(path_provider.logins_json())?;
    let parsed: LoginsFile = serde_json::from_str(&contents)?;

    let mut records: Vec<LoginRecord> = parsed
        .logins
        .into_iter()
        .map(|raw| decrypt_row(raw, master_key))
        .collect();

    records.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    Ok(records)
}

fn decrypt_row(raw: RawLogin, master_key: &FirefoxMasterKey) -> LoginRecord {
    let username = decrypt_field(&raw.encrypted_username, master_key).unwrap_or_else(|| {
        tracing::debug!(host = %raw.hostname, "undecryptable username value");
        String::new()
    });
    let password = decrypt_field(&raw.encrypted_password, master_key).unwrap_or_else(|| {
        tracing::debug!(host = %raw.hostname, "undecryptable password value");
        String::new()
    });

    LoginRecord {
        login_url: raw.hostname,
        username,
        password,
        created_at: Timestamp::from_unix_us(raw.time_created * 1000),
    }
}

fn decrypt_field(encoded: &str, master_key: &FirefoxMasterKey) -> Option<String> {
    let der = BASE64.decode(encoded).ok()?;
    let envelope = parse_envelope(&der).ok()?;
    let iv: [u8; 8] = envelope.iv.try_into().ok()?;
    let plaintext = des3::decrypt(master_key.as_bytes(), &iv, &envelope.ciphertext).ok()?;
    String::from_utf8(plaintext.to_vec()).ok()
}

fn parse_envelope(der: &[u8]) -> Result<asn1::LoginEnvelope, Asn1Error> {
    asn1::parse_login_envelope(der)
}
