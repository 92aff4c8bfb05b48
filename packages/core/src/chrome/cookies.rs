//! Reads and decrypts Chromium's `Cookies` SQLite store.

use thiserror::Error;

use crate::crypto::chrome_cipher;
use crate::records::CookieRecord;
use crate::snapshot::{Snapshot, SnapshotError};
use crate::timestamp::Timestamp;

use super::key::{ChromeKeyError, ChromiumKey};
use super::paths::PathProvider;
use super::ChromeVariant;

#[derive(Debug, Error)]
pub enum ChromeCookiesError {
    #[error("failed to snapshot Cookies: {0}")]
    Snapshot(#[from] SnapshotError),

    #[error("failed to open or query Cookies: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("failed to derive the decryption key: {0}")]
    Key(#[from] ChromeKeyError),
}

struct RawCookie {
    name: String,
    encrypted_value: Vec<u8>,
    host_key: String,
    path: String,
    creation_utc: i64,
    expires_utc: i64,
    is_secure: i64,
    is_httponly: i64,
    has_expires: i64,
    is_persistent: i64,
}

/// Read, decrypt and normalize every cookie for `variant`'s profile at `path_provider`,
/// in insertion order grouped by host.
pub fn extract(
    variant: ChromeVariant,
    path_provider: &PathProvider,
    scratch_dir: &std::path::Path,
) -> Result<Vec<CookieRecord>, ChromeCookiesError> {
    let snapshot = Snapshot::take(&path_provider.cookies_database(), scratch_dir)?;
    let conn = snapshot.open_sqlite()?;

    let mut stmt = conn.prepare(
        "SELECT name, encrypted_value, host_key, path, creation_utc, expires_utc, \
         is_secure, is_httponly, has_expires, is_persistent FROM cookies",
    )?;
    let rows = stmt
        .query_map([], |row| {
            Ok(RawCookie {
                name: row.get(0)?,
                encrypted_value: row.get(1)?,
                host_key: row.get(2)?,
                path: row.get(3)?,
                creation_utc: row.get(4)?,
                expires_utc: row.get(5)?,
                is_secure: row.get(6)?,
                is_httponly: row.get(7)?,
                has_expires: row.get(8)?,
                is_persistent: row.get(9)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let key = super::key::provide_key(variant, path_provider)?;

    let mut records: Vec<CookieRecord> = rows
        .into_iter()
        .map(|raw| decrypt_row(raw, key.as_ref()))
        .collect();

    // Insertion order grouped by host: a stable sort by host preserves the relative order
    // within each host group.
    records.sort_by(|a, b| a.host.cmp(&b.host));

    Ok(records)
}

fn decrypt_row(raw: RawCookie, key: Option<&ChromiumKey>) -> CookieRecord {
    let value = if raw.encrypted_value.is_empty() {
        Some(String::new())
    } else {
        decrypt_value(&raw.encrypted_value, key).and_then(|pt| String::from_utf8(pt).ok())
    };

    let value = value.unwrap_or_else(|| {
        tracing::debug!(host = %raw.host_key, name = %raw.name, "undecryptable cookie value");
        String::new()
    });

    CookieRecord {
        host: raw.host_key,
        path: raw.path,
        name: raw.name,
        value,
        is_secure: raw.is_secure != 0,
        is_http_only: raw.is_httponly != 0,
        has_expire: raw.has_expires != 0,
        is_persistent: raw.is_persistent != 0,
        created_at: Timestamp::from_webkit_us(raw.creation_utc),
        expires_at: Timestamp::from_webkit_us(raw.expires_utc),
    }
}

fn decrypt_value(blob: &[u8], key: Option<&ChromiumKey>) -> Option<Vec<u8>> {
    if let Some(ciphertext) = chrome_cipher::strip_version_prefix(blob) {
        let key = key?;
        chrome_cipher::decrypt(key.as_bytes(), ciphertext).ok()
    } else {
        crate::unprotect::unprotect(blob).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booleans_derive_from_nonzero_integers() {
        let raw = RawCookie {
            name: "s".into(),
            encrypted_value: Vec::new(),
            host_key: ".x".into(),
            path: "/".into(),
            creation_utc: 0,
            expires_utc: 0,
            is_secure: 1,
            is_httponly: 0,
            has_expires: 1,
            is_persistent: 0,
        };

        let record = decrypt_row(raw, None);
        assert!(record.is_secure);
        assert!(!record.is_http_only);
        assert!(record.has_expire);
        assert!(!record.is_persistent);
    }
}
