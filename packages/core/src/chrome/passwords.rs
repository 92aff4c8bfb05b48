//! Reads and decrypts Chromium's `Login Data` SQLite store.

use thiserror::Error;

use crate::crypto::chrome_cipher;
use crate::records::LoginRecord;
use crate::snapshot::{Snapshot, SnapshotError};
use crate::timestamp::Timestamp;

use super::key::{ChromeKeyError, ChromiumKey};
use super::paths::PathProvider;
use super::ChromeVariant;

#[derive(Debug, Error)]
pub enum ChromePasswordsError {
    #[error("failed to snapshot Login Data: {0}")]
    Snapshot(#[from] SnapshotError),

    #[error("failed to open or query Login Data: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("failed to derive the decryption key: {0}")]
    Key(#[from] ChromeKeyError),
}

struct RawLogin {
    origin_url: String,
    username_value: String,
    password_value: Vec<u8>,
    date_created: i64,
}

/// Read, decrypt and normalize every saved password for `variant`'s profile at
/// `path_provider`, sorted by `created_at` descending.
pub fn extract(
    variant: ChromeVariant,
    path_provider: &PathProvider,
    scratch_dir: &std::path::Path,
) -> Result<Vec<LoginRecord>, ChromePasswordsError> {
    let snapshot = Snapshot::take(&path_provider.login_data(), scratch_dir)?;
    let conn = snapshot.open_sqlite()?;

    let mut stmt =
        conn.prepare("SELECT origin_url, username_value, password_value, date_created FROM logins")?;
    let rows = stmt
        .query_map([], |row| {
            Ok(RawLogin {
                origin_url: row.get(0)?,
                username_value: row.get(1)?,
                password_value: row.get(2)?,
                date_created: row.get(3)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let key = super::key::provide_key(variant, path_provider)?;

    let mut records: Vec<LoginRecord> = rows
        .into_iter()
        .map(|raw| decrypt_row(raw, key.as_ref()))
        .collect();

    records.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    Ok(records)
}

fn decrypt_row(raw: RawLogin, key: Option<&ChromiumKey>) -> LoginRecord {
    let password = match decrypt_value(&raw.password_value, key).and_then(|pt| String::from_utf8(pt).ok())
    {
        Some(password) => password,
        None => {
            tracing::debug!(url = %raw.origin_url, "undecryptable password value");
            String::new()
        }
    };

    LoginRecord {
        login_url: raw.origin_url,
        username: raw.username_value,
        password,
        created_at: Timestamp::from_chromium_password_date_created(raw.date_created),
    }
}

fn decrypt_value(blob: &[u8], key: Option<&ChromiumKey>) -> Option<Vec<u8>> {
    if let Some(ciphertext) = chrome_cipher::strip_version_prefix(blob) {
        let key = key?;
        chrome_cipher::decrypt(key.as_bytes(), ciphertext).ok()
    } else if blob.is_empty() {
        Some(Vec::new())
    } else {
        crate::unprotect::unprotect(blob).ok()
    }
}
