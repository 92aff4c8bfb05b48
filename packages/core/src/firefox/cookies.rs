//! Reads Firefox's `cookies.sqlite` store. Firefox stores cookie values in plaintext; no
//! decryption is involved.

use thiserror::Error;

use crate::records::CookieRecord;
use crate::snapshot::{Snapshot, SnapshotError};
use crate::timestamp::Timestamp;

use super::paths::PathProvider;

#[derive(Debug, Error)]
pub enum FirefoxCookiesError {
    #[error("failed to snapshot cookies.sqlite: {0}")]
    Snapshot(#[from] SnapshotError),

    #[error("failed to open or query cookies.sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

struct RawCookie {
    name: String,
    value: String,
    host: String,
    path: String,
    creation_time: i64,
    expiry: i64,
    is_secure: i64,
    is_http_only: i64,
}

/// Read and normalize every cookie, in insertion order grouped by host.
pub fn extract(
    path_provider: &PathProvider,
    scratch_dir: &std::path::Path,
) -> Result<Vec<CookieRecord>, FirefoxCookiesError> {
    let snapshot = Snapshot::take(&path_provider.cookies_database(), scratch_dir)?;
    let conn = snapshot.open_sqlite()?;

    let mut stmt = conn.prepare(
        "SELECT name, value, host, path, creationTime, expiry, isSecure, isHttpOnly \
         FROM moz_cookies",
    )?;
    let rows = stmt
        .query_map([], |row| {
            Ok(RawCookie {
                name: row.get(0)?,
                value: row.get(1)?,
                host: row.get(2)?,
                path: row.get(3)?,
                creation_time: row.get(4)?,
                expiry: row.get(5)?,
                is_secure: row.get(6)?,
                is_http_only: row.get(7)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let mut records: Vec<CookieRecord> = rows.into_iter().map(normalize).collect();

    records.sort_by(|a, b| a.host.cmp(&b.host));

    Ok(records)
}

fn normalize(raw: RawCookie) -> CookieRecord {
    CookieRecord {
        host: raw.host,
        path: raw.path,
        name: raw.name,
        value: raw.value,
        is_secure: raw.is_secure != 0,
        is_http_only: raw.is_http_only != 0,
        has_expire: raw.expiry != 0,
        is_persistent: true,
        created_at: Timestamp::from_unix_us(raw.creation_time),
        expires_at: Timestamp::from_unix_s(raw.expiry),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_flags_and_epochs() {
        let raw = RawCookie {
            name: "sid".into(),
            value: "abc".into(),
            host: ".example.com".into(),
            path: "/".into(),
            creation_time: 1_600_000_000_000_000,
            expiry: 1_700_000_000,
            is_secure: 1,
            is_http_only: 0,
        };

        let record = normalize(raw);
        assert!(record.is_secure);
        assert!(!record.is_http_only);
        assert!(record.has_expire);
        assert_eq!(record.created_at.to_unix_us(), 1_600_000_000_000_000);
        assert_eq!(record.expires_at.to_unix_s(), 1_700_000_000);
    }
}
