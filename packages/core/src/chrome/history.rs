//! Reads Chromium's `History` SQLite store. No decryption is involved.

use thiserror::Error;

use crate::records::HistoryRecord;
use crate::snapshot::{Snapshot, SnapshotError};
use crate::timestamp::Timestamp;

use super::paths::PathProvider;

#[derive(Debug, Error)]
pub enum ChromeHistoryError {
    #[error("failed to snapshot History: {0}")]
    Snapshot(#[from] SnapshotError),

    #[error("failed to open or query History: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

struct RawVisit {
    url: String,
    title: String,
    visit_count: i64,
    last_visit_time: i64,
}

/// Read and normalize browsing history, sorted by `visit_count` descending.
pub fn extract(
    path_provider: &PathProvider,
    scratch_dir: &std::path::Path,
) -> Result<Vec<HistoryRecord>, ChromeHistoryError> {
    let snapshot = Snapshot::take(&path_provider.history_database(), scratch_dir)?;
    let conn = snapshot.open_sqlite()?;

    let mut stmt = conn.prepare("SELECT url, title, visit_count, last_visit_time FROM urls")?;
    let rows = stmt
        .query_map([], |row| {
            Ok(RawVisit {
                url: row.get(0)?,
                title: row.get(1)?,
                visit_count: row.get(2)?,
                last_visit_time: row.get(3)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let mut records: Vec<HistoryRecord> = rows
        .into_iter()
        .map(|raw| HistoryRecord {
            url: raw.url,
            title: raw.title,
            visit_count: raw.visit_count.max(0) as u32,
            last_visit_at: Timestamp::from_webkit_us(raw.last_visit_time),
        })
        .collect();

    records.sort_by(|a, b| b.visit_count.cmp(&a.visit_count));

    Ok(records)
}
