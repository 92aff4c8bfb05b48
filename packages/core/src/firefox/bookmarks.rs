//! Reads Firefox's `places.sqlite` bookmark tables. `moz_bookmarks` stores the URL only as a
//! foreign key into `moz_places`, so a lookup table is built in a first pass.

use std::collections::HashMap;

use thiserror::Error;

use crate::records::{BookmarkKind, BookmarkRecord};
use crate::snapshot::{Snapshot, SnapshotError};
use crate::timestamp::Timestamp;

use super::paths::PathProvider;

#[derive(Debug, Error)]
pub enum FirefoxBookmarksError {
    #[error("failed to snapshot places.sqlite: {0}")]
    Snapshot(#[from] SnapshotError),

    #[error("failed to open or query places.sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// `moz_bookmarks.type`: 1 = bookmark, 2 = folder, 3 = separator.
const TYPE_BOOKMARK: i64 = 1;
const TYPE_FOLDER: i64 = 2;
const TYPE_SEPARATOR: i64 = 3;

struct RawBookmark {
    id: i64,
    kind: i64,
    place_id: Option<i64>,
    title: Option<String>,
    date_added: i64,
}

/// Read and normalize the bookmark tree, sorted by `id` ascending.
pub fn extract(
    path_provider: &PathProvider,
    scratch_dir: &std::path::Path,
) -> Result<Vec<BookmarkRecord>, FirefoxBookmarksError> {
    let snapshot = Snapshot::take(&path_provider.places_database(), scratch_dir)?;
    let conn = snapshot.open_sqlite()?;

    let mut url_by_place_id: HashMap<i64, String> = HashMap::new();
    let mut place_stmt = conn.prepare("SELECT id, url FROM moz_places")?;
    let place_rows = place_stmt.query_map([], |row| {
        Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
    })?;
    for row in place_rows {
        let (id, url) = row?;
        url_by_place_id.insert(id, url);
    }
    drop(place_stmt);

    let mut stmt =
        conn.prepare("SELECT id, type, fk, title, dateAdded FROM moz_bookmarks")?;
    let rows = stmt
        .query_map([], |row| {
            Ok(RawBookmark {
                id: row.get(0)?,
                kind: row.get(1)?,
                place_id: row.get(2)?,
                title: row.get(3)?,
                date_added: row.get(4)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let mut records: Vec<BookmarkRecord> = rows
        .into_iter()
        .filter_map(|raw| normalize(raw, &url_by_place_id))
        .collect();

    records.sort_by_key(|r| r.id);

    Ok(records)
}

fn normalize(raw: RawBookmark, url_by_place_id: &HashMap<i64, String>) -> Option<BookmarkRecord> {
    let kind = match raw.kind {
        TYPE_BOOKMARK => BookmarkKind::Url,
        TYPE_FOLDER => BookmarkKind::Folder,
        TYPE_SEPARATOR => BookmarkKind::Separator,
        _ => return None,
    };

    let url = match kind {
        BookmarkKind::Url => raw
            .place_id
            .and_then(|id| url_by_place_id.get(&id))
            .cloned()
            .unwrap_or_default(),
        BookmarkKind::Folder | BookmarkKind::Separator => String::new(),
    };

    Some(BookmarkRecord {
        id: raw.id,
        name: raw.title.unwrap_or_default(),
        kind,
        url,
        added_at: Timestamp::from_unix_us(raw.date_added),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_url_via_place_id_lookup() {
        let mut urls = HashMap::new();
        urls.insert(42, "https://example.com".to_string());

        let raw = RawBookmark {
            id: 7,
            kind: TYPE_BOOKMARK,
            place_id: Some(42),
            title: Some("Example".into()),
            date_added: 1_600_000_000_000_000,
        };

        let record = normalize(raw, &urls).unwrap();
        assert_eq!(record.url, "https://example.com");
        assert!(record.is_valid());
    }

    #[test]
    fn folder_has_no_url() {
        let raw = RawBookmark {
            id: 1,
            kind: TYPE_FOLDER,
            place_id: None,
            title: Some("Bar".into()),
            date_added: 0,
        };

        let record = normalize(raw, &HashMap::new()).unwrap();
        assert_eq!(record.url, "");
        assert!(record.is_valid());
    }
}
