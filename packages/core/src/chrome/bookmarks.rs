//! Reads Chromium's `Bookmarks` JSON file, walking the `roots` tree depth-first.

use std::fs;

use serde_json::Value;
use thiserror::Error;

use crate::records::{BookmarkKind, BookmarkRecord};
use crate::snapshot::{Snapshot, SnapshotError};
use crate::timestamp::Timestamp;

use super::paths::PathProvider;

#[derive(Debug, Error)]
pub enum ChromeBookmarksError {
    #[error("failed to snapshot Bookmarks: {0}")]
    Snapshot(#[from] SnapshotError),

    #[error("failed to read Bookmarks file: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse Bookmarks JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Bookmarks JSON is missing the expected 'roots' object")]
    MissingRoots,
}

/// Read and normalize the bookmark tree, sorted by `id` ascending.
pub fn extract(
    path_provider: &PathProvider,
    scratch_dir: &std::path::Path,
) -> Result<Vec<BookmarkRecord>, ChromeBookmarksError> {
    let snapshot = Snapshot::take(&path_provider.bookmarks_file(), scratch_dir)?;
    let contents = fs::read_to_string(snapshot.path())?;
    let root: Value = serde_json::from_str(&contents)?;

    let roots = root
        .get("roots")
        .and_then(Value::as_object)
        .ok_or(ChromeBookmarksError::MissingRoots)?;

    let mut records = Vec::new();
    for node in roots.values() {
        walk(node, &mut records);
    }

    records.sort_by_key(|r| r.id);

    Ok(records)
}

fn walk(node: &Value, out: &mut Vec<BookmarkRecord>) {
    let Some(id) = node
        .get("id")
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<i64>().ok())
    else {
        return;
    };

    let name = node
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let node_type = node.get("type").and_then(Value::as_str).unwrap_or_default();
    let date_added = node
        .get("date_added")
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<i64>().ok())
        .unwrap_or(0);

    let (kind, url) = match node_type {
        "url" => (
            BookmarkKind::Url,
            node.get("url")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        ),
        _ => (BookmarkKind::Folder, String::new()),
    };

    out.push(BookmarkRecord {
        id,
        name,
        kind,
        url,
        added_at: Timestamp::from_webkit_us(date_added),
    });

    if let Some(children) = node.get("children").and_then(Value::as_array) {
        for child in children {
            walk(child, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walks_tree_and_sorts_by_id() {
        let json = serde_json::json!({
            "roots": {
                "bookmark_bar": {
                    "id": "1",
                    "name": "Bar",
                    "type": "folder",
                    "date_added": "13200000000000000",
                    "children": [
                        {
                            "id": "2",
                            "name": "X",
                            "type": "url",
                            "url": "https://x",
                            "date_added": "13200000000000000"
                        }
                    ]
                }
            }
        });

        let roots = json.get("roots").and_then(Value::as_object).unwrap();
        let mut records = Vec::new();
        for node in roots.values() {
            walk(node, &mut records);
        }
        records.sort_by_key(|r| r.id);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, 1);
        assert_eq!(records[0].kind, BookmarkKind::Folder);
        assert_eq!(records[0].url, "");
        assert_eq!(records[1].id, 2);
        assert_eq!(records[1].kind, BookmarkKind::Url);
        assert_eq!(records[1].url, "https://x");
    }
}
