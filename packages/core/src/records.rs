//! The normalized, immutable record types each orchestrator emits. These carry no
//! transient/ciphertext fields: decryption operates on an internal "raw row" type owned by
//! each reader module, which is consumed to produce the record types defined here.

use serde::Serialize;

use crate::timestamp::Timestamp;

#[derive(Debug, Clone, Serialize)]
pub struct LoginRecord {
    pub login_url: String,
    pub username: String,
    /// Valid UTF-8 plaintext, or empty when the value could not be decrypted.
    pub password: String,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Serialize)]
pub struct CookieRecord {
    pub host: String,
    pub path: String,
    pub name: String,
    pub value: String,
    pub is_secure: bool,
    pub is_http_only: bool,
    pub has_expire: bool,
    pub is_persistent: bool,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
}

#[derive(Debug, Clone, Serialize)]
pub struct HistoryRecord {
    pub url: String,
    pub title: String,
    pub visit_count: u32,
    pub last_visit_at: Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BookmarkKind {
    Url,
    Folder,
    Separator,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookmarkRecord {
    pub id: i64,
    pub name: String,
    pub kind: BookmarkKind,
    /// Empty iff `kind` is `Folder` or `Separator`.
    pub url: String,
    pub added_at: Timestamp,
}

impl BookmarkRecord {
    pub fn is_valid(&self) -> bool {
        match self.kind {
            BookmarkKind::Url => !self.url.is_empty(),
            BookmarkKind::Folder | BookmarkKind::Separator => self.url.is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folder_requires_empty_url() {
        let r = BookmarkRecord {
            id: 1,
            name: "Bar".into(),
            kind: BookmarkKind::Folder,
            url: String::new(),
            added_at: Timestamp::from_unix_s(0),
        };
        assert!(r.is_valid());

        let bad = BookmarkRecord {
            url: "https://x".into(),
            ..r
        };
        assert!(!bad.is_valid());
    }

    #[test]
    fn url_requires_nonempty_url() {
        let r = BookmarkRecord {
            id: 2,
            name: "X".into(),
            kind: BookmarkKind::Url,
            url: "https://x".into(),
            added_at: Timestamp::from_unix_s(0),
        };
        assert!(r.is_valid());
    }
}
