//! Dispatches a `(Browser, ArtifactKind)` pair to the reader pipeline that owns it. Each
//! pipeline snapshots its store, derives whatever key it needs, decrypts, normalizes and sorts
//! entirely on its own; this module only picks the right one and folds its error into a single
//! type the CLI can report uniformly.

use std::path::Path;

use thiserror::Error;

use crate::browser::{Browser, ChromeVariant};
use crate::chrome;
use crate::firefox;
use crate::records::{BookmarkRecord, CookieRecord, HistoryRecord, LoginRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    Passwords,
    Cookies,
    History,
    Bookmarks,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 4] = [
        ArtifactKind::Passwords,
        ArtifactKind::Cookies,
        ArtifactKind::History,
        ArtifactKind::Bookmarks,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            ArtifactKind::Passwords => "passwords",
            ArtifactKind::Cookies => "cookies",
            ArtifactKind::History => "history",
            ArtifactKind::Bookmarks => "bookmarks",
        }
    }
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}

/// The normalized records produced by one `(Browser, ArtifactKind)` extraction.
pub enum ArtifactOutcome {
    Passwords(Vec<LoginRecord>),
    Cookies(Vec<CookieRecord>),
    History(Vec<HistoryRecord>),
    Bookmarks(Vec<BookmarkRecord>),
}

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error(transparent)]
    ChromePasswords(#[from] chrome::passwords::ChromePasswordsError),
    #[error(transparent)]
    ChromeCookies(#[from] chrome::cookies::ChromeCookiesError),
    #[error(transparent)]
    ChromeHistory(#[from] chrome::history::ChromeHistoryError),
    #[error(transparent)]
    ChromeBookmarks(#[from] chrome::bookmarks::ChromeBookmarksError),

    #[error(transparent)]
    FirefoxKey(#[from] firefox::key::FirefoxKeyError),
    #[error(transparent)]
    FirefoxPasswords(#[from] firefox::passwords::FirefoxPasswordsError),
    #[error(transparent)]
    FirefoxCookies(#[from] firefox::cookies::FirefoxCookiesError),
    #[error(transparent)]
    FirefoxHistory(#[from] firefox::history::FirefoxHistoryError),
    #[error(transparent)]
    FirefoxBookmarks(#[from] firefox::bookmarks::FirefoxBookmarksError),
}

/// Extract one kind of artifact for one browser.
///
/// `profile_dir`, when given, is used as the profile directory directly (bypassing the
/// platform default-profile lookup); this is how the CLI's `--profile-dir` override and tests
/// both operate. `master_password` is only consulted by the Firefox password pipeline.
pub fn extract(
    browser: Browser,
    kind: ArtifactKind,
    profile_dir: Option<&Path>,
    scratch_dir: &Path,
    master_password: &[u8],
) -> Result<ArtifactOutcome, OrchestratorError> {
    match browser {
        Browser::Firefox => extract_firefox(kind, profile_dir, scratch_dir, master_password),
        Browser::ChromeVariant(variant) => extract_chrome(variant, kind, profile_dir, scratch_dir),
    }
}

fn extract_firefox(
    kind: ArtifactKind,
    profile_dir: Option<&Path>,
    scratch_dir: &Path,
    master_password: &[u8],
) -> Result<ArtifactOutcome, OrchestratorError> {
    let paths = match profile_dir {
        Some(dir) => firefox::paths::PathProvider::from_root(dir),
        None => firefox::paths::PathProvider::default_profile(),
    };

    match kind {
        ArtifactKind::Passwords => {
            let key = firefox::key::derive(&paths, scratch_dir, master_password)?;
            let records = firefox::passwords::extract(&paths, scratch_dir, &key)?;
            Ok(ArtifactOutcome::Passwords(records))
        }
        ArtifactKind::Cookies => Ok(ArtifactOutcome::Cookies(firefox::cookies::extract(
            &paths,
            scratch_dir,
        )?)),
        ArtifactKind::History => Ok(ArtifactOutcome::History(firefox::history::extract(
            &paths,
            scratch_dir,
        )?)),
        ArtifactKind::Bookmarks => Ok(ArtifactOutcome::Bookmarks(firefox::bookmarks::extract(
            &paths,
            scratch_dir,
        )?)),
    }
}

fn extract_chrome(
    variant: ChromeVariant,
    kind: ArtifactKind,
    profile_dir: Option<&Path>,
    scratch_dir: &Path,
) -> Result<ArtifactOutcome, OrchestratorError> {
    let paths = match profile_dir {
        Some(dir) => chrome::paths::PathProvider::from_root(dir),
        None => chrome::paths::PathProvider::default_profile(variant),
    };

    match kind {
        ArtifactKind::Passwords => Ok(ArtifactOutcome::Passwords(chrome::passwords::extract(
            variant,
            &paths,
            scratch_dir,
        )?)),
        ArtifactKind::Cookies => Ok(ArtifactOutcome::Cookies(chrome::cookies::extract(
            variant,
            &paths,
            scratch_dir,
        )?)),
        ArtifactKind::History => Ok(ArtifactOutcome::History(chrome::history::extract(
            &paths,
            scratch_dir,
        )?)),
        ArtifactKind::Bookmarks => Ok(ArtifactOutcome::Bookmarks(chrome::bookmarks::extract(
            &paths,
            scratch_dir,
        )?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_kind_slugs_are_stable() {
        assert_eq!(ArtifactKind::Passwords.to_string(), "passwords");
        assert_eq!(ArtifactKind::Bookmarks.slug(), "bookmarks");
        assert_eq!(ArtifactKind::ALL.len(), 4);
    }
}
