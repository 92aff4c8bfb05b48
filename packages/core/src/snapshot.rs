//! Copies a browser-owned file to a scratch location so it can be read without racing the
//! live browser's file lock, and removes the copy on drop, whether or not extraction
//! succeeded. Grounded on the teacher's `get_connection` immutable-URI read-only open, extended
//! with an actual file copy: browsers hold stronger locks than a read-only SQLite URI can
//! always bypass, so a physical scratch copy is taken first.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use rusqlite::{Connection, OpenFlags};
use thiserror::Error;

static COUNTER: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to snapshot '{path}': {source}")]
    Copy {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// An RAII guard around a scratch copy of a browser-owned file. Dropping it deletes the copy.
pub struct Snapshot {
    path: PathBuf,
}

impl Snapshot {
    /// Copy `source` into `scratch_dir`, namespaced with the source's basename, the current
    /// process id, and a monotonic counter, so concurrent snapshots of the same source file
    /// never collide.
    pub fn take(source: &Path, scratch_dir: &Path) -> Result<Self, SnapshotError> {
        let basename = source
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("snapshot"));

        let unique = COUNTER.fetch_add(1, Ordering::Relaxed);
        let file_name = format!(
            "{}.{}.{unique}",
            basename.to_string_lossy(),
            std::process::id(),
        );
        let path = scratch_dir.join(file_name);

        fs::copy(source, &path).map_err(|err| SnapshotError::Copy {
            path: source.to_path_buf(),
            source: err,
        })?;

        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open the snapshot as a read-only, immutable SQLite connection.
    pub fn open_sqlite(&self) -> Result<Connection, rusqlite::Error> {
        const PREFIX_LEN: usize = "file:".len() + "?immutable=1".len();

        let db_path = self.path.as_os_str();
        let mut uri = OsString::with_capacity(PREFIX_LEN + db_path.len());
        uri.push("file:");
        uri.push(db_path);
        uri.push("?immutable=1");

        Connection::open_with_flags(
            uri,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_URI,
        )
    }
}

impl Drop for Snapshot {
    fn drop(&mut self) {
        if let Err(err) = fs::remove_file(&self.path) {
            tracing::debug!(path = %self.path.display(), error = %err, "failed to remove snapshot file");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn snapshot_copies_and_cleans_up() {
        let scratch = tempfile::tempdir().unwrap();
        let mut source = tempfile::NamedTempFile::new().unwrap();
        write!(source, "hello").unwrap();

        let snapshot_path = {
            let snapshot = Snapshot::take(source.path(), scratch.path()).unwrap();
            let path = snapshot.path().to_path_buf();
            assert!(path.exists());
            assert_eq!(fs::read_to_string(&path).unwrap(), "hello");
            path
        };

        assert!(!snapshot_path.exists());
    }

    #[test]
    fn concurrent_snapshots_of_the_same_source_do_not_collide() {
        let scratch = tempfile::tempdir().unwrap();
        let mut source = tempfile::NamedTempFile::new().unwrap();
        write!(source, "hello").unwrap();

        let a = Snapshot::take(source.path(), scratch.path()).unwrap();
        let b = Snapshot::take(source.path(), scratch.path()).unwrap();

        assert_ne!(a.path(), b.path());
    }
}
