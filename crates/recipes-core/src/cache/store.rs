use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tempfile::NamedTempFile;
use tracing::debug;

/// File name of the recipe snapshot inside the cache directory.
pub const SNAPSHOT_FILE: &str = "recipes.json";

/// Byte store for the last successful recipe response.
///
/// Holds the response exactly as received; nothing here parses or
/// validates it.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Store `recipes.json` inside `cache_dir`.
    pub fn in_dir(cache_dir: &Path) -> Self {
        Self::new(cache_dir.join(SNAPSHOT_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `None` if the snapshot is missing or empty.
    pub fn load(&self) -> Result<Option<Vec<u8>>> {
        read_non_empty(&self.path)
    }

    /// Atomically replace the snapshot with `bytes`.
    pub fn save(&self, bytes: &[u8]) -> Result<()> {
        atomic_write(&self.path, bytes)?;
        debug!(path = %self.path.display(), bytes = bytes.len(), "Saved recipe snapshot");
        Ok(())
    }

    /// Remove the snapshot. Succeeds if it is already gone.
    pub fn clear(&self) -> Result<()> {
        remove_if_exists(&self.path)
    }

    /// When the snapshot was last written.
    pub fn modified_at(&self) -> Option<DateTime<Utc>> {
        let metadata = std::fs::metadata(&self.path).ok()?;
        if metadata.len() == 0 {
            return None;
        }
        metadata.modified().ok().map(DateTime::<Utc>::from)
    }

    /// Human readable age of the snapshot, or "never".
    pub fn age_display(&self) -> String {
        match self.modified_at() {
            Some(at) => age_display(at, Utc::now()),
            None => "never".to_string(),
        }
    }
}

/// Read a file, mapping "missing" and "zero bytes" to `None`.
pub(crate) fn read_non_empty(path: &Path) -> Result<Option<Vec<u8>>> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read {}", path.display()));
        }
    };

    if bytes.is_empty() {
        return Ok(None);
    }
    Ok(Some(bytes))
}

/// Write `bytes` to a temp file next to `path`, fsync it, then rename it
/// over `path`. Readers see either the old file or the new one.
pub(crate) fn atomic_write(path: &Path, bytes: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)
        .with_context(|| format!("Failed to create directory {}", parent.display()))?;

    // Same directory as the target so the rename never crosses filesystems
    let mut temp = NamedTempFile::new_in(parent)
        .with_context(|| format!("Failed to create temp file in {}", parent.display()))?;
    temp.write_all(bytes)
        .with_context(|| format!("Failed to write temp file for {}", path.display()))?;
    temp.as_file()
        .sync_all()
        .with_context(|| format!("Failed to sync temp file for {}", path.display()))?;

    temp.persist(path)
        .with_context(|| format!("Failed to replace {}", path.display()))?;
    Ok(())
}

pub(crate) fn remove_if_exists(path: &Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            debug!(path = %path.display(), "Removed cache file");
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("Failed to remove {}", path.display())),
    }
}

/// Format the time between `then` and `now` the way the status line shows it.
pub fn age_display(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - then).num_minutes();
    if minutes < 1 {
        // Also covers clock skew (negative ages)
        "just now".to_string()
    } else if minutes < 60 {
        format!("{}m ago", minutes)
    } else if minutes < 1440 {
        let hours = minutes / 60;
        if minutes % 60 >= 30 {
            format!("{}h ago", hours + 1)
        } else {
            format!("{}h ago", hours)
        }
    } else {
        let days = minutes / 1440;
        if (minutes % 1440) / 60 >= 12 {
            format!("{}d ago", days + 1)
        } else {
            format!("{}d ago", days)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let store = SnapshotStore::in_dir(temp_dir.path());
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_load_empty_file_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let store = SnapshotStore::in_dir(temp_dir.path());
        std::fs::write(store.path(), b"").unwrap();
        assert!(store.load().unwrap().is_none());
        assert!(store.modified_at().is_none());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let store = SnapshotStore::in_dir(temp_dir.path());

        store.save(br#"{"recipes": []}"#).unwrap();
        assert_eq!(store.load().unwrap(), Some(br#"{"recipes": []}"#.to_vec()));
    }

    #[test]
    fn test_save_twice_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let store = SnapshotStore::in_dir(temp_dir.path());

        store.save(b"same bytes").unwrap();
        store.save(b"same bytes").unwrap();
        assert_eq!(store.load().unwrap(), Some(b"same bytes".to_vec()));
    }

    #[test]
    fn test_save_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let store = SnapshotStore::in_dir(temp_dir.path());

        store.save(b"a much longer first payload").unwrap();
        store.save(b"short").unwrap();
        assert_eq!(store.load().unwrap(), Some(b"short".to_vec()));
    }

    #[test]
    fn test_save_creates_parent_and_leaves_no_temp_files() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("nested").join("cache");
        let store = SnapshotStore::in_dir(&dir);

        store.save(b"payload").unwrap();

        let entries: Vec<_> = std::fs::read_dir(&dir)
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from(SNAPSHOT_FILE)]);
    }

    #[test]
    fn test_clear_then_load_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let store = SnapshotStore::in_dir(temp_dir.path());

        store.save(b"payload").unwrap();
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());

        // Clearing again is fine
        store.clear().unwrap();
    }

    #[test]
    fn test_age_display_for_fresh_snapshot() {
        let temp_dir = TempDir::new().unwrap();
        let store = SnapshotStore::in_dir(temp_dir.path());
        assert_eq!(store.age_display(), "never");

        store.save(b"payload").unwrap();
        assert_eq!(store.age_display(), "just now");
    }

    #[test]
    fn test_age_display_buckets() {
        let now = Utc::now();
        assert_eq!(age_display(now, now), "just now");
        assert_eq!(age_display(now + Duration::minutes(5), now), "just now");
        assert_eq!(age_display(now - Duration::minutes(5), now), "5m ago");
        assert_eq!(age_display(now - Duration::minutes(61), now), "1h ago");
        assert_eq!(age_display(now - Duration::minutes(90), now), "2h ago");
        assert_eq!(age_display(now - Duration::hours(25), now), "1d ago");
        assert_eq!(age_display(now - Duration::hours(36), now), "2d ago");
    }
}
