use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::domain::{SeenSet, SEEN_CAPACITY};
use crate::errors::{ScoutError, ScoutResult};
use crate::storage::traits::SeenStore;

/// Seen-set kept as a JSON array of ids, oldest first
pub struct JsonSeenStore {
    path: PathBuf,
    capacity: usize,
}

impl JsonSeenStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            capacity: SEEN_CAPACITY,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> ScoutResult<SeenSet> {
        let raw = fs::read_to_string(&self.path)?;
        let ids: Vec<String> = serde_json::from_str(&raw)?;
        Ok(ids.into_iter().collect())
    }

    fn write(&self, seen: &SeenSet) -> ScoutResult<()> {
        let mut bounded = seen.clone();
        bounded.truncate_oldest(self.capacity);
        let ids: Vec<&String> = bounded.iter().collect();
        let json = serde_json::to_string(&ids)?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        // Write beside the target, then rename over it
        let mut tmp = NamedTempFile::new_in(&dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path)
            .map_err(|e| ScoutError::Persistence(e.to_string()))?;

        Ok(())
    }
}

impl SeenStore for JsonSeenStore {
    fn load(&self) -> SeenSet {
        match self.read() {
            Ok(seen) => {
                tracing::debug!("Loaded {} seen ids from {}", seen.len(), self.path.display());
                seen
            }
            Err(ScoutError::Io(e)) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("No state file at {}, starting fresh", self.path.display());
                SeenSet::new()
            }
            Err(e) => {
                tracing::warn!(
                    "Ignoring unreadable state file {}: {}",
                    self.path.display(),
                    e
                );
                SeenSet::new()
            }
        }
    }

    fn save(&self, seen: &SeenSet) -> ScoutResult<()> {
        self.write(seen).map_err(|e| match e {
            ScoutError::Persistence(_) => e,
            other => ScoutError::Persistence(other.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, JsonSeenStore) {
        let dir = TempDir::new().unwrap();
        let store = JsonSeenStore::new(dir.path().join("seen.json"));
        (dir, store)
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let (_dir, store) = setup();
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_load_corrupt_file_is_empty() {
        let (_dir, store) = setup();
        fs::write(store.path(), "{not json").unwrap();
        assert!(store.load().is_empty());

        fs::write(store.path(), r#"{"ids": ["abc"]}"#).unwrap();
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_round_trip() {
        let (_dir, store) = setup();
        let seen: SeenSet = ["abc123", "def456", "ghi789"].into_iter().collect();

        store.save(&seen).unwrap();
        let loaded = store.load();

        assert_eq!(loaded.len(), 3);
        for id in seen.iter() {
            assert!(loaded.contains(id));
        }
    }

    #[test]
    fn test_written_as_json_array() {
        let (_dir, store) = setup();
        let seen: SeenSet = ["a", "b"].into_iter().collect();

        store.save(&seen).unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        assert_eq!(raw, r#"["a","b"]"#);
    }

    #[test]
    fn test_save_keeps_newest_ids() {
        let (_dir, store) = setup();
        let seen: SeenSet = (0..SEEN_CAPACITY + 150).map(|i| format!("id{}", i)).collect();

        store.save(&seen).unwrap();
        let loaded = store.load();

        assert_eq!(loaded.len(), SEEN_CAPACITY);
        assert!(!loaded.contains("id0"));
        assert!(!loaded.contains("id149"));
        assert!(loaded.contains("id150"));
        assert!(loaded.contains(&format!("id{}", SEEN_CAPACITY + 149)));
    }

    #[test]
    fn test_save_creates_parent_directory() {
        let dir = TempDir::new().unwrap();
        let store = JsonSeenStore::new(dir.path().join("state").join("seen.json"));

        store.save(&["abc"].into_iter().collect()).unwrap();

        assert!(store.load().contains("abc"));
    }

    #[test]
    fn test_save_replaces_previous_state() {
        let (_dir, store) = setup();

        store.save(&["old"].into_iter().collect()).unwrap();
        store.save(&["new"].into_iter().collect()).unwrap();

        let loaded = store.load();
        assert!(loaded.contains("new"));
        assert!(!loaded.contains("old"));
    }
}
