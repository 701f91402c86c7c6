use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use super::{ScoreKey, ScoreRecord, ScoreStore};

/// Stores each record as `<root>/scores/<user_id>/<timestamp_millis>.json`
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// File a key maps to, after checking the user id is a single path segment
    pub fn path_for(&self, key: &ScoreKey) -> Result<PathBuf> {
        let user = key.user_id.as_str();
        if user.is_empty()
            || user == "."
            || user == ".."
            || user.contains(['/', '\\'])
            || user.contains('\0')
        {
            anyhow::bail!("invalid user id for score path: {:?}", user);
        }

        Ok(self
            .root
            .join("scores")
            .join(user)
            .join(format!("{}.json", key.timestamp_millis)))
    }
}

impl ScoreStore for JsonFileStore {
    fn write(&self, key: &ScoreKey, record: &ScoreRecord) -> Result<()> {
        let path = self.path_for(key)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }

        let json = serde_json::to_string_pretty(record).context("Failed to serialize score")?;

        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .with_context(|| format!("Failed to create score file {:?}", path))?;

        fill_or_remove(file, &path, json.as_bytes())
    }

    fn describe(&self) -> String {
        format!("json files under {:?}", self.root)
    }
}

/// Write one record body; a half-written file is removed so the key stays free
fn fill_or_remove(mut file: impl Write, path: &Path, body: &[u8]) -> Result<()> {
    let written = file
        .write_all(body)
        .and_then(|_| file.write_all(b"\n"))
        .and_then(|_| file.flush());

    if let Err(e) = written {
        if let Err(cleanup) = fs::remove_file(path) {
            tracing::warn!(path = ?path, error = %cleanup, "Failed to remove partial score file");
        }
        return Err(e).with_context(|| format!("Failed to write score to {:?}", path));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(score: u32) -> ScoreRecord {
        ScoreRecord {
            user_name: "Ana".to_string(),
            score,
            date: "2023-11-14T22:13:20.123Z".to_string(),
        }
    }

    #[test]
    fn test_write_creates_keyed_file() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path());
        let key = ScoreKey::new("uid-1", 1_700_000_000_123);

        store.write(&key, &record(30)).unwrap();

        let path = dir.path().join("scores/uid-1/1700000000123.json");
        let saved: ScoreRecord =
            serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(saved, record(30));
    }

    #[test]
    fn test_never_overwrites() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path());
        let key = ScoreKey::new("uid-1", 5);

        store.write(&key, &record(10)).unwrap();
        assert!(store.write(&key, &record(99)).is_err());

        let saved: ScoreRecord =
            serde_json::from_str(&fs::read_to_string(store.path_for(&key).unwrap()).unwrap())
                .unwrap();
        assert_eq!(saved.score, 10);
    }

    #[test]
    fn test_rejects_path_like_user_ids() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path());

        for user in ["", "..", ".", "a/b", "a\\b"] {
            let key = ScoreKey::new(user, 1);
            assert!(store.write(&key, &record(1)).is_err(), "accepted {:?}", user);
        }
        assert!(!dir.path().join("scores").exists());
    }

    struct BrokenDisk;

    impl Write for BrokenDisk {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("disk full"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_failed_write_leaves_no_partial_file() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path());
        let key = ScoreKey::new("uid-1", 7);
        let path = store.path_for(&key).unwrap();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, b"").unwrap();

        let err = fill_or_remove(BrokenDisk, &path, b"{}").unwrap_err();
        assert!(err.to_string().contains("Failed to write score"));
        assert!(!path.exists());

        // The key is free again for a retry.
        store.write(&key, &record(70)).unwrap();
        let saved: ScoreRecord =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved.score, 70);
    }

    #[test]
    fn test_separate_users_separate_dirs() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path());

        store.write(&ScoreKey::new("a", 1), &record(1)).unwrap();
        store.write(&ScoreKey::new("b", 1), &record(2)).unwrap();

        assert!(dir.path().join("scores/a/1.json").is_file());
        assert!(dir.path().join("scores/b/1.json").is_file());
    }
}
