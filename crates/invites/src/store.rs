use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

use {
    chrono::{DateTime, Utc},
    serde::{Deserialize, Serialize},
    tracing::{debug, warn},
};

/// Metadata for one active invite, keyed externally by its code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InviteRecord {
    /// When the platform will expire the invite.
    pub expires_at: DateTime<Utc>,
    /// Maximum number of uses the invite was issued with.
    pub max_uses: u16,
}

/// Failure while persisting the store file.
///
/// Only `save` can fail; `load` recovers from every problem by returning an
/// empty map.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("invite store write: {0}")]
    Write(#[from] io::Error),

    #[error("invite store encode: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Whole-file JSON store of invite records.
///
/// Single-process sequential access only; concurrent load-modify-save
/// sequences are last-write-wins.
#[derive(Debug, Clone)]
pub struct InviteStore {
    path: PathBuf,
}

impl InviteStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the store file into a map.
    ///
    /// Missing, empty, or malformed content (including the legacy array
    /// format) yields an empty map rather than an error.
    pub fn load(&self) -> BTreeMap<String, InviteRecord> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return BTreeMap::new(),
            Err(e) => {
                warn!(path = %self.path.display(), "invite store unreadable: {e}");
                return BTreeMap::new();
            },
        };

        if raw.trim().is_empty() {
            return BTreeMap::new();
        }

        match serde_json::from_str::<serde_json::Value>(&raw) {
            Ok(value) if value.is_object() => {
                serde_json::from_value(value).unwrap_or_else(|e| {
                    warn!(path = %self.path.display(), "invite store has bad records: {e}");
                    BTreeMap::new()
                })
            },
            Ok(_) => {
                // Legacy array format from older deployments; discard.
                debug!(path = %self.path.display(), "invite store is not an object, resetting");
                BTreeMap::new()
            },
            Err(e) => {
                warn!(path = %self.path.display(), "invite store is corrupt: {e}");
                BTreeMap::new()
            },
        }
    }

    /// Rewrite the whole store file.
    ///
    /// Writes to a sibling temp file and renames it into place so a crash
    /// mid-write cannot leave a torn file behind.
    pub fn save(&self, records: &BTreeMap<String, InviteRecord>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let encoded = serde_json::to_string_pretty(records)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, encoded)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Insert or replace one record (load-modify-save).
    pub fn add(&self, code: &str, record: InviteRecord) -> Result<(), StoreError> {
        let mut records = self.load();
        records.insert(code.to_string(), record);
        self.save(&records)
    }

    /// Remove one record; returns whether the code was present.
    pub fn remove(&self, code: &str) -> Result<bool, StoreError> {
        let mut records = self.load();
        let removed = records.remove(code).is_some();
        if removed {
            self.save(&records)?;
        }
        Ok(removed)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use {super::*, chrono::TimeZone};

    fn record(max_uses: u16) -> InviteRecord {
        InviteRecord {
            expires_at: Utc.with_ymd_and_hms(2026, 9, 1, 12, 0, 0).unwrap(),
            max_uses,
        }
    }

    fn store_in(dir: &tempfile::TempDir) -> InviteStore {
        InviteStore::new(dir.path().join("invites.json"))
    }

    #[test]
    fn load_missing_file_returns_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(store_in(&dir).load().is_empty());
    }

    #[test]
    fn load_empty_file_returns_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "   \n").unwrap();
        assert!(store.load().is_empty());
    }

    #[test]
    fn load_invalid_json_returns_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "{not json").unwrap();
        assert!(store.load().is_empty());
    }

    #[test]
    fn load_legacy_array_returns_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), r#"[{"code": "old"}]"#).unwrap();
        assert!(store.load().is_empty());
    }

    #[test]
    fn load_object_with_bad_records_returns_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), r#"{"abc": {"expires_at": 42}}"#).unwrap();
        assert!(store.load().is_empty());
    }

    #[test]
    fn add_then_load_round_trips_exactly() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.add("abc123", record(10)).unwrap();

        let records = store.load();
        assert_eq!(records.len(), 1);
        assert_eq!(records.get("abc123"), Some(&record(10)));
    }

    #[test]
    fn remove_drops_the_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.add("abc123", record(10)).unwrap();
        store.add("def456", record(5)).unwrap();

        assert!(store.remove("abc123").unwrap());
        let records = store.load();
        assert!(!records.contains_key("abc123"));
        assert!(records.contains_key("def456"));
    }

    #[test]
    fn remove_unknown_code_is_a_noop() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert!(!store.remove("nope").unwrap());
        assert!(!store.path().exists(), "noop remove should not create a file");
    }

    #[test]
    fn add_replaces_existing_code() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.add("abc123", record(10)).unwrap();
        store.add("abc123", record(25)).unwrap();

        let records = store.load();
        assert_eq!(records.get("abc123").map(|r| r.max_uses), Some(25));
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn save_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = InviteStore::new(dir.path().join("nested/data/invites.json"));
        store.add("abc123", record(1)).unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn save_leaves_no_temp_file_behind() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.add("abc123", record(1)).unwrap();
        assert!(!store.path().with_extension("json.tmp").exists());
    }

    #[test]
    fn file_is_human_indented() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.add("abc123", record(1)).unwrap();
        let raw = fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains('\n'), "expected pretty-printed output: {raw}");
        assert!(raw.contains("  \"abc123\""), "expected indentation: {raw}");
    }
}
