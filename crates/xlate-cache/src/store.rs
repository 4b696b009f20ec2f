//! Persistent translation store
//!
//! One JSON container file holds the whole key → entry mapping. Every
//! mutation is a read-entire-store / modify / write-entire-store cycle with
//! no locking; the design assumes a single interactive writer. Concurrent
//! writers racing the cycle lose updates (last writer wins at whole-file
//! granularity).

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{info, warn};
use xlate_core::{CacheEntry, CloudProvider, ResourceConfig, XlateError, CACHE_ENTRY_VERSION};

type Entries = BTreeMap<String, CacheEntry>;

/// Which entries a `clear` call removes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearScope {
    /// Truncate the whole store
    All,
    /// Also truncates the whole store, including user edits; kept this way
    /// until product intent says otherwise
    Translations,
    /// Remove only entries carrying an edit or acceptance timestamp
    Edits,
}

/// Store analytics
#[derive(Debug, Clone, PartialEq)]
pub struct CacheStats {
    pub total_entries: usize,
    pub user_edited_count: usize,
    /// On-disk size of the container file, rounded to two decimals
    pub size_mb: f64,
}

/// File-backed cache of translation results
pub struct TranslationStore {
    path: PathBuf,
}

impl TranslationStore {
    /// Open a store at `path` and create an empty container if none exists.
    /// Idempotent.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, XlateError> {
        let store = Self { path: path.into() };
        store.initialize()?;
        Ok(store)
    }

    /// Create the parent directory and an empty `{}` container if the file
    /// does not exist yet
    pub fn initialize(&self) -> Result<(), XlateError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        if !self.path.exists() {
            fs::write(&self.path, "{}")?;
        }
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole container. Unreadable or malformed files behave like
    /// an empty cache so the engine stays usable over a damaged store.
    fn load_all(&self) -> Entries {
        match fs::read_to_string(&self.path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(entries) => entries,
                Err(err) => {
                    warn!(path = %self.path.display(), %err, "cache file is malformed, treating as empty");
                    Entries::new()
                }
            },
            Err(err) => {
                if self.path.exists() {
                    warn!(path = %self.path.display(), %err, "cache file is unreadable, treating as empty");
                }
                Entries::new()
            }
        }
    }

    fn write_all(&self, entries: &Entries) -> Result<(), XlateError> {
        let text = serde_json::to_string_pretty(entries)
            .map_err(|e| XlateError::Cache(format!("failed to serialize cache: {e}")))?;
        fs::write(&self.path, text)?;
        Ok(())
    }

    /// Look up one entry. Fails soft: a corrupted store reads as absent.
    pub fn get(&self, key: &str) -> Option<CacheEntry> {
        self.load_all().remove(key)
    }

    /// Upsert one entry. The pre-read degrades to an empty map on failure,
    /// so the newest write persists even over a corrupted store.
    pub fn put(&self, key: &str, entry: CacheEntry) -> Result<(), XlateError> {
        let mut entries = self.load_all();
        entries.insert(key.to_string(), entry);
        self.write_all(&entries)
    }

    /// Create (or overwrite) the entry for a fresh translation result
    pub fn store_translation(
        &self,
        key: &str,
        translation: &ResourceConfig,
        service_config: &ResourceConfig,
        source_cloud: CloudProvider,
        target_cloud: CloudProvider,
        model_arn: &str,
    ) -> Result<(), XlateError> {
        let now = Utc::now();
        let mut entry = CacheEntry::new(translation.clone());
        entry.service_config = Some(service_config.clone());
        entry.source_cloud = Some(source_cloud.to_string());
        entry.target_cloud = Some(target_cloud.to_string());
        entry.model_arn = Some(model_arn.to_string());
        entry.timestamp = Some(now);
        entry.last_accessed = Some(now);
        entry.version = Some(CACHE_ENTRY_VERSION.to_string());
        self.put(key, entry)
    }

    /// Record a manual edit. The entry is replaced wholesale: translation,
    /// the superseded value, the edit timestamp and the version tag.
    pub fn store_user_edit(
        &self,
        key: &str,
        edited_translation: &ResourceConfig,
        previous_translation: &ResourceConfig,
    ) -> Result<(), XlateError> {
        let mut entry = CacheEntry::new(edited_translation.clone());
        entry.original_translation = Some(previous_translation.clone());
        entry.edited_timestamp = Some(Utc::now());
        entry.version = Some(CACHE_ENTRY_VERSION.to_string());
        self.put(key, entry)
    }

    /// Fold an accepted validation correction into the cache. All metadata
    /// on an existing entry is preserved; only the translation, the
    /// superseded value and the acceptance fields change. Synthesizes a
    /// minimal entry when none exists.
    pub fn store_validation_acceptance(
        &self,
        key: &str,
        accepted_translation: &ResourceConfig,
        previous_translation: &ResourceConfig,
    ) -> Result<(), XlateError> {
        let now = Utc::now();
        let mut entry = match self.get(key) {
            Some(existing) => existing,
            None => {
                let mut fresh = CacheEntry::new(accepted_translation.clone());
                fresh.timestamp = Some(now);
                fresh.version = Some(CACHE_ENTRY_VERSION.to_string());
                fresh
            }
        };

        entry.translation = accepted_translation.clone();
        entry.original_translation = Some(previous_translation.clone());
        entry.validation_accepted = true;
        entry.validation_accepted_timestamp = Some(now);
        entry.last_accessed = Some(now);
        self.put(key, entry)?;

        info!(
            key = &key[..key.len().min(16)],
            id = accepted_translation.get("id").and_then(|v| v.as_str()).unwrap_or("unknown"),
            "cache updated with validation acceptance"
        );
        Ok(())
    }

    /// Bump the access counter and refresh `last_accessed`. No-op when the
    /// key is absent.
    pub fn update_access_count(&self, key: &str) -> Result<(), XlateError> {
        let mut entries = self.load_all();
        if let Some(entry) = entries.get_mut(key) {
            entry.access_count += 1;
            entry.last_accessed = Some(Utc::now());
            self.write_all(&entries)?;
        }
        Ok(())
    }

    /// Store analytics for the UI sidebar
    pub fn stats(&self) -> CacheStats {
        let entries = self.load_all();
        let user_edited_count = entries.values().filter(|e| e.is_user_edited()).count();
        let bytes = fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0);
        let size_mb = (bytes as f64 / (1024.0 * 1024.0) * 100.0).round() / 100.0;

        CacheStats {
            total_entries: entries.len(),
            user_edited_count,
            size_mb,
        }
    }

    /// Remove entries per the scope rules
    pub fn clear(&self, scope: ClearScope) -> Result<(), XlateError> {
        match scope {
            ClearScope::All | ClearScope::Translations => {
                fs::write(&self.path, "{}")?;
                info!(path = %self.path.display(), "cache cleared");
            }
            ClearScope::Edits => {
                let mut entries = self.load_all();
                let before = entries.len();
                entries.retain(|_, entry| !entry.is_user_edited());
                self.write_all(&entries)?;
                info!(removed = before - entries.len(), "user-edited cache entries cleared");
            }
        }
        Ok(())
    }

    /// Remove one entry if present; no-op otherwise
    pub fn invalidate(&self, key: &str) -> Result<(), XlateError> {
        let mut entries = self.load_all();
        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }

    /// Save boundary for a hand-edited container file. The text must parse
    /// as a well-formed key → entry map; malformed input is rejected and the
    /// prior on-disk state is left untouched. Returns the entry count.
    pub fn replace_contents(&self, text: &str) -> Result<usize, XlateError> {
        let entries: Entries = serde_json::from_str(text)
            .map_err(|e| XlateError::Parse(format!("edited cache is not a valid entry map: {e}")))?;
        self.write_all(&entries)?;
        Ok(entries.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn store_in(dir: &tempfile::TempDir) -> TranslationStore {
        TranslationStore::open(dir.path().join("translations_cache.json")).unwrap()
    }

    fn translation() -> ResourceConfig {
        json!({"id": "db1", "service": "Cloud SQL", "region": "us-central1"})
    }

    fn source() -> ResourceConfig {
        json!({"id": "db1", "service": "RDS", "region": "us-east-1"})
    }

    #[test]
    fn open_creates_an_empty_container() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/cache.json");
        let store = TranslationStore::open(&path).unwrap();
        assert!(path.exists());
        assert_eq!(store.stats().total_entries, 0);

        // Re-opening must not clobber existing contents
        store.store_translation("k", &translation(), &source(), CloudProvider::Aws, CloudProvider::Gcp, "arn:x").unwrap();
        let reopened = TranslationStore::open(&path).unwrap();
        assert_eq!(reopened.stats().total_entries, 1);
    }

    #[test]
    fn store_translation_round_trips() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        store.store_translation("k1", &translation(), &source(), CloudProvider::Aws, CloudProvider::Gcp, "arn:x").unwrap();

        let entry = store.get("k1").unwrap();
        assert_eq!(entry.translation, translation());
        assert_eq!(entry.service_config, Some(source()));
        assert_eq!(entry.source_cloud.as_deref(), Some("aws"));
        assert_eq!(entry.target_cloud.as_deref(), Some("gcp"));
        assert_eq!(entry.model_arn.as_deref(), Some("arn:x"));
        assert_eq!(entry.version.as_deref(), Some("1.0"));
        assert!(entry.timestamp.is_some());
        assert!(!entry.is_user_edited());
    }

    #[test]
    fn get_on_missing_key_is_none() {
        let dir = tempdir().unwrap();
        assert!(store_in(&dir).get("absent").is_none());
    }

    #[test]
    fn corrupted_store_reads_as_empty_but_still_accepts_writes() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "{ this is not json").unwrap();

        assert!(store.get("k1").is_none());
        assert_eq!(store.stats().total_entries, 0);

        // The attempted write must survive the corrupt pre-read
        store.store_translation("k1", &translation(), &source(), CloudProvider::Aws, CloudProvider::Gcp, "arn:x").unwrap();
        assert_eq!(store.get("k1").unwrap().translation, translation());
        assert_eq!(store.stats().total_entries, 1);
    }

    #[test]
    fn acceptance_preserves_provenance() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        store.store_translation("k1", &translation(), &source(), CloudProvider::Aws, CloudProvider::Gcp, "arn:x").unwrap();

        let corrected = json!({"id": "db1", "service": "Cloud SQL", "region": "us-central1", "tier": "db-custom-2"});
        store.store_validation_acceptance("k1", &corrected, &translation()).unwrap();

        let entry = store.get("k1").unwrap();
        assert_eq!(entry.translation, corrected);
        assert_eq!(entry.original_translation, Some(translation()));
        assert!(entry.validation_accepted);
        assert!(entry.validation_accepted_timestamp.is_some());
        // Provenance from the original entry survives
        assert_eq!(entry.service_config, Some(source()));
        assert_eq!(entry.source_cloud.as_deref(), Some("aws"));
        assert_eq!(entry.target_cloud.as_deref(), Some("gcp"));
        assert_eq!(entry.model_arn.as_deref(), Some("arn:x"));
        assert!(entry.timestamp.is_some());
    }

    #[test]
    fn acceptance_without_prior_entry_synthesizes_one() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        store.store_validation_acceptance("k1", &translation(), &source()).unwrap();

        let entry = store.get("k1").unwrap();
        assert_eq!(entry.translation, translation());
        assert!(entry.validation_accepted);
        assert!(entry.timestamp.is_some());
        assert_eq!(entry.version.as_deref(), Some("1.0"));
    }

    #[test]
    fn user_edit_replaces_the_entry() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        store.store_translation("k1", &translation(), &source(), CloudProvider::Aws, CloudProvider::Gcp, "arn:x").unwrap();

        let edited = json!({"id": "db1", "service": "Cloud SQL", "region": "europe-west1"});
        store.store_user_edit("k1", &edited, &translation()).unwrap();

        let entry = store.get("k1").unwrap();
        assert_eq!(entry.translation, edited);
        assert_eq!(entry.original_translation, Some(translation()));
        assert!(entry.edited_timestamp.is_some());
        assert!(entry.is_user_edited());
    }

    #[test]
    fn access_count_bumps_and_refreshes() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        store.store_translation("k1", &translation(), &source(), CloudProvider::Aws, CloudProvider::Gcp, "arn:x").unwrap();

        store.update_access_count("k1").unwrap();
        store.update_access_count("k1").unwrap();
        assert_eq!(store.get("k1").unwrap().access_count, 2);

        // Missing key is a no-op, not an error
        store.update_access_count("absent").unwrap();
        assert!(store.get("absent").is_none());
    }

    #[test]
    fn clear_scopes() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        store.store_translation("plain", &translation(), &source(), CloudProvider::Aws, CloudProvider::Gcp, "arn:x").unwrap();
        store.store_user_edit("edited", &translation(), &source()).unwrap();
        store.store_validation_acceptance("accepted", &translation(), &source()).unwrap();

        store.clear(ClearScope::Edits).unwrap();
        assert!(store.get("plain").is_some());
        assert!(store.get("edited").is_none());
        assert!(store.get("accepted").is_none());
        assert_eq!(store.get("plain").unwrap().translation, translation());

        store.clear(ClearScope::All).unwrap();
        assert_eq!(store.stats().total_entries, 0);
    }

    #[test]
    fn clear_translations_also_wipes_edits() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        store.store_user_edit("edited", &translation(), &source()).unwrap();

        store.clear(ClearScope::Translations).unwrap();
        assert_eq!(store.stats().total_entries, 0);
    }

    #[test]
    fn invalidate_removes_one_entry() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        store.store_translation("k1", &translation(), &source(), CloudProvider::Aws, CloudProvider::Gcp, "arn:x").unwrap();
        store.store_translation("k2", &translation(), &source(), CloudProvider::Aws, CloudProvider::Azure, "arn:x").unwrap();

        store.invalidate("k1").unwrap();
        assert!(store.get("k1").is_none());
        assert!(store.get("k2").is_some());

        // Absent key is a no-op
        store.invalidate("k1").unwrap();
    }

    #[test]
    fn stats_count_edited_entries() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        store.store_translation("plain", &translation(), &source(), CloudProvider::Aws, CloudProvider::Gcp, "arn:x").unwrap();
        store.store_user_edit("edited", &translation(), &source()).unwrap();

        let stats = store.stats();
        assert_eq!(stats.total_entries, 2);
        assert_eq!(stats.user_edited_count, 1);
        assert!(stats.size_mb >= 0.0);
    }

    #[test]
    fn replace_contents_rejects_malformed_input() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        store.store_translation("k1", &translation(), &source(), CloudProvider::Aws, CloudProvider::Gcp, "arn:x").unwrap();

        let err = store.replace_contents("{ not valid").unwrap_err();
        assert!(err.to_string().starts_with("PARSE/"));
        // Prior state is untouched
        assert_eq!(store.get("k1").unwrap().translation, translation());

        // A well-formed map replaces the store wholesale
        let count = store
            .replace_contents(r#"{"k2": {"translation": {"id": "vm1"}}}"#)
            .unwrap();
        assert_eq!(count, 1);
        assert!(store.get("k1").is_none());
        assert_eq!(store.get("k2").unwrap().translation, json!({"id": "vm1"}));
    }
}
