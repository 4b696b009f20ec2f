//! Interactive session handlers
//!
//! The UI re-executes its full script on every interaction, so all state a
//! handler needs lives in this explicit struct and every mutation goes
//! through it. There is no implicit global.

use tracing::info;
use xlate_cache::{CacheStats, ClearScope, TranslationStore};
use xlate_core::{ResourceConfig, ValidationReport, XlateError};
use xlate_diff::{detect_value_changes, ChangeSet};

/// What an accepted correction changed, reported back to the UI and folded
/// into the validation report
#[derive(Debug, Clone)]
pub struct AcceptanceRecord {
    pub changes_applied: ChangeSet,
    pub original_translation: ResourceConfig,
}

/// Application state for one interactive session. One active writer at a
/// time is assumed; see the store docs for the multi-writer caveat.
pub struct SessionState {
    store: TranslationStore,
}

impl SessionState {
    pub fn new(store: TranslationStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &TranslationStore {
        &self.store
    }

    /// Diff an AI-suggested correction against the current translation,
    /// without touching the cache. Shown to the user before acceptance.
    pub fn preview_correction(
        &self,
        current: &ResourceConfig,
        suggested: &ResourceConfig,
    ) -> ChangeSet {
        detect_value_changes(current, suggested)
    }

    /// Promote a suggested correction to be the entry's authoritative
    /// translation. Persists the acceptance (preserving entry provenance)
    /// and reports what changed versus the pre-acceptance translation.
    pub fn accept_correction(
        &self,
        key: &str,
        accepted: &ResourceConfig,
        current: &ResourceConfig,
    ) -> Result<AcceptanceRecord, XlateError> {
        self.store
            .store_validation_acceptance(key, accepted, current)?;

        let changes_applied = detect_value_changes(current, accepted);
        info!(
            key = &key[..key.len().min(16)],
            changes = changes_applied.change_count(),
            "validation correction accepted"
        );

        Ok(AcceptanceRecord {
            changes_applied,
            original_translation: current.clone(),
        })
    }

    /// Fold an acceptance into an existing validation report
    pub fn mark_accepted(&self, report: &mut ValidationReport, record: AcceptanceRecord) {
        report.changes_applied = Some(record.changes_applied);
        report.original_translation = Some(record.original_translation);
    }

    /// Apply a manual edit supplied as JSON text. Malformed input is
    /// rejected at this boundary with a diagnostic; the cache is only
    /// touched once the text parses as an object.
    pub fn apply_user_edit(
        &self,
        key: &str,
        edited_text: &str,
        current: &ResourceConfig,
    ) -> Result<ResourceConfig, XlateError> {
        let edited: ResourceConfig = serde_json::from_str(edited_text)
            .map_err(|e| XlateError::Parse(format!("edited translation is not valid JSON: {e}")))?;
        if !edited.is_object() {
            return Err(XlateError::Parse(
                "edited translation must be a JSON object".to_string(),
            ));
        }

        self.store.store_user_edit(key, &edited, current)?;
        Ok(edited)
    }

    /// Save a hand-edited cache file. Rejects malformed text without
    /// touching the prior on-disk state; returns the new entry count.
    pub fn save_cache_file(&self, text: &str) -> Result<usize, XlateError> {
        self.store.replace_contents(text)
    }

    pub fn clear_cache(&self, scope: ClearScope) -> Result<(), XlateError> {
        self.store.clear(scope)
    }

    pub fn invalidate(&self, key: &str) -> Result<(), XlateError> {
        self.store.invalidate(key)
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.store.stats()
    }
}
