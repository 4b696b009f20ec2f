//! Data Model: ResourceConfig, CacheEntry, ValidationReport
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use xlate_diff::ChangeSet;

/// A cloud resource description: an object-shaped JSON tree with the
/// conventional top-level fields `id`, `service`, `resource_type`, `region`,
/// `quantity` and `configuration`. Configuration trees have no fixed schema,
/// so the whole resource stays a recursive JSON value.
pub type ResourceConfig = serde_json::Value;

/// Identity of the model performing translation/validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Human-readable model name
    pub name: String,
    /// Model ARN (provisioned) or model ID (on-demand); the key-derivation
    /// component
    pub arn: String,
}

impl ModelInfo {
    pub fn new(name: impl Into<String>, arn: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arn: arn.into(),
        }
    }
}

/// One persisted cache record, keyed by a 64-char hex digest.
///
/// Everything except `translation` is optional with a default so that a
/// hand-edited cache file with missing metadata still parses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// The current authoritative translated resource
    pub translation: ResourceConfig,

    /// Translation superseded by the most recent edit/acceptance
    /// (history is one level deep)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_translation: Option<ResourceConfig>,

    /// Snapshot of the source resource at entry creation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_config: Option<ResourceConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_cloud: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_cloud: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_arn: Option<String>,

    /// Entry creation time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_accessed: Option<DateTime<Utc>>,

    #[serde(default)]
    pub access_count: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Set when the user manually edited the translation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edited_timestamp: Option<DateTime<Utc>>,

    #[serde(default)]
    pub validation_accepted: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_accepted_timestamp: Option<DateTime<Utc>>,
}

impl CacheEntry {
    /// Entry carrying a translation and nothing else; callers fill in
    /// whatever metadata applies
    pub fn new(translation: ResourceConfig) -> Self {
        Self {
            translation,
            original_translation: None,
            service_config: None,
            source_cloud: None,
            target_cloud: None,
            model_arn: None,
            timestamp: None,
            last_accessed: None,
            access_count: 0,
            version: None,
            edited_timestamp: None,
            validation_accepted: false,
            validation_accepted_timestamp: None,
        }
    }

    /// Whether the entry was touched by a user edit or an accepted
    /// validation correction
    pub fn is_user_edited(&self) -> bool {
        self.edited_timestamp.is_some() || self.validation_accepted_timestamp.is_some()
    }
}

/// Result of validating one translated resource against its source.
/// Derived fresh per validation request; only an accepted correction is
/// folded back into the cache entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// 0-100; from the external validator, or the local fallback formula
    pub confidence_score: u32,

    /// Human-readable findings, structural issues first
    pub issues: Vec<String>,

    /// Full replacement resource proposed by the validator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_correction: Option<ResourceConfig>,

    /// False only when the incoming translation already carried an error
    /// indicator and nothing was actually validated
    pub validated: bool,

    /// Populated once a suggested correction has been accepted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changes_applied: Option<ChangeSet>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_translation: Option<ResourceConfig>,
}
