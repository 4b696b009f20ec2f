//! Validation pipeline: structural rules merged with the external verdict
//!
//! The deterministic structural findings always run first and are handed to
//! the external validator as context. The external verdict supplies the
//! confidence score and any model-detected issues; when that call fails the
//! report degrades to the local findings and the fallback confidence
//! formula instead of propagating the failure.

use tracing::warn;
use xlate_core::{CloudProvider, ModelInfo, ResourceConfig, ValidationReport};
use xlate_validate::{check_structure, fallback_confidence};

use crate::service::ValidationService;

/// Validate a translated resource against its source.
///
/// Always produces a report; external-service failures degrade to the local
/// structural findings rather than surfacing as errors.
pub fn run_validation<V: ValidationService + ?Sized>(
    service: &V,
    source: &ResourceConfig,
    translated: &ResourceConfig,
    source_cloud: CloudProvider,
    target_cloud: CloudProvider,
    model: &ModelInfo,
) -> ValidationReport {
    // A translation that already carries an error indicator was never a
    // translation; there is nothing to validate
    if let Some(err) = translated.get("error").and_then(|v| v.as_str()) {
        return ValidationReport {
            confidence_score: 0,
            issues: vec![format!("Initial translation failed: {err}")],
            suggested_correction: None,
            validated: false,
            changes_applied: None,
            original_translation: None,
        };
    }

    let structural: Vec<String> = check_structure(source, translated)
        .iter()
        .map(|f| f.to_string())
        .collect();

    match service.validate(source, translated, source_cloud, target_cloud, model, &structural) {
        Ok(verdict) => {
            let mut issues = structural;
            issues.extend(verdict.issues);
            ValidationReport {
                confidence_score: verdict.confidence_score.min(100),
                issues,
                suggested_correction: verdict.suggested_correction,
                validated: true,
                changes_applied: None,
                original_translation: None,
            }
        }
        Err(err) => {
            warn!(%err, "LLM validation unavailable, falling back to structural findings");
            let confidence_score = fallback_confidence(structural.len());
            let suggested_correction = if structural.is_empty() {
                None
            } else {
                Some(translated.clone())
            };
            let mut issues = structural;
            issues.push(format!(
                "Note: LLM validation unavailable ({err}), using local validation only"
            ));
            ValidationReport {
                confidence_score,
                issues,
                suggested_correction,
                validated: true,
                changes_applied: None,
                original_translation: None,
            }
        }
    }
}
