//! Batch translation runner
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use xlate_cache::{derive_key, TranslationStore};
use xlate_core::{CloudProvider, ModelInfo, ResourceConfig, XlateError, OUTPUT_FORMAT_VERSION};

use crate::service::{ServiceError, TranslationService};

/// One resource the translator could not handle. The resource is dropped
/// from the batch output and nothing is cached for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationFailure {
    pub resource_id: String,
    pub reason: String,
}

/// The exported document: translated resources tagged with the format
/// version and the target provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchOutput {
    pub version: u32,
    pub provider: String,
    pub resources: Vec<ResourceConfig>,
}

impl BatchOutput {
    pub fn to_yaml(&self) -> Result<String, XlateError> {
        serde_yaml::to_string(self).map_err(|e| XlateError::Parse(e.to_string()))
    }
}

/// Full outcome of a batch run: the output document plus per-resource
/// diagnostics for the operator
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub output: BatchOutput,
    pub failures: Vec<TranslationFailure>,
    pub cache_hits: usize,
    pub cache_misses: usize,
}

/// Drives translation of a resource batch through the cache and the
/// external service
pub struct TranslationRunner<'a> {
    store: &'a TranslationStore,
}

impl<'a> TranslationRunner<'a> {
    pub fn new(store: &'a TranslationStore) -> Self {
        Self { store }
    }

    /// Translate one resource, consulting the cache first.
    ///
    /// Returns the translation and whether it was served from cache. A hit
    /// bumps the entry's access metadata; a miss stores the fresh result.
    /// Service failures are returned as-is and never cached.
    pub fn translate_resource<S: TranslationService + ?Sized>(
        &self,
        service: &S,
        resource: &ResourceConfig,
        raw_input: &str,
        source_cloud: CloudProvider,
        target_cloud: CloudProvider,
        model: &ModelInfo,
    ) -> Result<(ResourceConfig, bool), ServiceError> {
        let key = derive_key(resource, raw_input, source_cloud, target_cloud, &model.arn);
        let id = resource_id(resource);

        if let Some(entry) = self.store.get(&key) {
            info!(resource = %id, model = %model.arn, "cache hit");
            if let Err(err) = self.store.update_access_count(&key) {
                warn!(%err, "failed to update cache access metadata");
            }
            return Ok((entry.translation, true));
        }

        info!(resource = %id, model = %model.arn, "cache miss, querying translation service");
        let translation = service.translate(resource, source_cloud, target_cloud, model)?;

        // A structured response that still carries an error indicator is a
        // failure in disguise; it must not poison the cache
        if let Some(err) = translation.get("error").and_then(|v| v.as_str()) {
            return Err(ServiceError::MalformedResponse(format!(
                "translator returned an error payload: {err}"
            )));
        }

        if let Err(err) =
            self.store
                .store_translation(&key, &translation, resource, source_cloud, target_cloud, &model.arn)
        {
            // The translation is still usable this run even if caching failed
            warn!(%err, resource = %id, "failed to persist translation to cache");
        }

        Ok((translation, false))
    }

    /// Translate a batch in input order. Each resource is independent;
    /// failed resources are dropped from the output and reported.
    pub fn translate_batch<S: TranslationService + ?Sized>(
        &self,
        service: &S,
        resources: &[ResourceConfig],
        raw_input: &str,
        source_cloud: CloudProvider,
        target_cloud: CloudProvider,
        model: &ModelInfo,
    ) -> BatchReport {
        let mut translated = Vec::with_capacity(resources.len());
        let mut failures = Vec::new();
        let mut cache_hits = 0;
        let mut cache_misses = 0;

        for resource in resources {
            match self.translate_resource(service, resource, raw_input, source_cloud, target_cloud, model) {
                Ok((translation, from_cache)) => {
                    if from_cache {
                        cache_hits += 1;
                    } else {
                        cache_misses += 1;
                    }
                    translated.push(translation);
                }
                Err(err) => {
                    let id = resource_id(resource);
                    warn!(resource = %id, %err, "skipping resource after translation failure");
                    failures.push(TranslationFailure {
                        resource_id: id,
                        reason: err.to_string(),
                    });
                }
            }
        }

        BatchReport {
            output: BatchOutput {
                version: OUTPUT_FORMAT_VERSION,
                provider: target_cloud.to_string(),
                resources: translated,
            },
            failures,
            cache_hits,
            cache_misses,
        }
    }
}

fn resource_id(resource: &ResourceConfig) -> String {
    resource
        .get("id")
        .and_then(|v| v.as_str())
        .unwrap_or("unknown")
        .to_string()
}
