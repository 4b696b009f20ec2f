//! External service contracts
//!
//! The engine treats translation and LLM validation as opaque collaborators
//! behind these traits. Implementations own the prompt templates and wire
//! protocol; the engine only sees structured results or errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use xlate_core::{CloudProvider, ModelInfo, ResourceConfig};

/// Failure surfaced by an external model service. Never cached; the same
/// request is simply retried on the next invocation.
#[derive(Error, Debug, Clone)]
pub enum ServiceError {
    /// The service could not be reached or refused the call
    #[error("SERVICE/{0}")]
    Unavailable(String),

    /// The model answered, but not with the structured data expected
    #[error("RESPONSE/{0}")]
    MalformedResponse(String),

    /// The provider API returned an error
    #[error("API/{0}")]
    Api(String),
}

/// Translates one resource description between cloud providers
pub trait TranslationService {
    fn translate(
        &self,
        resource: &ResourceConfig,
        source_cloud: CloudProvider,
        target_cloud: CloudProvider,
        model: &ModelInfo,
    ) -> Result<ResourceConfig, ServiceError>;
}

/// What the external LLM validator returns on success
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmVerdict {
    /// 0-100
    pub confidence_score: u32,
    pub issues: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_correction: Option<ResourceConfig>,
}

/// Validates a (source, translated) pair with a model call. The structural
/// findings computed locally are handed over as context so the model can
/// confirm or expand on them.
pub trait ValidationService {
    fn validate(
        &self,
        source: &ResourceConfig,
        translated: &ResourceConfig,
        source_cloud: CloudProvider,
        target_cloud: CloudProvider,
        model: &ModelInfo,
        structural_issues: &[String],
    ) -> Result<LlmVerdict, ServiceError>;
}
