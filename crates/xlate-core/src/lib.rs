//! XLATE Core: shared data model for the cloud resource translation engine
//!
//! Holds the types exchanged between the cache store, the structural
//! validator, and the translation orchestrator: resource configurations,
//! persisted cache entries, validation reports, and the unified error enum.

pub mod cloud;
pub mod error;
pub mod model;

pub use cloud::CloudProvider;
pub use error::XlateError;
pub use model::{CacheEntry, ModelInfo, ResourceConfig, ValidationReport};

/// Version tag written into every new cache entry
pub const CACHE_ENTRY_VERSION: &str = "1.0";

/// Format version of the batch output document
pub const OUTPUT_FORMAT_VERSION: u32 = 1;
