//! XLATE Engine: translation orchestration over the cache and the external
//! model services
//!
//! For each resource the runner consults the cache store; on a miss it calls
//! the external translator and stores a successful result; on a hit it
//! returns the cached value and bumps access metadata. Error results are
//! never cached, so a previously failed resource is retried on every run.
//!
//! ```text
//! Resource → derive_key → store.get ─hit──→ cached translation
//!                              │
//!                            miss → TranslationService → store_translation
//!                                         │
//!                                       error → diagnostic, nothing cached
//! ```
//!
//! Everything is single-threaded and synchronous: each interaction runs to
//! completion, and the one shared resource is the whole-file cache store.

pub mod runner;
pub mod service;
pub mod session;
pub mod validation;

pub use runner::{BatchOutput, BatchReport, TranslationFailure, TranslationRunner};
pub use service::{LlmVerdict, ServiceError, TranslationService, ValidationService};
pub use session::{AcceptanceRecord, SessionState};
pub use validation::run_validation;
