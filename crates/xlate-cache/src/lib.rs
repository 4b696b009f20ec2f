//! XLATE Cache: deterministic key derivation and the persistent
//! translation store
//!
//! The store is one JSON file mapping 64-char hex keys to cache entries,
//! read and rewritten in full on every mutation. Reads fail soft (a damaged
//! file behaves like an empty cache); writes are best-effort durable (the
//! attempted entry is persisted even when the pre-read failed).

pub mod key;
pub mod store;

pub use key::{canonical_json, derive_key};
pub use store::{CacheStats, ClearScope, TranslationStore};
