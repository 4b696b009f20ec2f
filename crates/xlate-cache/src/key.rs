//! Cache key derivation
//!
//! A key identifies one (resource, input file, cloud pair, model) translation
//! request. The composite record is serialized with object keys sorted at
//! every nesting level before hashing; identical inputs yield identical keys
//! regardless of map insertion order, which the whole cache depends on.

use serde_json::{json, Map, Value};
use xlate_core::{CloudProvider, ResourceConfig};

/// Serialize a JSON value with lexicographically sorted object keys,
/// recursively. The sort is explicit rather than relying on the iteration
/// order of `serde_json`'s map backing, which flips to insertion order when
/// the `preserve_order` feature is enabled anywhere in the build.
pub fn canonical_json(value: &Value) -> String {
    canonicalize(value).to_string()
}

fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut sorted = Map::with_capacity(map.len());
            for key in keys {
                if let Some(child) = map.get(key) {
                    sorted.insert(key.clone(), canonicalize(child));
                }
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}

fn digest_hex(data: &[u8]) -> String {
    blake3::hash(data).to_hex().to_string()
}

/// Derive the cache key for a translation request.
///
/// The raw input text is digested independently, then folded into a
/// composite record together with the resource snapshot, the cloud pair and
/// the model identity; the canonical serialization of that record is hashed
/// into the 64-char lowercase hex key.
pub fn derive_key(
    resource: &ResourceConfig,
    raw_input: &str,
    source_cloud: CloudProvider,
    target_cloud: CloudProvider,
    model_arn: &str,
) -> String {
    let record = json!({
        "service_config": resource,
        "input_content": digest_hex(raw_input.as_bytes()),
        "source_cloud": source_cloud.as_str(),
        "target_cloud": target_cloud.as_str(),
        "model_arn": model_arn,
    });

    digest_hex(canonical_json(&record).as_bytes())
}
