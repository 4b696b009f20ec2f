//! Structural comparison rules
//!
//! Pure function of (source, translated) -> findings. Every rule is
//! evaluated; none short-circuits the rest. Issue ordering follows the rule
//! order below.

use serde_json::Value;
use xlate_core::ResourceConfig;

use crate::finding::{Finding, FindingCode};
use crate::quantity::check_quantity;

/// Top-level keys every resource description must carry
pub const REQUIRED_KEYS: [&str; 6] = [
    "id",
    "service",
    "resource_type",
    "region",
    "quantity",
    "configuration",
];

/// Vocabulary of platform tokens; an unchanged string value containing one
/// of these (case-insensitive) almost always means the model echoed the
/// source instead of converting it
pub const SOURCE_PLATFORM_TOKENS: [&str; 6] = ["aws", "azure", "gcp", "ec2", "vm", "compute"];

/// Compare a source resource and its translation for structural integrity.
///
/// Rules, in order: required-key presence, untranslated service/resource
/// identity, extraneous top-level keys, nested configuration parity,
/// quantity consistency, and a null/empty scan over the translated
/// top-level fields.
pub fn check_structure(source: &ResourceConfig, translated: &ResourceConfig) -> Vec<Finding> {
    let mut findings = Vec::new();

    let (Some(source), Some(translated)) = (source.as_object(), translated.as_object()) else {
        findings.push(Finding::new(
            FindingCode::StructuralError,
            "Resource descriptions must be dictionary/object values.",
        ));
        return findings;
    };

    // 1. Required keys
    for key in REQUIRED_KEYS {
        if !translated.contains_key(key) {
            findings.push(Finding::new(
                FindingCode::StructuralError,
                format!("Required key '{key}' is missing from translated configuration."),
            ));
        }
    }

    // 2. Untranslated identity fields
    if let (Some(src), Some(dst)) = (source.get("service"), translated.get("service")) {
        if src == dst {
            findings.push(Finding::new(
                FindingCode::ServiceError,
                format!(
                    "Service name '{}' was not converted from source cloud format.",
                    display_value(dst)
                ),
            ));
        }
    }
    if let (Some(src), Some(dst)) = (source.get("resource_type"), translated.get("resource_type")) {
        if src == dst {
            findings.push(Finding::new(
                FindingCode::ResourceError,
                format!(
                    "Resource type '{}' was not converted from source cloud format.",
                    display_value(dst)
                ),
            ));
        }
    }

    // 3. Extraneous top-level keys
    let extra_keys: Vec<&str> = translated
        .keys()
        .filter(|k| !source.contains_key(*k))
        .map(|k| k.as_str())
        .collect();
    if !extra_keys.is_empty() {
        findings.push(Finding::new(
            FindingCode::StructuralWarning,
            format!("Extra keys found in translated configuration: {extra_keys:?}"),
        ));
    }

    // 4. Nested configuration parity
    match (source.get("configuration"), translated.get("configuration")) {
        (Some(src_cfg), Some(dst_cfg)) => check_configuration(src_cfg, dst_cfg, &mut findings),
        (Some(_), None) => findings.push(Finding::new(
            FindingCode::StructuralError,
            "Configuration section is missing in translated output.",
        )),
        _ => {}
    }

    // 5. Quantity consistency
    check_quantity(source, translated, &mut findings);

    // 6. Null/empty top-level values in the translation
    for (key, value) in translated {
        let empty = value.is_null()
            || value.as_str().map(|s| s.trim().is_empty()).unwrap_or(false);
        if empty {
            findings.push(Finding::new(
                FindingCode::EmptyValue,
                format!("Key '{key}' has an empty or null value."),
            ));
        }
    }

    findings
}

/// Recursive configuration-tree parity check
fn check_configuration(source_cfg: &Value, translated_cfg: &Value, findings: &mut Vec<Finding>) {
    let (Some(source), Some(translated)) = (source_cfg.as_object(), translated_cfg.as_object())
    else {
        findings.push(Finding::new(
            FindingCode::StructuralError,
            "Configuration must be a dictionary/object.",
        ));
        return;
    };

    let missing: Vec<&str> = source
        .keys()
        .filter(|k| !translated.contains_key(*k))
        .map(|k| k.as_str())
        .collect();
    if !missing.is_empty() {
        findings.push(Finding::new(
            FindingCode::ConfigurationError,
            format!("Missing configuration keys: {missing:?}"),
        ));
    }

    for (key, source_value) in source {
        let Some(translated_value) = translated.get(key) else {
            continue;
        };

        // An unchanged string mentioning a platform token is suspicious;
        // generic unchanged settings (names, sizes) are fine
        if source_value == translated_value {
            if let Some(text) = source_value.as_str() {
                let lowered = text.to_lowercase();
                if SOURCE_PLATFORM_TOKENS.iter().any(|t| lowered.contains(t)) {
                    findings.push(Finding::new(
                        FindingCode::ConversionWarning,
                        format!("Configuration '{key}' may not be properly converted: '{text}'"),
                    ));
                }
            }
        }

        if source_value.is_object() && translated_value.is_object() {
            check_configuration(source_value, translated_value, findings);
        }
    }
}

/// Render a value for inclusion in a message; strings print without quotes
pub(crate) fn display_value(value: &Value) -> String {
    match value.as_str() {
        Some(s) => s.to_string(),
        None => value.to_string(),
    }
}

/// JSON type name used in mismatch messages
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
