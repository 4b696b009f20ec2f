//! Quantity consistency rules
//!
//! The most semantically important check: cost estimates depend on quantity
//! surviving translation. A quantity is either a scalar (number or numeric
//! string) or a structured `{amount, unit}` object. Small numeric drift is
//! tolerated; only relative differences above 5% are treated as signal,
//! since the model may legitimately restate a number in different precision.

use serde_json::{Map, Value};

use crate::finding::{Finding, FindingCode};
use crate::structural::{display_value, json_type_name};

/// Absolute drift ignored entirely (floating point noise)
const AMOUNT_EPSILON: f64 = 0.001;

/// Relative drift (percent) above which an amount change is flagged
const DRIFT_THRESHOLD_PCT: f64 = 5.0;

pub(crate) fn check_quantity(
    source: &Map<String, Value>,
    translated: &Map<String, Value>,
    findings: &mut Vec<Finding>,
) {
    let (src, dst) = match (source.get("quantity"), translated.get("quantity")) {
        (None, None) => return,
        (Some(_), None) => {
            findings.push(Finding::new(
                FindingCode::QuantityError,
                "Quantity information is missing from translated configuration.",
            ));
            return;
        }
        (None, Some(_)) => {
            findings.push(Finding::new(
                FindingCode::QuantityWarning,
                "Quantity information added in translation (not present in source).",
            ));
            return;
        }
        (Some(src), Some(dst)) => (src, dst),
    };

    match (src.as_object(), dst.as_object()) {
        (Some(src_map), Some(dst_map)) => {
            if let (Some(src_amount), Some(dst_amount)) =
                (src_map.get("amount"), dst_map.get("amount"))
            {
                compare_amounts("Amount", src_amount, dst_amount, findings);
            }
            if let (Some(src_unit), Some(dst_unit)) = (src_map.get("unit"), dst_map.get("unit")) {
                if src_unit != dst_unit {
                    findings.push(Finding::new(
                        FindingCode::QuantityUnitChange,
                        format!(
                            "Unit changed from '{}' to '{}'. Verify if this is appropriate for the target cloud platform.",
                            display_value(src_unit),
                            display_value(dst_unit)
                        ),
                    ));
                }
            }
        }
        (None, None) if is_scalar(src) && is_scalar(dst) => {
            compare_amounts("Quantity", src, dst, findings);
        }
        _ => {
            findings.push(Finding::new(
                FindingCode::QuantityTypeMismatch,
                format!(
                    "Source quantity type ({}) differs from translated type ({}).",
                    json_type_name(src),
                    json_type_name(dst)
                ),
            ));
        }
    }
}

/// Numbers and numeric strings qualify as scalar quantities
fn is_scalar(value: &Value) -> bool {
    value.is_number() || value.is_string()
}

/// Number, or a string that parses as one
fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn compare_amounts(label: &str, src: &Value, dst: &Value, findings: &mut Vec<Finding>) {
    match (as_number(src), as_number(dst)) {
        (Some(src_num), Some(dst_num)) => {
            if (dst_num - src_num).abs() > AMOUNT_EPSILON {
                let pct = if src_num != 0.0 {
                    ((dst_num - src_num) / src_num * 100.0).abs()
                } else {
                    100.0
                };
                if pct > DRIFT_THRESHOLD_PCT {
                    findings.push(Finding::new(
                        FindingCode::QuantityMismatch,
                        format!(
                            "{label} changed from {} to {} ({pct:.1}% difference). This may indicate manual editing or translation error.",
                            display_value(src),
                            display_value(dst)
                        ),
                    ));
                }
            }
        }
        _ => {
            // Not numerically comparable, fall back to exact comparison
            if display_value(src) != display_value(dst) {
                findings.push(Finding::new(
                    FindingCode::QuantityMismatch,
                    format!(
                        "{label} changed from '{}' to '{}'. This may indicate manual editing or translation error.",
                        display_value(src),
                        display_value(dst)
                    ),
                ));
            }
        }
    }
}
