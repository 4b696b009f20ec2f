//! XLATE Validate: structural validation of translated resources
//!
//! A deterministic rule engine that compares a source resource against its
//! translation with no I/O and no model call. Its findings supplement the
//! external LLM validator's own issue list, and feed the local confidence
//! fallback when that validator is unavailable.

pub mod finding;
pub mod structural;

mod quantity;

pub use finding::{Finding, FindingCode, Severity};
pub use structural::{check_structure, REQUIRED_KEYS, SOURCE_PLATFORM_TOKENS};

/// Local confidence score used when the external validator call fails:
/// each finding costs 10 points off 100, floored at 0. With no findings the
/// score is a deliberately non-perfect 80, signaling that no model check
/// actually ran.
pub fn fallback_confidence(issue_count: usize) -> u32 {
    if issue_count > 0 {
        100u32.saturating_sub(10 * issue_count as u32)
    } else {
        80
    }
}
