//! Typed validation findings
use serde::{Deserialize, Serialize};
use std::fmt;

/// How serious a finding is. Warnings are advisory (e.g. a unit change that
/// may be legitimate across providers); errors indicate the translation is
/// structurally incomplete or wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

/// The category of a structural finding. Each code renders with a fixed
/// label prefix so issue strings stay greppable in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingCode {
    StructuralError,
    StructuralWarning,
    ServiceError,
    ResourceError,
    ConfigurationError,
    ConversionWarning,
    QuantityError,
    QuantityWarning,
    QuantityMismatch,
    QuantityUnitChange,
    QuantityTypeMismatch,
    EmptyValue,
}

impl FindingCode {
    pub fn label(&self) -> &'static str {
        match self {
            FindingCode::StructuralError => "STRUCTURAL ERROR",
            FindingCode::StructuralWarning => "STRUCTURAL WARNING",
            FindingCode::ServiceError => "SERVICE ERROR",
            FindingCode::ResourceError => "RESOURCE ERROR",
            FindingCode::ConfigurationError => "CONFIGURATION ERROR",
            FindingCode::ConversionWarning => "CONVERSION WARNING",
            FindingCode::QuantityError => "QUANTITY ERROR",
            FindingCode::QuantityWarning => "QUANTITY WARNING",
            FindingCode::QuantityMismatch => "QUANTITY MISMATCH",
            FindingCode::QuantityUnitChange => "QUANTITY UNIT CHANGE",
            FindingCode::QuantityTypeMismatch => "QUANTITY TYPE MISMATCH",
            FindingCode::EmptyValue => "EMPTY VALUE",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            FindingCode::StructuralError
            | FindingCode::ServiceError
            | FindingCode::ResourceError
            | FindingCode::ConfigurationError
            | FindingCode::QuantityError
            | FindingCode::QuantityMismatch => Severity::Error,
            FindingCode::StructuralWarning
            | FindingCode::ConversionWarning
            | FindingCode::QuantityWarning
            | FindingCode::QuantityUnitChange
            | FindingCode::QuantityTypeMismatch
            | FindingCode::EmptyValue => Severity::Warning,
        }
    }
}

/// One validation finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub code: FindingCode,
    pub message: String,
}

impl Finding {
    pub fn new(code: FindingCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn severity(&self) -> Severity {
        self.code.severity()
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.label(), self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_with_label_prefix() {
        let finding = Finding::new(
            FindingCode::StructuralError,
            "Required key 'region' is missing from translated configuration.",
        );
        assert_eq!(
            finding.to_string(),
            "STRUCTURAL ERROR: Required key 'region' is missing from translated configuration."
        );
        assert_eq!(finding.severity(), Severity::Error);
    }

    #[test]
    fn unit_change_is_advisory() {
        assert_eq!(FindingCode::QuantityUnitChange.severity(), Severity::Warning);
        assert_eq!(FindingCode::QuantityMismatch.severity(), Severity::Error);
    }
}
