//! Cloud provider identifiers
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::XlateError;

/// One of the supported cloud platforms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CloudProvider {
    Aws,
    Azure,
    Gcp,
}

impl CloudProvider {
    /// Lowercase identifier used in cache entries and key derivation
    pub fn as_str(&self) -> &'static str {
        match self {
            CloudProvider::Aws => "aws",
            CloudProvider::Azure => "azure",
            CloudProvider::Gcp => "gcp",
        }
    }
}

impl fmt::Display for CloudProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CloudProvider {
    type Err = XlateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "aws" => Ok(CloudProvider::Aws),
            "azure" => Ok(CloudProvider::Azure),
            "gcp" => Ok(CloudProvider::Gcp),
            other => Err(XlateError::Parse(format!(
                "unknown cloud provider '{other}' (expected aws, azure or gcp)"
            ))),
        }
    }
}
