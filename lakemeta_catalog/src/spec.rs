//! Parsing of raw partition specifications.
//!
//! A partition spec is the `key=value[;key=value...]` string handed to the
//! CLI, e.g. `date=2025-11-24;region=eu-west-1`. Segment order is
//! significant and must match the table's partition key order; the catalog
//! service is the authority on key names, so no deduplication or
//! key-uniqueness check happens here.

use std::fmt::Display;
use std::str::FromStr;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("partition spec contains no key=value segments")]
    Empty,

    #[error("partition spec segment '{0}' is missing '='")]
    MissingSeparator(String),

    #[error("partition spec segment '{0}' has an empty key")]
    EmptyKey(String),
}

/// An ordered list of partition key/value pairs parsed from a raw spec
/// string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionSpec {
    pub keys: Vec<String>,
    pub values: Vec<String>,
}

impl PartitionSpec {
    /// Number of key/value pairs in the spec.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Render the spec as the conventional Hive-style storage path segment,
    /// e.g. `date=2025-11-24/region=eu-west-1`. Used as the default storage
    /// prefix when the caller does not provide one.
    pub fn hive_path(&self) -> String {
        self.keys
            .iter()
            .zip(self.values.iter())
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("/")
    }
}

impl FromStr for PartitionSpec {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut keys = Vec::new();
        let mut values = Vec::new();

        for segment in s.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            // split on the first '=' only; values may themselves contain '='
            let (key, value) = segment
                .split_once('=')
                .ok_or_else(|| ParseError::MissingSeparator(segment.to_owned()))?;
            let key = key.trim();
            if key.is_empty() {
                return Err(ParseError::EmptyKey(segment.to_owned()));
            }
            keys.push(key.to_owned());
            values.push(value.trim().to_owned());
        }

        if keys.is_empty() {
            return Err(ParseError::Empty);
        }

        Ok(Self { keys, values })
    }
}

impl Display for PartitionSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rendered = self
            .keys
            .iter()
            .zip(self.values.iter())
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(";");
        write!(f, "{rendered}")
    }
}
