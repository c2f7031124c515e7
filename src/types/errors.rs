use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DistributionError {
    #[error("Record store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("I/O error: {0}")]
    Io(String),
    #[error("Config error: {0}")]
    Config(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<std::io::Error> for DistributionError {
    fn from(error: std::io::Error) -> Self {
        DistributionError::Io(error.to_string())
    }
}

impl From<serde_json::Error> for DistributionError {
    fn from(error: serde_json::Error) -> Self {
        DistributionError::Config(error.to_string())
    }
}

impl Serialize for DistributionError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.to_string().as_ref())
    }
}

pub type DistributionResult<T> = Result<T, DistributionError>;

/// A malformed line or filter cell. Collected per file, never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("line {line_number}: {reason}")]
#[serde(rename_all = "camelCase")]
pub struct DistributionParseError {
    pub line_number: usize,
    pub line_content: String,
    pub reason: String,
}

impl DistributionParseError {
    pub fn new(line_number: usize, line_content: &str, reason: impl Into<String>) -> Self {
        Self {
            line_number,
            line_content: line_content.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
#[path = "tests/errors_tests.rs"]
mod tests;
