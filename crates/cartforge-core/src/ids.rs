//! Newtype wrapper for the remote job identifier.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of a remote generation job.
///
/// Ids are minted by the remote service; the client never generates one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    /// Create a new JobId from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string reference.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the inner string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for JobId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for JobId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display() {
        let id = JobId::new("conv-123");
        assert_eq!(format!("{}", id), "conv-123");
    }

    #[test]
    fn test_id_serializes_as_plain_string() {
        let id = JobId::from("abc");
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""abc""#);
    }
}
