//! Status of a remote generation job.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a job as reported by the remote service.
///
/// Transitions are owned by the remote side: `Pending -> Running ->
/// Stopped | Failed`. The client only observes them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    /// Job accepted but not yet executing.
    #[default]
    #[serde(alias = "STARTING")]
    Pending,
    /// Agent is executing.
    Running,
    /// Job finished and the remote runtime shut down.
    Stopped,
    /// Job ended with an error.
    #[serde(rename = "ERROR")]
    Failed,
    /// A status string this client does not recognise.
    #[serde(other)]
    Unknown,
}

impl JobStatus {
    /// Returns true if no further transition will be observed.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Stopped | Self::Failed)
    }

    /// Returns true if the event log should be consulted for completion.
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }

    /// Wire representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Running => "RUNNING",
            Self::Stopped => "STOPPED",
            Self::Failed => "ERROR",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_values() {
        let parse = |s: &str| serde_json::from_str::<JobStatus>(&format!("\"{}\"", s)).unwrap();
        assert_eq!(parse("RUNNING"), JobStatus::Running);
        assert_eq!(parse("STOPPED"), JobStatus::Stopped);
        assert_eq!(parse("ERROR"), JobStatus::Failed);
        assert_eq!(parse("STARTING"), JobStatus::Pending);
        assert_eq!(parse("SOMETHING_NEW"), JobStatus::Unknown);
    }

    #[test]
    fn test_terminal_states() {
        assert!(JobStatus::Stopped.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
        assert!(!JobStatus::Running.is_terminal());
        assert!(!JobStatus::Pending.is_terminal());
        assert!(!JobStatus::Unknown.is_terminal());
    }

    #[test]
    fn test_display_matches_wire() {
        assert_eq!(JobStatus::Failed.to_string(), "ERROR");
        assert_eq!(
            serde_json::to_string(&JobStatus::Failed).unwrap(),
            r#""ERROR""#
        );
    }
}
