//! Per-call failure handling.
//!
//! | Call       | On failure  |
//! |------------|-------------|
//! | `Create`   | propagate   |
//! | `Status`   | propagate   |
//! | `Events`   | degrade     |
//! | `Artifact` | propagate   |
//!
//! A degraded call continues with its fallback value: an empty event log,
//! or an `UNKNOWN` status snapshot that keeps polling going. Create and
//! artifact reads have no meaningful fallback and still fail when degraded.
//!
//! No call is retried; a failed job is never resubmitted either.

use std::fmt;

use tracing::{debug, warn};

use crate::error::JobError;

/// Remote calls issued by the job client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteCall {
    Create,
    Status,
    Events,
    Artifact,
}

/// What a failed call does to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Surface the error.
    Propagate,
    /// Log the error and continue with the call's fallback value.
    Degrade,
}

impl RemoteCall {
    /// Failure policy of this call.
    pub const fn failure_policy(self) -> FailurePolicy {
        match self {
            Self::Create | Self::Status | Self::Artifact => FailurePolicy::Propagate,
            Self::Events => FailurePolicy::Degrade,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Status => "status",
            Self::Events => "events",
            Self::Artifact => "artifact",
        }
    }
}

impl fmt::Display for RemoteCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolve a call result according to the call's failure policy.
///
/// `Ok(None)` means the failure was absorbed; the caller substitutes the
/// call's degraded value.
pub fn settle<T>(call: RemoteCall, result: Result<T, JobError>) -> Result<Option<T>, JobError> {
    match (result, call.failure_policy()) {
        (Ok(value), _) => Ok(Some(value)),
        (Err(e), FailurePolicy::Propagate) => {
            debug!(call = %call, error = %e, "Remote call failed");
            Err(e)
        }
        (Err(e), FailurePolicy::Degrade) => {
            warn!(call = %call, error = %e, "Remote call failed, continuing degraded");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_table() {
        assert_eq!(RemoteCall::Create.failure_policy(), FailurePolicy::Propagate);
        assert_eq!(RemoteCall::Status.failure_policy(), FailurePolicy::Propagate);
        assert_eq!(RemoteCall::Artifact.failure_policy(), FailurePolicy::Propagate);
        assert_eq!(RemoteCall::Events.failure_policy(), FailurePolicy::Degrade);
    }

    #[test]
    fn test_settle_degrades_events() {
        let result: Result<Vec<u8>, _> = Err(JobError::Transport("reset".into()));
        assert_eq!(settle(RemoteCall::Events, result).unwrap(), None);
    }

    #[test]
    fn test_settle_propagates_artifact() {
        let result: Result<String, _> = Err(JobError::UnsupportedContent("a.png".into()));
        assert!(matches!(
            settle(RemoteCall::Artifact, result),
            Err(JobError::UnsupportedContent(_))
        ));
    }

    #[test]
    fn test_settle_passes_success_through() {
        let result: Result<String, JobError> = Ok("code".into());
        assert_eq!(
            settle(RemoteCall::Status, result).unwrap().as_deref(),
            Some("code")
        );
    }
}
