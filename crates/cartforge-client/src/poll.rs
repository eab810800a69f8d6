//! Completion detection for a polled job.
//!
//! Two sources can end polling: the job's own status, and a completion
//! marker in its event log. The status is authoritative when terminal; the
//! event log is only consulted while the job reports `RUNNING`, because the
//! remote `STOPPED` transition lags the agent actually finishing.

use cartforge_core::{find_completion_marker, EventRecord, JobStatus};

/// Which signal declared the job complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionSource {
    /// Status reached `STOPPED`.
    Status,
    /// Event log carried the completion marker while still `RUNNING`.
    EventLog,
}

/// Lifecycle state of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Created,
    Polling,
    Completed(CompletionSource),
    TimedOut,
    Failed,
}

impl RunState {
    /// Returns true once polling must stop.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed(_) | Self::TimedOut | Self::Failed)
    }
}

/// Outcome of one poll iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollDecision {
    Complete(CompletionSource),
    Fail,
    Continue,
}

impl PollDecision {
    /// State the run moves to after this decision.
    pub fn next_state(self) -> RunState {
        match self {
            Self::Complete(source) => RunState::Completed(source),
            Self::Fail => RunState::Failed,
            Self::Continue => RunState::Polling,
        }
    }
}

/// Whether the event log must be fetched for this status.
pub fn needs_event_log(status: JobStatus) -> bool {
    status.is_running()
}

/// Decide the iteration outcome from the observed status and, for running
/// jobs, the event log.
pub fn decide(status: JobStatus, events: &[EventRecord]) -> PollDecision {
    match status {
        JobStatus::Stopped => PollDecision::Complete(CompletionSource::Status),
        JobStatus::Failed => PollDecision::Fail,
        JobStatus::Running if find_completion_marker(events).is_some() => {
            PollDecision::Complete(CompletionSource::EventLog)
        }
        JobStatus::Running | JobStatus::Pending | JobStatus::Unknown => PollDecision::Continue,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cartforge_core::{AGENT_STATE_CHANGED, AWAITING_USER_INPUT};

    fn marker() -> Vec<EventRecord> {
        vec![EventRecord::new(
            0,
            AGENT_STATE_CHANGED,
            Some(AWAITING_USER_INPUT.to_string()),
        )]
    }

    #[test]
    fn test_status_decisions() {
        assert_eq!(
            decide(JobStatus::Stopped, &[]),
            PollDecision::Complete(CompletionSource::Status)
        );
        assert_eq!(decide(JobStatus::Failed, &[]), PollDecision::Fail);
        assert_eq!(decide(JobStatus::Running, &[]), PollDecision::Continue);
        assert_eq!(decide(JobStatus::Pending, &[]), PollDecision::Continue);
    }

    #[test]
    fn test_event_log_completes_running_job() {
        assert_eq!(
            decide(JobStatus::Running, &marker()),
            PollDecision::Complete(CompletionSource::EventLog)
        );
    }

    #[test]
    fn test_terminal_status_wins_over_event_log() {
        assert_eq!(
            decide(JobStatus::Stopped, &marker()),
            PollDecision::Complete(CompletionSource::Status)
        );
        assert_eq!(decide(JobStatus::Failed, &marker()), PollDecision::Fail);
    }

    #[test]
    fn test_event_log_ignored_unless_running() {
        assert!(needs_event_log(JobStatus::Running));
        assert!(!needs_event_log(JobStatus::Pending));
        assert_eq!(decide(JobStatus::Pending, &marker()), PollDecision::Continue);
    }

    #[test]
    fn test_state_transitions() {
        assert_eq!(PollDecision::Continue.next_state(), RunState::Polling);
        assert_eq!(PollDecision::Fail.next_state(), RunState::Failed);
        assert!(PollDecision::Complete(CompletionSource::EventLog)
            .next_state()
            .is_terminal());
        assert!(!RunState::Created.is_terminal());
        assert!(RunState::TimedOut.is_terminal());
    }
}
