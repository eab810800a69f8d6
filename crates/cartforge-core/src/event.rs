//! Records from a job's remote event log.

use serde::{Deserialize, Serialize};

/// Event kind emitted when the agent changes state.
pub const AGENT_STATE_CHANGED: &str = "agent_state_changed";

/// Agent state meaning the agent finished and waits for the user.
pub const AWAITING_USER_INPUT: &str = "awaiting_user_input";

/// One entry of the append-only event log owned by the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Position of the event in the remote log.
    pub sequence_index: u64,
    /// Event kind (the observation or action name).
    pub kind: String,
    /// Agent state carried by state-change events.
    pub state_tag: Option<String>,
}

impl EventRecord {
    /// Create a new event record.
    pub fn new(sequence_index: u64, kind: impl Into<String>, state_tag: Option<String>) -> Self {
        Self {
            sequence_index,
            kind: kind.into(),
            state_tag,
        }
    }

    /// Returns true if this event signals that the agent has finished.
    pub fn is_completion_marker(&self) -> bool {
        self.kind == AGENT_STATE_CHANGED && self.state_tag.as_deref() == Some(AWAITING_USER_INPUT)
    }
}

/// Scan the log from the most recent entry backwards for the completion marker.
pub fn find_completion_marker(events: &[EventRecord]) -> Option<&EventRecord> {
    events.iter().rev().find(|e| e.is_completion_marker())
}
