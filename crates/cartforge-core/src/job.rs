//! Remote job snapshot.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{JobId, JobStatus};

/// A snapshot of a remote generation job.
///
/// Jobs are mutated only by the remote service; each poll yields a fresh
/// snapshot rather than updating an existing one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    /// Opaque remote identifier.
    pub id: JobId,

    /// Last observed status.
    pub status: JobStatus,

    /// Human-readable title assigned by the service.
    pub title: Option<String>,

    /// When the job was created.
    pub created_at: Option<DateTime<Utc>>,

    /// When the remote service last touched the job.
    pub last_updated_at: Option<DateTime<Utc>>,
}

impl Job {
    /// Create a job snapshot with the given id and status.
    pub fn new(id: impl Into<JobId>, status: JobStatus) -> Self {
        Self {
            id: id.into(),
            status,
            title: None,
            created_at: None,
            last_updated_at: None,
        }
    }

    /// Builder method to set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Builder method to set both timestamps.
    pub fn with_timestamps(
        mut self,
        created_at: Option<DateTime<Utc>>,
        last_updated_at: Option<DateTime<Utc>>,
    ) -> Self {
        self.created_at = created_at;
        self.last_updated_at = last_updated_at;
        self
    }

    /// Check if the job is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

/// Parse a remote timestamp.
///
/// Accepts RFC 3339 and offset-less ISO 8601 (assumed UTC). Anything else
/// yields `None`; timestamps are informational and never fail a request.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}
