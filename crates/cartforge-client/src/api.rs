//! Wire types of the remote conversation API.

use reqwest::Url;
use serde::{Deserialize, Serialize};

use cartforge_core::job::parse_timestamp;
use cartforge_core::{EventRecord, Job, JobId, JobStatus};

use crate::error::JobError;
use crate::transport::ENCODING_ORIGIN;

/// Collection path for jobs.
pub const CONVERSATIONS_PATH: &str = "/api/conversations";

/// Acknowledgement sentinel returned by a successful create.
pub const ACK_OK: &str = "ok";

/// Path of a single job.
pub fn job_path(job_id: &JobId) -> Result<String, JobError> {
    conversation_path(job_id, &[])
}

/// Path of a job's event log.
pub fn events_path(job_id: &JobId) -> Result<String, JobError> {
    conversation_path(job_id, &["events"])
}

/// Path of the file reader for a job's workspace.
pub fn select_file_path(job_id: &JobId) -> Result<String, JobError> {
    conversation_path(job_id, &["select-file"])
}

/// Builds `/api/conversations/{id}/{tail..}`. The id is one segment, so
/// `/`, `?` and `#` inside it are percent-encoded.
fn conversation_path(job_id: &JobId, tail: &[&str]) -> Result<String, JobError> {
    let mut url = Url::parse(ENCODING_ORIGIN).map_err(|e| JobError::Protocol(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| JobError::Protocol("cannot build job path".to_string()))?
        .clear()
        .extend(["api", "conversations", job_id.as_str()])
        .extend(tail);
    Ok(url.path().to_string())
}

/// Body of a create request.
#[derive(Debug, Serialize)]
pub struct CreateJobRequest<'a> {
    pub initial_user_msg: &'a str,
}

/// Acknowledgement of a create request.
#[derive(Debug, Deserialize)]
pub struct CreateJobResponse {
    pub status: String,
    #[serde(default)]
    pub conversation_id: Option<String>,
}

/// Job details returned by the status endpoint.
#[derive(Debug, Deserialize)]
pub struct JobDetails {
    #[serde(default)]
    pub conversation_id: Option<String>,
    pub status: JobStatus,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub last_updated_at: Option<String>,
}

impl JobDetails {
    /// Convert into a domain snapshot, falling back to the requested id.
    pub fn into_job(self, requested: &JobId) -> Job {
        let id = self
            .conversation_id
            .map(JobId::from)
            .unwrap_or_else(|| requested.clone());
        let created_at = self.created_at.as_deref().and_then(parse_timestamp);
        let last_updated_at = self.last_updated_at.as_deref().and_then(parse_timestamp);

        let job = Job::new(id, self.status).with_timestamps(created_at, last_updated_at);
        match self.title {
            Some(title) => job.with_title(title),
            None => job,
        }
    }
}

/// Event log page.
#[derive(Debug, Default, Deserialize)]
pub struct EventsResponse {
    #[serde(default)]
    pub events: Option<Vec<RawEvent>>,
}

impl EventsResponse {
    /// Convert the page into ordered event records.
    pub fn into_records(self) -> Vec<EventRecord> {
        self.events
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(position, raw)| raw.into_record(position as u64))
            .collect()
    }
}

/// One event as serialized by the remote service.
#[derive(Debug, Deserialize)]
pub struct RawEvent {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub observation: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub extras: Option<EventExtras>,
}

/// Extra fields attached to an event.
#[derive(Debug, Deserialize)]
pub struct EventExtras {
    #[serde(default)]
    pub agent_state: Option<String>,
}

impl RawEvent {
    fn into_record(self, position: u64) -> EventRecord {
        let kind = self.observation.or(self.action).unwrap_or_default();
        let state_tag = self.extras.and_then(|extras| extras.agent_state);
        EventRecord::new(self.id.unwrap_or(position), kind, state_tag)
    }
}

/// Successful file read.
#[derive(Debug, Deserialize)]
pub struct FileContentResponse {
    pub code: String,
}

/// Error body; the service uses either key.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}
