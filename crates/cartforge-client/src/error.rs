//! Error types for the job client.

use std::time::Duration;

use cartforge_core::{CartridgeError, JobId};
use thiserror::Error;

/// Errors that can occur while driving a generation job.
#[derive(Debug, Error)]
pub enum JobError {
    /// Network failure or an unclassified non-2xx response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The job does not exist on the remote service.
    #[error("job not found: {0}")]
    NotFound(JobId),

    /// The artifact is binary and cannot be read as text.
    #[error("unable to open binary file: {0}")]
    UnsupportedContent(String),

    /// The remote service reported an error.
    #[error("remote error: {0}")]
    Remote(String),

    /// The response does not match the expected contract.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The polling budget was exhausted.
    #[error("timeout waiting for job completion after {budget:?}")]
    Timeout { budget: Duration },

    /// The caller cancelled the run.
    #[error("run cancelled")]
    Cancelled,

    /// The artifact could not be packaged.
    #[error("cartridge encoding failed: {0}")]
    Cartridge(#[from] CartridgeError),
}

impl From<reqwest::Error> for JobError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}
