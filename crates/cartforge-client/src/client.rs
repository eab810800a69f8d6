//! Job client driving one generation job from prompt to cartridge.

use std::future::Future;
use std::sync::Arc;

use tokio::time::{sleep, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use cartforge_core::{cartridge, EventRecord, GenerationResult, Job, JobId, JobStatus};

use crate::api::{
    self, CreateJobRequest, CreateJobResponse, ErrorBody, EventsResponse, FileContentResponse,
    JobDetails, ACK_OK,
};
use crate::config::ClientConfig;
use crate::error::JobError;
use crate::policy::{self, RemoteCall};
use crate::poll::{self, CompletionSource, RunState};
use crate::transport::{ApiRequest, Transport};

/// Progress callback, invoked once per poll with whole seconds since
/// polling started and the observed status.
pub type ProgressFn<'a> = &'a (dyn Fn(u64, JobStatus) + Send + Sync);

/// Client for the remote job service.
///
/// Cheap to clone; clones share the transport. Each run owns its own timer
/// and state, so independent runs may execute concurrently.
#[derive(Clone)]
pub struct JobClient {
    transport: Arc<dyn Transport>,
    config: ClientConfig,
}

impl JobClient {
    /// Create a new client.
    pub fn new(transport: Arc<dyn Transport>, config: ClientConfig) -> Self {
        Self { transport, config }
    }

    /// Client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Create a job for `prompt`.
    pub async fn create(&self, prompt: &str) -> Result<Job, JobError> {
        policy::settle(RemoteCall::Create, self.try_create(prompt).await)?
            .ok_or_else(|| JobError::Protocol("job creation was not confirmed".to_string()))
    }

    async fn try_create(&self, prompt: &str) -> Result<Job, JobError> {
        let body = serde_json::to_value(CreateJobRequest {
            initial_user_msg: prompt,
        })
        .map_err(|e| JobError::Protocol(e.to_string()))?;
        let response = self
            .transport
            .send(ApiRequest::post(api::CONVERSATIONS_PATH, body))
            .await?;

        if !response.is_success() {
            let message = response.json::<ErrorBody>().ok().and_then(|b| b.message);
            return Err(JobError::Transport(message.unwrap_or_else(|| {
                format!("failed to create job: HTTP {}", response.status)
            })));
        }

        let ack: CreateJobResponse = response
            .json()
            .map_err(|e| JobError::Transport(format!("malformed create response: {}", e)))?;
        if ack.status != ACK_OK {
            return Err(JobError::Protocol(format!(
                "job creation failed with status: {}",
                ack.status
            )));
        }
        let id = ack
            .conversation_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| JobError::Protocol("create response carries no job id".to_string()))?;

        info!(job_id = %id, "Job created");
        Ok(Job::new(id, JobStatus::Pending))
    }

    /// Fetch the current job snapshot.
    pub async fn get_status(&self, job_id: &JobId) -> Result<Job, JobError> {
        let job = policy::settle(RemoteCall::Status, self.try_get_status(job_id).await)?;
        Ok(job.unwrap_or_else(|| Job::new(job_id.clone(), JobStatus::Unknown)))
    }

    async fn try_get_status(&self, job_id: &JobId) -> Result<Job, JobError> {
        let response = self
            .transport
            .send(ApiRequest::get(api::job_path(job_id)?))
            .await?;

        match response.status {
            404 => Err(JobError::NotFound(job_id.clone())),
            status if !response.is_success() => Err(JobError::Transport(format!(
                "failed to get job status: HTTP {}",
                status
            ))),
            _ => {
                let details: JobDetails = response.json().map_err(|e| {
                    JobError::Protocol(format!("malformed status response: {}", e))
                })?;
                Ok(details.into_job(job_id))
            }
        }
    }

    /// Fetch the job's event log.
    ///
    /// Failures degrade to an empty log, which reads as "not yet complete".
    /// An error is only returned if the events call is switched to
    /// [`FailurePolicy::Propagate`](crate::policy::FailurePolicy::Propagate).
    pub async fn get_events(&self, job_id: &JobId) -> Result<Vec<EventRecord>, JobError> {
        let events = policy::settle(RemoteCall::Events, self.try_get_events(job_id).await)?;
        Ok(events.unwrap_or_default())
    }

    async fn try_get_events(&self, job_id: &JobId) -> Result<Vec<EventRecord>, JobError> {
        let response = self
            .transport
            .send(ApiRequest::get(api::events_path(job_id)?))
            .await?;

        if !response.is_success() {
            return Err(JobError::Transport(format!(
                "failed to get events: HTTP {}",
                response.status
            )));
        }
        let page: EventsResponse = response
            .json()
            .map_err(|e| JobError::Protocol(format!("malformed events response: {}", e)))?;
        Ok(page.into_records())
    }

    /// Fetch the text of `path` from the job's workspace.
    pub async fn get_artifact(&self, job_id: &JobId, path: &str) -> Result<String, JobError> {
        let result = self.try_get_artifact(job_id, path).await;
        policy::settle(RemoteCall::Artifact, result)?
            .ok_or_else(|| JobError::Remote(format!("file content unavailable: {}", path)))
    }

    async fn try_get_artifact(&self, job_id: &JobId, path: &str) -> Result<String, JobError> {
        let request = ApiRequest::get(api::select_file_path(job_id)?).with_query("file", path);
        let response = self.transport.send(request).await?;

        match response.status {
            415 => Err(JobError::UnsupportedContent(path.to_string())),
            500 => {
                let message = response.json::<ErrorBody>().ok().and_then(|b| b.error);
                Err(JobError::Remote(
                    message.unwrap_or_else(|| format!("error opening file: {}", path)),
                ))
            }
            status if !response.is_success() => Err(JobError::Transport(format!(
                "failed to get file content: HTTP {}",
                status
            ))),
            _ => response
                .json::<FileContentResponse>()
                .map(|file| file.code)
                .map_err(|e| JobError::Protocol(format!("malformed file response: {}", e))),
        }
    }

    /// Poll a created job until it completes, fails or runs out of time.
    pub async fn wait_for_completion(
        &self,
        job_id: &JobId,
        on_progress: Option<ProgressFn<'_>>,
        cancel: &CancellationToken,
    ) -> Result<CompletionSource, JobError> {
        let started = Instant::now();
        let mut state = RunState::Created;

        loop {
            match state {
                RunState::Created => {
                    info!(job_id = %job_id, "Polling job");
                    state = RunState::Polling;
                    continue;
                }
                RunState::Polling => {}
                RunState::Completed(source) => return Ok(source),
                RunState::Failed => {
                    return Err(JobError::Remote("job ended with error status".to_string()))
                }
                RunState::TimedOut => {
                    return Err(JobError::Timeout {
                        budget: self.config.timeout,
                    })
                }
            }

            let elapsed = started.elapsed();
            if elapsed >= self.config.timeout {
                info!(
                    job_id = %job_id,
                    elapsed_secs = elapsed.as_secs(),
                    "Polling budget exhausted"
                );
                state = RunState::TimedOut;
                continue;
            }

            let job = until_cancelled(cancel, self.get_status(job_id)).await?;
            if let Some(report) = on_progress {
                report(elapsed.as_secs(), job.status);
            }

            let events = if poll::needs_event_log(job.status) {
                until_cancelled(cancel, self.get_events(job_id)).await?
            } else {
                Vec::new()
            };

            let decision = poll::decide(job.status, &events);
            debug!(job_id = %job_id, status = %job.status, decision = ?decision, "Poll");
            if decision == poll::PollDecision::Complete(CompletionSource::EventLog) {
                info!(
                    job_id = %job_id,
                    "Agent awaiting input; treating job as complete while remote status is RUNNING"
                );
            }

            state = decision.next_state();
            if !state.is_terminal() {
                until_cancelled(cancel, async {
                    sleep(self.config.poll_interval).await;
                    Ok(())
                })
                .await?;
            }
        }
    }

    /// Run a job from prompt to cartridge.
    ///
    /// Never fails: every error is captured in the returned result.
    pub async fn run(
        &self,
        prompt: &str,
        artifact_path: &str,
        on_progress: Option<ProgressFn<'_>>,
    ) -> GenerationResult {
        self.run_with_cancel(prompt, artifact_path, on_progress, &CancellationToken::new())
            .await
    }

    /// Like [`JobClient::run`], abandoning the run when `cancel` fires.
    ///
    /// The remote job is not told about the cancellation and keeps running.
    pub async fn run_with_cancel(
        &self,
        prompt: &str,
        artifact_path: &str,
        on_progress: Option<ProgressFn<'_>>,
        cancel: &CancellationToken,
    ) -> GenerationResult {
        let started = Instant::now();
        let mut created = None;

        let outcome = self
            .drive(prompt, artifact_path, on_progress, cancel, &mut created)
            .await;
        let elapsed_secs = started.elapsed().as_secs();

        match outcome {
            Ok((job_id, text, cart)) => {
                info!(job_id = %job_id, elapsed_secs, bytes = cart.len(), "Generation succeeded");
                GenerationResult::succeeded(job_id, text, cart, elapsed_secs)
            }
            Err(e) => {
                error!(job_id = ?created, elapsed_secs, error = %e, "Generation failed");
                GenerationResult::failed(created, e.to_string(), elapsed_secs)
            }
        }
    }

    async fn drive(
        &self,
        prompt: &str,
        artifact_path: &str,
        on_progress: Option<ProgressFn<'_>>,
        cancel: &CancellationToken,
        created: &mut Option<JobId>,
    ) -> Result<(JobId, String, Vec<u8>), JobError> {
        let job = until_cancelled(cancel, self.create(prompt)).await?;
        *created = Some(job.id.clone());

        let source = self.wait_for_completion(&job.id, on_progress, cancel).await?;
        info!(job_id = %job.id, source = ?source, "Job completed");

        let text = until_cancelled(cancel, self.get_artifact(&job.id, artifact_path)).await?;
        let cart = cartridge::encode(&text)?;
        Ok((job.id, text, cart))
    }
}

async fn until_cancelled<T>(
    cancel: &CancellationToken,
    fut: impl Future<Output = Result<T, JobError>>,
) -> Result<T, JobError> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(JobError::Cancelled),
        result = fut => result,
    }
}
