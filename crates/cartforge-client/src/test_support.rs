//! Scripted in-memory transport for lifecycle tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::JobError;
use crate::transport::{ApiRequest, ApiResponse, HttpMethod, Transport};

pub const JOB_ID: &str = "job-1";

/// A scripted reply; `Err` becomes a transport failure.
pub type Reply = Result<ApiResponse, String>;

pub fn reply(status: u16, body: Value) -> Reply {
    Ok(ApiResponse::new(status, body.to_string()))
}

pub fn status_reply(status: &str) -> Reply {
    reply(200, json!({ "conversation_id": JOB_ID, "title": "game", "status": status }))
}

fn state_change(id: u64, state: &str) -> Value {
    json!({
        "id": id,
        "observation": "agent_state_changed",
        "extras": { "agent_state": state }
    })
}

pub fn running_events() -> Reply {
    reply(200, json!({ "events": [state_change(0, "running")] }))
}

pub fn marker_events() -> Reply {
    reply(
        200,
        json!({ "events": [
            state_change(0, "running"),
            { "id": 1, "action": "finish" },
            state_change(2, "awaiting_user_input")
        ]}),
    )
}

/// Fake remote service. Status and event queues pop one reply per call and
/// keep repeating their last entry.
pub struct FakeRemote {
    create: Mutex<Reply>,
    statuses: Mutex<VecDeque<Reply>>,
    events: Mutex<VecDeque<Reply>>,
    artifact: Mutex<Reply>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl FakeRemote {
    pub fn new() -> Self {
        Self {
            create: Mutex::new(reply(200, json!({ "status": "ok", "conversation_id": JOB_ID }))),
            statuses: Mutex::new(VecDeque::from([status_reply("RUNNING")])),
            events: Mutex::new(VecDeque::from([reply(200, json!({ "events": [] }))])),
            artifact: Mutex::new(reply(200, json!({ "code": "function TIC() end" }))),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_create(mut self, create: Reply) -> Self {
        self.create = Mutex::new(create);
        self
    }

    pub fn with_statuses(mut self, statuses: &[&str]) -> Self {
        self.statuses = Mutex::new(statuses.iter().map(|s| status_reply(s)).collect());
        self
    }

    pub fn with_status_replies(mut self, replies: Vec<Reply>) -> Self {
        self.statuses = Mutex::new(replies.into());
        self
    }

    pub fn with_events(mut self, replies: Vec<Reply>) -> Self {
        self.events = Mutex::new(replies.into());
        self
    }

    pub fn with_artifact(mut self, artifact: Reply) -> Self {
        self.artifact = Mutex::new(artifact);
        self
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn status_polls(&self) -> usize {
        let path = format!("/api/conversations/{}", JOB_ID);
        self.requests().iter().filter(|r| r.path == path).count()
    }

    pub fn event_fetches(&self) -> usize {
        self.requests().iter().filter(|r| r.path.ends_with("/events")).count()
    }

    pub fn artifact_fetches(&self) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.path.ends_with("/select-file"))
            .count()
    }

    fn next(queue: &Mutex<VecDeque<Reply>>) -> Reply {
        let mut queue = queue.lock().unwrap();
        if queue.len() > 1 {
            queue.pop_front().unwrap()
        } else {
            queue.front().cloned().unwrap_or_else(|| reply(404, json!({})))
        }
    }
}

#[async_trait]
impl Transport for FakeRemote {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, JobError> {
        self.requests.lock().unwrap().push(request.clone());
        let reply = if request.method == HttpMethod::Post {
            self.create.lock().unwrap().clone()
        } else if request.path.ends_with("/events") {
            Self::next(&self.events)
        } else if request.path.ends_with("/select-file") {
            self.artifact.lock().unwrap().clone()
        } else {
            Self::next(&self.statuses)
        };
        reply.map_err(JobError::Transport)
    }
}
