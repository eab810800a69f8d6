//! Client configuration.

use std::time::Duration;

/// Default overall polling budget.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// Default wait between polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Default budget for a single HTTP request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Job client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Wall-clock budget for polling, measured from job creation.
    pub timeout: Duration,

    /// Fixed wait between poll iterations.
    pub poll_interval: Duration,

    /// Budget for one HTTP request, enforced by the transport.
    pub request_timeout: Duration,
}

impl ClientConfig {
    /// Set the polling budget.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the poll interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set the per-request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}
