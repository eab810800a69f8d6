//! Job client for CartForge.
//!
//! Drives one remote code-generation job through its lifecycle (create,
//! poll, fetch) and packages the generated source into a cartridge.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use cartforge_client::{ClientConfig, JobClient, RelayTransport};
//!
//! async fn generate() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::default();
//!     let transport = RelayTransport::new("http://localhost:3000/api/openhands", &config)?;
//!     let client = JobClient::new(Arc::new(transport), config);
//!
//!     let result = client.run("Write a snake game", "game.lua", None).await;
//!     println!("success={} after {}s", result.success, result.elapsed_secs);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod policy;
pub mod poll;
pub mod transport;

#[cfg(test)]
mod test_support;

pub use client::{JobClient, ProgressFn};
pub use config::ClientConfig;
pub use error::JobError;
pub use http::{DirectTransport, RelayTransport};
pub use policy::{FailurePolicy, RemoteCall};
pub use poll::{CompletionSource, PollDecision, RunState};
pub use transport::{ApiRequest, ApiResponse, HttpMethod, Transport};
