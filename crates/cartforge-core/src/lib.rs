//! CartForge Core Domain Types
//!
//! This crate contains pure domain types with no dependencies on:
//! - Network/HTTP
//! - Async runtime specifics
//!
//! It covers the generation job model observed from the remote service
//! and the binary cartridge codec used to package generated code.

pub mod cartridge;
pub mod error;
pub mod event;
pub mod ids;
pub mod job;
pub mod result;
pub mod status;

// Re-export commonly used types
pub use cartridge::{Cartridge, ChunkHeader};
pub use error::CartridgeError;
pub use event::{find_completion_marker, EventRecord, AGENT_STATE_CHANGED, AWAITING_USER_INPUT};
pub use ids::JobId;
pub use job::Job;
pub use result::GenerationResult;
pub use status::JobStatus;
