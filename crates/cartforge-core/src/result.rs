//! Outcome of one generation run.

use serde::Serialize;

use crate::JobId;

/// Terminal result of a generation run, produced exactly once per run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationResult {
    /// Whether the artifact was fetched and encoded.
    pub success: bool,

    /// Generated source text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact_text: Option<String>,

    /// Encoded cartridge bytes.
    #[serde(skip)]
    pub cartridge: Option<Vec<u8>>,

    /// Remote job id, once the job was created.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<JobId>,

    /// Failure description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Whole seconds elapsed since the run started.
    pub elapsed_secs: u64,
}

impl GenerationResult {
    /// Create a successful result.
    pub fn succeeded(
        job_id: JobId,
        artifact_text: String,
        cartridge: Vec<u8>,
        elapsed_secs: u64,
    ) -> Self {
        Self {
            success: true,
            artifact_text: Some(artifact_text),
            cartridge: Some(cartridge),
            job_id: Some(job_id),
            error: None,
            elapsed_secs,
        }
    }

    /// Create a failed result.
    pub fn failed(job_id: Option<JobId>, error: impl Into<String>, elapsed_secs: u64) -> Self {
        Self {
            success: false,
            artifact_text: None,
            cartridge: None,
            job_id,
            error: Some(error.into()),
            elapsed_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_serialization_omits_empty_fields() {
        let result = GenerationResult::failed(None, "boom", 7);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "boom");
        assert_eq!(json["elapsed_secs"], 7);
        assert!(json.get("artifact_text").is_none());
        assert!(json.get("cartridge").is_none());
    }

    #[test]
    fn test_succeeded() {
        let cartridge = vec![5, 1, 0, 0, b'x'];
        let result = GenerationResult::succeeded(JobId::new("j1"), "x".into(), cartridge, 3);
        assert!(result.success);
        assert!(result.error.is_none());
        assert_eq!(result.cartridge.as_deref(), Some(&[5u8, 1, 0, 0, b'x'][..]));
    }
}
