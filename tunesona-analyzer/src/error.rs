//! Error types for tunesona-analyzer
//!
//! Per-source failures (`FetchError`) never reach the caller on their own; the
//! aggregator records them in the snapshot. Only the conditions below end a
//! pipeline invocation.

use crate::types::SourceFailure;
use thiserror::Error;

/// Terminal failure of one pipeline invocation
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Every configured source failed; no partial snapshot is returned
    #[error("All {} sources failed", failures.len())]
    AllSourcesFailed { failures: Vec<SourceFailure> },

    /// Aggregator was built with no sources
    #[error("No sources configured")]
    NoSourcesConfigured,

    /// Credential provider could not supply a credential
    #[error("Credential unavailable: {0}")]
    Credential(String),

    /// tunesona-common error
    #[error("Common error: {0}")]
    Common(#[from] tunesona_common::Error),
}

impl PipelineError {
    /// Lift a provider error, keeping credential failures distinct
    pub fn from_provider(err: tunesona_common::Error) -> Self {
        match err {
            tunesona_common::Error::Credential(msg) => PipelineError::Credential(msg),
            other => PipelineError::Common(other),
        }
    }
}

/// Result type for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Collection;

    #[test]
    fn test_all_sources_failed_display() {
        let err = PipelineError::AllSourcesFailed {
            failures: vec![
                SourceFailure {
                    collection: Collection::RecentlyPlayed,
                    status: Some(500),
                    error: "boom".to_string(),
                },
                SourceFailure {
                    collection: Collection::LibrarySongs,
                    status: None,
                    error: "reset".to_string(),
                },
            ],
        };
        assert_eq!(err.to_string(), "All 2 sources failed");
    }

    #[test]
    fn test_from_provider() {
        let err = PipelineError::from_provider(tunesona_common::Error::Credential("none".into()));
        assert!(matches!(err, PipelineError::Credential(ref m) if m == "none"));

        let err = PipelineError::from_provider(tunesona_common::Error::Internal("x".into()));
        assert!(matches!(err, PipelineError::Common(_)));
    }
}
