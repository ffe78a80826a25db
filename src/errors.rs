// src/errors.rs
use thiserror::Error;

/// Failure modes of a profile export, from input validation through the
/// remote snapshot lifecycle. The web layer maps `Validation` to 400 and
/// everything else to 500.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("{0}")]
    Validation(String),

    #[error("No snapshot_id returned from the trigger request")]
    NoSnapshotId,

    #[error("Max poll attempts reached after {attempts} checks. Snapshot is still not ready")]
    PollTimeout { attempts: u32 },

    #[error("Snapshot failed upstream: {0}")]
    SnapshotFailed(String),

    #[error("Upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Upstream returned {status}: {body}")]
    Upstream {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Failed to decode snapshot payload: {0}")]
    Decode(#[from] serde_json::Error),
}
