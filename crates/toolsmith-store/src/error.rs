//! Error types for the artifact repository

use crate::types::{ArtifactId, RequestId};

/// Repository error type
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    /// Update or use-recording against an unknown request
    #[error("request not found: {0}")]
    RequestNotFound(RequestId),

    /// Use-recording against an unknown artifact
    #[error("artifact not found: {0}")]
    ArtifactNotFound(ArtifactId),

    /// Direct creation with a name that already exists
    #[error("artifact name already taken: {0}")]
    DuplicateName(String),

    /// The name index points at an artifact that is not in the table
    #[error("store inconsistency: name index references missing artifact {0}")]
    Inconsistent(ArtifactId),
}
