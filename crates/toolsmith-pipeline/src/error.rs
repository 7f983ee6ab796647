//! Error types for the generation pipeline
//!
//! Stage failures are caught at the orchestrator boundary and converted into
//! a terminal failed request; they never crash the process and never leave a
//! request stuck mid-pipeline.

use crate::stage::IllegalTransition;
use toolsmith_provider::ProviderError;
use toolsmith_store::StoreError;

/// Pipeline error type
#[derive(Debug, Clone, thiserror::Error)]
pub enum PipelineError {
    /// Empty or blank submission; rejected before any record is created
    #[error("invalid spec: request text is empty")]
    InvalidSpec,

    /// The compliance gate rejected the request; the provider was never called
    #[error("blocked by compliance policy: {0}")]
    ComplianceBlocked(String),

    /// External generation failure, malformed draft, or deadline expiry
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Repository failure (vanished request, store inconsistency)
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A stage transition the state machine forbids
    #[error(transparent)]
    Stage(#[from] IllegalTransition),
}
