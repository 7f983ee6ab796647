//! Error types for the provider boundary

/// Failure of the external generation capability
///
/// Anything that goes wrong across the provider boundary collapses to this
/// type: upstream failures, malformed drafts, and deadline expiry are all
/// equivalent from the pipeline's point of view.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProviderError {
    /// The upstream call failed; carries the upstream message
    #[error("provider call failed: {0}")]
    Upstream(String),

    /// The returned draft is missing a required field
    #[error("provider returned an invalid draft: missing {0}")]
    MalformedDraft(&'static str),

    /// The call exceeded the orchestrator-imposed deadline
    #[error("provider call exceeded deadline of {0} ms")]
    DeadlineExceeded(u64),
}
