//! Draft and enriched-spec types crossing the provider boundary

use crate::error::ProviderError;
use serde::{Deserialize, Serialize};
use toolsmith_store::{ArtifactMetadata, Category, NewArtifact};

/// The spec handed to the provider: original text plus best-effort analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedSpec {
    /// The user's request text, verbatim
    pub raw: String,
    /// Enhanced description, or the raw text when enhancement degraded
    pub description: String,
    /// Best-effort classification
    pub category: Category,
}

impl EnrichedSpec {
    #[must_use]
    pub fn new(raw: impl Into<String>, description: impl Into<String>, category: Category) -> Self {
        Self {
            raw: raw.into(),
            description: description.into(),
            category,
        }
    }
}

/// An unenriched artifact produced by the provider
///
/// The provider is untrusted: validate a draft before acting on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactDraft {
    pub name: String,
    pub description: String,
    pub category: Category,
    /// Opaque generated content
    pub body: String,
    #[serde(default)]
    pub metadata: ArtifactMetadata,
}

impl ArtifactDraft {
    /// Check that every required field is present
    ///
    /// A draft missing any required field is a provider error, not a usable
    /// result.
    pub fn validate(&self) -> Result<(), ProviderError> {
        let missing = if self.name.trim().is_empty() {
            "name"
        } else if self.description.trim().is_empty() {
            "description"
        } else if self.body.trim().is_empty() {
            "body"
        } else {
            return Ok(());
        };
        tracing::warn!(name = %self.name, missing, "draft failed validation");
        Err(ProviderError::MalformedDraft(missing))
    }
}

impl From<ArtifactDraft> for NewArtifact {
    fn from(draft: ArtifactDraft) -> Self {
        NewArtifact {
            name: draft.name,
            description: draft.description,
            category: draft.category,
            body: draft.body,
            metadata: draft.metadata,
        }
    }
}
