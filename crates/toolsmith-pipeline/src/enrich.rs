//! Artifact enrichment
//!
//! Deterministic post-processing of provider drafts: integration wiring for
//! categories that have a backing endpoint, plus compliance and provenance
//! stamps. Idempotent: re-enriching an already-enriched draft never
//! double-prepends the wiring stub.

use chrono::Utc;
use toolsmith_provider::ArtifactDraft;
use toolsmith_store::{BuildProvenance, Category, ComplianceStamp, IntegrationDescriptor};

/// Fixed category-to-integration table; one entry per category, `None` for
/// categories without a backing service
#[must_use]
pub fn integration_for(category: Category) -> Option<IntegrationDescriptor> {
    let (name, endpoint, description) = match category {
        Category::Pdf => (
            "PDFShift",
            "https://api.pdfshift.io/v3/convert",
            "PDF manipulation and conversion",
        ),
        Category::Image => (
            "DeepAI",
            "https://api.deepai.org/api",
            "AI-powered image processing",
        ),
        Category::Video => (
            "FFmpeg Relay",
            "http://localhost:8080/ffmpeg",
            "Video processing and conversion",
        ),
        Category::Ai => (
            "Ollama Relay",
            "http://localhost:8080/ollama",
            "Local AI model inference",
        ),
        _ => return None,
    };
    Some(IntegrationDescriptor {
        name: name.to_string(),
        endpoint: endpoint.to_string(),
        description: description.to_string(),
    })
}

/// The enrichment transform
#[derive(Debug, Clone)]
pub struct Enricher {
    builder_version: String,
}

impl Enricher {
    #[must_use]
    pub fn new() -> Self {
        Self {
            builder_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Augment a draft with integration wiring and provenance metadata
    ///
    /// When the category has an integration, a wiring stub referencing the
    /// endpoint and the local-fallback path is prepended to the body and the
    /// descriptor is recorded in the metadata. The compliance and provenance
    /// stamps are always refreshed.
    #[must_use]
    pub fn enrich(&self, mut draft: ArtifactDraft) -> ArtifactDraft {
        if let Some(integration) = integration_for(draft.category) {
            // metadata.integration doubles as the already-enriched marker
            if draft.metadata.integration.is_none() {
                draft.body = format!(
                    "// integration: {name} ({endpoint})\n\
                     // unreachable endpoints fall back to local processing\n\n\
                     {body}",
                    name = integration.name,
                    endpoint = integration.endpoint,
                    body = draft.body,
                );
            }
            draft.metadata.integration = Some(integration);
        }

        let now = Utc::now();
        draft.metadata.compliance = Some(ComplianceStamp {
            checked: true,
            checked_at: now,
        });
        draft.metadata.provenance = Some(BuildProvenance {
            builder_version: self.builder_version.clone(),
            built_at: now,
        });
        draft
    }
}

impl Default for Enricher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use toolsmith_store::ArtifactMetadata;

    fn draft(category: Category) -> ArtifactDraft {
        ArtifactDraft {
            name: "Sample".to_string(),
            description: "Sample tool".to_string(),
            category,
            body: "// original body".to_string(),
            metadata: ArtifactMetadata::default(),
        }
    }

    #[test]
    fn integrated_categories_get_wiring_and_descriptor() {
        let enriched = Enricher::new().enrich(draft(Category::Pdf));
        assert!(enriched.body.starts_with("// integration: PDFShift"));
        assert!(enriched.body.contains("fall back to local processing"));
        assert!(enriched.body.ends_with("// original body"));
        assert_eq!(enriched.metadata.integration.unwrap().name, "PDFShift");
    }

    #[test]
    fn categories_without_integration_keep_their_body() {
        let enriched = Enricher::new().enrich(draft(Category::Security));
        assert_eq!(enriched.body, "// original body");
        assert!(enriched.metadata.integration.is_none());
    }

    #[test]
    fn stamps_are_always_applied() {
        let enriched = Enricher::new().enrich(draft(Category::Unique));
        let compliance = enriched.metadata.compliance.unwrap();
        assert!(compliance.checked);
        let provenance = enriched.metadata.provenance.unwrap();
        assert_eq!(provenance.builder_version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn enrichment_is_idempotent() {
        let enricher = Enricher::new();
        let once = enricher.enrich(draft(Category::Video));
        let twice = enricher.enrich(once.clone());

        assert_eq!(twice.body, once.body);
        assert_eq!(twice.metadata.integration, once.metadata.integration);
        assert_eq!(
            twice.body.matches("// integration:").count(),
            1,
            "wiring stub must not be prepended twice"
        );
    }
}
