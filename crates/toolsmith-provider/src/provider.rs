//! The generation provider seam
//!
//! The external content-generation capability, reduced to a single fallible
//! call. The real system sits behind an LLM vendor; the core treats the
//! boundary as untrusted and latency-bearing, and never retries inside it.

use crate::draft::{ArtifactDraft, EnrichedSpec};
use crate::error::ProviderError;
use toolsmith_store::{ArtifactMetadata, Category};

/// External draft-generation capability
///
/// Implementations must not retry silently; retry policy, if any, belongs to
/// the orchestrator. Callers validate the returned draft before trusting it.
#[async_trait::async_trait]
pub trait ArtifactProvider: Send + Sync {
    /// Produce a draft artifact from an enriched spec
    async fn request_draft(&self, spec: &EnrichedSpec) -> Result<ArtifactDraft, ProviderError>;
}

/// Deterministic offline provider
///
/// Renders a stub implementation from a fixed template: the artifact name is
/// the title-cased request text and the body references the enhanced
/// description. Useful for demos and anywhere a vendor-backed provider is
/// unavailable.
#[derive(Debug, Clone, Default)]
pub struct TemplateProvider;

impl TemplateProvider {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn title_case(text: &str) -> String {
        text.split_whitespace()
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn default_features(category: Category) -> Vec<String> {
        let features: &[&str] = match category {
            Category::Pdf => &["page-level processing", "batch input"],
            Category::Video => &["frame-accurate editing", "format conversion"],
            Category::Ai => &["prompt templates", "result explanations"],
            Category::Image => &["lossless preview", "batch input"],
            Category::Productivity => &["keyboard shortcuts", "export to CSV"],
            Category::Security => &["local-only processing", "configurable strength"],
            Category::Developer => &["syntax highlighting", "shareable snippets"],
            Category::Unique => &["guided setup"],
        };
        features.iter().map(|f| f.to_string()).collect()
    }
}

#[async_trait::async_trait]
impl ArtifactProvider for TemplateProvider {
    async fn request_draft(&self, spec: &EnrichedSpec) -> Result<ArtifactDraft, ProviderError> {
        let name = Self::title_case(spec.raw.trim());
        if name.is_empty() {
            return Err(ProviderError::Upstream("nothing to generate from an empty spec".to_string()));
        }

        let body = format!(
            "// {name}\n\
             // {description}\n\
             export function run(input) {{\n\
             \x20   if (input == null) throw new Error('input required');\n\
             \x20   return process(input);\n\
             }}\n",
            description = spec.description,
        );

        tracing::debug!(%name, category = %spec.category, "template draft rendered");
        Ok(ArtifactDraft {
            name,
            description: spec.description.clone(),
            category: spec.category,
            body,
            metadata: ArtifactMetadata {
                features: Self::default_features(spec.category),
                ..ArtifactMetadata::default()
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn template_provider_title_cases_the_name() {
        let provider = TemplateProvider::new();
        let spec = EnrichedSpec::new("password generator", "A password generator.", Category::Security);
        let draft = provider.request_draft(&spec).await.unwrap();

        assert_eq!(draft.name, "Password Generator");
        assert_eq!(draft.category, Category::Security);
        assert!(draft.validate().is_ok());
        assert!(!draft.metadata.features.is_empty());
    }

    #[tokio::test]
    async fn template_provider_rejects_blank_specs() {
        let provider = TemplateProvider::new();
        let spec = EnrichedSpec::new("   ", "whitespace", Category::Unique);
        assert!(matches!(
            provider.request_draft(&spec).await,
            Err(ProviderError::Upstream(_))
        ));
    }
}
