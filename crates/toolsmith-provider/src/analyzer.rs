//! Spec analysis: description enhancement and categorization
//!
//! Both calls are auxiliary. The orchestrator degrades gracefully when they
//! fail: the original description and the default category are used instead
//! of aborting the pipeline.

use crate::error::ProviderError;
use toolsmith_store::Category;

/// Fallible, possibly-external analysis of a raw spec
#[async_trait::async_trait]
pub trait SpecAnalyzer: Send + Sync {
    /// Produce a more detailed description of the requested tool
    async fn enhance_description(&self, spec: &str) -> Result<String, ProviderError>;

    /// Classify the request into a category
    async fn categorize(&self, spec: &str) -> Result<Category, ProviderError>;
}

/// Deterministic keyword-based analyzer
///
/// Works offline; also the fallback of choice in tests. Classification scans
/// for domain keywords in priority order and falls back to
/// [`Category::Unique`].
#[derive(Debug, Clone, Default)]
pub struct KeywordAnalyzer;

impl KeywordAnalyzer {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn classify(spec: &str) -> Category {
        let text = spec.to_lowercase();
        let hit = |words: &[&str]| words.iter().any(|w| text.contains(w));

        if hit(&["password", "encrypt", "decrypt", "vpn", "privacy", "secure"]) {
            Category::Security
        } else if hit(&["pdf", "document", "ocr", "signature"]) {
            Category::Pdf
        } else if hit(&["video", "subtitle", "trim", "footage"]) {
            Category::Video
        } else if hit(&["image", "photo", "picture", "logo", "background"]) {
            Category::Image
        } else if hit(&["code", "api", "regex", "json", "debug", "sql"]) {
            Category::Developer
        } else if hit(&["schedule", "task", "resume", "calendar", "spreadsheet", "excel", "email"]) {
            Category::Productivity
        } else if hit(&["chat", "assistant", "summar", "translat", "ai"]) {
            Category::Ai
        } else {
            Category::Unique
        }
    }
}

#[async_trait::async_trait]
impl SpecAnalyzer for KeywordAnalyzer {
    async fn enhance_description(&self, spec: &str) -> Result<String, ProviderError> {
        let trimmed = spec.trim();
        let mut chars = trimmed.chars();
        let capitalized = match chars.next() {
            Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            None => return Err(ProviderError::Upstream("empty spec".to_string())),
        };
        Ok(format!(
            "{capitalized}, with input validation, clear error reporting, and progress feedback."
        ))
    }

    async fn categorize(&self, spec: &str) -> Result<Category, ProviderError> {
        let category = Self::classify(spec);
        tracing::debug!(%category, "spec classified by keyword scan");
        Ok(category)
    }
}
