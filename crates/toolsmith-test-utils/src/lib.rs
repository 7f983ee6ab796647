//! Testing utilities for the Toolsmith workspace
//!
//! Stub providers and analyzers with call accounting, plus helpers for
//! driving a pipeline to its terminal state.

#![allow(missing_docs)]

use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use toolsmith_provider::{
    ArtifactDraft, ArtifactProvider, EnrichedSpec, ProviderError, SpecAnalyzer,
};
use toolsmith_store::{
    ArtifactMetadata, ArtifactStore, Category, GenerationRequest, RequestId,
};

/// Provider returning a fixed draft name/category; counts invocations and
/// records the last spec it saw.
#[derive(Debug, Clone)]
pub struct StubProvider {
    name: String,
    category: Category,
    calls: Arc<AtomicUsize>,
    last_spec: Arc<Mutex<Option<EnrichedSpec>>>,
}

impl StubProvider {
    pub fn returning(name: &str, category: Category) -> Self {
        Self {
            name: name.to_string(),
            category,
            calls: Arc::new(AtomicUsize::new(0)),
            last_spec: Arc::new(Mutex::new(None)),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_spec(&self) -> Option<EnrichedSpec> {
        self.last_spec.lock().clone()
    }
}

#[async_trait::async_trait]
impl ArtifactProvider for StubProvider {
    async fn request_draft(&self, spec: &EnrichedSpec) -> Result<ArtifactDraft, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_spec.lock() = Some(spec.clone());
        Ok(ArtifactDraft {
            name: self.name.clone(),
            description: spec.description.clone(),
            category: self.category,
            body: "// stub implementation".to_string(),
            metadata: ArtifactMetadata::default(),
        })
    }
}

/// Provider whose every call fails with the given upstream message
#[derive(Debug, Clone)]
pub struct FailingProvider {
    message: String,
    calls: Arc<AtomicUsize>,
}

impl FailingProvider {
    pub fn with_message(message: &str) -> Self {
        Self {
            message: message.to_string(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl ArtifactProvider for FailingProvider {
    async fn request_draft(&self, _spec: &EnrichedSpec) -> Result<ArtifactDraft, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(ProviderError::Upstream(self.message.clone()))
    }
}

/// Provider that never answers; pair with a pipeline deadline
#[derive(Debug, Clone, Default)]
pub struct HangingProvider;

#[async_trait::async_trait]
impl ArtifactProvider for HangingProvider {
    async fn request_draft(&self, _spec: &EnrichedSpec) -> Result<ArtifactDraft, ProviderError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Err(ProviderError::Upstream("unreachable".to_string()))
    }
}

/// Provider returning a draft with an empty body
#[derive(Debug, Clone, Default)]
pub struct MalformedProvider;

#[async_trait::async_trait]
impl ArtifactProvider for MalformedProvider {
    async fn request_draft(&self, spec: &EnrichedSpec) -> Result<ArtifactDraft, ProviderError> {
        Ok(ArtifactDraft {
            name: "Broken Draft".to_string(),
            description: spec.description.clone(),
            category: spec.category,
            body: String::new(),
            metadata: ArtifactMetadata::default(),
        })
    }
}

/// Analyzer whose calls always fail; exercises graceful degradation
#[derive(Debug, Clone, Default)]
pub struct FailingAnalyzer;

#[async_trait::async_trait]
impl SpecAnalyzer for FailingAnalyzer {
    async fn enhance_description(&self, _spec: &str) -> Result<String, ProviderError> {
        Err(ProviderError::Upstream("analysis backend down".to_string()))
    }

    async fn categorize(&self, _spec: &str) -> Result<Category, ProviderError> {
        Err(ProviderError::Upstream("analysis backend down".to_string()))
    }
}

/// Poll the store until the request reaches a terminal status
///
/// Panics after five seconds; pipelines under test are expected to finish
/// far sooner.
pub async fn wait_for_terminal(store: &ArtifactStore, id: RequestId) -> GenerationRequest {
    let deadline = std::time::Instant::now() + Duration::from_secs(5);
    loop {
        if let Some(request) = store.get_request(id) {
            if request.status.is_terminal() {
                return request;
            }
        }
        assert!(
            std::time::Instant::now() < deadline,
            "request {id} did not reach a terminal state in time"
        );
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
}
