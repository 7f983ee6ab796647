//! Service facade
//!
//! One method per operation the (out-of-scope) transport layer triggers:
//! submission, status, progress subscription, the repository read queries,
//! use-recording, the compliance probe, and the catalog/analytics summaries.

use crate::enrich::integration_for;
use crate::error::PipelineError;
use crate::gate::{ComplianceGate, Verdict};
use crate::pipeline::{GenerationPipeline, PipelineConfig};
use crate::progress::ProgressEvent;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::broadcast;
use toolsmith_provider::{ArtifactProvider, KeywordAnalyzer, SpecAnalyzer};
use toolsmith_store::{
    seed, Analytics, Artifact, ArtifactId, ArtifactStore, Category, GenerationRequest,
    IntegrationDescriptor, RequestId,
};

/// Per-category catalog entry
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub category: Category,
    pub count: usize,
    pub description: &'static str,
}

/// Coarse health summary
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemStatus {
    pub provider: &'static str,
    pub compliance: &'static str,
    pub integrations: usize,
    pub total_artifacts: usize,
    pub success_rate: u8,
}

/// The platform facade: a store, a pipeline, and a gate, wired together
pub struct ToolsmithService {
    store: Arc<ArtifactStore>,
    pipeline: GenerationPipeline,
    gate: ComplianceGate,
}

impl ToolsmithService {
    /// Assemble a service from explicit parts
    #[must_use]
    pub fn new(
        store: Arc<ArtifactStore>,
        provider: Arc<dyn ArtifactProvider>,
        analyzer: Arc<dyn SpecAnalyzer>,
        gate: ComplianceGate,
        config: PipelineConfig,
    ) -> Self {
        let pipeline = GenerationPipeline::new(
            Arc::clone(&store),
            provider,
            analyzer,
            gate.clone(),
            config,
        );
        Self {
            store,
            pipeline,
            gate,
        }
    }

    /// Service with the seeded catalog, keyword analyzer, built-in gate, and
    /// default pipeline config
    #[must_use]
    pub fn with_defaults(provider: Arc<dyn ArtifactProvider>) -> Self {
        Self::new(
            Arc::new(ArtifactStore::with_catalog(seed::default_catalog())),
            provider,
            Arc::new(KeywordAnalyzer::new()),
            ComplianceGate::new(),
            PipelineConfig::default(),
        )
    }

    // ---- Generation ----

    /// Submit a spec; returns the request id before the pipeline completes
    pub fn submit(&self, spec: &str, requester: Option<String>) -> Result<RequestId, PipelineError> {
        self.pipeline.submit(spec, requester)
    }

    /// Current request snapshot, or `None` for unknown ids
    #[must_use]
    pub fn status(&self, id: RequestId) -> Option<GenerationRequest> {
        self.store.get_request(id)
    }

    /// Join the progress stream
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ProgressEvent> {
        self.pipeline.subscribe()
    }

    // ---- Artifact reads ----

    #[must_use]
    pub fn artifact(&self, id: ArtifactId) -> Option<Artifact> {
        self.store.get_artifact(id)
    }

    /// Fetch an artifact for use: records one use, then returns the snapshot
    #[must_use]
    pub fn open_artifact(&self, id: ArtifactId) -> Option<Artifact> {
        self.store.record_use(id).ok()?;
        self.store.get_artifact(id)
    }

    #[must_use]
    pub fn list_all(&self) -> Vec<Artifact> {
        self.store.list_all()
    }

    #[must_use]
    pub fn list_by_category(&self, category: Category) -> Vec<Artifact> {
        self.store.list_by_category(category)
    }

    #[must_use]
    pub fn list_featured(&self, n: usize) -> Vec<Artifact> {
        self.store.list_featured(n)
    }

    #[must_use]
    pub fn list_recent(&self, n: usize) -> Vec<Artifact> {
        self.store.list_recent(n)
    }

    #[must_use]
    pub fn search(&self, query: &str) -> Vec<Artifact> {
        self.store.search(query)
    }

    // ---- Use recording ----

    /// Record one use; unknown ids are a logged no-op, not an error
    pub fn record_use(&self, id: ArtifactId) {
        if let Err(err) = self.store.record_use(id) {
            tracing::warn!(%id, error = %err, "use recorded against unknown artifact");
        }
    }

    // ---- Compliance ----

    /// Gate verdict for a candidate name, without running generation
    #[must_use]
    pub fn check_name(&self, name: &str) -> Verdict {
        self.gate.check(name)
    }

    // ---- Summaries ----

    /// Category catalog with per-category counts
    #[must_use]
    pub fn categories(&self) -> Vec<CategorySummary> {
        Category::ALL
            .iter()
            .map(|&category| CategorySummary {
                category,
                count: self.store.list_by_category(category).len(),
                description: category.description(),
            })
            .collect()
    }

    /// Integration endpoints available to enrichment
    #[must_use]
    pub fn integrations(&self) -> Vec<IntegrationDescriptor> {
        Category::ALL.iter().filter_map(|&c| integration_for(c)).collect()
    }

    #[must_use]
    pub fn analytics(&self) -> Analytics {
        self.store.analytics()
    }

    #[must_use]
    pub fn system_status(&self) -> SystemStatus {
        let analytics = self.store.analytics();
        SystemStatus {
            provider: "ready",
            compliance: "active",
            integrations: self.integrations().len(),
            total_artifacts: self.store.list_all().len(),
            success_rate: analytics.success_rate,
        }
    }

    /// The underlying store (tests and embedding callers)
    #[must_use]
    pub fn store(&self) -> &Arc<ArtifactStore> {
        &self.store
    }
}
