//! Generation pipeline orchestrator
//!
//! Sequences the stage machine for each submitted request: analysis,
//! compliance gating, the provider call, enrichment, dedup, and persistence.
//! Submission returns immediately; the pipeline runs as an independent task
//! and its outcome is observable only through the stored request record and
//! the progress stream. Every submitted request reaches a terminal state
//! whether or not anyone is watching.

use crate::enrich::Enricher;
use crate::error::PipelineError;
use crate::gate::ComplianceGate;
use crate::progress::{ProgressBus, ProgressEvent, ProgressUpdate};
use crate::stage::{self, Stage};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use toolsmith_provider::{ArtifactDraft, ArtifactProvider, EnrichedSpec, ProviderError, SpecAnalyzer};
use toolsmith_store::{
    ArtifactId, ArtifactStore, Category, RequestId, RequestStatus, RequestUpdate,
};

/// Completion message for the dedup path
const REUSE_MESSAGE: &str = "Tool already exists and is ready to use!";

/// Orchestrator tuning knobs
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Simulated latency inserted after each stage transition
    pub stage_delay: Duration,
    /// Deadline for the provider call; expiry is a provider error. `None`
    /// lets the call run unbounded.
    pub provider_deadline: Option<Duration>,
    /// Progress broadcast capacity; bounds how far an observer may lag
    pub progress_capacity: usize,
}

impl PipelineConfig {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn with_stage_delay(mut self, delay: Duration) -> Self {
        self.stage_delay = delay;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_provider_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.provider_deadline = deadline;
        self
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            stage_delay: Duration::ZERO,
            provider_deadline: Some(Duration::from_secs(30)),
            progress_capacity: 256,
        }
    }
}

struct Inner {
    store: Arc<ArtifactStore>,
    provider: Arc<dyn ArtifactProvider>,
    analyzer: Arc<dyn SpecAnalyzer>,
    gate: ComplianceGate,
    enricher: Enricher,
    progress: ProgressBus,
    config: PipelineConfig,
}

/// The orchestrator handle; cheap to clone
///
/// All collaborators are injected at construction. Requires a tokio runtime:
/// [`GenerationPipeline::submit`] spawns the per-request task.
#[derive(Clone)]
pub struct GenerationPipeline {
    inner: Arc<Inner>,
}

impl GenerationPipeline {
    #[must_use]
    pub fn new(
        store: Arc<ArtifactStore>,
        provider: Arc<dyn ArtifactProvider>,
        analyzer: Arc<dyn SpecAnalyzer>,
        gate: ComplianceGate,
        config: PipelineConfig,
    ) -> Self {
        let progress = ProgressBus::new(config.progress_capacity);
        Self {
            inner: Arc::new(Inner {
                store,
                provider,
                analyzer,
                gate,
                enricher: Enricher::new(),
                progress,
                config,
            }),
        }
    }

    /// Submit a spec for generation
    ///
    /// Validates only the submission itself; everything downstream is
    /// reported through the request record and the progress stream, never by
    /// failing this call. Returns as soon as the request record exists.
    pub fn submit(&self, spec: &str, requester: Option<String>) -> Result<RequestId, PipelineError> {
        let trimmed = spec.trim();
        if trimmed.is_empty() {
            return Err(PipelineError::InvalidSpec);
        }

        let request = self.inner.store.create_request(trimmed, requester);
        let id = request.id;
        self.inner
            .store
            .update_request(id, RequestUpdate::new().status(RequestStatus::Processing))?;
        tracing::info!(%id, "generation request submitted");

        let inner = Arc::clone(&self.inner);
        let spec_text = trimmed.to_string();
        tokio::spawn(async move {
            if let Err(err) = drive(&inner, id, &spec_text).await {
                fail(&inner, id, &err);
            }
        });

        Ok(id)
    }

    /// Join the progress broadcast group
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ProgressEvent> {
        self.inner.progress.subscribe()
    }

    /// The repository this pipeline writes through
    #[must_use]
    pub fn store(&self) -> &Arc<ArtifactStore> {
        &self.inner.store
    }

    /// The gate used for pre-generation screening
    #[must_use]
    pub fn gate(&self) -> &ComplianceGate {
        &self.inner.gate
    }
}

/// Walk the stage machine for one request
///
/// Stages within a request are strictly sequential; requests are independent
/// tasks. Each transition performs exactly one progress emission and one
/// durable update.
async fn drive(inner: &Inner, id: RequestId, spec: &str) -> Result<(), PipelineError> {
    begin(inner, id).await?;

    enter(inner, id, Stage::Analyzing, Stage::Planning).await?;
    let description = match inner.analyzer.enhance_description(spec).await {
        Ok(enhanced) => enhanced,
        Err(err) => {
            tracing::warn!(%id, error = %err, "description enhancement degraded to original text");
            spec.to_string()
        }
    };
    let category = match inner.analyzer.categorize(spec).await {
        Ok(category) => category,
        Err(err) => {
            tracing::warn!(%id, error = %err, "categorization degraded to default");
            Category::Unique
        }
    };

    // The gate sees the raw request text, before any provider spend.
    enter(inner, id, Stage::Planning, Stage::Validating).await?;
    let verdict = inner.gate.check(spec);
    if !verdict.permitted {
        let reason = verdict
            .reason
            .unwrap_or_else(|| "restricted request".to_string());
        return Err(PipelineError::ComplianceBlocked(reason));
    }

    enter(inner, id, Stage::Validating, Stage::Generating).await?;
    let enriched_spec = EnrichedSpec::new(spec, description, category);
    let draft = request_draft(inner, &enriched_spec).await?;
    draft.validate()?;

    enter(inner, id, Stage::Generating, Stage::Testing).await?;
    let draft = inner.enricher.enrich(draft);

    if let Some(existing) = inner.store.find_by_name(&draft.name) {
        tracing::debug!(%id, artifact = %existing.id, "draft resolves to an existing artifact");
        return complete(inner, id, Stage::Testing, existing.id, REUSE_MESSAGE);
    }

    enter(inner, id, Stage::Testing, Stage::Deploying).await?;
    let (artifact, created) = inner.store.find_or_create(draft.into())?;
    let message = if created {
        Stage::Completed.message()
    } else {
        // Lost a same-name race after the testing-stage probe; the winner's
        // artifact serves this request too.
        REUSE_MESSAGE
    };
    complete(inner, id, Stage::Deploying, artifact.id, message)
}

/// Call the provider under the configured deadline
async fn request_draft(
    inner: &Inner,
    spec: &EnrichedSpec,
) -> Result<ArtifactDraft, PipelineError> {
    let draft = match inner.config.provider_deadline {
        Some(deadline) => tokio::time::timeout(deadline, inner.provider.request_draft(spec))
            .await
            .map_err(|_| ProviderError::DeadlineExceeded(deadline.as_millis() as u64))??,
        None => inner.provider.request_draft(spec).await?,
    };
    Ok(draft)
}

/// Enter the first stage
async fn begin(inner: &Inner, id: RequestId) -> Result<(), PipelineError> {
    let progress = Stage::Analyzing.progress().unwrap_or(0);
    inner
        .store
        .update_request(id, RequestUpdate::new().progress(progress))?;
    emit(inner, id, Stage::Analyzing, progress, Stage::Analyzing.message());
    pause(inner).await;
    Ok(())
}

/// Validated transition into a non-terminal stage
async fn enter(inner: &Inner, id: RequestId, from: Stage, to: Stage) -> Result<(), PipelineError> {
    stage::validate_transition(from, to)?;
    let progress = to.progress().unwrap_or(0);
    inner
        .store
        .update_request(id, RequestUpdate::new().progress(progress))?;
    emit(inner, id, to, progress, to.message());
    tracing::debug!(%id, stage = %to, progress, "stage entered");
    pause(inner).await;
    Ok(())
}

/// Terminal success transition
fn complete(
    inner: &Inner,
    id: RequestId,
    from: Stage,
    artifact_id: ArtifactId,
    message: &str,
) -> Result<(), PipelineError> {
    stage::validate_transition(from, Stage::Completed)?;
    inner.store.update_request(
        id,
        RequestUpdate::new()
            .status(RequestStatus::Completed)
            .progress(100)
            .artifact(artifact_id)
            .completed_at(Utc::now()),
    )?;
    emit(inner, id, Stage::Completed, 100, message);
    tracing::info!(%id, artifact = %artifact_id, "generation completed");
    Ok(())
}

/// Terminal failure: persist the message, keep the last progress value, emit
/// exactly one error event. Never panics and never propagates further.
fn fail(inner: &Inner, id: RequestId, err: &PipelineError) {
    let last_progress = inner.store.get_request(id).map(|r| r.progress).unwrap_or(0);

    let outcome = inner.store.update_request(
        id,
        RequestUpdate::new()
            .status(RequestStatus::Failed)
            .error(err.to_string())
            .completed_at(Utc::now()),
    );
    if let Err(store_err) = outcome {
        // Requests are never deleted, so this is a store inconsistency;
        // log it and keep the process alive.
        tracing::error!(%id, error = %store_err, "failure handling hit a vanished request record");
    }

    emit(
        inner,
        id,
        Stage::Error,
        last_progress,
        &format!("Generation failed: {err}"),
    );
    tracing::error!(%id, error = %err, "generation pipeline failed");
}

fn emit(inner: &Inner, id: RequestId, step: Stage, progress: u8, message: &str) {
    inner.progress.publish(ProgressEvent::new(
        id,
        ProgressUpdate {
            step,
            progress,
            message: message.to_string(),
        },
    ));
}

async fn pause(inner: &Inner) {
    if !inner.config.stage_delay.is_zero() {
        tokio::time::sleep(inner.config.stage_delay).await;
    }
}
