//! Toolsmith Pipeline - the asynchronous generation core
//!
//! The control-flow heart of the platform:
//! - [`GenerationPipeline`]: the per-request stage machine (analysis,
//!   compliance gating, provider call, enrichment, dedup, persistence)
//! - [`ComplianceGate`]: pre-generation deny-list screening
//! - [`Enricher`]: integration wiring and provenance stamps
//! - [`ProgressBus`]: best-effort progress fan-out to observers
//! - [`ToolsmithService`]: the facade the transport layer calls into
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use toolsmith_pipeline::ToolsmithService;
//! use toolsmith_provider::TemplateProvider;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let service = ToolsmithService::with_defaults(Arc::new(TemplateProvider::new()));
//! let mut events = service.subscribe();
//!
//! let id = service.submit("password generator", None)?;
//! while let Ok(event) = events.recv().await {
//!     println!("{}: {}%", event.progress.step, event.progress.progress);
//!     if event.progress.step.is_terminal() {
//!         break;
//!     }
//! }
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]

pub mod enrich;
pub mod error;
pub mod gate;
pub mod pipeline;
pub mod progress;
pub mod service;
pub mod stage;

pub use enrich::{integration_for, Enricher};
pub use error::PipelineError;
pub use gate::{ComplianceGate, Verdict};
pub use pipeline::{GenerationPipeline, PipelineConfig};
pub use progress::{FrameKind, ProgressBus, ProgressEvent, ProgressUpdate};
pub use service::{CategorySummary, SystemStatus, ToolsmithService};
pub use stage::{allowed_transitions, validate_transition, IllegalTransition, Stage};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the generation pipeline
    pub use crate::{
        ComplianceGate, GenerationPipeline, PipelineConfig, PipelineError, ProgressEvent, Stage,
        ToolsmithService,
    };
}
