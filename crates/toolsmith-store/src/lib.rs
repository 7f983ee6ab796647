//! Toolsmith Store - the artifact repository
//!
//! In-memory, process-lifetime storage for the generation platform:
//! - Generation requests and their lifecycle records
//! - Artifacts with a natural-key (name) dedup index
//! - Rolling usage analytics
//!
//! The store has no knowledge of pipeline logic; the orchestrator drives all
//! mutations. Construct instances explicitly and inject them - there are no
//! ambient singletons, so every test can hold an isolated store.
//!
//! # Example
//!
//! ```rust,ignore
//! use toolsmith_store::{ArtifactStore, seed};
//!
//! let store = ArtifactStore::with_catalog(seed::default_catalog());
//! let featured = store.list_featured(6);
//! ```

#![warn(unreachable_pub)]

pub mod error;
pub mod seed;
pub mod store;
pub mod types;

pub use error::StoreError;
pub use store::ArtifactStore;
pub use types::{
    Analytics, Artifact, ArtifactId, ArtifactMetadata, BuildProvenance, Category, ComplianceStamp,
    GenerationRequest, IntegrationDescriptor, NewArtifact, RequestId, RequestStatus, RequestUpdate,
    UnknownCategory,
};
