//! Toolsmith Provider - the external generation boundary
//!
//! Everything that crosses into (or stands in for) the external content
//! provider:
//! - [`EnrichedSpec`] and [`ArtifactDraft`], the types on the wire
//! - [`ArtifactProvider`], the single fallible draft-generation call
//! - [`SpecAnalyzer`], the auxiliary enhancement/categorization calls
//! - Deterministic offline implementations of both seams

#![warn(unreachable_pub)]

pub mod analyzer;
pub mod draft;
pub mod error;
pub mod provider;

pub use analyzer::{KeywordAnalyzer, SpecAnalyzer};
pub use draft::{ArtifactDraft, EnrichedSpec};
pub use error::ProviderError;
pub use provider::{ArtifactProvider, TemplateProvider};
