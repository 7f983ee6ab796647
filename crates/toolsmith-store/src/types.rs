//! Core entity types for the artifact repository
//!
//! Defines the fundamental types of the generation platform:
//! - Request and artifact identifiers
//! - Tool categories
//! - Generation requests and their lifecycle status
//! - Artifacts and their metadata
//! - The process-wide analytics aggregate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Unique generation-request identifier
///
/// Allocated monotonically by the store at creation time, so id order is
/// insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RequestId(pub u64);

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "req-{}", self.0)
    }
}

/// Unique artifact identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ArtifactId(pub u64);

impl std::fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "tool-{}", self.0)
    }
}

/// Closed set of tool domains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Pdf,
    Video,
    Ai,
    Image,
    Productivity,
    Security,
    Developer,
    Unique,
}

impl Category {
    /// All categories, in catalog order
    pub const ALL: [Category; 8] = [
        Category::Pdf,
        Category::Video,
        Category::Ai,
        Category::Image,
        Category::Productivity,
        Category::Security,
        Category::Developer,
        Category::Unique,
    ];

    /// Human-facing summary of the domain
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Category::Pdf => "Merge, split, compress, OCR, and AI analysis",
            Category::Video => "Edit, convert, compress, and AI enhancement",
            Category::Ai => "Assistants, image generation, analysis",
            Category::Image => "Edit, enhance, background removal, AI art",
            Category::Productivity => "Automation, scheduling, AI writing",
            Category::Security => "Encryption, password management, privacy",
            Category::Developer => "Code generation, API testing, debugging",
            Category::Unique => "Tools that fit no other category",
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Pdf => "pdf",
            Category::Video => "video",
            Category::Ai => "ai",
            Category::Image => "image",
            Category::Productivity => "productivity",
            Category::Security => "security",
            Category::Developer => "developer",
            Category::Unique => "unique",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pdf" => Ok(Category::Pdf),
            "video" => Ok(Category::Video),
            "ai" => Ok(Category::Ai),
            "image" => Ok(Category::Image),
            "productivity" => Ok(Category::Productivity),
            "security" => Ok(Category::Security),
            "developer" => Ok(Category::Developer),
            "unique" => Ok(Category::Unique),
            other => Err(UnknownCategory(other.to_string())),
        }
    }
}

/// Error for unrecognized category labels
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);

/// Lifecycle status of a generation request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl RequestStatus {
    /// Whether this is a terminal status
    #[inline]
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, RequestStatus::Completed | RequestStatus::Failed)
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Processing => "processing",
            RequestStatus::Completed => "completed",
            RequestStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// A user's generation request and its durable progress record
///
/// Created by the orchestrator at submission time and mutated only by it
/// during stage transitions. Never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub id: RequestId,
    /// Original natural-language request text
    pub spec: String,
    /// Optional requester label; the core does not authenticate it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requester: Option<String>,
    pub status: RequestStatus,
    /// 0-100, non-decreasing while processing
    pub progress: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact_id: Option<ArtifactId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Set exactly once, on reaching a terminal status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

/// Partial update applied to a [`GenerationRequest`]
///
/// The caller is responsible for invariant preservation (monotonic progress,
/// a single terminal transition).
#[derive(Debug, Clone, Default)]
pub struct RequestUpdate {
    pub status: Option<RequestStatus>,
    pub progress: Option<u8>,
    pub artifact_id: Option<ArtifactId>,
    pub error_message: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl RequestUpdate {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn status(mut self, status: RequestStatus) -> Self {
        self.status = Some(status);
        self
    }

    #[inline]
    #[must_use]
    pub fn progress(mut self, progress: u8) -> Self {
        self.progress = Some(progress);
        self
    }

    #[inline]
    #[must_use]
    pub fn artifact(mut self, id: ArtifactId) -> Self {
        self.artifact_id = Some(id);
        self
    }

    #[inline]
    #[must_use]
    pub fn error(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn completed_at(mut self, at: DateTime<Utc>) -> Self {
        self.completed_at = Some(at);
        self
    }
}

/// Integration wiring descriptor attached to enriched artifacts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationDescriptor {
    pub name: String,
    pub endpoint: String,
    pub description: String,
}

/// Compliance stamp recorded during enrichment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceStamp {
    pub checked: bool,
    pub checked_at: DateTime<Utc>,
}

/// Build provenance recorded during enrichment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildProvenance {
    pub builder_version: String,
    pub built_at: DateTime<Utc>,
}

/// Artifact metadata: an open attribute bag with closed well-known keys
///
/// The core only writes the typed fields; anything else a provider attaches
/// survives round-trips through `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactMetadata {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integration: Option<IntegrationDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compliance: Option<ComplianceStamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provenance: Option<BuildProvenance>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// A generated (or seeded) tool artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    pub id: ArtifactId,
    /// Human label; natural dedup key (case-sensitive exact match)
    pub name: String,
    pub description: String,
    pub category: Category,
    /// Opaque generated content blob
    pub body: String,
    pub metadata: ArtifactMetadata,
    /// Incremented on each recorded use; never decremented
    pub usage_count: u64,
    pub created_at: DateTime<Utc>,
}

/// Input for artifact creation; the store allocates id and timestamps
#[derive(Debug, Clone)]
pub struct NewArtifact {
    pub name: String,
    pub description: String,
    pub category: Category,
    pub body: String,
    pub metadata: ArtifactMetadata,
}

/// Process-wide usage aggregate snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    /// Artifacts persisted by generation
    pub artifacts_generated: u64,
    pub total_requests: u64,
    pub completed_requests: u64,
    pub failed_requests: u64,
    /// Completed / (completed + failed), as a whole percentage
    pub success_rate: u8,
    /// Requests currently in flight
    pub active_sessions: u64,
    pub updated_at: DateTime<Utc>,
}
