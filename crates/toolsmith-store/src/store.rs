//! In-memory artifact repository
//!
//! Owns every entity instance: generation requests, artifacts, the
//! artifact-by-name index, and the rolling analytics aggregate. Callers hold
//! identifiers and receive copies-on-read; no live references escape.
//!
//! All operations are synchronous and in-memory. The store is volatile by
//! design: process lifetime only.

use crate::error::StoreError;
use crate::types::{
    Analytics, Artifact, ArtifactId, Category, GenerationRequest, NewArtifact, RequestId,
    RequestStatus, RequestUpdate,
};
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Rolling counters behind the analytics snapshot
#[derive(Debug, Default)]
struct Counters {
    artifacts_generated: u64,
    total_requests: u64,
    completed_requests: u64,
    failed_requests: u64,
    active_sessions: u64,
}

/// The artifact repository
///
/// Construct one instance per system (or per test) and inject it; there is
/// no ambient global.
#[derive(Debug)]
pub struct ArtifactStore {
    requests: DashMap<RequestId, GenerationRequest>,
    artifacts: DashMap<ArtifactId, Artifact>,
    /// Natural-key index; the single writer is [`ArtifactStore::find_or_create`]
    by_name: DashMap<String, ArtifactId>,
    next_request_id: AtomicU64,
    next_artifact_id: AtomicU64,
    counters: Mutex<Counters>,
}

impl ArtifactStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self {
            requests: DashMap::new(),
            artifacts: DashMap::new(),
            by_name: DashMap::new(),
            next_request_id: AtomicU64::new(1),
            next_artifact_id: AtomicU64::new(1),
            counters: Mutex::new(Counters::default()),
        }
    }

    /// Create a store pre-populated with a catalog of artifacts
    ///
    /// Seeded entries do not count toward the generated-artifact counter.
    /// Later catalog entries silently lose name collisions to earlier ones.
    #[must_use]
    pub fn with_catalog(catalog: impl IntoIterator<Item = NewArtifact>) -> Self {
        let store = Self::new();
        for entry in catalog {
            let name = entry.name.clone();
            if store.insert_artifact(entry).is_none() {
                tracing::debug!(%name, "catalog entry skipped: name already present");
            }
        }
        store
    }

    // ---- Generation requests ----

    /// Create a request record in `Pending` with progress 0
    pub fn create_request(&self, spec: impl Into<String>, requester: Option<String>) -> GenerationRequest {
        let id = RequestId(self.next_request_id.fetch_add(1, Ordering::Relaxed));
        let request = GenerationRequest {
            id,
            spec: spec.into(),
            requester,
            status: RequestStatus::Pending,
            progress: 0,
            artifact_id: None,
            error_message: None,
            created_at: Utc::now(),
            completed_at: None,
        };
        self.requests.insert(id, request.clone());
        self.counters.lock().active_sessions += 1;
        tracing::debug!(%id, "generation request created");
        request
    }

    /// Merge a partial update into a request
    ///
    /// The caller preserves the lifecycle invariants (monotonic progress,
    /// single terminal transition). Terminal transitions update the success
    /// counters and release the active-session slot.
    pub fn update_request(
        &self,
        id: RequestId,
        update: RequestUpdate,
    ) -> Result<GenerationRequest, StoreError> {
        let mut entry = self
            .requests
            .get_mut(&id)
            .ok_or(StoreError::RequestNotFound(id))?;

        let was_terminal = entry.status.is_terminal();

        if let Some(status) = update.status {
            entry.status = status;
        }
        if let Some(progress) = update.progress {
            entry.progress = progress;
        }
        if let Some(artifact_id) = update.artifact_id {
            entry.artifact_id = Some(artifact_id);
        }
        if let Some(message) = update.error_message {
            entry.error_message = Some(message);
        }
        if let Some(at) = update.completed_at {
            entry.completed_at = Some(at);
        }

        if !was_terminal && entry.status.is_terminal() {
            let mut counters = self.counters.lock();
            counters.active_sessions = counters.active_sessions.saturating_sub(1);
            match entry.status {
                RequestStatus::Completed => counters.completed_requests += 1,
                RequestStatus::Failed => counters.failed_requests += 1,
                _ => {}
            }
        }

        Ok(entry.clone())
    }

    /// Snapshot of a request, or `None` when unknown
    #[must_use]
    pub fn get_request(&self, id: RequestId) -> Option<GenerationRequest> {
        self.requests.get(&id).map(|r| r.clone())
    }

    /// All requests submitted under the given requester label
    #[must_use]
    pub fn requests_by_requester(&self, requester: &str) -> Vec<GenerationRequest> {
        self.requests
            .iter()
            .filter(|r| r.requester.as_deref() == Some(requester))
            .map(|r| r.clone())
            .collect()
    }

    // ---- Artifacts ----

    /// Exact-match lookup by name; the dedup probe
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<Artifact> {
        let id = *self.by_name.get(name)?;
        self.artifacts.get(&id).map(|a| a.clone())
    }

    /// Snapshot of an artifact, or `None` when unknown
    #[must_use]
    pub fn get_artifact(&self, id: ArtifactId) -> Option<Artifact> {
        self.artifacts.get(&id).map(|a| a.clone())
    }

    /// Create a new artifact; the name must be unused
    pub fn create_artifact(&self, draft: NewArtifact) -> Result<Artifact, StoreError> {
        let (artifact, created) = self.find_or_create(draft)?;
        if created {
            Ok(artifact)
        } else {
            Err(StoreError::DuplicateName(artifact.name))
        }
    }

    /// Atomically resolve a name to an artifact, creating it if absent
    ///
    /// "Check then create" is a single logical step: the name-index entry is
    /// held across the lookup and the insert, so two concurrent requests for
    /// an identical new name produce exactly one artifact. The bool reports
    /// whether this call created it.
    pub fn find_or_create(&self, draft: NewArtifact) -> Result<(Artifact, bool), StoreError> {
        match self.by_name.entry(draft.name.clone()) {
            Entry::Occupied(occupied) => {
                let id = *occupied.get();
                let existing = self
                    .artifacts
                    .get(&id)
                    .map(|a| a.clone())
                    .ok_or(StoreError::Inconsistent(id))?;
                Ok((existing, false))
            }
            Entry::Vacant(vacant) => {
                let id = ArtifactId(self.next_artifact_id.fetch_add(1, Ordering::Relaxed));
                let artifact = Artifact {
                    id,
                    name: draft.name,
                    description: draft.description,
                    category: draft.category,
                    body: draft.body,
                    metadata: draft.metadata,
                    usage_count: 0,
                    created_at: Utc::now(),
                };
                self.artifacts.insert(id, artifact.clone());
                vacant.insert(id);

                let mut counters = self.counters.lock();
                counters.artifacts_generated += 1;
                counters.total_requests += 1;
                drop(counters);

                tracing::info!(%id, name = %artifact.name, category = %artifact.category, "artifact created");
                Ok((artifact, true))
            }
        }
    }

    /// Seed-path insertion: no analytics side effects
    fn insert_artifact(&self, draft: NewArtifact) -> Option<ArtifactId> {
        match self.by_name.entry(draft.name.clone()) {
            Entry::Occupied(_) => None,
            Entry::Vacant(vacant) => {
                let id = ArtifactId(self.next_artifact_id.fetch_add(1, Ordering::Relaxed));
                let artifact = Artifact {
                    id,
                    name: draft.name,
                    description: draft.description,
                    category: draft.category,
                    body: draft.body,
                    metadata: draft.metadata,
                    usage_count: 0,
                    created_at: Utc::now(),
                };
                self.artifacts.insert(id, artifact);
                vacant.insert(id);
                Some(id)
            }
        }
    }

    /// Record one use of an artifact
    pub fn record_use(&self, id: ArtifactId) -> Result<(), StoreError> {
        let mut artifact = self
            .artifacts
            .get_mut(&id)
            .ok_or(StoreError::ArtifactNotFound(id))?;
        artifact.usage_count += 1;
        Ok(())
    }

    // ---- Listings ----

    /// Every artifact, unordered
    #[must_use]
    pub fn list_all(&self) -> Vec<Artifact> {
        self.artifacts.iter().map(|a| a.clone()).collect()
    }

    /// Artifacts in a category, unordered
    #[must_use]
    pub fn list_by_category(&self, category: Category) -> Vec<Artifact> {
        self.artifacts
            .iter()
            .filter(|a| a.category == category)
            .map(|a| a.clone())
            .collect()
    }

    /// Top `n` artifacts by usage, ties broken by insertion order
    #[must_use]
    pub fn list_featured(&self, n: usize) -> Vec<Artifact> {
        let mut all = self.list_all();
        all.sort_by(|a, b| b.usage_count.cmp(&a.usage_count).then(a.id.cmp(&b.id)));
        all.truncate(n);
        all
    }

    /// Most recent `n` artifacts, ties broken by insertion order
    #[must_use]
    pub fn list_recent(&self, n: usize) -> Vec<Artifact> {
        let mut all = self.list_all();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        all.truncate(n);
        all
    }

    /// Case-insensitive substring search over name, description, and category
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<Artifact> {
        let needle = query.to_lowercase();
        self.artifacts
            .iter()
            .filter(|a| {
                a.name.to_lowercase().contains(&needle)
                    || a.description.to_lowercase().contains(&needle)
                    || a.category.as_str().contains(&needle)
            })
            .map(|a| a.clone())
            .collect()
    }

    // ---- Analytics ----

    /// Current aggregate snapshot
    #[must_use]
    pub fn analytics(&self) -> Analytics {
        let counters = self.counters.lock();
        let finished = counters.completed_requests + counters.failed_requests;
        let success_rate = if finished == 0 {
            100
        } else {
            ((counters.completed_requests * 100 + finished / 2) / finished) as u8
        };
        Analytics {
            artifacts_generated: counters.artifacts_generated,
            total_requests: counters.total_requests,
            completed_requests: counters.completed_requests,
            failed_requests: counters.failed_requests,
            success_rate,
            active_sessions: counters.active_sessions,
            updated_at: Utc::now(),
        }
    }
}

impl Default for ArtifactStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ArtifactMetadata;
    use pretty_assertions::assert_eq;

    fn draft(name: &str, category: Category) -> NewArtifact {
        NewArtifact {
            name: name.to_string(),
            description: format!("{name} description"),
            category,
            body: "// body".to_string(),
            metadata: ArtifactMetadata::default(),
        }
    }

    #[test]
    fn request_ids_are_monotonic() {
        let store = ArtifactStore::new();
        let a = store.create_request("first", None);
        let b = store.create_request("second", None);
        assert!(b.id > a.id);
        assert_eq!(a.status, RequestStatus::Pending);
        assert_eq!(a.progress, 0);
    }

    #[test]
    fn update_request_merges_partial_fields() {
        let store = ArtifactStore::new();
        let req = store.create_request("merge me", None);

        let updated = store
            .update_request(req.id, RequestUpdate::new().status(RequestStatus::Processing).progress(40))
            .unwrap();
        assert_eq!(updated.status, RequestStatus::Processing);
        assert_eq!(updated.progress, 40);
        assert_eq!(updated.spec, "merge me");

        let missing = store.update_request(RequestId(999), RequestUpdate::new().progress(1));
        assert!(matches!(missing, Err(StoreError::RequestNotFound(_))));
    }

    #[test]
    fn requests_are_filterable_by_requester() {
        let store = ArtifactStore::new();
        store.create_request("one", Some("alice".to_string()));
        store.create_request("two", Some("bob".to_string()));
        store.create_request("three", Some("alice".to_string()));
        store.create_request("four", None);

        let mine = store.requests_by_requester("alice");
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|r| r.requester.as_deref() == Some("alice")));
        assert!(store.requests_by_requester("carol").is_empty());
    }

    #[test]
    fn terminal_transition_updates_counters_once() {
        let store = ArtifactStore::new();
        let req = store.create_request("finish", None);
        assert_eq!(store.analytics().active_sessions, 1);

        store
            .update_request(
                req.id,
                RequestUpdate::new()
                    .status(RequestStatus::Completed)
                    .progress(100)
                    .completed_at(Utc::now()),
            )
            .unwrap();

        // A second write to an already-terminal request must not double count.
        store
            .update_request(req.id, RequestUpdate::new().status(RequestStatus::Completed))
            .unwrap();

        let analytics = store.analytics();
        assert_eq!(analytics.active_sessions, 0);
        assert_eq!(analytics.completed_requests, 1);
        assert_eq!(analytics.success_rate, 100);
    }

    #[test]
    fn success_rate_reflects_failures() {
        let store = ArtifactStore::new();
        for outcome in [RequestStatus::Completed, RequestStatus::Failed] {
            let req = store.create_request("spec", None);
            store
                .update_request(req.id, RequestUpdate::new().status(outcome))
                .unwrap();
        }
        assert_eq!(store.analytics().success_rate, 50);
    }

    #[test]
    fn find_or_create_is_idempotent_by_name() {
        let store = ArtifactStore::new();
        let (first, created) = store.find_or_create(draft("PDF Merger", Category::Pdf)).unwrap();
        assert!(created);

        let (second, created) = store.find_or_create(draft("PDF Merger", Category::Pdf)).unwrap();
        assert!(!created);
        assert_eq!(second.id, first.id);

        assert_eq!(store.list_all().len(), 1);
        assert_eq!(store.analytics().artifacts_generated, 1);
    }

    #[test]
    fn name_match_is_case_sensitive() {
        let store = ArtifactStore::new();
        store.find_or_create(draft("PDF Merger", Category::Pdf)).unwrap();
        let (_, created) = store.find_or_create(draft("Pdf merger", Category::Pdf)).unwrap();
        assert!(created);
        assert_eq!(store.list_all().len(), 2);
    }

    #[test]
    fn concurrent_find_or_create_single_winner() {
        let store = std::sync::Arc::new(ArtifactStore::new());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = store.clone();
            handles.push(std::thread::spawn(move || {
                store.find_or_create(draft("Race Tool", Category::Unique)).unwrap()
            }));
        }
        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|(_, created)| *created)
            .count();
        assert_eq!(winners, 1);
        assert_eq!(store.list_all().len(), 1);
        assert_eq!(store.analytics().artifacts_generated, 1);
    }

    #[test]
    fn create_artifact_rejects_duplicates() {
        let store = ArtifactStore::new();
        store.create_artifact(draft("Solo", Category::Ai)).unwrap();
        let dup = store.create_artifact(draft("Solo", Category::Ai));
        assert!(matches!(dup, Err(StoreError::DuplicateName(_))));
    }

    #[test]
    fn record_use_increments_and_reports_missing() {
        let store = ArtifactStore::new();
        let artifact = store.create_artifact(draft("Counter", Category::Developer)).unwrap();

        store.record_use(artifact.id).unwrap();
        store.record_use(artifact.id).unwrap();
        assert_eq!(store.get_artifact(artifact.id).unwrap().usage_count, 2);

        let missing = store.record_use(ArtifactId(404));
        assert!(matches!(missing, Err(StoreError::ArtifactNotFound(_))));
        // Nothing else changed.
        assert_eq!(store.get_artifact(artifact.id).unwrap().usage_count, 2);
    }

    #[test]
    fn featured_sorts_by_usage_then_insertion() {
        let store = ArtifactStore::new();
        let a = store.create_artifact(draft("A", Category::Pdf)).unwrap();
        let b = store.create_artifact(draft("B", Category::Pdf)).unwrap();
        let c = store.create_artifact(draft("C", Category::Pdf)).unwrap();

        store.record_use(b.id).unwrap();
        store.record_use(b.id).unwrap();
        store.record_use(c.id).unwrap();

        let featured = store.list_featured(6);
        let names: Vec<_> = featured.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["B", "C", "A"]);

        // usage ties (A has 0, none others at 0) fall back to insertion order
        store.record_use(a.id).unwrap();
        let featured = store.list_featured(2);
        assert_eq!(featured.len(), 2);
        assert_eq!(featured[0].name, "B");
    }

    #[test]
    fn recent_is_truncated_and_ordered() {
        let store = ArtifactStore::new();
        for name in ["one", "two", "three"] {
            store.create_artifact(draft(name, Category::Unique)).unwrap();
        }
        let recent = store.list_recent(2);
        assert_eq!(recent.len(), 2);
        // Equal timestamps are possible at this resolution; insertion order
        // (id order) breaks the tie, newest first overall.
        assert!(recent[0].created_at >= recent[1].created_at);
    }

    #[test]
    fn search_matches_name_description_and_category() {
        let store = ArtifactStore::new();
        store.create_artifact(draft("Invoice Helper", Category::Productivity)).unwrap();
        store.create_artifact(draft("Photo Fixer", Category::Image)).unwrap();

        assert_eq!(store.search("invoice").len(), 1);
        assert_eq!(store.search("FIXER").len(), 1);
        assert_eq!(store.search("image").len(), 1);
        assert!(store.search("spreadsheet").is_empty());
    }

    #[test]
    fn catalog_seeding_skips_generated_counter() {
        let store = ArtifactStore::with_catalog(vec![
            draft("Seeded One", Category::Pdf),
            draft("Seeded Two", Category::Video),
            draft("Seeded One", Category::Pdf),
        ]);
        assert_eq!(store.list_all().len(), 2);
        assert_eq!(store.analytics().artifacts_generated, 0);
    }
}
