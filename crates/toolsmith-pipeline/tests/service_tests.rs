//! Facade-level scenarios against the seeded catalog

use pretty_assertions::assert_eq;
use std::sync::Arc;
use toolsmith_pipeline::{SystemStatus, ToolsmithService};
use toolsmith_provider::TemplateProvider;
use toolsmith_store::{ArtifactId, Category, RequestStatus};
use toolsmith_test_utils::wait_for_terminal;

fn service() -> ToolsmithService {
    ToolsmithService::with_defaults(Arc::new(TemplateProvider::new()))
}

#[test]
fn seeded_catalog_is_visible_through_the_facade() {
    let service = service();
    assert_eq!(service.list_all().len(), 8);
    assert_eq!(service.list_by_category(Category::Pdf).len(), 2);
    assert!(service.artifact(ArtifactId(1)).is_some());
}

#[test]
fn categories_carry_seeded_counts() {
    let service = service();
    let categories = service.categories();
    assert_eq!(categories.len(), Category::ALL.len());

    let pdf = categories
        .iter()
        .find(|c| c.category == Category::Pdf)
        .unwrap();
    assert_eq!(pdf.count, 2);
    assert!(!pdf.description.is_empty());

    let unique = categories
        .iter()
        .find(|c| c.category == Category::Unique)
        .unwrap();
    assert_eq!(unique.count, 0);
}

#[test]
fn integrations_cover_the_wired_categories() {
    let service = service();
    let integrations = service.integrations();
    assert_eq!(integrations.len(), 4);
    assert!(integrations.iter().any(|i| i.name == "PDFShift"));
}

#[test]
fn open_artifact_records_one_use() {
    let service = service();
    let before = service.artifact(ArtifactId(3)).unwrap();

    let opened = service.open_artifact(ArtifactId(3)).unwrap();
    assert_eq!(opened.usage_count, before.usage_count + 1);

    // unknown ids return nothing and record nothing
    assert!(service.open_artifact(ArtifactId(999)).is_none());
}

#[test]
fn record_use_on_unknown_id_is_a_noop() {
    let service = service();
    service.record_use(ArtifactId(999));
    assert_eq!(service.list_all().len(), 8);
}

#[test]
fn featured_ranks_by_usage() {
    let service = service();
    for _ in 0..3 {
        service.record_use(ArtifactId(5));
    }
    service.record_use(ArtifactId(2));

    let featured = service.list_featured(3);
    assert_eq!(featured.len(), 3);
    assert_eq!(featured[0].id, ArtifactId(5));
    assert_eq!(featured[1].id, ArtifactId(2));
}

#[test]
fn search_matches_name_description_and_category() {
    let service = service();

    let by_name = service.search("regex");
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0].name, "Regex Workbench");

    let by_category = service.search("pdf");
    assert!(by_category.len() >= 2);

    assert!(service.search("no such thing anywhere").is_empty());
}

#[test]
fn check_name_probes_the_gate_without_generating() {
    let service = service();

    let blocked = service.check_name("YouTube Video Downloader");
    assert!(!blocked.permitted);
    assert!(blocked.reason.is_some());

    let permitted = service.check_name("invoice formatter");
    assert!(permitted.permitted);
    assert!(permitted.reason.is_none());

    // probing never touches the store
    assert_eq!(service.analytics().total_requests, 0);
}

#[test]
fn system_status_reflects_the_catalog() {
    let service = service();
    let status: SystemStatus = service.system_status();
    assert_eq!(status.total_artifacts, 8);
    assert_eq!(status.integrations, 4);
    assert_eq!(status.success_rate, 100);
}

#[tokio::test]
async fn submission_through_the_facade_lands_in_the_catalog() {
    let service = service();
    let mut events = service.subscribe();

    let id = service.submit("markdown table editor", None).unwrap();
    assert_eq!(service.status(id).unwrap().status, RequestStatus::Processing);

    let request = wait_for_terminal(service.store(), id).await;
    assert_eq!(request.status, RequestStatus::Completed);

    let artifact = service.artifact(request.artifact_id.unwrap()).unwrap();
    assert_eq!(artifact.name, "Markdown Table Editor");
    assert_eq!(service.list_all().len(), 9);
    assert_eq!(service.list_recent(1)[0].id, artifact.id);

    // at least the first and the terminal frame arrived
    let first = events.recv().await.unwrap();
    assert_eq!(first.request_id, id);

    let analytics = service.analytics();
    assert_eq!(analytics.completed_requests, 1);
    assert_eq!(analytics.active_sessions, 0);
}
