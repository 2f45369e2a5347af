//! Profile-side tests: extraction, failure handling and id deduplication

use crate::common::{full_profile, mount_profile, profile_page};
use profile_harvest::config::SelectorConfig;
use profile_harvest::crawler::FetchFailure;
use profile_harvest::extract::{ExtractionPipeline, ProfileExtractor, ProfileSelectors};
use profile_harvest::{ExtractionFailure, ProfileLink};
use reqwest::Client;
use url::Url;
use wiremock::MockServer;

fn extractor() -> ProfileExtractor {
    let selectors = ProfileSelectors::compile(&SelectorConfig::default()).unwrap();
    ProfileExtractor::new(Client::new(), selectors)
}

fn link(server: &MockServer, id: &str, category: &str) -> ProfileLink {
    let url = Url::parse(&format!("{}/en/teacher/{}/{}", server.uri(), id, category)).unwrap();
    ProfileLink::new(url, category)
}

#[tokio::test]
async fn test_extract_full_profile() {
    let server = MockServer::start().await;
    mount_profile(&server, "/en/teacher/101/english", full_profile("Anna")).await;

    let record = extractor()
        .extract(&link(&server, "101", "english"))
        .await
        .unwrap();

    assert_eq!(record.id, 101);
    assert_eq!(record.name, "Anna");
    assert_eq!(record.rating, Some(4.9));
    assert_eq!(record.student_count, Some(1496));
    assert_eq!(record.lesson_count, Some(12700));
    assert_eq!(record.attendance_pct, Some(100));
    assert_eq!(record.response_pct, Some(98));
    assert_eq!(record.review_count, 215);
    assert_eq!(record.price, 12.5);
    assert_eq!(record.canonical_url.path(), "/en/teacher/101");
}

#[tokio::test]
async fn test_extract_name_only_profile() {
    let server = MockServer::start().await;
    mount_profile(
        &server,
        "/en/teacher/102/english",
        profile_page(&["Boris"], None, None),
    )
    .await;

    let record = extractor()
        .extract(&link(&server, "102", "english"))
        .await
        .unwrap();

    assert!(record.is_name_only());
    assert_eq!(record.name, "Boris");
    assert_eq!(record.rating, None);
    assert_eq!(record.review_count, 0);
    assert_eq!(record.price, 0.0);
}

#[tokio::test]
async fn test_extract_reports_http_status() {
    let server = MockServer::start().await;

    let result = extractor().extract(&link(&server, "404", "english")).await;

    match result {
        Err(ExtractionFailure::Fetch { reason, .. }) => {
            assert_eq!(reason, FetchFailure::Status(404))
        }
        other => panic!("expected fetch failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_extract_partial_headline_is_missing_field() {
    let server = MockServer::start().await;
    mount_profile(
        &server,
        "/en/teacher/105/english",
        profile_page(&["Eva", "5.0", "30"], Some("2 reviews"), None),
    )
    .await;

    let result = extractor().extract(&link(&server, "105", "english")).await;

    assert!(matches!(
        result,
        Err(ExtractionFailure::MissingField {
            field: "lessons",
            ..
        })
    ));
}

#[tokio::test]
async fn test_pipeline_dedups_by_id_and_drops_failures() {
    let server = MockServer::start().await;
    mount_profile(&server, "/en/teacher/101/english", full_profile("Anna")).await;
    mount_profile(&server, "/en/teacher/102/english", full_profile("Boris")).await;
    mount_profile(&server, "/en/teacher/101/spanish", full_profile("Anna (es)")).await;
    // 103 is not mounted and answers 404

    let links = vec![
        link(&server, "101", "english"),
        link(&server, "102", "english"),
        link(&server, "101", "spanish"),
        link(&server, "103", "spanish"),
        link(&server, "abc", "spanish"),
    ];

    let outcome = ExtractionPipeline::new(extractor(), 2)
        .extract_all(&links)
        .await;

    let names: Vec<_> = outcome.records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Anna", "Boris"]);
    assert_eq!(outcome.duplicates, 1);

    assert_eq!(outcome.failures.len(), 2);
    assert!(matches!(
        outcome.failures[0].1,
        ExtractionFailure::Fetch { .. }
    ));
    assert!(matches!(
        outcome.failures[1].1,
        ExtractionFailure::MalformedLink { .. }
    ));
}

#[tokio::test]
async fn test_malformed_link_makes_no_request() {
    let server = MockServer::start().await;

    let result = extractor().extract(&link(&server, "abc", "english")).await;

    assert!(matches!(result, Err(ExtractionFailure::MalformedLink { .. })));
    assert!(server.received_requests().await.unwrap().is_empty());
}
