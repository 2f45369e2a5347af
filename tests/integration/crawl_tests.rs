//! Listing-side tests: pagination, end detection and aggregation

use crate::common::{end_page, listing_page, mount_listing, mount_listing_status, site_config};
use profile_harvest::crawler::{LinkAggregator, LinkDiscoverer, PageOutcome, PaginatedCrawler};
use profile_harvest::model::CategoryMembership;
use profile_harvest::{ConfigError, HarvestError};
use reqwest::Client;
use std::sync::Arc;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn discoverer(server: &MockServer, category: &str) -> LinkDiscoverer {
    LinkDiscoverer::new(
        Client::new(),
        Arc::new(site_config(&server.uri())),
        category,
    )
    .unwrap()
}

fn paths(crawl_links: impl IntoIterator<Item = profile_harvest::ProfileLink>) -> Vec<String> {
    crawl_links
        .into_iter()
        .map(|link| link.url.path().to_string())
        .collect()
}

#[tokio::test]
async fn test_crawl_stops_at_end_marker() {
    let server = MockServer::start().await;

    mount_listing(
        &server,
        "english",
        1,
        listing_page(&["/en/teacher/101/english", "/en/teacher/102/english"]),
    )
    .await;
    mount_listing(
        &server,
        "english",
        2,
        listing_page(&["/en/teacher/103/english", "/en/teacher/104/english"]),
    )
    .await;
    mount_listing(&server, "english", 3, end_page()).await;
    // Pages 4..=10 of the batch are unmatched and answer 404

    let crawl = PaginatedCrawler::new(10)
        .crawl(&discoverer(&server, "english"))
        .await;

    assert_eq!(crawl.category, "english");
    assert_eq!(crawl.last_page, 3);
    assert_eq!(crawl.batches, 1);
    assert_eq!(
        paths(crawl.links),
        vec![
            "/en/teacher/101/english",
            "/en/teacher/102/english",
            "/en/teacher/103/english",
            "/en/teacher/104/english",
        ]
    );
    // 404s past the marker are never looked at
    assert!(crawl.failed_pages.is_empty());
}

#[tokio::test]
async fn test_pages_after_marker_in_same_batch_are_dropped() {
    let server = MockServer::start().await;

    mount_listing(
        &server,
        "spanish",
        1,
        listing_page(&["/en/teacher/201/spanish"]),
    )
    .await;
    mount_listing(&server, "spanish", 2, end_page()).await;
    mount_listing(
        &server,
        "spanish",
        3,
        listing_page(&["/en/teacher/299/spanish"]),
    )
    .await;

    let crawl = PaginatedCrawler::new(4)
        .crawl(&discoverer(&server, "spanish"))
        .await;

    assert_eq!(crawl.last_page, 2);
    assert_eq!(paths(crawl.links), vec!["/en/teacher/201/spanish"]);
}

#[tokio::test]
async fn test_failed_page_does_not_end_crawl() {
    let server = MockServer::start().await;

    mount_listing(
        &server,
        "japanese",
        1,
        listing_page(&["/en/teacher/301/japanese"]),
    )
    .await;
    mount_listing_status(&server, "japanese", 2, 500).await;
    mount_listing(
        &server,
        "japanese",
        3,
        listing_page(&["/en/teacher/303/japanese"]),
    )
    .await;
    mount_listing(&server, "japanese", 4, end_page()).await;

    let crawl = PaginatedCrawler::new(2)
        .crawl(&discoverer(&server, "japanese"))
        .await;

    assert_eq!(crawl.batches, 2);
    assert_eq!(crawl.last_page, 4);
    assert_eq!(crawl.failed_pages, vec![2]);
    assert_eq!(
        paths(crawl.links),
        vec!["/en/teacher/301/japanese", "/en/teacher/303/japanese"]
    );
}

#[tokio::test]
async fn test_marker_on_first_page_yields_no_links() {
    let server = MockServer::start().await;
    mount_listing(&server, "italian", 1, end_page()).await;

    let crawl = PaginatedCrawler::new(3)
        .crawl(&discoverer(&server, "italian"))
        .await;

    assert_eq!(crawl.last_page, 1);
    assert!(crawl.links.is_empty());
}

#[tokio::test]
async fn test_discover_filters_foreign_links() {
    let server = MockServer::start().await;
    mount_listing(
        &server,
        "russian",
        1,
        listing_page(&[
            "/en/teacher/401/russian",
            "/en/teacher/401/russian?utm_source=list",
            "/en/teacher/401/russian#reviews",
            "/en/teacher/402/english",
            "/en/teacher/abc/russian",
            "/en/teacher/403/russian/lessons",
            "https://elsewhere.example/en/teacher/404/russian",
            "mailto:someone@example.com",
        ]),
    )
    .await;

    let result = discoverer(&server, "russian").discover(1).await;

    assert_eq!(result.page, 1);
    match result.outcome {
        PageOutcome::Links(links) => {
            assert_eq!(paths(links), vec!["/en/teacher/401/russian"]);
        }
        other => panic!("expected links, got {:?}", other),
    }
}

#[tokio::test]
async fn test_discover_reports_http_failure() {
    let server = MockServer::start().await;
    mount_listing_status(&server, "english", 7, 503).await;

    let result = discoverer(&server, "english").discover(7).await;

    assert!(matches!(result.outcome, PageOutcome::Failed(_)));
}

#[tokio::test]
async fn test_aggregate_two_categories() {
    let server = MockServer::start().await;

    mount_listing(
        &server,
        "english",
        1,
        listing_page(&["/en/teacher/101/english", "/en/teacher/102/english"]),
    )
    .await;
    mount_listing(&server, "english", 2, end_page()).await;
    mount_listing(
        &server,
        "spanish",
        1,
        listing_page(&["/en/teacher/101/spanish", "/en/teacher/103/spanish"]),
    )
    .await;
    mount_listing(&server, "spanish", 2, end_page()).await;

    let aggregator = LinkAggregator::new(Client::new(), site_config(&server.uri()), 2);
    let categories = vec!["english".to_string(), "spanish".to_string()];
    let aggregated = aggregator.aggregate_all(&categories).await.unwrap();

    assert_eq!(
        paths(aggregated.links),
        vec![
            "/en/teacher/101/english",
            "/en/teacher/102/english",
            "/en/teacher/101/spanish",
            "/en/teacher/103/spanish",
        ]
    );

    let membership = |id: u64, category: &str| CategoryMembership {
        entity_id: id,
        category: category.to_string(),
    };
    assert_eq!(
        aggregated.memberships,
        vec![
            membership(101, "english"),
            membership(101, "spanish"),
            membership(102, "english"),
            membership(103, "spanish"),
        ]
    );

    assert_eq!(aggregated.summaries.len(), 2);
    assert_eq!(aggregated.summaries[0].distinct_links, 2);
    assert_eq!(aggregated.summaries[1].last_page, 2);
}

#[tokio::test]
async fn test_aggregate_rejects_unsupported_category() {
    let server = MockServer::start().await;

    let aggregator = LinkAggregator::new(Client::new(), site_config(&server.uri()), 2);
    let result = aggregator
        .aggregate_all(&["english".to_string(), "french".to_string()])
        .await;

    assert!(matches!(
        result,
        Err(HarvestError::Config(ConfigError::UnsupportedCategory { .. }))
    ));
    // Nothing was fetched
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_links_resolve_against_redirected_listing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/en/teachers/english"))
        .and(query_param("page", "1"))
        .respond_with(
            ResponseTemplate::new(302).insert_header("Location", "/en/teachers/english/all?page=1"),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/en/teachers/english/all"))
        .and(query_param("page", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                // Only resolves to a profile path from the redirected location
                .set_body_string(listing_page(&["../../teacher/501/english"])),
        )
        .mount(&server)
        .await;

    let result = discoverer(&server, "english").discover(1).await;

    match result.outcome {
        PageOutcome::Links(links) => {
            assert_eq!(paths(links), vec!["/en/teacher/501/english"]);
        }
        other => panic!("expected links, got {:?}", other),
    }
}
