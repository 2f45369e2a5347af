//! Full runs through the coordinator into a SQLite database

use crate::common::{
    create_test_config, end_page, full_profile, listing_page, mount_listing, mount_profile,
    profile_page,
};
use profile_harvest::crawler::Coordinator;
use profile_harvest::storage::{LoadCounts, RunStatus, SqliteStorage, Storage};
use std::path::Path;
use wiremock::MockServer;

async fn mount_site(server: &MockServer) {
    mount_listing(
        server,
        "english",
        1,
        listing_page(&["/en/teacher/101/english", "/en/teacher/102/english"]),
    )
    .await;
    mount_listing(
        server,
        "english",
        2,
        listing_page(&["/en/teacher/103/english"]),
    )
    .await;
    mount_listing(server, "english", 3, end_page()).await;

    mount_listing(
        server,
        "russian",
        1,
        listing_page(&["/en/teacher/101/russian", "/en/teacher/104/russian"]),
    )
    .await;
    mount_listing(server, "russian", 2, end_page()).await;

    mount_profile(server, "/en/teacher/101/english", full_profile("Anna")).await;
    mount_profile(server, "/en/teacher/101/russian", full_profile("Anna")).await;
    mount_profile(
        server,
        "/en/teacher/102/english",
        profile_page(&["Boris"], None, Some("USD 8.00")),
    )
    .await;
    mount_profile(server, "/en/teacher/104/russian", full_profile("Dmitri")).await;
    // 103 is not mounted and answers 404
}

#[tokio::test]
async fn test_full_harvest_into_database() {
    let server = MockServer::start().await;
    mount_site(&server).await;

    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("harvest.db");
    let config = create_test_config(
        &server.uri(),
        &["english", "russian"],
        &db_path.to_string_lossy(),
        2,
    );

    let mut coordinator = Coordinator::new(config, "test-hash").unwrap();
    let report = coordinator.run().await.unwrap();

    assert_eq!(report.links_found, 5);
    assert_eq!(report.memberships_found, 5);
    assert_eq!(report.records_extracted, 3);
    assert_eq!(report.extraction_failures, 1);
    assert_eq!(report.duplicates_dropped, 1);
    assert_eq!(report.summaries[0].last_page, 3);
    assert_eq!(report.summaries[1].last_page, 2);
    assert_eq!(
        report.entities_loaded,
        LoadCounts {
            loaded: 3,
            skipped: 0
        }
    );

    let storage = coordinator.storage();
    assert_eq!(storage.count_entities().unwrap(), 3);
    assert_eq!(storage.count_memberships().unwrap(), 5);

    let anna = storage.get_entity(101).unwrap().unwrap();
    assert_eq!(anna.student_count, Some(1496));
    assert_eq!(anna.lesson_count, Some(12700));

    let boris = storage.get_entity(102).unwrap().unwrap();
    assert!(boris.is_name_only());
    assert_eq!(boris.price, 8.0);

    // The failed profile still keeps its membership, but has no entity row
    assert!(storage.get_entity(103).unwrap().is_none());

    let run = storage.get_latest_run().unwrap().unwrap();
    assert_eq!(run.status, RunStatus::Completed);
    assert_eq!(run.config_hash, "test-hash");
    let totals = run.totals.unwrap();
    assert_eq!(totals.links_found, 5);
    assert_eq!(totals.records_extracted, 3);
    assert_eq!(totals.extraction_failures, 1);
}

#[tokio::test]
async fn test_second_harvest_skips_existing_rows() {
    let server = MockServer::start().await;
    mount_site(&server).await;

    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("harvest.db");
    let config = create_test_config(
        &server.uri(),
        &["english", "russian"],
        &db_path.to_string_lossy(),
        3,
    );

    Coordinator::new(config.clone(), "first")
        .unwrap()
        .run()
        .await
        .unwrap();
    let second = Coordinator::new(config, "second")
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(
        second.entities_loaded,
        LoadCounts {
            loaded: 0,
            skipped: 3
        }
    );
    assert_eq!(
        second.memberships_loaded,
        LoadCounts {
            loaded: 0,
            skipped: 5
        }
    );
    assert_eq!(second.categories_loaded.skipped, 2);

    let storage = SqliteStorage::new(Path::new(&db_path)).unwrap();
    assert_eq!(storage.count_entities().unwrap(), 3);
    assert_eq!(storage.get_latest_run().unwrap().unwrap().config_hash, "second");
}

#[tokio::test]
async fn test_harvest_links_without_storage_writes() {
    let server = MockServer::start().await;
    mount_site(&server).await;

    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("harvest.db");
    let config = create_test_config(&server.uri(), &["russian"], &db_path.to_string_lossy(), 5);

    let coordinator = Coordinator::new(config, "hash").unwrap();
    let aggregated = coordinator.harvest_links().await.unwrap();
    let outcome = coordinator.extract_records(&aggregated.links).await.unwrap();

    assert_eq!(aggregated.links.len(), 2);
    assert_eq!(outcome.records.len(), 2);
    assert_eq!(coordinator.storage().count_entities().unwrap(), 0);
    assert!(coordinator.storage().get_latest_run().unwrap().is_none());
}

#[tokio::test]
async fn test_out_of_range_profile_does_not_sink_the_run() {
    let server = MockServer::start().await;

    mount_listing(
        &server,
        "spanish",
        1,
        listing_page(&["/en/teacher/101/spanish", "/en/teacher/102/spanish"]),
    )
    .await;
    mount_listing(&server, "spanish", 2, end_page()).await;
    mount_profile(&server, "/en/teacher/101/spanish", full_profile("Anna")).await;
    mount_profile(
        &server,
        "/en/teacher/102/spanish",
        profile_page(
            &["Boris", "4.8", "1e30k", "300", "100%", "100%"],
            None,
            None,
        ),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("harvest.db");
    let config = create_test_config(&server.uri(), &["spanish"], &db_path.to_string_lossy(), 2);

    let mut coordinator = Coordinator::new(config, "hash").unwrap();
    let report = coordinator.run().await.unwrap();

    assert_eq!(report.records_extracted, 1);
    assert_eq!(report.extraction_failures, 1);

    let storage = coordinator.storage();
    assert_eq!(storage.count_entities().unwrap(), 1);
    assert_eq!(
        storage.get_entity(101).unwrap().unwrap().student_count,
        Some(1496)
    );
    assert!(storage.get_entity(102).unwrap().is_none());
    assert_eq!(
        storage.get_latest_run().unwrap().unwrap().status,
        RunStatus::Completed
    );
}
