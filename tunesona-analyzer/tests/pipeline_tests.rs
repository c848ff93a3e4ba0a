//! End-to-end pipeline tests
//!
//! Real fetchers and the reqwest client against a mock music API. Routes not
//! mounted on the mock server answer 404, which the pipeline must treat as a
//! failed source.

mod helpers;

use chrono::{TimeZone, Utc};
use helpers::{album, api_config, artist, mount_ok, mount_status, page, query_settings, song};
use std::sync::Arc;
use tunesona_analyzer::client::HttpQueryClient;
use tunesona_analyzer::types::Collection;
use tunesona_analyzer::{Archetype, LibraryAggregator, LibraryPipeline, PipelineError};
use tunesona_common::credential::StaticCredentialProvider;
use tunesona_common::time::FixedClock;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn pipeline(server: &MockServer) -> LibraryPipeline {
    let client = HttpQueryClient::new(&api_config(server, None)).unwrap();
    let clock = FixedClock(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap());
    let aggregator = LibraryAggregator::standard(Arc::new(client), &query_settings(), &clock);
    LibraryPipeline::new(aggregator, Arc::new(StaticCredentialProvider::new("user-token")))
}

#[tokio::test]
async fn test_full_library_merge() {
    let server = MockServer::start().await;
    mount_ok(
        &server,
        "/v1/me/recent/played/tracks",
        page(vec![
            song("s1", "Montero", "Hip Hop", 137_000, Some(5)),
            song("s2", "Levitating", "Pop", 203_000, Some(3)),
            song("s3", "Savage", "Hip Hop", 160_000, None),
        ]),
    )
    .await;
    mount_ok(
        &server,
        "/v1/me/library/songs",
        page(vec![
            // Duplicate of a recently played track with a different count
            song("s2", "Levitating", "Pop", 203_000, Some(40)),
            song("s4", "Positions", "R&B", 172_000, Some(2)),
            song("s5", "Never Played", "Pop", 180_000, Some(0)),
        ]),
    )
    .await;
    mount_ok(&server, "/v1/me/library/artists", page(vec![artist("a1", "Lil Nas X", "Hip Hop")])).await;
    mount_ok(
        &server,
        "/v1/me/library/albums",
        page(vec![album("al1", "MONTERO", "Hip Hop"), album("al2", "Justice", "Pop")]),
    )
    .await;
    mount_ok(
        &server,
        "/v1/me/history/heavy-rotation",
        page(vec![album("al2", "Justice", "Pop"), album("al3", "SOUR", "Pop")]),
    )
    .await;
    mount_ok(
        &server,
        "/v1/me/music-summaries",
        page(vec![serde_json::json!({ "id": "2024", "type": "music-summaries", "attributes": { "year": 2024 } })]),
    )
    .await;

    let report = pipeline(&server).analyze().await.unwrap();
    let snapshot = &report.snapshot;

    assert!(snapshot.failed_sources.is_empty());
    assert_eq!(snapshot.succeeded_sources.len(), 6);

    // Played library songs only
    assert_eq!(snapshot.library_songs.len(), 2);

    let ids: Vec<_> = snapshot.recent_activity.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["s1", "s2", "s3", "s4"]);
    // First-seen copy of s2 kept
    assert_eq!(snapshot.recent_activity[1].play_count, Some(3));

    let stats = &snapshot.listening_stats;
    assert_eq!(stats.total_tracks, 4);
    assert_eq!(stats.total_play_time_ms, 137_000 + 203_000 + 160_000 + 172_000);
    assert_eq!(stats.total_play_count, 10);
    assert_eq!(
        stats.average_session_length_ms,
        (672_000.0 / 10.0) * 3.5
    );

    assert_eq!(snapshot.top_genres[0].genre, "Hip Hop");
    assert_eq!(snapshot.top_genres[0].count, 2);

    let album_ids: Vec<_> = snapshot.albums().into_iter().map(|a| a.id).collect();
    assert_eq!(album_ids, vec!["al2", "al3", "al1"]);
    assert_eq!(snapshot.music_summaries.len(), 1);

    assert_eq!(report.persona.archetype, Archetype::StreetMusicPoet);
}

#[tokio::test]
async fn test_query_parameters_per_collection() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/me/music-summaries"))
        .and(query_param("filter[year]", "2024"))
        .and(query_param("l", "en-us"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(vec![])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/me/history/heavy-rotation"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(vec![])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/me/recent/played/tracks"))
        .and(query_param("limit", "25"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(vec![])))
        .expect(1)
        .mount(&server)
        .await;

    let snapshot = pipeline(&server).build_library_snapshot().await.unwrap();

    let mut ok = snapshot.succeeded_sources.clone();
    ok.sort_by_key(|c| c.name());
    assert_eq!(
        ok,
        vec![
            Collection::HeavyRotation,
            Collection::MusicSummaries,
            Collection::RecentlyPlayed
        ]
    );
}

#[tokio::test]
async fn test_partial_failure_returns_best_effort_snapshot() {
    let server = MockServer::start().await;
    mount_status(&server, "/v1/me/recent/played/tracks", 500).await;
    mount_ok(
        &server,
        "/v1/me/library/songs",
        page(vec![song("b1", "Only Source", "Jazz", 100_000, Some(1))]),
    )
    .await;
    mount_status(&server, "/v1/me/history/heavy-rotation", 503).await;
    // Remaining collections are unmounted and answer 404

    let report = pipeline(&server).analyze().await.unwrap();
    let snapshot = &report.snapshot;

    assert_eq!(snapshot.succeeded_sources, vec![Collection::LibrarySongs]);
    assert_eq!(snapshot.failed_sources.len(), 5);
    assert_eq!(snapshot.recent_activity.len(), 1);
    assert_eq!(snapshot.recent_activity[0].id, "b1");

    let heavy = snapshot
        .failed_sources
        .iter()
        .find(|f| f.collection == Collection::HeavyRotation)
        .unwrap();
    assert_eq!(heavy.status, Some(503));

    assert_eq!(report.persona.archetype, Archetype::MidnightJazzWanderer);
}

#[tokio::test]
async fn test_all_sources_failed() {
    let server = MockServer::start().await;
    mount_status(&server, "/v1/me/recent/played/tracks", 401).await;

    match pipeline(&server).analyze().await {
        Err(PipelineError::AllSourcesFailed { failures }) => {
            assert_eq!(failures.len(), 6);
            assert_eq!(failures[0].collection, Collection::RecentlyPlayed);
            assert_eq!(failures[0].status, Some(401));
            assert!(failures[1..].iter().all(|f| f.status == Some(404)));
        }
        Err(e) => panic!("Expected AllSourcesFailed, got {:?}", e),
        Ok(_) => panic!("Expected AllSourcesFailed"),
    }
}

#[tokio::test]
async fn test_malformed_payload_is_isolated() {
    let server = MockServer::start().await;
    mount_ok(&server, "/v1/me/recent/played/tracks", serde_json::json!({ "results": [] })).await;
    mount_ok(
        &server,
        "/v1/me/library/artists",
        page(vec![artist("a1", "Norah Jones", "Jazz")]),
    )
    .await;

    let snapshot = pipeline(&server).build_library_snapshot().await.unwrap();

    let recent = snapshot
        .failed_sources
        .iter()
        .find(|f| f.collection == Collection::RecentlyPlayed)
        .unwrap();
    assert!(recent.status.is_none());
    assert!(recent.error.contains("Malformed"));

    assert_eq!(snapshot.library_artists.len(), 1);
    // Artists do not feed track statistics
    assert_eq!(snapshot.listening_stats.total_tracks, 0);
    assert!(snapshot.top_genres.is_empty());
}

#[tokio::test]
async fn test_empty_library_is_explorer() {
    let server = MockServer::start().await;
    mount_ok(&server, "/v1/me/recent/played/tracks", page(vec![])).await;

    let report = pipeline(&server).analyze().await.unwrap();
    assert_eq!(report.snapshot.listening_stats.total_tracks, 0);
    assert!(report.snapshot.top_genres.is_empty());
    assert_eq!(report.persona.archetype, Archetype::Explorer);
}

#[tokio::test]
async fn test_repeated_invocations_are_independent() {
    let server = MockServer::start().await;
    mount_ok(
        &server,
        "/v1/me/recent/played/tracks",
        page(vec![song("x", "Loop", "Rock", 100_000, Some(1))]),
    )
    .await;

    let pipeline = pipeline(&server);
    let first = pipeline.analyze().await.unwrap();
    let second = pipeline.analyze().await.unwrap();
    assert_eq!(first, second);
}
