use std::time::Duration;

use feedload::attack;
use feedload::config::{Config, WaitTime};
use feedload::healthcheck::healthcheck;
use feedload_test::server::{StatusCode, TestServer};

fn fast(config: &mut Config) {
    let wait_time = Some(WaitTime::from_millis(20, 60));
    let profiles = &mut config.profiles;
    for profile in [
        &mut profiles.api,
        &mut profiles.heavy,
        &mut profiles.realistic,
        &mut profiles.website,
        &mut profiles.social,
    ] {
        profile.enabled = true;
        profile.wait_time = wait_time;
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn attack_passes_against_mock_api() {
    feedload_test::tracing::init();
    let server = TestServer::new().await;

    let mut config = Config {
        host: server.base_url(),
        users: 8,
        hatch_rate: 8.0,
        run_time: Duration::from_secs(3),
        following_feed: true,
        ..Default::default()
    };
    fast(&mut config);

    let metrics = attack::run(&config).await.unwrap();
    let summaries = attack::summarize(&metrics);

    assert!(!summaries.is_empty());
    for summary in &summaries {
        assert_eq!(summary.failures, 0, "{summary:?}");
    }
    assert!(summaries.iter().map(|s| s.successes).sum::<usize>() > 0);
    assert!(
        summaries
            .iter()
            .any(|s| s.name.ends_with("/get-posts-watching"))
    );

    assert!(server.hits("/get-posts-watching") > 0);
    assert_eq!(server.hits("/health"), 0);
    assert!(server.total_hits() >= summaries.len());
}

/// Configuration running only the API profile with short pauses.
fn api_only(server: &TestServer) -> Config {
    let mut config = Config {
        host: server.base_url(),
        users: 2,
        hatch_rate: 2.0,
        run_time: Duration::from_secs(3),
        ..Default::default()
    };
    fast(&mut config);

    let profiles = &mut config.profiles;
    profiles.heavy.enabled = false;
    profiles.realistic.enabled = false;
    profiles.website.enabled = false;
    profiles.social.enabled = false;
    config
}

#[tokio::test(flavor = "multi_thread")]
async fn server_errors_fail_every_request() {
    feedload_test::tracing::init();
    let server = TestServer::with_status(StatusCode::INTERNAL_SERVER_ERROR).await;

    let metrics = attack::run(&api_only(&server)).await.unwrap();
    let summaries = attack::summarize(&metrics);

    assert!(!summaries.is_empty());
    for summary in &summaries {
        assert_eq!(summary.successes, 0, "{summary:?}");
    }
    assert!(summaries.iter().map(|s| s.failures).sum::<usize>() > 0);
    assert!(server.total_hits() > 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn accepted_malformed_requests_fail() {
    feedload_test::tracing::init();
    let server = TestServer::with_status(StatusCode::OK).await;

    let metrics = attack::run(&api_only(&server)).await.unwrap();
    let summaries = attack::summarize(&metrics);

    // only the malformed requests of `error_conditions` expect a client error
    let malformed = ["/get-posts", "/get-mentions", "/get-post-details"];
    let mut failures = 0;
    for summary in &summaries {
        if malformed.iter().any(|path| summary.name.ends_with(path)) {
            failures += summary.failures;
        } else {
            assert_eq!(summary.failures, 0, "{summary:?}");
            assert!(summary.successes > 0, "{summary:?}");
        }
    }
    assert!(failures > 0);
}

#[tokio::test]
async fn healthcheck_against_mock_api() {
    let server = TestServer::new().await;

    healthcheck(&server.base_url()).await.unwrap();
    healthcheck(&format!("{}/", server.base_url())).await.unwrap();

    // unknown paths answer 404
    let err = healthcheck(&server.url("/nope")).await.unwrap_err();
    assert!(err.to_string().contains("404"), "{err}");
}

#[tokio::test]
async fn healthcheck_unreachable_host() {
    assert!(healthcheck("http://127.0.0.1:1").await.is_err());
}
