#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

mod common;

use std::time::{Duration, Instant};

use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ghexporter_core::error::{ErrorKind, ExporterError};
use ghexporter_server::upstream::{fetch_all, UpstreamClient};

async fn ok(server: &MockServer, p: &str) {
    Mock::given(method("GET"))
        .and(path(p.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!("body of {p}")))
        .mount(server)
        .await;
}

#[tokio::test]
async fn n_targets_k_failures_yield_n_envelopes() {
    let server = MockServer::start().await;
    ok(&server, "/repos/acme/a").await;
    ok(&server, "/repos/acme/b").await;
    ok(&server, "/repos/acme/c").await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    // /repos/acme/ghost has no mock: wiremock answers 404

    let client = UpstreamClient::new(&common::settings(&server.uri(), "", "acme", "")).unwrap();
    let urls: Vec<String> = ["a", "b", "c", "broken", "ghost"]
        .iter()
        .map(|r| format!("{}/repos/acme/{r}", server.uri()))
        .collect();

    let out = fetch_all(&client, urls.clone(), Duration::from_secs(5)).await;
    assert_eq!(out.len(), 5);
    assert_eq!(out.iter().filter(|r| r.body().is_some()).count(), 3);
    assert_eq!(out.iter().filter(|r| r.error().is_some()).count(), 2);

    // envelopes stay correlated with their URL
    let got: Vec<&str> = out.iter().map(|r| r.url.as_str()).collect();
    let want: Vec<&str> = urls.iter().map(String::as_str).collect();
    assert_eq!(got, want);
    assert_eq!(out[0].body().unwrap().as_ref(), b"body of /repos/acme/a");

    assert!(matches!(
        out[3].error(),
        Some(ExporterError::UpstreamStatus { status: 500, .. })
    ));
    let not_found = out[4].error().unwrap();
    assert_eq!(not_found.kind(), ErrorKind::NotFound);
    assert!(not_found.to_string().contains("private repo"));
}

#[tokio::test]
async fn no_targets_returns_immediately() {
    let server = MockServer::start().await;
    let client = UpstreamClient::new(&common::settings(&server.uri(), "", "acme", "")).unwrap();
    assert!(fetch_all(&client, Vec::new(), Duration::from_secs(1)).await.is_empty());
}

#[tokio::test]
async fn stalled_target_is_cut_off_by_the_deadline() {
    let server = MockServer::start().await;
    ok(&server, "/repos/acme/fast").await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(8)))
        .mount(&server)
        .await;

    let client = UpstreamClient::new(&common::settings(&server.uri(), "", "acme", "")).unwrap();
    let urls = vec![
        format!("{}/repos/acme/fast", server.uri()),
        format!("{}/repos/acme/slow", server.uri()),
    ];

    let started = Instant::now();
    let out = fetch_all(&client, urls, Duration::from_millis(300)).await;
    assert!(started.elapsed() < Duration::from_secs(5));

    assert_eq!(out.len(), 2);
    assert!(out[0].body().is_some());
    assert!(matches!(
        out[1].error(),
        Some(ExporterError::DeadlineExceeded { .. })
    ));
}

#[tokio::test]
async fn token_is_sent_as_token_authorization() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/private"))
        .and(header("authorization", "token s3cr3t"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(1)
        .mount(&server)
        .await;

    let mut settings = common::settings(&server.uri(), "", "acme", "");
    settings.token = Some("s3cr3t".into());
    let client = UpstreamClient::new(&settings).unwrap();

    let out = fetch_all(
        &client,
        vec![format!("{}/repos/acme/private", server.uri())],
        Duration::from_secs(5),
    )
    .await;
    assert!(out[0].body().is_some());
}
