#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

mod common;

use std::time::Duration;

use serde_json::Value;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ghexporter_core::error::{ErrorKind, ExporterError};
use ghexporter_core::record::RateLimits;
use ghexporter_core::target::OwnerKind;
use ghexporter_server::upstream::{lister, rate, UpstreamClient};

async fn mount_page(server: &MockServer, p: &str, page: &str, repos: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path(p.to_string()))
        .and(query_param("per_page", "100"))
        .and(query_param("page", page))
        .respond_with(ResponseTemplate::new(200).set_body_json(Value::Array(repos)))
        .expect(1)
        .mount(server)
        .await;
}

fn repos(owner: &str, prefix: &str, n: usize) -> Vec<Value> {
    (0..n)
        .map(|i| common::repo_json(&format!("{prefix}{i}"), owner, i as u64, Some("mit")))
        .collect()
}

#[tokio::test]
async fn lister_paginates_until_short_page() {
    let server = MockServer::start().await;
    mount_page(&server, "/orgs/acme/repos", "1", repos("acme", "p1-", 100)).await;
    mount_page(&server, "/orgs/acme/repos", "2", repos("acme", "p2-", 100)).await;
    mount_page(&server, "/orgs/acme/repos", "3", repos("acme", "p3-", 7)).await;

    let client = UpstreamClient::new(&common::settings(&server.uri(), "", "acme", "")).unwrap();
    let records = lister::list_owner(&client, "acme", OwnerKind::Org).await.unwrap();
    assert_eq!(records.len(), 207);
    assert_eq!(records[0].name, "p1-0");
    assert_eq!(records[206].name, "p3-6");
}

#[tokio::test]
async fn lister_concatenates_orgs_and_users() {
    let server = MockServer::start().await;
    mount_page(&server, "/orgs/acme/repos", "1", repos("acme", "a", 2)).await;
    mount_page(&server, "/users/octocat/repos", "1", repos("octocat", "o", 3)).await;

    let settings = common::settings(&server.uri(), "", "acme", "octocat");
    let client = UpstreamClient::new(&settings).unwrap();
    let records = lister::list_all(&client, &settings.targets).await.unwrap();
    assert_eq!(records.len(), 5);
    assert_eq!(
        records.iter().filter(|r| r.owner.as_deref() == Some("octocat")).count(),
        3
    );
}

#[tokio::test]
async fn lister_failure_on_any_page_aborts_everything() {
    let server = MockServer::start().await;
    mount_page(&server, "/orgs/acme/repos", "1", repos("acme", "a", 2)).await;
    Mock::given(method("GET"))
        .and(path("/orgs/globex/repos"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let settings = common::settings(&server.uri(), "", "acme,globex", "");
    let client = UpstreamClient::new(&settings).unwrap();
    let err = lister::list_all(&client, &settings.targets).await.unwrap_err();
    assert!(matches!(err, ExporterError::UpstreamStatus { status: 502, .. }));
}

#[tokio::test]
async fn literal_repos_are_fetched_and_decoded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/torvalds/linux"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(common::repo_json("linux", "torvalds", 42, Some("gpl-2.0"))),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/torvalds/garbage"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .mount(&server)
        .await;

    let repos = "torvalds/linux, torvalds/garbage, torvalds/gone";
    let settings = common::settings(&server.uri(), repos, "", "");
    let client = UpstreamClient::new(&settings).unwrap();
    let fetched = lister::fetch_literal(&client, &settings.targets, Duration::from_secs(5)).await;

    assert_eq!(fetched.records.len(), 1);
    assert_eq!(fetched.records[0].stars, 42);
    let mut kinds: Vec<_> = fetched.errors.iter().map(|e| e.kind()).collect();
    kinds.sort_by_key(|k| k.as_str());
    assert_eq!(kinds, vec![ErrorKind::Decode, ErrorKind::NotFound]);
}

#[tokio::test]
async fn rate_probe_reads_headers() {
    let server = MockServer::start().await;
    common::mount_rate(&server, common::rate_response("5000", "4998", "1700000000")).await;

    let client = UpstreamClient::new(&common::settings(&server.uri(), "", "acme", "")).unwrap();
    let rates = rate::probe(&client).await.unwrap();
    assert_eq!(
        rates,
        RateLimits {
            limit: 5000.0,
            remaining: 4998.0,
            reset: 1_700_000_000.0
        }
    );
}

#[tokio::test]
async fn rate_probe_404_is_unsupported() {
    let server = MockServer::start().await;
    common::mount_rate(&server, ResponseTemplate::new(404)).await;

    let client = UpstreamClient::new(&common::settings(&server.uri(), "", "acme", "")).unwrap();
    let err = rate::probe(&client).await.unwrap_err();
    assert_eq!(err, ExporterError::RateLimitingUnsupported);
}

#[tokio::test]
async fn rate_probe_without_headers_is_malformed() {
    let server = MockServer::start().await;
    common::mount_rate(&server, ResponseTemplate::new(200)).await;

    let client = UpstreamClient::new(&common::settings(&server.uri(), "", "acme", "")).unwrap();
    let err = rate::probe(&client).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RateHeaders);
}
