//! Shared fixtures for the upstream-facing tests.

#![allow(dead_code)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::time::Duration;

use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ghexporter_core::target::resolve_targets;
use ghexporter_server::config::Settings;

pub fn settings(api_url: &str, repos: &str, orgs: &str, users: &str) -> Settings {
    Settings {
        listen: "127.0.0.1:0".parse().unwrap(),
        metrics_path: "/metrics".into(),
        api_url: api_url.trim_end_matches('/').to_string(),
        token: None,
        targets: resolve_targets(repos, orgs, users).unwrap(),
        request_timeout: Duration::from_secs(10),
        scrape_timeout: Duration::from_secs(30),
    }
}

pub fn repo_json(name: &str, owner: &str, stars: u64, license: Option<&str>) -> Value {
    json!({
        "name": name,
        "owner": { "login": owner },
        "stargazers_count": stars,
        "forks_count": 1,
        "open_issues_count": 2,
        "watchers_count": stars,
        "size": 512,
        "private": false,
        "fork": false,
        "archived": false,
        "license": license.map(|k| json!({ "key": k })),
        "language": "Rust"
    })
}

pub fn rate_response(limit: &str, remaining: &str, reset: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("X-RateLimit-Limit", limit)
        .insert_header("X-RateLimit-Remaining", remaining)
        .insert_header("X-RateLimit-Reset", reset)
        .set_body_json(json!({ "rate": { "limit": 0 } }))
}

pub async fn mount_rate(server: &MockServer, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/rate_limit"))
        .respond_with(template)
        .mount(server)
        .await;
}
