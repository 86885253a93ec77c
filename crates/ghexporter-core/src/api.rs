//! Upstream REST endpoints and their payload types.
//!
//! Each endpoint decodes into exactly one payload type; the caller knows which
//! endpoint it called, so the body shape is never sniffed.

use serde::Deserialize;

use crate::error::{ExporterError, Result};
use crate::record::RepositoryRecord;
use crate::target::OwnerKind;

/// Page size for listing endpoints (the API maximum).
pub const PER_PAGE: usize = 100;

pub const HEADER_RATE_LIMIT: &str = "X-RateLimit-Limit";
pub const HEADER_RATE_REMAINING: &str = "X-RateLimit-Remaining";
pub const HEADER_RATE_RESET: &str = "X-RateLimit-Reset";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint<'a> {
    /// `GET /repos/{owner}/{repo}`
    Repo { owner: &'a str, repo: &'a str },
    /// `GET /orgs/{org}/repos` or `GET /users/{user}/repos`, one page.
    OwnerRepos { owner: &'a str, kind: OwnerKind, page: u32 },
    /// `GET /rate_limit`
    RateLimit,
}

impl Endpoint<'_> {
    /// Absolute URL against `base` (no trailing slash).
    ///
    /// `Unlisted` owners never carry a wildcard, so the lister does not build
    /// listing URLs for them; the users scope is only a fallback.
    pub fn url(&self, base: &str) -> String {
        match self {
            Endpoint::Repo { owner, repo } => format!("{base}/repos/{owner}/{repo}"),
            Endpoint::OwnerRepos { owner, kind, page } => {
                let scope = match kind {
                    OwnerKind::Org => "orgs",
                    OwnerKind::User => "users",
                    OwnerKind::Unlisted => "users",
                };
                format!("{base}/{scope}/{owner}/repos?per_page={PER_PAGE}&page={page}")
            }
            Endpoint::RateLimit => format!("{base}/rate_limit"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiOwner {
    pub login: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiLicense {
    pub key: Option<String>,
}

/// Repository object as returned by both the single-repo and listing endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiRepository {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub owner: Option<ApiOwner>,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    #[serde(default)]
    pub open_issues_count: u64,
    #[serde(default)]
    pub watchers_count: u64,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub fork: bool,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub license: Option<ApiLicense>,
    #[serde(default)]
    pub language: Option<String>,
}

impl From<ApiRepository> for RepositoryRecord {
    fn from(r: ApiRepository) -> Self {
        RepositoryRecord {
            name: r.name.unwrap_or_default(),
            owner: r.owner.and_then(|o| o.login),
            stars: r.stargazers_count,
            forks: r.forks_count,
            open_issues: r.open_issues_count,
            watchers: r.watchers_count,
            size_kb: r.size,
            private: r.private,
            fork: r.fork,
            archived: r.archived,
            license: r.license.and_then(|l| l.key),
            language: r.language,
        }
    }
}

fn decode<T: for<'de> Deserialize<'de>>(url: &str, body: &[u8]) -> Result<T> {
    serde_json::from_slice(body).map_err(|e| ExporterError::Decode {
        url: url.to_string(),
        reason: e.to_string(),
    })
}

/// Decode a `GET /repos/{owner}/{repo}` body.
pub fn decode_repo(url: &str, body: &[u8]) -> Result<RepositoryRecord> {
    decode::<ApiRepository>(url, body).map(Into::into)
}

/// Decode one page of a listing endpoint.
pub fn decode_repo_page(url: &str, body: &[u8]) -> Result<Vec<RepositoryRecord>> {
    let page: Vec<ApiRepository> = decode(url, body)?;
    Ok(page.into_iter().map(Into::into).collect())
}
