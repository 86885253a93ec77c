//! Per-scrape data: repository records and the quota snapshot.

use crate::api::{HEADER_RATE_LIMIT, HEADER_RATE_REMAINING, HEADER_RATE_RESET};
use crate::error::{ExporterError, Result};

/// Observable facts of one repository, fresh on every scrape.
///
/// `owner`, `license` and `language` are optional as decoded; a record
/// missing any of them is rejected by [`RepositoryRecord::labels`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryRecord {
    pub name: String,
    pub owner: Option<String>,
    pub stars: u64,
    pub forks: u64,
    pub open_issues: u64,
    pub watchers: u64,
    pub size_kb: u64,
    pub private: bool,
    pub fork: bool,
    pub archived: bool,
    pub license: Option<String>,
    pub language: Option<String>,
}

impl RepositoryRecord {
    /// Label values in descriptor order:
    /// `repo, user, private, fork, archived, license, language`.
    pub fn labels(&self) -> Result<[String; 7]> {
        let required = |v: &Option<String>, field: &'static str| {
            v.as_deref()
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .ok_or_else(|| ExporterError::MalformedRecord {
                    repo: self.name.clone(),
                    field,
                })
        };

        if self.name.is_empty() {
            return Err(ExporterError::MalformedRecord {
                repo: String::new(),
                field: "name",
            });
        }

        Ok([
            self.name.clone(),
            required(&self.owner, "owner")?,
            self.private.to_string(),
            self.fork.to_string(),
            self.archived.to_string(),
            required(&self.license, "license")?,
            required(&self.language, "language")?,
        ])
    }
}

/// Quota snapshot. `RateLimits::default()` is the zero-valued snapshot used
/// when the quota endpoint is unavailable.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RateLimits {
    pub limit: f64,
    pub remaining: f64,
    /// UTC epoch seconds.
    pub reset: f64,
}

fn parse_header(header: &'static str, value: Option<&str>) -> Result<f64> {
    let raw = value.ok_or(ExporterError::MalformedRateHeaders {
        header,
        reason: "missing".into(),
    })?;
    let v: f64 = raw
        .trim()
        .parse()
        .map_err(|e| ExporterError::MalformedRateHeaders {
            header,
            reason: format!("{raw:?}: {e}"),
        })?;
    if !v.is_finite() || v < 0.0 {
        return Err(ExporterError::MalformedRateHeaders {
            header,
            reason: format!("{raw:?} is not a non-negative number"),
        });
    }
    Ok(v)
}

impl RateLimits {
    /// Build from the raw `X-RateLimit-*` header values.
    pub fn from_headers(
        limit: Option<&str>,
        remaining: Option<&str>,
        reset: Option<&str>,
    ) -> Result<Self> {
        let limit = parse_header(HEADER_RATE_LIMIT, limit)?;
        let remaining = parse_header(HEADER_RATE_REMAINING, remaining)?;
        let reset = parse_header(HEADER_RATE_RESET, reset)?;

        if remaining > limit {
            return Err(ExporterError::MalformedRateHeaders {
                header: HEADER_RATE_REMAINING,
                reason: format!("remaining {remaining} exceeds limit {limit}"),
            });
        }

        Ok(Self {
            limit,
            remaining,
            reset,
        })
    }
}
