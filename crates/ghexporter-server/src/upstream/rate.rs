//! Quota probe against `GET /rate_limit`.

use reqwest::StatusCode;

use ghexporter_core::api::{Endpoint, HEADER_RATE_LIMIT, HEADER_RATE_REMAINING, HEADER_RATE_RESET};
use ghexporter_core::error::{ExporterError, Result};
use ghexporter_core::record::RateLimits;

use super::client::{check_status, UpstreamClient};

/// One request; the snapshot comes from the `X-RateLimit-*` headers.
///
/// A 404 means the deployment has rate limiting disabled and maps to
/// [`ExporterError::RateLimitingUnsupported`].
pub async fn probe(client: &UpstreamClient) -> Result<RateLimits> {
    let url = Endpoint::RateLimit.url(client.base());
    let resp = client.send(&url).await?;
    if resp.status() == StatusCode::NOT_FOUND {
        return Err(ExporterError::RateLimitingUnsupported);
    }
    let resp = check_status(&url, resp)?;

    let headers = resp.headers();
    let get = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());
    RateLimits::from_headers(
        get(HEADER_RATE_LIMIT),
        get(HEADER_RATE_REMAINING),
        get(HEADER_RATE_RESET),
    )
}
