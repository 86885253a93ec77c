use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::StatusCode;

use ghexporter_core::error::{ExporterError, Result};

use crate::config::Settings;

const USER_AGENT: &str = concat!("ghexporter/", env!("CARGO_PKG_VERSION"));

/// Shared HTTP client for the upstream API.
///
/// Carries the per-request timeout and, when configured, the
/// `Authorization: token <token>` header on every request. Cheap to clone.
#[derive(Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    base: String,
}

impl UpstreamClient {
    pub fn new(settings: &Settings) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        if let Some(token) = &settings.token {
            let mut v = HeaderValue::from_str(&format!("token {token}")).map_err(|_| {
                ExporterError::Config("token contains invalid header characters".into())
            })?;
            v.set_sensitive(true);
            headers.insert(AUTHORIZATION, v);
        }

        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|e| ExporterError::Config(format!("http client build failed: {e}")))?;

        Ok(Self {
            http,
            base: settings.api_url.clone(),
        })
    }

    /// API base URL without trailing slash.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Send a GET; only transport failures are errors here.
    pub async fn send(&self, url: &str) -> Result<reqwest::Response> {
        tracing::debug!(%url, "fetching");
        self.http
            .get(url)
            .send()
            .await
            .map_err(|e| transport(url, &e))
    }

    /// GET and read the body; 404 and other non-2xx statuses become errors.
    pub async fn get_bytes(&self, url: &str) -> Result<Bytes> {
        let resp = check_status(url, self.send(url).await?)?;
        resp.bytes().await.map_err(|e| transport(url, &e))
    }
}

/// 404 gets the not-found/token-scope guidance; any other non-2xx passes through.
pub fn check_status(url: &str, resp: reqwest::Response) -> Result<reqwest::Response> {
    let status = resp.status();
    if status == StatusCode::NOT_FOUND {
        return Err(ExporterError::UpstreamNotFound {
            url: url.to_string(),
        });
    }
    if !status.is_success() {
        return Err(ExporterError::UpstreamStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    Ok(resp)
}

fn transport(url: &str, e: &reqwest::Error) -> ExporterError {
    let reason = if e.is_timeout() {
        format!("timed out: {e}")
    } else {
        e.to_string()
    };
    ExporterError::UpstreamTransport {
        url: url.to_string(),
        reason,
    }
}
