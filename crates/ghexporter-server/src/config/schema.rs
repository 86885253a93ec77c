use std::fmt;
use std::net::SocketAddr;

use serde::Deserialize;
use ghexporter_core::error::{ExporterError, Result};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExporterConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub github: GithubSection,
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            version: 1,
            server: ServerSection::default(),
            github: GithubSection::default(),
        }
    }
}

impl ExporterConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(ExporterError::Config(format!(
                "unsupported config version {}",
                self.version
            )));
        }

        self.server.validate()?;
        self.github.validate()?;

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,

    #[serde(default = "default_metrics_path")]
    pub metrics_path: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            metrics_path: default_metrics_path(),
        }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr()?;
        if !self.metrics_path.starts_with('/') {
            return Err(ExporterError::Config(
                "server.metrics_path must start with '/'".into(),
            ));
        }
        if ["/", "/healthz", "/readyz"].contains(&self.metrics_path.as_str()) {
            return Err(ExporterError::Config(format!(
                "server.metrics_path {} collides with a built-in route",
                self.metrics_path
            )));
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|e| {
            ExporterError::Config(format!(
                "server.listen must be a valid SocketAddr ({}): {e}",
                self.listen
            ))
        })
    }
}

fn default_listen() -> String {
    "0.0.0.0:9171".into()
}
fn default_metrics_path() -> String {
    "/metrics".into()
}

// Debug is hand-written so the token stays out of logs.
#[derive(Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GithubSection {
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Comma-separated `owner/name` list.
    #[serde(default)]
    pub repos: String,
    #[serde(default)]
    pub orgs: String,
    #[serde(default)]
    pub users: String,

    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub token_file: Option<String>,

    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    #[serde(default = "default_scrape_timeout_ms")]
    pub scrape_timeout_ms: u64,
}

impl Default for GithubSection {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            repos: String::new(),
            orgs: String::new(),
            users: String::new(),
            token: None,
            token_file: None,
            request_timeout_ms: default_request_timeout_ms(),
            scrape_timeout_ms: default_scrape_timeout_ms(),
        }
    }
}

impl GithubSection {
    pub fn validate(&self) -> Result<()> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(ExporterError::Config(
                "github.api_url must be an http(s) URL".into(),
            ));
        }
        if !(1000..=60000).contains(&self.request_timeout_ms) {
            return Err(ExporterError::Config(
                "github.request_timeout_ms must be between 1000 and 60000".into(),
            ));
        }
        if !(self.request_timeout_ms..=300000).contains(&self.scrape_timeout_ms) {
            return Err(ExporterError::Config(
                "github.scrape_timeout_ms must be between request_timeout_ms and 300000".into(),
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for GithubSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GithubSection")
            .field("api_url", &self.api_url)
            .field("repos", &self.repos)
            .field("orgs", &self.orgs)
            .field("users", &self.users)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("token_file", &self.token_file)
            .field("request_timeout_ms", &self.request_timeout_ms)
            .field("scrape_timeout_ms", &self.scrape_timeout_ms)
            .finish()
    }
}

fn default_api_url() -> String {
    "https://api.github.com".into()
}
fn default_request_timeout_ms() -> u64 {
    10000
}
fn default_scrape_timeout_ms() -> u64 {
    30000
}
