//! Exporter config loader (strict YAML + environment overrides) and the
//! resolved, immutable [`Settings`] handed to the collector.

pub mod schema;

use std::fmt;
use std::fs;
use std::net::SocketAddr;
use std::time::Duration;

use ghexporter_core::error::{ExporterError, Result};
use ghexporter_core::target::{resolve_targets, TargetMap};

pub use schema::{ExporterConfig, GithubSection, ServerSection};

/// Env var naming an optional YAML config file.
pub const CONFIG_PATH_ENV: &str = "GHEXPORTER_CONFIG";

pub fn load_from_file(path: &str) -> Result<ExporterConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| ExporterError::Config(format!("read config {path} failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<ExporterConfig> {
    let cfg: ExporterConfig = serde_yaml::from_str(s)
        .map_err(|e| ExporterError::Config(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Apply the classic exporter environment variables on top of `cfg`.
///
/// `lookup` is `std::env::var(..).ok()` in production; tests pass a map.
pub fn apply_env<F>(mut cfg: ExporterConfig, lookup: F) -> Result<ExporterConfig>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = lookup("API_URL").filter(|v| !v.is_empty()) {
        cfg.github.api_url = v;
    }
    if let Some(v) = lookup("REPOS").filter(|v| !v.is_empty()) {
        cfg.github.repos = v;
    }
    if let Some(v) = lookup("ORGS").filter(|v| !v.is_empty()) {
        cfg.github.orgs = v;
    }
    if let Some(v) = lookup("USERS").filter(|v| !v.is_empty()) {
        cfg.github.users = v;
    }
    if let Some(v) = lookup("GITHUB_TOKEN").filter(|v| !v.is_empty()) {
        cfg.github.token = Some(v);
    }
    if let Some(v) = lookup("GITHUB_TOKEN_FILE").filter(|v| !v.is_empty()) {
        cfg.github.token_file = Some(v);
    }
    if let Some(v) = lookup("LISTEN_PORT").filter(|v| !v.is_empty()) {
        let port: u16 = v
            .parse()
            .map_err(|e| ExporterError::Config(format!("LISTEN_PORT {v:?}: {e}")))?;
        cfg.server.listen = format!("0.0.0.0:{port}");
    }
    if let Some(v) = lookup("METRICS_PATH").filter(|v| !v.is_empty()) {
        cfg.server.metrics_path = v;
    }
    cfg.validate()?;
    Ok(cfg)
}

/// Log filter directive: `RUST_LOG` if set, else `LOG_LEVEL`, else `info`.
pub fn log_directive<F>(lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup("RUST_LOG")
        .filter(|v| !v.trim().is_empty())
        .or_else(|| {
            lookup("LOG_LEVEL")
                .map(|v| v.trim().to_ascii_lowercase())
                .filter(|v| !v.is_empty())
        })
        .unwrap_or_else(|| "info".to_string())
}

/// Load config the way the binary does: optional file, then env overrides.
pub fn load<F>(lookup: F) -> Result<ExporterConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let base = match lookup(CONFIG_PATH_ENV).filter(|p| !p.is_empty()) {
        Some(path) => load_from_file(&path)?,
        None => ExporterConfig::default(),
    };
    apply_env(base, lookup)
}

/// Inline token wins over the token file. An empty result means anonymous.
pub fn resolve_token(token: Option<&str>, token_file: Option<&str>) -> Result<Option<String>> {
    if let Some(t) = token.map(str::trim).filter(|t| !t.is_empty()) {
        return Ok(Some(t.to_string()));
    }
    let Some(path) = token_file else {
        return Ok(None);
    };
    let raw = fs::read_to_string(path)
        .map_err(|e| ExporterError::Config(format!("read token file {path} failed: {e}")))?;
    let t = raw.trim();
    Ok((!t.is_empty()).then(|| t.to_string()))
}

/// Everything a scrape needs, resolved once at startup.
#[derive(Clone)]
pub struct Settings {
    pub listen: SocketAddr,
    pub metrics_path: String,
    /// Upstream base URL without trailing slash.
    pub api_url: String,
    pub token: Option<String>,
    pub targets: TargetMap,
    pub request_timeout: Duration,
    pub scrape_timeout: Duration,
}

impl Settings {
    pub fn from_config(cfg: &ExporterConfig) -> Result<Self> {
        cfg.validate()?;
        let gh = &cfg.github;
        let targets = resolve_targets(&gh.repos, &gh.orgs, &gh.users)?;
        let token = resolve_token(gh.token.as_deref(), gh.token_file.as_deref())?;

        Ok(Self {
            listen: cfg.server.listen_addr()?,
            metrics_path: cfg.server.metrics_path.clone(),
            api_url: gh.api_url.trim_end_matches('/').to_string(),
            token,
            targets,
            request_timeout: Duration::from_millis(gh.request_timeout_ms),
            scrape_timeout: Duration::from_millis(gh.scrape_timeout_ms),
        })
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("listen", &self.listen)
            .field("metrics_path", &self.metrics_path)
            .field("api_url", &self.api_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("targets", &self.targets)
            .field("request_timeout", &self.request_timeout)
            .field("scrape_timeout", &self.scrape_timeout)
            .finish()
    }
}
