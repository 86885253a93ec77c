//! Shared error type across ghexporter crates.

use thiserror::Error;

/// Stable error classes (used as log field and metric label).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Startup configuration is unusable.
    Config,
    /// Upstream answered 404 for a specific resource.
    NotFound,
    /// Upstream answered with another non-success status.
    Status,
    /// Network failure or request timeout.
    Transport,
    /// Scrape-level deadline elapsed before the request reported.
    Deadline,
    /// Upstream body did not match the endpoint's payload type.
    Decode,
    /// Quota endpoint is disabled on this deployment.
    RateUnsupported,
    /// Quota headers missing or unparsable.
    RateHeaders,
    /// Repository record lacks a labeled field.
    MalformedRecord,
    /// Internal coordination fault.
    Internal,
}

impl ErrorKind {
    /// String representation used in logs and metric labels.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Config => "config",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Status => "status",
            ErrorKind::Transport => "transport",
            ErrorKind::Deadline => "deadline",
            ErrorKind::Decode => "decode",
            ErrorKind::RateUnsupported => "rate_unsupported",
            ErrorKind::RateHeaders => "rate_headers",
            ErrorKind::MalformedRecord => "malformed_record",
            ErrorKind::Internal => "internal",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, ExporterError>;

/// Unified error type used by core and server.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExporterError {
    #[error("no targets specified: set at least one of repos, orgs or users")]
    NoTargetsConfigured,
    #[error("invalid target {0:?}: repositories must be given as owner/name")]
    InvalidTarget(String),
    #[error("config: {0}")]
    Config(String),
    #[error(
        "received 404 from API for {url}: ensure the name is correct, \
         if this is a private repo then check the token scope"
    )]
    UpstreamNotFound { url: String },
    #[error("unexpected HTTP status {status} for {url}")]
    UpstreamStatus { url: String, status: u16 },
    #[error("request to {url} failed: {reason}")]
    UpstreamTransport { url: String, reason: String },
    #[error("scrape deadline exceeded before {url} reported")]
    DeadlineExceeded { url: String },
    #[error("cannot decode response from {url}: {reason}")]
    Decode { url: String, reason: String },
    #[error("rate limiting not enabled in API")]
    RateLimitingUnsupported,
    #[error("malformed rate limit header {header}: {reason}")]
    MalformedRateHeaders { header: &'static str, reason: String },
    #[error("repository {repo:?} is missing required field {field}")]
    MalformedRecord { repo: String, field: &'static str },
    #[error("internal: {0}")]
    Internal(String),
}

impl ExporterError {
    /// Map an error to its stable class.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExporterError::NoTargetsConfigured
            | ExporterError::InvalidTarget(_)
            | ExporterError::Config(_) => ErrorKind::Config,
            ExporterError::UpstreamNotFound { .. } => ErrorKind::NotFound,
            ExporterError::UpstreamStatus { .. } => ErrorKind::Status,
            ExporterError::UpstreamTransport { .. } => ErrorKind::Transport,
            ExporterError::DeadlineExceeded { .. } => ErrorKind::Deadline,
            ExporterError::Decode { .. } => ErrorKind::Decode,
            ExporterError::RateLimitingUnsupported => ErrorKind::RateUnsupported,
            ExporterError::MalformedRateHeaders { .. } => ErrorKind::RateHeaders,
            ExporterError::MalformedRecord { .. } => ErrorKind::MalformedRecord,
            ExporterError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Whether the process should refuse to start on this error.
    pub fn is_fatal(&self) -> bool {
        self.kind() == ErrorKind::Config
    }
}
