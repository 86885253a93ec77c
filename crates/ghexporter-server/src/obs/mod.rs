//! Observability: text exposition of upstream samples plus the exporter's own
//! counters, rendered together by the metrics handler.

pub mod exposition;
pub mod metrics;

pub use exposition::Exposition;
pub use metrics::ExporterMetrics;
