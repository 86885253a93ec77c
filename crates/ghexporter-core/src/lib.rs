//! ghexporter core: target resolution, typed upstream payloads, metric
//! descriptors and the sample transformer.
//!
//! This crate carries no transport or runtime dependencies; fetching lives in
//! `ghexporter-server`. Everything here is pure and cheap to test.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths must surface as `ExporterError`/`Result` so a malformed
//! upstream payload can never take the exporter down.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod api;
pub mod error;
pub mod metrics;
pub mod record;
pub mod target;

/// Shared result type.
pub use error::{ErrorKind, ExporterError, Result};
pub use metrics::{Family, MetricDescriptor, Sample, SampleSink, DESCRIPTORS};
pub use record::{RateLimits, RepositoryRecord};
pub use target::{resolve_targets, OwnerKind, Selector, TargetMap};
