//! Pull-model entry point.
//!
//! `describe` hands out the static descriptor table. `collect` runs the
//! listing, literal fan-out and quota probe concurrently, then transforms and
//! emits. Every pipeline error is logged and counted; `collect` itself never
//! fails, it just emits fewer samples.

use std::sync::Arc;
use std::time::Instant;

use ghexporter_core::error::{ExporterError, Result};
use ghexporter_core::metrics::{transform, MetricDescriptor, SampleSink, DESCRIPTORS};
use ghexporter_core::record::{RateLimits, RepositoryRecord};

use crate::config::Settings;
use crate::obs::ExporterMetrics;
use crate::upstream::{lister, rate, UpstreamClient};

pub struct Collector {
    settings: Arc<Settings>,
    client: UpstreamClient,
    metrics: Arc<ExporterMetrics>,
}

impl Collector {
    pub fn new(settings: Arc<Settings>, metrics: Arc<ExporterMetrics>) -> Result<Self> {
        let client = UpstreamClient::new(&settings)?;
        Ok(Self {
            settings,
            client,
            metrics,
        })
    }

    /// Fixed descriptor set. No I/O.
    pub fn describe(&self) -> &'static [MetricDescriptor] {
        &DESCRIPTORS
    }

    /// Run one scrape and stream its samples into `sink`.
    pub async fn collect<S>(&self, sink: &mut S)
    where
        S: SampleSink + ?Sized,
    {
        let started = Instant::now();

        let (records, rates) = tokio::join!(self.repositories(), self.rates());

        for record in &records {
            if let Err(e) = record.labels() {
                self.metrics.record_error(&e);
            }
        }
        for sample in transform(&records, &rates) {
            sink.emit(sample);
        }

        let elapsed = started.elapsed();
        self.metrics.scrapes.inc(&[]);
        self.metrics.scrape_duration.observe(&[], elapsed);
        tracing::debug!(repos = records.len(), ?elapsed, "scrape finished");
    }

    async fn repositories(&self) -> Vec<RepositoryRecord> {
        let targets = &self.settings.targets;
        let deadline = self.settings.scrape_timeout;

        let listing = async {
            tokio::time::timeout(deadline, lister::list_all(&self.client, targets))
                .await
                .unwrap_or_else(|_| {
                    Err(ExporterError::DeadlineExceeded {
                        url: format!("{}/{{orgs,users}}/*/repos", self.client.base()),
                    })
                })
        };
        let literal = lister::fetch_literal(&self.client, targets, deadline);

        let (listed, fetched) = tokio::join!(listing, literal);

        let mut records = match listed {
            Ok(records) => records,
            Err(e) => {
                tracing::error!(
                    kind = e.kind().as_str(),
                    error = %e,
                    "repository listing failed"
                );
                self.metrics.record_error(&e);
                Vec::new()
            }
        };
        for e in &fetched.errors {
            self.metrics.record_error(e);
        }
        records.extend(fetched.records);
        records
    }

    async fn rates(&self) -> RateLimits {
        match rate::probe(&self.client).await {
            Ok(rates) => rates,
            Err(e @ ExporterError::RateLimitingUnsupported) => {
                tracing::warn!(
                    error = %e,
                    "rate limiting not enabled, reporting zero-valued rate metrics"
                );
                self.metrics.record_error(&e);
                RateLimits::default()
            }
            Err(e) => {
                tracing::error!(
                    kind = e.kind().as_str(),
                    error = %e,
                    "unable to obtain rate limit data from API"
                );
                self.metrics.record_error(&e);
                RateLimits::default()
            }
        }
    }
}
