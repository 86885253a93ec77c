//! Shared application state for the exporter.
//!
//! Everything here is built once from [`Settings`] at startup and shared
//! read-only across concurrent scrapes.

use std::sync::Arc;

use ghexporter_core::error::Result;

use crate::collector::Collector;
use crate::config::Settings;
use crate::obs::ExporterMetrics;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    settings: Arc<Settings>,
    collector: Collector,
    metrics: Arc<ExporterMetrics>,
}

impl AppState {
    /// Build application state.
    /// Returns Result so main can handle errors gracefully (no panic).
    pub fn new(settings: Settings) -> Result<Self> {
        let settings = Arc::new(settings);
        let metrics = Arc::new(ExporterMetrics::default());
        let collector = Collector::new(Arc::clone(&settings), Arc::clone(&metrics))?;

        for (owner, t) in settings.targets.iter() {
            let repos: Vec<&str> = t.repos().collect();
            tracing::info!(
                %owner,
                kind = ?t.kind,
                wildcard = t.is_wildcard(),
                ?repos,
                "target resolved"
            );
        }

        Ok(Self {
            inner: Arc::new(AppStateInner {
                settings,
                collector,
                metrics,
            }),
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.inner.settings
    }

    pub fn collector(&self) -> &Collector {
        &self.inner.collector
    }

    pub fn metrics(&self) -> &ExporterMetrics {
        &self.inner.metrics
    }

    pub fn set_draining(&self) {
        self.inner.metrics.set_draining();
    }

    pub fn is_draining(&self) -> bool {
        self.inner.metrics.is_draining()
    }
}
