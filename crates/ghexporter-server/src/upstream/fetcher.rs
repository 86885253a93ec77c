//! Concurrent fan-out over fully-formed URLs.
//!
//! One task per URL, each reporting exactly once through a shared completion
//! channel. The orchestrator waits for one completion per URL, bounded by a
//! scrape-level deadline; URLs that never reported get a `DeadlineExceeded`
//! (or `Internal`, when their task died) envelope so the caller always sees
//! one envelope per URL.

use std::time::Duration;

use bytes::Bytes;
use tokio::sync::mpsc;
use tokio::time::Instant;

use ghexporter_core::error::{ExporterError, Result};

use super::client::UpstreamClient;

/// Outcome of one fetch attempt.
#[derive(Debug)]
pub struct Response {
    pub url: String,
    pub outcome: Result<Bytes>,
}

impl Response {
    pub fn body(&self) -> Option<&Bytes> {
        self.outcome.as_ref().ok()
    }

    pub fn error(&self) -> Option<&ExporterError> {
        self.outcome.as_ref().err()
    }
}

#[derive(Clone, Copy)]
enum Barrier {
    Complete,
    Deadline,
    Closed,
}

pub async fn fetch_all(
    client: &UpstreamClient,
    urls: Vec<String>,
    deadline: Duration,
) -> Vec<Response> {
    let n = urls.len();
    if n == 0 {
        return Vec::new();
    }

    let (tx, mut rx) = mpsc::channel::<(usize, Result<Bytes>)>(n);
    let mut tasks = Vec::with_capacity(n);
    for (idx, url) in urls.iter().enumerate() {
        let tx = tx.clone();
        let client = client.clone();
        let url = url.clone();
        tasks.push(tokio::spawn(async move {
            let outcome = client.get_bytes(&url).await;
            // a closed receiver means the orchestrator already gave up
            let _ = tx.send((idx, outcome)).await;
        }));
    }
    drop(tx);

    let mut slots: Vec<Option<Result<Bytes>>> = (0..n).map(|_| None).collect();
    let mut received = 0;
    let until = Instant::now() + deadline;

    let barrier = loop {
        if received == n {
            break Barrier::Complete;
        }
        match tokio::time::timeout_at(until, rx.recv()).await {
            Ok(Some((idx, outcome))) => {
                if let Some(slot) = slots.get_mut(idx) {
                    if slot.is_none() {
                        received += 1;
                    }
                    *slot = Some(outcome);
                }
            }
            Ok(None) => break Barrier::Closed,
            Err(_) => break Barrier::Deadline,
        }
    };

    match barrier {
        Barrier::Complete => {}
        Barrier::Deadline => {
            tracing::warn!(
                pending = n - received,
                ?deadline,
                "fetch deadline elapsed, aborting stragglers"
            );
        }
        Barrier::Closed => {
            tracing::error!(pending = n - received, "fetch tasks ended without reporting");
        }
    }
    for task in &tasks {
        task.abort();
    }

    urls.into_iter()
        .zip(slots)
        .map(|(url, slot)| {
            let outcome = slot.unwrap_or_else(|| match barrier {
                Barrier::Closed => Err(ExporterError::Internal(format!(
                    "fetch task for {url} ended without reporting"
                ))),
                _ => Err(ExporterError::DeadlineExceeded { url: url.clone() }),
            });
            if let Err(e) = &outcome {
                tracing::error!(%url, kind = e.kind().as_str(), error = %e, "error scraping API");
            }
            Response { url, outcome }
        })
        .collect()
}
