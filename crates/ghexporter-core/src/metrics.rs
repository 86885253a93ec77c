//! Metric descriptors and the record -> sample transformer.
//!
//! The descriptor table is a `static`: built once, never mutated, shared by
//! the describe and collect phases.

use crate::record::{RateLimits, RepositoryRecord};

pub const REPO_LABELS: [&str; 7] = [
    "repo", "user", "private", "fork", "archived", "license", "language",
];

/// One metric family: name, help text, ordered label names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricDescriptor {
    pub name: &'static str,
    pub help: &'static str,
    pub labels: &'static [&'static str],
}

/// Index into [`DESCRIPTORS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Family {
    Stars,
    OpenIssues,
    Watchers,
    Forks,
    SizeKb,
    RateLimit,
    RateRemaining,
    RateReset,
}

impl Family {
    pub const ALL: [Family; 8] = [
        Family::Stars,
        Family::OpenIssues,
        Family::Watchers,
        Family::Forks,
        Family::SizeKb,
        Family::RateLimit,
        Family::RateRemaining,
        Family::RateReset,
    ];

    pub fn descriptor(self) -> &'static MetricDescriptor {
        &DESCRIPTORS[self as usize]
    }
}

pub static DESCRIPTORS: [MetricDescriptor; 8] = [
    MetricDescriptor {
        name: "github_repo_stars",
        help: "Total number of Stars for given repository",
        labels: &REPO_LABELS,
    },
    MetricDescriptor {
        name: "github_repo_open_issues",
        help: "Total number of open issues for given repository",
        labels: &REPO_LABELS,
    },
    MetricDescriptor {
        name: "github_repo_watchers",
        help: "Total number of watchers/subscribers for given repository",
        labels: &REPO_LABELS,
    },
    MetricDescriptor {
        name: "github_repo_forks",
        help: "Total number of forks for given repository",
        labels: &REPO_LABELS,
    },
    MetricDescriptor {
        name: "github_repo_size_kb",
        help: "Size in KB for given repository",
        labels: &REPO_LABELS,
    },
    MetricDescriptor {
        name: "github_rate_limit",
        help: "Number of API queries allowed in a 60 minute window",
        labels: &[],
    },
    MetricDescriptor {
        name: "github_rate_remaining",
        help: "Number of API queries remaining in the current window",
        labels: &[],
    },
    MetricDescriptor {
        name: "github_rate_reset",
        help: "The time at which the current rate limit window resets in UTC epoch seconds",
        labels: &[],
    },
];

/// One `(family, label values, value)` triple. All samples are gauges.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub family: Family,
    /// Values in the order of the family's descriptor labels.
    pub labels: Vec<String>,
    pub value: f64,
}

impl Sample {
    pub fn name(&self) -> &'static str {
        self.family.descriptor().name
    }

    /// `(label name, label value)` pairs.
    pub fn label_pairs(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.family
            .descriptor()
            .labels
            .iter()
            .copied()
            .zip(self.labels.iter().map(String::as_str))
    }
}

/// Receiver of emitted samples.
pub trait SampleSink {
    fn emit(&mut self, sample: Sample);
}

impl SampleSink for Vec<Sample> {
    fn emit(&mut self, sample: Sample) {
        self.push(sample);
    }
}

/// The five labeled samples of one repository, or `MalformedRecord`.
pub fn repository_samples(record: &RepositoryRecord) -> crate::Result<[Sample; 5]> {
    let labels = record.labels()?.to_vec();
    let sample = |family, value: u64| Sample {
        family,
        labels: labels.clone(),
        value: value as f64,
    };
    Ok([
        sample(Family::Stars, record.stars),
        sample(Family::Forks, record.forks),
        sample(Family::OpenIssues, record.open_issues),
        sample(Family::Watchers, record.watchers),
        sample(Family::SizeKb, record.size_kb),
    ])
}

/// The three unlabeled quota samples.
pub fn rate_samples(rates: &RateLimits) -> [Sample; 3] {
    let sample = |family, value| Sample {
        family,
        labels: Vec::new(),
        value,
    };
    [
        sample(Family::RateLimit, rates.limit),
        sample(Family::RateRemaining, rates.remaining),
        sample(Family::RateReset, rates.reset),
    ]
}

/// Map records and the quota snapshot into samples.
///
/// Records missing a labeled field are skipped (logged), never emitted with
/// empty labels. The three rate samples always come last.
pub fn transform(records: &[RepositoryRecord], rates: &RateLimits) -> Vec<Sample> {
    let mut out = Vec::with_capacity(records.len() * 5 + 3);
    for record in records {
        match repository_samples(record) {
            Ok(samples) => out.extend(samples),
            Err(e) => {
                tracing::warn!(
                    repo = %record.name,
                    kind = e.kind().as_str(),
                    error = %e,
                    "skipping repository"
                );
            }
        }
    }
    out.extend(rate_samples(rates));
    out
}
