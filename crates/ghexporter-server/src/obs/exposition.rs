//! Text exposition of collected samples.
//!
//! Samples are grouped by family; every family from the descriptor table gets
//! its `# HELP`/`# TYPE` header even when it has no samples this scrape.

use std::collections::BTreeMap;
use std::fmt::Write;

use ghexporter_core::metrics::{Family, Sample, SampleSink};

use super::metrics::escape_label;

pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

#[derive(Debug, Default)]
pub struct Exposition {
    families: BTreeMap<Family, Vec<Sample>>,
}

impl Exposition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn samples(&self, family: Family) -> &[Sample] {
        self.families.get(&family).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn render(&self, out: &mut String) {
        for family in Family::ALL {
            let desc = family.descriptor();
            let _ = writeln!(out, "# HELP {} {}", desc.name, desc.help);
            let _ = writeln!(out, "# TYPE {} gauge", desc.name);
            for sample in self.samples(family) {
                let labels = sample
                    .label_pairs()
                    .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
                    .collect::<Vec<_>>()
                    .join(",");
                if labels.is_empty() {
                    let _ = writeln!(out, "{} {}", desc.name, sample.value);
                } else {
                    let _ = writeln!(out, "{}{{{}}} {}", desc.name, labels, sample.value);
                }
            }
        }
    }
}

impl SampleSink for Exposition {
    fn emit(&mut self, sample: Sample) {
        self.families.entry(sample.family).or_default().push(sample);
    }
}
