#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use ghexporter_core::metrics::{Family, Sample, SampleSink};
use ghexporter_server::obs::metrics::escape_label;
use ghexporter_server::obs::Exposition;

fn render(samples: Vec<Sample>) -> String {
    let mut exposition = Exposition::new();
    for s in samples {
        exposition.emit(s);
    }
    let mut out = String::new();
    exposition.render(&mut out);
    out
}

#[test]
fn escape_label_handles_quote_backslash_newline() {
    assert_eq!(escape_label("plain"), "plain");
    assert_eq!(escape_label("a\"b"), r#"a\"b"#);
    assert_eq!(escape_label("o\\w"), r#"o\\w"#);
    assert_eq!(escape_label("C\nX"), r#"C\nX"#);
    assert_eq!(escape_label("\\\""), r#"\\\""#);
}

#[test]
fn labeled_sample_is_escaped_in_descriptor_order() {
    let labels = ["a\"b", "o\\w", "false", "false", "false", "C\nX", "Rust"];
    let body = render(vec![Sample {
        family: Family::Stars,
        labels: labels.iter().map(|s| s.to_string()).collect(),
        value: 10.0,
    }]);

    let expected = r#"github_repo_stars{repo="a\"b",user="o\\w",private="false",fork="false",archived="false",license="C\nX",language="Rust"} 10"#;
    assert!(body.lines().any(|l| l == expected), "{body}");
    // Raw newlines in a label value must not split the sample line.
    assert!(!body.lines().any(|l| l.starts_with("X\"")));
}

#[test]
fn unlabeled_families_render_without_braces() {
    let body = render(vec![
        Sample {
            family: Family::RateLimit,
            labels: Vec::new(),
            value: 5000.0,
        },
        Sample {
            family: Family::RateReset,
            labels: Vec::new(),
            value: 1_700_000_000.0,
        },
    ]);

    assert!(body.lines().any(|l| l == "github_rate_limit 5000"), "{body}");
    assert!(body.lines().any(|l| l == "github_rate_reset 1700000000"), "{body}");
    assert!(!body.contains("github_rate_limit{"));
    assert!(!body.contains("github_rate_reset{"));
}

#[test]
fn every_family_gets_help_and_type_even_without_samples() {
    let body = render(Vec::new());
    for family in Family::ALL {
        let desc = family.descriptor();
        assert!(body.contains(&format!("# HELP {} {}\n", desc.name, desc.help)));
        assert!(body.contains(&format!("# TYPE {} gauge\n", desc.name)));
    }
    assert!(body.lines().all(|l| l.starts_with('#')));
}
