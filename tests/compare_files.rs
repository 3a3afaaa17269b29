//! Published compare files: codec fidelity, integrity and draw calls.

use cardradar::charts::{CompareScript, DrawCall, JsonRenderer, Viewport};
use cardradar::data::{SentinelPolicy, ValidationRules};
use cardradar::stats::summarize;
use std::path::PathBuf;

const NXP: &str = "NXP 2.4.1 R3_vs_NXP J3H145 RSA4096_compare.js";
const SMARTCAFE: &str = "G+D Smartcafe 3.2 72K_vs_NXP J2A080 80K(2)_compare.js";

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

#[test]
fn published_files_re_encode_byte_for_byte() {
    for name in [NXP, SMARTCAFE] {
        let text = std::fs::read_to_string(fixture(name)).unwrap();
        let script = CompareScript::parse(&text).unwrap();
        assert_eq!(script.encode(), text, "{name} changed on re-encode");
    }
}

#[test]
fn published_files_are_clean() {
    for name in [NXP, SMARTCAFE] {
        let script = CompareScript::read(&fixture(name)).unwrap();
        let report = script.validate(&ValidationRules::default());
        assert!(report.is_clean(), "{name}: {:?}", report.issues);
        assert_eq!(script.data.first().len(), 24);
        assert_eq!(script.levels, 10);
        assert_eq!(script.max_value, 1.0);
    }
}

#[test]
fn product_names_and_quirky_labels_are_kept() {
    let script = CompareScript::read(&fixture(SMARTCAFE)).unwrap();
    assert_eq!(
        script.products,
        Some((
            "G+D Smartcafe 3.2 72K".to_string(),
            "NXP J2A080 80K(2)".to_string()
        ))
    );
    assert!(script
        .data
        .first()
        .axes()
        .any(|a| a == " arrayCopy nonAtomic RAM2RAM (256B)"));
}

#[test]
fn slowest_floor_is_a_measured_value() {
    let mut script = CompareScript::read(&fixture(SMARTCAFE)).unwrap();
    let floors: Vec<_> = script
        .data
        .first()
        .iter()
        .chain(script.data.second().iter())
        .filter(|s| s.value == 0.099)
        .collect();
    assert!(!floors.is_empty());
    assert!(floors.iter().all(|s| s.timing_ms().is_some()));

    // Nothing in a published file needs rewriting.
    assert_eq!(SentinelPolicy::Normalize.apply(&mut script.data), 0);
}

#[test]
fn draw_call_carries_resolved_config() {
    let script = CompareScript::read(&fixture(NXP)).unwrap();
    let mut renderer = JsonRenderer::new(Vec::new());
    script
        .render(&Viewport::new(1175.0, 1045.0), &mut renderer)
        .unwrap();

    let call: DrawCall = serde_json::from_slice(&renderer.into_inner()).unwrap();
    assert_eq!(call.target, "#chart");
    assert_eq!(call.config.w, 1000.0);
    assert_eq!(call.config.h, 800.0);
    assert_eq!(call.config.levels, 10);
    assert_eq!(call.data, script.data);
}

#[test]
fn summary_of_published_pair() {
    let script = CompareScript::read(&fixture(NXP)).unwrap();
    let summary = summarize(&script.data);
    assert_eq!(summary.series[0].supported, 18);
    assert_eq!(summary.series[1].supported, 6);
    assert_eq!(summary.shared, 6);
    assert_eq!(summary.series[1].wins, 6);
    assert_eq!(summary.leader(), Some(1));
}
