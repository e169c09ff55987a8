#![no_main]
use jacoco_summary::model::{CoverageMetrics, Metric};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Parser must not panic on any input, and every metric stays in range.
    let coverage = jacoco_summary::parsers::jacoco::parse(data);
    for metric in Metric::ALL {
        let value = coverage.percentage(metric);
        assert!(value.is_nan() || (0.0..=100.0).contains(&value));
    }
});
