#![no_main]
use jacoco_summary::model::{CoverageMetrics, Metric};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Parser must not panic on any input, and every summed metric stays in
    // range at each level.
    let coverage = jacoco_summary::parsers::csv::parse(data);
    let in_range = |value: f64| value.is_nan() || (0.0..=100.0).contains(&value);
    for metric in Metric::ALL {
        assert!(in_range(coverage.percentage(metric)));
        for package in coverage.packages() {
            assert!(in_range(package.percentage(metric)));
            for class in package.classes() {
                assert!(in_range(class.percentage(metric)));
            }
        }
    }
});
