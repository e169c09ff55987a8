//! Command handler functions for the jacoco-summary CLI.
//!
//! Each `cmd_*` function returns its output as a `String`, making them easy
//! to test without capturing stdout.

use std::fmt::Write;
use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;

use crate::detect::Format;
use crate::ingest::read_coverage;
use crate::model::{Coverage, CoverageMetrics, Metric};
use crate::summary::{add_job_summary, Markup, SummarySink};

/// Output style for the `show` command.
#[derive(Clone, ValueEnum)]
pub enum Style {
    Text,
    Json,
}

fn load_with_format(file: &Path, format: Option<&str>) -> Result<(Coverage, Format)> {
    read_coverage(file, format)
        .with_context(|| format!("Failed to load coverage from {}", file.display()))
}

fn load(file: &Path, format: Option<&str>) -> Result<Coverage> {
    load_with_format(file, format).map(|(coverage, _)| coverage)
}

/// Render the job summary markup for a report.
pub fn cmd_summary(file: &Path, format: Option<&str>) -> Result<String> {
    let coverage = load(file, format)?;
    let mut markup = Markup::new();
    add_job_summary(&coverage, &mut markup)?;
    Ok(markup.into_string())
}

/// Render the job summary for a report and publish it through `sink`.
/// Returns the format the report was read as.
pub fn cmd_publish<S: SummarySink>(
    file: &Path,
    format: Option<&str>,
    sink: &mut S,
) -> Result<Format> {
    let (coverage, detected) = load_with_format(file, format)?;
    add_job_summary(&coverage, sink).context("Failed to write job summary")?;
    Ok(detected)
}

/// Print the whole coverage tree, as a text table or JSON.
pub fn cmd_show(file: &Path, format: Option<&str>, style: &Style) -> Result<String> {
    let coverage = load(file, format)?;
    match style {
        Style::Text => Ok(format_text(&coverage)),
        Style::Json => {
            let mut out = serde_json::to_string_pretty(&CoverageView::new(&coverage))?;
            out.push('\n');
            Ok(out)
        }
    }
}

fn format_cell(value: f64) -> String {
    if value.is_nan() {
        "-".to_string()
    } else {
        format!("{value:.1}%")
    }
}

fn write_text_row(out: &mut String, name: &str, element: &impl CoverageMetrics) {
    write!(out, "{name:<50}").unwrap();
    for metric in Metric::ALL {
        write!(out, " {:>11}", format_cell(element.percentage(metric))).unwrap();
    }
    out.push('\n');
}

fn format_text(coverage: &Coverage) -> String {
    let mut out = String::new();
    write!(out, "{:<50}", "NAME").unwrap();
    for metric in Metric::ALL {
        write!(out, " {:>11}", metric.as_str()).unwrap();
    }
    out.push('\n');
    writeln!(out, "{}", "-".repeat(50 + 12 * Metric::ALL.len())).unwrap();

    for p in coverage.packages() {
        write_text_row(&mut out, p.name(), p);
        for c in p.classes() {
            write_text_row(&mut out, &format!("  {}", c.name()), c);
        }
    }

    writeln!(out, "{}", "-".repeat(50 + 12 * Metric::ALL.len())).unwrap();
    write_text_row(&mut out, "TOTAL", coverage);
    out
}

/// The six percentages; NaN serializes as `null`.
#[derive(Serialize)]
struct MetricsView {
    instruction: f64,
    branch: f64,
    line: f64,
    complexity: f64,
    method: f64,
    class: f64,
}

impl MetricsView {
    fn new(element: &impl CoverageMetrics) -> Self {
        Self {
            instruction: element.instruction(),
            branch: element.branch(),
            line: element.line(),
            complexity: element.complexity(),
            method: element.method(),
            class: element.class(),
        }
    }
}

#[derive(Serialize)]
struct ClassView<'a> {
    name: &'a str,
    #[serde(flatten)]
    metrics: MetricsView,
}

#[derive(Serialize)]
struct PackageView<'a> {
    name: &'a str,
    #[serde(flatten)]
    metrics: MetricsView,
    classes: Vec<ClassView<'a>>,
}

#[derive(Serialize)]
struct CoverageView<'a> {
    #[serde(flatten)]
    metrics: MetricsView,
    packages: Vec<PackageView<'a>>,
}

impl<'a> CoverageView<'a> {
    fn new(coverage: &'a Coverage) -> Self {
        let packages = coverage
            .packages()
            .iter()
            .map(|p| PackageView {
                name: p.name(),
                metrics: MetricsView::new(p),
                classes: p
                    .classes()
                    .iter()
                    .map(|c| ClassView {
                        name: c.name(),
                        metrics: MetricsView::new(c),
                    })
                    .collect(),
            })
            .collect();
        Self {
            metrics: MetricsView::new(coverage),
            packages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<report name="demo">
  <package name="com/example/b">
    <class name="com/example/b/Util">
      <counter type="INSTRUCTION" missed="0" covered="0"/>
    </class>
    <counter type="INSTRUCTION" missed="0" covered="0"/>
  </package>
  <package name="com/example/a">
    <class name="com/example/a/Foo">
      <counter type="INSTRUCTION" missed="1" covered="3"/>
      <counter type="LINE" missed="1" covered="1"/>
    </class>
    <counter type="INSTRUCTION" missed="1" covered="3"/>
    <counter type="LINE" missed="1" covered="1"/>
  </package>
  <counter type="INSTRUCTION" missed="1" covered="3"/>
  <counter type="LINE" missed="1" covered="1"/>
</report>
"#;

    fn write_report(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_cmd_summary() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_report(&dir, "jacoco.xml", XML);

        let out = cmd_summary(&path, None).unwrap();

        assert!(out.starts_with("<h3>Code coverage</h3>"));
        assert!(out.contains("<td>com.example.a</td><td align=\"right\">75</td>"));
        assert!(!out.contains("com.example.b"));
        assert!(out.contains("<h4>com.example.a</h4>"));
        assert!(out.contains("<td>Foo</td>"));
    }

    #[test]
    fn test_cmd_summary_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_report(&dir, "coverage.json", "{}");

        let err = cmd_summary(&path, None).unwrap_err();
        assert!(format!("{err:#}").contains("Unsupported file type: json"));
    }

    #[test]
    fn test_cmd_summary_format_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_report(&dir, "report.txt", XML);

        let out = cmd_summary(&path, Some("xml")).unwrap();
        assert!(out.contains("com.example.a"));
    }

    #[test]
    fn test_cmd_publish() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_report(&dir, "jacoco.csv", "PACKAGE,CLASS,INSTRUCTION_MISSED,INSTRUCTION_COVERED\np,A,1,1\n");

        let mut markup = Markup::new();
        let detected = cmd_publish(&path, None, &mut markup).unwrap();
        assert_eq!(detected, Format::Csv);
        assert!(markup.as_str().contains("<h4>p</h4>"));
    }

    #[test]
    fn test_cmd_publish_reports_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_report(&dir, "coverage.txt", XML);

        let mut markup = Markup::new();
        let detected = cmd_publish(&path, Some("xml"), &mut markup).unwrap();
        assert_eq!(detected, Format::Jacoco);
        assert!(markup.as_str().contains("<h4>com.example.a</h4>"));
    }

    #[test]
    fn test_cmd_show_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_report(&dir, "jacoco.xml", XML);

        let out = cmd_show(&path, None, &Style::Text).unwrap();

        assert!(out.contains("NAME"));
        assert!(out.contains("INSTRUCTION"));
        assert!(out.contains("com.example.a"));
        assert!(out.contains("  Foo"));
        assert!(out.contains("75.0%"));
        assert!(out.contains("50.0%"));
        // Packages with nothing to cover are still listed here.
        assert!(out.contains("com.example.b"));
        let a = out.find("com.example.a").unwrap();
        let b = out.find("com.example.b").unwrap();
        assert!(a < b);
        assert!(out.lines().last().unwrap().starts_with("TOTAL"));
    }

    #[test]
    fn test_cmd_show_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_report(&dir, "jacoco.xml", XML);

        let out = cmd_show(&path, None, &Style::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();

        assert_eq!(value["instruction"], 75.0);
        assert!(value["branch"].is_null());
        assert_eq!(value["packages"][0]["name"], "com.example.a");
        assert_eq!(value["packages"][0]["classes"][0]["name"], "Foo");
        assert_eq!(value["packages"][0]["classes"][0]["line"], 50.0);
        assert!(value["packages"][1]["instruction"].is_null());
    }
}
