//! Job summary rendering.
//!
//! Walks a [`Coverage`] tree and writes HTML tables through a
//! [`SummarySink`]: one table with a row per package plus a total row,
//! followed by a collapsed details section with a class table per package.

use crate::error::Result;
use crate::model::{Class, Coverage, CoverageMetrics, Package};

const METRIC_HEADERS: [&str; 5] = [
    "% Instructions",
    "% Branches",
    "% Lines",
    "% Complexity",
    "% Method",
];

/// Destination for summary markup.
pub trait SummarySink {
    /// Append an `<hN>` heading.
    fn add_heading(&mut self, text: &str, level: u8) -> &mut Self;

    /// Append markup verbatim.
    fn add_raw(&mut self, markup: &str) -> &mut Self;

    /// Publish everything appended so far.
    fn write(&mut self) -> Result<()>;
}

/// Sink that keeps the rendered document in memory.
#[derive(Debug, Default)]
pub struct Markup {
    buffer: String,
}

impl Markup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    pub fn into_string(self) -> String {
        self.buffer
    }
}

impl SummarySink for Markup {
    fn add_heading(&mut self, text: &str, level: u8) -> &mut Self {
        self.buffer.push_str(&format!("<h{level}>{text}</h{level}>\n"));
        self
    }

    fn add_raw(&mut self, markup: &str) -> &mut Self {
        self.buffer.push_str(markup);
        self
    }

    fn write(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Render the full coverage summary into `sink` and publish it.
pub fn add_job_summary<S: SummarySink>(coverage: &Coverage, sink: &mut S) -> Result<()> {
    sink.add_heading("Code coverage", 3)
        .add_raw(&summary_table(coverage))
        .add_raw("<details><summary>Details</summary>");
    for p in coverage.packages().iter().filter(|p| p.has_coverage()) {
        sink.add_heading(p.name(), 4).add_raw(&package_table(p));
    }
    sink.add_raw("</details>");
    sink.write()
}

/// Per-package table with a total row taken from the report-level counters.
pub fn summary_table(coverage: &Coverage) -> String {
    let mut rows = vec![header_row("Package")];

    for p in coverage.packages().iter().filter(|p| p.has_coverage()) {
        rows.push(metrics_row(p.name(), p));
    }
    rows.push(metrics_row(&strong("Total"), coverage));

    table(&rows)
}

/// Per-class table for one package.
pub fn package_table(package: &Package) -> String {
    let mut rows = vec![header_row("Class")];

    for c in package.classes().iter().filter(|c| c.has_coverage()) {
        rows.push(class_row(c));
    }

    table(&rows)
}

fn class_row(class: &Class) -> String {
    metrics_row(class.name(), class)
}

fn table(rows: &[String]) -> String {
    format!("<table>{}</table>", rows.concat())
}

fn header_row(name: &str) -> String {
    let content: String = std::iter::once(name)
        .chain(METRIC_HEADERS)
        .map(|h| format!("<th>{h}</th>"))
        .collect();
    format!("<tr>{content}</tr>")
}

fn metrics_row(label: &str, element: &impl CoverageMetrics) -> String {
    let values = [
        element.instruction(),
        element.branch(),
        element.line(),
        element.complexity(),
        element.method(),
    ];
    let content: String = std::iter::once(text_cell(label))
        .chain(values.into_iter().map(number_cell))
        .collect();
    format!("<tr>{content}</tr>")
}

fn text_cell(value: &str) -> String {
    format!("<td>{value}</td>")
}

fn number_cell(value: f64) -> String {
    format!(r#"<td align="right">{}</td>"#, format_percentage(value))
}

/// `-` for NaN, otherwise the value truncated to an integer.
pub fn format_percentage(value: f64) -> String {
    if value.is_nan() {
        "-".to_string()
    } else {
        format!("{}", value.floor())
    }
}

fn strong(text: &str) -> String {
    format!("<strong>{text}</strong>")
}
