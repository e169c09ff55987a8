/// Parser for JaCoCo CSV coverage reports.
///
/// CSV structure (one row per class, header names fixed by JaCoCo):
///   GROUP,PACKAGE,CLASS,INSTRUCTION_MISSED,INSTRUCTION_COVERED,BRANCH_MISSED,...
///   my-app,com.example,Foo,2,10,1,3,...
///
/// Key differences from the XML report:
///   - There are no pre-aggregated totals, so package and report counters
///     are the sums of the class rows beneath them.
///   - Package names are already dotted and class names already short.
///   - Fields are split on bare commas; JaCoCo never quotes them.
///
/// Rows whose field count differs from the header's are dropped, which
/// also takes care of the empty line after a final newline.
use std::collections::HashMap;

use super::{parse_count, Parser};
use crate::detect::Format;
use crate::model::*;

/// JaCoCo CSV format parser.
pub struct CsvParser;

impl Parser for CsvParser {
    fn format(&self) -> Format {
        Format::Csv
    }

    fn parse(&self, input: &[u8]) -> Coverage {
        parse(input)
    }
}

/// One record, keyed by header name.
type Row<'a> = HashMap<&'a str, &'a str>;

fn parse_rows(text: &str) -> Vec<Row<'_>> {
    let mut lines = text.split('\n').map(|l| l.strip_suffix('\r').unwrap_or(l));
    let headings: Vec<&str> = match lines.next() {
        Some(header) => header.split(',').collect(),
        None => return Vec::new(),
    };

    lines
        .map(|line| line.split(',').collect::<Vec<_>>())
        .filter(|fields| fields.len() == headings.len())
        .map(|fields| headings.iter().copied().zip(fields).collect())
        .collect()
}

/// Counter for a single row. Missing columns or unparseable values give
/// no counter.
fn row_counter(row: &Row, metric: Metric) -> Option<Counter> {
    let field = |suffix: &str| -> Option<u64> {
        let key = format!("{}_{suffix}", metric.as_str());
        row.get(key.as_str()).and_then(|v| parse_count(v))
    };
    Some(Counter::new(field("MISSED")?, field("COVERED")?))
}

/// Sum a metric over all rows before computing anything from it.
fn sum_rows(rows: &[&Row], metric: Metric) -> Option<Counter> {
    rows.iter().map(|row| row_counter(row, metric)).sum()
}

fn build_class(row: &Row) -> Class {
    let name = row.get("CLASS").copied().unwrap_or_default();
    Class::new(
        name.to_string(),
        Counters::from_fn(|metric| row_counter(row, metric)),
    )
}

/// Group rows by `PACKAGE` in encounter order. Rows without a package are
/// left out.
fn group_by_package<'r, 'a>(rows: &'r [Row<'a>]) -> Vec<(&'a str, Vec<&'r Row<'a>>)> {
    let mut groups: Vec<(&str, Vec<&Row>)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for row in rows {
        let name = match row.get("PACKAGE") {
            Some(name) if !name.is_empty() => *name,
            _ => continue,
        };
        let idx = *index.entry(name).or_insert_with(|| {
            groups.push((name, Vec::new()));
            groups.len() - 1
        });
        groups[idx].1.push(row);
    }

    groups
}

/// Parse JaCoCo CSV coverage data from raw bytes.
pub fn parse(input: &[u8]) -> Coverage {
    let text = String::from_utf8_lossy(input);
    let rows = parse_rows(&text);

    let packages = group_by_package(&rows)
        .into_iter()
        .map(|(name, package_rows)| {
            let counters = Counters::from_fn(|metric| sum_rows(&package_rows, metric));
            let classes = package_rows.iter().map(|row| build_class(row)).collect();
            Package::new(name.to_string(), counters, classes)
        })
        .collect();

    let all_rows: Vec<&Row> = rows.iter().collect();
    let counters = Counters::from_fn(|metric| sum_rows(&all_rows, metric));

    Coverage::new(counters, packages)
}
