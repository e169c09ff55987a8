use std::path::Path;

use crate::detect::{detect_format, Format};
use crate::error::Result;
use crate::model::Coverage;
use crate::parsers::csv::CsvParser;
use crate::parsers::jacoco::JacocoParser;
use crate::parsers::Parser;

/// Read a coverage file and parse it, using the format override if given
/// and the file extension otherwise. An unsupported format fails before the
/// file is opened.
pub fn read_coverage(file_path: &Path, format_override: Option<&str>) -> Result<(Coverage, Format)> {
    let format = match format_override {
        Some(fmt_str) => fmt_str.parse::<Format>()?,
        None => detect_format(file_path)?,
    };

    let content = std::fs::read(file_path)?;
    Ok((parse_with_format(format, &content), format))
}

/// Parse already-loaded report bytes.
pub fn parse_with_format(format: Format, content: &[u8]) -> Coverage {
    parser_for(format).parse(content)
}

fn parser_for(format: Format) -> &'static dyn Parser {
    match format {
        Format::Jacoco => &JacocoParser,
        Format::Csv => &CsvParser,
    }
}
