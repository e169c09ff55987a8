/// Selection of the coverage report format.
///
/// The file extension decides (`.xml` or `.csv`, any case); a `--format`
/// override from the command line takes precedence. Nothing is read from
/// the file before the format is known.
use std::path::Path;

use crate::error::SummaryError;

/// Supported coverage formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Jacoco,
    Csv,
}

impl Format {
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Jacoco => "jacoco",
            Format::Csv => "csv",
        }
    }
}

impl std::str::FromStr for Format {
    type Err = SummaryError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "jacoco" | "xml" => Ok(Format::Jacoco),
            "csv" => Ok(Format::Csv),
            _ => Err(SummaryError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Detect the coverage format from the file name.
pub fn detect_format(path: &Path) -> Result<Format, SummaryError> {
    let name = path.to_string_lossy();
    let ext = match name.rfind('.') {
        Some(idx) => name[idx + 1..].to_lowercase(),
        None => name.to_lowercase(),
    };
    match ext.as_str() {
        "xml" => Ok(Format::Jacoco),
        "csv" => Ok(Format::Csv),
        _ => Err(SummaryError::UnsupportedFormat(ext)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_by_extension() {
        assert_eq!(
            detect_format(Path::new("build/reports/jacoco.xml")).unwrap(),
            Format::Jacoco
        );
        assert_eq!(
            detect_format(Path::new("target/site/jacoco/jacoco.csv")).unwrap(),
            Format::Csv
        );
    }

    #[test]
    fn test_detect_extension_case_insensitive() {
        assert_eq!(detect_format(Path::new("REPORT.XML")).unwrap(), Format::Jacoco);
        assert_eq!(detect_format(Path::new("report.Csv")).unwrap(), Format::Csv);
    }

    #[test]
    fn test_detect_unsupported() {
        let err = detect_format(Path::new("coverage.json")).unwrap_err();
        assert_eq!(err.to_string(), "Unsupported file type: json");

        assert!(detect_format(Path::new("lcov.info")).is_err());
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("xml".parse::<Format>().unwrap(), Format::Jacoco);
        assert_eq!("JaCoCo".parse::<Format>().unwrap(), Format::Jacoco);
        assert_eq!("csv".parse::<Format>().unwrap(), Format::Csv);
        assert!("lcov".parse::<Format>().is_err());
    }
}
