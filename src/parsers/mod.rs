pub mod csv;
pub mod jacoco;

use quick_xml::events::BytesStart;

use crate::detect::Format;
use crate::model::Coverage;

/// Every format parser implements this trait.
///
/// Parsing never fails: missing or malformed structure degrades to empty
/// collections and NaN metrics.
pub trait Parser {
    /// Format this parser handles.
    fn format(&self) -> Format;

    /// Parse the input bytes into our uniform coverage model.
    fn parse(&self, input: &[u8]) -> Coverage;
}

/// Look up an attribute by name and return its unescaped value.
pub(crate) fn get_attr(e: &BytesStart, name: &[u8]) -> Option<String> {
    e.try_get_attribute(name)
        .ok()
        .flatten()
        .and_then(|a| a.unescape_value().ok())
        .map(|v| v.into_owned())
}

/// Parse a missed/covered count. Surrounding whitespace is ignored and an
/// empty value counts as zero; anything else that is not a non-negative
/// integer is rejected.
pub(crate) fn parse_count(value: &str) -> Option<u64> {
    let value = value.trim();
    if value.is_empty() {
        Some(0)
    } else {
        value.parse().ok()
    }
}
