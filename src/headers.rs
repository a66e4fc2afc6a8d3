//! Raw header block codec
//!
//! Requests and responses carry their headers as a single newline separated
//! block (`Name: value` per line). These helpers convert between that block and
//! an ordered list of name/value pairs.

use once_cell::sync::Lazy;
use regex::Regex;

/// Matches a non-empty `authorization:` line anywhere in a header block
static AUTHORIZATION_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?imR)^authorization:\s?[^\r\n]+$").expect("valid authorization regex")
});

/// A single header line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderEntry {
    pub name: String,
    pub value: String,
}

impl HeaderEntry {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Parse a header line into (name, value)
pub fn parse_header_line(line: &str) -> Option<(&str, &str)> {
    let colon_pos = line.find(':')?;
    let name = line[..colon_pos].trim();
    if name.is_empty() {
        return None;
    }
    let value = line[colon_pos + 1..].trim();
    Some((name, value))
}

/// Parse a header block into an ordered list of entries.
///
/// Blank lines and lines without a colon are dropped.
pub fn parse_headers(block: &str) -> Vec<HeaderEntry> {
    block
        .lines()
        .filter_map(parse_header_line)
        .map(|(name, value)| HeaderEntry::new(name, value))
        .collect()
}

/// Serialize entries back into a header block
pub fn serialize_headers(headers: &[HeaderEntry]) -> String {
    headers
        .iter()
        .map(|h| format!("{}: {}", h.name, h.value))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Replace the first header named `name` (case-insensitive) or append a new one.
pub fn replace_or_insert(headers: &mut Vec<HeaderEntry>, name: &str, value: &str) {
    match headers.iter_mut().find(|h| h.name.eq_ignore_ascii_case(name)) {
        Some(existing) => existing.value = value.to_string(),
        None => headers.push(HeaderEntry::new(name, value)),
    }
}

/// Set a header on a raw header block, returning the new block
pub fn set_header(block: &str, name: &str, value: &str) -> String {
    let mut headers = parse_headers(block);
    replace_or_insert(&mut headers, name, value);
    serialize_headers(&headers)
}

/// Find the value of the first header named `name` (case-insensitive)
pub fn header_value<'a>(headers: &'a [HeaderEntry], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|h| h.name.eq_ignore_ascii_case(name))
        .map(|h| h.value.as_str())
}

/// Whether the block already carries a non-empty `Authorization` header line
pub fn has_authorization(block: &str) -> bool {
    AUTHORIZATION_LINE.is_match(block)
}
