//! Metadata block codec
//!
//! The metadata block is a restricted key/value markup:
//!
//! ```text
//! title: Pipelines in pipelines
//! authors:
//!   - "@jerop"
//!   - "@bobcatfish"
//! creation-date: 2021-04-01
//! status: proposed
//! ```
//!
//! Values are scalars (plain, single- or double-quoted) or lists, written
//! either as `- item` lines under an empty key or inline as `[a, b]`.
//! Author entries carry a prefix marker (`@name`) that is stripped on
//! decode and restored on encode. Blank lines and `#` comment lines are
//! ignored.

use crate::error::MalformedHeader;
use indexmap::IndexMap;
use serde::Serialize;

/// Well-known metadata keys
pub mod keys {
    /// Proposal title
    pub const TITLE: &str = "title";
    /// Ordered author handles
    pub const AUTHORS: &str = "authors";
    /// Lifecycle status
    pub const STATUS: &str = "status";
    /// Creation date
    pub const CREATION_DATE: &str = "creation-date";
    /// Last update date
    pub const LAST_UPDATED: &str = "last-updated";
    /// Optional header copy of the proposal number
    pub const NUMBER: &str = "number";

    /// Keys in the order they are written back
    pub const CANONICAL_ORDER: [&str; 6] =
        [TITLE, AUTHORS, CREATION_DATE, LAST_UPDATED, STATUS, NUMBER];
}

/// A metadata value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum HeaderValue {
    /// Single string
    Scalar(String),
    /// Ordered list of strings
    List(Vec<String>),
}

impl HeaderValue {
    /// Scalar string, `None` for lists
    #[inline]
    #[must_use]
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Self::Scalar(value) => Some(value),
            Self::List(_) => None,
        }
    }

    /// List items; a scalar reads as a one element list
    #[must_use]
    pub fn as_list(&self) -> Vec<&str> {
        match self {
            Self::Scalar(value) if value.is_empty() => Vec::new(),
            Self::Scalar(value) => vec![value.as_str()],
            Self::List(items) => items.iter().map(String::as_str).collect(),
        }
    }

    /// Blank scalar, or list without any non-blank item
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Scalar(value) => value.trim().is_empty(),
            Self::List(items) => items.iter().all(|item| item.trim().is_empty()),
        }
    }
}

impl From<&str> for HeaderValue {
    fn from(value: &str) -> Self {
        Self::Scalar(value.to_string())
    }
}

impl From<String> for HeaderValue {
    fn from(value: String) -> Self {
        Self::Scalar(value)
    }
}

impl From<Vec<String>> for HeaderValue {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}

/// Decoded metadata block
///
/// Equality compares fields only and ignores key order. Keys that were
/// declared more than once keep their first value and are listed in
/// [`Metadata::repeated_keys`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct Metadata {
    #[serde(flatten)]
    fields: IndexMap<String, HeaderValue>,
    #[serde(skip)]
    repeated: Vec<String>,
}

impl PartialEq for Metadata {
    fn eq(&self, other: &Self) -> bool {
        self.fields == other.fields
    }
}

impl Eq for Metadata {}

impl Metadata {
    /// Create empty metadata
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Value for a key
    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&HeaderValue> {
        self.fields.get(key)
    }

    /// Scalar value for a key
    #[inline]
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(HeaderValue::as_scalar)
    }

    /// Whether a key is present
    #[inline]
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Insert or replace a value, keeping the key's position
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<HeaderValue>) -> Option<HeaderValue> {
        self.fields.insert(key.into(), value.into())
    }

    /// Remove a key
    pub fn remove(&mut self, key: &str) -> Option<HeaderValue> {
        self.fields.shift_remove(key)
    }

    /// Fields in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &HeaderValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of distinct keys
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// No keys at all
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Keys that appeared more than once while decoding
    #[inline]
    #[must_use]
    pub fn repeated_keys(&self) -> &[String] {
        &self.repeated
    }

    /// Title
    #[inline]
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.get_str(keys::TITLE)
    }

    /// Author handles, without prefix marker
    #[must_use]
    pub fn authors(&self) -> Vec<&str> {
        self.get(keys::AUTHORS)
            .map(HeaderValue::as_list)
            .unwrap_or_default()
    }

    /// Status
    #[inline]
    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.get_str(keys::STATUS)
    }

    /// Creation date
    #[inline]
    #[must_use]
    pub fn creation_date(&self) -> Option<&str> {
        self.get_str(keys::CREATION_DATE)
    }

    /// Last update date
    #[inline]
    #[must_use]
    pub fn last_updated(&self) -> Option<&str> {
        self.get_str(keys::LAST_UPDATED)
    }

    fn record(&mut self, key: String, value: HeaderValue) {
        if self.fields.contains_key(&key) {
            self.repeated.push(key);
        } else {
            self.fields.insert(key, value);
        }
    }
}

/// Encoder and decoder for the metadata block
#[derive(Debug, Clone)]
pub struct HeaderCodec {
    author_prefix: String,
}

impl Default for HeaderCodec {
    fn default() -> Self {
        Self::new("@")
    }
}

/// Key whose list items are still being read
struct OpenList {
    key: String,
    items: Vec<String>,
}

impl OpenList {
    /// An empty key with no items reads as a blank scalar, except for authors
    fn close(self, metadata: &mut Metadata) {
        let value = if self.items.is_empty() && self.key != keys::AUTHORS {
            HeaderValue::Scalar(String::new())
        } else {
            HeaderValue::List(self.items)
        };
        metadata.record(self.key, value);
    }
}

impl HeaderCodec {
    /// Create codec with the given author prefix marker
    #[inline]
    #[must_use]
    pub fn new(author_prefix: impl Into<String>) -> Self {
        Self {
            author_prefix: author_prefix.into(),
        }
    }

    /// Decode the lines strictly between the two separators
    pub fn decode<I, S>(&self, lines: I) -> Result<Metadata, MalformedHeader>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut metadata = Metadata::new();
        let mut open: Option<OpenList> = None;

        for (index, raw) in lines.into_iter().enumerate() {
            let line_no = index + 1;
            let line = raw.as_ref().trim_end();
            let trimmed = line.trim_start();

            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            if let Some(item) = list_item(trimmed) {
                let Some(list) = open.as_mut() else {
                    return Err(MalformedHeader::OrphanListItem {
                        line: line_no,
                        content: line.to_string(),
                    });
                };
                let value = unquote(item, line_no)?;
                list.items.push(self.decode_item(&list.key, value));
                continue;
            }

            if line.starts_with(char::is_whitespace) {
                return Err(MalformedHeader::UnrecognizedLine {
                    line: line_no,
                    content: line.to_string(),
                });
            }

            let Some((key, rest)) = split_key(line) else {
                return Err(MalformedHeader::UnrecognizedLine {
                    line: line_no,
                    content: line.to_string(),
                });
            };

            if let Some(list) = open.take() {
                list.close(&mut metadata);
            }

            if rest.is_empty() {
                open = Some(OpenList {
                    key: key.to_string(),
                    items: Vec::new(),
                });
                continue;
            }

            let value = if let Some(inner) = rest.strip_prefix('[').and_then(|r| r.strip_suffix(']')) {
                let items = split_flow(inner)
                    .into_iter()
                    .map(|item| unquote(item, line_no).map(|v| self.decode_item(key, v)))
                    .collect::<Result<Vec<_>, _>>()?;
                HeaderValue::List(items)
            } else {
                let value = unquote(rest, line_no)?;
                if key == keys::AUTHORS {
                    HeaderValue::List(vec![self.decode_item(key, value)])
                } else {
                    HeaderValue::Scalar(value)
                }
            };
            metadata.record(key.to_string(), value);
        }

        if let Some(list) = open.take() {
            list.close(&mut metadata);
        }

        Ok(metadata)
    }

    /// Encode metadata as header lines, well-known keys first
    #[must_use]
    pub fn encode(&self, metadata: &Metadata) -> Vec<String> {
        let mut lines = Vec::new();
        let known = keys::CANONICAL_ORDER
            .iter()
            .filter_map(|key| metadata.get(key).map(|value| (*key, value)));
        let others = metadata
            .iter()
            .filter(|(key, _)| !keys::CANONICAL_ORDER.contains(key));

        for (key, value) in known.chain(others) {
            match value {
                HeaderValue::Scalar(text) => lines.push(format!("{key}: {}", quote(text))),
                HeaderValue::List(items) if items.is_empty() => lines.push(format!("{key}: []")),
                HeaderValue::List(items) => {
                    lines.push(format!("{key}:"));
                    for item in items {
                        let item = self.encode_item(key, item);
                        lines.push(format!("  - {}", quote(&item)));
                    }
                }
            }
        }
        lines
    }

    fn decode_item(&self, key: &str, value: String) -> String {
        if key == keys::AUTHORS && !self.author_prefix.is_empty() {
            if let Some(stripped) = value.strip_prefix(self.author_prefix.as_str()) {
                return stripped.to_string();
            }
        }
        value
    }

    fn encode_item(&self, key: &str, value: &str) -> String {
        if key == keys::AUTHORS {
            format!("{}{value}", self.author_prefix)
        } else {
            value.to_string()
        }
    }
}

fn list_item(trimmed: &str) -> Option<&str> {
    if trimmed == "-" {
        return Some("");
    }
    trimmed.strip_prefix("- ").map(str::trim)
}

fn split_key(line: &str) -> Option<(&str, &str)> {
    let (key, rest) = line.split_once(':')?;
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if !valid {
        return None;
    }
    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some((key, rest.trim()))
}

/// Split a flow list body on commas outside quotes
fn split_flow(inner: &str) -> Vec<&str> {
    let mut items = Vec::new();
    let mut quote: Option<char> = None;
    let mut start = 0;
    for (i, c) in inner.char_indices() {
        match (quote, c) {
            (None, '"' | '\'') => quote = Some(c),
            (Some(q), c) if c == q => quote = None,
            (None, ',') => {
                items.push(inner[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    let last = inner[start..].trim();
    if !last.is_empty() || !items.is_empty() {
        items.push(last);
    }
    items
}

fn unquote(raw: &str, line: usize) -> Result<String, MalformedHeader> {
    let unterminated = || MalformedHeader::UnterminatedQuote {
        line,
        content: raw.to_string(),
    };

    if let Some(body) = raw.strip_prefix('"') {
        let body = body.strip_suffix('"').ok_or_else(unterminated)?;
        let mut out = String::with_capacity(body.len());
        let mut chars = body.chars();
        while let Some(c) = chars.next() {
            if c != '\\' {
                out.push(c);
                continue;
            }
            match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some(other) => out.push(other),
                None => return Err(unterminated()),
            }
        }
        return Ok(out);
    }

    if let Some(body) = raw.strip_prefix('\'') {
        let body = body.strip_suffix('\'').ok_or_else(unterminated)?;
        return Ok(body.replace("''", "'"));
    }

    // plain scalar: ` #` starts a trailing comment
    let plain = match raw.find(" #") {
        Some(at) => &raw[..at],
        None => raw,
    };
    Ok(plain.trim_end().to_string())
}

fn needs_quotes(value: &str) -> bool {
    const INDICATORS: &[char] = &[
        '-', '?', ':', ',', '[', ']', '{', '}', '#', '&', '*', '!', '|', '>', '\'', '"', '%', '@', '`',
    ];
    value.is_empty()
        || value.starts_with(INDICATORS)
        || value.starts_with(char::is_whitespace)
        || value.ends_with(char::is_whitespace)
        || value.contains(": ")
        || value.contains(" #")
        || value.contains(['\n', '\t', '\\'])
}

fn quote(value: &str) -> String {
    if !needs_quotes(value) {
        return value.to_string();
    }
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn decode(text: &str) -> Result<Metadata, MalformedHeader> {
        HeaderCodec::default().decode(text.lines())
    }

    #[test]
    fn decode_reads_scalars_and_author_list() {
        let metadata = decode(
            "title: Pipelines in pipelines\nauthors:\n  - \"@jerop\"\n  - @bobcatfish\ncreation-date: 2021-04-01\nstatus: proposed\n",
        )
        .unwrap();

        assert_eq!(metadata.title(), Some("Pipelines in pipelines"));
        assert_eq!(metadata.authors(), vec!["jerop", "bobcatfish"]);
        assert_eq!(metadata.creation_date(), Some("2021-04-01"));
        assert_eq!(metadata.status(), Some("proposed"));
        assert!(metadata.repeated_keys().is_empty());
    }

    #[test]
    fn decode_accepts_flow_and_inline_authors() {
        let flow = decode("authors: [\"@a\", '@b']").unwrap();
        assert_eq!(flow.authors(), vec!["a", "b"]);

        let inline = decode("authors: \"@solo\"").unwrap();
        assert_eq!(inline.authors(), vec!["solo"]);
    }

    #[test]
    fn decode_keeps_first_value_of_repeated_key() {
        let metadata = decode("status: proposed\nstatus: implemented").unwrap();
        assert_eq!(metadata.status(), Some("proposed"));
        assert_eq!(metadata.repeated_keys(), &["status".to_string()]);
    }

    #[test]
    fn decode_ignores_blank_and_comment_lines() {
        let metadata = decode("# comment\n\ntitle: X # trailing\n").unwrap();
        assert_eq!(metadata.title(), Some("X"));
    }

    #[test]
    fn decode_rejects_orphan_list_item() {
        let err = decode("- @a\ntitle: X").unwrap_err();
        assert!(matches!(err, MalformedHeader::OrphanListItem { line: 1, .. }));
    }

    #[test]
    fn decode_rejects_unrecognized_line() {
        let err = decode("title: X\nthis is prose").unwrap_err();
        assert!(matches!(err, MalformedHeader::UnrecognizedLine { line: 2, .. }));

        let err = decode("title: X\n  continuation").unwrap_err();
        assert!(matches!(err, MalformedHeader::UnrecognizedLine { line: 2, .. }));
    }

    #[test]
    fn decode_rejects_unterminated_quote() {
        let err = decode("title: \"open").unwrap_err();
        assert!(matches!(err, MalformedHeader::UnterminatedQuote { line: 1, .. }));
    }

    #[test]
    fn decode_empty_key_without_items_is_blank_scalar() {
        let metadata = decode("status:").unwrap();
        assert_eq!(metadata.get("status"), Some(&HeaderValue::Scalar(String::new())));

        let authors = decode("authors:").unwrap();
        assert_eq!(authors.get("authors"), Some(&HeaderValue::List(Vec::new())));
    }

    #[test]
    fn encode_writes_canonical_order_and_prefixed_authors() {
        let mut metadata = Metadata::new();
        metadata.insert("status", "proposed");
        metadata.insert("custom", "kept");
        metadata.insert("authors", vec!["a".to_string(), "b".to_string()]);
        metadata.insert("title", "Title: with colon");

        let lines = HeaderCodec::default().encode(&metadata);
        assert_eq!(
            lines,
            vec![
                "title: \"Title: with colon\"",
                "authors:",
                "  - \"@a\"",
                "  - \"@b\"",
                "status: proposed",
                "custom: kept",
            ]
        );
    }

    #[test]
    fn encode_then_decode_preserves_fields() {
        let codec = HeaderCodec::default();
        let original = decode(
            "title: \"Quoted \\\"inner\\\" text\"\nauthors:\n  - \"@x\"\nextra: '#hash'\nempty: \"\"\n",
        )
        .unwrap();

        let again = codec.decode(codec.encode(&original)).unwrap();
        assert_eq!(again, original);
        assert_eq!(again.get_str("extra"), Some("#hash"));
    }

    #[test]
    fn handle_starting_with_prefix_survives_round_trip() {
        let codec = HeaderCodec::default();
        let original = decode("authors:\n  - \"@@x\"\n").unwrap();
        assert_eq!(original.authors(), vec!["@x"]);

        let lines = codec.encode(&original);
        assert_eq!(lines, vec!["authors:", "  - \"@@x\""]);
        assert_eq!(codec.decode(lines).unwrap(), original);
    }

    #[test]
    fn metadata_equality_ignores_key_order() {
        let a = decode("title: X\nstatus: proposed").unwrap();
        let b = decode("status: proposed\ntitle: X").unwrap();
        assert_eq!(a, b);
    }
}
