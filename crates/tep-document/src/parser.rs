//! Line-oriented document parser
//!
//! A document is read as a stream of lines through three states:
//!
//! ```text
//! PreHeader --separator--> InHeader --separator--> Body
//! ```
//!
//! Header lines are handed to the [`HeaderCodec`] when the block closes.
//! In the body, the first title line (`# TEP-dddd: ...`) declares the
//! number; every other line is kept byte for byte, terminator included.
//! Defects are collected as
//! [`Issue`]s next to a best-effort [`Document`]; strictness is a caller
//! decision (see [`ParseMode`] and [`Parsed::into_strict`]).

use crate::document::Document;
use crate::error::{Issue, MalformedHeader, ValidationErrors};
use crate::header::{keys, HeaderCodec, Metadata};
use crate::number::TepNumber;
use crate::patterns::Patterns;
use std::io::Read;

/// How collected issues are surfaced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    /// Any issue aborts the parse with `ValidationErrors`
    Strict,
    /// Issues are returned beside the document, never raised
    #[default]
    Permissive,
}

/// Whether body lines are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BodyMode {
    /// Keep every body line
    #[default]
    Capture,
    /// Only metadata and number are needed (index building)
    HeaderOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    PreHeader,
    InHeader,
    Body,
}

/// Best-effort document plus everything wrong with it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parsed {
    /// The document as far as it could be read
    pub document: Document,
    /// Issues in discovery order, empty for a valid document
    pub issues: Vec<Issue>,
}

impl Parsed {
    /// No issues were found
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    /// Document if valid, every issue otherwise
    pub fn into_strict(self) -> Result<Document, ValidationErrors> {
        if self.issues.is_empty() {
            Ok(self.document)
        } else {
            Err(ValidationErrors::new(self.issues))
        }
    }
}

/// Document parser
#[derive(Debug, Clone, Default)]
pub struct DocumentParser {
    patterns: Patterns,
    codec: HeaderCodec,
}

impl DocumentParser {
    /// Create parser over compiled patterns
    #[must_use]
    pub fn new(patterns: Patterns) -> Self {
        let codec = HeaderCodec::new(patterns.author_prefix());
        Self { patterns, codec }
    }

    /// Patterns in use
    #[inline]
    #[must_use]
    pub fn patterns(&self) -> &Patterns {
        &self.patterns
    }

    /// Header codec in use
    #[inline]
    #[must_use]
    pub fn codec(&self) -> &HeaderCodec {
        &self.codec
    }

    /// Parse text, surfacing issues according to `mode`
    ///
    /// In permissive mode this never returns `Err`.
    pub fn parse(
        &self,
        link: &str,
        text: &str,
        mode: ParseMode,
        body: BodyMode,
    ) -> Result<Parsed, ValidationErrors> {
        let parsed = self.parse_lines(link, text.split_inclusive('\n'), body);
        match mode {
            ParseMode::Strict if !parsed.is_valid() => Err(ValidationErrors::new(parsed.issues)),
            _ => Ok(parsed),
        }
    }

    /// Parse text permissively
    #[must_use]
    pub fn parse_str(&self, link: &str, text: &str, body: BodyMode) -> Parsed {
        self.parse_lines(link, text.split_inclusive('\n'), body)
    }

    /// Parse from a reader permissively
    pub fn parse_reader<R: Read>(
        &self,
        link: &str,
        mut reader: R,
        body: BodyMode,
    ) -> std::io::Result<Parsed> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Ok(self.parse_str(link, &text, body))
    }

    /// Parse a stream of lines permissively
    ///
    /// Lines are expected to keep their terminators (`\n` or `\r\n`); the
    /// body is the exact concatenation of the body lines.
    pub fn parse_lines<I, S>(&self, link: &str, lines: I, body_mode: BodyMode) -> Parsed
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut issues = Vec::new();

        let file_number = self.patterns.file_number(link);
        if file_number.is_none() {
            issues.push(Issue::number(
                link,
                format!(
                    "TEP filenames should match /{}/. Found: {link}",
                    self.patterns.filename_pattern()
                ),
            ));
        }

        let mut state = State::PreHeader;
        let mut header_lines: Vec<String> = Vec::new();
        let mut metadata = Metadata::new();
        let mut declared: Option<(TepNumber, String)> = None;
        let mut body = String::new();
        let mut body_lines = 0usize;
        let mut title_at = None;
        let mut line_ending = None;

        for raw in lines {
            let line = raw.as_ref();
            let content = line.trim_end_matches(['\n', '\r']);
            if line_ending.is_none() && line.ends_with('\n') {
                line_ending = Some(if line.ends_with("\r\n") { "\r\n" } else { "\n" });
            }
            match state {
                State::PreHeader => {
                    if self.patterns.is_separator(content) {
                        state = State::InHeader;
                    }
                }
                State::InHeader => {
                    if self.patterns.is_separator(content) {
                        metadata = self.decode_header(link, &header_lines, &mut issues);
                        state = State::Body;
                    } else {
                        header_lines.push(content.to_string());
                    }
                }
                State::Body => {
                    if let Some((number, heading)) = self.patterns.title_line(content) {
                        if let Some((first, _)) = &declared {
                            issues.push(Issue::number(
                                link,
                                format!("TEP number declared twice in {link}: {first} and {number}"),
                            ));
                        } else {
                            title_at = Some(body_lines);
                            declared = Some((number, heading));
                            continue;
                        }
                    }
                    if body_mode == BodyMode::Capture {
                        body.push_str(line);
                        body_lines += 1;
                    }
                }
            }
        }

        match state {
            State::PreHeader => {
                issues.push(Issue::malformed(link, MalformedHeader::Missing));
            }
            State::InHeader => {
                issues.push(Issue::malformed(link, MalformedHeader::Unclosed));
                metadata = self.decode_header(link, &header_lines, &mut issues);
            }
            State::Body => {}
        }

        let (number, heading) = match declared {
            Some((number, heading)) => (number, Some(heading)),
            None => {
                issues.push(Issue::number(
                    link,
                    format!("No TEP number title (# TEP-NNNN) in {link}"),
                ));
                (TepNumber::placeholder(), None)
            }
        };

        if let (Some(from_file), Some(declared_value)) = (file_number, number.value()) {
            if from_file != declared_value {
                issues.push(Issue::number(
                    link,
                    format!(
                        "TEP number {} from filename does not match TEP number {number} \
                         from title (# TEP-NNNN) in {link}",
                        TepNumber::from_value(from_file)
                    ),
                ));
            }
        }

        if let Some(header_number) = metadata.get_str(keys::NUMBER) {
            if !number.is_placeholder() && header_number != number.as_str() {
                issues.push(Issue::number(
                    link,
                    format!(
                        "TEP number {header_number} in header does not match TEP number \
                         {number} from title in {link}"
                    ),
                ));
            }
        }

        if metadata.last_updated().is_none() {
            if let Some(created) = metadata.creation_date().map(str::to_string) {
                metadata.insert(keys::LAST_UPDATED, created);
            }
        }

        let body = match body_mode {
            BodyMode::Capture => Some(body),
            BodyMode::HeaderOnly => None,
        };
        let title_at = title_at.filter(|_| body.is_some());

        tracing::debug!(link, issues = issues.len(), number = %number, "parsed document");

        Parsed {
            document: Document::new(
                link.to_string(),
                file_number,
                metadata,
                number,
                heading,
                body,
                title_at,
                line_ending.unwrap_or("\n"),
            ),
            issues,
        }
    }

    fn decode_header(&self, link: &str, lines: &[String], issues: &mut Vec<Issue>) -> Metadata {
        match self.codec.decode(lines) {
            Ok(metadata) => {
                for key in metadata.repeated_keys() {
                    issues.push(Issue::invalid(
                        link,
                        format!("{key} found more than once in {link}"),
                    ));
                }
                metadata
            }
            Err(reason) => {
                issues.push(Issue::malformed(link, reason));
                Metadata::new()
            }
        }
    }
}
