//! Parsed proposal document

use crate::header::{keys, HeaderCodec, Metadata};
use crate::number::TepNumber;
use crate::patterns::Patterns;

/// One proposal file
///
/// Built by the parser; the only mutation is [`Document::renumbered`],
/// which yields a new document and leaves this one untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    link: String,
    file_number: Option<u32>,
    metadata: Metadata,
    number: TepNumber,
    heading: Option<String>,
    body: Option<String>,
    title_at: Option<usize>,
    line_ending: &'static str,
}

impl Document {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        link: String,
        file_number: Option<u32>,
        metadata: Metadata,
        number: TepNumber,
        heading: Option<String>,
        body: Option<String>,
        title_at: Option<usize>,
        line_ending: &'static str,
    ) -> Self {
        Self {
            link,
            file_number,
            metadata,
            number,
            heading,
            body,
            title_at,
            line_ending,
        }
    }

    /// Filename, unique within a collection
    #[inline]
    #[must_use]
    pub fn link(&self) -> &str {
        &self.link
    }

    /// Number encoded in the filename prefix
    #[inline]
    #[must_use]
    pub fn file_number(&self) -> Option<u32> {
        self.file_number
    }

    /// Decoded metadata block
    #[inline]
    #[must_use]
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Declared number, or the placeholder when none was declared
    #[inline]
    #[must_use]
    pub fn number(&self) -> &TepNumber {
        &self.number
    }

    /// Heading text after `# TEP-dddd: `
    #[inline]
    #[must_use]
    pub fn heading(&self) -> Option<&str> {
        self.heading.as_deref()
    }

    /// Body text, `None` when parsed header-only
    #[inline]
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// Title from metadata, falling back to the heading
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.metadata.title().or(self.heading())
    }

    /// Copy carrying a new number and filename, body untouched
    ///
    /// A `number` key in the metadata block is rewritten as well.
    #[must_use]
    pub fn renumbered(&self, number: TepNumber, link: impl Into<String>) -> Self {
        let mut metadata = self.metadata.clone();
        if metadata.contains_key(keys::NUMBER) {
            metadata.insert(keys::NUMBER, number.as_str());
        }
        Self {
            link: link.into(),
            file_number: number.value(),
            metadata,
            heading: self
                .heading
                .clone()
                .or_else(|| self.metadata.title().map(str::to_string)),
            number,
            body: self.body.clone(),
            title_at: self.title_at,
            line_ending: self.line_ending,
        }
    }

    /// Line terminator of the source text, `\n` or `\r\n`
    #[inline]
    #[must_use]
    pub fn line_ending(&self) -> &'static str {
        self.line_ending
    }

    /// Full document text
    ///
    /// Body lines are written back byte for byte; the header block and the
    /// title line use the source's line ending. Returns `None` for
    /// documents parsed header-only, since their body was never captured.
    #[must_use]
    pub fn render(&self, patterns: &Patterns, codec: &HeaderCodec) -> Option<String> {
        let body = self.body.as_deref()?;
        let separator = patterns.separator();
        let eol = self.line_ending;

        let mut out = String::new();
        out.push_str(separator);
        out.push_str(eol);
        for line in codec.encode(&self.metadata) {
            out.push_str(&line);
            out.push_str(eol);
        }
        out.push_str(separator);
        out.push_str(eol);

        let title_line = format!(
            "# {}: {}{eol}",
            self.number,
            self.heading.as_deref().or(self.metadata.title()).unwrap_or_default()
        );
        let lines: Vec<&str> = body.split_inclusive('\n').collect();
        // Without a recorded title line, place it before the first prose line
        let at = self.title_at.unwrap_or_else(|| {
            lines
                .iter()
                .position(|line| !line.trim().is_empty())
                .unwrap_or(lines.len())
        });

        for (index, line) in lines.iter().enumerate() {
            if index == at {
                out.push_str(&title_line);
            }
            out.push_str(line);
        }
        if at >= lines.len() {
            if !out.ends_with('\n') {
                out.push_str(eol);
            }
            out.push_str(&title_line);
        }
        Some(out)
    }
}
