//! Pattern configuration
//!
//! Every regular expression and marker the parser, allocator and renamer
//! rely on lives here. A [`PatternConfig`] is plain data (it can be loaded
//! from a config file); [`Patterns`] is its compiled form, handed to each
//! component when it is built.

use crate::error::PatternError;
use crate::number::TepNumber;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Default title line: `# TEP-0042: Some title`
pub const DEFAULT_TITLE_LINE: &str = r"^# (TEP-[0-9]{4}): (.*)$";

/// Default filename: `0042-some-title.md`
pub const DEFAULT_FILENAME: &str = r"^([0-9]{4})-.*\.md$";

/// Default pending request title: `TEP-0042 ...` or `TEP 0042 ...`
pub const DEFAULT_PENDING_TITLE: &str = r"^TEP[ -]([0-9]{4})";

/// Default prefix stripped from a filename when it is renumbered
pub const DEFAULT_RENAME_PREFIX: &str = r"^(?:[0-9]{4}|XXXX|NNNN)-";

/// Uncompiled pattern settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PatternConfig {
    /// Line that opens and closes the metadata block
    pub separator: String,
    /// Title line; group 1 is the number, group 2 the heading text
    pub title_line: String,
    /// Filename; group 1 is the four digit number
    pub filename: String,
    /// Pending request title; group 1 is the four digit number
    pub pending_title: String,
    /// Numbering prefix removed from a filename before renumbering
    pub rename_prefix: String,
    /// Marker in front of each author handle
    pub author_prefix: String,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            separator: "---".to_string(),
            title_line: DEFAULT_TITLE_LINE.to_string(),
            filename: DEFAULT_FILENAME.to_string(),
            pending_title: DEFAULT_PENDING_TITLE.to_string(),
            rename_prefix: DEFAULT_RENAME_PREFIX.to_string(),
            author_prefix: "@".to_string(),
        }
    }
}

impl PatternConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With a different separator line
    #[inline]
    #[must_use]
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// With a different title line pattern
    #[inline]
    #[must_use]
    pub fn with_title_line(mut self, pattern: impl Into<String>) -> Self {
        self.title_line = pattern.into();
        self
    }

    /// With a different filename pattern
    #[inline]
    #[must_use]
    pub fn with_filename(mut self, pattern: impl Into<String>) -> Self {
        self.filename = pattern.into();
        self
    }

    /// With a different pending title pattern
    #[inline]
    #[must_use]
    pub fn with_pending_title(mut self, pattern: impl Into<String>) -> Self {
        self.pending_title = pattern.into();
        self
    }

    /// With a different author prefix
    #[inline]
    #[must_use]
    pub fn with_author_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.author_prefix = prefix.into();
        self
    }

    /// Compile every pattern
    ///
    /// Capturing patterns must expose the groups documented on each field.
    pub fn compile(&self) -> Result<Patterns, PatternError> {
        if self.separator.trim().is_empty() {
            return Err(PatternError::EmptySeparator);
        }

        Ok(Patterns {
            separator: self.separator.trim_end().to_string(),
            title_line: compile("title-line", &self.title_line, 2)?,
            filename: compile("filename", &self.filename, 1)?,
            pending_title: compile("pending-title", &self.pending_title, 1)?,
            rename_prefix: compile("rename-prefix", &self.rename_prefix, 0)?,
            author_prefix: self.author_prefix.clone(),
        })
    }
}

fn compile(name: &'static str, pattern: &str, groups: usize) -> Result<Regex, PatternError> {
    let regex = Regex::new(pattern).map_err(|source| PatternError::Regex { name, source })?;
    // captures_len counts the implicit whole-match group
    if regex.captures_len() <= groups {
        return Err(PatternError::MissingGroup {
            name,
            expected: groups,
        });
    }
    Ok(regex)
}

/// Compiled patterns shared by the parser, allocator and renamer
#[derive(Debug, Clone)]
pub struct Patterns {
    separator: String,
    title_line: Regex,
    filename: Regex,
    pending_title: Regex,
    rename_prefix: Regex,
    author_prefix: String,
}

impl Default for Patterns {
    fn default() -> Self {
        PatternConfig::default()
            .compile()
            .expect("built-in patterns are valid")
    }
}

impl Patterns {
    /// Separator marker line
    #[inline]
    #[must_use]
    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// Author handle prefix
    #[inline]
    #[must_use]
    pub fn author_prefix(&self) -> &str {
        &self.author_prefix
    }

    /// Whether a line (ignoring trailing whitespace) is the separator
    #[inline]
    #[must_use]
    pub fn is_separator(&self, line: &str) -> bool {
        line.trim_end() == self.separator
    }

    /// Number and heading text of a title line
    #[must_use]
    pub fn title_line(&self, line: &str) -> Option<(TepNumber, String)> {
        let caps = self.title_line.captures(line.trim_end())?;
        let number = caps.get(1)?.as_str();
        let heading = caps.get(2).map_or("", |m| m.as_str());
        Some((TepNumber::new(number), heading.to_string()))
    }

    /// Number encoded in a filename, `None` if the name does not match
    #[must_use]
    pub fn file_number(&self, filename: &str) -> Option<u32> {
        let caps = self.filename.captures(filename)?;
        caps.get(1)?.as_str().parse().ok()
    }

    /// Number claimed by a pending request title
    #[must_use]
    pub fn pending_number(&self, title: &str) -> Option<u32> {
        let caps = self.pending_title.captures(title)?;
        caps.get(1)?.as_str().parse().ok()
    }

    /// Filename with any numbering prefix removed
    #[must_use]
    pub fn strip_number_prefix<'a>(&self, filename: &'a str) -> &'a str {
        match self.rename_prefix.find(filename) {
            Some(m) if m.start() == 0 => &filename[m.end()..],
            _ => filename,
        }
    }

    /// Canonical filename pattern source, for diagnostics
    #[inline]
    #[must_use]
    pub fn filename_pattern(&self) -> &str {
        self.filename.as_str()
    }
}
