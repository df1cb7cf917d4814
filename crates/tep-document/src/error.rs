//! Error types for document parsing
//!
//! Provides:
//! - `MalformedHeader` for metadata blocks that cannot be decoded
//! - `Issue` for collectible defects found while reading one document
//! - `ValidationErrors` as the aggregate surfaced to callers
//! - `PatternError` for invalid pattern configuration

use std::fmt;

/// Header decode failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MalformedHeader {
    /// Line is neither `key: value` nor a list item
    #[error("line {line}: expected `key: value` or `- item`, found {content:?}")]
    UnrecognizedLine { line: usize, content: String },

    /// List item with no key above it to own it
    #[error("line {line}: list item {content:?} does not belong to any key")]
    OrphanListItem { line: usize, content: String },

    /// Quoted value without its closing quote
    #[error("line {line}: unterminated quoted value {content:?}")]
    UnterminatedQuote { line: usize, content: String },

    /// Opening separator seen, closing separator never reached
    #[error("metadata block is never closed")]
    Unclosed,

    /// No separator line at all
    #[error("no metadata block found")]
    Missing,
}

/// Kind of a collected issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IssueKind {
    /// Header block could not be decoded
    MalformedHeader,
    /// Number missing, mismatched, declared twice or duplicated
    InvalidTepNumber,
    /// Any other structural defect
    InvalidTep,
}

/// A defect found in one document
///
/// Issues are collected rather than raised; the caller decides whether
/// they are fatal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Issue {
    /// Metadata block cannot be decoded
    #[error("malformed header in {link}: {reason}")]
    MalformedHeader {
        /// Document filename
        link: String,
        /// Decode failure
        reason: MalformedHeader,
    },

    /// Number related defect
    #[error("{message}")]
    InvalidTepNumber {
        /// Document filename
        link: String,
        /// Human readable description
        message: String,
    },

    /// Other structural defect
    #[error("{message}")]
    InvalidTep {
        /// Document filename
        link: String,
        /// Human readable description
        message: String,
    },
}

impl Issue {
    /// Create malformed header issue
    pub fn malformed(link: impl Into<String>, reason: MalformedHeader) -> Self {
        Self::MalformedHeader {
            link: link.into(),
            reason,
        }
    }

    /// Create number issue
    pub fn number(link: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidTepNumber {
            link: link.into(),
            message: message.into(),
        }
    }

    /// Create general structural issue
    pub fn invalid(link: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidTep {
            link: link.into(),
            message: message.into(),
        }
    }

    /// Kind of this issue
    #[inline]
    #[must_use]
    pub fn kind(&self) -> IssueKind {
        match self {
            Self::MalformedHeader { .. } => IssueKind::MalformedHeader,
            Self::InvalidTepNumber { .. } => IssueKind::InvalidTepNumber,
            Self::InvalidTep { .. } => IssueKind::InvalidTep,
        }
    }

    /// Filename of the document the issue was found in
    #[inline]
    #[must_use]
    pub fn link(&self) -> &str {
        match self {
            Self::MalformedHeader { link, .. }
            | Self::InvalidTepNumber { link, .. }
            | Self::InvalidTep { link, .. } => link,
        }
    }

    /// Check if issue only concerns numbering
    #[inline]
    #[must_use]
    pub fn is_number_issue(&self) -> bool {
        self.kind() == IssueKind::InvalidTepNumber
    }
}

/// Aggregate of every issue found, never just the first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    issues: Vec<Issue>,
}

impl ValidationErrors {
    /// Create from collected issues
    #[inline]
    #[must_use]
    pub fn new(issues: Vec<Issue>) -> Self {
        Self { issues }
    }

    /// Add one issue
    #[inline]
    pub fn push(&mut self, issue: Issue) {
        self.issues.push(issue);
    }

    /// Add many issues
    #[inline]
    pub fn extend(&mut self, issues: impl IntoIterator<Item = Issue>) {
        self.issues.extend(issues);
    }

    /// Collected issues in discovery order
    #[inline]
    #[must_use]
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// Consume into issues
    #[inline]
    #[must_use]
    pub fn into_issues(self) -> Vec<Issue> {
        self.issues
    }

    /// Number of issues
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.issues.len()
    }

    /// An empty aggregate means fully valid
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// True when there is at least one issue and all are number issues
    #[must_use]
    pub fn only_number_issues(&self) -> bool {
        !self.issues.is_empty() && self.issues.iter().all(Issue::is_number_issue)
    }

    /// `Ok(())` when empty, `Err(self)` otherwise
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for issue in &self.issues {
            if !first {
                writeln!(f)?;
            }
            write!(f, "{issue}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl From<Vec<Issue>> for ValidationErrors {
    fn from(issues: Vec<Issue>) -> Self {
        Self::new(issues)
    }
}

impl IntoIterator for ValidationErrors {
    type Item = Issue;
    type IntoIter = std::vec::IntoIter<Issue>;

    fn into_iter(self) -> Self::IntoIter {
        self.issues.into_iter()
    }
}

/// Invalid pattern configuration
#[derive(Debug, thiserror::Error)]
pub enum PatternError {
    /// Pattern does not compile
    #[error("invalid {name} pattern: {source}")]
    Regex {
        name: &'static str,
        #[source]
        source: regex::Error,
    },

    /// Pattern lacks the capture groups its caller reads
    #[error("{name} pattern needs at least {expected} capture group(s)")]
    MissingGroup { name: &'static str, expected: usize },

    /// Separator marker is blank
    #[error("separator must not be blank")]
    EmptySeparator,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_display_one_per_line() {
        let errors = ValidationErrors::new(vec![
            Issue::number("0001-a.md", "first"),
            Issue::invalid("0002-b.md", "second"),
        ]);
        assert_eq!(errors.to_string(), "first\nsecond");
    }

    #[test]
    fn only_number_issues_requires_at_least_one() {
        assert!(!ValidationErrors::default().only_number_issues());

        let numbers = ValidationErrors::new(vec![Issue::number("a.md", "x")]);
        assert!(numbers.only_number_issues());

        let mixed = ValidationErrors::new(vec![
            Issue::number("a.md", "x"),
            Issue::malformed("a.md", MalformedHeader::Unclosed),
        ]);
        assert!(!mixed.only_number_issues());
    }

    #[test]
    fn malformed_issue_display_names_document() {
        let issue = Issue::malformed("0003-c.md", MalformedHeader::Missing);
        assert_eq!(
            issue.to_string(),
            "malformed header in 0003-c.md: no metadata block found"
        );
        assert_eq!(issue.link(), "0003-c.md");
    }
}
