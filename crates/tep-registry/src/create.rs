//! New proposal documents
//!
//! A new document gets the next free number, a filename derived from its
//! title, today's dates and the standard section skeleton. The text is
//! parsed back strictly before it is written.

use crate::error::{RegistryError, RegistryResult};
use crate::write::{write_atomic, Overwrite};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tep_document::{
    keys, BodyMode, Document, DocumentParser, Metadata, ParseMode, TepNumber, MAX_NUMBER,
};

/// Status of every new proposal
pub const INITIAL_STATUS: &str = "proposed";

/// Section headings of a new proposal, in order
pub const SECTIONS: [&str; 13] = [
    "Summary",
    "Motivation",
    "Goals",
    "Non-Goals",
    "Requirements",
    "Proposal",
    "Design Details",
    "Test Plan",
    "Design Evaluation",
    "Drawbacks",
    "Alternatives",
    "Implementation Plan",
    "References",
];

/// Request for a new proposal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTep {
    /// Title in a few words
    pub title: String,
    /// Author handles, without prefix
    pub authors: Vec<String>,
    /// Creation date
    pub date: NaiveDate,
}

impl NewTep {
    /// Request dated today
    #[must_use]
    pub fn new(title: impl Into<String>, authors: Vec<String>) -> Self {
        Self {
            title: title.into(),
            authors,
            date: chrono::Local::now().date_naive(),
        }
    }

    /// With creation date
    #[inline]
    #[must_use]
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    /// Filename slug: alphanumerics and spaces kept, spaces become dashes
    #[must_use]
    pub fn slug(&self) -> String {
        self.title
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == ' ')
            .map(|c| if c == ' ' { '-' } else { c })
            .collect()
    }

    /// Filename for the given number
    #[must_use]
    pub fn filename(&self, number: u32) -> String {
        format!("{number:04}-{}.md", self.slug())
    }

    /// Author handles with any prefix removed, blanks dropped
    fn author_handles(&self, prefix: &str) -> Vec<String> {
        self.authors
            .iter()
            .map(|author| author.trim().trim_start_matches(prefix).to_string())
            .filter(|author| !author.is_empty())
            .collect()
    }

    fn check(&self, prefix: &str) -> RegistryResult<()> {
        if self.title.trim().is_empty() {
            return Err(RegistryError::InvalidRequest("title is required".to_string()));
        }
        if self.author_handles(prefix).is_empty() {
            return Err(RegistryError::InvalidRequest(
                "at least one author is required".to_string(),
            ));
        }
        Ok(())
    }

    /// Full document text for the given number
    #[must_use]
    pub fn render(&self, number: u32, parser: &DocumentParser) -> String {
        let date = self.date.format("%Y-%m-%d").to_string();
        let authors = self.author_handles(parser.patterns().author_prefix());

        let mut metadata = Metadata::new();
        metadata.insert(keys::TITLE, self.title.trim());
        metadata.insert(keys::AUTHORS, authors);
        metadata.insert(keys::CREATION_DATE, date.clone());
        metadata.insert(keys::LAST_UPDATED, date);
        metadata.insert(keys::STATUS, INITIAL_STATUS);

        let separator = parser.patterns().separator();
        let mut out = String::new();
        out.push_str(separator);
        out.push('\n');
        for line in parser.codec().encode(&metadata) {
            out.push_str(&line);
            out.push('\n');
        }
        out.push_str(separator);
        out.push_str("\n\n");
        out.push_str(&format!(
            "# {}: {}\n",
            TepNumber::from_value(number),
            self.title.trim()
        ));
        for section in SECTIONS {
            out.push_str(&format!("\n## {section}\n\n<!-- {} -->\n", section.to_lowercase()));
        }
        out
    }
}

/// Write a new document numbered `number` into `folder`
///
/// The rendered text must parse strictly under its own filename; the file
/// is never written otherwise, and an existing file is never replaced.
pub fn create_document(
    folder: &Path,
    parser: &DocumentParser,
    request: &NewTep,
    number: u32,
) -> RegistryResult<(PathBuf, Document)> {
    request.check(parser.patterns().author_prefix())?;
    if number > MAX_NUMBER {
        return Err(RegistryError::NumberSpaceExhausted(number));
    }

    let filename = request.filename(number);
    let text = request.render(number, parser);
    let document = parser
        .parse(&filename, &text, ParseMode::Strict, BodyMode::Capture)?
        .document;

    let path = folder.join(&filename);
    write_atomic(&path, &text, Overwrite::Refuse)?;
    tracing::info!(path = %path.display(), number = %document.number(), "created document");
    Ok((path, document))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn request() -> NewTep {
        NewTep::new("Pipelines in Pipelines!", vec!["@alice".into(), "bob".into()])
            .with_date(NaiveDate::from_ymd_opt(2022, 5, 17).unwrap())
    }

    #[test]
    fn slug_keeps_alphanumerics_and_dashes_spaces() {
        assert_eq!(request().slug(), "Pipelines-in-Pipelines");
        assert_eq!(request().filename(7), "0007-Pipelines-in-Pipelines.md");
    }

    #[test]
    fn rendered_document_parses_strictly() {
        let parser = DocumentParser::default();
        let text = request().render(12, &parser);
        let document = parser
            .parse("0012-Pipelines-in-Pipelines.md", &text, ParseMode::Strict, BodyMode::Capture)
            .unwrap()
            .document;

        assert_eq!(document.number().as_str(), "TEP-0012");
        assert_eq!(document.metadata().authors(), vec!["alice", "bob"]);
        assert_eq!(document.metadata().status(), Some("proposed"));
        assert_eq!(document.metadata().creation_date(), Some("2022-05-17"));
        assert_eq!(document.metadata().last_updated(), Some("2022-05-17"));
        assert!(document.body().unwrap().contains("## Implementation Plan"));
    }

    #[test]
    fn create_writes_file_once() {
        let dir = tempfile::tempdir().unwrap();
        let parser = DocumentParser::default();

        let (path, _) = create_document(dir.path(), &parser, &request(), 3).unwrap();
        assert_eq!(path, dir.path().join("0003-Pipelines-in-Pipelines.md"));
        assert!(path.is_file());

        let err = create_document(dir.path(), &parser, &request(), 3).unwrap_err();
        assert!(matches!(err, RegistryError::TargetExists(_)));
    }

    #[test]
    fn number_beyond_four_digits_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let err = create_document(dir.path(), &DocumentParser::default(), &request(), 10_000)
            .unwrap_err();
        assert!(matches!(err, RegistryError::NumberSpaceExhausted(10_000)));
    }

    #[test]
    fn request_needs_title_and_author() {
        let dir = tempfile::tempdir().unwrap();
        let parser = DocumentParser::default();

        let untitled = NewTep::new("  ", vec!["a".into()]);
        assert!(matches!(
            create_document(dir.path(), &parser, &untitled, 1),
            Err(RegistryError::InvalidRequest(_))
        ));

        let anonymous = NewTep::new("Title", vec![]);
        assert!(matches!(
            create_document(dir.path(), &parser, &anonymous, 1),
            Err(RegistryError::InvalidRequest(_))
        ));
    }
}
