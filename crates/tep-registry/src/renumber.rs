//! Renumbering
//!
//! A document is read strictly; number issues are tolerated since fixing
//! them is the point, anything else aborts. The renumbered copy is written
//! next to the collection under `NNNN-<name without old prefix>`. The
//! source file stays where it is; removing it is left to the caller so the
//! add and the remove show up as separate changes.

use crate::error::{RegistryError, RegistryResult};
use crate::write::{write_atomic, Overwrite};
use std::path::{Path, PathBuf};
use tep_document::{
    BodyMode, Document, DocumentParser, Issue, ParseMode, TepNumber, MAX_NUMBER,
};

/// Result of a renumbering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenumberOutcome {
    /// File that was read, still on disk
    pub old_path: PathBuf,
    /// File that was written
    pub new_path: PathBuf,
    /// Number before
    pub old_number: TepNumber,
    /// Number after
    pub new_number: TepNumber,
}

/// Document accepted for renumbering
#[derive(Debug, Clone)]
pub struct RenumberSource {
    path: PathBuf,
    document: Document,
    tolerated: Vec<Issue>,
}

impl RenumberSource {
    /// Read and strictly parse the source document
    ///
    /// Fails with [`RegistryError::Validation`] unless every issue found is
    /// a number issue.
    pub fn read(path: &Path, parser: &DocumentParser) -> RegistryResult<Self> {
        let link = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| RegistryError::InvalidRequest(format!("{} is not a file", path.display())))?;
        let text = std::fs::read_to_string(path).map_err(|e| RegistryError::io_error(path, e))?;

        let (document, tolerated) =
            match parser.parse(&link, &text, ParseMode::Strict, BodyMode::Capture) {
                Ok(parsed) => (parsed.document, Vec::new()),
                Err(errors) if errors.only_number_issues() => {
                    for issue in errors.issues() {
                        tracing::warn!(%issue, "tolerated while renumbering");
                    }
                    let parsed = parser.parse_str(&link, &text, BodyMode::Capture);
                    (parsed.document, errors.into_issues())
                }
                Err(errors) => return Err(errors.into()),
            };

        Ok(Self {
            path: path.to_path_buf(),
            document,
            tolerated,
        })
    }

    /// Path that was read
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Document as read
    #[inline]
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Number issues that were let through
    #[inline]
    #[must_use]
    pub fn tolerated(&self) -> &[Issue] {
        &self.tolerated
    }

    /// Filename the document gets under `number`
    #[must_use]
    pub fn target_name(&self, parser: &DocumentParser, number: u32) -> String {
        format!(
            "{number:04}-{}",
            parser.patterns().strip_number_prefix(self.document.link())
        )
    }

    /// Write the renumbered copy into `folder`
    pub fn write(
        &self,
        folder: &Path,
        parser: &DocumentParser,
        number: u32,
    ) -> RegistryResult<RenumberOutcome> {
        if number > MAX_NUMBER {
            return Err(RegistryError::NumberSpaceExhausted(number));
        }

        let new_number = TepNumber::from_value(number);
        let renumbered = self
            .document
            .renumbered(new_number.clone(), self.target_name(parser, number));
        let text = renumbered
            .render(parser.patterns(), parser.codec())
            .ok_or_else(|| RegistryError::InvalidRequest("document body was not read".to_string()))?;

        let new_path = folder.join(renumbered.link());
        write_atomic(&new_path, &text, Overwrite::Refuse)?;
        tracing::info!(
            old = %self.path.display(),
            new = %new_path.display(),
            number = %new_number,
            "renumbered document"
        );

        Ok(RenumberOutcome {
            old_path: self.path.clone(),
            new_path,
            old_number: self.document.number().clone(),
            new_number,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const HEADER: &str =
        "---\ntitle: Foo\nauthors:\n- @a\ncreation-date: 2021-01-01\nstatus: proposed\n---\n";

    fn write(dir: &Path, name: &str, text: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn valid_document_is_copied_with_new_number() {
        let dir = tempfile::tempdir().unwrap();
        let text = format!("{HEADER}\n# TEP-0005: Foo\n\nSome *prose*.\n\n## Design\n");
        let path = write(dir.path(), "0005-foo.md", &text);
        let parser = DocumentParser::default();

        let source = RenumberSource::read(&path, &parser).unwrap();
        assert!(source.tolerated().is_empty());
        let outcome = source.write(dir.path(), &parser, 21).unwrap();

        assert_eq!(outcome.new_path, dir.path().join("0021-foo.md"));
        assert_eq!(outcome.old_number.as_str(), "TEP-0005");
        assert_eq!(outcome.new_number.as_str(), "TEP-0021");
        assert!(path.exists());

        let written = std::fs::read_to_string(&outcome.new_path).unwrap();
        let parsed = parser.parse_str("0021-foo.md", &written, BodyMode::Capture);
        assert!(parsed.is_valid(), "{:?}", parsed.issues);
        assert_eq!(parsed.document.body(), source.document().body());
    }

    #[test]
    fn number_issues_alone_are_tolerated() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "XXXX-foo.md", &format!("{HEADER}\n# TEP-0005: Foo\n"));
        let parser = DocumentParser::default();

        let source = RenumberSource::read(&path, &parser).unwrap();
        assert_eq!(source.tolerated().len(), 1);
        assert!(source.tolerated()[0].is_number_issue());
        assert_eq!(source.target_name(&parser, 8), "0008-foo.md");
    }

    #[test]
    fn any_other_issue_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let text = format!(
            "{}\n# TEP-0006: Foo\n",
            HEADER.replace("status: proposed", "status: proposed\nstatus: again")
        );
        let path = write(dir.path(), "0005-foo.md", &text);

        let err = RenumberSource::read(&path, &DocumentParser::default()).unwrap_err();
        let RegistryError::Validation(errors) = err else {
            panic!("expected validation error, got {err:?}");
        };
        assert_eq!(errors.len(), 2);
        assert!(!errors.only_number_issues());
    }

    #[test]
    fn existing_target_is_not_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "0005-foo.md", &format!("{HEADER}\n# TEP-0005: Foo\n"));
        write(dir.path(), "0009-foo.md", "taken");
        let parser = DocumentParser::default();

        let source = RenumberSource::read(&path, &parser).unwrap();
        let err = source.write(dir.path(), &parser, 9).unwrap_err();
        assert!(matches!(err, RegistryError::TargetExists(_)));
        assert_eq!(std::fs::read_to_string(dir.path().join("0009-foo.md")).unwrap(), "taken");
    }
}
