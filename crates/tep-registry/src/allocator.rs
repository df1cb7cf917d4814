//! Next free number
//!
//! Numbers come from two disjoint sources: documents already in the folder
//! and titles of pending requests. The next number is always one above the
//! highest of their union; gaps are never reused, since a number missing
//! from the folder may be under review.

use crate::collection::Collection;
use crate::error::SourceUnavailable;
use crate::pending::PendingSource;
use std::collections::BTreeSet;
use tep_document::{Document, Patterns};

/// Allocator over compiled patterns
#[derive(Debug, Clone, Default)]
pub struct NumberAllocator {
    patterns: Patterns,
}

impl NumberAllocator {
    /// Create allocator
    #[must_use]
    pub fn new(patterns: Patterns) -> Self {
        Self { patterns }
    }

    /// Every number claimed by the documents and pending titles
    ///
    /// A document without a readable declared number contributes its
    /// filename number instead, if it has one.
    pub fn claimed<'a, D, T>(&self, documents: D, pending_titles: T) -> BTreeSet<u32>
    where
        D: IntoIterator<Item = &'a Document>,
        T: IntoIterator,
        T::Item: AsRef<str>,
    {
        let local = documents
            .into_iter()
            .filter_map(|document| document.number().value().or(document.file_number()));
        let pending = pending_titles
            .into_iter()
            .filter_map(|title| self.patterns.pending_number(title.as_ref()));
        local.chain(pending).collect()
    }

    /// `1` when nothing is claimed, otherwise the highest claim plus one
    pub fn next_number<'a, D, T>(&self, documents: D, pending_titles: T) -> u32
    where
        D: IntoIterator<Item = &'a Document>,
        T: IntoIterator,
        T::Item: AsRef<str>,
    {
        self.claimed(documents, pending_titles)
            .last()
            .map_or(1, |max| max + 1)
    }

    /// Next number for a collection, consulting the pending source
    ///
    /// Fails when the source cannot be read; an unreadable source is never
    /// taken for an empty one.
    pub fn allocate(
        &self,
        collection: &Collection,
        source: &dyn PendingSource,
    ) -> Result<u32, SourceUnavailable> {
        let titles = source.pending_titles()?;
        let number = self.next_number(collection.documents(), &titles);
        tracing::info!(
            number,
            documents = collection.len(),
            pending = titles.len(),
            source = source.name(),
            "allocated number"
        );
        Ok(number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pending::StaticPendingSource;
    use proptest::prelude::*;
    use tep_document::{BodyMode, DocumentParser};

    fn doc(number: u32) -> Document {
        let text = format!("---\ntitle: T\n---\n# TEP-{number:04}: T\n");
        DocumentParser::default()
            .parse_str(&format!("{number:04}-t.md"), &text, BodyMode::HeaderOnly)
            .document
    }

    struct Failing;

    impl PendingSource for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn pending_titles(&self) -> Result<Vec<String>, SourceUnavailable> {
            Err(SourceUnavailable::new("failing", "offline"))
        }
    }

    #[test]
    fn empty_sources_start_at_one() {
        let allocator = NumberAllocator::default();
        assert_eq!(allocator.next_number(std::iter::empty::<&Document>(), Vec::<String>::new()), 1);
    }

    #[test]
    fn union_of_local_and_pending() {
        let allocator = NumberAllocator::default();
        let docs = [doc(3), doc(7)];
        let titles = ["TEP-0005: five", "TEP 0009 nine"];
        assert_eq!(allocator.next_number(&docs, titles), 10);
    }

    #[test]
    fn unrelated_titles_are_ignored() {
        let allocator = NumberAllocator::default();
        let docs = [doc(4)];
        let titles = ["Fix typo in TEP-0099", "docs: update README"];
        assert_eq!(allocator.next_number(&docs, titles), 5);
    }

    #[test]
    fn placeholder_document_falls_back_to_filename() {
        let parsed = DocumentParser::default().parse_str(
            "0012-untitled.md",
            "---\ntitle: T\n---\nno title line\n",
            BodyMode::HeaderOnly,
        );
        assert!(parsed.document.number().is_placeholder());

        let allocator = NumberAllocator::default();
        assert_eq!(allocator.next_number([&parsed.document], Vec::<String>::new()), 13);
    }

    #[test]
    fn allocate_propagates_unavailable_source() {
        let collection = Collection::from_entries(".", Vec::new());
        let err = NumberAllocator::default()
            .allocate(&collection, &Failing)
            .unwrap_err();
        assert_eq!(err.source_name, "failing");
    }

    #[test]
    fn allocate_reads_pending_source() {
        let parser = DocumentParser::default();
        let entries = vec![parser.parse_str(
            "0002-a.md",
            "---\ntitle: A\n---\n# TEP-0002: A\n",
            BodyMode::HeaderOnly,
        )];
        let collection = Collection::from_entries(".", entries);
        let source = StaticPendingSource::new(["TEP-0020: pending"]);
        assert_eq!(
            NumberAllocator::default().allocate(&collection, &source).unwrap(),
            21
        );
    }

    proptest! {
        #[test]
        fn next_is_above_every_claim(
            local in prop::collection::vec(1u32..5000, 0..20),
            pending in prop::collection::vec(1u32..5000, 0..20),
        ) {
            let allocator = NumberAllocator::default();
            let docs: Vec<Document> = local.iter().copied().map(doc).collect();
            let titles: Vec<String> = pending.iter().map(|n| format!("TEP-{n:04}: p")).collect();

            let next = allocator.next_number(&docs, &titles);
            let expected = local.iter().chain(&pending).max().map_or(1, |max| max + 1);
            prop_assert_eq!(next, expected);
        }
    }
}
