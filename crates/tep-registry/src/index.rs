//! Index records
//!
//! Folds a collection into the sorted records an external renderer turns
//! into the summary table. No text is produced here.

use crate::collection::Collection;
use serde::Serialize;
use tep_document::{Document, TepNumber};

/// One row of the index
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct IndexEntry {
    /// Filename
    pub link: String,
    /// Declared number, placeholder when missing
    pub number: TepNumber,
    /// Title from metadata or heading
    pub title: String,
    /// Lifecycle status
    pub status: String,
    /// Creation date as written
    pub creation_date: String,
    /// Last update, creation date when absent
    pub last_updated: String,
}

impl IndexEntry {
    /// Record for one document; missing fields become empty strings
    #[must_use]
    pub fn from_document(document: &Document) -> Self {
        let metadata = document.metadata();
        let field = |value: Option<&str>| value.unwrap_or_default().to_string();
        Self {
            link: document.link().to_string(),
            number: document.number().clone(),
            title: field(document.title()),
            status: field(metadata.status()),
            creation_date: field(metadata.creation_date()),
            last_updated: field(metadata.last_updated()),
        }
    }
}

/// Index handed to the renderer as `{ teps: [...] }`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Index {
    /// Rows sorted by number, then filename
    pub teps: Vec<IndexEntry>,
}

impl Index {
    /// Number of rows
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.teps.len()
    }

    /// No rows
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.teps.is_empty()
    }
}

/// Builds the index from a collection
#[derive(Debug, Clone, Copy, Default)]
pub struct IndexBuilder;

impl IndexBuilder {
    /// Sorted records, numeric ascending with placeholders last
    #[must_use]
    pub fn build(collection: &Collection) -> Index {
        Self::from_documents(collection.documents())
    }

    /// Sorted records for any set of documents
    #[must_use]
    pub fn from_documents<'a>(documents: impl IntoIterator<Item = &'a Document>) -> Index {
        let mut teps: Vec<IndexEntry> = documents.into_iter().map(IndexEntry::from_document).collect();
        teps.sort_by(|a, b| a.number.cmp(&b.number).then_with(|| a.link.cmp(&b.link)));
        Index { teps }
    }
}
