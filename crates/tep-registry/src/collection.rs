//! Document collection
//!
//! The set of documents in a folder, recomputed on every invocation.
//! Every regular file except the index, its template and the ownership
//! file is a candidate; files are read in filename order so batch output
//! is deterministic. A file that cannot be read as text is recorded as an
//! issue against its link and left out of the documents.

use crate::config::RegistryConfig;
use crate::error::{RegistryError, RegistryResult};
use std::path::{Path, PathBuf};
use tep_document::{BodyMode, Document, DocumentParser, Issue, Parsed};

/// Parsed documents of one folder
#[derive(Debug, Clone)]
pub struct Collection {
    folder: PathBuf,
    entries: Vec<Parsed>,
    unreadable: Vec<Issue>,
}

impl Collection {
    /// Read and permissively parse every candidate document in the folder
    pub fn load(
        config: &RegistryConfig,
        parser: &DocumentParser,
        body: BodyMode,
    ) -> RegistryResult<Self> {
        let folder = config.folder.clone();
        let mut entries = Vec::new();
        let mut unreadable = Vec::new();

        for path in candidates(&folder, &config.excluded_names())? {
            let link = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            let text = match std::fs::read_to_string(&path) {
                Ok(text) => text,
                Err(err) => {
                    let issue = Issue::invalid(
                        &link,
                        format!("{link} is not a readable text file: {err}"),
                    );
                    tracing::warn!(%issue, "skipping file");
                    unreadable.push(issue);
                    continue;
                }
            };
            let parsed = parser.parse_str(&link, &text, body);
            for issue in &parsed.issues {
                tracing::warn!(%issue, "document issue");
            }
            entries.push(parsed);
        }

        tracing::debug!(
            folder = %folder.display(),
            documents = entries.len(),
            unreadable = unreadable.len(),
            "loaded collection"
        );
        Ok(Self {
            folder,
            entries,
            unreadable,
        })
    }

    /// Build from already parsed entries
    #[must_use]
    pub fn from_entries(folder: impl Into<PathBuf>, entries: Vec<Parsed>) -> Self {
        Self {
            folder: folder.into(),
            entries,
            unreadable: Vec::new(),
        }
    }

    /// Folder the collection was read from
    #[inline]
    #[must_use]
    pub fn folder(&self) -> &Path {
        &self.folder
    }

    /// Parsed entries, documents with their issues
    #[inline]
    #[must_use]
    pub fn entries(&self) -> &[Parsed] {
        &self.entries
    }

    /// Documents in filename order
    pub fn documents(&self) -> impl Iterator<Item = &Document> {
        self.entries.iter().map(|parsed| &parsed.document)
    }

    /// Files skipped because they could not be read as text
    #[inline]
    #[must_use]
    pub fn unreadable(&self) -> &[Issue] {
        &self.unreadable
    }

    /// Issues found while reading and parsing, across all files
    pub fn parse_issues(&self) -> impl Iterator<Item = &Issue> {
        self.entries
            .iter()
            .flat_map(|parsed| parsed.issues.iter())
            .chain(&self.unreadable)
    }

    /// Number of documents
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// No documents
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Candidate document paths, sorted by filename
pub fn candidates(folder: &Path, excluded: &[&str]) -> RegistryResult<Vec<PathBuf>> {
    if !folder.is_dir() {
        return Err(RegistryError::InvalidFolder(folder.to_path_buf()));
    }

    let read = std::fs::read_dir(folder).map_err(|e| RegistryError::io_error(folder, e))?;
    let mut paths = Vec::new();
    for entry in read {
        let entry = entry.map_err(|e| RegistryError::io_error(folder, e))?;
        let path = entry.path();
        let excluded_name = entry
            .file_name()
            .to_str()
            .is_some_and(|name| excluded.contains(&name));
        // dotfiles include editor swap files and the atomic-write temporaries
        let hidden = entry.file_name().to_string_lossy().starts_with('.');
        if path.is_file() && !excluded_name && !hidden {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}
