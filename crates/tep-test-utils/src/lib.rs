//! Testing utilities for the TEP workspace
//!
//! Document text builders and scratch folders.

#![allow(missing_docs)]

use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tep_document::TepNumber;

/// Builder for document text
#[derive(Debug, Clone)]
pub struct TepText {
    number: Option<String>,
    title: String,
    authors: Vec<String>,
    status: Option<String>,
    creation_date: Option<String>,
    extra: Vec<String>,
    body: String,
}

impl TepText {
    pub fn new(number: u32, title: &str) -> Self {
        Self {
            number: Some(TepNumber::from_value(number).to_string()),
            title: title.to_string(),
            authors: vec!["alice".to_string()],
            status: Some("proposed".to_string()),
            creation_date: Some("2021-01-01".to_string()),
            extra: Vec::new(),
            body: "\nSome prose.\n".to_string(),
        }
    }

    /// Title line declaring `number` verbatim, e.g. `TEP-0043`
    pub fn declaring(mut self, number: &str) -> Self {
        self.number = Some(number.to_string());
        self
    }

    pub fn without_title_line(mut self) -> Self {
        self.number = None;
        self
    }

    pub fn authors(mut self, authors: &[&str]) -> Self {
        self.authors = authors.iter().map(ToString::to_string).collect();
        self
    }

    pub fn status(mut self, status: Option<&str>) -> Self {
        self.status = status.map(str::to_string);
        self
    }

    pub fn creation_date(mut self, date: Option<&str>) -> Self {
        self.creation_date = date.map(str::to_string);
        self
    }

    /// Raw header line appended after the standard fields
    pub fn header_line(mut self, line: &str) -> Self {
        self.extra.push(line.to_string());
        self
    }

    pub fn body(mut self, body: &str) -> Self {
        self.body = body.to_string();
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::from("---\n");
        out.push_str(&format!("title: {}\n", self.title));
        if self.authors.is_empty() {
            out.push_str("authors: []\n");
        } else {
            out.push_str("authors:\n");
            for author in &self.authors {
                out.push_str(&format!("- @{author}\n"));
            }
        }
        if let Some(date) = &self.creation_date {
            out.push_str(&format!("creation-date: {date}\n"));
        }
        if let Some(status) = &self.status {
            out.push_str(&format!("status: {status}\n"));
        }
        for line in &self.extra {
            out.push_str(line);
            out.push('\n');
        }
        out.push_str("---\n\n");
        if let Some(number) = &self.number {
            out.push_str(&format!("# {number}: {}\n", self.title));
        }
        out.push_str(&self.body);
        out
    }
}

/// Scratch document folder, removed on drop
#[derive(Debug)]
pub struct TempCollection {
    dir: TempDir,
}

impl TempCollection {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn join(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Write a file with the given text
    pub fn add(&self, name: &str, text: &str) -> PathBuf {
        let path = self.join(name);
        std::fs::write(&path, text).expect("write fixture");
        path
    }

    /// Write a valid document `NNNN-<slug>.md`
    pub fn add_tep(&self, number: u32, slug: &str) -> PathBuf {
        self.add(
            &format!("{number:04}-{slug}.md"),
            &TepText::new(number, slug).render(),
        )
    }

    pub fn with_tep(self, number: u32, slug: &str) -> Self {
        self.add_tep(number, slug);
        self
    }

    pub fn read(&self, name: &str) -> String {
        std::fs::read_to_string(self.join(name)).expect("read fixture")
    }

    /// Sorted names of the files in the folder
    pub fn file_names(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.path())
            .expect("read temp dir")
            .map(|entry| entry.expect("dir entry").file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

impl Default for TempCollection {
    fn default() -> Self {
        Self::new()
    }
}

/// Minimal index template over every field
pub const INDEX_TEMPLATE: &str = "\
# TEPs

|TEP|Title|Status|Last Updated|
|---|-----|------|------------|
{% for tep in teps -%}
|[{{ tep.number }}]({{ tep.link }}) | {{ tep.title }} | {{ tep.status }} | {{ tep['last-updated'] }} |
{% endfor %}";
