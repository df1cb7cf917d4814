//! Registry configuration
//!
//! Every setting has a default; a YAML file can override any of them and
//! command-line flags override the file.

use crate::error::{RegistryError, RegistryResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tep_document::{keys, PatternConfig};

/// Default pending request endpoint
pub const DEFAULT_PENDING_URL: &str =
    "https://api.github.com/repos/tektoncd/community/pulls?state=open&per_page=100";

/// Registry configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RegistryConfig {
    /// Folder holding the documents
    pub folder: PathBuf,
    /// Generated index file
    pub index_file: String,
    /// Template the index is rendered from
    pub index_template: String,
    /// Ownership file
    pub owners_file: String,
    /// Pending request endpoint
    pub pending_url: String,
    /// Fields every document must fill in
    pub required_fields: Vec<String>,
    /// Parser patterns
    pub patterns: PatternConfig,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            folder: PathBuf::from("."),
            index_file: "README.md".to_string(),
            index_template: "README.md.tmpl".to_string(),
            owners_file: "OWNERS".to_string(),
            pending_url: DEFAULT_PENDING_URL.to_string(),
            required_fields: [keys::TITLE, keys::AUTHORS, keys::CREATION_DATE, keys::STATUS]
                .iter()
                .map(ToString::to_string)
                .collect(),
            patterns: PatternConfig::default(),
        }
    }
}

impl RegistryConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> RegistryResult<Self> {
        let text =
            std::fs::read_to_string(path).map_err(|e| RegistryError::io_error(path, e))?;
        serde_yaml::from_str(&text).map_err(|source| RegistryError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// With document folder
    #[inline]
    #[must_use]
    pub fn with_folder(mut self, folder: impl Into<PathBuf>) -> Self {
        self.folder = folder.into();
        self
    }

    /// With pending request endpoint
    #[inline]
    #[must_use]
    pub fn with_pending_url(mut self, url: impl Into<String>) -> Self {
        self.pending_url = url.into();
        self
    }

    /// With required fields
    #[inline]
    #[must_use]
    pub fn with_required_fields(mut self, fields: Vec<String>) -> Self {
        self.required_fields = fields;
        self
    }

    /// Filenames in the folder that are never documents
    #[must_use]
    pub fn excluded_names(&self) -> [&str; 3] {
        [
            self.index_file.as_str(),
            self.index_template.as_str(),
            self.owners_file.as_str(),
        ]
    }

    /// Path of the index file
    #[inline]
    #[must_use]
    pub fn index_path(&self) -> PathBuf {
        self.folder.join(&self.index_file)
    }

    /// Path of the index template
    #[inline]
    #[must_use]
    pub fn template_path(&self) -> PathBuf {
        self.folder.join(&self.index_template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_exclude_index_template_and_owners() {
        let config = RegistryConfig::default();
        assert_eq!(config.excluded_names(), ["README.md", "README.md.tmpl", "OWNERS"]);
        assert_eq!(config.required_fields.len(), 4);
    }

    #[test]
    fn load_overrides_only_given_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "folder: teps\nindex-file: INDEX.md\npatterns:\n  author-prefix: \"~\"").unwrap();

        let config = RegistryConfig::load(file.path()).unwrap();
        assert_eq!(config.folder, PathBuf::from("teps"));
        assert_eq!(config.index_file, "INDEX.md");
        assert_eq!(config.owners_file, "OWNERS");
        assert_eq!(config.patterns.author_prefix, "~");
        assert_eq!(config.patterns.separator, "---");
    }

    #[test]
    fn renamed_template_is_excluded_and_read() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "folder: teps\nindex-template: README.md.mustache").unwrap();

        let config = RegistryConfig::load(file.path()).unwrap();
        assert_eq!(config.excluded_names(), ["README.md", "README.md.mustache", "OWNERS"]);
        assert_eq!(config.template_path(), PathBuf::from("teps/README.md.mustache"));
    }

    #[test]
    fn load_reports_bad_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "folder: [unclosed").unwrap();

        let err = RegistryConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, RegistryError::Config { .. }));
    }
}
