//! Registry facade
//!
//! Ties configuration, parser, validator and allocator together for one
//! folder. Every operation reloads the collection from disk.

use crate::allocator::NumberAllocator;
use crate::collection::Collection;
use crate::config::RegistryConfig;
use crate::create::{create_document, NewTep};
use crate::error::{RegistryError, RegistryResult};
use crate::index::{Index, IndexBuilder};
use crate::pending::PendingSource;
use crate::renumber::{RenumberOutcome, RenumberSource};
use crate::validator::Validator;
use crate::write::{write_atomic, Overwrite};
use std::path::{Path, PathBuf};
use tep_document::{BodyMode, DocumentParser, TepNumber, ValidationErrors};

/// Document created by [`Registry::create`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Created {
    /// Path of the new file
    pub path: PathBuf,
    /// Number it was given
    pub number: TepNumber,
}

/// Proposal registry over one folder
#[derive(Debug, Clone)]
pub struct Registry {
    config: RegistryConfig,
    parser: DocumentParser,
    validator: Validator,
    allocator: NumberAllocator,
}

impl Registry {
    /// Open the registry, checking the folder and compiling patterns
    pub fn open(config: RegistryConfig) -> RegistryResult<Self> {
        if !config.folder.is_dir() {
            return Err(RegistryError::InvalidFolder(config.folder.clone()));
        }
        let patterns = config.patterns.compile()?;
        let parser = DocumentParser::new(patterns.clone());
        let validator = Validator::new(config.required_fields.clone());
        let allocator = NumberAllocator::new(patterns);

        tracing::debug!(folder = %config.folder.display(), "opened registry");
        Ok(Self {
            config,
            parser,
            validator,
            allocator,
        })
    }

    /// Configuration in use
    #[inline]
    #[must_use]
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Parser in use
    #[inline]
    #[must_use]
    pub fn parser(&self) -> &DocumentParser {
        &self.parser
    }

    /// Folder holding the documents
    #[inline]
    #[must_use]
    pub fn folder(&self) -> &Path {
        &self.config.folder
    }

    /// Load the collection
    pub fn collection(&self, body: BodyMode) -> RegistryResult<Collection> {
        Collection::load(&self.config, &self.parser, body)
    }

    /// Every defect across the collection; empty when valid
    pub fn validate(&self) -> RegistryResult<ValidationErrors> {
        let collection = self.collection(BodyMode::HeaderOnly)?;
        let mut errors = self.validator.validate(collection.entries());
        errors.extend(collection.unreadable().iter().cloned());
        Ok(errors)
    }

    /// Sorted index records
    pub fn index(&self) -> RegistryResult<Index> {
        let collection = self.collection(BodyMode::HeaderOnly)?;
        Ok(IndexBuilder::build(&collection))
    }

    /// Next free number
    pub fn next_number(&self, source: &dyn PendingSource) -> RegistryResult<u32> {
        let collection = self.collection(BodyMode::HeaderOnly)?;
        Ok(self.allocator.allocate(&collection, source)?)
    }

    /// Allocate a number and write a new document
    pub fn create(&self, request: &NewTep, source: &dyn PendingSource) -> RegistryResult<Created> {
        let number = self.next_number(source)?;
        let (path, document) = create_document(self.folder(), &self.parser, request, number)?;
        Ok(Created {
            path,
            number: document.number().clone(),
        })
    }

    /// Write a renumbered copy of `source_file`
    ///
    /// A bare filename is looked up in the folder. The source file is left
    /// in place.
    pub fn renumber(
        &self,
        source_file: &Path,
        source: &dyn PendingSource,
    ) -> RegistryResult<RenumberOutcome> {
        let path = self.resolve(source_file);
        let renumber = RenumberSource::read(&path, &self.parser)?;
        let number = self.next_number(source)?;
        renumber.write(self.folder(), &self.parser, number)
    }

    /// Write rendered index text to the index file
    pub fn write_index(&self, rendered: &str) -> RegistryResult<PathBuf> {
        let path = self.config.index_path();
        write_atomic(&path, rendered, Overwrite::Replace)?;
        Ok(path)
    }

    /// Read the index template
    pub fn read_template(&self) -> RegistryResult<String> {
        let path = self.config.template_path();
        std::fs::read_to_string(&path).map_err(|e| RegistryError::io_error(path, e))
    }

    fn resolve(&self, file: &Path) -> PathBuf {
        if file.is_file() {
            return file.to_path_buf();
        }
        self.folder().join(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pending::StaticPendingSource;

    #[test]
    fn open_rejects_missing_folder() {
        let config = RegistryConfig::default().with_folder("/no/such/folder");
        assert!(matches!(
            Registry::open(config),
            Err(RegistryError::InvalidFolder(_))
        ));
    }

    #[test]
    fn open_rejects_bad_patterns() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = RegistryConfig::default().with_folder(dir.path());
        config.patterns = config.patterns.with_title_line("^# TEP-");
        assert!(matches!(Registry::open(config), Err(RegistryError::Pattern(_))));
    }

    #[test]
    fn create_then_validate() {
        let dir = tempfile::tempdir().unwrap();
        let registry = Registry::open(RegistryConfig::default().with_folder(dir.path())).unwrap();
        let source = StaticPendingSource::new(["TEP-0004: in review"]);

        let created = registry
            .create(&NewTep::new("First one", vec!["alice".into()]), &source)
            .unwrap();
        assert_eq!(created.number.as_str(), "TEP-0005");
        assert_eq!(created.path, dir.path().join("0005-First-one.md"));
        assert!(registry.validate().unwrap().is_empty());
    }
}
