//! Collection validation
//!
//! Runs over documents parsed permissively and never stops early: parse
//! issues, missing required fields and duplicate numbers all land in one
//! [`ValidationErrors`] aggregate. An empty aggregate means the collection
//! is valid.

use std::collections::HashMap;
use tep_document::{Issue, Parsed, ValidationErrors};

/// Cross-document validator
#[derive(Debug, Clone)]
pub struct Validator {
    required_fields: Vec<String>,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(crate::config::RegistryConfig::default().required_fields)
    }
}

impl Validator {
    /// Create validator requiring the given header fields
    #[must_use]
    pub fn new(required_fields: Vec<String>) -> Self {
        Self { required_fields }
    }

    /// Fields every document must fill in
    #[inline]
    #[must_use]
    pub fn required_fields(&self) -> &[String] {
        &self.required_fields
    }

    /// Validate entries in traversal order
    ///
    /// Duplicate numbers are attributed to the first document declaring
    /// them; every later one gets exactly one issue. Placeholder numbers
    /// are already reported by the parser and are never duplicates.
    #[must_use]
    pub fn validate(&self, entries: &[Parsed]) -> ValidationErrors {
        let mut errors = ValidationErrors::default();
        let mut seen: HashMap<&str, &str> = HashMap::new();

        for parsed in entries {
            let document = &parsed.document;
            let link = document.link();
            errors.extend(parsed.issues.iter().cloned());

            for field in &self.required_fields {
                let filled = document
                    .metadata()
                    .get(field)
                    .is_some_and(|value| !value.is_empty());
                if !filled {
                    errors.push(Issue::invalid(
                        link,
                        format!("{field} field missing in file {link}"),
                    ));
                }
            }

            let number = document.number();
            if number.is_placeholder() {
                continue;
            }
            if let Some(prior) = seen.get(number.as_str()) {
                errors.push(Issue::number(
                    link,
                    format!("{link} uses {number} which was already in use by {prior}"),
                ));
            } else {
                seen.insert(number.as_str(), link);
            }
        }

        tracing::debug!(documents = entries.len(), issues = errors.len(), "validated collection");
        errors
    }
}
