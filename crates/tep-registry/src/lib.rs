//! TEP registry
//!
//! Operations over a folder of proposal documents.
//!
//! # Core Operations
//!
//! - **Validate**: [`Validator`] collects every defect across a
//!   [`Collection`] into one aggregate
//! - **Allocate**: [`NumberAllocator`] unions local numbers with numbers
//!   claimed by pending requests ([`PendingSource`]) and returns the next one
//! - **Index**: [`IndexBuilder`] folds a collection into sorted records
//! - **Create / Renumber**: write new or renumbered documents atomically,
//!   never replacing an existing file
//!
//! # Example
//!
//! ```rust,ignore
//! use tep_registry::{Registry, RegistryConfig, StaticPendingSource};
//!
//! let registry = Registry::open(RegistryConfig::default().with_folder("teps"))?;
//! let errors = registry.validate()?;
//! for issue in errors.issues() {
//!     eprintln!("{issue}");
//! }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod allocator;
pub mod collection;
pub mod config;
pub mod create;
pub mod error;
pub mod index;
pub mod pending;
pub mod registry;
pub mod renumber;
pub mod validator;
pub mod write;

pub use allocator::NumberAllocator;
pub use collection::Collection;
pub use config::RegistryConfig;
pub use create::NewTep;
pub use error::{RegistryError, RegistryResult, SourceUnavailable};
pub use index::{Index, IndexBuilder, IndexEntry};
pub use pending::{GithubPulls, PendingSource, StaticPendingSource};
pub use registry::{Created, Registry};
pub use renumber::{RenumberOutcome, RenumberSource};
pub use validator::Validator;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
