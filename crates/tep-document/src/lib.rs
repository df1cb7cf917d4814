//! TEP document model
//!
//! Reads numbered proposal documents: a `---` delimited metadata block,
//! a `# TEP-dddd: <title>` line and free-form prose.
//!
//! # Core Operations
//!
//! - **Decode/Encode**: [`HeaderCodec`] turns the metadata block into a
//!   [`Metadata`] mapping and back
//! - **Parse**: [`DocumentParser`] splits a line stream into header, number
//!   and body, collecting every [`Issue`] next to a best-effort [`Document`]
//! - **Render**: [`Document::render`] writes a document back, body verbatim
//!
//! # Example
//!
//! ```rust,ignore
//! use tep_document::{BodyMode, DocumentParser};
//!
//! let parser = DocumentParser::default();
//! let parsed = parser.parse_str("0042-foo.md", &text, BodyMode::Capture);
//! for issue in &parsed.issues {
//!     eprintln!("{issue}");
//! }
//! let document = parsed.into_strict()?;
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod document;
pub mod error;
pub mod header;
pub mod number;
pub mod parser;
pub mod patterns;

pub use document::Document;
pub use error::{Issue, IssueKind, MalformedHeader, PatternError, ValidationErrors};
pub use header::{keys, HeaderCodec, HeaderValue, Metadata};
pub use number::{TepNumber, MAX_NUMBER};
pub use parser::{BodyMode, DocumentParser, ParseMode, Parsed};
pub use patterns::{PatternConfig, Patterns};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
