//! Canonical proposal numbers
//!
//! A `TepNumber` keeps the raw `TEP-dddd` text exactly as it was declared,
//! so a mismatch between a filename and a title line can be reported with
//! both original values. Ordering is by embedded integer value; anything
//! that does not carry a value (the `TEP-XXXX` placeholder, malformed
//! entries) sorts after every numbered entry, lexically among themselves.

use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;

/// Prefix shared by every proposal number
pub const NUMBER_PREFIX: &str = "TEP-";

/// Largest number that still renders as four digits
pub const MAX_NUMBER: u32 = 9999;

/// Canonical sequence identifier of a proposal (`TEP-0042`)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TepNumber(String);

impl TepNumber {
    /// Placeholder used when a document declares no number
    pub const PLACEHOLDER: &'static str = "TEP-XXXX";

    /// Wrap a raw number string without interpreting it
    #[inline]
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Zero-padded number for an integer value
    #[inline]
    #[must_use]
    pub fn from_value(value: u32) -> Self {
        Self(format!("{NUMBER_PREFIX}{value:04}"))
    }

    /// The `TEP-XXXX` placeholder
    #[inline]
    #[must_use]
    pub fn placeholder() -> Self {
        Self(Self::PLACEHOLDER.to_string())
    }

    /// Raw textual form
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Integer encoded after the prefix, if it is all digits
    #[must_use]
    pub fn value(&self) -> Option<u32> {
        let digits = self.0.strip_prefix(NUMBER_PREFIX)?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok()
    }

    /// True when no integer value can be read from this number
    #[inline]
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.value().is_none()
    }
}

impl fmt::Display for TepNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Ord for TepNumber {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.value(), other.value()) {
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| self.0.cmp(&other.0)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for TepNumber {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Serialize for TepNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}
