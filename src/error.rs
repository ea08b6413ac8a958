//! Error types for CSV record decoding.
//!
//! The tokenizer itself never fails: malformed quoting is absorbed by its
//! recovery rules. The errors here come from the edges of a parse session.
//!
//! ## Error Categories
//!
//! - **Duplicate headers**: two non-blank header names are equal ignoring case
//! - **I/O errors**: the underlying character source failed to read or decode
//! - **Type mismatches**: a field value could not be converted during typed decoding
//!
//! ## Examples
//!
//! ```rust
//! use lenient_csv::{parse, Error};
//!
//! let mut records = parse("a,A,b\n1,2,3\n", None);
//! match records.next() {
//!     Some(Err(Error::DuplicateHeader { name })) => assert_eq!(name, "A"),
//!     other => panic!("unexpected: {:?}", other),
//! }
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors that can occur while decoding CSV records.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Two non-blank header names are equal when compared case-insensitively.
    ///
    /// Fatal to the parse session: every later pull returns this error again.
    #[error("Duplicate header name '{name}': header names must be unique ignoring case")]
    DuplicateHeader { name: String },

    /// IO error from the character source
    #[error("IO error: {0}")]
    Io(String),

    /// A field value could not be converted to the requested type
    #[error("Type mismatch in field '{field}': expected {expected}, found '{found}'")]
    TypeMismatch {
        field: String,
        expected: String,
        found: String,
    },

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates a duplicate header error naming the conflicting entry.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lenient_csv::Error;
    ///
    /// let err = Error::duplicate_header("Name");
    /// assert!(err.to_string().contains("'Name'"));
    /// ```
    pub fn duplicate_header(name: &str) -> Self {
        Error::DuplicateHeader {
            name: name.to_string(),
        }
    }

    /// Creates a type mismatch error for a field that failed typed conversion.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lenient_csv::Error;
    ///
    /// let err = Error::type_mismatch("age", "integer", "abc");
    /// assert!(err.to_string().contains("expected integer"));
    /// ```
    pub fn type_mismatch(field: &str, expected: &str, found: &str) -> Self {
        Error::TypeMismatch {
            field: field.to_string(),
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Returns `true` if this error came from header validation.
    #[must_use]
    pub fn is_duplicate_header(&self) -> bool {
        matches!(self, Error::DuplicateHeader { .. })
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_header_message() {
        let err = Error::duplicate_header("id");
        assert_eq!(
            err.to_string(),
            "Duplicate header name 'id': header names must be unique ignoring case"
        );
        assert!(err.is_duplicate_header());
    }

    #[test]
    fn test_io_from_std() {
        let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "stream closed");
        let err = Error::from(io);
        assert!(matches!(err, Error::Io(ref msg) if msg.contains("stream closed")));
        assert!(!err.is_duplicate_header());
    }

    #[test]
    fn test_type_mismatch_message() {
        let err = Error::type_mismatch("count", "u32", "-1");
        assert_eq!(
            err.to_string(),
            "Type mismatch in field 'count': expected u32, found '-1'"
        );
    }
}
