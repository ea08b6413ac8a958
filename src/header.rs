//! Header names and their resolution.
//!
//! A [`Header`] is the ordered list of field names applied to every data row.
//! Names are compared ignoring case for uniqueness but keep their original
//! spelling as record keys. Blank names are allowed any number of times; the
//! record builder gives them placeholder names.

use crate::error::{Error, Result};
use crate::source::CharSource;
use crate::tokenizer::{RowMode, Tokenizer};
use crate::type_hint::skip_type_hint;
use std::collections::HashSet;
use std::ops::Deref;

/// Ordered field names for a parse session.
///
/// # Examples
///
/// ```rust
/// use lenient_csv::Header;
///
/// let header = Header::from(vec!["id", "Name", ""]);
/// assert_eq!(header.len(), 3);
/// assert!(header.validate().is_ok());
///
/// let header = Header::from(vec!["id", "ID"]);
/// assert!(header.validate().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Header(Vec<String>);

impl Header {
    /// Checks that no two non-blank names are equal ignoring case.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateHeader`] naming the first repeated entry.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::with_capacity(self.0.len());
        for name in self.0.iter().filter(|name| !name.is_empty()) {
            if !seen.insert(name.to_lowercase()) {
                tracing::warn!(name = %name, "duplicate header name");
                return Err(Error::duplicate_header(name));
            }
        }
        Ok(())
    }

    /// Returns the names as a slice.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> Vec<String> {
        self.0
    }
}

impl Deref for Header {
    type Target = [String];

    fn deref(&self) -> &[String] {
        &self.0
    }
}

impl From<Vec<String>> for Header {
    fn from(names: Vec<String>) -> Self {
        Header(names)
    }
}

impl From<Vec<&str>> for Header {
    fn from(names: Vec<&str>) -> Self {
        Header(names.into_iter().map(str::to_string).collect())
    }
}

impl FromIterator<String> for Header {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        Header(iter.into_iter().collect())
    }
}

/// The outcome of reading the top of a source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ResolvedHeader {
    pub header: Header,
    pub type_hint: Option<String>,
}

/// Skips the optional type-hint line, then takes `explicit` or reads the
/// first record as the header, and validates it.
///
/// When `explicit` is given, no line is consumed as a header: the first data
/// line becomes the first record. An empty source resolves to an empty header.
pub(crate) fn resolve_header<S: CharSource + ?Sized>(
    source: &mut S,
    tokenizer: &mut Tokenizer,
    explicit: Option<Header>,
) -> Result<ResolvedHeader> {
    let type_hint = if source.at_end() {
        None
    } else {
        skip_type_hint(source)
    };

    let header = match explicit {
        Some(header) => {
            tracing::debug!(columns = header.len(), "using explicit header");
            header
        }
        None if !source.at_end() => {
            let header = Header::from(tokenizer.next_row(source, RowMode::Header));
            tracing::debug!(columns = header.len(), "read header line");
            header
        }
        None => Header::default(),
    };

    header.validate()?;
    Ok(ResolvedHeader { header, type_hint })
}
