//! Configuration for a parse session.
//!
//! The dialect itself is fixed: `,` delimits, `"` quotes, `\n` or `\r\n` end a
//! record, and an optional leading `#Type` line is skipped. What a caller can
//! choose is where the header comes from and how blank header slots are named.
//!
//! ## Examples
//!
//! ```rust
//! use lenient_csv::{Reader, ReaderOptions, StrSource};
//!
//! let options = ReaderOptions::new()
//!     .with_header(vec!["x", "y"])
//!     .with_placeholder_prefix("Column");
//!
//! let mut reader = Reader::with_options(StrSource::new("1,2\n"), options);
//! let record = reader.read_record().unwrap().unwrap();
//! assert_eq!(record.get("x"), Some("1"));
//! ```

use crate::header::Header;
use crate::record::DEFAULT_PLACEHOLDER_PREFIX;

/// Options controlling header resolution and record building.
///
/// # Examples
///
/// ```rust
/// use lenient_csv::ReaderOptions;
///
/// let options = ReaderOptions::new();
/// assert!(options.header.is_none());
/// assert_eq!(options.placeholder_prefix, "H");
/// ```
#[derive(Clone, Debug)]
pub struct ReaderOptions {
    /// Header to use instead of reading one from the first line.
    pub header: Option<Header>,
    /// Prefix of the names given to blank header entries.
    pub placeholder_prefix: String,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        ReaderOptions {
            header: None,
            placeholder_prefix: DEFAULT_PLACEHOLDER_PREFIX.to_string(),
        }
    }
}

impl ReaderOptions {
    /// Creates default options: header read from the source, `H` placeholders.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Supplies the header explicitly.
    ///
    /// The first line of input is then treated as data.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lenient_csv::{Header, ReaderOptions};
    ///
    /// let options = ReaderOptions::new().with_header(vec!["id", "name"]);
    /// assert_eq!(options.header, Some(Header::from(vec!["id", "name"])));
    /// ```
    #[must_use]
    pub fn with_header<H: Into<Header>>(mut self, header: H) -> Self {
        self.header = Some(header.into());
        self
    }

    /// Sets an optional explicit header; `None` reads it from the source.
    #[must_use]
    pub fn with_optional_header(mut self, header: Option<Header>) -> Self {
        self.header = header;
        self
    }

    /// Sets the prefix for names synthesized for blank header entries.
    #[must_use]
    pub fn with_placeholder_prefix(mut self, prefix: &str) -> Self {
        self.placeholder_prefix = prefix.to_string();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ReaderOptions::default();
        assert_eq!(options.header, None);
        assert_eq!(options.placeholder_prefix, DEFAULT_PLACEHOLDER_PREFIX);
    }

    #[test]
    fn test_builder_chain() {
        let options = ReaderOptions::new()
            .with_header(vec!["a".to_string()])
            .with_placeholder_prefix("Col");
        assert_eq!(options.header.as_deref(), Some(&["a".to_string()][..]));
        assert_eq!(options.placeholder_prefix, "Col");

        let options = options.with_optional_header(None);
        assert!(options.header.is_none());
    }
}
