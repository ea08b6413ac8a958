//! # lenient_csv
//!
//! A streaming decoder that turns CSV text into an ordered sequence of
//! records, each a map from header name to value.
//!
//! ## The Dialect
//!
//! The decoder reproduces a specific, forgiving CSV dialect rather than strict
//! RFC 4180:
//!
//! - **Quoting**: `"` quotes a field; inside quotes `,` and line breaks are
//!   literal and `""` is one quote character
//! - **Recovery**: text after a closing quote, or a quote in the middle of an
//!   unquoted field, is merged into the same field instead of being an error
//! - **Blank lines**: skipped between records
//! - **Whitespace**: leading spaces and tabs of unquoted fields are dropped
//! - **Type hint**: an optional first line such as `#TYPE Foo` is skipped and
//!   exposed as the annotation `CSV:Foo`
//! - **Header**: read from the first line or supplied by the caller; names
//!   must be unique ignoring case, blank names become `H1`, `H2`, ...
//! - **Ragged rows**: missing values are `None`, extra values are dropped
//!
//! ## Quick Start
//!
//! ```rust
//! use lenient_csv::parse;
//!
//! let text = "id,name,city\n1,\"Lovelace, Ada\",London\n\n2,Grace\n";
//! let records: Vec<_> = parse(text, None).collect::<Result<_, _>>().unwrap();
//!
//! assert_eq!(records.len(), 2);
//! assert_eq!(records[0].get("name"), Some("Lovelace, Ada"));
//! assert_eq!(records[1].get("city"), None);
//! ```
//!
//! ### Explicit Header
//!
//! ```rust
//! use lenient_csv::{parse, Header};
//!
//! let mut records = parse("1,2\n", Some(Header::from(vec!["x", "y"])));
//! let record = records.next().unwrap().unwrap();
//! assert_eq!(record.get("x"), Some("1"));
//! ```
//!
//! ### Typed Records
//!
//! ```rust
//! use lenient_csv::from_str;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Point { x: i32, y: i32 }
//!
//! let points: Vec<Point> = from_str("x,y\n1,2\n3,4\n").unwrap();
//! assert_eq!(points[1], Point { x: 3, y: 4 });
//! ```
//!
//! ## Streaming
//!
//! Records are produced lazily. A [`Reader`] pulls characters from a
//! [`CharSource`] only as far as the record being returned, so large files
//! and network streams can be decoded with bounded memory through
//! [`parse_reader`] or [`parse_file`]. Stopping early is simply dropping the
//! iterator. The decoder never closes its source; pass `&mut reader` to keep
//! using a stream afterwards.
//!
//! ## Errors
//!
//! Only the edges of a session can fail: a duplicate header name
//! ([`Error::DuplicateHeader`]), a failing source ([`Error::Io`]), or a value
//! that does not convert during typed decoding ([`Error::TypeMismatch`]).
//! Malformed quoting never fails.
//!
//! ## Logging
//!
//! The decoder emits [`tracing`] events: `debug` for type-hint lines and
//! header resolution, `trace` for skipped blank lines, `warn` for duplicate
//! header names. Install any subscriber to see them.

pub mod de;
pub mod error;
pub mod header;
pub mod options;
pub mod reader;
pub mod record;
pub mod source;
pub mod tokenizer;
pub mod type_hint;
pub mod writer;

pub use de::{from_record, FieldDeserializer, RecordDeserializer};
pub use error::{Error, Result};
pub use header::Header;
pub use options::ReaderOptions;
pub use reader::{DeserializeRecords, DeserializeRecordsIter, Reader, Records, RecordsIter};
pub use record::{Record, DEFAULT_PLACEHOLDER_PREFIX};
pub use source::{CharSource, ReaderSource, StrSource};
pub use tokenizer::{RawRow, RowMode, Tokenizer};
pub use type_hint::skip_type_hint;
pub use writer::{to_string, Writer};

use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

/// Decodes records from text.
///
/// With `header` set, the first line of `text` is already data; otherwise the
/// first line (after an optional type-hint line) is the header.
///
/// # Examples
///
/// ```rust
/// use lenient_csv::parse;
///
/// let mut records = parse("a,b\n1,2\n", None);
/// assert_eq!(records.next().unwrap().unwrap().get("b"), Some("2"));
/// assert!(records.next().is_none());
/// ```
pub fn parse(text: &str, header: Option<Header>) -> Records<StrSource<'_>> {
    parse_source(StrSource::new(text), header)
}

/// Decodes records from any character source.
pub fn parse_source<S: CharSource>(source: S, header: Option<Header>) -> Records<S> {
    let options = ReaderOptions::new().with_optional_header(header);
    Reader::with_options(source, options).into_records()
}

/// Decodes records from a byte stream holding UTF-8 text.
///
/// The stream is read one line at a time. Passing `&mut reader` leaves the
/// caller's stream usable afterwards.
///
/// # Examples
///
/// ```rust
/// use lenient_csv::parse_reader;
/// use std::io::Cursor;
///
/// let mut records = parse_reader(Cursor::new("n\n1\n2\n"), None);
/// assert_eq!(records.by_ref().count(), 2);
/// ```
pub fn parse_reader<R: io::Read>(
    reader: R,
    header: Option<Header>,
) -> Records<ReaderSource<BufReader<R>>> {
    parse_source(ReaderSource::from_read(reader), header)
}

/// Opens a file and decodes its records lazily.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be opened. Read errors later on
/// surface through the iterator.
pub fn parse_file<P: AsRef<Path>>(
    path: P,
    header: Option<Header>,
) -> Result<Records<ReaderSource<BufReader<File>>>> {
    let source = ReaderSource::open(path)?;
    Ok(parse_source(source, header))
}

/// Decodes every record of `text` into a `T`.
///
/// # Errors
///
/// Returns the first header, conversion or validation error.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str<T>(text: &str) -> Result<Vec<T>>
where
    T: DeserializeOwned,
{
    Reader::new(StrSource::new(text)).deserialize().collect()
}

/// Decodes every record of `text` into a `T`, using `header` for field names.
///
/// # Errors
///
/// Returns the first header, conversion or validation error.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str_with_header<T>(text: &str, header: Header) -> Result<Vec<T>>
where
    T: DeserializeOwned,
{
    let options = ReaderOptions::new().with_header(header);
    Reader::with_options(StrSource::new(text), options)
        .deserialize()
        .collect()
}

/// Decodes every record of a UTF-8 byte stream into a `T`.
///
/// # Examples
///
/// ```rust
/// use lenient_csv::from_reader;
/// use serde::Deserialize;
/// use std::io::Cursor;
///
/// #[derive(Deserialize)]
/// struct Row { id: u64 }
///
/// let rows: Vec<Row> = from_reader(Cursor::new(b"id\n10\n20\n")).unwrap();
/// assert_eq!(rows.iter().map(|row| row.id).sum::<u64>(), 30);
/// ```
///
/// # Errors
///
/// Returns the first I/O, header, conversion or validation error.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R, T>(reader: R) -> Result<Vec<T>>
where
    R: io::Read,
    T: DeserializeOwned,
{
    Reader::new(ReaderSource::from_read(reader))
        .deserialize()
        .collect()
}
