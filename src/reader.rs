//! Parse sessions and the lazy record sequence.
//!
//! A [`Reader`] owns (or borrows, through `&mut S`) one character source and
//! drives the pipeline: type-hint line and header on the first pull, then one
//! tokenized row per record, blank lines skipped. Nothing is read ahead of
//! the record being returned.
//!
//! ## Usage
//!
//! ```rust
//! use lenient_csv::{Reader, StrSource};
//!
//! let mut reader = Reader::new(StrSource::new("id,name\n1,Alice\n\n2,Bob\n"));
//! assert_eq!(reader.header().unwrap().names(), ["id", "name"]);
//!
//! let names: Vec<String> = reader
//!     .records()
//!     .map(|record| record.unwrap().get("name").unwrap().to_string())
//!     .collect();
//! assert_eq!(names, ["Alice", "Bob"]);
//! ```
//!
//! ## Errors
//!
//! A duplicate header name fails the first pull. The session stays failed:
//! [`Reader::read_record`] keeps returning the same error, and the record
//! iterators end after yielding it once. Source I/O errors behave the same.

use crate::de::from_record;
use crate::error::{Error, Result};
use crate::header::{resolve_header, Header};
use crate::options::ReaderOptions;
use crate::record::Record;
use crate::source::CharSource;
use crate::tokenizer::{RawRow, RowMode, Tokenizer};
use serde::de::DeserializeOwned;
use std::iter::FusedIterator;
use std::marker::PhantomData;

#[derive(Debug, Clone, PartialEq)]
enum Phase {
    Start,
    Reading,
    Done,
    Failed(Error),
}

/// A single forward-only parse session over a [`CharSource`].
#[derive(Debug)]
pub struct Reader<S> {
    source: S,
    tokenizer: Tokenizer,
    explicit_header: Option<Header>,
    header: Header,
    type_hint: Option<String>,
    placeholder_prefix: String,
    phase: Phase,
}

impl<S: CharSource> Reader<S> {
    /// Creates a session that reads its header from the first line.
    pub fn new(source: S) -> Self {
        Self::with_options(source, ReaderOptions::default())
    }

    pub fn with_options(source: S, options: ReaderOptions) -> Self {
        Reader {
            source,
            tokenizer: Tokenizer::new(),
            explicit_header: options.header,
            header: Header::default(),
            type_hint: None,
            placeholder_prefix: options.placeholder_prefix,
            phase: Phase::Start,
        }
    }

    /// Resolves and validates the header if that has not happened yet.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateHeader`] when two non-blank names are equal
    /// ignoring case, or [`Error::Io`] if the source failed while reading the
    /// top of the input.
    pub fn header(&mut self) -> Result<&Header> {
        self.ensure_header()?;
        Ok(&self.header)
    }

    /// The `CSV:<name>` annotation from a leading `#Type` line.
    ///
    /// Available once the header has been resolved.
    #[must_use]
    pub fn type_hint(&self) -> Option<&str> {
        self.type_hint.as_deref()
    }

    /// Reads the next non-blank record.
    ///
    /// Returns `Ok(None)` once the source is exhausted.
    ///
    /// # Errors
    ///
    /// Fails with the header validation error, or with [`Error::Io`] if the
    /// source stopped on a read error.
    pub fn read_record(&mut self) -> Result<Option<Record>> {
        self.ensure_header()?;

        while self.phase == Phase::Reading {
            let row = self.tokenizer.next_row(&mut self.source, RowMode::Data);
            if let Some(err) = self.source.take_error() {
                return Err(self.fail(err.into()));
            }
            if row.is_empty() {
                self.phase = Phase::Done;
                break;
            }
            if is_blank_line(&row) {
                tracing::trace!("skipped blank line");
                continue;
            }
            return Ok(Some(Record::build(
                &self.header,
                row,
                &self.placeholder_prefix,
            )));
        }

        Ok(None)
    }

    /// Iterates over the remaining records, borrowing the reader.
    pub fn records(&mut self) -> RecordsIter<'_, S> {
        RecordsIter {
            reader: self,
            done: false,
        }
    }

    /// Iterates over the remaining records, consuming the reader.
    pub fn into_records(self) -> Records<S> {
        Records {
            reader: self,
            done: false,
        }
    }

    /// Iterates over the remaining records converted to `T`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lenient_csv::{Reader, StrSource};
    /// use serde::Deserialize;
    ///
    /// #[derive(Deserialize, Debug, PartialEq)]
    /// struct Point { x: i32, y: i32 }
    ///
    /// let mut reader = Reader::new(StrSource::new("x,y\n1,2\n-3,4\n"));
    /// let points: Vec<Point> = reader.deserialize::<Point>().collect::<Result<_, _>>().unwrap();
    /// assert_eq!(points, vec![Point { x: 1, y: 2 }, Point { x: -3, y: 4 }]);
    /// ```
    pub fn deserialize<T: DeserializeOwned>(&mut self) -> DeserializeRecordsIter<'_, S, T> {
        DeserializeRecordsIter {
            records: self.records(),
            _target: PhantomData,
        }
    }

    /// Consuming counterpart of [`Reader::deserialize`].
    pub fn into_deserialize<T: DeserializeOwned>(self) -> DeserializeRecords<S, T> {
        DeserializeRecords {
            records: self.into_records(),
            _target: PhantomData,
        }
    }

    /// Returns a reference to the character source.
    pub fn get_ref(&self) -> &S {
        &self.source
    }

    /// Ends the session and hands back the character source, positioned
    /// after the last character read.
    pub fn into_inner(self) -> S {
        self.source
    }

    fn ensure_header(&mut self) -> Result<()> {
        if let Phase::Failed(err) = &self.phase {
            return Err(err.clone());
        }
        if self.phase != Phase::Start {
            return Ok(());
        }

        let explicit = self.explicit_header.take();
        let resolved = resolve_header(&mut self.source, &mut self.tokenizer, explicit);
        if let Some(err) = self.source.take_error() {
            return Err(self.fail(err.into()));
        }
        match resolved {
            Ok(resolved) => {
                self.header = resolved.header;
                self.type_hint = resolved.type_hint;
                self.phase = Phase::Reading;
                Ok(())
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    fn fail(&mut self, err: Error) -> Error {
        self.phase = Phase::Failed(err.clone());
        err
    }
}

/// A row made of one empty field is a blank physical line.
fn is_blank_line(row: &RawRow) -> bool {
    matches!(row.as_slice(), [only] if only.is_empty())
}

/// Borrowing iterator over a reader's records.
///
/// Ends after the first error.
#[derive(Debug)]
pub struct RecordsIter<'r, S> {
    reader: &'r mut Reader<S>,
    done: bool,
}

impl<S: CharSource> RecordsIter<'_, S> {
    /// Returns the reader this iterator pulls from.
    pub fn reader(&self) -> &Reader<S> {
        self.reader
    }
}

impl<S: CharSource> Iterator for RecordsIter<'_, S> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        next_record(self.reader, &mut self.done)
    }
}

impl<S: CharSource> FusedIterator for RecordsIter<'_, S> {}

/// Owning iterator over a reader's records; the lazy record sequence
/// returned by [`parse`](crate::parse).
///
/// Ends after the first error.
#[derive(Debug)]
pub struct Records<S> {
    reader: Reader<S>,
    done: bool,
}

impl<S: CharSource> Records<S> {
    /// Returns the underlying reader.
    pub fn reader(&self) -> &Reader<S> {
        &self.reader
    }

    /// Resolves the header without consuming a record.
    ///
    /// # Errors
    ///
    /// See [`Reader::header`].
    pub fn header(&mut self) -> Result<&Header> {
        self.reader.header()
    }

    /// The `CSV:<name>` annotation, once the header has been resolved.
    #[must_use]
    pub fn type_hint(&self) -> Option<&str> {
        self.reader.type_hint()
    }

    pub fn into_reader(self) -> Reader<S> {
        self.reader
    }
}

impl<S: CharSource> Iterator for Records<S> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        next_record(&mut self.reader, &mut self.done)
    }
}

impl<S: CharSource> FusedIterator for Records<S> {}

fn next_record<S: CharSource>(reader: &mut Reader<S>, done: &mut bool) -> Option<Result<Record>> {
    if *done {
        return None;
    }
    match reader.read_record() {
        Ok(Some(record)) => Some(Ok(record)),
        Ok(None) => {
            *done = true;
            None
        }
        Err(err) => {
            *done = true;
            Some(Err(err))
        }
    }
}

/// Borrowing iterator of records converted to `T`.
#[derive(Debug)]
pub struct DeserializeRecordsIter<'r, S, T> {
    records: RecordsIter<'r, S>,
    _target: PhantomData<fn() -> T>,
}

impl<S: CharSource, T: DeserializeOwned> Iterator for DeserializeRecordsIter<'_, S, T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.records
            .next()
            .map(|record| record.and_then(|record| from_record(&record)))
    }
}

/// Owning iterator of records converted to `T`.
#[derive(Debug)]
pub struct DeserializeRecords<S, T> {
    records: Records<S>,
    _target: PhantomData<fn() -> T>,
}

impl<S: CharSource, T: DeserializeOwned> Iterator for DeserializeRecords<S, T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.records
            .next()
            .map(|record| record.and_then(|record| from_record(&record)))
    }
}
