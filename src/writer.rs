//! Encoding records back to text in the same dialect.
//!
//! Output decodes to the same values through [`parse`](crate::parse). A
//! field is quoted when it contains a delimiter, quote or line break, when it
//! starts or ends with a space or tab (the decoder would drop or merge those),
//! or when it starts with `#` (so a leading header name is never taken for a
//! type-hint line). Quotes inside quoted fields are doubled. Absent values
//! are written as empty fields, and every record ends with `\n`.
//!
//! Once a header is written, each record is written by header position: the
//! value for a column is looked up under its name, or under its placeholder
//! name (`H1`, `H2`, ...) when the name is blank. A placeholder that equals a
//! real header name therefore repeats that field's value in both columns,
//! which decodes back to the same record.
//!
//! Two shapes cannot survive a round trip: a one-column record whose value is
//! empty is written as a blank line, which the decoder skips, and trailing
//! blank header names are trimmed when the header is read back.
//!
//! ## Examples
//!
//! ```rust
//! use lenient_csv::{parse, to_string, Header};
//!
//! let header = Header::from(vec!["name", "note"]);
//! let records: Vec<_> = parse("name,note\nAda,\"said \"\"hi\"\"\"\n", None)
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//! let text = to_string(&header, &records).unwrap();
//! assert_eq!(text, "name,note\nAda,\"said \"\"hi\"\"\"\n");
//! ```

use crate::error::Result;
use crate::header::Header;
use crate::record::{field_keys, Record, DEFAULT_PLACEHOLDER_PREFIX};
use crate::tokenizer::{DELIMITER, QUOTE};
use std::io::{self, Write};

/// Writes a header, records and an optional type-hint line to a sink.
#[derive(Debug)]
pub struct Writer<W: Write> {
    sink: W,
    line: String,
    columns: Option<Vec<String>>,
    placeholder_prefix: String,
}

impl<W: Write> Writer<W> {
    pub fn new(sink: W) -> Self {
        Writer {
            sink,
            line: String::new(),
            columns: None,
            placeholder_prefix: DEFAULT_PLACEHOLDER_PREFIX.to_string(),
        }
    }

    /// Sets the prefix used to name blank header columns; it must match the
    /// prefix the output will be read back with.
    #[must_use]
    pub fn with_placeholder_prefix(mut self, prefix: &str) -> Self {
        self.placeholder_prefix = prefix.to_string();
        self
    }

    /// Writes a `#TYPE <name>` line. Must come before the header to be
    /// recognized when reading back.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`](crate::Error::Io) if the sink fails.
    pub fn write_type_hint(&mut self, name: &str) -> Result<()> {
        self.line.clear();
        self.line.push_str("#TYPE ");
        self.line.extend(
            name.chars()
                .filter(|ch| *ch != '\n' && *ch != '\r'),
        );
        self.line.push('\n');
        self.emit()
    }

    /// Writes the header line and fixes the column layout of later records.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`](crate::Error::Io) if the sink fails.
    pub fn write_header(&mut self, header: &Header) -> Result<()> {
        self.columns = Some(field_keys(header, &self.placeholder_prefix).collect());
        self.write_fields(header.iter().map(|name| Some(name.as_str())))
    }

    /// Writes a record. After [`write_header`](Self::write_header), values
    /// follow the header's columns and missing fields become empty; before
    /// it, values follow the record's own field order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`](crate::Error::Io) if the sink fails.
    pub fn write_record(&mut self, record: &Record) -> Result<()> {
        match self.columns.take() {
            Some(columns) => {
                let result = self.write_fields(
                    columns
                        .iter()
                        .map(|key| record.get_field(key).flatten()),
                );
                self.columns = Some(columns);
                result
            }
            None => self.write_fields(record.values().map(|value| value.as_deref())),
        }
    }

    /// Writes one line of raw values; `None` becomes an empty field.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`](crate::Error::Io) if the sink fails.
    pub fn write_fields<'a, I>(&mut self, fields: I) -> Result<()>
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        self.line.clear();
        for (i, field) in fields.into_iter().enumerate() {
            if i > 0 {
                self.line.push(DELIMITER);
            }
            encode_field(field.unwrap_or(""), &mut self.line);
        }
        self.line.push('\n');
        self.emit()
    }

    /// # Errors
    ///
    /// Returns [`Error::Io`](crate::Error::Io) if the sink fails.
    pub fn flush(&mut self) -> Result<()> {
        self.sink.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.sink
    }

    fn emit(&mut self) -> Result<()> {
        self.sink.write_all(self.line.as_bytes())?;
        Ok(())
    }
}

/// Encodes a header and records into a string.
///
/// # Errors
///
/// Never fails in practice: writing to a `Vec<u8>` cannot fail.
pub fn to_string<'a, I>(header: &Header, records: I) -> Result<String>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut writer = Writer::new(Vec::new());
    writer.write_header(header)?;
    for record in records {
        writer.write_record(record)?;
    }
    String::from_utf8(writer.into_inner())
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err).into())
}

fn encode_field(field: &str, out: &mut String) {
    if !needs_quoting(field) {
        out.push_str(field);
        return;
    }

    out.push(QUOTE);
    for ch in field.chars() {
        if ch == QUOTE {
            out.push(QUOTE);
        }
        out.push(ch);
    }
    out.push(QUOTE);
}

fn needs_quoting(field: &str) -> bool {
    let is_blank = |ch: char| ch == ' ' || ch == '\t';
    field.starts_with(is_blank)
        || field.ends_with(is_blank)
        || field.starts_with('#')
        || field
            .chars()
            .any(|ch| ch == DELIMITER || ch == QUOTE || ch == '\n' || ch == '\r')
}
