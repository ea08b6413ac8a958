//! Character sources feeding the tokenizer.
//!
//! A parse session only needs a forward-only cursor with one character of
//! lookahead. [`CharSource`] captures that capability; [`StrSource`] serves
//! in-memory text and [`ReaderSource`] decodes any [`BufRead`] one physical
//! line at a time.
//!
//! ## Examples
//!
//! ```rust
//! use lenient_csv::{CharSource, StrSource};
//!
//! let mut source = StrSource::new("ab\ncd");
//! assert_eq!(source.peek(), Some('a'));
//! assert_eq!(source.read_line(), "ab");
//! assert_eq!(source.next_char(), Some('c'));
//! ```

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

const BYTE_ORDER_MARK: char = '\u{feff}';

/// A forward-only character cursor with a single character of lookahead.
///
/// Sources are borrowed by a parse session and never closed by it. Any
/// `&mut S` where `S: CharSource` is itself a source, so callers can keep
/// ownership while a [`Reader`](crate::Reader) runs.
pub trait CharSource {
    /// Returns the next character without consuming it.
    fn peek(&mut self) -> Option<char>;

    /// Consumes and returns the next character.
    fn next_char(&mut self) -> Option<char>;

    /// Returns `true` once no characters remain.
    fn at_end(&mut self) -> bool {
        self.peek().is_none()
    }

    /// Consumes the next character if it equals `expected`.
    fn next_if_eq(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.next_char();
            true
        } else {
            false
        }
    }

    /// Consumes one physical line and returns it without its terminator.
    ///
    /// A line ends at `\n`, `\r\n`, a lone `\r`, or the end of input.
    fn read_line(&mut self) -> String {
        let mut line = String::new();
        while let Some(ch) = self.next_char() {
            match ch {
                '\n' => break,
                '\r' => {
                    self.next_if_eq('\n');
                    break;
                }
                _ => line.push(ch),
            }
        }
        line
    }

    /// Hands over an error that made the source stop early, if any.
    ///
    /// Sources that fail report end-of-input from then on and keep the
    /// error here until a session collects it.
    fn take_error(&mut self) -> Option<io::Error> {
        None
    }
}

impl<S: CharSource + ?Sized> CharSource for &mut S {
    fn peek(&mut self) -> Option<char> {
        (**self).peek()
    }

    fn next_char(&mut self) -> Option<char> {
        (**self).next_char()
    }

    fn at_end(&mut self) -> bool {
        (**self).at_end()
    }

    fn next_if_eq(&mut self, expected: char) -> bool {
        (**self).next_if_eq(expected)
    }

    fn read_line(&mut self) -> String {
        (**self).read_line()
    }

    fn take_error(&mut self) -> Option<io::Error> {
        (**self).take_error()
    }
}

/// A character source over borrowed text.
///
/// A single leading byte-order mark is skipped.
#[derive(Debug, Clone)]
pub struct StrSource<'a> {
    input: &'a str,
    position: usize,
}

impl<'a> StrSource<'a> {
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        StrSource {
            input: input.strip_prefix(BYTE_ORDER_MARK).unwrap_or(input),
            position: 0,
        }
    }

    /// Byte offset of the cursor into the (BOM-stripped) input.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// The text not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> &'a str {
        &self.input[self.position..]
    }
}

impl CharSource for StrSource<'_> {
    fn peek(&mut self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn next_char(&mut self) -> Option<char> {
        let ch = self.input[self.position..].chars().next()?;
        self.position += ch.len_utf8();
        Some(ch)
    }

    fn at_end(&mut self) -> bool {
        self.position >= self.input.len()
    }
}

/// A character source decoding UTF-8 from a buffered reader.
///
/// Input is pulled one physical line at a time, so memory use is bounded by
/// the longest line rather than the whole stream. The first read or decoding
/// error ends the stream and is kept for [`CharSource::take_error`].
#[derive(Debug)]
pub struct ReaderSource<R> {
    reader: R,
    line: String,
    position: usize,
    started: bool,
    exhausted: bool,
    error: Option<io::Error>,
}

impl<R: BufRead> ReaderSource<R> {
    pub fn new(reader: R) -> Self {
        ReaderSource {
            reader,
            line: String::new(),
            position: 0,
            started: false,
            exhausted: false,
            error: None,
        }
    }

    /// Returns a reference to the underlying reader.
    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    /// Unwraps the underlying reader. Buffered but unread text is lost.
    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Makes sure the line buffer has an unread character, reading the next
    /// physical line when needed. Returns `false` at end of input.
    fn fill(&mut self) -> bool {
        loop {
            if self.position < self.line.len() {
                return true;
            }
            if self.exhausted {
                return false;
            }

            self.line.clear();
            self.position = 0;
            match self.reader.read_line(&mut self.line) {
                Ok(0) => self.exhausted = true,
                Ok(_) => {
                    if !self.started && self.line.starts_with(BYTE_ORDER_MARK) {
                        self.position = BYTE_ORDER_MARK.len_utf8();
                    }
                }
                Err(err) => {
                    self.error = Some(err);
                    self.exhausted = true;
                }
            }
            self.started = true;
        }
    }
}

impl<R: Read> ReaderSource<BufReader<R>> {
    /// Wraps an unbuffered reader in a [`BufReader`].
    pub fn from_read(reader: R) -> Self {
        ReaderSource::new(BufReader::new(reader))
    }
}

impl ReaderSource<BufReader<File>> {
    /// Opens a file for streaming.
    ///
    /// # Errors
    ///
    /// Returns the error from [`File::open`].
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        Ok(ReaderSource::from_read(File::open(path)?))
    }
}

impl<R: BufRead> CharSource for ReaderSource<R> {
    fn peek(&mut self) -> Option<char> {
        if !self.fill() {
            return None;
        }
        self.line[self.position..].chars().next()
    }

    fn next_char(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += ch.len_utf8();
        Some(ch)
    }

    fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn drain<S: CharSource>(mut source: S) -> String {
        let mut out = String::new();
        while let Some(ch) = source.next_char() {
            out.push(ch);
        }
        out
    }

    #[test]
    fn test_str_source_peek_does_not_consume() {
        let mut source = StrSource::new("xy");
        assert_eq!(source.peek(), Some('x'));
        assert_eq!(source.peek(), Some('x'));
        assert_eq!(source.next_char(), Some('x'));
        assert_eq!(source.remaining(), "y");
        assert!(!source.at_end());
        assert_eq!(source.next_char(), Some('y'));
        assert!(source.at_end());
        assert_eq!(source.next_char(), None);
    }

    #[test]
    fn test_str_source_multibyte() {
        let mut source = StrSource::new("é,ü");
        assert_eq!(source.next_char(), Some('é'));
        assert_eq!(source.position(), 2);
        assert_eq!(drain(source), ",ü");
    }

    #[test]
    fn test_bom_is_skipped() {
        assert_eq!(drain(StrSource::new("\u{feff}a,b")), "a,b");
        assert_eq!(
            drain(ReaderSource::new(Cursor::new("\u{feff}a\nb"))),
            "a\nb"
        );
    }

    #[test]
    fn test_bom_only_input_is_empty() {
        let mut source = ReaderSource::new(Cursor::new("\u{feff}"));
        assert!(source.at_end());
    }

    #[test]
    fn test_read_line_terminators() {
        let mut source = StrSource::new("one\r\ntwo\rthree\nfour");
        assert_eq!(source.read_line(), "one");
        assert_eq!(source.read_line(), "two");
        assert_eq!(source.read_line(), "three");
        assert_eq!(source.read_line(), "four");
        assert!(source.at_end());
        assert_eq!(source.read_line(), "");
    }

    #[test]
    fn test_reader_source_crosses_lines() {
        let source = ReaderSource::new(Cursor::new("a,b\r\n\"c\nd\"\n"));
        assert_eq!(drain(source), "a,b\r\n\"c\nd\"\n");
    }

    #[test]
    fn test_reader_source_latches_invalid_utf8() {
        let bytes: &[u8] = b"ok\n\xff\xfe\n";
        let mut source = ReaderSource::new(Cursor::new(bytes));
        assert_eq!(source.read_line(), "ok");
        assert!(source.at_end());
        let err = source.take_error().expect("decoding error");
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert!(source.take_error().is_none());
    }

    #[test]
    fn test_mut_ref_is_a_source() {
        fn skip_ab<S: CharSource>(mut source: S) -> bool {
            source.next_if_eq('a') && source.next_if_eq('b') && !source.next_if_eq('x')
        }

        let mut source = StrSource::new("abc");
        assert!(skip_ab(&mut source));
        assert_eq!(source.remaining(), "c");
    }
}
