//! The character-level record tokenizer.
//!
//! [`Tokenizer::next_row`] scans one logical CSV line (which may span several
//! physical lines when a quoted field contains newlines) and returns its raw
//! field values. The scanner is a two-state machine, unquoted and quoted;
//! every input class has its own transition method.
//!
//! ## Dialect
//!
//! - `,` separates fields, `"` quotes them, `""` inside quotes is a literal quote
//! - `\n` and `\r\n` end a record outside quotes and are kept verbatim inside
//! - a lone `\r` is an ordinary character
//! - leading spaces and tabs of an unquoted field are dropped
//!
//! ## Recovery rules
//!
//! The tokenizer never fails. Anything that follows a closing quote, or a
//! quote that appears in the middle of an unquoted field, is merged into the
//! same field up to the next delimiter or line end. When that trailing text
//! is only spaces and tabs it is dropped, except after a stray mid-field
//! quote where it is kept as written. An unterminated quote simply runs to
//! the end of input.
//!
//! ```rust
//! use lenient_csv::{RowMode, StrSource, Tokenizer};
//!
//! let mut source = StrSource::new("a, \"b,c\" ,\"say \"\"hi\"\"\"\n");
//! let mut tokenizer = Tokenizer::new();
//! let row = tokenizer.next_row(&mut source, RowMode::Data);
//! assert_eq!(row, vec!["a", "b,c", "say \"hi\""]);
//! ```

use crate::source::CharSource;

pub(crate) const DELIMITER: char = ',';
pub(crate) const QUOTE: char = '"';

/// Raw field values of one logical line, before header names are applied.
pub type RawRow = Vec<String>;

/// Quoting state of the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum State {
    #[default]
    Unquoted,
    Quoted,
}

/// Whether a row is read as the header or as data.
///
/// Header rows lose their trailing empty fields (as long as more than one
/// field remains), so a header line ending in stray delimiters does not
/// produce placeholder columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowMode {
    Header,
    Data,
}

/// Outcome of one transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Continue,
    EndOfRecord,
}

/// Scans records one at a time, reusing a single field buffer.
///
/// A tokenizer belongs to one parse session; it carries no state between
/// rows besides the buffer's capacity.
#[derive(Debug, Default)]
pub struct Tokenizer {
    buffer: String,
    state: State,
}

impl Tokenizer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the next record's raw fields from `source`.
    ///
    /// Returns an empty row only when the source is already exhausted. A
    /// blank physical line yields `[""]`; callers decide whether to skip it.
    pub fn next_row<S: CharSource + ?Sized>(&mut self, source: &mut S, mode: RowMode) -> RawRow {
        let mut row = RawRow::new();
        self.buffer.clear();
        self.state = State::Unquoted;

        while let Some(ch) = source.next_char() {
            let step = match ch {
                DELIMITER => self.on_delimiter(&mut row),
                QUOTE => self.on_quote(source, &mut row),
                ' ' | '\t' => self.on_blank(source, &mut row, ch),
                '\n' => self.on_line_end(source, &mut row, ch),
                '\r' if source.peek() == Some('\n') => self.on_line_end(source, &mut row, ch),
                _ => {
                    self.buffer.push(ch);
                    Step::Continue
                }
            };
            if step == Step::EndOfRecord {
                break;
            }
        }

        if !self.buffer.is_empty() {
            self.flush(&mut row);
        }

        if mode == RowMode::Header {
            while row.len() > 1 && row.last().is_some_and(String::is_empty) {
                row.pop();
            }
        }

        row
    }

    fn flush(&mut self, row: &mut RawRow) {
        row.push(self.buffer.clone());
        self.buffer.clear();
    }

    fn on_delimiter(&mut self, row: &mut RawRow) -> Step {
        match self.state {
            State::Unquoted => self.flush(row),
            State::Quoted => self.buffer.push(DELIMITER),
        }
        Step::Continue
    }

    fn on_quote<S: CharSource + ?Sized>(&mut self, source: &mut S, row: &mut RawRow) -> Step {
        match self.state {
            State::Quoted => {
                if source.next_if_eq(QUOTE) {
                    self.buffer.push(QUOTE);
                    Step::Continue
                } else {
                    self.state = State::Unquoted;
                    self.finish_field(source, row, true)
                }
            }
            State::Unquoted if !self.buffer.is_empty() => {
                // abc"def: the quote is data, not a mode switch.
                self.buffer.push(QUOTE);
                self.finish_field(source, row, false)
            }
            State::Unquoted => {
                self.state = State::Quoted;
                Step::Continue
            }
        }
    }

    fn on_blank<S: CharSource + ?Sized>(
        &mut self,
        source: &mut S,
        row: &mut RawRow,
        ch: char,
    ) -> Step {
        match self.state {
            State::Quoted => {
                self.buffer.push(ch);
                Step::Continue
            }
            State::Unquoted if self.buffer.is_empty() => Step::Continue,
            State::Unquoted => {
                self.buffer.push(ch);
                self.finish_field(source, row, true)
            }
        }
    }

    /// `ch` is `\n`, or a `\r` whose `\n` is still pending in `source`.
    fn on_line_end<S: CharSource + ?Sized>(
        &mut self,
        source: &mut S,
        row: &mut RawRow,
        ch: char,
    ) -> Step {
        if ch == '\r' {
            source.next_char();
        }
        match self.state {
            State::Unquoted => {
                self.flush(row);
                Step::EndOfRecord
            }
            State::Quoted => {
                self.buffer.push(ch);
                if ch == '\r' {
                    self.buffer.push('\n');
                }
                Step::Continue
            }
        }
    }

    /// Appends everything up to the next delimiter or line end to the current
    /// field and flushes it.
    ///
    /// With `trim_blank_tail`, a tail made only of spaces and tabs is dropped.
    /// Reports `EndOfRecord` when the scan stopped at a line end or at the end
    /// of input.
    fn finish_field<S: CharSource + ?Sized>(
        &mut self,
        source: &mut S,
        row: &mut RawRow,
        trim_blank_tail: bool,
    ) -> Step {
        let tail_start = self.buffer.len();
        let mut has_content = false;

        let step = loop {
            match source.next_char() {
                None => break Step::EndOfRecord,
                Some(DELIMITER) => break Step::Continue,
                Some('\n') => break Step::EndOfRecord,
                Some('\r') if source.peek() == Some('\n') => {
                    source.next_char();
                    break Step::EndOfRecord;
                }
                Some(ch) => {
                    if ch != ' ' && ch != '\t' {
                        has_content = true;
                    }
                    self.buffer.push(ch);
                }
            }
        };

        if trim_blank_tail && !has_content {
            self.buffer.truncate(tail_start);
        }
        self.flush(row);
        step
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::StrSource;

    fn data_rows(input: &str) -> Vec<RawRow> {
        let mut source = StrSource::new(input);
        let mut tokenizer = Tokenizer::new();
        let mut rows = Vec::new();
        loop {
            let row = tokenizer.next_row(&mut source, RowMode::Data);
            if row.is_empty() {
                return rows;
            }
            rows.push(row);
        }
    }

    fn one_row(input: &str, mode: RowMode) -> RawRow {
        Tokenizer::new().next_row(&mut StrSource::new(input), mode)
    }

    #[test]
    fn test_simple_fields() {
        assert_eq!(data_rows("a,b,c\n1,2,3\n"), vec![
            vec!["a", "b", "c"],
            vec!["1", "2", "3"]
        ]);
    }

    #[test]
    fn test_exhausted_source_yields_empty_row() {
        assert!(one_row("", RowMode::Data).is_empty());
    }

    #[test]
    fn test_blank_line_is_single_empty_field() {
        assert_eq!(data_rows("\n\r\n"), vec![vec![""], vec![""]]);
    }

    #[test]
    fn test_quoted_delimiter() {
        assert_eq!(one_row("a,\"b,c\",d", RowMode::Data), vec!["a", "b,c", "d"]);
    }

    #[test]
    fn test_escaped_quote() {
        assert_eq!(
            one_row("\"say \"\"hi\"\"\"\n", RowMode::Data),
            vec!["say \"hi\""]
        );
        assert_eq!(one_row("\"\"\"\"", RowMode::Data), vec!["\""]);
    }

    #[test]
    fn test_quoted_newlines_are_preserved() {
        assert_eq!(data_rows("\"line1\nline2\",v2\n"), vec![vec![
            "line1\nline2",
            "v2"
        ]]);
        assert_eq!(data_rows("\"x\r\ny\",z\r\n"), vec![vec!["x\r\ny", "z"]]);
    }

    #[test]
    fn test_crlf_ends_record() {
        assert_eq!(data_rows("a,b\r\nc,d"), vec![vec!["a", "b"], vec!["c", "d"]]);
    }

    #[test]
    fn test_lone_carriage_return_is_data() {
        assert_eq!(one_row("a\rb,c\n", RowMode::Data), vec!["a\rb", "c"]);
    }

    #[test]
    fn test_leading_blanks_are_skipped() {
        assert_eq!(one_row("  a,\tb\n", RowMode::Data), vec!["a", "b"]);
    }

    #[test]
    fn test_inner_blank_keeps_following_text() {
        assert_eq!(one_row("hello world,x\n", RowMode::Data), vec![
            "hello world",
            "x"
        ]);
    }

    #[test]
    fn test_trailing_blanks_keep_first_blank() {
        // The blank that starts the tail is already in the field; only the
        // rest of an all-blank tail is dropped.
        assert_eq!(one_row("abc   ,x\n", RowMode::Data), vec!["abc ", "x"]);
        assert_eq!(one_row("abc \n", RowMode::Data), vec!["abc "]);
    }

    #[test]
    fn test_blanks_inside_quotes_are_literal() {
        assert_eq!(one_row("\"  a\t \",b\n", RowMode::Data), vec!["  a\t ", "b"]);
    }

    #[test]
    fn test_blank_tail_after_closing_quote_is_dropped() {
        assert_eq!(one_row("\"abc\"   ,x\n", RowMode::Data), vec!["abc", "x"]);
    }

    #[test]
    fn test_text_after_closing_quote_is_merged() {
        assert_eq!(one_row("\"abc\"def,x\n", RowMode::Data), vec!["abcdef", "x"]);
        assert_eq!(one_row("\"abc\" def\n", RowMode::Data), vec!["abc def"]);
    }

    #[test]
    fn test_quote_inside_unquoted_field_is_literal() {
        assert_eq!(one_row("abc\"def,x\n", RowMode::Data), vec!["abc\"def", "x"]);
        // Blank tails after a stray quote are not trimmed.
        assert_eq!(one_row("ab\"  ,x\n", RowMode::Data), vec!["ab\"  ", "x"]);
    }

    #[test]
    fn test_merge_stops_at_line_end() {
        assert_eq!(data_rows("\"a\"b\nc\n"), vec![vec!["ab"], vec!["c"]]);
        assert_eq!(data_rows("x y\r\nz"), vec![vec!["x y"], vec!["z"]]);
    }

    #[test]
    fn test_unterminated_quote_runs_to_end() {
        assert_eq!(data_rows("a,\"b\nc,d\n"), vec![vec!["a", "b\nc,d\n"]]);
    }

    #[test]
    fn test_empty_fields() {
        assert_eq!(one_row("a,,c\n", RowMode::Data), vec!["a", "", "c"]);
        assert_eq!(one_row(",,\n", RowMode::Data), vec!["", "", ""]);
    }

    #[test]
    fn test_trailing_empty_field_at_end_of_input_is_dropped() {
        assert_eq!(one_row("a,", RowMode::Data), vec!["a"]);
        assert_eq!(one_row("a,\n", RowMode::Data), vec!["a", ""]);
    }

    #[test]
    fn test_quoted_empty_at_end_of_input() {
        assert_eq!(one_row("\"\"", RowMode::Data), vec![""]);
        assert_eq!(one_row("\"\",\"\"\n", RowMode::Data), vec!["", ""]);
    }

    #[test]
    fn test_header_mode_trims_trailing_empty_fields() {
        assert_eq!(one_row("a,b,,,\n", RowMode::Header), vec!["a", "b"]);
        assert_eq!(one_row("a,b,,,\n", RowMode::Data), vec!["a", "b", "", "", ""]);
        assert_eq!(one_row(",,\n", RowMode::Header), vec![""]);
        assert_eq!(one_row("a,,b,\n", RowMode::Header), vec!["a", "", "b"]);
    }

    #[test]
    fn test_state_resets_between_rows() {
        let mut source = StrSource::new("\"open\n");
        let mut tokenizer = Tokenizer::new();
        assert_eq!(tokenizer.next_row(&mut source, RowMode::Data), vec!["open\n"]);
        assert_eq!(tokenizer.state, State::Quoted);

        let mut source = StrSource::new("x\n");
        assert_eq!(tokenizer.next_row(&mut source, RowMode::Data), vec!["x"]);
        assert_eq!(tokenizer.state, State::Unquoted);
    }

    #[test]
    fn test_multibyte_content() {
        assert_eq!(one_row("né,\"ü,ß\"\n", RowMode::Data), vec!["né", "ü,ß"]);
    }
}
