//! Parser for comma-separated spreadsheet exports.
//!
//! Handles the shape produced by "publish to web as CSV": fields separated by
//! commas, rows separated by `\n` or `\r\n`, and fields optionally wrapped in
//! double quotes. Inside quotes, commas and line breaks are data and `""` is a
//! literal quote character.

use std::iter::Peekable;
use std::mem;
use std::str::Chars;

use crate::table::{Row, Table};

/// Some spreadsheet exports start with one; `str::trim` keeps it.
const BYTE_ORDER_MARK: char = '\u{feff}';

/// Parse a whole feed into a table.
///
/// Quote state carries across line breaks, so a quoted multi-line cell stays a
/// single field. A trailing row without a final newline is still emitted when
/// it has accumulated content. A leading byte order mark is dropped and every
/// field is trimmed; nothing else is validated.
pub fn parse_table(text: &str) -> Table {
    let text = text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(text);
    let mut scanner = Scanner::new(text);
    let mut rows = Vec::new();
    let mut row = Vec::new();

    while let Some(token) = scanner.next_token(true) {
        match token {
            Token::FieldEnd => row.push(scanner.take_field()),
            Token::RowEnd => {
                row.push(scanner.take_field());
                rows.push(Row::new(mem::take(&mut row)));
            }
        }
    }

    if scanner.has_pending() || !row.is_empty() {
        row.push(scanner.take_field());
        rows.push(Row::new(row));
    }

    Table::new(rows)
}

/// Parse a single line into a row.
///
/// Line breaks are not treated specially; callers that split text on newlines
/// themselves get the same quoting rules as [`parse_table`].
pub fn parse_line(line: &str) -> Row {
    let mut scanner = Scanner::new(line);
    let mut fields = Vec::new();

    while let Some(token) = scanner.next_token(false) {
        if let Token::FieldEnd = token {
            fields.push(scanner.take_field());
        }
    }
    fields.push(scanner.take_field());

    Row::new(fields)
}

enum Token {
    FieldEnd,
    RowEnd,
}

/// Character scanner tracking quote state and the field being accumulated.
struct Scanner<'a> {
    chars: Peekable<Chars<'a>>,
    current: String,
    in_quote: bool,
}

impl<'a> Scanner<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            chars: text.chars().peekable(),
            current: String::new(),
            in_quote: false,
        }
    }

    /// Advance to the next field or row boundary, or `None` at end of input.
    fn next_token(&mut self, split_rows: bool) -> Option<Token> {
        while let Some(c) = self.chars.next() {
            match c {
                '"' => {
                    if self.in_quote && self.chars.peek() == Some(&'"') {
                        self.current.push('"');
                        self.chars.next();
                    } else {
                        self.in_quote = !self.in_quote;
                    }
                }
                ',' if !self.in_quote => return Some(Token::FieldEnd),
                '\n' if split_rows && !self.in_quote => return Some(Token::RowEnd),
                '\r' if split_rows && !self.in_quote && self.chars.peek() == Some(&'\n') => {
                    self.chars.next();
                    return Some(Token::RowEnd);
                }
                _ => self.current.push(c),
            }
        }
        None
    }

    fn has_pending(&self) -> bool {
        !self.current.is_empty()
    }

    fn take_field(&mut self) -> String {
        let field = self.current.trim().to_string();
        self.current.clear();
        field
    }
}
