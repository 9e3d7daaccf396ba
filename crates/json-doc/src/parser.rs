//! Lenient JSON parser: converts JSON text into a [`Value`] tree.
//!
//! Recursive descent over a single forward byte index, dispatching on one byte
//! of lookahead. The parser **never fails**. Malformed input degrades locally:
//!
//! - an unrecognized token becomes `Null` and is skipped up to the next delimiter
//! - a malformed number becomes `0`
//! - an unterminated string keeps the characters read so far
//! - a container cut off by end-of-input keeps the entries read so far
//! - nesting deeper than [`ParseOptions::max_depth`] becomes `Null`
//!
//! Every such anomaly is recorded as a [`Diagnostic`]. [`parse`] drops them,
//! [`parse_with_diagnostics`] returns them, and [`parse_strict`] turns the first
//! one into an error.
//!
//! Number text outside the strict grammar (`01`, `1.`, `-.5`) keeps its value
//! but is reported as [`DiagnosticKind::InvalidNumber`]. Raw control characters
//! inside strings are accepted by every entry point, since the serializer
//! writes them unescaped.
//!
//! # Example
//! ```
//! use json_doc::parser::{parse, parse_with_diagnostics};
//!
//! let v = parse(r#"{"a": [1, 2.5, true], "b": null}"#);
//! assert_eq!(v["a"][1].as_f64(), Some(2.5));
//!
//! let (v, diagnostics) = parse_with_diagnostics("[1, oops, 3]");
//! assert_eq!(v.to_json(false), "[1,null,3]");
//! assert_eq!(diagnostics.len(), 1);
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::{JsonDocError, Result};
use crate::value::{Map, Value};

/// Parser limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Maximum container nesting. Deeper containers are replaced by `Null`.
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self { max_depth: 128 }
    }
}

/// What went wrong at a [`Diagnostic`] position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// A character that cannot start or continue the current construct.
    UnexpectedCharacter(char),
    /// Input ended where a value or closing bracket was expected.
    UnexpectedEnd,
    /// A token starting with `t`, `f`, or `n` that is not `true`/`false`/`null`.
    InvalidLiteral,
    /// Number text that does not form a valid number (`-`, `1.2.3`), which
    /// becomes `0`, or that reads as a number outside the strict grammar
    /// (`01`, `1.`, `-.5`), which keeps its value.
    InvalidNumber,
    /// An unknown escape or an invalid `\u` sequence.
    InvalidEscape,
    UnterminatedString,
    /// An object entry did not start with a quoted key.
    ExpectedKey,
    ExpectedColon,
    /// A `,` directly before a closing bracket.
    TrailingComma,
    DepthLimit,
    /// Non-whitespace text after the root value.
    TrailingCharacters,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::UnexpectedCharacter(c) => write!(f, "unexpected character {c:?}"),
            DiagnosticKind::UnexpectedEnd => f.write_str("unexpected end of input"),
            DiagnosticKind::InvalidLiteral => f.write_str("invalid literal"),
            DiagnosticKind::InvalidNumber => f.write_str("invalid number"),
            DiagnosticKind::InvalidEscape => f.write_str("invalid escape sequence"),
            DiagnosticKind::UnterminatedString => f.write_str("unterminated string"),
            DiagnosticKind::ExpectedKey => f.write_str("expected a quoted object key"),
            DiagnosticKind::ExpectedColon => f.write_str("expected ':' after object key"),
            DiagnosticKind::TrailingComma => f.write_str("trailing comma"),
            DiagnosticKind::DepthLimit => f.write_str("nesting depth limit exceeded"),
            DiagnosticKind::TrailingCharacters => f.write_str("trailing characters after value"),
        }
    }
}

/// A parse anomaly and the byte offset where it was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Diagnostic {
    pub offset: usize,
    pub kind: DiagnosticKind,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at byte {}", self.kind, self.offset)
    }
}

/// Parse `text` best-effort. Never fails; anomalies degrade to `Null` subtrees.
pub fn parse(text: &str) -> Value {
    parse_with(text, &ParseOptions::default()).0
}

/// Parse `text` best-effort and also return every anomaly encountered.
pub fn parse_with_diagnostics(text: &str) -> (Value, Vec<Diagnostic>) {
    parse_with(text, &ParseOptions::default())
}

pub fn parse_with(text: &str, options: &ParseOptions) -> (Value, Vec<Diagnostic>) {
    let mut parser = Parser::new(text, options);
    let value = parser.parse_document();
    (value, parser.diagnostics)
}

/// Parse `text`, rejecting any input the lenient parser would have had to repair.
pub fn parse_strict(text: &str) -> Result<Value> {
    let (value, diagnostics) = parse_with_diagnostics(text);
    match diagnostics.first() {
        Some(d) => Err(JsonDocError::Parse {
            offset: d.offset,
            message: d.kind.to_string(),
        }),
        None => Ok(value),
    }
}

impl Value {
    /// Best-effort parse; see [`parse`].
    pub fn parse(text: &str) -> Value {
        parse(text)
    }

    /// Strict parse; see [`parse_strict`].
    pub fn parse_strict(text: &str) -> Result<Value> {
        parse_strict(text)
    }
}

/// `str::parse::<Value>()` goes through the strict parser.
impl FromStr for Value {
    type Err = JsonDocError;

    fn from_str(s: &str) -> Result<Self> {
        parse_strict(s)
    }
}

struct Parser<'a> {
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
    depth: usize,
    options: &'a ParseOptions,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str, options: &'a ParseOptions) -> Self {
        Self {
            text,
            bytes: text.as_bytes(),
            pos: 0,
            depth: 0,
            options,
            diagnostics: Vec::new(),
        }
    }

    fn parse_document(&mut self) -> Value {
        let value = self.parse_value();
        self.skip_whitespace();
        if self.pos < self.bytes.len() {
            self.report(DiagnosticKind::TrailingCharacters);
        }
        value
    }

    fn report(&mut self, kind: DiagnosticKind) {
        log::debug!("json parse anomaly at byte {}: {}", self.pos, kind);
        self.diagnostics.push(Diagnostic {
            offset: self.pos,
            kind,
        });
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    /// The full character at the cursor. `pos` only ever rests on ASCII bytes
    /// or the end of input, so slicing here stays on a char boundary.
    fn peek_char(&self) -> Option<char> {
        self.text.get(self.pos..).and_then(|rest| rest.chars().next())
    }

    fn advance_char(&mut self) {
        if let Some(c) = self.peek_char() {
            self.pos += c.len_utf8();
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(b' ' | b'\t' | b'\n' | b'\r') = self.peek() {
            self.pos += 1;
        }
    }

    /// Skip a garbage token: at least one character, then up to the next
    /// delimiter or whitespace.
    fn skip_token(&mut self) {
        self.advance_char();
        while let Some(b) = self.peek() {
            if is_delimiter(b) {
                break;
            }
            self.pos += 1;
        }
    }

    fn parse_value(&mut self) -> Value {
        self.skip_whitespace();
        match self.peek() {
            None => {
                self.report(DiagnosticKind::UnexpectedEnd);
                Value::Null
            }
            Some(b'{') => self.nested(Self::parse_object),
            Some(b'[') => self.nested(Self::parse_array),
            Some(b'"') => Value::String(self.parse_string()),
            Some(b't') => self.parse_literal("true", Value::Bool(true)),
            Some(b'f') => self.parse_literal("false", Value::Bool(false)),
            Some(b'n') => self.parse_literal("null", Value::Null),
            Some(b'-' | b'0'..=b'9') => self.parse_number(),
            Some(b) => {
                let c = self.peek_char().unwrap_or(char::from(b));
                self.report(DiagnosticKind::UnexpectedCharacter(c));
                // Structural characters belong to the enclosing container.
                if !matches!(b, b',' | b':' | b']' | b'}') {
                    self.skip_token();
                }
                Value::Null
            }
        }
    }

    /// Enter a container, or skip it whole once the depth limit is reached.
    fn nested(&mut self, parse: fn(&mut Self) -> Value) -> Value {
        if self.depth >= self.options.max_depth {
            self.report(DiagnosticKind::DepthLimit);
            self.skip_container();
            return Value::Null;
        }
        self.depth += 1;
        let value = parse(self);
        self.depth -= 1;
        value
    }

    /// Skip a bracketed region without recursion, honoring strings.
    fn skip_container(&mut self) {
        let mut open = 0usize;
        while let Some(b) = self.peek() {
            match b {
                b'"' => {
                    self.parse_string();
                    continue;
                }
                b'{' | b'[' => open += 1,
                b'}' | b']' => {
                    open = open.saturating_sub(1);
                    if open == 0 {
                        self.pos += 1;
                        return;
                    }
                }
                _ => {}
            }
            self.pos += 1;
        }
    }

    fn parse_object(&mut self) -> Value {
        self.pos += 1; // '{'
        let mut map = Map::new();
        loop {
            let start = self.pos;
            self.skip_whitespace();
            match self.peek() {
                None => {
                    self.report(DiagnosticKind::UnexpectedEnd);
                    break;
                }
                Some(b'}') => {
                    self.pos += 1;
                    break;
                }
                Some(b'"') => {}
                Some(_) => {
                    self.report(DiagnosticKind::ExpectedKey);
                    self.skip_token();
                    continue;
                }
            }

            let key = self.parse_string();
            self.skip_whitespace();
            if self.peek() == Some(b':') {
                self.pos += 1;
            } else {
                self.report(DiagnosticKind::ExpectedColon);
            }
            let value = self.parse_value();
            map.insert(key, value);

            self.after_entry(b'}');
            if self.pos == start {
                self.advance_char();
            }
        }
        Value::Object(map)
    }

    fn parse_array(&mut self) -> Value {
        self.pos += 1; // '['
        let mut items = Vec::new();
        loop {
            let start = self.pos;
            self.skip_whitespace();
            match self.peek() {
                None => {
                    self.report(DiagnosticKind::UnexpectedEnd);
                    break;
                }
                Some(b']') => {
                    self.pos += 1;
                    break;
                }
                Some(b @ (b',' | b':' | b'}')) => {
                    self.report(DiagnosticKind::UnexpectedCharacter(char::from(b)));
                    self.pos += 1;
                    continue;
                }
                Some(_) => {}
            }

            items.push(self.parse_value());

            self.after_entry(b']');
            if self.pos == start {
                self.advance_char();
            }
        }
        Value::Array(items)
    }

    /// Consume the separator after a container entry, if present.
    fn after_entry(&mut self, close: u8) {
        self.skip_whitespace();
        match self.peek() {
            Some(b',') => {
                self.pos += 1;
                self.skip_whitespace();
                if self.peek() == Some(close) {
                    self.report(DiagnosticKind::TrailingComma);
                }
            }
            Some(b) if b == close => {}
            None => {}
            Some(b) => {
                let c = self.peek_char().unwrap_or(char::from(b));
                self.report(DiagnosticKind::UnexpectedCharacter(c));
            }
        }
    }

    /// Parse a quoted string; the cursor must be on the opening quote.
    fn parse_string(&mut self) -> String {
        self.pos += 1; // opening '"'
        let mut out = String::new();
        let mut run_start = self.pos;
        while let Some(b) = self.peek() {
            match b {
                b'"' => {
                    out.push_str(&self.text[run_start..self.pos]);
                    self.pos += 1;
                    return out;
                }
                b'\\' => {
                    out.push_str(&self.text[run_start..self.pos]);
                    self.pos += 1;
                    self.parse_escape(&mut out);
                    run_start = self.pos;
                }
                _ => self.pos += 1,
            }
        }
        out.push_str(&self.text[run_start..]);
        self.report(DiagnosticKind::UnterminatedString);
        out
    }

    /// Decode one escape; the cursor is just past the backslash. Unknown
    /// escapes yield the escaped character itself.
    fn parse_escape(&mut self, out: &mut String) {
        let Some(c) = self.peek_char() else {
            return;
        };
        self.pos += c.len_utf8();
        match c {
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'u' => self.parse_unicode_escape(out),
            '"' | '\\' | '/' => out.push(c),
            other => {
                self.report(DiagnosticKind::InvalidEscape);
                out.push(other);
            }
        }
    }

    /// Decode the `XXXX` of a `\uXXXX` escape, joining surrogate pairs. An
    /// invalid sequence leaves the hex digits unread and yields a literal `u`.
    fn parse_unicode_escape(&mut self, out: &mut String) {
        let Some(high) = self.hex4(self.pos) else {
            self.report(DiagnosticKind::InvalidEscape);
            out.push('u');
            return;
        };
        self.pos += 4;

        let code = if (0xD800..0xDC00).contains(&high) {
            let low = match self.text.get(self.pos..self.pos + 2) {
                Some("\\u") => self.hex4(self.pos + 2),
                _ => None,
            };
            match low {
                Some(low) if (0xDC00..0xE000).contains(&low) => {
                    self.pos += 6;
                    0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)
                }
                _ => high,
            }
        } else {
            high
        };

        match char::from_u32(code) {
            Some(c) => out.push(c),
            None => {
                self.report(DiagnosticKind::InvalidEscape);
                out.push(char::REPLACEMENT_CHARACTER);
            }
        }
    }

    fn hex4(&self, at: usize) -> Option<u32> {
        let digits = self.text.get(at..at + 4)?;
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        u32::from_str_radix(digits, 16).ok()
    }

    /// Match a fixed literal. The comparison is bounds-checked, so a literal
    /// truncated by end-of-input is reported rather than sliced past the end.
    fn parse_literal(&mut self, word: &str, value: Value) -> Value {
        if self.text[self.pos..].starts_with(word) {
            self.pos += word.len();
            value
        } else {
            self.report(DiagnosticKind::InvalidLiteral);
            self.skip_token();
            Value::Null
        }
    }

    /// Greedily consume `-`, digits, `.`, and an exponent part, then convert.
    fn parse_number(&mut self) -> Value {
        let start = self.pos;
        if self.peek() == Some(b'-') {
            self.pos += 1;
        }
        while let Some(b'0'..=b'9' | b'.') = self.peek() {
            self.pos += 1;
        }
        if let Some(b'e' | b'E') = self.peek() {
            let sign = usize::from(matches!(self.bytes.get(self.pos + 1), Some(b'+' | b'-')));
            if self
                .bytes
                .get(self.pos + 1 + sign)
                .is_some_and(u8::is_ascii_digit)
            {
                self.pos += 1 + sign;
                while let Some(b'0'..=b'9') = self.peek() {
                    self.pos += 1;
                }
            }
        }

        let digits = &self.text[start..self.pos];
        match digits.parse::<f64>() {
            Ok(n) => {
                if !is_strict_number(digits) {
                    self.diagnostics.push(Diagnostic {
                        offset: start,
                        kind: DiagnosticKind::InvalidNumber,
                    });
                    log::debug!("json parse anomaly at byte {start}: non-canonical number {digits}");
                }
                Value::Number(n)
            }
            Err(_) => {
                self.report(DiagnosticKind::InvalidNumber);
                Value::Number(0.0)
            }
        }
    }
}

/// `-? (0 | [1-9][0-9]*) (. [0-9]+)? ([eE] [+-]? [0-9]+)?`
fn is_strict_number(text: &str) -> bool {
    let bytes = text.strip_prefix('-').unwrap_or(text).as_bytes();
    let int_len = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
    if int_len == 0 || (int_len > 1 && bytes[0] == b'0') {
        return false;
    }
    let mut rest = &bytes[int_len..];
    if let Some((b'.', fraction)) = rest.split_first() {
        let frac_len = fraction.iter().take_while(|b| b.is_ascii_digit()).count();
        if frac_len == 0 {
            return false;
        }
        rest = &fraction[frac_len..];
    }
    // The scanner only consumes an exponent that has digits.
    rest.is_empty() || matches!(rest[0], b'e' | b'E')
}

fn is_delimiter(b: u8) -> bool {
    matches!(
        b,
        b',' | b':' | b'[' | b']' | b'{' | b'}' | b'"' | b' ' | b'\t' | b'\n' | b'\r'
    )
}
