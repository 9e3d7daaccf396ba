//! JSON serializer: renders a [`Value`] tree as JSON text.
//!
//! Emission is a single recursive pass with deterministic output:
//!
//! - **Key order**: object entries appear in insertion order
//! - **Compact mode**: no whitespace at all, not even after `:` or `,`
//! - **Pretty mode**: one entry per line, `indent` spaces (2 by default) per level
//! - **Escaping**: only `\`, `"`, newline, carriage return, and tab are escaped;
//!   every other character is written verbatim
//! - **Numbers**: plain decimal text (never exponent notation), `-0` → `0`,
//!   NaN and infinities → `null`
//!
//! # Example
//! ```
//! use json_doc::Value;
//!
//! let v = Value::object()
//!     .with("name", "Hero")
//!     .with("tags", Value::array().with_item("a"));
//! assert_eq!(v.to_json(false), r#"{"name":"Hero","tags":["a"]}"#);
//! assert_eq!(
//!     v.to_json(true),
//!     "{\n  \"name\": \"Hero\",\n  \"tags\": [\n    \"a\"\n  ]\n}"
//! );
//! ```

use std::fmt;

use crate::value::Value;

/// Output layout settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    /// One entry per line with nested indentation.
    pub pretty: bool,
    /// Spaces per nesting level in pretty mode.
    pub indent: usize,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            pretty: false,
            indent: 2,
        }
    }
}

impl WriteOptions {
    pub fn compact() -> Self {
        Self::default()
    }

    pub fn pretty() -> Self {
        Self {
            pretty: true,
            ..Self::default()
        }
    }

    pub fn with_indent(self, indent: usize) -> Self {
        Self { indent, ..self }
    }
}

/// Render `value` as compact JSON.
pub fn to_string(value: &Value) -> String {
    to_string_with(value, &WriteOptions::compact())
}

/// Render `value` as indented JSON (2 spaces per level).
pub fn to_string_pretty(value: &Value) -> String {
    to_string_with(value, &WriteOptions::pretty())
}

pub fn to_string_with(value: &Value, options: &WriteOptions) -> String {
    let mut out = String::new();
    write_value(value, options, &mut out);
    out
}

/// Append the JSON text of `value` to `out`.
pub fn write_value(value: &Value, options: &WriteOptions, out: &mut String) {
    Emitter { options, out }.value(value, 0);
}

impl Value {
    /// Serialize this tree, indented when `pretty` is true.
    pub fn to_json(&self, pretty: bool) -> String {
        let options = if pretty {
            WriteOptions::pretty()
        } else {
            WriteOptions::compact()
        };
        to_string_with(self, &options)
    }
}

/// `{}` renders compact JSON; the alternate form `{:#}` renders pretty JSON.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_json(f.alternate()))
    }
}

struct Emitter<'a> {
    options: &'a WriteOptions,
    out: &'a mut String,
}

impl Emitter<'_> {
    fn value(&mut self, value: &Value, depth: usize) {
        match value {
            Value::Null => self.out.push_str("null"),
            Value::Bool(b) => self.out.push_str(if *b { "true" } else { "false" }),
            Value::Number(n) => format_number(*n, self.out),
            Value::String(s) => write_escaped(s, self.out),
            Value::Object(map) => {
                if map.is_empty() {
                    self.out.push_str("{}");
                    return;
                }
                self.out.push('{');
                for (i, (key, child)) in map.iter().enumerate() {
                    self.entry_prefix(i, depth + 1);
                    write_escaped(key, self.out);
                    self.out.push(':');
                    if self.options.pretty {
                        self.out.push(' ');
                    }
                    self.value(child, depth + 1);
                }
                self.close(depth);
                self.out.push('}');
            }
            Value::Array(items) => {
                if items.is_empty() {
                    self.out.push_str("[]");
                    return;
                }
                self.out.push('[');
                for (i, item) in items.iter().enumerate() {
                    self.entry_prefix(i, depth + 1);
                    self.value(item, depth + 1);
                }
                self.close(depth);
                self.out.push(']');
            }
        }
    }

    /// Separator plus, in pretty mode, the line break and indent of an entry.
    fn entry_prefix(&mut self, index: usize, depth: usize) {
        if index > 0 {
            self.out.push(',');
        }
        if self.options.pretty {
            self.out.push('\n');
            self.indent(depth);
        }
    }

    fn close(&mut self, depth: usize) {
        if self.options.pretty {
            self.out.push('\n');
            self.indent(depth);
        }
    }

    fn indent(&mut self, depth: usize) {
        for _ in 0..depth * self.options.indent {
            self.out.push(' ');
        }
    }
}

/// Format a number as locale-independent decimal text.
///
/// `f64`'s `Display` never switches to exponent notation, which keeps the
/// output inside the grammar every JSON reader accepts.
pub(crate) fn format_number(n: f64, out: &mut String) {
    if !n.is_finite() {
        out.push_str("null");
        return;
    }
    // Normalize -0 to 0
    let n = if n == 0.0 { 0.0 } else { n };
    out.push_str(&n.to_string());
}

/// Emit a quoted string, escaping backslash, quote, and the three whitespace
/// control characters.
fn write_escaped(s: &str, out: &mut String) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out.push('"');
}
