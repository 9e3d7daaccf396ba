//! Host adapter: a document root plus load/save plumbing.
//!
//! [`Document`] is the surface an embedding host (an editor, a CLI, a game's
//! save system) talks to. It owns one root [`Value`] and passes through to the
//! parser, serializer, and mapper. File I/O errors surface here and nowhere
//! else in the crate.
//!
//! A [`DocumentHooks`] implementation can observe the root at two points:
//! `before_serialize` runs before every emission of text, and
//! `after_deserialize` runs after every completed load.

use std::fmt;
use std::path::Path;

use crate::error::{JsonDocError, Result};
use crate::mapper::{self, Record};
use crate::parser::{self, Diagnostic, ParseOptions};
use crate::serializer::{self, WriteOptions};
use crate::value::Value;

/// Extension points around serialization. Both default to no-ops.
pub trait DocumentHooks {
    fn before_serialize(&mut self, _root: &mut Value) {}

    fn after_deserialize(&mut self, _root: &mut Value) {}
}

/// A JSON document: one root value and its lifecycle hooks.
pub struct Document {
    root: Value,
    parse_options: ParseOptions,
    hooks: Option<Box<dyn DocumentHooks>>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("root", &self.root)
            .field("parse_options", &self.parse_options)
            .field("hooks", &self.hooks.is_some())
            .finish()
    }
}

impl Document {
    /// A document whose root is an empty object.
    pub fn new() -> Self {
        Self::from_value(Value::object())
    }

    pub fn from_value(root: Value) -> Self {
        Self {
            root,
            parse_options: ParseOptions::default(),
            hooks: None,
        }
    }

    pub fn with_hooks(mut self, hooks: impl DocumentHooks + 'static) -> Self {
        self.hooks = Some(Box::new(hooks));
        self
    }

    pub fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.parse_options = options;
        self
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Value {
        &mut self.root
    }

    pub fn set_root(&mut self, root: Value) {
        self.root = root;
    }

    pub fn into_root(self) -> Value {
        self.root
    }

    /// Reset the root to an empty object.
    pub fn clear(&mut self) {
        self.root = Value::object();
    }

    /// Render the root, running `before_serialize` first.
    pub fn to_json_text(&mut self, pretty: bool) -> String {
        let options = if pretty {
            WriteOptions::pretty()
        } else {
            WriteOptions::compact()
        };
        self.to_json_text_with(&options)
    }

    pub fn to_json_text_with(&mut self, options: &WriteOptions) -> String {
        if let Some(hooks) = self.hooks.as_mut() {
            hooks.before_serialize(&mut self.root);
        }
        serializer::to_string_with(&self.root, options)
    }

    /// Replace the root with the lenient parse of `text`.
    ///
    /// Returns the anomalies the parser absorbed; an empty list means `text`
    /// was well-formed.
    pub fn load_from_text(&mut self, text: &str) -> Vec<Diagnostic> {
        let (root, diagnostics) = parser::parse_with(text, &self.parse_options);
        self.root = root;
        if let Some(hooks) = self.hooks.as_mut() {
            hooks.after_deserialize(&mut self.root);
        }
        diagnostics
    }

    /// Read a file and load it as text.
    ///
    /// Invalid UTF-8 is replaced rather than rejected and a leading byte-order
    /// mark is ignored. On an I/O error the current root is left as it was.
    pub fn load_from_file(&mut self, path: impl AsRef<Path>) -> Result<Vec<Diagnostic>> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| JsonDocError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::trace!("loaded {} bytes from {}", bytes.len(), path.display());
        let decoded = String::from_utf8_lossy(&bytes);
        let text: &str = &decoded;
        Ok(self.load_from_text(text.strip_prefix('\u{feff}').unwrap_or(text)))
    }

    /// Serialize the root and write it to `path`.
    pub fn save_to_file(&mut self, path: impl AsRef<Path>, pretty: bool) -> Result<()> {
        let path = path.as_ref();
        let text = self.to_json_text(pretty);
        std::fs::write(path, text.as_bytes()).map_err(|source| JsonDocError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::trace!("saved {} bytes to {}", text.len(), path.display());
        Ok(())
    }

    /// Project the root onto a fresh record.
    pub fn project<T: Record>(&self) -> T {
        mapper::project(&self.root)
    }

    /// Replace the root with the captured members of `record`.
    pub fn capture<T: Record>(&mut self, record: &T) {
        self.root = mapper::capture(record);
    }
}
