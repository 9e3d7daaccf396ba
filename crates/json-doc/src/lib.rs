//! # json-doc
//!
//! A dynamic JSON document model: a tagged-union [`Value`] with in-place
//! mutation and insertion-ordered objects, a deterministic serializer, a lenient
//! parser that never fails, and a structural mapper that projects value trees
//! onto typed records and back.
//!
//! ## Quick start
//!
//! ```rust
//! use json_doc::Value;
//!
//! let mut hero = Value::object();
//! hero.set("name", Value::string("Hero"));
//! hero.set("level", Value::number(25.0));
//! hero.set("inventory", Value::array().with_item("sword").with_item("shield"));
//!
//! let text = hero.to_json(false);
//! assert_eq!(text, r#"{"name":"Hero","level":25,"inventory":["sword","shield"]}"#);
//!
//! // JSON → Value (roundtrip)
//! let back = Value::parse(&text);
//! assert_eq!(back, hero);
//! ```
//!
//! ## Modules
//!
//! - [`value`]: the `Value` tree with accessors, object/array mutation, promotion
//! - [`serializer`]: `Value` → JSON text (compact or indented)
//! - [`parser`]: JSON text → `Value` (lenient, with diagnostics and a strict mode)
//! - [`mapper`]: `Value` ↔ typed records via per-type member descriptors
//! - [`document`]: host adapter for root ownership, file load/save, lifecycle hooks
//! - [`error`]: Error types for the strict and I/O boundaries

pub mod document;
pub mod error;
pub mod mapper;
pub mod parser;
mod serde_bridge;
pub mod serializer;
pub mod value;

pub use document::{Document, DocumentHooks};
pub use error::{JsonDocError, Result};
pub use mapper::{EnumValue, Mappable, Record};
pub use parser::{
    parse, parse_strict, parse_with_diagnostics, Diagnostic, DiagnosticKind, ParseOptions,
};
pub use serializer::{to_string, to_string_pretty, WriteOptions};
pub use value::{Map, Value, ValueKind};
