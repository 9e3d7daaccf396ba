//! Error types for the json-doc crate.
//!
//! The core value, parse, and serialize paths never fail: structural mismatches
//! degrade to absent values and malformed text degrades to `Null` subtrees.
//! Errors only surface from the opt-in strict entry points, the host adapter's
//! file I/O, and the serde bridge.

use std::path::PathBuf;

use thiserror::Error;

use crate::value::ValueKind;

/// Errors that can occur at the strict or I/O boundaries of a document.
#[derive(Error, Debug)]
pub enum JsonDocError {
    /// Reading or writing a document file failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Strict parsing found an anomaly the lenient parser would have absorbed.
    /// `offset` is the byte offset into the input text.
    #[error("JSON parse error at byte {offset}: {message}")]
    Parse { offset: usize, message: String },

    /// A strict mutator was called on a value of the wrong variant.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: ValueKind,
        found: ValueKind,
    },

    /// Conversion through `serde_json` failed (serde bridge only).
    #[error("serde error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used throughout json-doc.
pub type Result<T> = std::result::Result<T, JsonDocError>;
