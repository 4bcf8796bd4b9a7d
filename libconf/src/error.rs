//! Error types for parsing and serializing libconfig documents.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for parsing operations.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Error type for tokenizing, include resolution, and parsing.
///
/// All variants are fatal to the current parse call; there is no partial
/// result or internal retry. `BadToken` is the tokenizer-level subtype and
/// carries the exact input position plus a short snippet of the offending
/// text.
#[derive(Error, Debug)]
pub enum ParseError {
    /// No token pattern matched at a non-empty input position.
    #[error("unrecognized input in {source_name:?}, row {row}, column {column}: {context:?}")]
    BadToken {
        source_name: String,
        row: usize,
        column: usize,
        context: String,
    },

    /// A numeric literal matched a token pattern but does not fit in 64 bits.
    #[error("numeric literal out of range: {found}")]
    NumberOutOfRange { found: String },

    /// The grammar required a different token than the one present.
    #[error("unexpected token {found}; expected {expected}")]
    UnexpectedToken { found: String, expected: String },

    /// The grammar required another token but the input ended.
    #[error("unexpected end of input; expected {expected}")]
    UnexpectedEnd { expected: String },

    /// Tokens remained after a complete top-level setting list.
    #[error("expected end of input but found {found}")]
    TrailingInput { found: String },

    /// The top-level input file could not be read.
    #[error("could not read {path:?}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An `@include` directive named a file that could not be opened.
    #[error("could not open include file {path:?}: {source}")]
    IncludeOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A file re-entered itself through a chain of `@include` directives.
    #[error("circular include of {path:?}")]
    CircularInclude { path: PathBuf },
}

/// Error type for serialization.
///
/// The classic libconfig emitters also reject unsupported value types and
/// non-string group keys; the closed [`Value`](crate::Value) enum and
/// `String` keys make those states unrepresentable here, so only the
/// root-kind contract remains.
#[derive(Error, Debug)]
pub enum SerializeError {
    /// `serialize` was handed a root that is not a group.
    #[error("top-level value must be a group, found {kind}")]
    RootNotGroup { kind: &'static str },
}
