//! Parser and serializer for libconfig-style configuration files.
//!
//! The format is the human-readable, nested one used for large game-data
//! tables: named settings with `name = value;` or `name: value,` syntax,
//! nested `{ ... }` groups, `[ ... ]` arrays of scalars, `( ... )`
//! heterogeneous lists, numeric literals with hex and `L`/`LL` long
//! suffixes, multi-line `<" ... ">` strings, and `@include "path"`
//! directives.
//!
//! # Parsing Pipeline
//!
//! 1. **Tokenizer**: turns raw text into typed tokens with source
//!    positions, skipping whitespace and comments.
//!
//! 2. **Token Stream**: reads a file, expands `@include` directives
//!    recursively (detecting cycles), and offers cursor operations to the
//!    parser.
//!
//! 3. **Parser**: recursive descent over the token stream, producing a
//!    [`Group`] tree of [`Value`]s that preserves setting order.
//!
//! The [`serialize`] function walks a tree back out to canonical text;
//! parsing that text reconstructs an equal tree (whitespace and comments
//! are not preserved).
//!
//! # Example
//!
//! ```
//! let root = libconf::parse_text("window: { title: \"demo\"; };").unwrap();
//! assert_eq!(root["window"]["title"].as_str(), Some("demo"));
//! ```

mod dump;
mod error;
mod parser;
mod stream;
mod token;
mod tokenizer;
mod value;

use std::path::Path;

pub use dump::{serialize, serialize_group};
pub use error::{ParseError, Result, SerializeError};
pub use stream::TokenStream;
pub use token::{Token, TokenKind, TokenValue};
pub use tokenizer::Tokenizer;
pub use value::{Group, Value};

/// Parse a document from a string.
///
/// `@include` paths, if any, resolve against the process working
/// directory; use [`parse_text_with_includes`] to control the lookup
/// directory and the source name used in diagnostics.
pub fn parse_text(text: &str) -> Result<Group> {
    parse_text_with_includes(text, "<string>", Path::new(""))
}

/// Parse a document from a string with explicit source name and include
/// directory.
pub fn parse_text_with_includes(
    text: &str,
    source_name: &str,
    include_dir: &Path,
) -> Result<Group> {
    let stream = TokenStream::from_text(text, source_name, include_dir)?;
    parser::parse(stream)
}

/// Parse a document from a file, resolving `@include` paths against
/// `include_dir`.
pub fn parse_file(path: impl AsRef<Path>, include_dir: &Path) -> Result<Group> {
    let stream = TokenStream::from_file(path.as_ref(), include_dir)?;
    parser::parse(stream)
}
