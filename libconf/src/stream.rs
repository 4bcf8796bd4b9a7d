//! Phase 2: Include resolution and the parsing-oriented token stream.
//!
//! [`TokenStream`] materializes the token sequence for a whole document,
//! expanding `@include "path"` directives depth-first as it goes, and then
//! offers the cursor operations a recursive-descent parser wants:
//! [`peek`](TokenStream::peek), [`accept`](TokenStream::accept),
//! [`expect`](TokenStream::expect).

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{ParseError, Result};
use crate::token::{decode_escapes, Token, TokenKind};
use crate::tokenizer::Tokenizer;

/// An `@include "path"` directive occupying a whole line.
static INCLUDE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"\A@include "(.*)"\z"#).unwrap());

/// A cursor over the materialized token sequence of one document.
pub struct TokenStream {
    tokens: Vec<Token>,
    position: usize,
}

impl TokenStream {
    /// Wrap an already materialized token sequence.
    pub fn from_tokens(tokens: Vec<Token>) -> Self {
        TokenStream {
            tokens,
            position: 0,
        }
    }

    /// Build a stream from in-memory text, expanding includes.
    ///
    /// `source_name` appears in diagnostics and seeds the cycle-detection
    /// set; `include_dir` is the lookup directory for `@include` paths.
    pub fn from_text(text: &str, source_name: &str, include_dir: &Path) -> Result<Self> {
        let tokens = build_tokens(text, source_name, include_dir, &HashSet::new())?;
        Ok(Self::from_tokens(tokens))
    }

    /// Read and tokenize a file, expanding includes.
    pub fn from_file(path: &Path, include_dir: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| ParseError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_text(&text, &path.to_string_lossy(), include_dir)
    }

    /// Return (but do not consume) the next token.
    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    /// Whether the end of the stream has been reached.
    pub fn finished(&self) -> bool {
        self.position >= self.tokens.len()
    }

    /// Consume and return the next token if its kind is one of `kinds`.
    ///
    /// The cursor only advances on a match, so a failed `accept` is free to
    /// fall through to the next grammar alternative.
    pub fn accept(&mut self, kinds: &[TokenKind]) -> Option<Token> {
        let token = self.tokens.get(self.position)?;
        if kinds.contains(&token.kind) {
            self.position += 1;
            Some(token.clone())
        } else {
            None
        }
    }

    /// Consume and return the next token, or fail if its kind is not one of
    /// `kinds`.
    pub fn expect(&mut self, kinds: &[TokenKind]) -> Result<Token> {
        if let Some(token) = self.accept(kinds) {
            return Ok(token);
        }
        Err(self.expected(&describe_kinds(kinds)))
    }

    /// Build the error for an unmet expectation at the current position.
    pub fn expected(&self, what: &str) -> ParseError {
        match self.peek() {
            Some(token) => ParseError::UnexpectedToken {
                found: token.to_string(),
                expected: what.to_string(),
            },
            None => ParseError::UnexpectedEnd {
                expected: what.to_string(),
            },
        }
    }
}

fn describe_kinds(kinds: &[TokenKind]) -> String {
    kinds
        .iter()
        .map(|k| k.to_string())
        .collect::<Vec<_>>()
        .join(" or ")
}

/// Tokenize `text`, splicing in the token streams of included files.
///
/// The file is scanned line by line. Lines buffered so far are flushed to
/// the tokenizer whenever a directive is hit, the directive line is replaced
/// by a blank stand-in so later row numbers stay accurate, and the include's
/// tokens are spliced in place. `seen` holds every file name on the current
/// inclusion path; each recursion level works on its own extended copy so
/// sibling includes of the same file do not falsely collide.
fn build_tokens(
    text: &str,
    source_name: &str,
    include_dir: &Path,
    seen: &HashSet<PathBuf>,
) -> Result<Vec<Token>> {
    let source_key = PathBuf::from(source_name);
    if seen.contains(&source_key) {
        return Err(ParseError::CircularInclude { path: source_key });
    }
    let mut seen = seen.clone();
    seen.insert(source_key);

    let mut tokens = Vec::new();
    let mut pending: Vec<&str> = Vec::new();
    let mut pending_row = 1;

    for (index, line) in text.split('\n').enumerate() {
        let row = index + 1;
        let directive = INCLUDE_RE.captures(line.trim());
        let Some(captures) = directive else {
            pending.push(line);
            continue;
        };

        flush_pending(&mut tokens, &pending, pending_row, source_name)?;

        let include_path = include_dir.join(decode_escapes(&captures[1]));
        let include_text =
            fs::read_to_string(&include_path).map_err(|source| ParseError::IncludeOpen {
                path: include_path.clone(),
                source,
            })?;
        tokens.extend(build_tokens(
            &include_text,
            &include_path.to_string_lossy(),
            include_dir,
            &seen,
        )?);

        // Blank stand-in for the directive line.
        pending = vec![""];
        pending_row = row;
    }

    flush_pending(&mut tokens, &pending, pending_row, source_name)?;
    Ok(tokens)
}

/// Tokenize buffered lines, whose first line sits at `start_row`.
fn flush_pending(
    tokens: &mut Vec<Token>,
    pending: &[&str],
    start_row: usize,
    source_name: &str,
) -> Result<()> {
    if pending.is_empty() {
        return Ok(());
    }
    let chunk = pending.join("\n");
    for token in Tokenizer::starting_at(&chunk, source_name, start_row) {
        tokens.push(token?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream(input: &str) -> TokenStream {
        TokenStream::from_text(input, "<test>", Path::new("")).unwrap()
    }

    #[test]
    fn test_accept_advances_only_on_match() {
        let mut s = stream("a = 1;");
        assert!(s.accept(&[TokenKind::Integer]).is_none());
        let name = s.accept(&[TokenKind::Name]).unwrap();
        assert_eq!(name.text, "a");
    }

    #[test]
    fn test_expect_mismatch_reports_token() {
        let mut s = stream("a = 1;");
        let err = s.expect(&[TokenKind::Semicolon]).unwrap_err();
        match err {
            ParseError::UnexpectedToken { found, expected } => {
                assert!(found.contains("'a'"));
                assert_eq!(expected, "';'");
            }
            other => panic!("expected UnexpectedToken, got {other:?}"),
        }
    }

    #[test]
    fn test_expect_at_end() {
        let mut s = stream("");
        assert!(matches!(
            s.expect(&[TokenKind::Name]),
            Err(ParseError::UnexpectedEnd { .. })
        ));
    }

    #[test]
    fn test_include_line_pattern() {
        assert!(INCLUDE_RE.is_match(r#"@include "other.cfg""#));
        assert!(!INCLUDE_RE.is_match(r#"x = "@include \"other.cfg\"";"#));
        assert!(!INCLUDE_RE.is_match(r#"@include "a" trailing"#));
    }

    #[test]
    fn test_rows_survive_directive_lines() {
        // Missing include file aside, rows after a directive must stay
        // aligned with the physical file. Use a directive-free document and
        // check plain multi-line tracking through the stream path.
        let s = stream("a = 1;\nb = 2;\nc = 3;");
        let rows: Vec<usize> = (0..3).map(|i| s.tokens[i * 4].row).collect();
        assert_eq!(rows, vec![1, 2, 3]);
    }
}
