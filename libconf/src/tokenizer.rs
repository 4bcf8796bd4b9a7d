//! Phase 1: Tokenizer
//!
//! Turns raw text into a stream of typed tokens, skipping whitespace and
//! comments (`#`, `//`, and `/* ... */`). Patterns are tried in a fixed
//! priority order with the longest, most specific forms first, so `1.5`
//! lexes as a float rather than an integer followed by garbage, and `0x1F`
//! as hex rather than a zero and a name.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{ParseError, Result};
use crate::token::{Token, TokenKind};

/// Whitespace and comments, skipped between tokens.
static SKIP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\A(?:\s+|#[^\n]*|//[^\n]*|/\*(?s:.)*?\*/)").unwrap());

/// Token patterns in match priority order.
///
/// All patterns are `\A`-anchored and matched against the remaining input
/// slice; the first hit wins.
static TOKEN_TABLE: Lazy<Vec<(TokenKind, Regex)>> = Lazy::new(|| {
    [
        (
            TokenKind::Float,
            r"\A(?:[-+]?(?:\d+\.\d*|\.\d+)(?:[eE][-+]?\d+)?|[-+]?\d+[eE][-+]?\d+)",
        ),
        (TokenKind::Hex64, r"\A0[Xx][0-9A-Fa-f]+LL?"),
        (TokenKind::Hex, r"\A0[Xx][0-9A-Fa-f]+"),
        (TokenKind::Boolean, r"\A(?i:true|false)\b"),
        (TokenKind::Str, r#"\A"(?:[^"\\]|\\.)*""#),
        (TokenKind::Str, r#"\A<"(?s:.*?)">"#),
        // Integer64 must outrank Name, or "5L" lexes as a name and
        // serialized 64-bit values stop reparsing. Name outranks Integer so
        // digit-leading keys like "2DragonKill" stay single tokens.
        (TokenKind::Integer64, r"\A[-+]?[0-9]+LL?"),
        (TokenKind::Name, r"\A[0-9]*[A-Za-z*][-A-Za-z0-9_*]*"),
        (TokenKind::Integer, r"\A[-+]?[0-9]+"),
        (TokenKind::BraceClose, r"\A\}"),
        (TokenKind::BraceOpen, r"\A\{"),
        (TokenKind::ParenClose, r"\A\)"),
        (TokenKind::ParenOpen, r"\A\("),
        (TokenKind::BracketClose, r"\A\]"),
        (TokenKind::BracketOpen, r"\A\["),
        (TokenKind::Comma, r"\A,"),
        (TokenKind::Semicolon, r"\A;"),
        (TokenKind::Equals, r"\A="),
        (TokenKind::Colon, r"\A:"),
    ]
    .into_iter()
    .map(|(kind, pattern)| (kind, Regex::new(pattern).unwrap()))
    .collect()
});

/// Number of characters of context reported for unrecognized input.
const ERROR_CONTEXT_LEN: usize = 20;

/// Lazy tokenizer over a borrowed input string.
///
/// A pure function of its input: the only state is the cursor (byte
/// position, row, column) local to this instance. The `source_name` is used
/// in diagnostics only; no file is read here. Include directives are not
/// handled at this level (see [`TokenStream`](crate::TokenStream)).
pub struct Tokenizer<'a> {
    text: &'a str,
    source_name: String,
    pos: usize,
    row: usize,
    column: usize,
}

impl<'a> Tokenizer<'a> {
    /// Tokenize `text`, reporting positions starting at row 1.
    pub fn new(text: &'a str, source_name: &str) -> Self {
        Self::starting_at(text, source_name, 1)
    }

    /// Tokenize a chunk whose first line sits at physical row `start_row`.
    ///
    /// Used by the include resolver, which tokenizes a file in chunks
    /// around `@include` directives.
    pub(crate) fn starting_at(text: &'a str, source_name: &str, start_row: usize) -> Self {
        Tokenizer {
            text,
            source_name: source_name.to_string(),
            pos: 0,
            row: start_row,
            column: 1,
        }
    }

    /// Advance the cursor past `matched`, tracking embedded newlines.
    fn advance(&mut self, matched: &str) {
        self.pos += matched.len();
        match matched.rfind('\n') {
            Some(last) => {
                self.row += matched.matches('\n').count();
                self.column = 1 + matched[last + 1..].chars().count();
            }
            None => self.column += matched.chars().count(),
        }
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let text = self.text;
            if self.pos >= text.len() {
                return None;
            }
            let rest = &text[self.pos..];

            if let Some(m) = SKIP_RE.find(rest) {
                let skipped = m.as_str().to_string();
                self.advance(&skipped);
                continue;
            }

            for (kind, pattern) in TOKEN_TABLE.iter() {
                if let Some(m) = pattern.find(rest) {
                    let matched = m.as_str().to_string();
                    let token =
                        Token::new(*kind, &matched, &self.source_name, self.row, self.column);
                    self.advance(&matched);
                    return Some(token);
                }
            }

            return Some(Err(ParseError::BadToken {
                source_name: self.source_name.clone(),
                row: self.row,
                column: self.column,
                context: rest.chars().take(ERROR_CONTEXT_LEN).collect(),
            }));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenValue;

    fn kinds(input: &str) -> Vec<TokenKind> {
        Tokenizer::new(input, "<test>")
            .map(|t| t.unwrap().kind)
            .collect()
    }

    #[test]
    fn test_scalar_kinds() {
        assert_eq!(
            kinds(r#"1.5 0x1F 0x1FLL true "hi" name 9L 7"#),
            vec![
                TokenKind::Float,
                TokenKind::Hex,
                TokenKind::Hex64,
                TokenKind::Boolean,
                TokenKind::Str,
                TokenKind::Name,
                TokenKind::Integer64,
                TokenKind::Integer,
            ]
        );
    }

    #[test]
    fn test_punctuation() {
        assert_eq!(
            kinds("{}()[],;=:"),
            vec![
                TokenKind::BraceOpen,
                TokenKind::BraceClose,
                TokenKind::ParenOpen,
                TokenKind::ParenClose,
                TokenKind::BracketOpen,
                TokenKind::BracketClose,
                TokenKind::Comma,
                TokenKind::Semicolon,
                TokenKind::Equals,
                TokenKind::Colon,
            ]
        );
    }

    #[test]
    fn test_float_before_integer() {
        // "7." must lex as one float, not integer + stray dot.
        assert_eq!(kinds("7. .5 -1.25e-3 1e9"), vec![TokenKind::Float; 4]);
    }

    #[test]
    fn test_name_with_digits_and_specials() {
        assert_eq!(kinds("2DragonKill Item_Db2 *"), vec![TokenKind::Name; 3]);
    }

    #[test]
    fn test_comments_skipped() {
        assert_eq!(
            kinds("a // one\n# two\n/* three\nfour */ b"),
            vec![TokenKind::Name, TokenKind::Name]
        );
    }

    #[test]
    fn test_row_tracking_across_block_comment() {
        let tokens: Vec<Token> = Tokenizer::new("a = 1;\n/* two\nlines */\nb = 2;", "<test>")
            .collect::<Result<_>>()
            .unwrap();
        let b = tokens.iter().find(|t| t.text == "b").unwrap();
        assert_eq!(b.row, 4);
        assert_eq!(b.column, 1);
    }

    #[test]
    fn test_column_tracking() {
        let tokens: Vec<Token> = Tokenizer::new("abc = 12;", "<test>")
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(tokens[0].column, 1);
        assert_eq!(tokens[1].column, 5);
        assert_eq!(tokens[2].column, 7);
        assert_eq!(tokens[3].column, 9);
    }

    #[test]
    fn test_bad_token_reports_position() {
        let err = Tokenizer::new("ok = 1;\n\\oops", "<test>")
            .collect::<Result<Vec<_>>>()
            .unwrap_err();
        match err {
            ParseError::BadToken {
                row, column, context, ..
            } => {
                assert_eq!(row, 2);
                assert_eq!(column, 1);
                assert!(context.starts_with('\\'));
            }
            other => panic!("expected BadToken, got {other:?}"),
        }
    }

    #[test]
    fn test_string_escapes_decoded_eagerly() {
        let tokens: Vec<Token> = Tokenizer::new(r#""a\tb\x21""#, "<test>")
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(tokens[0].value, TokenValue::Str("a\tb!".to_string()));
    }

    #[test]
    fn test_multiline_string_spans_rows() {
        let tokens: Vec<Token> = Tokenizer::new("<\"first\nsecond\"> after", "<test>")
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Str);
        assert_eq!(tokens[1].row, 2);
    }

    #[test]
    fn test_boolean_case_insensitive() {
        let tokens: Vec<Token> = Tokenizer::new("True FALSE", "<test>")
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(tokens[0].value, TokenValue::Bool(true));
        assert_eq!(tokens[1].value, TokenValue::Bool(false));
    }
}
