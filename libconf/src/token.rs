//! Lexical tokens with source positions.
//!
//! Every token records the file it came from and its 1-based row and column
//! so that later stages can point diagnostics at the exact input location.
//! Tokens are immutable once produced.

use std::fmt;

use crate::error::{ParseError, Result};

/// Classification of a lexical unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Floating-point literal.
    Float,
    /// Hexadecimal integer literal.
    Hex,
    /// Hexadecimal integer literal with an `L`/`LL` suffix.
    Hex64,
    /// `true` or `false` (case-insensitive).
    Boolean,
    /// Quoted string, including the multi-line `<" ... ">` form.
    Str,
    /// Bare setting name.
    Name,
    /// Decimal integer literal.
    Integer,
    /// Decimal integer literal with an `L`/`LL` suffix.
    Integer64,
    /// `{`
    BraceOpen,
    /// `}`
    BraceClose,
    /// `(`
    ParenOpen,
    /// `)`
    ParenClose,
    /// `[`
    BracketOpen,
    /// `]`
    BracketClose,
    /// `,`
    Comma,
    /// `;`
    Semicolon,
    /// `=`
    Equals,
    /// `:`
    Colon,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Float => "float",
            TokenKind::Hex => "hex",
            TokenKind::Hex64 => "hex64",
            TokenKind::Boolean => "boolean",
            TokenKind::Str => "string",
            TokenKind::Name => "name",
            TokenKind::Integer => "integer",
            TokenKind::Integer64 => "integer64",
            TokenKind::BraceOpen => "'{'",
            TokenKind::BraceClose => "'}'",
            TokenKind::ParenOpen => "'('",
            TokenKind::ParenClose => "')'",
            TokenKind::BracketOpen => "'['",
            TokenKind::BracketClose => "']'",
            TokenKind::Comma => "','",
            TokenKind::Semicolon => "';'",
            TokenKind::Equals => "'='",
            TokenKind::Colon => "':'",
        };
        f.write_str(name)
    }
}

/// Decoded payload of a literal token.
///
/// Names and punctuation carry no payload. Integer payloads keep the full
/// 64-bit value plus the `long` tag from an `L`/`LL` suffix; the tag only
/// influences how the value is classified, never the value itself.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenValue {
    /// No payload (names, punctuation).
    None,
    /// Escape-decoded string contents.
    Str(String),
    /// Boolean literal.
    Bool(bool),
    /// Integer literal, decimal or hex.
    Int { value: i64, long: bool },
    /// Floating-point literal.
    Float(f64),
}

/// A classified lexical unit with source position metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub value: TokenValue,
    pub source_name: String,
    /// 1-based row of the first character.
    pub row: usize,
    /// 1-based column of the first character.
    pub column: usize,
}

impl Token {
    /// Build a token, eagerly decoding the literal payload for its kind.
    pub(crate) fn new(
        kind: TokenKind,
        text: &str,
        source_name: &str,
        row: usize,
        column: usize,
    ) -> Result<Self> {
        let mut token = Token {
            kind,
            text: text.to_string(),
            value: TokenValue::None,
            source_name: source_name.to_string(),
            row,
            column,
        };
        token.value = decode_payload(&token)?;
        Ok(token)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' in {:?}, row {}, column {}",
            self.text, self.source_name, self.row, self.column
        )
    }
}

/// Decode the payload for a freshly matched token.
///
/// The token patterns guarantee the shape of the text, so the only reachable
/// conversion failure is a 64-bit integer overflow.
fn decode_payload(token: &Token) -> Result<TokenValue> {
    let text = token.text.as_str();
    match token.kind {
        TokenKind::Float => {
            let value = text
                .parse::<f64>()
                .map_err(|_| ParseError::NumberOutOfRange {
                    found: token.to_string(),
                })?;
            Ok(TokenValue::Float(value))
        }
        TokenKind::Integer | TokenKind::Integer64 => {
            let digits = text.trim_end_matches('L');
            let value = digits
                .parse::<i64>()
                .map_err(|_| ParseError::NumberOutOfRange {
                    found: token.to_string(),
                })?;
            Ok(TokenValue::Int {
                value,
                long: digits.len() != text.len(),
            })
        }
        TokenKind::Hex | TokenKind::Hex64 => {
            let digits = text.trim_end_matches('L');
            let value = i64::from_str_radix(&digits[2..], 16).map_err(|_| {
                ParseError::NumberOutOfRange {
                    found: token.to_string(),
                }
            })?;
            Ok(TokenValue::Int {
                value,
                long: digits.len() != text.len(),
            })
        }
        TokenKind::Boolean => Ok(TokenValue::Bool(
            text.starts_with('t') || text.starts_with('T'),
        )),
        TokenKind::Str => {
            let inner = if let Some(stripped) = text.strip_prefix("<\"") {
                stripped.strip_suffix("\">").unwrap_or(stripped)
            } else {
                &text[1..text.len() - 1]
            };
            Ok(TokenValue::Str(decode_escapes(inner)))
        }
        _ => Ok(TokenValue::None),
    }
}

/// Unescape a libconfig string literal.
///
/// Recognizes `\\`, `\'`, `\"`, `\a`, `\b`, `\f`, `\n`, `\r`, `\t`, `\v`,
/// and two-digit `\xNN` hex escapes. Unrecognized escape sequences are kept
/// verbatim.
pub(crate) fn decode_escapes(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('\'') => out.push('\''),
            Some('"') => out.push('"'),
            Some('a') => out.push('\u{07}'),
            Some('b') => out.push('\u{08}'),
            Some('f') => out.push('\u{0C}'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('v') => out.push('\u{0B}'),
            Some('x') => {
                let mut lookahead = chars.clone();
                match (lookahead.next(), lookahead.next()) {
                    (Some(hi), Some(lo)) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit() => {
                        let byte = (hi.to_digit(16).unwrap() * 16 + lo.to_digit(16).unwrap()) as u8;
                        out.push(char::from(byte));
                        chars = lookahead;
                    }
                    _ => out.push_str("\\x"),
                }
            }
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
