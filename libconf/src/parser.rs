//! Phase 3: Recursive-descent parser.
//!
//! Consumes a [`TokenStream`] and produces the document's root [`Group`].
//! The grammar:
//!
//! ```text
//! configuration := setting_list EOF
//! setting_list  := setting*
//! setting       := name (':'|'=') value (';'|',')?
//! value         := scalar | array | list | group
//! array         := '[' scalar_list ']'
//! list          := '(' value_list ')'
//! group         := '{' setting_list '}'
//! ```
//!
//! Alternatives are ordered: each production is tried in sequence and the
//! first that matches wins. A production that does not match must leave the
//! cursor untouched, which `accept` guarantees by only advancing on a kind
//! match. A trailing separator before a closing bracket is tolerated on
//! purpose; the game-data files this grammar grew up around rely on it.

use crate::error::{ParseError, Result};
use crate::stream::TokenStream;
use crate::token::{TokenKind, TokenValue};
use crate::value::{Group, Value};

/// Parse a complete document, failing on trailing input.
pub fn parse(stream: TokenStream) -> Result<Group> {
    Parser { tokens: stream }.configuration()
}

/// A grammar production: returns `Ok(None)` when the lookahead does not
/// start this production, without consuming anything.
type Production = fn(&mut Parser) -> Result<Option<Value>>;

struct Parser {
    tokens: TokenStream,
}

impl Parser {
    fn configuration(&mut self) -> Result<Group> {
        let root = self.setting_list()?;
        if let Some(token) = self.tokens.peek() {
            return Err(ParseError::TrailingInput {
                found: token.to_string(),
            });
        }
        Ok(root)
    }

    /// Zero or more settings; stops (without error) at the first token that
    /// cannot start a setting. Serves as both the document root and the
    /// body of a group. Duplicate names overwrite, keeping first position.
    fn setting_list(&mut self) -> Result<Group> {
        let mut group = Group::new();
        while let Some((name, value)) = self.setting()? {
            group.insert(name, value);
        }
        Ok(group)
    }

    fn setting(&mut self) -> Result<Option<(String, Value)>> {
        let Some(name) = self.tokens.accept(&[TokenKind::Name]) else {
            return Ok(None);
        };
        self.tokens
            .expect(&[TokenKind::Colon, TokenKind::Equals])?;
        let Some(value) = self.value()? else {
            return Err(self.tokens.expected("a value"));
        };
        self.tokens.accept(&[TokenKind::Semicolon, TokenKind::Comma]);
        Ok(Some((name.text, value)))
    }

    fn value(&mut self) -> Result<Option<Value>> {
        const CANDIDATES: &[Production] = &[
            Parser::scalar_value,
            Parser::array,
            Parser::list,
            Parser::group,
        ];
        self.first_of(CANDIDATES)
    }

    /// Scalar alternatives, most common first.
    fn scalar_value(&mut self) -> Result<Option<Value>> {
        const CANDIDATES: &[Production] = &[
            Parser::string,
            Parser::boolean,
            Parser::integer,
            Parser::float,
            Parser::hex,
            Parser::integer64,
            Parser::hex64,
        ];
        self.first_of(CANDIDATES)
    }

    /// Ordered choice: the first production to match wins.
    fn first_of(&mut self, candidates: &[Production]) -> Result<Option<Value>> {
        for production in candidates {
            if let Some(value) = production(self)? {
                return Ok(Some(value));
            }
        }
        Ok(None)
    }

    fn array(&mut self) -> Result<Option<Value>> {
        if self.tokens.accept(&[TokenKind::BracketOpen]).is_none() {
            return Ok(None);
        }
        let values = self.comma_separated(Parser::scalar_value)?;
        self.tokens.expect(&[TokenKind::BracketClose])?;
        Ok(Some(Value::Array(values)))
    }

    fn list(&mut self) -> Result<Option<Value>> {
        if self.tokens.accept(&[TokenKind::ParenOpen]).is_none() {
            return Ok(None);
        }
        let values = self.comma_separated(Parser::value)?;
        self.tokens.expect(&[TokenKind::ParenClose])?;
        Ok(Some(Value::List(values)))
    }

    fn group(&mut self) -> Result<Option<Value>> {
        if self.tokens.accept(&[TokenKind::BraceOpen]).is_none() {
            return Ok(None);
        }
        let group = self.setting_list()?;
        self.tokens.expect(&[TokenKind::BraceClose])?;
        Ok(Some(Value::Group(group)))
    }

    /// Possibly empty comma-separated sequence. A comma followed by no
    /// further element ends the sequence (trailing comma tolerance).
    fn comma_separated(&mut self, element: Production) -> Result<Vec<Value>> {
        let mut values = Vec::new();
        loop {
            let Some(value) = element(self)? else {
                return Ok(values);
            };
            values.push(value);
            if self.tokens.accept(&[TokenKind::Comma]).is_none() {
                return Ok(values);
            }
        }
    }

    /// One or more adjacent string tokens, concatenated C-style.
    fn string(&mut self) -> Result<Option<Value>> {
        let Some(first) = self.tokens.accept(&[TokenKind::Str]) else {
            return Ok(None);
        };
        let mut text = string_payload(&first.value);
        while let Some(next) = self.tokens.accept(&[TokenKind::Str]) {
            text.push_str(&string_payload(&next.value));
        }
        Ok(Some(Value::Str(text)))
    }

    fn boolean(&mut self) -> Result<Option<Value>> {
        Ok(self
            .tokens
            .accept(&[TokenKind::Boolean])
            .map(|t| match t.value {
                TokenValue::Bool(b) => Value::Bool(b),
                _ => unreachable!("boolean token without boolean payload"),
            }))
    }

    fn integer(&mut self) -> Result<Option<Value>> {
        Ok(self
            .tokens
            .accept(&[TokenKind::Integer])
            .map(|t| int_value(&t.value)))
    }

    fn integer64(&mut self) -> Result<Option<Value>> {
        Ok(self
            .tokens
            .accept(&[TokenKind::Integer64])
            .map(|t| int64_value(&t.value)))
    }

    fn hex(&mut self) -> Result<Option<Value>> {
        Ok(self
            .tokens
            .accept(&[TokenKind::Hex])
            .map(|t| int_value(&t.value)))
    }

    fn hex64(&mut self) -> Result<Option<Value>> {
        Ok(self
            .tokens
            .accept(&[TokenKind::Hex64])
            .map(|t| int64_value(&t.value)))
    }

    fn float(&mut self) -> Result<Option<Value>> {
        Ok(self
            .tokens
            .accept(&[TokenKind::Float])
            .map(|t| match t.value {
                TokenValue::Float(f) => Value::Float(f),
                _ => unreachable!("float token without float payload"),
            }))
    }
}

fn string_payload(value: &TokenValue) -> String {
    match value {
        TokenValue::Str(s) => s.clone(),
        _ => unreachable!("string token without string payload"),
    }
}

/// A 32-bit literal; promoted to `Int64` when the value does not fit,
/// so the serializer's range-based `L` suffix round-trips it.
fn int_value(value: &TokenValue) -> Value {
    match value {
        TokenValue::Int { value, .. } => match i32::try_from(*value) {
            Ok(small) => Value::Int(small),
            Err(_) => Value::Int64(*value),
        },
        _ => unreachable!("integer token without integer payload"),
    }
}

fn int64_value(value: &TokenValue) -> Value {
    match value {
        TokenValue::Int { value, .. } => Value::Int64(*value),
        _ => unreachable!("integer token without integer payload"),
    }
}
