//! Tokens and comments of one source file.

use serde::Serialize;
use std::fmt;

use crate::core::position::{Position, Span};

/// Stable token index inside one file's token stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct TokenId(pub u32);

impl TokenId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TokenKind {
    Punctuator,
    Keyword,
    Identifier,
    Numeric,
    String,
    /// One static segment of a template literal, including its delimiters.
    Template,
    LineComment,
    BlockComment,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Punctuator => "punctuator",
            TokenKind::Keyword => "keyword",
            TokenKind::Identifier => "identifier",
            TokenKind::Numeric => "number",
            TokenKind::String => "string",
            TokenKind::Template => "template",
            TokenKind::LineComment => "line comment",
            TokenKind::BlockComment => "block comment",
        };
        f.write_str(name)
    }
}

/// Immutable lexical unit; never mutated after lexing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, span: Span) -> Self {
        Self { kind, text: text.into(), span }
    }

    pub fn start(&self) -> Position {
        self.span.start
    }

    pub fn end(&self) -> Position {
        self.span.end
    }

    pub fn is_comment(&self) -> bool {
        matches!(self.kind, TokenKind::LineComment | TokenKind::BlockComment)
    }

    pub fn is_punct(&self, value: &str) -> bool {
        self.kind == TokenKind::Punctuator && self.text == value
    }

    pub fn is_keyword(&self, value: &str) -> bool {
        self.kind == TokenKind::Keyword && self.text == value
    }
}

/// Contiguous half-open run of tokens, comments included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TokenRange {
    pub start: u32,
    pub end: u32,
}

impl TokenRange {
    pub fn empty() -> Self {
        Self { start: 0, end: 0 }
    }

    /// `first..=last`; empty when `last` precedes `first`.
    pub fn inclusive(first: TokenId, last: TokenId) -> Self {
        Self { start: first.0, end: (last.0 + 1).max(first.0) }
    }

    /// Tokens strictly between two tokens.
    pub fn between(open: TokenId, close: TokenId) -> Self {
        Self { start: open.0 + 1, end: close.0.max(open.0 + 1) }
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start) as usize
    }

    pub fn first(&self) -> Option<TokenId> {
        (!self.is_empty()).then_some(TokenId(self.start))
    }

    pub fn last(&self) -> Option<TokenId> {
        (!self.is_empty()).then(|| TokenId(self.end - 1))
    }

    pub fn contains(&self, token: TokenId) -> bool {
        self.start <= token.0 && token.0 < self.end
    }

    pub fn iter(&self) -> impl Iterator<Item = TokenId> {
        (self.start..self.end).map(TokenId)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranges_are_half_open() {
        let range = TokenRange::inclusive(TokenId(2), TokenId(4));
        assert_eq!(range.len(), 3);
        assert!(range.contains(TokenId(4)));
        assert!(!range.contains(TokenId(5)));
        assert_eq!(range.iter().collect::<Vec<_>>(), vec![TokenId(2), TokenId(3), TokenId(4)]);
    }

    #[test]
    fn between_adjacent_tokens_is_empty() {
        let range = TokenRange::between(TokenId(7), TokenId(8));
        assert!(range.is_empty());
        assert_eq!(range.first(), None);
        assert!(TokenRange::inclusive(TokenId(5), TokenId(3)).is_empty());
    }
}
