//! Tokens of the whole-file stream.

use crate::syntax_kind::TokenKind;
use uscript_core::text::{LineSpan, Position};
use std::fmt;

/// Position of a token in the whole-file token stream.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenId(pub usize);

impl TokenId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Debug for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single lexical fragment with its exact source position.
///
/// `lexical_kind` is computed once from the text when the token is created.
/// `semantic_kind` is filled in by the parser when grammar context tells it
/// more; readers should go through [`Token::kind`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    /// Zero-based line number.
    pub line: u32,
    /// Zero-based byte column.
    pub column: u32,
    /// Position in the whole-file token stream.
    pub index: usize,
    pub lexical_kind: TokenKind,
    pub semantic_kind: Option<TokenKind>,
}

impl Token {
    pub fn new(text: impl Into<String>, line: u32, column: u32, index: usize, lexical_kind: TokenKind) -> Self {
        Self {
            text: text.into(),
            line,
            column,
            index,
            lexical_kind,
            semantic_kind: None,
        }
    }

    #[inline]
    pub fn id(&self) -> TokenId {
        TokenId(self.index)
    }

    /// The parser-assigned kind if there is one, else the lexical guess.
    #[inline]
    pub fn kind(&self) -> TokenKind {
        self.semantic_kind.unwrap_or(self.lexical_kind)
    }

    /// Length of the token text in bytes.
    #[inline]
    pub fn len(&self) -> u32 {
        self.text.len() as u32
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Column just past the last byte of the token.
    #[inline]
    pub fn end_column(&self) -> u32 {
        self.column + self.len()
    }

    #[inline]
    pub fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    #[inline]
    pub fn span(&self) -> LineSpan {
        LineSpan::on_line(self.line, self.column, self.len())
    }

    /// Case-insensitive text comparison; the language ignores case in
    /// keywords and identifiers alike.
    #[inline]
    pub fn is(&self, text: &str) -> bool {
        self.text.eq_ignore_ascii_case(text)
    }

    /// Exact comparison for punctuation.
    #[inline]
    pub fn is_punct(&self, text: &str) -> bool {
        self.text == text
    }

    /// Whether the text has the shape of an identifier, whatever the parser
    /// later decided it means.
    #[inline]
    pub fn is_word(&self) -> bool {
        self.lexical_kind == TokenKind::Identifier
    }

    #[inline]
    pub fn is_comment(&self) -> bool {
        self.kind() == TokenKind::Comment
    }
}
