//! TokenKind enum - lexical guesses and parser-assigned meanings.
//!
//! The first six variants are what the scanner can tell from a token's text
//! alone. Every other variant is only ever assigned by the parser once the
//! grammar context is known.

/// The kind of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum TokenKind {
    // ========================================================================
    // Lexical kinds
    // ========================================================================
    /// Syntax punctuation (`.;(),{}[]`) and anything unrecognised.
    None,
    Operator,
    String,
    /// Single-quoted name literal, `'Foo'`.
    Name,
    Number,
    Identifier,

    // ========================================================================
    // Semantic kinds
    // ========================================================================
    Comment,
    /// `#exec` and `` `define`` style whole-line directives.
    Preprocessor,
    Keyword,
    Modifier,
    /// `True`, `False`, `None`.
    Literal,
    ClassDeclaration,
    ClassReference,
    TypeReference,
    ConstDeclaration,
    EnumDeclaration,
    EnumMember,
    StructDeclaration,
    VariableDeclaration,
    LocalDeclaration,
    ParameterDeclaration,
    FunctionDeclaration,
    FunctionReference,
    StateDeclaration,
    StateReference,
    LabelDeclaration,
    /// Property names in default-properties and replication blocks.
    PropertyReference,
    /// Opaque native text inside `cpptext` blocks.
    Native,
}

impl TokenKind {
    /// Whether this kind can be produced by the lexical classifier.
    pub fn is_lexical(self) -> bool {
        matches!(
            self,
            TokenKind::None
                | TokenKind::Operator
                | TokenKind::String
                | TokenKind::Name
                | TokenKind::Number
                | TokenKind::Identifier
        )
    }

    /// Whether this kind names a declaration site.
    pub fn is_declaration(self) -> bool {
        matches!(
            self,
            TokenKind::ClassDeclaration
                | TokenKind::ConstDeclaration
                | TokenKind::EnumDeclaration
                | TokenKind::StructDeclaration
                | TokenKind::VariableDeclaration
                | TokenKind::LocalDeclaration
                | TokenKind::ParameterDeclaration
                | TokenKind::FunctionDeclaration
                | TokenKind::StateDeclaration
                | TokenKind::LabelDeclaration
        )
    }

    /// Whether this kind is a literal value.
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            TokenKind::String | TokenKind::Name | TokenKind::Number | TokenKind::Literal
        )
    }

    /// Whether tokens of this kind carry no code.
    pub fn is_trivia(self) -> bool {
        matches!(self, TokenKind::Comment | TokenKind::Preprocessor | TokenKind::Native)
    }
}
