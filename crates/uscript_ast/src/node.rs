//! AST node definitions.
//!
//! Nodes never own token text; they hold [`TokenId`]s into
//! [`ClassUnit::tokens`]. Every node with a body keeps a first/last token
//! [`Span`], recorded even when the construct was cut short by an error.

use crate::syntax_kind::TokenKind;
use crate::token::{Token, TokenId};
use crate::types::*;
use uscript_diagnostics::DiagnosticCollection;

// ============================================================================
// Spans and expressions
// ============================================================================

/// The first and last token of a construct, both inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub first: TokenId,
    pub last: TokenId,
}

impl Span {
    #[inline]
    pub fn new(first: TokenId, last: TokenId) -> Self {
        Self { first, last }
    }

    #[inline]
    pub fn single(id: TokenId) -> Self {
        Self { first: id, last: id }
    }

    /// Move the end of the span forward, never backward.
    #[inline]
    pub fn extend_to(&mut self, id: TokenId) {
        if id > self.last {
            self.last = id;
        }
    }

    #[inline]
    pub fn contains(&self, id: TokenId) -> bool {
        id >= self.first && id <= self.last
    }
}

/// An expression: either a plain token or an operator applied to operands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Token(TokenId),
    Node(Box<ExprNode>),
}

/// An operator (or callee) token with its operands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExprNode {
    pub op: TokenId,
    pub args: Vec<Expr>,
    pub span: Span,
}

impl Expr {
    pub fn node(op: TokenId, args: Vec<Expr>, span: Span) -> Self {
        Expr::Node(Box::new(ExprNode { op, args, span }))
    }

    pub fn first_token(&self) -> TokenId {
        match self {
            Expr::Token(id) => *id,
            Expr::Node(node) => node.span.first,
        }
    }

    pub fn last_token(&self) -> TokenId {
        match self {
            Expr::Token(id) => *id,
            Expr::Node(node) => node.span.last,
        }
    }

    pub fn span(&self) -> Span {
        Span::new(self.first_token(), self.last_token())
    }

    pub fn as_token(&self) -> Option<TokenId> {
        match self {
            Expr::Token(id) => Some(*id),
            Expr::Node(_) => None,
        }
    }

    /// Visit every token referenced by this tree, operators first.
    pub fn for_each_token(&self, f: &mut impl FnMut(TokenId)) {
        match self {
            Expr::Token(id) => f(*id),
            Expr::Node(node) => {
                f(node.op);
                for arg in &node.args {
                    arg.for_each_token(f);
                }
            }
        }
    }
}

// ============================================================================
// Statements
// ============================================================================

/// A statement in a function body or in state code.
///
/// Control statements (`if`, `else`, `while`, `for`, `foreach`, `do`,
/// `switch`, `case`, bare blocks) carry a `body_span`; simple statements
/// (assignments, calls, `return`, `break`, `goto`, ...) do not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    /// Keyword, assignment operator, or callee. `None` for empty statements.
    pub op: Option<TokenId>,
    pub args: Vec<Expr>,
    pub body: Vec<Statement>,
    pub span: Span,
    pub label: Option<TokenId>,
    /// The body was a single statement without braces.
    pub single_statement_body: bool,
    /// `(` .. `)` around a control statement's condition.
    pub condition: Option<Span>,
    /// `{` .. `}` for braced bodies; the lone statement for brace-less ones.
    pub body_span: Option<Span>,
}

impl Statement {
    pub fn new(op: Option<TokenId>, first: TokenId) -> Self {
        Self {
            op,
            args: Vec::new(),
            body: Vec::new(),
            span: Span::single(first),
            label: None,
            single_statement_body: false,
            condition: None,
            body_span: None,
        }
    }

    /// Whether this statement owns a nested body.
    #[inline]
    pub fn is_control(&self) -> bool {
        self.body_span.is_some()
    }
}

// ============================================================================
// Declarations
// ============================================================================

/// Array dimension of a declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArrayCount {
    Literal(u32),
    /// An expression the resolution pass could not reduce to a number.
    Expression(Expr),
}

/// A class variable, struct member, local, or parameter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VarDecl {
    pub type_token: Option<TokenId>,
    /// `T` in `array<T>` / `class<T>`.
    pub template: Option<TokenId>,
    pub name: Option<TokenId>,
    pub array_count: Option<ArrayCount>,
    pub flags: VarFlags,
    /// `Group` in `var(Group)`.
    pub group: Option<TokenId>,
    /// `= value` on optional parameters.
    pub default_value: Option<Expr>,
    pub span: Option<Span>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstDecl {
    pub name: Option<TokenId>,
    pub value: Vec<TokenId>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDecl {
    pub name: Option<TokenId>,
    pub members: Vec<TokenId>,
    /// `{` .. `}`.
    pub body: Option<Span>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructDecl {
    pub name: Option<TokenId>,
    pub parent: Option<TokenId>,
    pub flags: StructFlags,
    pub members: Vec<VarDecl>,
    pub defaults: Vec<DefaultPropertiesBlock>,
    pub body: Option<Span>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDecl {
    /// `function`, `event`, `operator`, ...
    pub kind_token: Option<TokenId>,
    pub name: Option<TokenId>,
    pub return_type: Option<TokenId>,
    pub return_template: Option<TokenId>,
    pub flags: FunctionFlags,
    /// `N` in `native(N)`.
    pub native_index: Option<TokenId>,
    /// `N` in `operator(N)`.
    pub precedence: Option<TokenId>,
    pub params: Vec<VarDecl>,
    pub locals: Vec<VarDecl>,
    pub body: Vec<Statement>,
    /// `(` .. `)`.
    pub params_span: Option<Span>,
    /// `{` .. `}`.
    pub body_span: Option<Span>,
    pub span: Span,
}

impl FunctionDecl {
    pub fn has_body(&self) -> bool {
        self.body_span.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateDecl {
    pub name: Option<TokenId>,
    pub parent: Option<TokenId>,
    pub flags: StateFlags,
    pub ignores: Vec<TokenId>,
    pub functions: Vec<FunctionDecl>,
    /// Labeled state code.
    pub body: Vec<Statement>,
    pub body_span: Option<Span>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplicationStatement {
    /// `reliable` / `unreliable`.
    pub reliability: Option<TokenId>,
    pub condition: Option<Expr>,
    /// `(` .. `)`.
    pub condition_span: Option<Span>,
    pub targets: Vec<TokenId>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplicationBlock {
    pub statements: Vec<ReplicationStatement>,
    pub body: Option<Span>,
    pub span: Span,
}

/// A value on the right of a default-property assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultValue {
    Empty,
    /// A bare literal or identifier.
    Literal(TokenId),
    /// `Type'Package.Name'`.
    ObjectReference { class: TokenId, path: TokenId },
    /// `( ... )`.
    Aggregate(Aggregate),
    /// Anything else, kept verbatim.
    Tokens(Vec<TokenId>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregate {
    pub entries: Vec<AggregateEntry>,
    pub span: Span,
}

/// `Name=value`, `Name(0)=value`, or a positional `value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateEntry {
    pub name: Option<TokenId>,
    pub index: Option<Expr>,
    pub value: DefaultValue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultProperty {
    pub name: TokenId,
    /// `Name(0)` or `Name[0]`.
    pub index: Option<Expr>,
    /// `Add` in `Name.Add(X)`.
    pub operation: Option<TokenId>,
    pub value: DefaultValue,
    pub span: Span,
}

/// `Begin Object ... End Object` inside default properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubObject {
    pub class: Option<TokenId>,
    pub name: Option<TokenId>,
    pub properties: Vec<DefaultProperty>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultPropertiesBlock {
    pub properties: Vec<DefaultProperty>,
    pub sub_objects: Vec<SubObject>,
    /// `{` .. `}`.
    pub body: Option<Span>,
    pub span: Span,
}

// ============================================================================
// Class unit
// ============================================================================

/// The root of the tree built from one source file.
#[derive(Debug, Clone, Default)]
pub struct ClassUnit {
    pub name: Option<TokenId>,
    pub parent: Option<TokenId>,
    /// `Package` in `extends Package.Parent`.
    pub parent_package: Option<TokenId>,
    pub flags: ClassFlags,
    /// Every header modifier word, including ones without a flag.
    pub modifiers: Vec<TokenId>,
    /// `Name` in `config(Name)`.
    pub config_name: Option<TokenId>,
    /// `class` .. `;`.
    pub header: Option<Span>,
    pub constants: Vec<ConstDecl>,
    pub variables: Vec<VarDecl>,
    pub enums: Vec<EnumDecl>,
    pub structs: Vec<StructDecl>,
    pub functions: Vec<FunctionDecl>,
    pub states: Vec<StateDecl>,
    pub default_properties: Vec<DefaultPropertiesBlock>,
    pub replication: Vec<ReplicationBlock>,
    /// Whole-line directives.
    pub exec_instructions: Vec<Span>,
    /// Opaque `cpptext { ... }` regions.
    pub native_blocks: Vec<Span>,
    pub tokens: Vec<Token>,
    pub lines: Vec<String>,
    pub errors: DiagnosticCollection,
}

impl ClassUnit {
    #[inline]
    pub fn token(&self, id: TokenId) -> &Token {
        &self.tokens[id.0]
    }

    #[inline]
    pub fn text(&self, id: TokenId) -> &str {
        &self.tokens[id.0].text
    }

    /// The class name as written, if one was parsed.
    pub fn name_text(&self) -> Option<&str> {
        self.name.map(|id| self.text(id))
    }

    /// Every function, including those declared inside states.
    pub fn all_functions(&self) -> impl Iterator<Item = &FunctionDecl> {
        self.functions
            .iter()
            .chain(self.states.iter().flat_map(|s| s.functions.iter()))
    }

    /// Every default-property assignment of the class itself.
    pub fn all_default_properties(&self) -> impl Iterator<Item = &DefaultProperty> {
        self.default_properties.iter().flat_map(|b| b.properties.iter())
    }

    /// The first and last line of a span.
    pub fn span_lines(&self, span: Span) -> (u32, u32) {
        (self.token(span.first).line, self.token(span.last).line)
    }

    /// Tokens on one line, in order. Relies on the stream being sorted.
    pub fn tokens_on_line(&self, line: u32) -> &[Token] {
        let start = self.tokens.partition_point(|t| t.line < line);
        let end = self.tokens.partition_point(|t| t.line <= line);
        &self.tokens[start..end]
    }

    /// The nearest token before `id` that is not trivia.
    pub fn previous_code_token(&self, id: TokenId) -> Option<&Token> {
        self.tokens[..id.0].iter().rev().find(|t| !t.kind().is_trivia())
    }

    /// The nearest token after `id` that is not trivia.
    pub fn next_code_token(&self, id: TokenId) -> Option<&Token> {
        self.tokens.get(id.0 + 1..)?.iter().find(|t| !t.kind().is_trivia())
    }

    /// Whether every token on the line is a comment.
    pub fn is_comment_line(&self, line: u32) -> bool {
        let tokens = self.tokens_on_line(line);
        !tokens.is_empty() && tokens.iter().all(|t| t.kind() == TokenKind::Comment)
    }
}
