//! The parser context and the state dispatcher.
//!
//! The parser is fed one line at a time. Every token goes through
//! [`Parser::step`], which takes care of comments and directive lines and
//! then hands the token to the handler of the current [`State`]. A handler
//! may replace the state and re-dispatch the same token when the token
//! belongs to the enclosing construct, so no token is ever skipped over
//! without being looked at.

use tracing::{debug, trace};
use uscript_ast::*;
use uscript_core::text::LineSpan;
use uscript_diagnostics::{messages, Diagnostic, DiagnosticMessage};
use uscript_scanner::Scanner;

use crate::resolve::resolve_array_counts;
use crate::utilities::Keyword;

/// What the next token is expected to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum State {
    // Class header
    ClassKeyword,
    ClassName,
    ClassHeader,
    ClassParent,
    ClassWithin,
    ClassModifierArgs { depth: u32 },

    // Class and struct scope
    Declarations,
    /// Swallow tokens up to the next `;` after a broken declaration.
    Skip,
    ModifierArgs { depth: u32 },
    ConstName,
    ConstEquals,
    ConstValue,
    VarStart,
    VarGroup,
    VarType,
    VarTemplate { depth: u32 },
    VarName,
    VarAfterName,
    VarArray { depth: u32 },
    VarMetadata,
    EnumName,
    EnumOpen,
    EnumBody,
    EnumMetadata,
    StructHeader,
    StructParent,
    StructBody,
    NativeOpen,
    NativeBody { depth: u32 },

    // Functions and states
    FunctionHeader,
    FunctionTemplate { depth: u32 },
    FunctionPrecedence,
    FunctionParams { depth: u32 },
    FunctionAfterParams,
    StateHeader,
    StateHeaderParen,
    StateAfterName,
    StateParent,
    StateBody,
    StateIgnores,

    // Statements
    Code,
    Local,
    Expression { depth: u32 },
    ControlOpen,
    Condition { depth: u32 },
    ControlBody,
    ForEachHeader { depth: u32 },
    CaseValue { depth: u32 },
    DoUntil,
    DoUntilEnd,

    // Replication
    ReplicationOpen,
    ReplicationBody,
    ReplicationConditionOpen,
    ReplicationCondition { depth: u32 },
    ReplicationTargets,

    // Default properties
    DefaultsOpen,
    DefaultsBody,
    DefaultsAfterName,
    DefaultsIndex { depth: u32 },
    DefaultsOperation,
    DefaultsValue { depth: u32, call: bool },
    SubObjectHeader,
    SubObjectEnd,
}

impl State {
    /// Name of the construct left open when the file ends in this state.
    fn open_construct(self) -> Option<&'static str> {
        use State::*;
        let name = match self {
            ClassKeyword | Declarations => return None,
            ClassName | ClassHeader | ClassParent | ClassWithin | ClassModifierArgs { .. } => "class declaration",
            Skip | ModifierArgs { .. } => "declaration",
            ConstName | ConstEquals | ConstValue => "constant declaration",
            VarStart | VarGroup | VarType | VarTemplate { .. } | VarName | VarAfterName | VarArray { .. }
            | VarMetadata => "variable declaration",
            EnumName | EnumOpen | EnumBody | EnumMetadata => "enum body",
            StructHeader | StructParent | StructBody => "struct body",
            NativeOpen | NativeBody { .. } => "cpptext block",
            FunctionHeader | FunctionTemplate { .. } | FunctionPrecedence | FunctionParams { .. }
            | FunctionAfterParams => "function declaration",
            StateHeader | StateHeaderParen | StateAfterName | StateParent | StateBody | StateIgnores => "state body",
            Code | Local | Expression { .. } | ControlOpen | Condition { .. } | ControlBody | ForEachHeader { .. }
            | CaseValue { .. } | DoUntil | DoUntilEnd => "code block",
            ReplicationOpen | ReplicationBody | ReplicationConditionOpen | ReplicationCondition { .. }
            | ReplicationTargets => "replication block",
            DefaultsOpen | DefaultsBody | DefaultsAfterName | DefaultsIndex { .. } | DefaultsOperation
            | DefaultsValue { .. } | SubObjectHeader | SubObjectEnd => "default properties block",
        };
        Some(name)
    }

    fn in_class_header(self) -> bool {
        matches!(
            self,
            State::ClassName
                | State::ClassHeader
                | State::ClassParent
                | State::ClassWithin
                | State::ClassModifierArgs { .. }
        )
    }
}

/// How an open statement body ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BlockKind {
    /// `{` .. `}`.
    Brace,
    /// A brace-less body that holds exactly one statement.
    Single,
    /// A `case X:` or `default:` section, closed by the next section or `}`.
    Case,
}

/// One entry of the code-block stack.
#[derive(Debug)]
pub(crate) struct CodeBlock {
    pub(crate) stmt: Statement,
    pub(crate) kind: BlockKind,
}

/// Tracks a `new` allocation so its class operand is not mistaken for the
/// start of the next statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NewExpr {
    Idle,
    AfterNew,
    /// Inside `new( ... )`; holds the depth just inside the parenthesis.
    Args(u32),
    Closed,
}

/// A `var` declaration being collected.
#[derive(Debug)]
pub(crate) struct PendingVar {
    pub(crate) first: TokenId,
    /// Type, flags and group shared by every name.
    pub(crate) shared: VarDecl,
    pub(crate) declared: Vec<VarDecl>,
    /// The type is an inline `enum`/`struct` still being parsed.
    pub(crate) inline_type: bool,
    /// How many structs were open when the declaration started.
    pub(crate) struct_depth: usize,
}

/// Error-recovering parser for one source file.
///
/// Feed it lines with [`Parser::push_line`] and collect the tree with
/// [`Parser::finish`]. A parser is used for exactly one file.
pub struct Parser {
    pub(crate) ast: ClassUnit,
    pub(crate) state: State,
    scanner: Scanner,
    /// The `/*` of the comment we are inside.
    comment_start: Option<TokenId>,
    /// Line of the `#exec` / `` `define `` directive being collected.
    directive_line: Option<u32>,
    /// The previous token handed to a state handler.
    pub(crate) previous: Option<TokenId>,

    pub(crate) modifiers: Vec<TokenId>,
    pub(crate) blocks: Vec<CodeBlock>,
    pub(crate) buffer: Vec<TokenId>,
    pub(crate) new_expr: NewExpr,

    pub(crate) pending_const: Option<ConstDecl>,
    pub(crate) pending_vars: Vec<PendingVar>,
    pub(crate) pending_enum: Option<EnumDecl>,
    pub(crate) structs: Vec<StructDecl>,
    pub(crate) native_start: Option<TokenId>,
    pub(crate) function: Option<FunctionDecl>,
    pub(crate) header_tokens: Vec<TokenId>,
    pub(crate) state_decl: Option<StateDecl>,
    pub(crate) control: Option<Statement>,
    pub(crate) label: Option<TokenId>,
    pub(crate) local_start: Option<TokenId>,
    pub(crate) replication: Option<ReplicationBlock>,
    pub(crate) rep_statement: Option<ReplicationStatement>,
    pub(crate) defaults: Option<DefaultPropertiesBlock>,
    pub(crate) defaults_in_struct: bool,
    pub(crate) sub_object: Option<SubObject>,
    pub(crate) property: Option<DefaultProperty>,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    pub fn new() -> Self {
        Self {
            ast: ClassUnit::default(),
            state: State::ClassKeyword,
            scanner: Scanner::new(),
            comment_start: None,
            directive_line: None,
            previous: None,
            modifiers: Vec::new(),
            blocks: Vec::new(),
            buffer: Vec::new(),
            new_expr: NewExpr::Idle,
            pending_const: None,
            pending_vars: Vec::new(),
            pending_enum: None,
            structs: Vec::new(),
            native_start: None,
            function: None,
            header_tokens: Vec::new(),
            state_decl: None,
            control: None,
            label: None,
            local_start: None,
            replication: None,
            rep_statement: None,
            defaults: None,
            defaults_in_struct: false,
            sub_object: None,
            property: None,
        }
    }

    /// Tokenize one line and run its tokens through the state machine.
    pub fn push_line(&mut self, line: &str) {
        let tokens = self.scanner.scan_line(line);
        self.ast.lines.push(line.to_string());
        let start = self.ast.tokens.len();
        self.ast.tokens.extend(tokens);
        for index in start..self.ast.tokens.len() {
            self.step(TokenId(index));
        }
    }

    /// Signal end of file: report whatever is still open, close it with
    /// the last token, and run the resolution pass.
    pub fn finish(mut self) -> ClassUnit {
        if let Some(open) = self.comment_start.take() {
            self.error(open, &messages::UNTERMINATED_COMMENT, &[]);
        }
        match self.ast.tokens.len().checked_sub(1).map(TokenId) {
            Some(last) => self.close_open_constructs(last),
            None => self.ast.errors.add(Diagnostic::new(
                LineSpan::on_line(0, 0, 0),
                &messages::CLASS_DECLARATION_EXPECTED,
                &["end of file"],
            )),
        }
        resolve_array_counts(&mut self.ast);
        debug!(
            tokens = self.ast.tokens.len(),
            errors = self.ast.errors.len(),
            class = self.ast.name_text().unwrap_or("<none>"),
            "parse finished"
        );
        self.ast
    }

    // ========================================================================
    // Token dispatch
    // ========================================================================

    fn step(&mut self, id: TokenId) {
        let token = &self.ast.tokens[id.0];
        if self.comment_start.is_some() {
            let closes = token.is_punct("*/");
            self.mark(id, TokenKind::Comment);
            if closes {
                self.comment_start = None;
            }
            return;
        }
        if token.text.starts_with("//") {
            self.mark(id, TokenKind::Comment);
            return;
        }
        if token.is_punct("/*") {
            self.comment_start = Some(id);
            self.mark(id, TokenKind::Comment);
            return;
        }
        if token.is_punct("*/") {
            self.error(id, &messages::UNMATCHED_CLOSING_TOKEN, &["*/"]);
            self.mark(id, TokenKind::Comment);
            return;
        }

        let line = token.line;
        let is_directive = token.is_punct("#") || token.is_punct("`");
        if self.directive_line == Some(line) {
            self.mark(id, TokenKind::Preprocessor);
            if let Some(span) = self.ast.exec_instructions.last_mut() {
                span.extend_to(id);
            }
            return;
        }
        self.directive_line = None;
        if is_directive && self.starts_line(id) {
            self.directive_line = Some(line);
            self.mark(id, TokenKind::Preprocessor);
            self.ast.exec_instructions.push(Span::single(id));
            return;
        }

        trace!(token = %self.text(id), state = ?self.state, "step");
        self.dispatch(id);
        self.previous = Some(id);
    }

    /// Hand a token to the handler of the current state.
    pub(crate) fn dispatch(&mut self, id: TokenId) {
        match self.state {
            State::ClassKeyword => self.class_keyword(id),
            State::ClassName => self.class_name(id),
            State::ClassHeader => self.class_header(id),
            State::ClassParent => self.class_parent(id),
            State::ClassWithin => self.class_within(id),
            State::ClassModifierArgs { depth } => self.class_modifier_args(id, depth),

            State::Declarations => self.declarations(id),
            State::Skip => self.skip(id),
            State::ModifierArgs { depth } => self.modifier_args(id, depth),
            State::ConstName => self.const_name(id),
            State::ConstEquals => self.const_equals(id),
            State::ConstValue => self.const_value(id),
            State::VarStart => self.var_start(id),
            State::VarGroup => self.var_group(id),
            State::VarType => self.var_type(id),
            State::VarTemplate { depth } => self.var_template(id, depth),
            State::VarName => self.var_name(id),
            State::VarAfterName => self.var_after_name(id),
            State::VarArray { depth } => self.var_array(id, depth),
            State::VarMetadata => self.var_metadata(id),
            State::EnumName => self.enum_name(id),
            State::EnumOpen => self.enum_open(id),
            State::EnumBody => self.enum_body(id),
            State::EnumMetadata => self.enum_metadata(id),
            State::StructHeader => self.struct_header(id),
            State::StructParent => self.struct_parent(id),
            State::StructBody => self.struct_body(id),
            State::NativeOpen => self.native_open(id),
            State::NativeBody { depth } => self.native_body(id, depth),

            State::FunctionHeader => self.function_header(id),
            State::FunctionTemplate { depth } => self.function_template(id, depth),
            State::FunctionPrecedence => self.function_precedence(id),
            State::FunctionParams { depth } => self.function_params(id, depth),
            State::FunctionAfterParams => self.function_after_params(id),
            State::StateHeader => self.state_header(id),
            State::StateHeaderParen => self.state_header_paren(id),
            State::StateAfterName => self.state_after_name(id),
            State::StateParent => self.state_parent(id),
            State::StateBody => self.state_body(id),
            State::StateIgnores => self.state_ignores(id),

            State::Code => self.code(id),
            State::Local => self.local(id),
            State::Expression { depth } => self.expression(id, depth),
            State::ControlOpen => self.control_open(id),
            State::Condition { depth } => self.condition(id, depth),
            State::ControlBody => self.control_body(id),
            State::ForEachHeader { depth } => self.foreach_header(id, depth),
            State::CaseValue { depth } => self.case_value(id, depth),
            State::DoUntil => self.do_until(id),
            State::DoUntilEnd => self.do_until_end(id),

            State::ReplicationOpen => self.replication_open(id),
            State::ReplicationBody => self.replication_body(id),
            State::ReplicationConditionOpen => self.replication_condition_open(id),
            State::ReplicationCondition { depth } => self.replication_condition(id, depth),
            State::ReplicationTargets => self.replication_targets(id),

            State::DefaultsOpen => self.defaults_open(id),
            State::DefaultsBody => self.defaults_body(id),
            State::DefaultsAfterName => self.defaults_after_name(id),
            State::DefaultsIndex { depth } => self.defaults_index(id, depth),
            State::DefaultsOperation => self.defaults_operation(id),
            State::DefaultsValue { depth, call } => self.defaults_value(id, depth, call),
            State::SubObjectHeader => self.sub_object_header(id),
            State::SubObjectEnd => self.sub_object_end(id),
        }
    }

    // ========================================================================
    // Token helpers
    // ========================================================================

    #[inline]
    pub(crate) fn token(&self, id: TokenId) -> &Token {
        &self.ast.tokens[id.0]
    }

    #[inline]
    pub(crate) fn text(&self, id: TokenId) -> &str {
        &self.ast.tokens[id.0].text
    }

    #[inline]
    pub(crate) fn keyword(&self, id: TokenId) -> Option<Keyword> {
        let token = self.token(id);
        if token.is_word() {
            Keyword::from_text(&token.text)
        } else {
            None
        }
    }

    /// The byte of a single-character token, for matching punctuation.
    #[inline]
    pub(crate) fn sym(&self, id: TokenId) -> Option<u8> {
        match self.text(id).as_bytes() {
            [byte] => Some(*byte),
            _ => None,
        }
    }

    #[inline]
    pub(crate) fn is(&self, id: TokenId, text: &str) -> bool {
        self.token(id).is(text)
    }

    #[inline]
    pub(crate) fn is_word(&self, id: TokenId) -> bool {
        self.token(id).is_word()
    }

    #[inline]
    pub(crate) fn line_of(&self, id: TokenId) -> u32 {
        self.token(id).line
    }

    /// Whether no token precedes this one on its line.
    pub(crate) fn starts_line(&self, id: TokenId) -> bool {
        id.0 == 0 || self.ast.tokens[id.0 - 1].line != self.token(id).line
    }

    /// Record what the parser decided a token means.
    #[inline]
    pub(crate) fn mark(&mut self, id: TokenId, kind: TokenKind) {
        self.ast.tokens[id.0].semantic_kind = Some(kind);
    }

    pub(crate) fn statement_keyword(&self, stmt: &Statement) -> Option<Keyword> {
        stmt.op.and_then(|op| self.keyword(op))
    }

    // ========================================================================
    // Errors
    // ========================================================================

    pub(crate) fn error(&mut self, id: TokenId, message: &DiagnosticMessage, args: &[&str]) {
        let diagnostic = Diagnostic::new(self.token(id).span(), message, args).with_token(id.0);
        trace!(%diagnostic, "parse error");
        self.ast.errors.add(diagnostic);
    }

    /// Report a message whose only argument is the offending token's text.
    pub(crate) fn error_at(&mut self, id: TokenId, message: &DiagnosticMessage) {
        let text = self.text(id).to_string();
        self.error(id, message, &[&text]);
    }

    /// Report `'{expected}' expected, found '...'`.
    pub(crate) fn expected(&mut self, id: TokenId, expected: &str) {
        let found = self.text(id).to_string();
        self.error(id, &messages::_0_EXPECTED_FOUND_1, &[expected, &found]);
    }

    // ========================================================================
    // Scopes
    // ========================================================================

    /// Return to the scope that encloses declarations: the innermost open
    /// struct, the open state, or the class.
    pub(crate) fn resume_scope(&mut self) {
        self.state = if !self.structs.is_empty() {
            State::StructBody
        } else if self.state_decl.is_some() && self.function.is_none() {
            State::StateBody
        } else {
            State::Declarations
        };
    }

    /// Whether a token can only begin a new declaration.
    pub(crate) fn starts_declaration(&self, id: TokenId) -> bool {
        match self.keyword(id) {
            Some(keyword) => {
                keyword.is_function_kind()
                    || matches!(
                        keyword,
                        Keyword::Var
                            | Keyword::Const
                            | Keyword::Enum
                            | Keyword::Struct
                            | Keyword::State
                            | Keyword::Replication
                            | Keyword::DefaultProperties
                            | Keyword::StructDefaultProperties
                            | Keyword::CppText
                            | Keyword::StructCppText
                            | Keyword::CppStruct
                    )
            }
            None => false,
        }
    }

    /// Recover from a broken declaration: a token that starts something new
    /// (or closes the enclosing scope) is handed back to the scope, anything
    /// else is skipped up to the next `;`.
    pub(crate) fn recover_in_scope(&mut self, id: TokenId) {
        self.resume_scope();
        match self.sym(id) {
            Some(b';') => {}
            Some(b'}') => self.dispatch(id),
            _ if self.starts_declaration(id) => self.dispatch(id),
            _ => self.state = State::Skip,
        }
    }

    pub(crate) fn skip(&mut self, id: TokenId) {
        match self.sym(id) {
            Some(b';') => self.resume_scope(),
            Some(b'}') => {
                self.resume_scope();
                self.dispatch(id);
            }
            _ if self.starts_line(id) && self.starts_declaration(id) => {
                self.resume_scope();
                self.dispatch(id);
            }
            _ => {}
        }
    }

    // ========================================================================
    // End of file
    // ========================================================================

    fn close_open_constructs(&mut self, last: TokenId) {
        if self.state == State::ClassKeyword {
            self.error(last, &messages::CLASS_DECLARATION_EXPECTED, &["end of file"]);
        } else if self.state.in_class_header() {
            self.error(last, &messages::UNTERMINATED_CLASS_DECLARATION, &[]);
            if let Some(header) = self.ast.header.as_mut() {
                header.extend_to(last);
            }
        } else if let Some(construct) = self.state.open_construct() {
            self.error(last, &messages::UNTERMINATED_CONSTRUCT, &[construct]);
        }

        match self.state {
            State::Expression { .. } => self.complete_expression(None),
            State::Local => self.finish_local(None),
            _ => {}
        }
        if let Some(mut control) = self.control.take() {
            if control.body_span.is_none() {
                control.body_span = Some(Span::single(control.span.last));
            }
            self.append_statement(control);
        }
        self.flush_label();
        while !self.blocks.is_empty() {
            self.close_block(Some(last));
            if let Some(control) = self.control.take() {
                self.append_statement(control);
            }
        }
        if let Some(mut function) = self.function.take() {
            function.span.extend_to(last);
            if let Some(body) = function.body_span.as_mut() {
                body.last = last;
            }
            self.push_function(function);
        }

        self.close_open_defaults(last);
        if let Some(mut statement) = self.rep_statement.take() {
            statement.span.extend_to(last);
            if let Some(block) = self.replication.as_mut() {
                block.statements.push(statement);
            }
        }
        if let Some(mut block) = self.replication.take() {
            block.span.extend_to(last);
            if let Some(body) = block.body.as_mut() {
                body.last = last;
            }
            self.ast.replication.push(block);
        }
        if let Some(start) = self.native_start.take() {
            self.ast.native_blocks.push(Span::new(start, last));
        }
        if let Some(mut constant) = self.pending_const.take() {
            constant.span.extend_to(last);
            self.ast.constants.push(constant);
        }
        while !self.pending_vars.is_empty() {
            self.finish_var(last);
        }
        if let Some(mut decl) = self.pending_enum.take() {
            decl.span.extend_to(last);
            if let Some(body) = decl.body.as_mut() {
                body.last = last;
            }
            self.ast.enums.push(decl);
        }
        while let Some(mut decl) = self.structs.pop() {
            decl.span.extend_to(last);
            if let Some(body) = decl.body.as_mut() {
                body.last = last;
            }
            self.ast.structs.push(decl);
        }
        if let Some(mut state) = self.state_decl.take() {
            state.span.extend_to(last);
            if let Some(body) = state.body_span.as_mut() {
                body.last = last;
            }
            self.ast.states.push(state);
        }
    }
}
