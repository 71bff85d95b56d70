//! Function and state declarations.

use uscript_ast::*;
use uscript_diagnostics::messages;

use crate::expressions::split_top_level;
use crate::parser::{Parser, State};
use crate::utilities::Keyword;

impl Parser {
    // ========================================================================
    // Functions
    // ========================================================================

    /// Start a function at its kind keyword, consuming collected modifiers.
    pub(crate) fn start_function(&mut self, kind: TokenId) {
        let mut flags = FunctionFlags::kind_from_keyword(self.text(kind)).unwrap_or(FunctionFlags::empty());
        let mut native_index = None;
        let modifiers = std::mem::take(&mut self.modifiers);
        for (i, &id) in modifiers.iter().enumerate() {
            if !self.is_word(id) {
                continue;
            }
            if let Some(flag) = FunctionFlags::from_keyword(self.text(id)) {
                flags |= flag;
            }
            if self.is(id, "native") && modifiers.get(i + 1).map_or(false, |&p| self.sym(p) == Some(b'(')) {
                native_index = modifiers
                    .get(i + 2)
                    .copied()
                    .filter(|&n| self.token(n).lexical_kind == TokenKind::Number);
            }
        }
        self.mark(kind, TokenKind::Keyword);
        self.function = Some(FunctionDecl {
            kind_token: Some(kind),
            name: None,
            return_type: None,
            return_template: None,
            flags,
            native_index,
            precedence: None,
            params: Vec::new(),
            locals: Vec::new(),
            body: Vec::new(),
            params_span: None,
            body_span: None,
            span: Span::new(modifiers.first().copied().unwrap_or(kind), kind),
        });
        self.header_tokens.clear();
        self.blocks.clear();
        self.state = State::FunctionHeader;
    }

    fn function_mut(&mut self) -> Option<&mut FunctionDecl> {
        self.function.as_mut()
    }

    pub(crate) fn function_header(&mut self, id: TokenId) {
        if let Some(function) = self.function_mut() {
            function.span.extend_to(id);
        }
        let flags = self.function.as_ref().map_or(FunctionFlags::empty(), |f| f.flags);
        let modifier = if self.is_word(id) {
            FunctionFlags::from_keyword(self.text(id))
        } else {
            None
        };
        match self.sym(id) {
            Some(b'(') if self.header_tokens.is_empty() && flags.contains(FunctionFlags::OPERATOR) => {
                self.state = State::FunctionPrecedence;
            }
            Some(b'<') => self.state = State::FunctionTemplate { depth: 1 },
            Some(b'(') => self.open_params(id),
            Some(b';' | b'{' | b'}') => {
                self.error(id, &messages::FUNCTION_NAME_EXPECTED, &[]);
                self.abandon_function(id);
            }
            _ if modifier.is_some() => {
                self.mark(id, TokenKind::Modifier);
                if let (Some(flag), Some(function)) = (modifier, self.function.as_mut()) {
                    function.flags |= flag;
                }
            }
            _ => self.header_tokens.push(id),
        }
    }

    /// `(` after the header words: the last word is the name, the one
    /// before it the return type.
    fn open_params(&mut self, open: TokenId) {
        let name = self.header_tokens.last().copied();
        let return_type = self.header_tokens.len().checked_sub(2).map(|i| self.header_tokens[i]);
        match name {
            Some(name) => self.mark(name, TokenKind::FunctionDeclaration),
            None => self.error(open, &messages::FUNCTION_NAME_EXPECTED, &[]),
        }
        if let Some(ty) = return_type {
            self.mark(ty, TokenKind::TypeReference);
        }
        if let Some(function) = self.function.as_mut() {
            function.name = name;
            function.return_type = return_type;
            function.params_span = Some(Span::single(open));
        }
        self.buffer.clear();
        self.state = State::FunctionParams { depth: 1 };
    }

    /// `array<Type>` as a return type.
    pub(crate) fn function_template(&mut self, id: TokenId, depth: u32) {
        let depth = match self.text(id) {
            "<" => depth + 1,
            ">" => depth.saturating_sub(1),
            ">>" => depth.saturating_sub(2),
            "(" | ";" | "{" => {
                self.expected(id, ">");
                self.state = State::FunctionHeader;
                return self.dispatch(id);
            }
            _ => {
                if self.is_word(id) {
                    self.mark(id, TokenKind::TypeReference);
                    if let Some(function) = self.function.as_mut() {
                        function.return_template.get_or_insert(id);
                    }
                }
                depth
            }
        };
        self.state = if depth == 0 {
            State::FunctionHeader
        } else {
            State::FunctionTemplate { depth }
        };
    }

    /// `operator(N)`.
    pub(crate) fn function_precedence(&mut self, id: TokenId) {
        if self.sym(id) == Some(b')') {
            self.state = State::FunctionHeader;
        } else if self.token(id).lexical_kind == TokenKind::Number {
            if let Some(function) = self.function.as_mut() {
                function.precedence = Some(id);
            }
        } else {
            self.expected(id, ")");
            self.state = State::FunctionHeader;
            self.dispatch(id);
        }
    }

    pub(crate) fn function_params(&mut self, id: TokenId, depth: u32) {
        let depth = match self.sym(id) {
            Some(b'(') => depth + 1,
            Some(b')') => depth - 1,
            Some(b';' | b'{' | b'}') => {
                self.expected(id, ")");
                self.close_params(None);
                return self.dispatch(id);
            }
            _ => depth,
        };
        if depth == 0 {
            return self.close_params(Some(id));
        }
        self.buffer.push(id);
        self.state = State::FunctionParams { depth };
    }

    fn close_params(&mut self, close: Option<TokenId>) {
        let ids = std::mem::take(&mut self.buffer);
        let mut params = Vec::new();
        for part in split_top_level(&self.ast.tokens, &ids, ",") {
            if !part.is_empty() {
                params.extend(self.parse_var_list(part, VarFlags::PARAMETER, TokenKind::ParameterDeclaration, true));
            }
        }
        if let Some(function) = self.function.as_mut() {
            function.params = params;
            if let (Some(close), Some(span)) = (close, function.params_span.as_mut()) {
                span.last = close;
                function.span.extend_to(close);
            }
        }
        self.state = State::FunctionAfterParams;
    }

    pub(crate) fn function_after_params(&mut self, id: TokenId) {
        if self.keyword(id) == Some(Keyword::Const) {
            self.mark(id, TokenKind::Modifier);
            if let Some(function) = self.function.as_mut() {
                function.flags |= FunctionFlags::CONST;
                function.span.extend_to(id);
            }
            return;
        }
        match self.sym(id) {
            Some(b';') => {
                if let Some(mut function) = self.function.take() {
                    function.flags |= FunctionFlags::DECLARATION_ONLY;
                    function.span.extend_to(id);
                    self.push_function(function);
                }
            }
            Some(b'{') => {
                if let Some(function) = self.function.as_mut() {
                    function.body_span = Some(Span::single(id));
                    function.span.extend_to(id);
                }
                self.state = State::Code;
            }
            _ => {
                self.expected(id, "{");
                self.abandon_function(id);
            }
        }
    }

    /// Store a finished function in the open state or the class.
    pub(crate) fn push_function(&mut self, function: FunctionDecl) {
        match self.state_decl.as_mut() {
            Some(state) => state.functions.push(function),
            None => self.ast.functions.push(function),
        }
        self.resume_scope();
    }

    fn abandon_function(&mut self, id: TokenId) {
        if let Some(mut function) = self.function.take() {
            function.flags |= FunctionFlags::DECLARATION_ONLY;
            self.push_function(function);
        }
        self.recover_in_scope(id);
    }

    // ========================================================================
    // States
    // ========================================================================

    pub(crate) fn start_state(&mut self, id: TokenId) {
        let modifiers = std::mem::take(&mut self.modifiers);
        let mut flags = StateFlags::empty();
        for &m in &modifiers {
            if !self.is_word(m) {
                continue;
            }
            match StateFlags::from_keyword(self.text(m)) {
                Some(flag) => flags |= flag,
                None => self.error_at(m, &messages::UNEXPECTED_TOKEN),
            }
        }
        if let Some(open) = self.state_decl.take() {
            self.error(id, &messages::UNTERMINATED_CONSTRUCT, &["state body"]);
            self.ast.states.push(open);
        }
        self.mark(id, TokenKind::Keyword);
        self.state_decl = Some(StateDecl {
            name: None,
            parent: None,
            flags,
            ignores: Vec::new(),
            functions: Vec::new(),
            body: Vec::new(),
            body_span: None,
            span: Span::new(modifiers.first().copied().unwrap_or(id), id),
        });
        self.state = State::StateHeader;
    }

    fn extend_state(&mut self, id: TokenId) {
        if let Some(state) = self.state_decl.as_mut() {
            state.span.extend_to(id);
        }
    }

    pub(crate) fn state_header(&mut self, id: TokenId) {
        self.extend_state(id);
        if self.sym(id) == Some(b'(') {
            if let Some(state) = self.state_decl.as_mut() {
                state.flags |= StateFlags::EDITABLE;
            }
            self.state = State::StateHeaderParen;
        } else if self.is_word(id) && !self.starts_declaration(id) {
            self.mark(id, TokenKind::StateDeclaration);
            if let Some(state) = self.state_decl.as_mut() {
                state.name = Some(id);
            }
            self.state = State::StateAfterName;
        } else {
            self.error_at(id, &messages::STATE_NAME_EXPECTED);
            self.state = State::StateAfterName;
            self.dispatch(id);
        }
    }

    pub(crate) fn state_header_paren(&mut self, id: TokenId) {
        self.extend_state(id);
        if self.sym(id) == Some(b')') {
            self.state = State::StateHeader;
        }
    }

    pub(crate) fn state_after_name(&mut self, id: TokenId) {
        match self.keyword(id) {
            Some(Keyword::Extends | Keyword::Expands) => {
                self.extend_state(id);
                self.mark(id, TokenKind::Keyword);
                self.state = State::StateParent;
                return;
            }
            _ => {}
        }
        if self.sym(id) == Some(b'{') {
            self.extend_state(id);
            if let Some(state) = self.state_decl.as_mut() {
                state.body_span = Some(Span::single(id));
            }
            self.state = State::StateBody;
        } else {
            self.expected(id, "{");
            if let Some(state) = self.state_decl.take() {
                self.ast.states.push(state);
            }
            self.recover_in_scope(id);
        }
    }

    pub(crate) fn state_parent(&mut self, id: TokenId) {
        if self.is_word(id) && !self.starts_declaration(id) {
            self.extend_state(id);
            self.mark(id, TokenKind::StateReference);
            if let Some(state) = self.state_decl.as_mut() {
                state.parent = Some(id);
            }
            self.state = State::StateAfterName;
        } else {
            self.error_at(id, &messages::STATE_NAME_EXPECTED);
            self.state = State::StateAfterName;
            self.dispatch(id);
        }
    }

    /// Inside `state X { ... }`: functions, `ignores`, and labeled state
    /// code.
    pub(crate) fn state_body(&mut self, id: TokenId) {
        let keyword = self.keyword(id);
        if matches!(keyword, Some(kw) if kw.is_function_kind()) {
            return self.start_function(id);
        }
        if self.is_modifier(id) {
            return self.push_modifier(id);
        }
        match keyword {
            Some(Keyword::Ignores) => {
                self.mark(id, TokenKind::Keyword);
                self.state = State::StateIgnores;
            }
            Some(Keyword::Local) => {
                self.error(id, &messages::LOCAL_OUTSIDE_FUNCTION, &[]);
                self.state = State::Skip;
            }
            _ => match self.sym(id) {
                Some(b'}') => self.close_state(id),
                Some(b';') => {}
                Some(b'(') if self.follows_modifier() => {
                    self.modifiers.push(id);
                    self.state = State::ModifierArgs { depth: 1 };
                }
                _ => {
                    self.drop_stale_modifiers();
                    self.state = State::Code;
                    self.dispatch(id);
                }
            },
        }
    }

    pub(crate) fn state_ignores(&mut self, id: TokenId) {
        match self.sym(id) {
            Some(b',') => {}
            Some(b';') => self.state = State::StateBody,
            _ if self.is_word(id) => {
                self.mark(id, TokenKind::FunctionReference);
                if let Some(state) = self.state_decl.as_mut() {
                    state.ignores.push(id);
                }
            }
            _ => {
                self.expected(id, ";");
                self.state = State::StateBody;
                self.dispatch(id);
            }
        }
    }

    pub(crate) fn close_state(&mut self, id: TokenId) {
        if let Some(mut state) = self.state_decl.take() {
            if let Some(body) = state.body_span.as_mut() {
                body.last = id;
            }
            state.span.extend_to(id);
            self.ast.states.push(state);
        }
        self.blocks.clear();
        self.resume_scope();
    }
}
