//! Class-scope declarations: modifiers, `const`, `var`, `enum`, `struct`
//! and opaque `cpptext` regions.

use uscript_ast::*;
use uscript_diagnostics::messages;

use crate::expressions::{matching_close, resolve, split_top_level};
use crate::parser::{Parser, PendingVar, State};
use crate::utilities::{parse_count, Keyword};

impl Parser {
    // ========================================================================
    // Class scope
    // ========================================================================

    pub(crate) fn declarations(&mut self, id: TokenId) {
        let keyword = self.keyword(id);
        if matches!(keyword, Some(kw) if kw.is_function_kind()) {
            return self.start_function(id);
        }
        if self.is_modifier(id) {
            return self.push_modifier(id);
        }
        match keyword {
            Some(Keyword::Class | Keyword::Interface) => {
                if self.ast.header.is_none() {
                    self.start_class_header(id);
                } else {
                    self.error(id, &messages::DUPLICATE_CLASS_DECLARATION, &[]);
                    self.state = State::Skip;
                }
            }
            Some(Keyword::State) => self.start_state(id),
            Some(Keyword::Replication) => self.start_replication(id),
            _ => {
                if self.scope_declaration(id) {
                    return;
                }
                match self.sym(id) {
                    Some(b';') => {}
                    Some(b'(') if self.follows_modifier() => {
                        self.modifiers.push(id);
                        self.state = State::ModifierArgs { depth: 1 };
                    }
                    _ => self.error_at(id, &messages::DECLARATION_EXPECTED),
                }
            }
        }
    }

    /// Declarations allowed both in the class and inside structs. Returns
    /// false when the token starts none of them.
    fn scope_declaration(&mut self, id: TokenId) -> bool {
        match self.keyword(id) {
            Some(Keyword::Var) => self.start_var(id),
            Some(Keyword::Const) => self.start_const(id),
            Some(Keyword::Enum) => self.start_enum(id),
            Some(Keyword::Struct) => self.start_struct(id),
            Some(Keyword::DefaultProperties | Keyword::StructDefaultProperties) => self.start_defaults(id),
            Some(Keyword::CppText | Keyword::StructCppText | Keyword::CppStruct) => {
                self.drop_stale_modifiers();
                self.mark(id, TokenKind::Keyword);
                self.native_start = Some(id);
                self.state = State::NativeOpen;
            }
            _ => return false,
        }
        true
    }

    // ========================================================================
    // Modifier buffer
    // ========================================================================

    /// Words collected ahead of a function or state declaration.
    pub(crate) fn is_modifier(&self, id: TokenId) -> bool {
        let text = self.text(id);
        self.is_word(id)
            && !self.starts_declaration(id)
            && (FunctionFlags::from_keyword(text).is_some() || StateFlags::from_keyword(text).is_some())
    }

    pub(crate) fn push_modifier(&mut self, id: TokenId) {
        self.mark(id, TokenKind::Modifier);
        self.modifiers.push(id);
    }

    /// Whether the previous token was the last collected modifier, so a `(`
    /// opens its argument list (`native(130)`).
    pub(crate) fn follows_modifier(&self) -> bool {
        !self.modifiers.is_empty() && self.modifiers.last() == self.previous.as_ref()
    }

    pub(crate) fn modifier_args(&mut self, id: TokenId, depth: u32) {
        self.modifiers.push(id);
        let depth = match self.sym(id) {
            Some(b'(') => depth + 1,
            Some(b')') => depth - 1,
            Some(b';' | b'{' | b'}') => {
                self.modifiers.pop();
                self.expected(id, ")");
                self.resume_scope();
                return self.dispatch(id);
            }
            _ => depth,
        };
        if depth == 0 {
            self.resume_scope();
        } else {
            self.state = State::ModifierArgs { depth };
        }
    }

    /// Modifiers that no declaration consumed.
    pub(crate) fn drop_stale_modifiers(&mut self) {
        if let Some(&first) = self.modifiers.first() {
            self.error_at(first, &messages::UNEXPECTED_TOKEN);
            self.modifiers.clear();
        }
    }

    // ========================================================================
    // const Name = value;
    // ========================================================================

    fn start_const(&mut self, id: TokenId) {
        self.drop_stale_modifiers();
        self.mark(id, TokenKind::Keyword);
        self.pending_const = Some(ConstDecl {
            name: None,
            value: Vec::new(),
            span: Span::single(id),
        });
        self.state = State::ConstName;
    }

    pub(crate) fn const_name(&mut self, id: TokenId) {
        if self.is_word(id) && !self.starts_declaration(id) {
            self.mark(id, TokenKind::ConstDeclaration);
            if let Some(decl) = self.pending_const.as_mut() {
                decl.name = Some(id);
                decl.span.extend_to(id);
            }
            self.state = State::ConstEquals;
        } else {
            self.error_at(id, &messages::IDENTIFIER_EXPECTED);
            self.abandon_const(id);
        }
    }

    pub(crate) fn const_equals(&mut self, id: TokenId) {
        if self.is_word(id) || self.sym(id) != Some(b'=') {
            self.expected(id, "=");
            return self.abandon_const(id);
        }
        if let Some(decl) = self.pending_const.as_mut() {
            decl.span.extend_to(id);
        }
        self.state = State::ConstValue;
    }

    pub(crate) fn const_value(&mut self, id: TokenId) {
        let ends_line = self
            .pending_const
            .as_ref()
            .and_then(|decl| decl.value.last())
            .map_or(false, |&last| self.line_of(last) < self.line_of(id));
        if self.sym(id) == Some(b';') {
            self.finish_const(id);
        } else if ends_line && (self.starts_declaration(id) || self.sym(id) == Some(b'}')) {
            self.expected(id, ";");
            if let Some(last) = self.previous {
                self.finish_const(last);
            }
            self.dispatch(id);
        } else if let Some(decl) = self.pending_const.as_mut() {
            decl.value.push(id);
        }
    }

    fn finish_const(&mut self, last: TokenId) {
        if let Some(mut decl) = self.pending_const.take() {
            decl.span.extend_to(last);
            self.ast.constants.push(decl);
        }
        self.resume_scope();
    }

    fn abandon_const(&mut self, id: TokenId) {
        if let Some(decl) = self.pending_const.take() {
            if decl.name.is_some() {
                self.ast.constants.push(decl);
            }
        }
        self.recover_in_scope(id);
    }

    // ========================================================================
    // var [(Group)] [modifiers] Type[<T>] Name[[N]], Name...;
    // ========================================================================

    fn start_var(&mut self, id: TokenId) {
        self.drop_stale_modifiers();
        self.mark(id, TokenKind::Keyword);
        self.pending_vars.push(PendingVar {
            first: id,
            shared: VarDecl::default(),
            declared: Vec::new(),
            inline_type: false,
            struct_depth: self.structs.len(),
        });
        self.state = State::VarStart;
    }

    fn var_mut(&mut self) -> Option<&mut PendingVar> {
        self.pending_vars.last_mut()
    }

    pub(crate) fn var_start(&mut self, id: TokenId) {
        if self.sym(id) == Some(b'(') {
            if let Some(var) = self.var_mut() {
                var.shared.flags |= VarFlags::EDITABLE;
            }
            self.state = State::VarGroup;
        } else {
            self.state = State::VarType;
            self.var_type(id);
        }
    }

    pub(crate) fn var_group(&mut self, id: TokenId) {
        match self.sym(id) {
            Some(b')') => self.state = State::VarType,
            Some(b',') => {}
            _ if self.is_word(id) => {
                if let Some(var) = self.var_mut() {
                    var.shared.group.get_or_insert(id);
                }
            }
            _ => {
                self.expected(id, ")");
                self.state = State::VarType;
                self.var_type(id);
            }
        }
    }

    pub(crate) fn var_type(&mut self, id: TokenId) {
        if !self.is_word(id) {
            self.error_at(id, &messages::TYPE_EXPECTED);
            self.pending_vars.pop();
            return self.recover_in_scope(id);
        }
        match self.keyword(id) {
            Some(Keyword::Enum) => {
                if let Some(var) = self.var_mut() {
                    var.inline_type = true;
                }
                self.start_enum(id);
            }
            Some(Keyword::Struct) => {
                if let Some(var) = self.var_mut() {
                    var.inline_type = true;
                }
                self.start_struct(id);
            }
            _ => {
                if let Some(flag) = VarFlags::from_keyword(self.text(id)) {
                    self.mark(id, TokenKind::Modifier);
                    if let Some(var) = self.var_mut() {
                        var.shared.flags |= flag;
                    }
                } else if self.starts_declaration(id) {
                    self.error_at(id, &messages::TYPE_EXPECTED);
                    self.pending_vars.pop();
                    self.recover_in_scope(id);
                } else {
                    self.mark(id, TokenKind::TypeReference);
                    if let Some(var) = self.var_mut() {
                        var.shared.type_token = Some(id);
                    }
                    self.state = State::VarName;
                }
            }
        }
    }

    pub(crate) fn var_template(&mut self, id: TokenId, depth: u32) {
        let depth = match self.text(id) {
            "<" => depth + 1,
            ">" => depth.saturating_sub(1),
            ">>" => depth.saturating_sub(2),
            ";" => {
                self.expected(id, ">");
                return self.finish_var(id);
            }
            _ => {
                if self.is_word(id) {
                    self.mark(id, TokenKind::TypeReference);
                    if let Some(var) = self.var_mut() {
                        var.shared.template.get_or_insert(id);
                    }
                }
                depth
            }
        };
        self.state = if depth == 0 {
            State::VarName
        } else {
            State::VarTemplate { depth }
        };
    }

    pub(crate) fn var_name(&mut self, id: TokenId) {
        let at_type = self
            .pending_vars
            .last()
            .map_or(false, |var| var.declared.is_empty() && var.shared.template.is_none());
        if at_type && self.sym(id) == Some(b'<') {
            self.state = State::VarTemplate { depth: 1 };
            return;
        }
        if self.is_word(id) && !self.starts_declaration(id) {
            self.mark(id, TokenKind::VariableDeclaration);
            if let Some(var) = self.var_mut() {
                let mut decl = var.shared.clone();
                decl.name = Some(id);
                var.declared.push(decl);
            }
            self.state = State::VarAfterName;
            return;
        }
        self.error_at(id, &messages::IDENTIFIER_EXPECTED);
        if self.sym(id) == Some(b';') {
            return self.finish_var(id);
        }
        let last = self.previous.unwrap_or(id);
        self.finish_var(last);
        self.recover_in_scope(id);
    }

    pub(crate) fn var_after_name(&mut self, id: TokenId) {
        match self.sym(id) {
            Some(b'[') => {
                self.buffer.clear();
                self.state = State::VarArray { depth: 1 };
            }
            Some(b',') => self.state = State::VarName,
            Some(b';') => self.finish_var(id),
            Some(b'<') => self.state = State::VarMetadata,
            _ => {
                self.expected(id, ";");
                let last = self.previous.unwrap_or(id);
                self.finish_var(last);
                self.recover_in_scope(id);
            }
        }
    }

    pub(crate) fn var_array(&mut self, id: TokenId, depth: u32) {
        let depth = match self.sym(id) {
            Some(b'[') => depth + 1,
            Some(b']') => depth - 1,
            Some(b';') => {
                self.expected(id, "]");
                return self.finish_var(id);
            }
            _ => depth,
        };
        if depth > 0 {
            self.buffer.push(id);
            self.state = State::VarArray { depth };
            return;
        }
        let ids = std::mem::take(&mut self.buffer);
        let count = self.array_count(&ids);
        if let Some(decl) = self.var_mut().and_then(|var| var.declared.last_mut()) {
            decl.array_count = count;
        }
        self.state = State::VarAfterName;
    }

    /// `<ToolTip=...>` editor metadata after a variable name.
    pub(crate) fn var_metadata(&mut self, id: TokenId) {
        match self.text(id) {
            ">" => self.state = State::VarAfterName,
            ";" => {
                self.expected(id, ">");
                self.finish_var(id);
            }
            _ => {}
        }
    }

    /// Close the innermost pending `var` and store one declaration per name
    /// in its owner.
    pub(crate) fn finish_var(&mut self, last: TokenId) {
        let Some(var) = self.pending_vars.pop() else {
            return self.resume_scope();
        };
        let span = Span::new(var.first, last.max(var.first));
        let owner = var.struct_depth.checked_sub(1).and_then(|i| self.structs.get_mut(i));
        let target = match owner {
            Some(decl) => &mut decl.members,
            None => &mut self.ast.variables,
        };
        for mut decl in var.declared {
            decl.span = Some(span);
            target.push(decl);
        }
        self.resume_scope();
    }

    /// Hand a just-closed inline `enum`/`struct` to the `var` waiting for it.
    /// Returns false when no declaration was waiting.
    fn complete_inline_type(&mut self, name: Option<TokenId>) -> bool {
        let depth = self.structs.len();
        let Some(var) = self.pending_vars.last_mut() else {
            return false;
        };
        if !var.inline_type || var.struct_depth != depth || var.shared.type_token.is_some() {
            return false;
        }
        var.inline_type = false;
        var.shared.type_token = name;
        self.state = State::VarName;
        true
    }

    pub(crate) fn array_count(&mut self, ids: &[TokenId]) -> Option<ArrayCount> {
        if let [only] = ids {
            if self.token(*only).lexical_kind == TokenKind::Number {
                if let Some(count) = parse_count(self.text(*only)) {
                    return Some(ArrayCount::Literal(count));
                }
            }
        }
        crate::expressions::classify_expression(&mut self.ast.tokens, ids);
        resolve(&self.ast.tokens, ids).map(ArrayCount::Expression)
    }

    // ========================================================================
    // Locals and parameters
    // ========================================================================

    /// Parse `[modifiers] Type[<T>] Name[[N]] [= default] {, Name...}`.
    ///
    /// Parameters pass one comma-separated slice at a time with
    /// `allow_default`; locals pass the whole list.
    pub(crate) fn parse_var_list(
        &mut self,
        ids: &[TokenId],
        flags: VarFlags,
        name_kind: TokenKind,
        allow_default: bool,
    ) -> Vec<VarDecl> {
        let mut decls = Vec::new();
        let Some(&anchor) = ids.first() else {
            return decls;
        };
        let mut shared = VarDecl {
            flags,
            ..VarDecl::default()
        };
        let mut i = 0;
        while i + 2 < ids.len() {
            match VarFlags::from_keyword(self.text(ids[i])) {
                Some(flag) if self.is_word(ids[i]) && self.is_word(ids[i + 1]) => {
                    shared.flags |= flag;
                    self.mark(ids[i], TokenKind::Modifier);
                    i += 1;
                }
                _ => break,
            }
        }

        match ids.get(i) {
            Some(&type_id) if self.is_word(type_id) => {
                shared.type_token = Some(type_id);
                self.mark(type_id, TokenKind::TypeReference);
                i += 1;
            }
            Some(&other) => {
                self.error_at(other, &messages::TYPE_EXPECTED);
                return decls;
            }
            None => {
                self.error(anchor, &messages::PARAMETER_EXPECTED, &[]);
                return decls;
            }
        }
        if ids.get(i).map_or(false, |&t| self.sym(t) == Some(b'<')) {
            let mut depth = 0u32;
            while let Some(&t) = ids.get(i) {
                i += 1;
                match self.text(t) {
                    "<" => depth += 1,
                    ">" => depth = depth.saturating_sub(1),
                    ">>" => depth = depth.saturating_sub(2),
                    _ if self.is_word(t) => {
                        shared.template.get_or_insert(t);
                        self.mark(t, TokenKind::TypeReference);
                    }
                    _ => {}
                }
                if depth == 0 {
                    break;
                }
            }
        }

        loop {
            let Some(&name) = ids.get(i) else {
                let last = ids[ids.len() - 1];
                self.error_at(last, &messages::IDENTIFIER_EXPECTED);
                break;
            };
            if !self.is_word(name) {
                self.error_at(name, &messages::IDENTIFIER_EXPECTED);
                break;
            }
            self.mark(name, name_kind);
            let mut decl = shared.clone();
            decl.name = Some(name);
            i += 1;

            if ids.get(i).map_or(false, |&t| self.sym(t) == Some(b'[')) {
                match matching_close(&self.ast.tokens, ids, i) {
                    Some(close) => {
                        decl.array_count = self.array_count(&ids[i + 1..close]);
                        i = close + 1;
                    }
                    None => {
                        self.expected(ids[ids.len() - 1], "]");
                        i = ids.len();
                    }
                }
            }
            if allow_default && ids.get(i).map_or(false, |&t| self.sym(t) == Some(b'=')) {
                let value = &ids[i + 1..];
                let value = split_top_level(&self.ast.tokens, value, ",")[0];
                crate::expressions::classify_expression(&mut self.ast.tokens, value);
                decl.default_value = resolve(&self.ast.tokens, value);
                i += 1 + value.len();
            }
            decls.push(decl);

            match ids.get(i) {
                None => break,
                Some(&t) if self.sym(t) == Some(b',') => i += 1,
                Some(&t) => {
                    self.expected(t, ";");
                    break;
                }
            }
        }
        decls
    }

    // ========================================================================
    // enum Name { A, B };
    // ========================================================================

    fn start_enum(&mut self, id: TokenId) {
        self.drop_stale_modifiers();
        self.mark(id, TokenKind::Keyword);
        self.pending_enum = Some(EnumDecl {
            name: None,
            members: Vec::new(),
            body: None,
            span: Span::single(id),
        });
        self.state = State::EnumName;
    }

    pub(crate) fn enum_name(&mut self, id: TokenId) {
        if self.is_word(id) && !self.starts_declaration(id) {
            self.mark(id, TokenKind::EnumDeclaration);
            if let Some(decl) = self.pending_enum.as_mut() {
                decl.name = Some(id);
                decl.span.extend_to(id);
            }
            self.state = State::EnumOpen;
        } else {
            self.error_at(id, &messages::IDENTIFIER_EXPECTED);
            self.state = State::EnumOpen;
            if self.sym(id) == Some(b'{') {
                self.enum_open(id);
            } else {
                self.abandon_enum(id);
            }
        }
    }

    pub(crate) fn enum_open(&mut self, id: TokenId) {
        if self.sym(id) == Some(b'{') {
            if let Some(decl) = self.pending_enum.as_mut() {
                decl.body = Some(Span::single(id));
                decl.span.extend_to(id);
            }
            self.state = State::EnumBody;
        } else {
            self.expected(id, "{");
            self.abandon_enum(id);
        }
    }

    pub(crate) fn enum_body(&mut self, id: TokenId) {
        match self.sym(id) {
            Some(b',') => {}
            Some(b'<') => self.state = State::EnumMetadata,
            Some(b'}') => self.close_enum(id),
            _ if self.is_word(id) => {
                self.mark(id, TokenKind::EnumMember);
                if let Some(decl) = self.pending_enum.as_mut() {
                    decl.members.push(id);
                }
            }
            _ => self.error_at(id, &messages::ENUM_MEMBER_EXPECTED),
        }
    }

    pub(crate) fn enum_metadata(&mut self, id: TokenId) {
        match self.text(id) {
            ">" => self.state = State::EnumBody,
            "}" => {
                self.expected(id, ">");
                self.close_enum(id);
            }
            _ => {}
        }
    }

    fn close_enum(&mut self, id: TokenId) {
        let Some(mut decl) = self.pending_enum.take() else {
            return self.resume_scope();
        };
        if let Some(body) = decl.body.as_mut() {
            body.last = id;
        }
        decl.span.extend_to(id);
        let name = decl.name;
        self.ast.enums.push(decl);
        if !self.complete_inline_type(name) {
            self.resume_scope();
        }
    }

    fn abandon_enum(&mut self, id: TokenId) {
        if let Some(decl) = self.pending_enum.take() {
            if decl.name.is_some() {
                self.ast.enums.push(decl);
            }
        }
        if self.pending_vars.last().map_or(false, |var| var.inline_type) {
            self.pending_vars.pop();
        }
        self.recover_in_scope(id);
    }

    // ========================================================================
    // struct [modifiers] Name [extends Parent] { ... };
    // ========================================================================

    fn start_struct(&mut self, id: TokenId) {
        self.drop_stale_modifiers();
        self.mark(id, TokenKind::Keyword);
        self.structs.push(StructDecl {
            name: None,
            parent: None,
            flags: StructFlags::default(),
            members: Vec::new(),
            defaults: Vec::new(),
            body: None,
            span: Span::single(id),
        });
        self.state = State::StructHeader;
    }

    pub(crate) fn struct_header(&mut self, id: TokenId) {
        if let Some(decl) = self.structs.last_mut() {
            decl.span.extend_to(id);
        }
        let named = self.structs.last().map_or(false, |decl| decl.name.is_some());
        match self.sym(id) {
            Some(b'{') => {
                if !named {
                    self.error_at(id, &messages::IDENTIFIER_EXPECTED);
                }
                if let Some(decl) = self.structs.last_mut() {
                    decl.body = Some(Span::single(id));
                }
                self.state = State::StructBody;
                return;
            }
            Some(b';') => {
                self.expected(id, "{");
                return self.abandon_struct(id);
            }
            _ => {}
        }
        if !self.is_word(id) {
            return self.error_at(id, &messages::UNEXPECTED_TOKEN);
        }
        let keyword = self.keyword(id);
        if matches!(keyword, Some(Keyword::Extends | Keyword::Expands)) {
            self.mark(id, TokenKind::Keyword);
            self.state = State::StructParent;
        } else if let (false, Some(flag)) = (named, StructFlags::from_keyword(self.text(id))) {
            self.mark(id, TokenKind::Modifier);
            if let Some(decl) = self.structs.last_mut() {
                decl.flags |= flag;
            }
        } else if !named && !self.starts_declaration(id) {
            self.mark(id, TokenKind::StructDeclaration);
            if let Some(decl) = self.structs.last_mut() {
                decl.name = Some(id);
            }
        } else {
            self.expected(id, "{");
            self.abandon_struct(id);
        }
    }

    pub(crate) fn struct_parent(&mut self, id: TokenId) {
        if self.is_word(id) && !self.starts_declaration(id) {
            self.mark(id, TokenKind::TypeReference);
            if let Some(decl) = self.structs.last_mut() {
                decl.parent = Some(id);
                decl.span.extend_to(id);
            }
            self.state = State::StructHeader;
        } else {
            self.error_at(id, &messages::IDENTIFIER_EXPECTED);
            self.state = State::StructHeader;
            self.struct_header(id);
        }
    }

    pub(crate) fn struct_body(&mut self, id: TokenId) {
        if self.scope_declaration(id) {
            return;
        }
        match self.sym(id) {
            Some(b'}') => self.close_struct(id),
            Some(b';') => {}
            _ => self.error_at(id, &messages::DECLARATION_EXPECTED),
        }
    }

    fn close_struct(&mut self, id: TokenId) {
        // Members that never saw their `;`.
        let depth = self.structs.len();
        while self.pending_vars.last().map_or(false, |var| var.struct_depth >= depth && depth > 0) {
            self.expected(id, ";");
            self.finish_var(id);
        }
        let Some(mut decl) = self.structs.pop() else {
            return self.resume_scope();
        };
        if let Some(body) = decl.body.as_mut() {
            body.last = id;
        }
        decl.span.extend_to(id);
        let name = decl.name;
        self.ast.structs.push(decl);
        if !self.complete_inline_type(name) {
            self.resume_scope();
        }
    }

    fn abandon_struct(&mut self, id: TokenId) {
        if let Some(decl) = self.structs.pop() {
            if decl.name.is_some() {
                self.ast.structs.push(decl);
            }
        }
        let depth = self.structs.len();
        if self.pending_vars.last().map_or(false, |var| var.inline_type && var.struct_depth == depth) {
            self.pending_vars.pop();
        }
        self.recover_in_scope(id);
    }

    // ========================================================================
    // cpptext { ... }
    // ========================================================================

    pub(crate) fn native_open(&mut self, id: TokenId) {
        if self.sym(id) == Some(b'{') {
            self.mark(id, TokenKind::Native);
            self.state = State::NativeBody { depth: 1 };
        } else {
            self.expected(id, "{");
            self.native_start = None;
            self.recover_in_scope(id);
        }
    }

    pub(crate) fn native_body(&mut self, id: TokenId, depth: u32) {
        self.mark(id, TokenKind::Native);
        let depth = match self.sym(id) {
            Some(b'{') => depth + 1,
            Some(b'}') => depth - 1,
            _ => depth,
        };
        if depth > 0 {
            self.state = State::NativeBody { depth };
            return;
        }
        if let Some(start) = self.native_start.take() {
            self.ast.native_blocks.push(Span::new(start, id));
        }
        self.resume_scope();
    }
}
