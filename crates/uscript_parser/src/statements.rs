//! Statements inside function bodies and state code.
//!
//! Open bodies live on the `blocks` stack. A braced body closes at its `}`;
//! a brace-less body closes as soon as it holds one statement and the next
//! token arrives; a `case` section closes at the next section or at the
//! switch's `}`. A control statement waiting for its condition or body sits
//! in `control` until it is pushed as a block.

use uscript_ast::*;
use uscript_diagnostics::messages;

use crate::expressions::{build_statement, classify_expression, resolve, split_top_level};
use crate::parser::{BlockKind, CodeBlock, NewExpr, Parser, State};
use crate::utilities::{is_assignment, is_term, is_word_operator, Keyword};

impl Parser {
    // ========================================================================
    // Statement starts
    // ========================================================================

    pub(crate) fn code(&mut self, id: TokenId) {
        self.close_completed_blocks(id);
        if self.state != State::Code {
            return self.dispatch(id);
        }

        match self.sym(id) {
            Some(b'}') => return self.close_brace(id),
            Some(b'{') => {
                let mut stmt = self.new_statement(id);
                stmt.body_span = Some(Span::single(id));
                self.blocks.push(CodeBlock {
                    stmt,
                    kind: BlockKind::Brace,
                });
                return;
            }
            Some(b';') => {
                let stmt = self.labeled(Statement::new(None, id));
                return self.append_statement(stmt);
            }
            _ => {}
        }

        match self.keyword(id) {
            Some(Keyword::Local) => self.start_local(id),
            Some(Keyword::If | Keyword::While | Keyword::Switch | Keyword::For) => {
                self.start_control(id);
                self.state = State::ControlOpen;
            }
            Some(Keyword::ForEach) => {
                self.start_control(id);
                self.buffer.clear();
                self.state = State::ForEachHeader { depth: 0 };
            }
            Some(Keyword::Do) => {
                self.start_control(id);
                self.state = State::ControlBody;
            }
            Some(Keyword::Else) => {
                if !self.follows_if() {
                    self.error(id, &messages::ELSE_WITHOUT_IF, &[]);
                }
                self.start_control(id);
                self.state = State::ControlBody;
            }
            Some(Keyword::Case) => self.start_case(id),
            _ if self.leaves_state_code(id) => {
                self.state = State::StateBody;
                self.dispatch(id);
            }
            _ => self.start_expression(id),
        }
    }

    /// A function declaration after state code.
    fn leaves_state_code(&self, id: TokenId) -> bool {
        if self.function.is_some() || !self.blocks.is_empty() {
            return false;
        }
        matches!(self.keyword(id), Some(kw) if kw.is_function_kind()) || self.is_modifier(id)
    }

    fn new_statement(&mut self, id: TokenId) -> Statement {
        self.labeled(Statement::new(Some(id), id))
    }

    fn start_control(&mut self, id: TokenId) {
        self.mark(id, TokenKind::Keyword);
        let stmt = self.new_statement(id);
        self.control = Some(stmt);
    }

    /// Attach a pending `Label:` to the statement it precedes.
    fn labeled(&mut self, mut stmt: Statement) -> Statement {
        if let Some(label) = self.label.take() {
            stmt.label = Some(label);
        }
        stmt
    }

    /// A label with no statement after it before the body closes.
    pub(crate) fn flush_label(&mut self) {
        if let Some(label) = self.label.take() {
            let mut stmt = Statement::new(None, label);
            stmt.label = Some(label);
            self.append_statement(stmt);
        }
    }

    /// Whether the statement just completed in the current body is an `if`.
    fn follows_if(&self) -> bool {
        let last = match self.blocks.last() {
            Some(block) => block.stmt.body.last(),
            None => match (&self.function, &self.state_decl) {
                (Some(function), _) => function.body.last(),
                (None, Some(state)) => state.body.last(),
                (None, None) => None,
            },
        };
        last.and_then(|stmt| self.statement_keyword(stmt)) == Some(Keyword::If)
    }

    // ========================================================================
    // Block stack
    // ========================================================================

    /// Close brace-less bodies that already hold their statement. An
    /// `else` keeps the body of the `if` it may belong to open.
    fn close_completed_blocks(&mut self, next: TokenId) {
        let next_is_else = self.keyword(next) == Some(Keyword::Else);
        while let Some(block) = self.blocks.last() {
            if block.kind != BlockKind::Single || block.stmt.body.is_empty() {
                break;
            }
            let ends_with_if = block
                .stmt
                .body
                .last()
                .and_then(|stmt| self.statement_keyword(stmt))
                == Some(Keyword::If);
            if next_is_else && ends_with_if {
                break;
            }
            self.close_block(None);
            if self.state != State::Code {
                break;
            }
        }
    }

    /// Pop the innermost block and append its statement to the enclosing
    /// body. A closed `do` body waits for its `until` instead.
    pub(crate) fn close_block(&mut self, closing: Option<TokenId>) {
        let Some(CodeBlock { mut stmt, kind }) = self.blocks.pop() else {
            return;
        };
        if let (BlockKind::Brace, Some(close)) = (kind, closing) {
            if let Some(body) = stmt.body_span.as_mut() {
                body.last = close;
            }
            stmt.span.extend_to(close);
        }
        if stmt.body_span.is_none() {
            stmt.body_span = Some(Span::single(stmt.span.last));
        }
        if kind != BlockKind::Case && self.statement_keyword(&stmt) == Some(Keyword::Do) {
            self.control = Some(stmt);
            self.state = State::DoUntil;
            return;
        }
        self.append_statement(stmt);
    }

    pub(crate) fn append_statement(&mut self, stmt: Statement) {
        let Some(block) = self.blocks.last_mut() else {
            if let Some(function) = self.function.as_mut() {
                function.body.push(stmt);
            } else if let Some(state) = self.state_decl.as_mut() {
                state.body.push(stmt);
            }
            return;
        };
        match block.kind {
            BlockKind::Single => match block.stmt.body_span.as_mut() {
                Some(body) => body.extend_to(stmt.span.last),
                None => block.stmt.body_span = Some(stmt.span),
            },
            BlockKind::Case => {
                if let Some(body) = block.stmt.body_span.as_mut() {
                    body.extend_to(stmt.span.last);
                }
            }
            BlockKind::Brace => {}
        }
        if block.kind != BlockKind::Brace {
            block.stmt.span.extend_to(stmt.span.last);
        }
        block.stmt.body.push(stmt);
    }

    fn close_brace(&mut self, id: TokenId) {
        self.flush_label();
        loop {
            let Some(kind) = self.blocks.last().map(|block| block.kind) else {
                return self.close_owner(id);
            };
            match kind {
                BlockKind::Brace => return self.close_block(Some(id)),
                BlockKind::Case => self.close_block(None),
                BlockKind::Single => {
                    self.error_at(id, &messages::STATEMENT_EXPECTED);
                    self.close_block(None);
                    if self.state != State::Code {
                        return self.dispatch(id);
                    }
                }
            }
        }
    }

    /// The `}` that ends the function body or the state.
    fn close_owner(&mut self, id: TokenId) {
        if let Some(mut function) = self.function.take() {
            if let Some(body) = function.body_span.as_mut() {
                body.last = id;
            }
            function.span.extend_to(id);
            self.push_function(function);
        } else if self.state_decl.is_some() {
            self.close_state(id);
        } else {
            self.error_at(id, &messages::UNMATCHED_CLOSING_TOKEN);
            self.resume_scope();
        }
    }

    // ========================================================================
    // Simple statements
    // ========================================================================

    fn start_expression(&mut self, id: TokenId) {
        self.buffer.clear();
        self.new_expr = NewExpr::Idle;
        self.state = State::Expression { depth: 0 };
        self.expression(id, 0);
    }

    pub(crate) fn expression(&mut self, id: TokenId, depth: u32) {
        match self.sym(id) {
            Some(b';') => {
                if depth > 0 {
                    self.expected(id, ")");
                }
                return self.complete_expression(Some(id));
            }
            Some(b'{' | b'}') => {
                self.complete_expression(None);
                return self.dispatch(id);
            }
            Some(b':') if depth == 0 && self.buffer.len() == 1 && self.is_word(self.buffer[0]) => {
                return self.label_or_default(id);
            }
            _ => {}
        }
        if depth == 0 && self.splits_statement(id) {
            self.complete_expression(None);
            return self.dispatch(id);
        }

        let depth = match self.sym(id) {
            Some(b'(' | b'[') => depth + 1,
            Some(b')' | b']') if depth == 0 => {
                self.error_at(id, &messages::UNMATCHED_CLOSING_TOKEN);
                0
            }
            Some(b')' | b']') => depth - 1,
            _ => depth,
        };
        self.track_new(id, depth);
        self.buffer.push(id);
        self.state = State::Expression { depth };
    }

    /// A word right after a complete term starts the next statement; the
    /// `;` between them was left out.
    fn splits_statement(&self, id: TokenId) -> bool {
        let Some(&last) = self.buffer.last() else {
            return false;
        };
        let token = self.token(id);
        token.is_word() && !is_word_operator(token) && is_term(self.token(last)) && self.new_expr != NewExpr::Closed
    }

    /// `new(Outer) Class`: the class after the closing parenthesis belongs
    /// to the allocation.
    fn track_new(&mut self, id: TokenId, depth: u32) {
        self.new_expr = match (self.new_expr, self.sym(id)) {
            _ if self.keyword(id) == Some(Keyword::New) => NewExpr::AfterNew,
            (NewExpr::AfterNew, Some(b'(')) => NewExpr::Args(depth),
            (NewExpr::Args(open), Some(b')')) if depth < open => NewExpr::Closed,
            (NewExpr::Args(open), _) => NewExpr::Args(open),
            _ => NewExpr::Idle,
        };
    }

    /// Turn the buffered tokens into a statement. `semicolon` is the `;`
    /// that ended it, if it had one.
    pub(crate) fn complete_expression(&mut self, semicolon: Option<TokenId>) {
        let ids = std::mem::take(&mut self.buffer);
        self.new_expr = NewExpr::Idle;
        self.state = State::Code;
        if ids.is_empty() {
            if let Some(semicolon) = semicolon {
                let stmt = self.labeled(Statement::new(None, semicolon));
                self.append_statement(stmt);
            }
            return;
        }

        classify_expression(&mut self.ast.tokens, &ids);
        let mut stmt = build_statement(&self.ast.tokens, &ids);
        if let Some(semicolon) = semicolon {
            stmt.span.extend_to(semicolon);
        }
        if let Some(op) = stmt.op {
            if is_assignment(self.token(op)) && stmt.args.len() < 2 {
                self.error_at(op, &messages::EXPRESSION_EXPECTED);
            }
        }
        let stmt = self.labeled(stmt);
        self.append_statement(stmt);
    }

    /// `Word:` is a label, except `default:` inside a switch.
    fn label_or_default(&mut self, colon: TokenId) {
        let word = self.buffer[0];
        self.buffer.clear();
        self.new_expr = NewExpr::Idle;
        self.state = State::Code;
        if self.keyword(word) == Some(Keyword::Default) {
            self.mark(word, TokenKind::Keyword);
            self.close_case_section();
            if !self.in_switch() {
                self.error_at(word, &messages::CASE_OUTSIDE_SWITCH);
            }
            let stmt = self.new_statement(word);
            self.open_case_block(stmt, colon);
        } else {
            self.flush_label();
            self.mark(word, TokenKind::LabelDeclaration);
            self.label = Some(word);
        }
    }

    // ========================================================================
    // switch / case
    // ========================================================================

    fn in_switch(&self) -> bool {
        self.blocks
            .last()
            .map_or(false, |block| block.kind == BlockKind::Brace && self.statement_keyword(&block.stmt) == Some(Keyword::Switch))
    }

    fn close_case_section(&mut self) {
        if self.blocks.last().map_or(false, |block| block.kind == BlockKind::Case) {
            self.close_block(None);
        }
    }

    fn start_case(&mut self, id: TokenId) {
        self.mark(id, TokenKind::Keyword);
        self.close_case_section();
        if !self.in_switch() {
            self.error_at(id, &messages::CASE_OUTSIDE_SWITCH);
        }
        let stmt = self.new_statement(id);
        self.control = Some(stmt);
        self.buffer.clear();
        self.state = State::CaseValue { depth: 0 };
    }

    pub(crate) fn case_value(&mut self, id: TokenId, depth: u32) {
        let depth = match self.sym(id) {
            Some(b':') if depth == 0 => return self.finish_case_value(id),
            Some(b';' | b'{' | b'}') => {
                self.expected(id, ":");
                let anchor = self.previous.unwrap_or(id);
                self.finish_case_value(anchor);
                return self.dispatch(id);
            }
            Some(b'(') => depth + 1,
            Some(b')') => depth.saturating_sub(1),
            _ => depth,
        };
        self.buffer.push(id);
        self.state = State::CaseValue { depth };
    }

    fn finish_case_value(&mut self, colon: TokenId) {
        let ids = std::mem::take(&mut self.buffer);
        let Some(mut stmt) = self.control.take() else {
            self.state = State::Code;
            return;
        };
        classify_expression(&mut self.ast.tokens, &ids);
        match resolve(&self.ast.tokens, &ids) {
            Some(value) => stmt.args.push(value),
            None => self.error(colon, &messages::EXPRESSION_EXPECTED, &["case"]),
        }
        self.open_case_block(stmt, colon);
    }

    fn open_case_block(&mut self, mut stmt: Statement, colon: TokenId) {
        stmt.body_span = Some(Span::single(colon));
        stmt.span.extend_to(colon);
        self.blocks.push(CodeBlock {
            stmt,
            kind: BlockKind::Case,
        });
        self.state = State::Code;
    }

    // ========================================================================
    // Control statements
    // ========================================================================

    fn control_keyword(&self) -> Option<Keyword> {
        self.control.as_ref().and_then(|stmt| self.statement_keyword(stmt))
    }

    pub(crate) fn control_open(&mut self, id: TokenId) {
        if self.sym(id) == Some(b'(') {
            if let Some(stmt) = self.control.as_mut() {
                stmt.condition = Some(Span::single(id));
                stmt.span.extend_to(id);
            }
            self.buffer.clear();
            self.state = State::Condition { depth: 1 };
            return;
        }
        self.expected(id, "(");
        if self.control_keyword() == Some(Keyword::Do) {
            if let Some(stmt) = self.control.take() {
                self.append_statement(stmt);
            }
            self.state = State::Code;
        } else {
            self.state = State::ControlBody;
        }
        self.dispatch(id);
    }

    pub(crate) fn condition(&mut self, id: TokenId, depth: u32) {
        let is_for = self.control_keyword() == Some(Keyword::For);
        let depth = match self.sym(id) {
            Some(b'(') => depth + 1,
            Some(b')') if depth == 1 => return self.finish_condition(Some(id)),
            Some(b')') => depth - 1,
            Some(b'{' | b'}') => {
                self.expected(id, ")");
                self.finish_condition(None);
                return self.dispatch(id);
            }
            Some(b';') if !is_for => {
                self.expected(id, ")");
                self.finish_condition(None);
                return self.dispatch(id);
            }
            _ => depth,
        };
        self.buffer.push(id);
        self.state = State::Condition { depth };
    }

    fn finish_condition(&mut self, close: Option<TokenId>) {
        let ids = std::mem::take(&mut self.buffer);
        let Some(mut stmt) = self.control.take() else {
            self.state = State::Code;
            return;
        };
        if let Some(close) = close {
            if let Some(condition) = stmt.condition.as_mut() {
                condition.last = close;
            }
            stmt.span.extend_to(close);
        }
        classify_expression(&mut self.ast.tokens, &ids);
        let keyword = self.statement_keyword(&stmt);
        if keyword == Some(Keyword::For) {
            for part in split_top_level(&self.ast.tokens, &ids, ";") {
                stmt.args.extend(resolve(&self.ast.tokens, part));
            }
        } else {
            match resolve(&self.ast.tokens, &ids) {
                Some(condition) => stmt.args.push(condition),
                None => {
                    let op = stmt.op.unwrap_or(stmt.span.first);
                    self.error_at(op, &messages::EXPRESSION_EXPECTED);
                }
            }
        }
        self.control = Some(stmt);
        self.state = if keyword == Some(Keyword::Do) {
            State::DoUntilEnd
        } else {
            State::ControlBody
        };
    }

    /// The token after a control header: `{` opens a braced body, anything
    /// else is the single statement of a brace-less one.
    pub(crate) fn control_body(&mut self, id: TokenId) {
        let Some(mut stmt) = self.control.take() else {
            self.state = State::Code;
            return self.dispatch(id);
        };
        self.state = State::Code;
        match self.sym(id) {
            Some(b'{') => {
                stmt.body_span = Some(Span::single(id));
                stmt.span.extend_to(id);
                self.blocks.push(CodeBlock {
                    stmt,
                    kind: BlockKind::Brace,
                });
            }
            Some(b'}') => {
                self.error_at(id, &messages::STATEMENT_EXPECTED);
                stmt.body_span = Some(Span::single(stmt.span.last));
                self.append_statement(stmt);
                self.dispatch(id);
            }
            _ => {
                if self.statement_keyword(&stmt) == Some(Keyword::Switch) {
                    self.error_at(id, &messages::SWITCH_BODY_EXPECTED);
                }
                stmt.single_statement_body = true;
                self.blocks.push(CodeBlock {
                    stmt,
                    kind: BlockKind::Single,
                });
                self.dispatch(id);
            }
        }
    }

    /// `foreach Iterator(args)`: the iterator call is the condition.
    pub(crate) fn foreach_header(&mut self, id: TokenId, depth: u32) {
        let depth = match self.sym(id) {
            Some(b'(') => {
                if depth == 0 {
                    if let Some(stmt) = self.control.as_mut() {
                        stmt.condition.get_or_insert(Span::single(id));
                    }
                }
                depth + 1
            }
            Some(b')') if depth <= 1 => {
                self.buffer.push(id);
                return self.finish_foreach(Some(id));
            }
            Some(b')') => depth - 1,
            Some(b'{' | b'}' | b';') => {
                if depth > 0 {
                    self.expected(id, ")");
                }
                self.finish_foreach(None);
                return self.dispatch(id);
            }
            _ => depth,
        };
        self.buffer.push(id);
        self.state = State::ForEachHeader { depth };
    }

    fn finish_foreach(&mut self, close: Option<TokenId>) {
        let ids = std::mem::take(&mut self.buffer);
        let Some(mut stmt) = self.control.take() else {
            self.state = State::Code;
            return;
        };
        if let Some(close) = close {
            if let Some(condition) = stmt.condition.as_mut() {
                condition.last = close;
            }
            stmt.span.extend_to(close);
        }
        classify_expression(&mut self.ast.tokens, &ids);
        match resolve(&self.ast.tokens, &ids) {
            Some(iterator) => stmt.args.push(iterator),
            None => {
                let op = stmt.span.first;
                self.error_at(op, &messages::EXPRESSION_EXPECTED);
            }
        }
        self.control = Some(stmt);
        self.state = State::ControlBody;
    }

    pub(crate) fn do_until(&mut self, id: TokenId) {
        if self.keyword(id) == Some(Keyword::Until) {
            self.mark(id, TokenKind::Keyword);
            if let Some(stmt) = self.control.as_mut() {
                stmt.span.extend_to(id);
            }
            self.state = State::ControlOpen;
            return;
        }
        self.error_at(id, &messages::UNTIL_EXPECTED);
        if let Some(stmt) = self.control.take() {
            self.append_statement(stmt);
        }
        self.state = State::Code;
        self.dispatch(id);
    }

    pub(crate) fn do_until_end(&mut self, id: TokenId) {
        let Some(mut stmt) = self.control.take() else {
            self.state = State::Code;
            return self.dispatch(id);
        };
        self.state = State::Code;
        if self.sym(id) == Some(b';') {
            stmt.span.extend_to(id);
            self.append_statement(stmt);
        } else {
            self.append_statement(stmt);
            self.dispatch(id);
        }
    }

    // ========================================================================
    // local Type Name, Name;
    // ========================================================================

    fn start_local(&mut self, id: TokenId) {
        self.mark(id, TokenKind::Keyword);
        if self.function.is_none() {
            self.error(id, &messages::LOCAL_OUTSIDE_FUNCTION, &[]);
        }
        self.local_start = Some(id);
        self.buffer.clear();
        self.state = State::Local;
    }

    pub(crate) fn local(&mut self, id: TokenId) {
        if self.sym(id) == Some(b';') {
            return self.finish_local(Some(id));
        }
        let runs_on = self.buffer.len() >= 2
            && self.is_word(id)
            && self.buffer.last().map_or(false, |&last| {
                self.line_of(last) < self.line_of(id) && is_term(self.token(last))
            });
        if self.sym(id) == Some(b'}') || runs_on {
            self.expected(id, ";");
            self.finish_local(None);
            return self.dispatch(id);
        }
        self.buffer.push(id);
    }

    pub(crate) fn finish_local(&mut self, end: Option<TokenId>) {
        let ids = std::mem::take(&mut self.buffer);
        self.state = State::Code;
        let Some(start) = self.local_start.take() else {
            return;
        };
        let last = end.or_else(|| ids.last().copied()).unwrap_or(start);
        if ids.is_empty() {
            self.error_at(last, &messages::TYPE_EXPECTED);
            return;
        }
        let decls = self.parse_var_list(&ids, VarFlags::LOCAL, TokenKind::LocalDeclaration, false);
        let span = Span::new(start, last);
        if let Some(function) = self.function.as_mut() {
            function.locals.extend(decls.into_iter().map(|mut decl| {
                decl.span = Some(span);
                decl
            }));
        }
    }
}
