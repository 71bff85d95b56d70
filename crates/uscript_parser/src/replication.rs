//! `replication { reliable if (Role == ROLE_Authority) A, B; }`

use uscript_ast::*;
use uscript_diagnostics::messages;

use crate::expressions::{classify_expression, resolve};
use crate::parser::{Parser, State};
use crate::utilities::Keyword;

impl Parser {
    pub(crate) fn start_replication(&mut self, id: TokenId) {
        self.drop_stale_modifiers();
        self.mark(id, TokenKind::Keyword);
        self.replication = Some(ReplicationBlock {
            statements: Vec::new(),
            body: None,
            span: Span::single(id),
        });
        self.state = State::ReplicationOpen;
    }

    pub(crate) fn replication_open(&mut self, id: TokenId) {
        if self.sym(id) == Some(b'{') {
            if let Some(block) = self.replication.as_mut() {
                block.body = Some(Span::single(id));
                block.span.extend_to(id);
            }
            self.state = State::ReplicationBody;
        } else {
            self.expected(id, "{");
            if let Some(block) = self.replication.take() {
                self.ast.replication.push(block);
            }
            self.recover_in_scope(id);
        }
    }

    fn statement_mut(&mut self, id: TokenId) -> &mut ReplicationStatement {
        self.rep_statement.get_or_insert_with(|| ReplicationStatement {
            reliability: None,
            condition: None,
            condition_span: None,
            targets: Vec::new(),
            span: Span::single(id),
        })
    }

    pub(crate) fn replication_body(&mut self, id: TokenId) {
        match self.keyword(id) {
            Some(Keyword::Reliable | Keyword::Unreliable) => {
                self.mark(id, TokenKind::Modifier);
                self.statement_mut(id).reliability = Some(id);
                return;
            }
            Some(Keyword::If) => {
                self.mark(id, TokenKind::Keyword);
                self.statement_mut(id).span.extend_to(id);
                self.state = State::ReplicationConditionOpen;
                return;
            }
            _ => {}
        }
        match self.sym(id) {
            Some(b'}') => self.close_replication(id),
            Some(b';') => {}
            _ => {
                self.error_at(id, &messages::REPLICATION_CONDITION_EXPECTED);
                self.statement_mut(id);
                self.state = State::ReplicationTargets;
                self.dispatch(id);
            }
        }
    }

    pub(crate) fn replication_condition_open(&mut self, id: TokenId) {
        if self.sym(id) == Some(b'(') {
            let statement = self.statement_mut(id);
            statement.condition_span = Some(Span::single(id));
            statement.span.extend_to(id);
            self.buffer.clear();
            self.state = State::ReplicationCondition { depth: 1 };
        } else {
            self.expected(id, "(");
            self.state = State::ReplicationTargets;
            self.dispatch(id);
        }
    }

    pub(crate) fn replication_condition(&mut self, id: TokenId, depth: u32) {
        let depth = match self.sym(id) {
            Some(b'(') => depth + 1,
            Some(b')') if depth == 1 => return self.finish_replication_condition(Some(id)),
            Some(b')') => depth - 1,
            Some(b';' | b'{' | b'}') => {
                self.expected(id, ")");
                self.finish_replication_condition(None);
                return self.dispatch(id);
            }
            _ => depth,
        };
        self.buffer.push(id);
        self.state = State::ReplicationCondition { depth };
    }

    fn finish_replication_condition(&mut self, close: Option<TokenId>) {
        let ids = std::mem::take(&mut self.buffer);
        classify_expression(&mut self.ast.tokens, &ids);
        let condition = resolve(&self.ast.tokens, &ids);
        if condition.is_none() {
            if let Some(at) = close {
                self.error_at(at, &messages::REPLICATION_CONDITION_EXPECTED);
            }
        }
        if let Some(statement) = self.rep_statement.as_mut() {
            statement.condition = condition;
            if let Some(close) = close {
                if let Some(span) = statement.condition_span.as_mut() {
                    span.last = close;
                }
                statement.span.extend_to(close);
            }
        }
        self.state = State::ReplicationTargets;
    }

    pub(crate) fn replication_targets(&mut self, id: TokenId) {
        match self.sym(id) {
            Some(b',') => {
                if let Some(statement) = self.rep_statement.as_mut() {
                    statement.span.extend_to(id);
                }
            }
            Some(b';') => self.finish_replication_statement(id),
            Some(b'}') => {
                self.expected(id, ";");
                if let Some(last) = self.previous {
                    self.finish_replication_statement(last);
                }
                self.state = State::ReplicationBody;
                self.dispatch(id);
            }
            _ if self.is_word(id) => {
                self.mark(id, TokenKind::PropertyReference);
                let statement = self.statement_mut(id);
                statement.targets.push(id);
                statement.span.extend_to(id);
            }
            _ => self.error_at(id, &messages::UNEXPECTED_TOKEN),
        }
    }

    fn finish_replication_statement(&mut self, last: TokenId) {
        if let (Some(mut statement), Some(block)) = (self.rep_statement.take(), self.replication.as_mut()) {
            statement.span.extend_to(last);
            block.statements.push(statement);
        }
        self.state = State::ReplicationBody;
    }

    fn close_replication(&mut self, id: TokenId) {
        if let Some(mut block) = self.replication.take() {
            if let Some(body) = block.body.as_mut() {
                body.last = id;
            }
            block.span.extend_to(id);
            self.ast.replication.push(block);
        }
        self.resume_scope();
    }
}
