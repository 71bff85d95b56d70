//! `defaultproperties { ... }` and `structdefaultproperties { ... }`.
//!
//! Assignments are separated by newlines as often as by `;`, so a value
//! also ends where a new word follows a complete term.

use uscript_ast::*;
use uscript_diagnostics::messages;

use crate::expressions::{classify_expression, find_top_level, matching_close, resolve, split_top_level};
use crate::parser::{Parser, State};
use crate::utilities::{is_term, Keyword};

impl Parser {
    pub(crate) fn start_defaults(&mut self, id: TokenId) {
        self.drop_stale_modifiers();
        self.mark(id, TokenKind::Keyword);
        self.defaults_in_struct = !self.structs.is_empty();
        self.defaults = Some(DefaultPropertiesBlock {
            properties: Vec::new(),
            sub_objects: Vec::new(),
            body: None,
            span: Span::single(id),
        });
        self.state = State::DefaultsOpen;
    }

    pub(crate) fn defaults_open(&mut self, id: TokenId) {
        if self.sym(id) == Some(b'{') {
            if let Some(block) = self.defaults.as_mut() {
                block.body = Some(Span::single(id));
                block.span.extend_to(id);
            }
            self.state = State::DefaultsBody;
        } else {
            self.expected(id, "{");
            self.store_defaults();
            self.recover_in_scope(id);
        }
    }

    pub(crate) fn defaults_body(&mut self, id: TokenId) {
        match self.sym(id) {
            Some(b'}') => return self.close_defaults(id),
            Some(b';' | b',') => return,
            _ => {}
        }
        match self.keyword(id) {
            Some(Keyword::Begin) => {
                self.mark(id, TokenKind::Keyword);
                if let Some(open) = self.sub_object.take() {
                    self.push_sub_object(open);
                }
                self.sub_object = Some(SubObject {
                    class: None,
                    name: None,
                    properties: Vec::new(),
                    span: Span::single(id),
                });
                self.buffer.clear();
                self.state = State::SubObjectHeader;
            }
            Some(Keyword::End) => {
                self.mark(id, TokenKind::Keyword);
                self.state = State::SubObjectEnd;
            }
            _ if self.is_word(id) => {
                self.mark(id, TokenKind::PropertyReference);
                self.property = Some(DefaultProperty {
                    name: id,
                    index: None,
                    operation: None,
                    value: DefaultValue::Empty,
                    span: Span::single(id),
                });
                self.state = State::DefaultsAfterName;
            }
            _ => self.error_at(id, &messages::DEFAULT_PROPERTY_EXPECTED),
        }
    }

    fn extend_property(&mut self, id: TokenId) {
        if let Some(property) = self.property.as_mut() {
            property.span.extend_to(id);
        }
    }

    pub(crate) fn defaults_after_name(&mut self, id: TokenId) {
        match self.sym(id) {
            Some(b'(' | b'[') => {
                self.extend_property(id);
                self.buffer.clear();
                self.state = State::DefaultsIndex { depth: 1 };
            }
            Some(b'.') => {
                self.extend_property(id);
                self.state = State::DefaultsOperation;
            }
            Some(b'=') => {
                self.extend_property(id);
                self.buffer.clear();
                self.state = State::DefaultsValue { depth: 0, call: false };
            }
            _ => {
                self.expected(id, "=");
                self.property = None;
                self.state = State::DefaultsBody;
                if self.sym(id) != Some(b';') {
                    self.dispatch(id);
                }
            }
        }
    }

    pub(crate) fn defaults_index(&mut self, id: TokenId, depth: u32) {
        let depth = match self.sym(id) {
            Some(b'(' | b'[') => depth + 1,
            Some(b')' | b']') => depth - 1,
            Some(b'}' | b';') => {
                self.expected(id, ")");
                self.property = None;
                self.state = State::DefaultsBody;
                return self.dispatch(id);
            }
            _ => depth,
        };
        if depth > 0 {
            self.buffer.push(id);
            self.state = State::DefaultsIndex { depth };
            return;
        }
        let ids = std::mem::take(&mut self.buffer);
        classify_expression(&mut self.ast.tokens, &ids);
        let index = resolve(&self.ast.tokens, &ids);
        if let Some(property) = self.property.as_mut() {
            property.index = index;
            property.span.extend_to(id);
        }
        self.state = State::DefaultsAfterName;
    }

    /// `Name.Add(Value)`, `Name.Empty`.
    pub(crate) fn defaults_operation(&mut self, id: TokenId) {
        let has_operation = self.property.as_ref().map_or(false, |p| p.operation.is_some());
        match self.sym(id) {
            Some(b'(') if has_operation => {
                self.extend_property(id);
                self.buffer.clear();
                self.state = State::DefaultsValue { depth: 1, call: true };
            }
            _ if !has_operation && self.is_word(id) => {
                self.mark(id, TokenKind::FunctionReference);
                if let Some(property) = self.property.as_mut() {
                    property.operation = Some(id);
                    property.span.extend_to(id);
                }
            }
            _ => {
                if !has_operation {
                    self.error_at(id, &messages::IDENTIFIER_EXPECTED);
                }
                let last = self.previous.unwrap_or(id);
                self.finish_property(last);
                self.state = State::DefaultsBody;
                self.dispatch(id);
            }
        }
    }

    pub(crate) fn defaults_value(&mut self, id: TokenId, depth: u32, call: bool) {
        let ends = match self.sym(id) {
            Some(b'}') => {
                let last = self.previous.unwrap_or(id);
                self.finish_property(last);
                self.state = State::DefaultsBody;
                return self.dispatch(id);
            }
            Some(b';' | b',') => depth == 0,
            Some(b')') => call && depth == 1,
            _ => false,
        };
        if ends {
            self.finish_property(id);
            self.state = State::DefaultsBody;
            return;
        }
        if depth == 0 && self.is_word(id) && self.starts_next_property(id) {
            let last = self.previous.unwrap_or(id);
            self.finish_property(last);
            self.state = State::DefaultsBody;
            return self.dispatch(id);
        }

        let depth = match self.sym(id) {
            Some(b'(' | b'[') => depth + 1,
            Some(b')' | b']') => depth.saturating_sub(1),
            _ => depth,
        };
        self.buffer.push(id);
        self.state = State::DefaultsValue { depth, call };
    }

    /// Whether a word in value position actually begins the next
    /// assignment: it follows a complete value, or it sits on a later line
    /// than an `=` with nothing after it.
    fn starts_next_property(&self, id: TokenId) -> bool {
        match self.buffer.last() {
            Some(&last) => is_term(self.token(last)),
            None => self
                .property
                .as_ref()
                .map_or(false, |p| self.line_of(p.span.last) < self.line_of(id)),
        }
    }

    fn finish_property(&mut self, last: TokenId) {
        let ids = std::mem::take(&mut self.buffer);
        let Some(mut property) = self.property.take() else {
            return;
        };
        property.span.extend_to(last);
        property.value = self.default_value(&ids);
        match (self.sub_object.as_mut(), self.defaults.as_mut()) {
            (Some(sub_object), _) => {
                sub_object.span.extend_to(last);
                sub_object.properties.push(property);
            }
            (None, Some(block)) => block.properties.push(property),
            (None, None) => {}
        }
    }

    fn default_value(&mut self, ids: &[TokenId]) -> DefaultValue {
        match ids {
            [] => DefaultValue::Empty,
            [only] => DefaultValue::Literal(*only),
            [class, path] if self.is_word(*class) && self.token(*path).lexical_kind == TokenKind::Name => {
                self.mark(*class, TokenKind::ClassReference);
                DefaultValue::ObjectReference {
                    class: *class,
                    path: *path,
                }
            }
            [first, .., last]
                if self.sym(*first) == Some(b'(')
                    && matching_close(&self.ast.tokens, ids, 0) == Some(ids.len() - 1) =>
            {
                let mut entries = Vec::new();
                for part in split_top_level(&self.ast.tokens, &ids[1..ids.len() - 1], ",") {
                    if !part.is_empty() {
                        entries.push(self.aggregate_entry(part));
                    }
                }
                DefaultValue::Aggregate(Aggregate {
                    entries,
                    span: Span::new(*first, *last),
                })
            }
            _ => DefaultValue::Tokens(ids.to_vec()),
        }
    }

    /// `Name=value`, `Name(0)=value`, or a positional value.
    fn aggregate_entry(&mut self, part: &[TokenId]) -> AggregateEntry {
        let equals = find_top_level(&self.ast.tokens, part, |token| token.is_punct("="));
        if let Some(eq) = equals {
            let head = &part[..eq];
            if let Some((&name, rest)) = head.split_first() {
                if self.is_word(name) {
                    self.mark(name, TokenKind::PropertyReference);
                    let index = if rest.len() >= 2 {
                        let inner = &rest[1..rest.len() - 1];
                        classify_expression(&mut self.ast.tokens, inner);
                        resolve(&self.ast.tokens, inner)
                    } else {
                        None
                    };
                    return AggregateEntry {
                        name: Some(name),
                        index,
                        value: self.default_value(&part[eq + 1..]),
                    };
                }
            }
        }
        AggregateEntry {
            name: None,
            index: None,
            value: self.default_value(part),
        }
    }

    // ========================================================================
    // Begin Object Class=X Name=Y ... End Object
    // ========================================================================

    pub(crate) fn sub_object_header(&mut self, id: TokenId) {
        let header_line = self.sub_object.as_ref().map(|sub| self.line_of(sub.span.first));
        if header_line.map_or(true, |line| line < self.line_of(id)) {
            self.state = State::DefaultsBody;
            return self.dispatch(id);
        }

        let owner = match self.buffer.as_slice() {
            [.., key, eq] if self.sym(*eq) == Some(b'=') => Some(*key),
            _ => None,
        };
        if let Some(key) = owner {
            if self.is(key, "class") {
                self.mark(id, TokenKind::ClassReference);
                if let Some(sub) = self.sub_object.as_mut() {
                    sub.class = Some(id);
                }
            } else if self.is(key, "name") {
                if let Some(sub) = self.sub_object.as_mut() {
                    sub.name = Some(id);
                }
            }
        } else if self.keyword(id) == Some(Keyword::Object) {
            self.mark(id, TokenKind::Keyword);
        }
        if let Some(sub) = self.sub_object.as_mut() {
            sub.span.extend_to(id);
        }
        self.buffer.push(id);
    }

    pub(crate) fn sub_object_end(&mut self, id: TokenId) {
        let closes = self.keyword(id) == Some(Keyword::Object);
        if closes {
            self.mark(id, TokenKind::Keyword);
        } else {
            self.expected(id, "Object");
        }
        match self.sub_object.take() {
            Some(mut sub) => {
                sub.span.extend_to(if closes { id } else { self.previous.unwrap_or(id) });
                self.push_sub_object(sub);
            }
            None => self.error_at(id, &messages::UNEXPECTED_TOKEN),
        }
        self.buffer.clear();
        self.state = State::DefaultsBody;
        if !closes {
            self.dispatch(id);
        }
    }

    fn push_sub_object(&mut self, sub: SubObject) {
        if let Some(block) = self.defaults.as_mut() {
            block.sub_objects.push(sub);
        }
    }

    // ========================================================================
    // Closing
    // ========================================================================

    fn close_defaults(&mut self, id: TokenId) {
        if let Some(sub) = self.sub_object.take() {
            self.expected(id, "End Object");
            self.push_sub_object(sub);
        }
        if let Some(block) = self.defaults.as_mut() {
            if let Some(body) = block.body.as_mut() {
                body.last = id;
            }
            block.span.extend_to(id);
        }
        self.store_defaults();
        self.resume_scope();
    }

    /// Move the open block to its owner: the innermost struct or the class.
    fn store_defaults(&mut self) {
        let Some(block) = self.defaults.take() else {
            return;
        };
        match (self.defaults_in_struct, self.structs.last_mut()) {
            (true, Some(owner)) => owner.defaults.push(block),
            _ => self.ast.default_properties.push(block),
        }
        self.defaults_in_struct = false;
    }

    /// End of file inside a defaults block.
    pub(crate) fn close_open_defaults(&mut self, last: TokenId) {
        if self.property.is_some() {
            self.finish_property(last);
        }
        if let Some(mut sub) = self.sub_object.take() {
            sub.span.extend_to(last);
            self.push_sub_object(sub);
        }
        if let Some(block) = self.defaults.as_mut() {
            if let Some(body) = block.body.as_mut() {
                body.last = last;
            }
            block.span.extend_to(last);
        }
        self.store_defaults();
    }
}
