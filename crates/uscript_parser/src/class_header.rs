//! `class Name extends Package.Parent modifiers...;`

use uscript_ast::{ClassFlags, Span, TokenId, TokenKind};
use uscript_diagnostics::messages;

use crate::parser::{Parser, State};
use crate::utilities::Keyword;

impl Parser {
    pub(crate) fn class_keyword(&mut self, id: TokenId) {
        match self.keyword(id) {
            Some(Keyword::Class | Keyword::Interface) => self.start_class_header(id),
            _ => {
                self.error_at(id, &messages::CLASS_DECLARATION_EXPECTED);
                self.state = State::Declarations;
                self.dispatch(id);
            }
        }
    }

    pub(crate) fn start_class_header(&mut self, id: TokenId) {
        if self.keyword(id) == Some(Keyword::Interface) {
            self.ast.flags |= ClassFlags::INTERFACE;
        }
        self.mark(id, TokenKind::Keyword);
        self.ast.header = Some(Span::single(id));
        self.state = State::ClassName;
    }

    fn extend_header(&mut self, id: TokenId) {
        if let Some(header) = self.ast.header.as_mut() {
            header.extend_to(id);
        }
    }

    pub(crate) fn class_name(&mut self, id: TokenId) {
        if self.is_word(id) && !self.starts_declaration(id) {
            self.extend_header(id);
            self.ast.name = Some(id);
            self.mark(id, TokenKind::ClassDeclaration);
            self.state = State::ClassHeader;
        } else {
            self.error_at(id, &messages::CLASS_NAME_EXPECTED);
            self.state = State::ClassHeader;
            self.dispatch(id);
        }
    }

    pub(crate) fn class_header(&mut self, id: TokenId) {
        match self.sym(id) {
            Some(b';') => {
                self.extend_header(id);
                self.state = State::Declarations;
                return;
            }
            Some(b'(') if !self.ast.modifiers.is_empty() && self.ast.modifiers.last() == self.previous.as_ref() => {
                self.extend_header(id);
                self.state = State::ClassModifierArgs { depth: 1 };
                return;
            }
            // `extends Package.Parent`
            Some(b'.') if self.ast.parent.is_some() && self.previous == self.ast.parent => {
                self.extend_header(id);
                self.ast.parent_package = self.ast.parent.take();
                if let Some(package) = self.ast.parent_package {
                    self.mark(package, TokenKind::Identifier);
                }
                self.state = State::ClassParent;
                return;
            }
            _ => {}
        }

        match self.keyword(id) {
            Some(Keyword::Extends | Keyword::Expands) => {
                self.extend_header(id);
                self.mark(id, TokenKind::Keyword);
                self.state = State::ClassParent;
            }
            Some(Keyword::Within) => {
                self.extend_header(id);
                self.mark(id, TokenKind::Modifier);
                self.ast.flags |= ClassFlags::WITHIN;
                self.ast.modifiers.push(id);
                self.state = State::ClassWithin;
            }
            _ if self.starts_declaration(id) || self.sym(id) == Some(b'{') => {
                self.error(id, &messages::UNTERMINATED_CLASS_DECLARATION, &[]);
                self.state = State::Declarations;
                self.dispatch(id);
            }
            _ if self.is_word(id) => {
                // Unknown words are kept as modifiers; engines add their own.
                self.extend_header(id);
                if let Some(flag) = ClassFlags::from_keyword(self.text(id)) {
                    self.ast.flags |= flag;
                }
                self.ast.modifiers.push(id);
                self.mark(id, TokenKind::Modifier);
            }
            _ => {
                self.extend_header(id);
                self.error_at(id, &messages::UNEXPECTED_TOKEN);
            }
        }
    }

    pub(crate) fn class_parent(&mut self, id: TokenId) {
        if self.is_word(id) && !self.starts_declaration(id) {
            self.extend_header(id);
            self.ast.parent = Some(id);
            self.mark(id, TokenKind::ClassReference);
            self.state = State::ClassHeader;
        } else {
            let keyword = self.previous.map(|p| self.text(p).to_string()).unwrap_or_default();
            let found = self.text(id).to_string();
            self.error(id, &messages::PARENT_CLASS_EXPECTED, &[&keyword, &found]);
            self.state = State::ClassHeader;
            self.dispatch(id);
        }
    }

    pub(crate) fn class_within(&mut self, id: TokenId) {
        if self.is_word(id) && !self.starts_declaration(id) {
            self.extend_header(id);
            self.mark(id, TokenKind::ClassReference);
            self.state = State::ClassHeader;
        } else {
            self.error_at(id, &messages::IDENTIFIER_EXPECTED);
            self.state = State::ClassHeader;
            self.dispatch(id);
        }
    }

    /// Arguments of `config(Name)`, `dependson(A, B)`, `hidecategories(...)`.
    pub(crate) fn class_modifier_args(&mut self, id: TokenId, depth: u32) {
        match self.sym(id) {
            Some(b'(') => {
                self.extend_header(id);
                self.state = State::ClassModifierArgs { depth: depth + 1 };
            }
            Some(b')') => {
                self.extend_header(id);
                self.state = if depth <= 1 {
                    State::ClassHeader
                } else {
                    State::ClassModifierArgs { depth: depth - 1 }
                };
            }
            Some(b';' | b'{') => {
                self.expected(id, ")");
                self.state = State::ClassHeader;
                self.dispatch(id);
            }
            _ => {
                self.extend_header(id);
                if !self.is_word(id) {
                    return;
                }
                let owner = self.ast.modifiers.last().copied();
                let in_config = owner.map_or(false, |m| self.is(m, "config"));
                if in_config && self.ast.config_name.is_none() {
                    self.ast.config_name = Some(id);
                } else if owner.map_or(false, |m| self.is(m, "dependson") || self.is(m, "within")) {
                    self.mark(id, TokenKind::ClassReference);
                }
            }
        }
    }
}
