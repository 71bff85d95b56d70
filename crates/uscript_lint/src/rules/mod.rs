//! Lint rules.
//!
//! Rules come in two shapes. An [`AstRule`] sees the finished tree once; a
//! [`TokenRule`] is fed every token in source order together with the token
//! before it, and may keep a little state of its own between calls.
//!
//! To add a rule, create `rules/<rule>.rs`, declare its module below and
//! register it in [`ast_rules`] or [`token_rules`] (both alphabetical).

mod brace_on_own_line;
mod class_name;
mod condition_spacing;
mod indentation;
mod keyword_casing;
mod literal_casing;
mod missing_semicolon;
mod name_literal;
mod newline_before_function;
mod parse_errors;
mod redundant_default_value;
mod return_value;
mod string_escapes;
mod unused_local;

use uscript_ast::Token;
use uscript_options::LintOptions;

use crate::context::LintContext;
use crate::result::LintResult;

/// A rule that inspects the whole tree.
pub trait AstRule {
    fn name(&self) -> &'static str;
    fn enabled(&self, options: &LintOptions) -> bool;
    fn check(&self, cx: &LintContext<'_>, results: &mut Vec<LintResult>);
}

/// A rule that inspects the token stream one token at a time.
pub trait TokenRule {
    fn name(&self) -> &'static str;
    fn enabled(&self, options: &LintOptions) -> bool;
    fn check_token(
        &mut self,
        cx: &LintContext<'_>,
        token: &Token,
        previous: Option<&Token>,
        results: &mut Vec<LintResult>,
    );
}

pub(crate) fn ast_rules() -> Vec<Box<dyn AstRule>> {
    vec![
        Box::new(class_name::ClassNameMatchesFile),
        Box::new(condition_spacing::ConditionSpacing),
        Box::new(indentation::Indentation),
        Box::new(missing_semicolon::MissingSemicolon),
        Box::new(newline_before_function::NewlineBeforeFunction),
        Box::new(parse_errors::ParseErrors),
        Box::new(redundant_default_value::RedundantDefaultValue),
        Box::new(return_value::ReturnValue),
        Box::new(unused_local::UnusedLocal),
    ]
}

/// Token rules may keep state across calls, so each run gets a fresh set.
pub(crate) fn token_rules() -> Vec<Box<dyn TokenRule>> {
    vec![
        Box::new(brace_on_own_line::BraceOnOwnLine),
        Box::new(keyword_casing::KeywordCasing),
        Box::new(literal_casing::LiteralCasing),
        Box::new(name_literal::NameLiteral),
        Box::new(string_escapes::StringEscapes),
    ]
}

/// Whether a token carries code, as opposed to comments or directives.
pub(crate) fn is_code(token: &Token) -> bool {
    !token.kind().is_trivia()
}
