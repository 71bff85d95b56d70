//! `True`, `False` and `None` are capitalized.

use uscript_ast::*;
use uscript_options::LintOptions;

use crate::context::LintContext;
use crate::result::LintResult;
use crate::rules::TokenRule;

const LITERALS: &[&str] = &["True", "False", "None"];

pub(crate) struct LiteralCasing;

impl TokenRule for LiteralCasing {
    fn name(&self) -> &'static str {
        "literal-casing"
    }

    fn enabled(&self, options: &LintOptions) -> bool {
        options.literal_casing
    }

    fn check_token(&mut self, _cx: &LintContext<'_>, token: &Token, _previous: Option<&Token>, results: &mut Vec<LintResult>) {
        if !token.is_word() || !matches!(token.kind(), TokenKind::Literal | TokenKind::Identifier) {
            return;
        }
        let Some(expected) = LITERALS.iter().find(|literal| token.is(literal)) else {
            return;
        };
        if token.text != *expected {
            results.push(
                LintResult::warning(self.name(), token, format!("Write '{}' as '{expected}'.", token.text))
                    .with_fix(token.text.clone(), *expected),
            );
        }
    }
}
