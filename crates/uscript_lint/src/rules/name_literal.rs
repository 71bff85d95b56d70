//! `'Name'` literals: no whitespace, at most 64 characters per name.
//! Object paths such as `Texture'Pkg.Group.Tex'` are checked per segment.

use uscript_ast::*;
use uscript_options::LintOptions;

use crate::context::LintContext;
use crate::result::LintResult;
use crate::rules::TokenRule;

const MAX_NAME_LENGTH: usize = 64;

pub(crate) struct NameLiteral;

impl TokenRule for NameLiteral {
    fn name(&self) -> &'static str {
        "name-literal"
    }

    fn enabled(&self, options: &LintOptions) -> bool {
        options.name_literal
    }

    fn check_token(&mut self, _cx: &LintContext<'_>, token: &Token, _previous: Option<&Token>, results: &mut Vec<LintResult>) {
        if token.kind().is_trivia() || token.lexical_kind != TokenKind::Name {
            return;
        }
        let Some(content) = token.text.strip_prefix('\'').and_then(|t| t.strip_suffix('\'')) else {
            results.push(LintResult::error(self.name(), token, "Unterminated name literal."));
            return;
        };
        if content.chars().any(char::is_whitespace) {
            results.push(LintResult::error(
                self.name(),
                token,
                format!("Name {} must not contain spaces.", token.text),
            ));
        } else if let Some(segment) = content.split('.').find(|s| s.chars().count() > MAX_NAME_LENGTH) {
            results.push(LintResult::error(
                self.name(),
                token,
                format!("Name '{segment}' is longer than {MAX_NAME_LENGTH} characters."),
            ));
        }
    }
}
