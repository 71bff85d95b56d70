//! A function declaration is separated from the code above it by a blank
//! line. Comments directly above the function belong to it.

use uscript_ast::FunctionDecl;
use uscript_core::text::is_blank;
use uscript_options::LintOptions;

use crate::context::LintContext;
use crate::result::{LintResult, Severity};
use crate::rules::AstRule;

pub(crate) struct NewlineBeforeFunction;

impl AstRule for NewlineBeforeFunction {
    fn name(&self) -> &'static str {
        "newline-before-function"
    }

    fn enabled(&self, options: &LintOptions) -> bool {
        options.newline_before_function
    }

    fn check(&self, cx: &LintContext<'_>, results: &mut Vec<LintResult>) {
        for function in cx.ast.all_functions() {
            if let Some(result) = self.check_function(cx, function) {
                results.push(result);
            }
        }
    }
}

impl NewlineBeforeFunction {
    fn check_function(&self, cx: &LintContext<'_>, function: &FunctionDecl) -> Option<LintResult> {
        let ast = cx.ast;
        let mut top = ast.token(function.span.first).line;
        while top > 0 && ast.is_comment_line(top - 1) {
            top -= 1;
        }
        let above = top.checked_sub(1)?;
        if is_blank(cx.line(above)) {
            return None;
        }
        // First declaration in a state body.
        let opens_scope = ast
            .tokens_on_line(above)
            .iter()
            .rev()
            .find(|t| !t.is_comment())
            .map_or(false, |t| t.is_punct("{"));
        if opens_scope {
            return None;
        }
        let name = function.name.map_or("function", |id| ast.text(id));
        Some(
            LintResult::new(
                self.name(),
                Severity::Warning,
                top,
                0,
                0,
                format!("Expected a blank line before '{name}'."),
            )
            .with_fix("", "\n"),
        )
    }
}
