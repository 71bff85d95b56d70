//! Simple statements end with `;`.

use uscript_ast::visitor::for_each_statement;
use uscript_options::LintOptions;

use crate::context::LintContext;
use crate::result::{LintResult, Severity};
use crate::rules::AstRule;

pub(crate) struct MissingSemicolon;

impl AstRule for MissingSemicolon {
    fn name(&self) -> &'static str {
        "missing-semicolon"
    }

    fn enabled(&self, options: &LintOptions) -> bool {
        options.missing_semicolon
    }

    fn check(&self, cx: &LintContext<'_>, results: &mut Vec<LintResult>) {
        let ast = cx.ast;
        let bodies = ast
            .all_functions()
            .map(|f| f.body.as_slice())
            .chain(ast.states.iter().map(|s| s.body.as_slice()));
        for body in bodies {
            for_each_statement(body, &mut |stmt| {
                if stmt.op.is_none() || stmt.is_control() {
                    return;
                }
                let last = ast.token(stmt.span.last);
                if last.is_punct(";") {
                    return;
                }
                results.push(
                    LintResult::new(
                        self.name(),
                        Severity::Error,
                        last.line,
                        last.end_column(),
                        0,
                        format!("Missing ';' after '{}'.", last.text),
                    )
                    .with_fix("", ";"),
                );
            });
        }
    }
}
