//! `if (x)`: one space between the keyword and `(`, none inside the
//! parentheses.

use uscript_ast::visitor::for_each_statement;
use uscript_ast::*;
use uscript_options::LintOptions;

use crate::context::LintContext;
use crate::result::{LintResult, Severity};
use crate::rules::AstRule;

const CONDITION_KEYWORDS: &[&str] = &["if", "while", "for", "switch", "until"];

pub(crate) struct ConditionSpacing;

impl AstRule for ConditionSpacing {
    fn name(&self) -> &'static str {
        "condition-spacing"
    }

    fn enabled(&self, options: &LintOptions) -> bool {
        options.condition_spacing
    }

    fn check(&self, cx: &LintContext<'_>, results: &mut Vec<LintResult>) {
        let ast = cx.ast;
        let bodies = ast
            .all_functions()
            .map(|f| f.body.as_slice())
            .chain(ast.states.iter().map(|s| s.body.as_slice()));
        for body in bodies {
            for_each_statement(body, &mut |stmt| self.check_statement(cx, stmt, results));
        }
    }
}

impl ConditionSpacing {
    fn check_statement(&self, cx: &LintContext<'_>, stmt: &Statement, results: &mut Vec<LintResult>) {
        let ast = cx.ast;
        let Some(condition) = stmt.condition else {
            return;
        };
        let Some(keyword) = condition.first.index().checked_sub(1).map(|i| &ast.tokens[i]) else {
            return;
        };
        if !CONDITION_KEYWORDS.iter().any(|k| keyword.is(k)) {
            return;
        }
        let open = ast.token(condition.first);
        let close = ast.token(condition.last);
        self.gap(cx, keyword, open, " ", results);
        if condition.last.index() > condition.first.index() + 1 {
            self.gap(cx, open, &ast.tokens[condition.first.index() + 1], "", results);
            self.gap(cx, &ast.tokens[condition.last.index() - 1], close, "", results);
        }
    }

    /// Check the whitespace between two tokens on the same line.
    fn gap(&self, cx: &LintContext<'_>, left: &Token, right: &Token, expected: &str, results: &mut Vec<LintResult>) {
        if left.line != right.line || right.column < left.end_column() || left.is_comment() || right.is_comment() {
            return;
        }
        let line = cx.line(left.line);
        let Some(actual) = line.get(left.end_column() as usize..right.column as usize) else {
            return;
        };
        if actual == expected {
            return;
        }
        let message = if expected.is_empty() {
            format!("Unexpected space between '{}' and '{}'.", left.text, right.text)
        } else {
            format!("Expected one space between '{}' and '{}'.", left.text, right.text)
        };
        results.push(
            LintResult::new(
                self.name(),
                Severity::Warning,
                left.line,
                left.end_column(),
                actual.len() as u32,
                message,
            )
            .with_fix(actual, expected),
        );
    }
}
