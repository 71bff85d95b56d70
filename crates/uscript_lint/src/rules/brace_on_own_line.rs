//! Braces stand alone on their lines. An opening brace has no code before
//! or after it, apart from an immediately closing `}`; a closing brace has no
//! code before it.

use uscript_ast::*;
use uscript_options::LintOptions;

use crate::context::LintContext;
use crate::result::LintResult;
use crate::rules::{is_code, TokenRule};

pub(crate) struct BraceOnOwnLine;

impl BraceOnOwnLine {
    fn code_before(&self, cx: &LintContext<'_>, token: &Token, previous: Option<&Token>, results: &mut Vec<LintResult>) {
        let Some(previous) = previous.filter(|p| p.line == token.line && is_code(p)) else {
            return;
        };
        let start = previous.end_column();
        let Some(original) = cx.line(token.line).get(start as usize..token.end_column() as usize) else {
            return;
        };
        let indent = cx.options.indent(cx.indent_level(token.line));
        let mut result = LintResult::warning(self.name(), token, "'{' should be on its own line.");
        result.column = start;
        result.length = original.len() as u32;
        results.push(result.with_fix(original, format!("\n{indent}{{")));
    }

    fn code_after(&self, cx: &LintContext<'_>, token: &Token, results: &mut Vec<LintResult>) {
        let Some(next) = cx.ast.next_code_token(token.id()) else {
            return;
        };
        if next.line != token.line || next.is_punct("}") {
            return;
        }
        let start = token.end_column();
        let Some(original) = cx.line(token.line).get(start as usize..next.column as usize) else {
            return;
        };
        let indent = cx.options.indent(cx.indent_level(token.line) + 1);
        let mut result = LintResult::warning(self.name(), next, "Code after '{' should start on a new line.");
        result.column = start;
        result.length = original.len() as u32;
        results.push(result.with_fix(original, format!("\n{indent}")));
    }

    fn closing_after_code(&self, cx: &LintContext<'_>, token: &Token, previous: Option<&Token>, results: &mut Vec<LintResult>) {
        let Some(previous) = previous.filter(|p| p.line == token.line && is_code(p) && !p.is_punct("{")) else {
            return;
        };
        let start = previous.end_column();
        let Some(original) = cx.line(token.line).get(start as usize..token.column as usize) else {
            return;
        };
        let level = matching_open(cx.ast, token).map_or(0, |open| cx.indent_level(open.line));
        let indent = cx.options.indent(level);
        let mut result = LintResult::warning(self.name(), token, "'}' should be on its own line.");
        result.column = start;
        result.length = original.len() as u32;
        results.push(result.with_fix(original, format!("\n{indent}")));
    }
}

/// The `{` closed by `close`.
fn matching_open<'a>(ast: &'a ClassUnit, close: &Token) -> Option<&'a Token> {
    let mut depth = 0u32;
    for token in ast.tokens[..close.index].iter().rev().filter(|t| is_code(t)) {
        if token.is_punct("}") {
            depth += 1;
        } else if token.is_punct("{") {
            if depth == 0 {
                return Some(token);
            }
            depth -= 1;
        }
    }
    None
}

impl TokenRule for BraceOnOwnLine {
    fn name(&self) -> &'static str {
        "brace-on-own-line"
    }

    fn enabled(&self, options: &LintOptions) -> bool {
        options.brace_on_own_line
    }

    fn check_token(&mut self, cx: &LintContext<'_>, token: &Token, previous: Option<&Token>, results: &mut Vec<LintResult>) {
        if !is_code(token) {
            return;
        }
        if token.is_punct("{") {
            self.code_before(cx, token, previous, results);
            self.code_after(cx, token, results);
        } else if token.is_punct("}") {
            self.closing_after_code(cx, token, previous, results);
        }
    }
}
