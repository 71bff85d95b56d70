//! `return` must agree with the function's declared return type, and a
//! function that returns a value must not run off the end of its body.

use uscript_ast::visitor::for_each_statement;
use uscript_ast::*;
use uscript_options::LintOptions;

use crate::context::LintContext;
use crate::result::LintResult;
use crate::rules::AstRule;

pub(crate) struct ReturnValue;

impl AstRule for ReturnValue {
    fn name(&self) -> &'static str {
        "return-value"
    }

    fn enabled(&self, options: &LintOptions) -> bool {
        options.return_value
    }

    fn check(&self, cx: &LintContext<'_>, results: &mut Vec<LintResult>) {
        let ast = cx.ast;
        for function in ast.all_functions() {
            if !function.has_body() {
                continue;
            }
            let name = function.name.map_or("function", |id| ast.text(id));
            let valued = function.return_type.is_some();

            for_each_statement(&function.body, &mut |stmt| {
                let Some(op) = stmt.op.filter(|&op| ast.token(op).is("return")) else {
                    return;
                };
                let token = ast.token(op);
                if valued && stmt.args.is_empty() {
                    results.push(LintResult::error(
                        self.name(),
                        token,
                        format!("'{name}' must return a value."),
                    ));
                } else if !valued && !stmt.args.is_empty() {
                    results.push(LintResult::error(
                        self.name(),
                        token,
                        format!("'{name}' does not return a value."),
                    ));
                }
            });

            if valued && falls_through(ast, &function.body) {
                let Some(body) = function.body_span else {
                    continue;
                };
                results.push(LintResult::warning(
                    self.name(),
                    ast.token(body.last),
                    format!("Not all code paths of '{name}' return a value."),
                ));
            }
        }
    }
}

/// Whether control can reach the end of `body`. Anything the check does
/// not understand counts as not falling through.
fn falls_through(ast: &ClassUnit, body: &[Statement]) -> bool {
    let Some((last, rest)) = body.split_last() else {
        return true;
    };
    let Some(op) = last.op else {
        // A bare `{ }` block or an empty statement.
        return if last.is_control() { falls_through(ast, &last.body) } else { falls_through(ast, rest) };
    };
    let keyword = ast.token(op).text.to_ascii_lowercase();
    match keyword.as_str() {
        "return" | "stop" | "goto" => false,
        // Only a failing `assert(false)` halts; any other condition may pass.
        "assert" => !matches!(last.args.as_slice(), [Expr::Token(id)] if ast.token(*id).is("false")),
        "else" => {
            let matching_if = rest.last().filter(|stmt| stmt.op.map_or(false, |op| ast.token(op).is("if")));
            match matching_if {
                Some(stmt) => falls_through(ast, &last.body) || falls_through(ast, &stmt.body),
                None => false,
            }
        }
        "if" => true,
        "while" | "for" => !is_endless(ast, last),
        "do" | "foreach" => true,
        "switch" => false,
        _ if last.is_control() => false,
        _ => true,
    }
}

/// `while (true)` and `for (;;)`.
fn is_endless(ast: &ClassUnit, stmt: &Statement) -> bool {
    match stmt.args.as_slice() {
        [] => true,
        [Expr::Token(id)] => ast.token(*id).is("true"),
        _ => false,
    }
}
