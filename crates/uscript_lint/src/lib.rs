//! uscript_lint: Style and correctness checks over a parsed class.
//!
//! [`lint`] runs every enabled rule over a [`ClassUnit`] and returns the
//! problems in the order the rules found them; callers sort by position
//! when display order matters. Problems that carry `fixed_text` can be
//! applied with `uscript_editor`.

pub mod context;
pub mod indentation;
pub mod result;
pub mod rules;

pub use context::LintContext;
pub use result::{LintResult, LintTags, Severity};
pub use rules::{AstRule, TokenRule};

use std::path::Path;
use tracing::debug;
use uscript_ast::ClassUnit;
use uscript_options::LintOptions;

/// Lint a tree. The class-name rule needs a file name and is skipped.
pub fn lint(ast: &ClassUnit, options: &LintOptions) -> Vec<LintResult> {
    run(&LintContext::new(ast, options, None))
}

/// Lint a tree parsed from `path`.
pub fn lint_file(ast: &ClassUnit, options: &LintOptions, path: &Path) -> Vec<LintResult> {
    let stem = path.file_stem().and_then(|stem| stem.to_str());
    run(&LintContext::new(ast, options, stem))
}

fn run(cx: &LintContext<'_>) -> Vec<LintResult> {
    let mut results = Vec::new();

    for rule in rules::ast_rules() {
        if rule.enabled(cx.options) {
            rule.check(cx, &mut results);
        }
    }

    let mut token_rules: Vec<_> = rules::token_rules()
        .into_iter()
        .filter(|rule| rule.enabled(cx.options))
        .collect();
    if !token_rules.is_empty() {
        let mut previous = None;
        for token in &cx.ast.tokens {
            for rule in token_rules.iter_mut() {
                rule.check_token(cx, token, previous, &mut results);
            }
            previous = Some(token);
        }
    }

    debug!(
        class = cx.ast.name_text().unwrap_or("<none>"),
        problems = results.len(),
        "lint finished"
    );
    results
}
