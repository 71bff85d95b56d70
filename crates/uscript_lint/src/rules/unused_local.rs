//! Locals that no statement ever mentions.

use rustc_hash::FxHashSet;
use uscript_ast::visitor::{walk_statements, StatementVisitor};
use uscript_ast::*;
use uscript_options::LintOptions;

use crate::context::LintContext;
use crate::result::{LintResult, LintTags};
use crate::rules::AstRule;

pub(crate) struct UnusedLocal;

/// Lowercased text of every word token in a statement tree.
struct Mentions<'a> {
    ast: &'a ClassUnit,
    words: FxHashSet<String>,
}

impl StatementVisitor for Mentions<'_> {
    fn visit_token(&mut self, id: TokenId) {
        let token = self.ast.token(id);
        if token.is_word() {
            self.words.insert(token.text.to_ascii_lowercase());
        }
    }
}

impl AstRule for UnusedLocal {
    fn name(&self) -> &'static str {
        "unused-local"
    }

    fn enabled(&self, options: &LintOptions) -> bool {
        options.unused_local
    }

    fn check(&self, cx: &LintContext<'_>, results: &mut Vec<LintResult>) {
        let ast = cx.ast;
        for function in ast.all_functions() {
            if function.locals.is_empty() {
                continue;
            }
            let mut mentions = Mentions {
                ast,
                words: FxHashSet::default(),
            };
            walk_statements(&mut mentions, &function.body);

            for local in &function.locals {
                let Some(name) = local.name else {
                    continue;
                };
                let token = ast.token(name);
                if !mentions.words.contains(&token.text.to_ascii_lowercase()) {
                    results.push(
                        LintResult::warning(self.name(), token, format!("Local variable '{}' is never used.", token.text))
                            .with_tags(LintTags::UNNECESSARY),
                    );
                }
            }
        }
    }
}
