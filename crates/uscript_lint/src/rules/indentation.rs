//! Leading whitespace must match the inferred nesting level.

use uscript_ast::TokenKind;
use uscript_core::text::is_blank;
use uscript_options::{IndentStyle, LintOptions};

use crate::context::LintContext;
use crate::result::{LintResult, Severity};
use crate::rules::redundant_default_value::emptied_lines;
use crate::rules::AstRule;

pub(crate) struct Indentation;

impl AstRule for Indentation {
    fn name(&self) -> &'static str {
        "indentation"
    }

    fn enabled(&self, options: &LintOptions) -> bool {
        options.indentation
    }

    fn check(&self, cx: &LintContext<'_>, results: &mut Vec<LintResult>) {
        let ast = cx.ast;
        let mut skipped = vec![false; ast.lines.len()];
        for block in &ast.native_blocks {
            let (first, last) = ast.span_lines(*block);
            for line in first + 1..last {
                skipped[line as usize] = true;
            }
        }
        for line in emptied_lines(cx) {
            skipped[line as usize] = true;
        }

        let unit = match cx.options.indent_style {
            IndentStyle::Tab => "tab",
            IndentStyle::Space => "space",
        };
        for (index, text) in ast.lines.iter().enumerate() {
            let line = index as u32;
            if skipped[index] || is_blank(text) || ast.is_comment_line(line) {
                continue;
            }
            let starts_directive = ast
                .tokens_on_line(line)
                .first()
                .map_or(false, |t| t.kind() == TokenKind::Preprocessor);
            if starts_directive {
                continue;
            }
            let level = cx.indent_level(line);
            let expected = cx.options.indent(level);
            let actual = cx.leading_whitespace(line);
            if actual == expected {
                continue;
            }
            let count = match cx.options.indent_style {
                IndentStyle::Tab => level,
                IndentStyle::Space => level * cx.options.indent_size as u32,
            };
            results.push(
                LintResult::new(
                    self.name(),
                    Severity::Warning,
                    line,
                    0,
                    actual.len() as u32,
                    format!("Expected indentation of {count} {unit}{}.", if count == 1 { "" } else { "s" }),
                )
                .with_fix(actual, expected),
            );
        }
    }
}
