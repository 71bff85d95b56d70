//! Surface every parse error as a lint problem.

use uscript_diagnostics::DiagnosticCategory;
use uscript_options::LintOptions;

use crate::context::LintContext;
use crate::result::{LintResult, Severity};
use crate::rules::AstRule;

pub(crate) struct ParseErrors;

impl AstRule for ParseErrors {
    fn name(&self) -> &'static str {
        "parse-error"
    }

    fn enabled(&self, options: &LintOptions) -> bool {
        options.parse_errors
    }

    fn check(&self, cx: &LintContext<'_>, results: &mut Vec<LintResult>) {
        for diagnostic in cx.ast.errors.iter() {
            let span = diagnostic.span;
            let length = if span.is_single_line() {
                span.end.column.saturating_sub(span.start.column)
            } else {
                (cx.line(span.start.line).len() as u32).saturating_sub(span.start.column)
            };
            let severity = match diagnostic.category {
                DiagnosticCategory::Error => Severity::Error,
                DiagnosticCategory::Warning => Severity::Warning,
            };
            results.push(LintResult::new(
                self.name(),
                severity,
                span.start.line,
                span.start.column,
                length,
                diagnostic.message_text.clone(),
            ));
        }
    }
}
