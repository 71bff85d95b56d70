//! The class must be named after its file.

use uscript_options::LintOptions;

use crate::context::LintContext;
use crate::result::LintResult;
use crate::rules::AstRule;

pub(crate) struct ClassNameMatchesFile;

impl AstRule for ClassNameMatchesFile {
    fn name(&self) -> &'static str {
        "class-name"
    }

    fn enabled(&self, options: &LintOptions) -> bool {
        options.class_name_matches_file
    }

    fn check(&self, cx: &LintContext<'_>, results: &mut Vec<LintResult>) {
        let (Some(stem), Some(name)) = (cx.file_stem, cx.ast.name) else {
            return;
        };
        let token = cx.ast.token(name);
        if token.text == stem {
            return;
        }
        // A case-only difference still compiles.
        let result = if token.is(stem) {
            LintResult::warning(
                self.name(),
                token,
                format!("Class name '{}' differs in case from file name '{stem}'.", token.text),
            )
        } else {
            LintResult::error(
                self.name(),
                token,
                format!("Class name '{}' does not match file name '{stem}'.", token.text),
            )
        };
        results.push(result.with_fix(token.text.clone(), stem));
    }
}
