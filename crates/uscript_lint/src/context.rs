//! State shared by every rule during one lint run.

use std::cell::OnceCell;
use uscript_ast::ClassUnit;
use uscript_core::text::leading_whitespace;
use uscript_options::LintOptions;

use crate::indentation::infer_levels;

pub struct LintContext<'a> {
    pub ast: &'a ClassUnit,
    pub options: &'a LintOptions,
    /// File name without extension, when linting a file on disk.
    pub file_stem: Option<&'a str>,
    levels: OnceCell<Vec<u32>>,
}

impl<'a> LintContext<'a> {
    pub fn new(ast: &'a ClassUnit, options: &'a LintOptions, file_stem: Option<&'a str>) -> Self {
        Self {
            ast,
            options,
            file_stem,
            levels: OnceCell::new(),
        }
    }

    /// Source text of a line, empty past the end of the file.
    pub fn line(&self, line: u32) -> &'a str {
        self.ast.lines.get(line as usize).map_or("", String::as_str)
    }

    pub fn leading_whitespace(&self, line: u32) -> &'a str {
        leading_whitespace(self.line(line))
    }

    /// Expected indentation level of every line, computed on first use.
    pub fn indent_levels(&self) -> &[u32] {
        self.levels.get_or_init(|| infer_levels(self.ast))
    }

    pub fn indent_level(&self, line: u32) -> u32 {
        self.indent_levels().get(line as usize).copied().unwrap_or(0)
    }
}
