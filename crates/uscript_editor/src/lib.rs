//! uscript_editor: Apply line/column edits to source text.
//!
//! Edits address a line and a byte column, so they stay valid as long as
//! the edits on one line are applied right to left. Edits on different
//! lines never affect each other; line terminators are preserved as they
//! were.

use memchr::memchr_iter;
use tracing::trace;
use uscript_lint::LintResult;

/// Replace `length` bytes at (`line`, `column`) with `replacement`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Edit {
    pub line: u32,
    pub column: u32,
    pub length: u32,
    pub replacement: String,
}

impl Edit {
    pub fn new(line: u32, column: u32, length: u32, replacement: impl Into<String>) -> Self {
        Self {
            line,
            column,
            length,
            replacement: replacement.into(),
        }
    }

    /// Insert text without removing anything.
    pub fn insert(line: u32, column: u32, text: impl Into<String>) -> Self {
        Self::new(line, column, 0, text)
    }

    /// The autofix of a lint problem, if it has one.
    pub fn from_lint(result: &LintResult) -> Option<Self> {
        let replacement = result.fixed_text.as_ref()?;
        Some(Self::new(result.line, result.column, result.length, replacement.clone()))
    }

    #[inline]
    fn end(&self) -> u32 {
        self.column + self.length
    }
}

/// Collect the autofixes of a batch of lint problems.
pub fn fixes(results: &[LintResult]) -> Vec<Edit> {
    results.iter().filter_map(Edit::from_lint).collect()
}

/// Outcome of [`apply_edits_counted`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied {
    pub text: String,
    pub applied: usize,
    /// Edits dropped because they overlapped another edit or fell outside
    /// the text.
    pub skipped: usize,
}

/// Apply edits to `original` and return the new text.
pub fn apply_edits(original: &str, edits: &[Edit]) -> String {
    apply_edits_counted(original, edits).text
}

/// Apply edits and report how many were used.
///
/// On each line edits are applied from the rightmost column leftwards. An
/// edit that overlaps one already applied on its line is skipped, as is an
/// edit whose range does not fall on the line's character boundaries.
pub fn apply_edits_counted(original: &str, edits: &[Edit]) -> Applied {
    let mut order: Vec<&Edit> = edits.iter().collect();
    // Right to left; for equal starts the longer edit goes first.
    order.sort_by(|a, b| {
        a.line
            .cmp(&b.line)
            .then(b.column.cmp(&a.column))
            .then(b.length.cmp(&a.length))
    });

    let mut text = String::with_capacity(original.len());
    let mut applied = 0;
    let mut skipped = 0;
    let mut pending = order.as_slice();

    for (index, (content, terminator)) in split_lines_keep_ends(original).enumerate() {
        let line = index as u32;
        let count = pending.iter().take_while(|edit| edit.line == line).count();
        let (on_line, rest) = pending.split_at(count);
        pending = rest;

        let mut result = content.to_string();
        let mut limit = u32::MAX;
        for edit in on_line {
            let in_range = edit.end() <= limit
                && result.is_char_boundary(edit.column as usize)
                && result.is_char_boundary(edit.end() as usize)
                && edit.end() as usize <= content.len();
            if !in_range {
                trace!(line, column = edit.column, "skipping edit");
                skipped += 1;
                continue;
            }
            result.replace_range(edit.column as usize..edit.end() as usize, &edit.replacement);
            limit = edit.column;
            applied += 1;
        }
        text.push_str(&result);
        text.push_str(terminator);
    }
    // Edits past the last line.
    skipped += pending.len();

    Applied { text, applied, skipped }
}

/// Lines with their terminator (`"\n"`, `"\r\n"` or `""` for the last one).
fn split_lines_keep_ends(text: &str) -> impl Iterator<Item = (&str, &str)> {
    let mut start = 0;
    let mut breaks = memchr_iter(b'\n', text.as_bytes());
    let mut done = false;
    std::iter::from_fn(move || {
        if done {
            return None;
        }
        match breaks.next() {
            Some(newline) => {
                let line = &text[start..newline];
                let (content, terminator) = match line.strip_suffix('\r') {
                    Some(content) => (content, &text[newline - 1..=newline]),
                    None => (line, &text[newline..=newline]),
                };
                start = newline + 1;
                Some((content, terminator))
            }
            None => {
                done = true;
                // No empty trailing line after a final terminator.
                if start == text.len() && start > 0 {
                    None
                } else {
                    Some((&text[start..], ""))
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_line_terminators() {
        let lines: Vec<_> = split_lines_keep_ends("a\r\nb\nc").collect();
        assert_eq!(lines, vec![("a", "\r\n"), ("b", "\n"), ("c", "")]);

        let lines: Vec<_> = split_lines_keep_ends("a\n").collect();
        assert_eq!(lines, vec![("a", "\n")]);

        let lines: Vec<_> = split_lines_keep_ends("").collect();
        assert_eq!(lines, vec![("", "")]);
    }
}
