//! The problem record produced by every rule.

use serde::Serialize;
use std::fmt;
use uscript_ast::Token;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Warning => "warning",
            Severity::Error => "error",
        })
    }
}

bitflags::bitflags! {
    /// Extra presentation hints for editors.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct LintTags: u8 {
        const DEPRECATED  = 1 << 0;
        /// Code that can be removed without changing behavior.
        const UNNECESSARY = 1 << 1;
    }
}

impl Serialize for LintTags {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let names: Vec<&str> = self.iter_names().map(|(name, _)| name).collect();
        names.serialize(serializer)
    }
}

/// One reported problem.
///
/// Positions are zero-based; `length` counts bytes on `line`. When
/// `fixed_text` is present, replacing `length` bytes at `column` with it
/// repairs the problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LintResult {
    pub line: u32,
    pub column: u32,
    pub length: u32,
    pub message: String,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_text: Option<String>,
    #[serde(skip_serializing_if = "LintTags::is_empty")]
    pub tags: LintTags,
    /// Id of the rule that produced the problem.
    pub rule: &'static str,
}

impl LintResult {
    pub fn new(rule: &'static str, severity: Severity, line: u32, column: u32, length: u32, message: impl Into<String>) -> Self {
        Self {
            line,
            column,
            length,
            message: message.into(),
            severity,
            fixed_text: None,
            original_text: None,
            tags: LintTags::empty(),
            rule,
        }
    }

    pub fn warning(rule: &'static str, token: &Token, message: impl Into<String>) -> Self {
        Self::new(rule, Severity::Warning, token.line, token.column, token.len(), message)
    }

    pub fn error(rule: &'static str, token: &Token, message: impl Into<String>) -> Self {
        Self::new(rule, Severity::Error, token.line, token.column, token.len(), message)
    }

    /// Attach a replacement for the covered text.
    pub fn with_fix(mut self, original: impl Into<String>, fixed: impl Into<String>) -> Self {
        self.original_text = Some(original.into());
        self.fixed_text = Some(fixed.into());
        self
    }

    pub fn with_tags(mut self, tags: LintTags) -> Self {
        self.tags |= tags;
        self
    }

    #[inline]
    pub fn is_fixable(&self) -> bool {
        self.fixed_text.is_some()
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Sort key for display order.
    #[inline]
    pub fn position(&self) -> (u32, u32) {
        (self.line, self.column)
    }
}

impl fmt::Display for LintResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} {} {} [{}]",
            self.line + 1,
            self.column + 1,
            self.severity,
            self.message,
            self.rule
        )
    }
}
