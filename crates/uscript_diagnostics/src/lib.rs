//! uscript_diagnostics: Diagnostic messages and error reporting infrastructure.
//!
//! Parse problems are recorded as data on the AST, never raised. Each one is
//! a [`Diagnostic`] realized from a [`DiagnosticMessage`] template in the
//! [`messages`] catalogue.

use uscript_core::text::LineSpan;
use std::fmt;

/// Diagnostic severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DiagnosticCategory {
    Warning,
    Error,
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticCategory::Warning => write!(f, "warning"),
            DiagnosticCategory::Error => write!(f, "error"),
        }
    }
}

/// A diagnostic message template with a code and category.
#[derive(Debug, Clone)]
pub struct DiagnosticMessage {
    /// The diagnostic code (e.g., 1002).
    pub code: u32,
    /// The category of this diagnostic.
    pub category: DiagnosticCategory,
    /// The message template string. May contain `{0}`, `{1}`, etc. placeholders.
    pub message: &'static str,
}

/// A realized diagnostic with location information and resolved message text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Where the offending text sits.
    pub span: LineSpan,
    /// Index of the offending token in the file's token stream, if any.
    pub token: Option<usize>,
    /// The formatted message.
    pub message_text: String,
    /// The diagnostic code.
    pub code: u32,
    /// The category.
    pub category: DiagnosticCategory,
}

/// A problem found while parsing, recorded on the tree instead of raised.
pub type ParseError = Diagnostic;

impl Diagnostic {
    /// Create a diagnostic anchored at a span.
    pub fn new(span: LineSpan, message: &DiagnosticMessage, args: &[&str]) -> Self {
        Self {
            span,
            token: None,
            message_text: format_message(message.message, args),
            code: message.code,
            category: message.category,
        }
    }

    /// Attach the index of the token that triggered this diagnostic.
    pub fn with_token(mut self, index: usize) -> Self {
        self.token = Some(index);
        self
    }

    /// Whether this is an error diagnostic.
    pub fn is_error(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}) {} US{}: {}",
            self.span.start, self.category, self.code, self.message_text
        )
    }
}

/// Substitute `{0}`, `{1}`, ... in `template` with `args`.
pub fn format_message(template: &str, args: &[&str]) -> String {
    args.iter()
        .enumerate()
        .fold(template.to_string(), |text, (i, arg)| text.replace(&format!("{{{i}}}"), arg))
}

/// Problems recorded on one tree, in the order the parser met them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagnosticCollection {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.iter().any(Diagnostic::is_error)
    }

    /// Diagnostics whose span starts on `line`.
    pub fn on_line(&self, line: u32) -> impl Iterator<Item = &Diagnostic> {
        self.iter().filter(move |d| d.span.start.line == line)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }
}

impl<'a> IntoIterator for &'a DiagnosticCollection {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.iter()
    }
}

// ============================================================================
// Diagnostic Messages
// ============================================================================

pub mod messages {
    use super::*;

    macro_rules! diag {
        ($code:expr, Error, $msg:expr) => {
            DiagnosticMessage { code: $code, category: DiagnosticCategory::Error, message: $msg }
        };
        ($code:expr, Warning, $msg:expr) => {
            DiagnosticMessage { code: $code, category: DiagnosticCategory::Warning, message: $msg }
        };
    }

    // ========================================================================
    // Lexical errors (1000-1099)
    // ========================================================================
    pub const UNTERMINATED_COMMENT: DiagnosticMessage = diag!(1001, Error, "Unterminated block comment.");
    pub const UNTERMINATED_STRING_LITERAL: DiagnosticMessage = diag!(1002, Error, "Unterminated string literal.");
    pub const INVALID_CHARACTER: DiagnosticMessage = diag!(1003, Error, "Invalid character '{0}'.");

    // ========================================================================
    // Class header (1100-1199)
    // ========================================================================
    pub const CLASS_DECLARATION_EXPECTED: DiagnosticMessage = diag!(1100, Error, "Expected 'class' declaration, found '{0}'.");
    pub const CLASS_NAME_EXPECTED: DiagnosticMessage = diag!(1101, Error, "Class name expected, found '{0}'.");
    pub const PARENT_CLASS_EXPECTED: DiagnosticMessage = diag!(1102, Error, "Parent class name expected after '{0}', found '{1}'.");
    pub const UNTERMINATED_CLASS_DECLARATION: DiagnosticMessage = diag!(1103, Error, "Class declaration is missing a terminating ';'.");
    pub const DUPLICATE_CLASS_DECLARATION: DiagnosticMessage = diag!(1104, Error, "Only one class may be declared per file.");

    // ========================================================================
    // Declarations (1200-1299)
    // ========================================================================
    pub const DECLARATION_EXPECTED: DiagnosticMessage = diag!(1200, Error, "Declaration expected, found '{0}'.");
    pub const IDENTIFIER_EXPECTED: DiagnosticMessage = diag!(1201, Error, "Identifier expected, found '{0}'.");
    pub const TYPE_EXPECTED: DiagnosticMessage = diag!(1202, Error, "Type expected, found '{0}'.");
    pub const _0_EXPECTED: DiagnosticMessage = diag!(1203, Error, "'{0}' expected.");
    pub const _0_EXPECTED_FOUND_1: DiagnosticMessage = diag!(1204, Error, "'{0}' expected, found '{1}'.");
    pub const UNEXPECTED_TOKEN: DiagnosticMessage = diag!(1205, Error, "Unexpected token '{0}'.");
    pub const ENUM_MEMBER_EXPECTED: DiagnosticMessage = diag!(1206, Error, "Enum member expected, found '{0}'.");
    pub const PARAMETER_EXPECTED: DiagnosticMessage = diag!(1207, Error, "Parameter declaration expected.");
    pub const FUNCTION_NAME_EXPECTED: DiagnosticMessage = diag!(1208, Error, "Function name expected before '('.");
    pub const STATE_NAME_EXPECTED: DiagnosticMessage = diag!(1209, Error, "State name expected, found '{0}'.");
    pub const REPLICATION_CONDITION_EXPECTED: DiagnosticMessage = diag!(1210, Error, "Replication statement must start with 'if', found '{0}'.");
    pub const DEFAULT_PROPERTY_EXPECTED: DiagnosticMessage = diag!(1211, Error, "Property name expected, found '{0}'.");
    pub const LOCAL_OUTSIDE_FUNCTION: DiagnosticMessage = diag!(1212, Error, "'local' declarations are only allowed inside function bodies.");

    // ========================================================================
    // Statements and expressions (1300-1399)
    // ========================================================================
    pub const STATEMENT_EXPECTED: DiagnosticMessage = diag!(1300, Error, "Statement expected, found '{0}'.");
    pub const EXPRESSION_EXPECTED: DiagnosticMessage = diag!(1301, Error, "Expression expected after '{0}'.");
    pub const ELSE_WITHOUT_IF: DiagnosticMessage = diag!(1302, Error, "'else' without a matching 'if'.");
    pub const UNTIL_EXPECTED: DiagnosticMessage = diag!(1303, Error, "'until' expected after 'do' block, found '{0}'.");
    pub const UNMATCHED_CLOSING_TOKEN: DiagnosticMessage = diag!(1304, Error, "Unmatched '{0}'.");
    pub const CASE_OUTSIDE_SWITCH: DiagnosticMessage = diag!(1305, Error, "'{0}' label outside of a 'switch' body.");
    pub const SWITCH_BODY_EXPECTED: DiagnosticMessage = diag!(1306, Error, "'switch' requires a '{' body, found '{0}'.");

    // ========================================================================
    // End of file (1400-1499)
    // ========================================================================
    pub const UNTERMINATED_CONSTRUCT: DiagnosticMessage = diag!(1400, Error, "Unexpected end of file inside {0}.");
}

#[cfg(test)]
mod tests {
    use super::*;
    use uscript_core::text::Position;

    #[test]
    fn format_message_substitutes_placeholders() {
        assert_eq!(format_message("'{0}' expected, found '{1}'.", &[";", "}"]), "';' expected, found '}'.");
    }

    #[test]
    fn collection_queries_by_line() {
        let mut collection = DiagnosticCollection::new();
        collection.add(Diagnostic::new(LineSpan::on_line(4, 0, 1), &messages::UNEXPECTED_TOKEN, &["b"]));
        collection.add(Diagnostic::new(LineSpan::on_line(1, 2, 1), &messages::UNEXPECTED_TOKEN, &["a"]));
        let on_first: Vec<_> = collection.on_line(1).collect();
        assert_eq!(on_first.len(), 1);
        assert_eq!(on_first[0].span.start, Position::new(1, 2));
        assert_eq!(on_first[0].message_text, "Unexpected token 'a'.");
        assert!(collection.has_errors());
    }
}
