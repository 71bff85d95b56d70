//! String literals only understand `\"` and `\\`. Any other backslash is
//! dropped by the compiler, so `"\t"` is just `"t"`.

use uscript_ast::*;
use uscript_options::LintOptions;

use crate::context::LintContext;
use crate::result::{LintResult, Severity};
use crate::rules::TokenRule;

pub(crate) struct StringEscapes;

impl TokenRule for StringEscapes {
    fn name(&self) -> &'static str {
        "string-escape"
    }

    fn enabled(&self, options: &LintOptions) -> bool {
        options.string_escapes
    }

    fn check_token(&mut self, _cx: &LintContext<'_>, token: &Token, _previous: Option<&Token>, results: &mut Vec<LintResult>) {
        if token.kind() != TokenKind::String {
            return;
        }
        let text = token.text.as_str();
        let closed = text.len() >= 2 && text.ends_with('"') && !ends_with_escaped_quote(text);
        if !closed {
            results.push(LintResult::error(self.name(), token, "Unterminated string literal."));
        }

        let bytes = text.as_bytes();
        let mut i = 1;
        while i + 1 < bytes.len() {
            if bytes[i] != b'\\' {
                i += 1;
                continue;
            }
            let escaped = bytes[i + 1];
            if escaped != b'"' && escaped != b'\\' {
                let sequence = &text[i..i + 1 + utf8_width(escaped)];
                results.push(LintResult::new(
                    self.name(),
                    Severity::Warning,
                    token.line,
                    token.column + i as u32,
                    sequence.len() as u32,
                    format!("'{sequence}' is not an escape sequence; the backslash is ignored."),
                ));
            }
            i += 2;
        }
    }
}

/// `"abc\"` is an unterminated string whose last quote is escaped.
fn ends_with_escaped_quote(text: &str) -> bool {
    let body = &text.as_bytes()[1..text.len() - 1];
    body.iter().rev().take_while(|&&b| b == b'\\').count() % 2 == 1
}

fn utf8_width(first: u8) -> usize {
    match first {
        0x00..=0x7F => 1,
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        _ => 4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escaped_quote_detection() {
        assert!(!ends_with_escaped_quote(r#""abc""#));
        assert!(ends_with_escaped_quote(r#""abc\""#));
        assert!(!ends_with_escaped_quote(r#""abc\\""#));
        assert!(!ends_with_escaped_quote(r#""""#));
    }
}
