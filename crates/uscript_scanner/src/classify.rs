//! Lexical classification of raw fragments.

use lazy_static::lazy_static;
use regex::Regex;
use uscript_ast::TokenKind;

lazy_static! {
    static ref OPERATOR: Regex =
        Regex::new(r"^[-+*/%<>=!~&|^?:@$#]+$").expect("operator pattern is valid");
}

/// Whether the text is made of operator characters only.
pub fn is_operator_text(text: &str) -> bool {
    OPERATOR.is_match(text)
}

/// Guess a fragment's kind from its text.
///
/// The parser overrides this once it knows what the fragment means, so the
/// guess only has to be cheap and stable.
pub fn classify(text: &str) -> TokenKind {
    let Some(first) = text.bytes().next() else {
        return TokenKind::None;
    };
    match first {
        b'"' => TokenKind::String,
        b'\'' => TokenKind::Name,
        b'0'..=b'9' => TokenKind::Number,
        b'a'..=b'z' | b'A'..=b'Z' | b'_' => TokenKind::Identifier,
        _ if is_operator_text(text) && !text.starts_with("//") && text != "/*" && text != "*/" => {
            TokenKind::Operator
        }
        _ => TokenKind::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_by_leading_character() {
        assert_eq!(classify("\"hi\""), TokenKind::String);
        assert_eq!(classify("'None'"), TokenKind::Name);
        assert_eq!(classify("0x1F"), TokenKind::Number);
        assert_eq!(classify("_bFlag"), TokenKind::Identifier);
        assert_eq!(classify("+="), TokenKind::Operator);
        assert_eq!(classify(";"), TokenKind::None);
        assert_eq!(classify("{"), TokenKind::None);
        assert_eq!(classify(""), TokenKind::None);
    }

    #[test]
    fn comment_delimiters_are_not_operators() {
        assert_eq!(classify("/*"), TokenKind::None);
        assert_eq!(classify("*/"), TokenKind::None);
        assert_eq!(classify("// note"), TokenKind::None);
        assert_eq!(classify("/"), TokenKind::Operator);
    }
}
