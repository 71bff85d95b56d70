//! Keywords and modifiers are written in lower case, except the
//! `Begin Object` / `End Object` markers. `expands` is the old spelling of
//! `extends`.

use uscript_ast::*;
use uscript_options::LintOptions;

use crate::context::LintContext;
use crate::result::{LintResult, LintTags};
use crate::rules::TokenRule;

/// Reserved words checked when the parser marked them as keywords.
const KEYWORDS: &[&str] = &[
    "assert", "auto", "break", "case", "class", "const", "continue", "cpptext", "default",
    "defaultproperties", "delegate", "do", "else", "enum", "event", "expands", "extends", "for",
    "foreach", "function", "goto", "if", "ignores", "interface", "local", "new", "operator",
    "postoperator", "preoperator", "reliable", "replication", "return", "self", "state", "static",
    "stop", "struct", "structcpptext", "structdefaultproperties", "super", "switch", "unreliable",
    "until", "var", "while", "array", "cppstruct",
];

const CAPITALIZED: &[&str] = &["Begin", "End", "Object"];

pub(crate) struct KeywordCasing;

impl KeywordCasing {
    /// The expected spelling of a keyword or modifier, if the rule knows it.
    fn canonical(token: &Token) -> Option<String> {
        if let Some(word) = CAPITALIZED.iter().find(|w| token.is(w)) {
            return Some((*word).to_string());
        }
        let lower = token.text.to_ascii_lowercase();
        let known = KEYWORDS.contains(&lower.as_str())
            || ClassFlags::from_keyword(&lower).is_some()
            || VarFlags::from_keyword(&lower).is_some()
            || FunctionFlags::from_keyword(&lower).is_some()
            || FunctionFlags::kind_from_keyword(&lower).is_some()
            || StateFlags::from_keyword(&lower).is_some()
            || StructFlags::from_keyword(&lower).is_some();
        known.then_some(lower)
    }
}

impl TokenRule for KeywordCasing {
    fn name(&self) -> &'static str {
        "keyword-casing"
    }

    fn enabled(&self, options: &LintOptions) -> bool {
        options.keyword_casing
    }

    fn check_token(&mut self, _cx: &LintContext<'_>, token: &Token, _previous: Option<&Token>, results: &mut Vec<LintResult>) {
        if !matches!(token.kind(), TokenKind::Keyword | TokenKind::Modifier) {
            return;
        }
        if token.is("expands") {
            results.push(
                LintResult::warning(self.name(), token, "'expands' is deprecated, use 'extends'.")
                    .with_fix(token.text.clone(), "extends")
                    .with_tags(LintTags::DEPRECATED),
            );
            return;
        }
        let Some(expected) = Self::canonical(token) else {
            return;
        };
        if token.text != expected {
            results.push(
                LintResult::warning(self.name(), token, format!("Write '{}' as '{expected}'.", token.text))
                    .with_fix(token.text.clone(), expected),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_spellings() {
        let word = |text: &str| Token::new(text, 0, 0, 0, TokenKind::Identifier);
        assert_eq!(KeywordCasing::canonical(&word("Function")).as_deref(), Some("function"));
        assert_eq!(KeywordCasing::canonical(&word("SIMULATED")).as_deref(), Some("simulated"));
        assert_eq!(KeywordCasing::canonical(&word("begin")).as_deref(), Some("Begin"));
        assert_eq!(KeywordCasing::canonical(&word("MyEngineModifier")), None);
    }
}
