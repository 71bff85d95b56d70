//! Keyword lookup and token predicates shared by the parser states.

use uscript_ast::{Token, TokenKind};

/// Words with grammar meaning. Matching is case-insensitive; anything not
/// listed here is an ordinary identifier to the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Keyword {
    Class,
    Interface,
    Extends,
    Expands,
    Within,
    Config,
    Var,
    Local,
    Const,
    Enum,
    Struct,
    Function,
    Event,
    Operator,
    PreOperator,
    PostOperator,
    Delegate,
    State,
    Auto,
    Ignores,
    Replication,
    Reliable,
    Unreliable,
    DefaultProperties,
    StructDefaultProperties,
    CppText,
    StructCppText,
    CppStruct,
    If,
    Else,
    For,
    ForEach,
    While,
    Do,
    Until,
    Switch,
    Case,
    Default,
    Return,
    Break,
    Continue,
    Goto,
    Stop,
    Assert,
    New,
    SelfRef,
    Super,
    Static,
    None,
    True,
    False,
    Begin,
    End,
    Object,
    Array,
}

impl Keyword {
    pub(crate) fn from_text(text: &str) -> Option<Self> {
        let keyword = match text.to_ascii_lowercase().as_str() {
            "class" => Self::Class,
            "interface" => Self::Interface,
            "extends" => Self::Extends,
            "expands" => Self::Expands,
            "within" => Self::Within,
            "config" => Self::Config,
            "var" => Self::Var,
            "local" => Self::Local,
            "const" => Self::Const,
            "enum" => Self::Enum,
            "struct" => Self::Struct,
            "function" => Self::Function,
            "event" => Self::Event,
            "operator" => Self::Operator,
            "preoperator" => Self::PreOperator,
            "postoperator" => Self::PostOperator,
            "delegate" => Self::Delegate,
            "state" => Self::State,
            "auto" => Self::Auto,
            "ignores" => Self::Ignores,
            "replication" => Self::Replication,
            "reliable" => Self::Reliable,
            "unreliable" => Self::Unreliable,
            "defaultproperties" => Self::DefaultProperties,
            "structdefaultproperties" => Self::StructDefaultProperties,
            "cpptext" => Self::CppText,
            "structcpptext" => Self::StructCppText,
            "cppstruct" => Self::CppStruct,
            "if" => Self::If,
            "else" => Self::Else,
            "for" => Self::For,
            "foreach" => Self::ForEach,
            "while" => Self::While,
            "do" => Self::Do,
            "until" => Self::Until,
            "switch" => Self::Switch,
            "case" => Self::Case,
            "default" => Self::Default,
            "return" => Self::Return,
            "break" => Self::Break,
            "continue" => Self::Continue,
            "goto" => Self::Goto,
            "stop" => Self::Stop,
            "assert" => Self::Assert,
            "new" => Self::New,
            "self" => Self::SelfRef,
            "super" => Self::Super,
            "static" => Self::Static,
            "none" => Self::None,
            "true" => Self::True,
            "false" => Self::False,
            "begin" => Self::Begin,
            "end" => Self::End,
            "object" => Self::Object,
            "array" => Self::Array,
            _ => return None,
        };
        Some(keyword)
    }

    /// Keywords that introduce a function-like declaration.
    pub(crate) fn is_function_kind(self) -> bool {
        matches!(
            self,
            Self::Function | Self::Event | Self::Operator | Self::PreOperator | Self::PostOperator | Self::Delegate
        )
    }

    /// Keywords that, inside an expression, end a term rather than continue
    /// it. `return x` and `new Foo` are not statement boundaries.
    pub(crate) fn is_term(self) -> bool {
        matches!(
            self,
            Self::SelfRef
                | Self::Super
                | Self::None
                | Self::True
                | Self::False
                | Self::Default
                | Self::Static
                | Self::Class
                | Self::Break
                | Self::Continue
                | Self::Stop
        )
    }

    /// Keywords written inside expressions and statements that the
    /// highlighter shows as keywords.
    pub(crate) fn expression_kind(self) -> Option<TokenKind> {
        match self {
            Self::None | Self::True | Self::False => Some(TokenKind::Literal),
            Self::SelfRef
            | Self::Super
            | Self::Static
            | Self::Default
            | Self::Class
            | Self::New
            | Self::Return
            | Self::Break
            | Self::Continue
            | Self::Goto
            | Self::Stop
            | Self::Assert
            | Self::Array => Some(TokenKind::Keyword),
            _ => None,
        }
    }
}

/// Word-shaped binary operators.
const WORD_OPERATORS: &[&str] = &["dot", "cross", "clockwisefrom"];

pub(crate) fn is_word_operator(token: &Token) -> bool {
    token.is_word() && WORD_OPERATORS.iter().any(|op| token.is(op))
}

/// Whether the resolver treats the token as an operator.
pub(crate) fn is_operator(token: &Token) -> bool {
    token.lexical_kind == TokenKind::Operator || is_word_operator(token)
}

/// Assignment operators split a simple statement into target and value.
pub(crate) fn is_assignment(token: &Token) -> bool {
    matches!(token.text.as_str(), "=" | "+=" | "-=" | "*=" | "/=" | "$=" | "@=")
}

/// A token that can end an expression: a name, a literal, or a closing
/// bracket.
pub(crate) fn is_term(token: &Token) -> bool {
    match token.lexical_kind {
        TokenKind::String | TokenKind::Name | TokenKind::Number => true,
        TokenKind::Identifier => {
            if is_word_operator(token) {
                return false;
            }
            Keyword::from_text(&token.text).map_or(true, Keyword::is_term)
        }
        _ => matches!(token.text.as_str(), ")" | "]"),
    }
}

/// Parse a number literal the way array sizes are written: decimal or `0x`
/// hexadecimal.
pub(crate) fn parse_count(text: &str) -> Option<u32> {
    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16).ok()
    } else {
        text.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(text: &str) -> Token {
        Token::new(text, 0, 0, 0, uscript_scanner::classify(text))
    }

    #[test]
    fn keywords_ignore_case() {
        assert_eq!(Keyword::from_text("DefaultProperties"), Some(Keyword::DefaultProperties));
        assert_eq!(Keyword::from_text("FOREACH"), Some(Keyword::ForEach));
        assert_eq!(Keyword::from_text("Health"), None);
    }

    #[test]
    fn terms() {
        assert!(is_term(&token("Health")));
        assert!(is_term(&token("5")));
        assert!(is_term(&token(")")));
        assert!(is_term(&token("self")));
        assert!(!is_term(&token("return")));
        assert!(!is_term(&token("new")));
        assert!(!is_term(&token("dot")));
        assert!(!is_term(&token("+")));
    }

    #[test]
    fn counts() {
        assert_eq!(parse_count("16"), Some(16));
        assert_eq!(parse_count("0x10"), Some(16));
        assert_eq!(parse_count("MAX"), None);
    }
}
