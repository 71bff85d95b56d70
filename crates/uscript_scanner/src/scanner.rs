//! The line tokenizer.

use crate::classify::classify;
use lazy_static::lazy_static;
use regex::Regex;
use uscript_ast::Token;

/// Alternatives in priority order. Multi-character operators come before
/// single characters so the longest form wins, and the trailing `\S` keeps
/// the scan lossless for stray characters.
const ALTERNATIVES: &[&str] = &[
    r"[A-Za-z_][A-Za-z0-9_]*",
    r"//.*",
    r"/\*",
    r"\*/",
    r"[0-9][0-9a-fA-FxX.]*",
    r#""(?:[^"\\]|\\.)*"?"#,
    r"'[^']*'",
    r"!=|==|&&|\^\^|\|\||\*=|/=|\+=|-=|\+\+|--|~=|<=|>=|<<|>>|\$=|@=",
    r"[-+*/%<>=!~&|^?:@$#]",
    r"[.;(),{}\[\]]",
    r"\S",
];

lazy_static! {
    static ref TOKEN: Regex = Regex::new(&ALTERNATIVES.join("|")).expect("token pattern is valid");
}

/// One fragment of a line: its text and byte column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawToken<'a> {
    pub text: &'a str,
    pub column: u32,
}

/// Split a single line into fragments. Whitespace separates fragments and is
/// never part of one; a blank line yields nothing.
pub fn tokenize_line(line: &str) -> Vec<RawToken<'_>> {
    TOKEN
        .find_iter(line)
        .map(|m| RawToken {
            text: m.as_str(),
            column: m.start() as u32,
        })
        .collect()
}

/// Numbers tokens across the lines of one file.
#[derive(Debug, Default)]
pub struct Scanner {
    line: u32,
    next_index: usize,
}

impl Scanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// The zero-based number of the next line to be scanned.
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Tokenize the next line, assigning stream indices that continue from
    /// the previous line.
    pub fn scan_line(&mut self, line: &str) -> Vec<Token> {
        let tokens: Vec<Token> = tokenize_line(line)
            .into_iter()
            .enumerate()
            .map(|(i, raw)| {
                Token::new(raw.text, self.line, raw.column, self.next_index + i, classify(raw.text))
            })
            .collect();
        self.next_index += tokens.len();
        self.line += 1;
        tokens
    }

    /// Tokenize every line of a source text.
    pub fn scan_source(text: &str) -> Vec<Token> {
        let mut scanner = Scanner::new();
        uscript_core::text::split_lines(text)
            .into_iter()
            .flat_map(|line| scanner.scan_line(line))
            .collect()
    }
}
