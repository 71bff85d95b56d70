//! uscript_scanner: Line tokenizer for the scripting language.
//!
//! Source is scanned one line at a time with a single compiled pattern; no
//! state crosses line boundaries. Each fragment gets a lexical kind guessed
//! from its text alone, which the parser may later override.
//!
//! - [`tokenize_line`] splits one line into `(text, column)` fragments.
//! - [`classify`] guesses the lexical kind of a fragment.
//! - [`Scanner`] numbers tokens across a whole file.

mod classify;
mod scanner;

pub use classify::{classify, is_operator_text};
pub use scanner::{tokenize_line, RawToken, Scanner};
