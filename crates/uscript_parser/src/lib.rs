//! uscript_parser: Error-recovering parser for class source files.
//!
//! Lines are fed one at a time into a state machine that never gives up:
//! every problem becomes a diagnostic on the resulting [`ClassUnit`] and
//! parsing resumes at the next point that makes sense. Expressions are
//! resolved by shape rather than by precedence, see [`resolve`].

mod class_header;
mod declarations;
mod defaults;
mod expressions;
mod functions;
mod parser;
mod replication;
mod resolve;
mod statements;
mod utilities;

pub use expressions::{build_statement, resolve};
pub use parser::Parser;

use uscript_ast::ClassUnit;
use uscript_core::text::split_lines;

/// Parse a file given as lines (without line terminators).
pub fn parse<S: AsRef<str>>(lines: &[S]) -> ClassUnit {
    let mut parser = Parser::new();
    for line in lines {
        parser.push_line(line.as_ref());
    }
    parser.finish()
}

/// Parse a whole file's text.
pub fn parse_source(text: &str) -> ClassUnit {
    parse(&split_lines(text))
}
