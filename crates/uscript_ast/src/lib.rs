//! uscript_ast: Token model and abstract syntax tree for the scripting language.
//!
//! One [`ClassUnit`] is produced per source file. It owns the full token
//! stream, the original source lines, every declaration node, and the parse
//! errors. Nodes refer to tokens by [`TokenId`] and record first/last token
//! spans so that downstream consumers range-query by span.

pub mod node;
pub mod syntax_kind;
pub mod token;
pub mod types;
pub mod visitor;

// Re-export key types
pub use node::*;
pub use syntax_kind::TokenKind;
pub use token::{Token, TokenId};
pub use types::*;
