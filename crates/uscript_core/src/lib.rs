//! uscript_core: Core utilities for the uscript toolchain.
//!
//! Provides source positions, line spans, and the line-splitting helpers
//! shared by the scanner, parser, linter, and editor.

pub mod text;

// Re-export commonly used types
pub use text::{LineSpan, Position};
