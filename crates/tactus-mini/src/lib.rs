//! Mini-notation: a terse text syntax for rhythmic patterns.
//!
//! `"a(3,8) [b|c]@2 d!3"` parses into an [`Ast`] and compiles to a
//! [`tactus_core::Pattern`] that can be queried for events. The usual
//! entry point is [`pattern`]; [`parse`] stops at the syntax tree.

pub mod ast;
pub mod compile;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod span;
pub mod value;

pub use ast::Ast;
pub use compile::{compile, pattern};
pub use error::{Error, ParseError};
pub use parser::parse;
pub use span::Span;
pub use value::Value;
