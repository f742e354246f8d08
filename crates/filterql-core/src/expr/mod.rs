//! The combination expression language.
//!
//! Expressions combine filter keys with boolean operators:
//!
//! - `&` - AND
//! - `|` - OR
//! - `!` - NOT (prefix)
//! - `()` - Grouping
//!
//! Identifiers are runs of ASCII letters, digits and `_`. NOT binds tighter
//! than AND, which binds tighter than OR.
//!
//! # Example
//!
//! ```
//! use filterql_core::expr::{tokenize, ExpressionParser, TokenKind};
//!
//! let tokens = tokenize("name & (age | status)").unwrap();
//! assert_eq!(tokens.len(), 7);
//! assert_eq!(tokens[0].kind, TokenKind::Identifier);
//!
//! let expr = ExpressionParser::parse("name & (age | status)").unwrap();
//! assert_eq!(expr.identifiers(), vec!["name", "age", "status"]);
//! ```

mod ast;
mod lexer;
mod parser;

pub use ast::Expression;
pub use lexer::{tokenize, Lexer, Token, TokenKind};
pub use parser::ExpressionParser;

#[cfg(test)]
mod tests;
