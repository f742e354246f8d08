//! Boolean combinations of named filters, compiled into backend conditions.
//!
//! Callers describe a query as a set of named filter definitions
//! (`property`, `operator`, `value`) plus a combination expression such as
//! `"nameFilter & (ageFilter | !statusFilter)"`. This crate:
//!
//! - parses the expression into an [`Expression`] tree ([`ExpressionParser`]),
//! - validates each definition against its [`PropertyRef`] and asks a
//!   backend-supplied [`ConditionBuilder`] for a [`Condition`] per key,
//!   collected into a [`ResolutionContext`],
//! - walks the tree, combining the conditions with `and`, `or` and `not`.
//!
//! [`FilterResolver`] runs all three steps at once.
//!
//! # Example
//!
//! ```
//! use filterql_core::{parse, Expression};
//!
//! let expr = parse("nameFilter & (ageFilter | statusFilter)").unwrap();
//! assert!(matches!(expr, Expression::And(_, _)));
//! assert_eq!(expr.identifiers(), vec!["nameFilter", "ageFilter", "statusFilter"]);
//! ```

pub mod condition;
pub mod context;
pub mod error;
pub mod expr;
pub mod operator;
pub mod property;
pub mod registry;
pub mod request;
pub mod resolver;
mod suggest;

pub use condition::{ensure_compatible, Condition, ConditionBuilder};
pub use context::ResolutionContext;
pub use error::{FilterError, FilterResult};
pub use expr::{Expression, ExpressionParser};
pub use operator::{Cardinality, Operator};
pub use property::{PropertyRef, PropertyType};
pub use registry::PropertyRegistry;
pub use request::{FilterDefinition, FilterRequest, RawFilterDefinition, RawFilterRequest};
pub use resolver::FilterResolver;

/// Parses a combination expression. Shorthand for [`ExpressionParser::parse`].
pub fn parse(expression: &str) -> FilterResult<Expression> {
    ExpressionParser::parse(expression)
}
