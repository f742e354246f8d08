//! Abstract Syntax Tree (AST) for combination expressions.

use std::fmt;

use crate::condition::Condition;
use crate::context::ResolutionContext;
use crate::error::FilterResult;

/// A compiled combination expression.
///
/// Leaves name filter keys; inner nodes combine them. Trees are immutable
/// and can be shared and re-generated against any number of contexts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expression {
    /// A reference to a filter key.
    Identifier(String),

    /// Logical NOT of an expression.
    Not(Box<Expression>),

    /// Logical AND of two expressions.
    And(Box<Expression>, Box<Expression>),

    /// Logical OR of two expressions.
    Or(Box<Expression>, Box<Expression>),
}

impl Expression {
    /// Creates an identifier leaf.
    pub fn identifier(name: impl Into<String>) -> Self {
        Expression::Identifier(name.into())
    }

    /// Creates an AND node from two expressions.
    ///
    /// # Example
    ///
    /// ```
    /// use filterql_core::Expression;
    ///
    /// let expr = Expression::and(Expression::identifier("a"), Expression::identifier("b"));
    /// assert!(matches!(expr, Expression::And(_, _)));
    /// ```
    pub fn and(left: Expression, right: Expression) -> Self {
        Expression::And(Box::new(left), Box::new(right))
    }

    /// Creates an OR node from two expressions.
    pub fn or(left: Expression, right: Expression) -> Self {
        Expression::Or(Box::new(left), Box::new(right))
    }

    /// Creates a NOT node.
    pub fn negate(inner: Expression) -> Self {
        Expression::Not(Box::new(inner))
    }

    /// Resolves every leaf in `context` and combines the results.
    ///
    /// A post-order walk: `Not` calls [`Condition::not`], `And` and `Or` call
    /// [`Condition::and`] and [`Condition::or`] with the left operand as the
    /// receiver. Leaf conditions are returned as stored in the context.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::UnknownFilterKey` for a leaf missing from the
    /// context, and propagates any error from the backend's combinators.
    pub fn generate<C: Condition>(&self, context: &ResolutionContext<C>) -> FilterResult<C> {
        match self {
            Expression::Identifier(name) => context.resolve(name).cloned(),
            Expression::Not(inner) => Ok(inner.generate(context)?.not()),
            Expression::And(left, right) => {
                let left = left.generate(context)?;
                let right = right.generate(context)?;
                left.and(&right)
            }
            Expression::Or(left, right) => {
                let left = left.generate(context)?;
                let right = right.generate(context)?;
                left.or(&right)
            }
        }
    }

    /// Filter keys referenced by this expression, in first-appearance order.
    pub fn identifiers(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_identifiers(&mut names);
        names
    }

    fn collect_identifiers<'a>(&'a self, names: &mut Vec<&'a str>) {
        match self {
            Expression::Identifier(name) => {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
            Expression::Not(inner) => inner.collect_identifiers(names),
            Expression::And(left, right) | Expression::Or(left, right) => {
                left.collect_identifiers(names);
                right.collect_identifiers(names);
            }
        }
    }

    /// Number of nodes in the tree.
    pub fn node_count(&self) -> usize {
        match self {
            Expression::Identifier(_) => 1,
            Expression::Not(inner) => 1 + inner.node_count(),
            Expression::And(left, right) | Expression::Or(left, right) => {
                1 + left.node_count() + right.node_count()
            }
        }
    }
}

/// Renders the canonical, fully parenthesised form: `((!a & b) | c)`.
impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Identifier(name) => f.write_str(name),
            Expression::Not(inner) => write!(f, "!{inner}"),
            Expression::And(left, right) => write!(f, "({left} & {right})"),
            Expression::Or(left, right) => write!(f, "({left} | {right})"),
        }
    }
}
