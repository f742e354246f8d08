//! One-call pipeline from a filter request to a backend condition.

use crate::condition::ConditionBuilder;
use crate::context::ResolutionContext;
use crate::error::FilterResult;
use crate::expr::ExpressionParser;
use crate::request::FilterRequest;

/// Turns [`FilterRequest`]s into conditions for one backend.
///
/// Resolution parses the request's combination expression, builds a
/// [`ResolutionContext`] from its filters, and generates the root condition.
/// A syntax error is reported before any filter is built.
///
/// # Example
///
/// ```
/// use filterql_core::{
///     Condition, FilterDefinition, FilterRequest, FilterResolver, FilterResult, Operator,
///     PropertyRef, PropertyType,
/// };
/// use serde_json::{json, Value};
///
/// #[derive(Debug, Clone)]
/// struct Sql(String);
///
/// impl Condition for Sql {
///     fn kind(&self) -> &'static str { "sql" }
///     fn and(&self, o: &Self) -> FilterResult<Self> { Ok(Sql(format!("({} AND {})", self.0, o.0))) }
///     fn or(&self, o: &Self) -> FilterResult<Self> { Ok(Sql(format!("({} OR {})", self.0, o.0))) }
///     fn not(&self) -> Self { Sql(format!("NOT {}", self.0)) }
/// }
///
/// let resolver = FilterResolver::new(
///     |p: &PropertyRef, op: Operator, v: &Value| -> FilterResult<Sql> {
///         Ok(Sql(format!("{} {} {}", p.name(), op, v)))
///     },
/// );
///
/// let age = PropertyRef::with_default_operators("age", PropertyType::Integer);
/// let request = FilterRequest::new(
///     [("adult", FilterDefinition::new(age, Operator::GreaterThanOrEqual, json!(18)))],
///     "!adult",
/// );
///
/// let condition = resolver.resolve(&request).unwrap();
/// assert_eq!(condition.0, "NOT age >= 18");
/// ```
#[derive(Debug, Clone)]
pub struct FilterResolver<B> {
    builder: B,
}

impl<B: ConditionBuilder> FilterResolver<B> {
    /// Creates a resolver around a backend's condition builder.
    pub fn new(builder: B) -> Self {
        Self { builder }
    }

    pub fn builder(&self) -> &B {
        &self.builder
    }

    /// Resolves `request` into a single root condition.
    pub fn resolve(&self, request: &FilterRequest) -> FilterResult<B::Condition> {
        let expression = ExpressionParser::parse(request.combine_with())?;
        let context = ResolutionContext::build(request, &self.builder)?;
        let condition = expression.generate(&context)?;

        tracing::debug!(
            filters = context.len(),
            expression = %expression,
            "Resolved filter request"
        );
        Ok(condition)
    }
}
