//! The backend-facing condition algebra.
//!
//! A [`Condition`] is an opaque boolean predicate owned by a backend: a SQL
//! fragment, an in-memory closure, a search query. The core never looks
//! inside one; it only combines them with [`and`](Condition::and),
//! [`or`](Condition::or) and [`not`](Condition::not).
//!
//! Backends plug in through [`ConditionBuilder`], which turns one validated
//! `(property, operator, value)` triple into a condition.

use serde_json::Value;

use crate::error::{FilterError, FilterResult};
use crate::operator::Operator;
use crate::property::PropertyRef;

/// A backend-native boolean predicate.
///
/// Combinators never mutate `self`; each returns a new condition. Every
/// condition carries a [`kind`](Condition::kind) tag naming the backend (and
/// variant, e.g. a SQL dialect) that produced it. `and` and `or` must fail
/// with `IncompatibleConditionKind` when the tags differ; use
/// [`ensure_compatible`] for that check.
pub trait Condition: Clone {
    /// Tag identifying the backend variant that produced this condition.
    fn kind(&self) -> &'static str;

    /// Returns a condition matching when both match.
    fn and(&self, other: &Self) -> FilterResult<Self>;

    /// Returns a condition matching when either matches.
    fn or(&self, other: &Self) -> FilterResult<Self>;

    /// Returns a condition matching when `self` does not.
    fn not(&self) -> Self;
}

/// Fails with `IncompatibleConditionKind` unless both conditions share a kind.
pub fn ensure_compatible<C: Condition>(left: &C, right: &C) -> FilterResult<()> {
    if left.kind() == right.kind() {
        Ok(())
    } else {
        Err(FilterError::IncompatibleConditionKind {
            left: left.kind(),
            right: right.kind(),
        })
    }
}

/// Materializes conditions for validated filter definitions.
///
/// Implemented by backends. Any `Fn(&PropertyRef, Operator, &Value) ->
/// FilterResult<C>` closure is a builder.
pub trait ConditionBuilder {
    type Condition: Condition;

    /// Builds a condition. Called after `operator` and `value` were validated
    /// against `property`.
    fn build(
        &self,
        property: &PropertyRef,
        operator: Operator,
        value: &Value,
    ) -> FilterResult<Self::Condition>;
}

impl<F, C> ConditionBuilder for F
where
    F: Fn(&PropertyRef, Operator, &Value) -> FilterResult<C>,
    C: Condition,
{
    type Condition = C;

    fn build(&self, property: &PropertyRef, operator: Operator, value: &Value) -> FilterResult<C> {
        self(property, operator, value)
    }
}
