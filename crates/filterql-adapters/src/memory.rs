//! In-memory backend: predicates over JSON records.
//!
//! Each record is a JSON object; a property named `age` reads the record's
//! top-level `age` field. Missing fields and `null` behave like SQL `NULL`:
//! every comparison against them is false and only `IS NULL` matches.
//! Negation is plain boolean negation, so `!(age > 18)` matches records
//! without an age.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use filterql_core::property::json_kind;
use filterql_core::{
    ensure_compatible, Condition, ConditionBuilder, FilterError, FilterResult, Operator,
    PropertyRef, PropertyType,
};
use serde_json::Value;

use crate::operand::bounds;

/// Backend tag for in-memory conditions.
pub const MEMORY_KIND: &str = "memory";

type Predicate = dyn Fn(&Value) -> bool + Send + Sync;

/// A predicate over JSON records.
#[derive(Clone)]
pub struct MemoryCondition {
    predicate: Arc<Predicate>,
}

impl MemoryCondition {
    /// Wraps an arbitrary predicate.
    pub fn new(predicate: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
        Self {
            predicate: Arc::new(predicate),
        }
    }

    pub fn matches(&self, record: &Value) -> bool {
        (self.predicate)(record)
    }

    /// Returns the records this condition matches, in input order.
    pub fn filter<'a>(&self, records: &'a [Value]) -> Vec<&'a Value> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}

impl fmt::Debug for MemoryCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryCondition").finish_non_exhaustive()
    }
}

impl Condition for MemoryCondition {
    fn kind(&self) -> &'static str {
        MEMORY_KIND
    }

    fn and(&self, other: &Self) -> FilterResult<Self> {
        ensure_compatible(self, other)?;
        let (left, right) = (Arc::clone(&self.predicate), Arc::clone(&other.predicate));
        Ok(Self::new(move |r| left(r) && right(r)))
    }

    fn or(&self, other: &Self) -> FilterResult<Self> {
        ensure_compatible(self, other)?;
        let (left, right) = (Arc::clone(&self.predicate), Arc::clone(&other.predicate));
        Ok(Self::new(move |r| left(r) || right(r)))
    }

    fn not(&self) -> Self {
        let inner = Arc::clone(&self.predicate);
        Self::new(move |r| !inner(r))
    }
}

/// Builds [`MemoryCondition`]s from validated definitions.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryBuilder;

impl ConditionBuilder for MemoryBuilder {
    type Condition = MemoryCondition;

    fn build(
        &self,
        property: &PropertyRef,
        operator: Operator,
        value: &Value,
    ) -> FilterResult<MemoryCondition> {
        let field = property.name().to_string();
        let operand = value.clone();

        let condition = match operator {
            Operator::Equals => compare(field, operand, Ordering::is_eq),
            Operator::NotEquals => compare(field, operand, Ordering::is_ne),
            Operator::GreaterThan => compare(field, operand, Ordering::is_gt),
            Operator::GreaterThanOrEqual => compare(field, operand, Ordering::is_ge),
            Operator::LessThan => compare(field, operand, Ordering::is_lt),
            Operator::LessThanOrEqual => compare(field, operand, Ordering::is_le),
            Operator::Like => like(field, operand, true)?,
            Operator::NotLike => like(field, operand, false)?,
            Operator::In => membership(field, operand, true),
            Operator::NotIn => membership(field, operand, false),
            Operator::IsNull => MemoryCondition::new(move |r| field_of(r, &field).is_none()),
            Operator::IsNotNull => MemoryCondition::new(move |r| field_of(r, &field).is_some()),
            Operator::Between => range(field, operator, &operand, true)?,
            Operator::NotBetween => range(field, operator, &operand, false)?,
        };
        Ok(condition)
    }
}

/// Reads a non-null field from a record.
fn field_of<'a>(record: &'a Value, field: &str) -> Option<&'a Value> {
    record.get(field).filter(|v| !v.is_null())
}

/// Orders two scalars of the same kind; `None` when they are not comparable.
fn compare_values(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => match (a.as_i64(), b.as_i64()) {
            (Some(a), Some(b)) => Some(a.cmp(&b)),
            _ => a.as_f64()?.partial_cmp(&b.as_f64()?),
        },
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

fn compare(field: String, operand: Value, accept: fn(Ordering) -> bool) -> MemoryCondition {
    MemoryCondition::new(move |r| {
        field_of(r, &field)
            .and_then(|v| compare_values(v, &operand))
            .is_some_and(accept)
    })
}

fn membership(field: String, operand: Value, expected: bool) -> MemoryCondition {
    let candidates = match operand {
        Value::Array(items) => items,
        single => vec![single],
    };
    MemoryCondition::new(move |r| {
        field_of(r, &field).is_some_and(|v| {
            let found = candidates
                .iter()
                .any(|c| compare_values(v, c) == Some(Ordering::Equal));
            found == expected
        })
    })
}

fn range(
    field: String,
    operator: Operator,
    operand: &Value,
    expected: bool,
) -> FilterResult<MemoryCondition> {
    let [low, high] = bounds(operator, operand)?;
    Ok(MemoryCondition::new(move |r| {
        field_of(r, &field).is_some_and(|v| {
            let inside = compare_values(v, &low).is_some_and(Ordering::is_ge)
                && compare_values(v, &high).is_some_and(Ordering::is_le);
            inside == expected
        })
    }))
}

fn like(field: String, operand: Value, expected: bool) -> FilterResult<MemoryCondition> {
    let pattern: Vec<char> = match &operand {
        Value::String(pattern) => pattern.chars().collect(),
        other => {
            return Err(FilterError::InvalidValueType {
                property: field,
                expected: PropertyType::Text,
                actual: json_kind(other),
            })
        }
    };
    Ok(MemoryCondition::new(move |r| match field_of(r, &field) {
        Some(Value::String(text)) => {
            let text: Vec<char> = text.chars().collect();
            like_match(&text, &pattern) == expected
        }
        _ => false,
    }))
}

/// SQL `LIKE` matching: `%` matches any run, `_` matches one character.
fn like_match(text: &[char], pattern: &[char]) -> bool {
    // matched[j]: pattern[..j] matches the text consumed so far
    let mut matched = vec![false; pattern.len() + 1];
    matched[0] = true;
    for j in 1..=pattern.len() {
        matched[j] = matched[j - 1] && pattern[j - 1] == '%';
    }

    for &c in text {
        let mut next = vec![false; pattern.len() + 1];
        for j in 1..=pattern.len() {
            next[j] = match pattern[j - 1] {
                '%' => next[j - 1] || matched[j],
                '_' => matched[j - 1],
                p => matched[j - 1] && p == c,
            };
        }
        matched = next;
    }
    matched[pattern.len()]
}
