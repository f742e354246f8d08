//! Comparison, membership, null and range operators.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::{FilterError, FilterResult};

/// An operator applied to a property in a filter definition.
///
/// Each operator has a canonical symbol (`>=`, `NOT LIKE`, ...) and a short
/// code (`GTE`, `NOT_LIKE`, ...). Both forms are accepted by
/// [`Operator::parse`]; the symbol is used for display and serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Operator {
    /// `=`
    Equals,
    /// `!=`
    NotEquals,
    /// `>`
    GreaterThan,
    /// `>=`
    GreaterThanOrEqual,
    /// `<`
    LessThan,
    /// `<=`
    LessThanOrEqual,
    /// `LIKE`
    Like,
    /// `NOT LIKE`
    NotLike,
    /// `IN`
    In,
    /// `NOT IN`
    NotIn,
    /// `IS NULL`
    IsNull,
    /// `IS NOT NULL`
    IsNotNull,
    /// `BETWEEN`
    Between,
    /// `NOT BETWEEN`
    NotBetween,
}

/// How many values an operator takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    /// No value (`IS NULL`, `IS NOT NULL`).
    None,
    /// Exactly one scalar value.
    Single,
    /// A non-empty list (`IN`, `NOT IN`).
    List,
    /// Exactly two values (`BETWEEN`, `NOT BETWEEN`).
    Range,
}

impl Cardinality {
    fn describe(self) -> &'static str {
        match self {
            Cardinality::None => "no value",
            Cardinality::Single => "a single value",
            Cardinality::List => "a non-empty list of values",
            Cardinality::Range => "exactly 2 values",
        }
    }
}

impl Operator {
    /// Every operator, in declaration order.
    pub const ALL: [Operator; 14] = [
        Operator::Equals,
        Operator::NotEquals,
        Operator::GreaterThan,
        Operator::GreaterThanOrEqual,
        Operator::LessThan,
        Operator::LessThanOrEqual,
        Operator::Like,
        Operator::NotLike,
        Operator::In,
        Operator::NotIn,
        Operator::IsNull,
        Operator::IsNotNull,
        Operator::Between,
        Operator::NotBetween,
    ];

    /// Operators that make sense for textual properties.
    pub const TEXT: &'static [Operator] = &[
        Operator::Equals,
        Operator::NotEquals,
        Operator::Like,
        Operator::NotLike,
        Operator::In,
        Operator::NotIn,
        Operator::IsNull,
        Operator::IsNotNull,
    ];

    /// Operators that make sense for numeric properties.
    pub const NUMERIC: &'static [Operator] = &[
        Operator::Equals,
        Operator::NotEquals,
        Operator::GreaterThan,
        Operator::GreaterThanOrEqual,
        Operator::LessThan,
        Operator::LessThanOrEqual,
        Operator::Between,
        Operator::NotBetween,
        Operator::In,
        Operator::NotIn,
        Operator::IsNull,
        Operator::IsNotNull,
    ];

    /// Operators that make sense for boolean properties.
    pub const BOOLEAN: &'static [Operator] = &[
        Operator::Equals,
        Operator::NotEquals,
        Operator::IsNull,
        Operator::IsNotNull,
    ];

    /// Returns the canonical symbol.
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Equals => "=",
            Operator::NotEquals => "!=",
            Operator::GreaterThan => ">",
            Operator::GreaterThanOrEqual => ">=",
            Operator::LessThan => "<",
            Operator::LessThanOrEqual => "<=",
            Operator::Like => "LIKE",
            Operator::NotLike => "NOT LIKE",
            Operator::In => "IN",
            Operator::NotIn => "NOT IN",
            Operator::IsNull => "IS NULL",
            Operator::IsNotNull => "IS NOT NULL",
            Operator::Between => "BETWEEN",
            Operator::NotBetween => "NOT BETWEEN",
        }
    }

    /// Returns the short code.
    pub fn code(self) -> &'static str {
        match self {
            Operator::Equals => "EQ",
            Operator::NotEquals => "NE",
            Operator::GreaterThan => "GT",
            Operator::GreaterThanOrEqual => "GTE",
            Operator::LessThan => "LT",
            Operator::LessThanOrEqual => "LTE",
            Operator::Like => "LIKE",
            Operator::NotLike => "NOT_LIKE",
            Operator::In => "IN",
            Operator::NotIn => "NOT_IN",
            Operator::IsNull => "IS_NULL",
            Operator::IsNotNull => "IS_NOT_NULL",
            Operator::Between => "BETWEEN",
            Operator::NotBetween => "NOT_BETWEEN",
        }
    }

    /// Looks up an operator by symbol or code.
    ///
    /// The input is trimmed and matched case-insensitively. Returns `None`
    /// when nothing matches so callers can tell an unrecognized operator
    /// apart from a malformed request.
    pub fn parse(text: &str) -> Option<Operator> {
        let normalized = text.trim().to_uppercase();
        Self::ALL
            .into_iter()
            .find(|op| op.symbol() == normalized || op.code() == normalized)
    }

    /// Returns false only for `IS NULL` and `IS NOT NULL`.
    pub fn requires_value(self) -> bool {
        !matches!(self, Operator::IsNull | Operator::IsNotNull)
    }

    /// Returns true for the list and range operators.
    pub fn supports_multiple_values(self) -> bool {
        matches!(
            self,
            Operator::In | Operator::NotIn | Operator::Between | Operator::NotBetween
        )
    }

    /// Returns the value arity this operator expects.
    pub fn cardinality(self) -> Cardinality {
        match self {
            Operator::IsNull | Operator::IsNotNull => Cardinality::None,
            Operator::In | Operator::NotIn => Cardinality::List,
            Operator::Between | Operator::NotBetween => Cardinality::Range,
            _ => Cardinality::Single,
        }
    }

    /// Checks that `value` has the shape this operator needs.
    ///
    /// `null` counts as no value, an array counts as its elements, and any
    /// other JSON value counts as a single value.
    pub fn check_cardinality(self, value: &Value) -> FilterResult<()> {
        let expected = self.cardinality();
        let ok = match (expected, value) {
            (Cardinality::None, Value::Null) => true,
            (Cardinality::Single, Value::Null | Value::Array(_)) => false,
            (Cardinality::Single, _) => true,
            (Cardinality::List, Value::Array(items)) => !items.is_empty(),
            (Cardinality::Range, Value::Array(items)) => items.len() == 2,
            _ => false,
        };

        if ok {
            Ok(())
        } else {
            Err(FilterError::InvalidValueCardinality {
                operator: self,
                expected: expected.describe(),
                actual: value_count(value),
            })
        }
    }
}

/// Number of values carried by a JSON value.
pub(crate) fn value_count(value: &Value) -> usize {
    match value {
        Value::Null => 0,
        Value::Array(items) => items.len(),
        _ => 1,
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Operator {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operator::parse(s).ok_or_else(|| FilterError::unknown_operator(s.trim()))
    }
}

impl Serialize for Operator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.symbol())
    }
}

impl<'de> Deserialize<'de> for Operator {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
