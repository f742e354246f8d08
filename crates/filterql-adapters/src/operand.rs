//! Operand shapes shared by the backends.

use filterql_core::{FilterError, FilterResult, Operator};
use serde_json::Value;

/// Splits a `BETWEEN` operand into its two bounds.
pub(crate) fn bounds(operator: Operator, operand: &Value) -> FilterResult<[Value; 2]> {
    match operand {
        Value::Array(items) if items.len() == 2 => Ok([items[0].clone(), items[1].clone()]),
        other => Err(FilterError::InvalidValueCardinality {
            operator,
            expected: "exactly 2 values",
            actual: match other {
                Value::Null => 0,
                Value::Array(items) => items.len(),
                _ => 1,
            },
        }),
    }
}
