//! Typed property descriptors and operator validation.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{FilterError, FilterResult};
use crate::operator::Operator;

/// The declared value type of a filterable property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    /// A string.
    Text,
    /// A whole number.
    Integer,
    /// Any number (integers are accepted).
    Number,
    /// `true` or `false`.
    Boolean,
}

impl PropertyType {
    /// Returns the lowercase type name.
    pub fn name(self) -> &'static str {
        match self {
            PropertyType::Text => "text",
            PropertyType::Integer => "integer",
            PropertyType::Number => "number",
            PropertyType::Boolean => "boolean",
        }
    }

    /// Operators a property of this type supports when none are declared.
    pub fn default_operators(self) -> &'static [Operator] {
        match self {
            PropertyType::Text => Operator::TEXT,
            PropertyType::Integer | PropertyType::Number => Operator::NUMERIC,
            PropertyType::Boolean => Operator::BOOLEAN,
        }
    }

    /// Returns true if a single scalar value fits this type.
    pub fn accepts(self, value: &Value) -> bool {
        match (self, value) {
            (PropertyType::Text, Value::String(_)) => true,
            (PropertyType::Integer, Value::Number(n)) => n.is_i64() || n.is_u64(),
            (PropertyType::Number, Value::Number(_)) => true,
            (PropertyType::Boolean, Value::Bool(_)) => true,
            _ => false,
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A named, typed property and the operators it may be filtered with.
///
/// Property references are declared by the integrating application, usually
/// once at startup (see [`PropertyRegistry`](crate::PropertyRegistry)), and
/// are read-only afterwards. The supported operator set is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyRef {
    name: String,
    property_type: PropertyType,
    supported_operators: BTreeSet<Operator>,
}

impl PropertyRef {
    /// Creates a property reference with an explicit operator set.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::EmptyOperatorSet` if `operators` is empty.
    pub fn new(
        name: impl Into<String>,
        property_type: PropertyType,
        operators: impl IntoIterator<Item = Operator>,
    ) -> FilterResult<Self> {
        let name = name.into();
        let supported_operators: BTreeSet<_> = operators.into_iter().collect();
        if supported_operators.is_empty() {
            return Err(FilterError::EmptyOperatorSet { property: name });
        }
        Ok(Self {
            name,
            property_type,
            supported_operators,
        })
    }

    /// Creates a property reference using the type's default operators.
    pub fn with_default_operators(name: impl Into<String>, property_type: PropertyType) -> Self {
        Self {
            name: name.into(),
            property_type,
            supported_operators: property_type.default_operators().iter().copied().collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn property_type(&self) -> PropertyType {
        self.property_type
    }

    /// Returns the name of the declared type.
    pub fn type_name(&self) -> &'static str {
        self.property_type.name()
    }

    /// Supported operators, in declaration order of [`Operator`].
    pub fn supported_operators(&self) -> impl Iterator<Item = Operator> + '_ {
        self.supported_operators.iter().copied()
    }

    pub fn supports(&self, operator: Operator) -> bool {
        self.supported_operators.contains(&operator)
    }

    /// Returns true if every operator in `operators` is supported.
    pub fn supports_all(&self, operators: impl IntoIterator<Item = Operator>) -> bool {
        operators.into_iter().all(|op| self.supports(op))
    }

    /// Returns the operators from `operators` this property rejects.
    pub fn unsupported_operators(
        &self,
        operators: impl IntoIterator<Item = Operator>,
    ) -> BTreeSet<Operator> {
        operators
            .into_iter()
            .filter(|op| !self.supports(*op))
            .collect()
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self.property_type,
            PropertyType::Integer | PropertyType::Number
        )
    }

    pub fn is_textual(&self) -> bool {
        self.property_type == PropertyType::Text
    }

    /// Fails with `OperatorNotSupported` when the operator is not allowed.
    pub fn validate(&self, operator: Operator) -> FilterResult<()> {
        if self.supports(operator) {
            return Ok(());
        }
        Err(FilterError::OperatorNotSupported {
            property: self.name.clone(),
            operator,
            allowed: self.supported_operators().collect(),
        })
    }

    /// Validates a full `(operator, value)` pair against this property.
    ///
    /// Checks, in order: the operator is supported, the value has the arity
    /// the operator needs, and every supplied value fits the property type.
    pub fn validate_value(&self, operator: Operator, value: &Value) -> FilterResult<()> {
        self.validate(operator)?;
        operator.check_cardinality(value)?;

        let values: &[Value] = match value {
            Value::Null => &[],
            Value::Array(items) => items,
            single => std::slice::from_ref(single),
        };
        match values.iter().find(|v| !self.property_type.accepts(v)) {
            Some(bad) => Err(FilterError::InvalidValueType {
                property: self.name.clone(),
                expected: self.property_type,
                actual: json_kind(bad),
            }),
            None => Ok(()),
        }
    }
}

/// Name of a JSON value's kind, for diagnostics.
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "number",
        Value::Number(_) => "integer",
        Value::String(_) => "text",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl fmt::Display for PropertyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.property_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn name_ref() -> PropertyRef {
        PropertyRef::new("name", PropertyType::Text, [Operator::Equals, Operator::Like]).unwrap()
    }

    #[test]
    fn test_validate_gate() {
        let property = name_ref();
        assert!(property.validate(Operator::Equals).is_ok());
        assert!(property.validate(Operator::Like).is_ok());

        let err = property.validate(Operator::GreaterThan).unwrap_err();
        assert_eq!(
            err,
            FilterError::OperatorNotSupported {
                property: "name".to_string(),
                operator: Operator::GreaterThan,
                allowed: vec![Operator::Equals, Operator::Like],
            }
        );
    }

    #[test]
    fn test_empty_operator_set_rejected() {
        let err = PropertyRef::new("age", PropertyType::Integer, []).unwrap_err();
        assert_eq!(
            err,
            FilterError::EmptyOperatorSet {
                property: "age".to_string()
            }
        );
    }

    #[test]
    fn test_default_operators_follow_type() {
        let age = PropertyRef::with_default_operators("age", PropertyType::Integer);
        assert!(age.supports(Operator::Between));
        assert!(!age.supports(Operator::Like));
        assert!(age.is_numeric());
        assert!(!age.is_textual());

        let email = PropertyRef::with_default_operators("email", PropertyType::Text);
        assert!(email.supports(Operator::Like));
        assert!(!email.supports(Operator::GreaterThan));
        assert!(email.is_textual());

        let active = PropertyRef::with_default_operators("active", PropertyType::Boolean);
        assert_eq!(
            active.supported_operators().collect::<Vec<_>>(),
            vec![
                Operator::Equals,
                Operator::NotEquals,
                Operator::IsNull,
                Operator::IsNotNull
            ]
        );
    }

    #[test]
    fn test_supports_all_and_unsupported() {
        let property = name_ref();
        assert!(property.supports_all([Operator::Equals, Operator::Like]));
        assert!(!property.supports_all([Operator::Equals, Operator::In]));

        let rejected = property.unsupported_operators([Operator::Equals, Operator::In, Operator::IsNull]);
        assert_eq!(
            rejected.into_iter().collect::<Vec<_>>(),
            vec![Operator::In, Operator::IsNull]
        );
    }

    #[test]
    fn test_validate_value_checks_type() {
        let age = PropertyRef::with_default_operators("age", PropertyType::Integer);
        assert!(age.validate_value(Operator::Equals, &json!(30)).is_ok());
        assert!(age.validate_value(Operator::Between, &json!([18, 65])).is_ok());

        let err = age
            .validate_value(Operator::Equals, &json!("thirty"))
            .unwrap_err();
        assert_eq!(
            err,
            FilterError::InvalidValueType {
                property: "age".to_string(),
                expected: PropertyType::Integer,
                actual: "text",
            }
        );

        let err = age
            .validate_value(Operator::In, &json!([1, 2.5]))
            .unwrap_err();
        assert!(matches!(
            err,
            FilterError::InvalidValueType {
                actual: "number",
                ..
            }
        ));
    }

    #[test]
    fn test_number_accepts_integers() {
        let score = PropertyRef::with_default_operators("score", PropertyType::Number);
        assert!(score.validate_value(Operator::GreaterThan, &json!(3)).is_ok());
        assert!(score.validate_value(Operator::GreaterThan, &json!(3.5)).is_ok());
    }

    #[test]
    fn test_validate_value_operator_checked_first() {
        let property = name_ref();
        let err = property
            .validate_value(Operator::In, &json!([]))
            .unwrap_err();
        assert!(matches!(err, FilterError::OperatorNotSupported { .. }));
    }

    #[test]
    fn test_validate_value_null_checks() {
        let email = PropertyRef::with_default_operators("email", PropertyType::Text);
        assert!(email.validate_value(Operator::IsNull, &Value::Null).is_ok());
        assert!(matches!(
            email.validate_value(Operator::IsNull, &json!("x")),
            Err(FilterError::InvalidValueCardinality { .. })
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(name_ref().to_string(), "name (text)");
        assert_eq!(name_ref().type_name(), "text");
    }
}
