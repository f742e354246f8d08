//! Error types for expression parsing, validation and generation.

use thiserror::Error;

use crate::operator::Operator;
use crate::property::PropertyType;

/// A specialized Result type for filter operations.
pub type FilterResult<T> = Result<T, FilterError>;

/// Errors that can occur while compiling or resolving a filter request.
///
/// None of these are fatal; callers are expected to surface them as
/// validation failures. [`FilterError::is_syntax_error`] separates problems
/// with the combination string from problems with the filter definitions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FilterError {
    // ==================== Syntax ====================
    /// The expression is empty or contains only whitespace.
    #[error("filter expression is empty")]
    EmptyExpression,

    /// A character outside the expression grammar was found.
    #[error("invalid character '{character}' at position {position}")]
    InvalidCharacter {
        /// The offending character.
        character: char,
        /// 0-based character index into the original expression.
        position: usize,
    },

    /// A `(` without its `)` or a `)` without its `(`.
    #[error("mismatched parentheses at position {position}")]
    MismatchedParentheses {
        /// Position of the unmatched parenthesis.
        position: usize,
    },

    /// An operator did not have enough operands.
    #[error("{operator} operator is missing an operand")]
    MissingOperand {
        /// The starved operator (`NOT`, `AND` or `OR`).
        operator: &'static str,
    },

    /// Compilation did not produce exactly one root expression.
    #[error("malformed expression: expected a single expression but found {roots}")]
    MalformedExpression {
        /// Number of roots left after compilation.
        roots: usize,
    },

    /// The expression nests operators deeper than the compiler allows.
    #[error("expression is nested deeper than {max} levels")]
    ExpressionTooDeep {
        /// The nesting limit.
        max: usize,
    },

    // ==================== Validation ====================
    /// The operator is not in the property's supported set.
    #[error(
        "operator {operator} is not supported for property '{property}' (supported: {})",
        format_operators(.allowed)
    )]
    OperatorNotSupported {
        /// Name of the property.
        property: String,
        /// The rejected operator.
        operator: Operator,
        /// Operators the property accepts.
        allowed: Vec<Operator>,
    },

    /// The value does not have the number of elements the operator needs.
    #[error("operator {operator} requires {expected}, got {actual} value(s)")]
    InvalidValueCardinality {
        /// The operator being applied.
        operator: Operator,
        /// Human readable description of the expected arity.
        expected: &'static str,
        /// Number of values supplied.
        actual: usize,
    },

    /// A value is not compatible with the property's declared type.
    #[error("value of type {actual} is not compatible with {expected} property '{property}'")]
    InvalidValueType {
        /// Name of the property.
        property: String,
        /// Declared type of the property.
        expected: PropertyType,
        /// JSON kind of the supplied value.
        actual: &'static str,
    },

    /// A property was declared without any operators.
    #[error("property '{property}' must support at least one operator")]
    EmptyOperatorSet {
        /// Name of the property.
        property: String,
    },

    /// A textual operator did not match any known symbol or code.
    #[error("unknown operator: {0}")]
    UnknownOperator(String),

    /// A request referenced a property that is not registered.
    #[error("unknown property '{name}'{}", did_you_mean(.suggestion))]
    UnknownProperty {
        /// The requested property name.
        name: String,
        /// Closest registered name, if any is close enough.
        suggestion: Option<String>,
    },

    /// A filter definition failed validation.
    #[error("invalid filter '{key}': {source}")]
    FilterValidation {
        /// The filter key whose definition was rejected.
        key: String,
        /// The underlying validation failure.
        source: Box<FilterError>,
    },

    // ==================== Generation ====================
    /// The expression references a filter key with no condition.
    #[error("unknown filter key '{key}'{}", did_you_mean(.suggestion))]
    UnknownFilterKey {
        /// The missing filter key.
        key: String,
        /// Closest known key, if any is close enough.
        suggestion: Option<String>,
    },

    /// Two conditions produced by different backends were combined.
    #[error("cannot combine {left} condition with {right} condition")]
    IncompatibleConditionKind {
        /// Backend tag of the left operand.
        left: &'static str,
        /// Backend tag of the right operand.
        right: &'static str,
    },

    // ==================== Configuration ====================
    /// A property registry could not be loaded.
    #[error("invalid property configuration: {0}")]
    InvalidConfig(String),
}

impl FilterError {
    /// Creates an unknown filter key error.
    pub fn unknown_filter_key(key: impl Into<String>, suggestion: Option<String>) -> Self {
        FilterError::UnknownFilterKey {
            key: key.into(),
            suggestion,
        }
    }

    /// Creates an unknown property error.
    pub fn unknown_property(name: impl Into<String>, suggestion: Option<String>) -> Self {
        FilterError::UnknownProperty {
            name: name.into(),
            suggestion,
        }
    }

    /// Creates an unknown operator error.
    pub fn unknown_operator(text: impl Into<String>) -> Self {
        FilterError::UnknownOperator(text.into())
    }

    /// Wraps this error with the filter key it belongs to.
    pub fn for_filter(self, key: impl Into<String>) -> Self {
        FilterError::FilterValidation {
            key: key.into(),
            source: Box::new(self),
        }
    }

    /// Returns true if the error is a problem with the expression text itself.
    pub fn is_syntax_error(&self) -> bool {
        matches!(
            self,
            FilterError::EmptyExpression
                | FilterError::InvalidCharacter { .. }
                | FilterError::MismatchedParentheses { .. }
                | FilterError::MissingOperand { .. }
                | FilterError::MalformedExpression { .. }
                | FilterError::ExpressionTooDeep { .. }
        )
    }

    /// Returns the filter key this error is attached to, if any.
    pub fn filter_key(&self) -> Option<&str> {
        match self {
            FilterError::FilterValidation { key, .. } | FilterError::UnknownFilterKey { key, .. } => {
                Some(key)
            }
            _ => None,
        }
    }
}

fn format_operators(operators: &[Operator]) -> String {
    operators
        .iter()
        .map(|op| op.symbol())
        .collect::<Vec<_>>()
        .join(", ")
}

fn did_you_mean(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(". Did you mean '{s}'?"),
        None => String::new(),
    }
}
