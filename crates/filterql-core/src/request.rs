//! Filter definitions and requests.
//!
//! A [`FilterRequest`] pairs a set of named [`FilterDefinition`]s with the
//! expression that combines them. Requests arriving as JSON are first read
//! into a [`RawFilterRequest`] and then resolved against a
//! [`PropertyRegistry`](crate::PropertyRegistry).

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::FilterResult;
use crate::operator::Operator;
use crate::property::PropertyRef;

/// A single `(property, operator, value)` condition.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterDefinition {
    property: Arc<PropertyRef>,
    operator: Operator,
    value: Value,
}

impl FilterDefinition {
    /// Creates a definition. No validation happens until [`validate`](Self::validate).
    pub fn new(property: impl Into<Arc<PropertyRef>>, operator: Operator, value: Value) -> Self {
        Self {
            property: property.into(),
            operator,
            value,
        }
    }

    /// Creates a value-less definition (for `IS NULL` / `IS NOT NULL`).
    pub fn without_value(property: impl Into<Arc<PropertyRef>>, operator: Operator) -> Self {
        Self::new(property, operator, Value::Null)
    }

    pub fn property(&self) -> &PropertyRef {
        &self.property
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Checks the operator against the property and the value against the operator.
    pub fn validate(&self) -> FilterResult<()> {
        self.property.validate_value(self.operator, &self.value)
    }
}

/// Named filters plus the expression combining them.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterRequest {
    filters: BTreeMap<String, FilterDefinition>,
    combine_with: String,
}

impl FilterRequest {
    /// Creates a request. Later duplicates of a key replace earlier ones.
    pub fn new<K: Into<String>>(
        filters: impl IntoIterator<Item = (K, FilterDefinition)>,
        combine_with: impl Into<String>,
    ) -> Self {
        Self {
            filters: filters.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            combine_with: combine_with.into(),
        }
    }

    /// Filters keyed by name, in ascending key order.
    pub fn filters(&self) -> &BTreeMap<String, FilterDefinition> {
        &self.filters
    }

    pub fn filter(&self, key: &str) -> Option<&FilterDefinition> {
        self.filters.get(key)
    }

    pub fn combine_with(&self) -> &str {
        &self.combine_with
    }
}

/// The textual form of a filter definition, as found in JSON requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawFilterDefinition {
    /// Name of the property in the registry.
    #[serde(rename = "ref")]
    pub property: String,

    /// Operator symbol or code.
    pub operator: String,

    /// The operand; omitted or `null` for null checks.
    #[serde(default)]
    pub value: Value,
}

/// The textual form of a filter request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFilterRequest {
    pub filters: BTreeMap<String, RawFilterDefinition>,
    pub combine_with: String,
}

impl RawFilterRequest {
    /// Reads a request from a JSON string.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
