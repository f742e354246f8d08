//! Immutable registry of filterable properties.
//!
//! The registry is built once at startup, either in code or from a TOML
//! document, and passed to whatever turns textual requests into typed ones.
//!
//! ```toml
//! [properties.age]
//! type = "integer"
//!
//! [properties.name]
//! type = "text"
//! operators = ["=", "LIKE", "IS NULL"]
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Deserialize;

use crate::error::{FilterError, FilterResult};
use crate::expr::ExpressionParser;
use crate::operator::Operator;
use crate::property::{PropertyRef, PropertyType};
use crate::request::{FilterDefinition, FilterRequest, RawFilterDefinition, RawFilterRequest};
use crate::suggest::find_similar_name;

/// Name-indexed set of [`PropertyRef`]s.
#[derive(Debug, Clone, Default)]
pub struct PropertyRegistry {
    properties: BTreeMap<String, Arc<PropertyRef>>,
}

/// Registry configuration file structure.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RegistryConfig {
    #[serde(default)]
    properties: BTreeMap<String, PropertyConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PropertyConfig {
    #[serde(rename = "type")]
    property_type: PropertyType,

    /// Falls back to the type's defaults when absent.
    operators: Option<Vec<Operator>>,
}

impl PropertyRegistry {
    /// Creates a registry from property references. Later duplicates replace earlier ones.
    pub fn new(properties: impl IntoIterator<Item = PropertyRef>) -> Self {
        Self {
            properties: properties
                .into_iter()
                .map(|p| (p.name().to_string(), Arc::new(p)))
                .collect(),
        }
    }

    /// Parses a registry from TOML.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::InvalidConfig` if the document is malformed, names
    /// an unknown type or operator, or `FilterError::EmptyOperatorSet` if a
    /// property lists no operators.
    pub fn from_toml_str(contents: &str) -> FilterResult<Self> {
        let config: RegistryConfig =
            toml::from_str(contents).map_err(|e| FilterError::InvalidConfig(e.to_string()))?;

        let properties = config
            .properties
            .into_iter()
            .map(|(name, property)| match property.operators {
                Some(operators) => PropertyRef::new(name, property.property_type, operators),
                None => Ok(PropertyRef::with_default_operators(
                    name,
                    property.property_type,
                )),
            })
            .collect::<FilterResult<Vec<_>>>()?;

        tracing::debug!(properties = properties.len(), "Property registry loaded");
        Ok(Self::new(properties))
    }

    pub fn get(&self, name: &str) -> Option<&Arc<PropertyRef>> {
        self.properties.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    /// Looks up a property, suggesting a close name when it is missing.
    pub fn require(&self, name: &str) -> FilterResult<&Arc<PropertyRef>> {
        self.properties.get(name).ok_or_else(|| {
            FilterError::unknown_property(name, find_similar_name(name, self.names()))
        })
    }

    /// Registered names, in ascending order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PropertyRef> {
        self.properties.values().map(|p| p.as_ref())
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Turns a textual definition into a typed one.
    ///
    /// Only the property name and operator are resolved here; the value is
    /// validated when the definition is built into a condition.
    pub fn resolve_definition(&self, raw: &RawFilterDefinition) -> FilterResult<FilterDefinition> {
        let property = self.require(&raw.property)?;
        let operator: Operator = raw.operator.parse()?;
        Ok(FilterDefinition::new(
            Arc::clone(property),
            operator,
            raw.value.clone(),
        ))
    }

    /// Turns a textual request into a typed one, failing on the first bad filter.
    ///
    /// The combination expression is compiled first, so a syntax error is
    /// reported ahead of any problem with the filters.
    pub fn resolve_request(&self, raw: &RawFilterRequest) -> FilterResult<FilterRequest> {
        ExpressionParser::parse(&raw.combine_with)?;

        let filters = raw
            .filters
            .iter()
            .map(|(key, def)| {
                self.resolve_definition(def)
                    .map(|resolved| (key.clone(), resolved))
                    .map_err(|e| e.for_filter(key.as_str()))
            })
            .collect::<FilterResult<Vec<_>>>()?;

        Ok(FilterRequest::new(filters, raw.combine_with.clone()))
    }
}

impl FromIterator<PropertyRef> for PropertyRegistry {
    fn from_iter<I: IntoIterator<Item = PropertyRef>>(iter: I) -> Self {
        Self::new(iter)
    }
}
