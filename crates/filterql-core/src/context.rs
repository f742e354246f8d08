//! Resolution context: filter keys mapped to built conditions.

use std::collections::HashMap;

use crate::condition::{Condition, ConditionBuilder};
use crate::error::{FilterError, FilterResult};
use crate::request::{FilterDefinition, FilterRequest};
use crate::suggest::find_similar_name;

/// Conditions keyed by filter key, consulted by expression leaves.
///
/// A context is populated once per request and is read-only while
/// expressions are generated against it.
///
/// # Construction policy
///
/// [`ResolutionContext::build`] is all-or-nothing: filters are visited in
/// ascending key order and the first failure aborts construction, reported
/// as `FilterError::FilterValidation` carrying the offending key. Callers
/// that prefer to keep the valid filters call
/// [`insert_with`](ResolutionContext::insert_with) per key and decide what to
/// do with each error.
#[derive(Debug, Clone)]
pub struct ResolutionContext<C> {
    conditions: HashMap<String, C>,
}

impl<C> Default for ResolutionContext<C> {
    fn default() -> Self {
        Self {
            conditions: HashMap::new(),
        }
    }
}

impl<C: Condition> ResolutionContext<C> {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a context for every filter in `request`.
    ///
    /// Each definition is validated against its property (operator, value
    /// arity, value type) before `builder` is called. The builder is called
    /// exactly once per key.
    pub fn build<B>(request: &FilterRequest, builder: &B) -> FilterResult<Self>
    where
        B: ConditionBuilder<Condition = C> + ?Sized,
    {
        let mut context = Self::new();
        for (key, definition) in request.filters() {
            context.insert_with(key.clone(), definition, builder)?;
        }
        tracing::debug!(filters = context.len(), "Resolution context built");
        Ok(context)
    }

    /// Validates `definition`, builds its condition and stores it under `key`.
    ///
    /// On failure the context is left unchanged and the error carries `key`.
    pub fn insert_with<B>(
        &mut self,
        key: impl Into<String>,
        definition: &FilterDefinition,
        builder: &B,
    ) -> FilterResult<()>
    where
        B: ConditionBuilder<Condition = C> + ?Sized,
    {
        let key = key.into();
        tracing::trace!(
            key = %key,
            property = definition.property().name(),
            operator = %definition.operator(),
            "Building condition"
        );

        let built = definition.validate().and_then(|()| {
            builder.build(
                definition.property(),
                definition.operator(),
                definition.value(),
            )
        });
        match built {
            Ok(condition) => {
                self.conditions.insert(key, condition);
                Ok(())
            }
            Err(e) => Err(e.for_filter(key)),
        }
    }

    /// Stores an already built condition under `key`, replacing any previous one.
    pub fn insert(&mut self, key: impl Into<String>, condition: C) {
        self.conditions.insert(key.into(), condition);
    }

    pub fn get(&self, key: &str) -> Option<&C> {
        self.conditions.get(key)
    }

    /// Like [`get`](Self::get), but fails with `UnknownFilterKey`.
    pub fn resolve(&self, key: &str) -> FilterResult<&C> {
        self.conditions.get(key).ok_or_else(|| {
            let suggestion = find_similar_name(key, self.conditions.keys().map(String::as_str));
            FilterError::unknown_filter_key(key, suggestion)
        })
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.conditions.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.conditions.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

impl<C: Condition, K: Into<String>> FromIterator<(K, C)> for ResolutionContext<C> {
    fn from_iter<I: IntoIterator<Item = (K, C)>>(iter: I) -> Self {
        Self {
            conditions: iter.into_iter().map(|(k, c)| (k.into(), c)).collect(),
        }
    }
}
