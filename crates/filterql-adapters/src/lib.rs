//! Condition backends for `filterql-core`.
//!
//! - [`memory`]: predicates evaluated against JSON records.
//! - [`sql`]: parameterised `WHERE` fragments for Postgres or SQLite.
//!
//! Both plug into [`filterql_core::FilterResolver`] through their builders:
//!
//! ```
//! use filterql_adapters::{SqlBuilder, SqlDialect};
//! use filterql_core::{FilterDefinition, FilterRequest, FilterResolver, Operator, PropertyRef, PropertyType};
//! use serde_json::json;
//!
//! let age = PropertyRef::with_default_operators("age", PropertyType::Integer);
//! let request = FilterRequest::new(
//!     [("adult", FilterDefinition::new(age, Operator::GreaterThanOrEqual, json!(18)))],
//!     "!adult",
//! );
//!
//! let condition = FilterResolver::new(SqlBuilder::new(SqlDialect::Postgres))
//!     .resolve(&request)
//!     .unwrap();
//! assert_eq!(condition.to_sql(), r#"NOT ("age" >= $1)"#);
//! ```

pub mod memory;
mod operand;
pub mod sql;

pub use memory::{MemoryBuilder, MemoryCondition, MEMORY_KIND};
pub use sql::{SqlBuilder, SqlCondition, SqlDialect};
