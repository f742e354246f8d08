//! SQL backend: parameterised `WHERE` fragments.
//!
//! Values never appear in the generated text; each one becomes a bind
//! parameter, numbered when the fragment is rendered. Property names are
//! emitted as quoted identifiers.

use std::fmt;

use filterql_core::{
    ensure_compatible, Condition, ConditionBuilder, FilterResult, Operator, PropertyRef,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::operand::bounds;

/// The placeholder style of the target database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SqlDialect {
    /// Numbered placeholders: `$1`, `$2`, ...
    #[default]
    Postgres,
    /// Positional placeholders: `?`.
    Sqlite,
}

impl SqlDialect {
    /// Backend tag for conditions of this dialect.
    pub fn kind(self) -> &'static str {
        match self {
            SqlDialect::Postgres => "sql/postgres",
            SqlDialect::Sqlite => "sql/sqlite",
        }
    }

    fn placeholder(self, index: usize) -> String {
        match self {
            SqlDialect::Postgres => format!("${index}"),
            SqlDialect::Sqlite => "?".to_string(),
        }
    }
}

impl fmt::Display for SqlDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlDialect::Postgres => f.write_str("postgres"),
            SqlDialect::Sqlite => f.write_str("sqlite"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Sql(String),
    Param,
}

/// A SQL boolean expression with its bind parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlCondition {
    dialect: SqlDialect,
    segments: Vec<Segment>,
    params: Vec<Value>,
}

impl SqlCondition {
    pub fn dialect(&self) -> SqlDialect {
        self.dialect
    }

    /// Bind parameters, in placeholder order.
    pub fn params(&self) -> &[Value] {
        &self.params
    }

    /// Renders the fragment with the dialect's placeholders.
    pub fn to_sql(&self) -> String {
        let mut sql = String::new();
        let mut index = 0;
        for segment in &self.segments {
            match segment {
                Segment::Sql(text) => sql.push_str(text),
                Segment::Param => {
                    index += 1;
                    sql.push_str(&self.dialect.placeholder(index));
                }
            }
        }
        sql
    }

    fn combine(&self, other: &Self, connective: &str) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + other.segments.len() + 3);
        segments.push(Segment::Sql("(".to_string()));
        segments.extend(self.segments.iter().cloned());
        segments.push(Segment::Sql(format!(" {connective} ")));
        segments.extend(other.segments.iter().cloned());
        segments.push(Segment::Sql(")".to_string()));

        Self {
            dialect: self.dialect,
            segments,
            params: self.params.iter().chain(&other.params).cloned().collect(),
        }
    }
}

impl fmt::Display for SqlCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}

impl Condition for SqlCondition {
    fn kind(&self) -> &'static str {
        self.dialect.kind()
    }

    fn and(&self, other: &Self) -> FilterResult<Self> {
        ensure_compatible(self, other)?;
        Ok(self.combine(other, "AND"))
    }

    fn or(&self, other: &Self) -> FilterResult<Self> {
        ensure_compatible(self, other)?;
        Ok(self.combine(other, "OR"))
    }

    fn not(&self) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 2);
        segments.push(Segment::Sql("NOT (".to_string()));
        segments.extend(self.segments.iter().cloned());
        segments.push(Segment::Sql(")".to_string()));
        Self {
            dialect: self.dialect,
            segments,
            params: self.params.clone(),
        }
    }
}

/// Builds [`SqlCondition`]s for one dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlBuilder {
    dialect: SqlDialect,
}

impl SqlBuilder {
    pub fn new(dialect: SqlDialect) -> Self {
        Self { dialect }
    }

    pub fn dialect(&self) -> SqlDialect {
        self.dialect
    }
}

impl ConditionBuilder for SqlBuilder {
    type Condition = SqlCondition;

    fn build(
        &self,
        property: &PropertyRef,
        operator: Operator,
        value: &Value,
    ) -> FilterResult<SqlCondition> {
        let column = quote_identifier(property.name());
        let mut segments = vec![Segment::Sql(column)];
        let mut params = Vec::new();

        match operator {
            Operator::Equals
            | Operator::NotEquals
            | Operator::GreaterThan
            | Operator::GreaterThanOrEqual
            | Operator::LessThan
            | Operator::LessThanOrEqual
            | Operator::Like
            | Operator::NotLike => {
                let symbol = match operator {
                    Operator::NotEquals => "<>",
                    other => other.symbol(),
                };
                segments.push(Segment::Sql(format!(" {symbol} ")));
                segments.push(Segment::Param);
                params.push(value.clone());
            }
            Operator::In | Operator::NotIn => {
                let items = match value {
                    Value::Array(items) => items.clone(),
                    single => vec![single.clone()],
                };
                segments.push(Segment::Sql(format!(" {} (", operator.symbol())));
                for (i, item) in items.into_iter().enumerate() {
                    if i > 0 {
                        segments.push(Segment::Sql(", ".to_string()));
                    }
                    segments.push(Segment::Param);
                    params.push(item);
                }
                segments.push(Segment::Sql(")".to_string()));
            }
            Operator::IsNull | Operator::IsNotNull => {
                segments.push(Segment::Sql(format!(" {}", operator.symbol())));
            }
            Operator::Between | Operator::NotBetween => {
                let [low, high] = bounds(operator, value)?;
                segments.push(Segment::Sql(format!(" {} ", operator.symbol())));
                segments.push(Segment::Param);
                segments.push(Segment::Sql(" AND ".to_string()));
                segments.push(Segment::Param);
                params.extend([low, high]);
            }
        }

        tracing::trace!(
            property = property.name(),
            %operator,
            dialect = %self.dialect,
            params = params.len(),
            "built sql condition"
        );
        Ok(SqlCondition {
            dialect: self.dialect,
            segments,
            params,
        })
    }
}

/// Double-quotes an identifier, doubling embedded quotes.
fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
