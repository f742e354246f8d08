//! Output formatting for resolved requests.

use filterql_adapters::SqlCondition;
use owo_colors::OwoColorize;
use serde::Serialize;
use serde_json::Value;

/// JSON output structure for the eval command.
#[derive(Serialize)]
pub struct EvalOutput<'a> {
    pub matched: usize,
    pub total: usize,
    pub records: &'a [&'a Value],
}

/// JSON output structure for the sql command.
#[derive(Serialize)]
pub struct SqlOutput<'a> {
    pub dialect: String,
    pub sql: String,
    pub params: &'a [Value],
}

/// Formats matching records as JSON.
pub fn format_records_json(matched: &[&Value], total: usize) -> Result<String, serde_json::Error> {
    let output = EvalOutput {
        matched: matched.len(),
        total,
        records: matched,
    };
    serde_json::to_string_pretty(&output)
}

/// Formats matching records one per line, followed by a summary.
pub fn format_records_text(matched: &[&Value], total: usize, use_colors: bool) -> String {
    let mut output = String::new();
    for record in matched {
        output.push_str(&record.to_string());
        output.push('\n');
    }

    let summary = format!("{} of {total} records matched", matched.len());
    if use_colors {
        output.push_str(&format!("{}\n", summary.dimmed()));
    } else {
        output.push_str(&summary);
        output.push('\n');
    }
    output
}

/// Formats a SQL fragment and its parameters as JSON.
pub fn format_sql_json(condition: &SqlCondition) -> Result<String, serde_json::Error> {
    let output = SqlOutput {
        dialect: condition.dialect().to_string(),
        sql: condition.to_sql(),
        params: condition.params(),
    };
    serde_json::to_string_pretty(&output)
}

/// Formats a SQL fragment followed by one line per bind parameter.
pub fn format_sql_text(condition: &SqlCondition, use_colors: bool) -> String {
    let mut output = condition.to_sql();
    output.push('\n');

    for (i, param) in condition.params().iter().enumerate() {
        let label = format!("  {}:", i + 1);
        if use_colors {
            output.push_str(&format!("{} {}\n", label.dimmed(), param.yellow()));
        } else {
            output.push_str(&format!("{label} {param}\n"));
        }
    }
    output
}
