//! Sql command implementation.

use filterql_adapters::{SqlBuilder, SqlDialect};
use filterql_core::FilterResolver;

use super::{load_request, CommandContext, Result};
use crate::cli::RequestInputs;
use crate::output::{format_sql_json, format_sql_text};

/// Resolves a request into a SQL fragment and prints it with its parameters.
pub fn execute(ctx: &CommandContext, inputs: &RequestInputs, dialect: SqlDialect) -> Result<()> {
    let request = load_request(inputs)?;
    let condition = FilterResolver::new(SqlBuilder::new(dialect)).resolve(&request)?;

    if ctx.json_output {
        println!("{}", format_sql_json(&condition)?);
    } else if !ctx.quiet {
        print!("{}", format_sql_text(&condition, ctx.use_colors));
    }

    Ok(())
}
