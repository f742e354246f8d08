//! Eval command implementation.
//!
//! Resolves a request with the in-memory backend and filters a JSON array of
//! records with the resulting predicate.

use std::path::Path;

use filterql_adapters::MemoryBuilder;
use filterql_core::FilterResolver;
use serde_json::Value;

use super::{load_request, read_json, CommandContext, Result};
use crate::cli::RequestInputs;
use crate::output::{format_records_json, format_records_text};

/// Executes the eval command.
///
/// # Errors
///
/// Returns an error if an input cannot be read, the request does not
/// resolve against the schema, or the data file is not a JSON array.
pub fn execute(ctx: &CommandContext, inputs: &RequestInputs, data: &Path) -> Result<()> {
    let request = load_request(inputs)?;
    let condition = FilterResolver::new(MemoryBuilder).resolve(&request)?;

    let records: Vec<Value> = read_json(data)?;
    let matched = condition.filter(&records);
    tracing::debug!(matched = matched.len(), total = records.len(), "evaluated records");

    if ctx.json_output {
        println!("{}", format_records_json(&matched, records.len())?);
    } else if !ctx.quiet {
        print!("{}", format_records_text(&matched, records.len(), ctx.use_colors));
    }

    Ok(())
}
