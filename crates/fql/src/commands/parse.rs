//! Parse command implementation.

use filterql_core::ExpressionParser;

use super::{CommandContext, Result};
use crate::output::{format_expression_json, format_expression_text};

/// Compiles an expression and prints its canonical form.
pub fn execute(ctx: &CommandContext, expression: &str) -> Result<()> {
    let expr = ExpressionParser::parse(expression)?;

    if ctx.json_output {
        println!("{}", format_expression_json(&expr)?);
    } else if !ctx.quiet {
        print!("{}", format_expression_text(&expr, ctx.use_colors));
    }

    Ok(())
}
