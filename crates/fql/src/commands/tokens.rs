//! Tokens command implementation.

use filterql_core::expr::tokenize;

use super::{CommandContext, Result};
use crate::output::{format_tokens_json, format_tokens_text};

/// Prints the token stream of an expression.
pub fn execute(ctx: &CommandContext, expression: &str) -> Result<()> {
    let tokens = tokenize(expression)?;

    if ctx.json_output {
        println!("{}", format_tokens_json(&tokens)?);
    } else if !ctx.quiet {
        print!("{}", format_tokens_text(&tokens, ctx.use_colors));
    }

    Ok(())
}
