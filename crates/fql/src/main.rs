use clap::Parser;
use std::process::ExitCode;

mod cli;
mod commands;
mod output;

use cli::{Cli, Commands};
use commands::{CommandContext, CommandError};

/// Environment variable holding the log filter; `RUST_LOG` is the fallback.
const ENV_LOG: &str = "FQL_LOG";

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                let error_json = serde_json::json!({
                    "error": {
                        "code": e.code(),
                        "message": e.to_string(),
                    }
                });
                eprintln!("{error_json:#}");
            } else {
                eprintln!("Error: {e}");
            }
            ExitCode::from(e.exit_code())
        }
    }
}

fn run(cli: &Cli) -> Result<(), CommandError> {
    let ctx = CommandContext::from_cli(cli);
    tracing::trace!(command = ?cli.command, "dispatching");

    match &cli.command {
        Commands::Parse { expression } => commands::parse::execute(&ctx, expression),
        Commands::Tokens { expression } => commands::tokens::execute(&ctx, expression),
        Commands::Eval { inputs, data } => commands::eval::execute(&ctx, inputs, data),
        Commands::Sql { inputs, dialect } => {
            commands::sql::execute(&ctx, inputs, (*dialect).into())
        }
    }
}

fn init_logging(cli: &Cli) {
    let default_filter = if cli.verbose { "debug" } else { "warn" };
    let filter = std::env::var(ENV_LOG)
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| default_filter.to_string());

    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_ansi(!cli.no_color)
        .with_writer(std::io::stderr)
        .compact()
        .with_env_filter(filter)
        .init();
}
