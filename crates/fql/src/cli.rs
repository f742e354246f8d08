//! CLI argument parsing using clap derive macros.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use filterql_adapters::SqlDialect;

/// fql - compile and evaluate boolean filter expressions
#[derive(Parser, Debug)]
#[command(name = "fql")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compile an expression and print its canonical form
    #[command(alias = "p")]
    Parse {
        /// Combination expression (e.g., "a & (b | !c)")
        expression: String,
    },

    /// Print the token stream of an expression
    #[command(alias = "t")]
    Tokens {
        /// Combination expression
        expression: String,
    },

    /// Resolve a request and filter JSON records in memory
    #[command(alias = "e")]
    Eval {
        #[command(flatten)]
        inputs: RequestInputs,

        /// JSON file holding an array of records
        #[arg(short, long)]
        data: PathBuf,
    },

    /// Resolve a request into a parameterised SQL fragment
    Sql {
        #[command(flatten)]
        inputs: RequestInputs,

        /// Placeholder style
        #[arg(long, value_enum, default_value_t = DialectArg::Postgres)]
        dialect: DialectArg,
    },
}

/// Files every resolving command needs.
#[derive(clap::Args, Debug)]
pub struct RequestInputs {
    /// TOML property registry
    #[arg(short, long)]
    pub schema: PathBuf,

    /// JSON filter request (`filters` and `combineWith`)
    #[arg(short, long)]
    pub request: PathBuf,
}

/// SQL dialects selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DialectArg {
    Postgres,
    Sqlite,
}

impl From<DialectArg> for SqlDialect {
    fn from(arg: DialectArg) -> Self {
        match arg {
            DialectArg::Postgres => SqlDialect::Postgres,
            DialectArg::Sqlite => SqlDialect::Sqlite,
        }
    }
}
