//! Command implementations for the fql CLI.

pub mod eval;
pub mod parse;
pub mod sql;
pub mod tokens;

use std::fs;
use std::path::Path;

use filterql_core::{FilterError, FilterRequest, PropertyRegistry, RawFilterRequest};

use crate::cli::{Cli, RequestInputs};

/// Error type for command execution.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Expression or filter error.
    #[error("{0}")]
    Filter(#[from] FilterError),

    /// Input file could not be read.
    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Input file is not the JSON we expected.
    #[error("invalid JSON in {path}: {source}")]
    Input {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// Serialization error.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CommandError {
    /// Returns the error code string for JSON output.
    pub fn code(&self) -> &'static str {
        match self {
            CommandError::Filter(FilterError::InvalidConfig(_))
            | CommandError::Filter(FilterError::EmptyOperatorSet { .. }) => "CONFIG_ERROR",
            CommandError::Filter(e) if e.is_syntax_error() => "SYNTAX_ERROR",
            CommandError::Filter(_) => "VALIDATION_ERROR",
            CommandError::Read { .. } => "IO_ERROR",
            CommandError::Input { .. } => "INPUT_ERROR",
            CommandError::Json(_) => "JSON_ERROR",
        }
    }

    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            CommandError::Filter(FilterError::InvalidConfig(_))
            | CommandError::Filter(FilterError::EmptyOperatorSet { .. }) => 5,
            CommandError::Filter(e) if e.is_syntax_error() => 1,
            CommandError::Filter(_) => 2,
            CommandError::Read { .. } | CommandError::Input { .. } => 3,
            CommandError::Json(_) => 1,
        }
    }
}

/// Result type for command execution.
pub type Result<T> = std::result::Result<T, CommandError>;

/// Context for command execution, containing output settings.
pub struct CommandContext {
    /// Whether to output JSON.
    pub json_output: bool,
    /// Whether to use colors.
    pub use_colors: bool,
    /// Whether to be quiet (errors only).
    pub quiet: bool,
}

impl CommandContext {
    /// Creates a new command context from CLI arguments.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            json_output: cli.json,
            use_colors: !cli.no_color,
            quiet: cli.quiet,
        }
    }
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| CommandError::Read {
        path: path.display().to_string(),
        source,
    })
}

/// Reads and parses a JSON file.
pub(crate) fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = read_file(path)?;
    serde_json::from_str(&contents).map_err(|source| CommandError::Input {
        path: path.display().to_string(),
        source,
    })
}

/// Loads the registry and resolves the request against it.
///
/// Syntax errors in `combineWith` are reported before unknown properties.
pub(crate) fn load_request(inputs: &RequestInputs) -> Result<FilterRequest> {
    let registry = PropertyRegistry::from_toml_str(&read_file(&inputs.schema)?)?;
    let raw: RawFilterRequest = read_json(&inputs.request)?;
    tracing::debug!(
        properties = registry.len(),
        filters = raw.filters.len(),
        "loaded request"
    );
    Ok(registry.resolve_request(&raw)?)
}
