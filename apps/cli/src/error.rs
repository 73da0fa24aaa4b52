//! # CLI Error Type
//!
//! Everything that can stop the command before it prints a summary.
//!
//! ```text
//!   read input ──── io::Error ─────────┐
//!   parse JSON ──── serde_json::Error ─┤
//!   edit draft ──── CoreError ─────────┼──► CliError ──► stderr, exit 1
//!   arguments ───── Usage ─────────────┘
//! ```

use factura_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Cannot read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid document JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("{0}")]
    Usage(String),
}

pub type CliResult<T> = Result<T, CliError>;
