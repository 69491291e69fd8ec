//! Error taxonomy for the rewriting engine
//!
//! Four failure classes with different blast radii:
//! - `ConfigError` — fatal, rejected before any operator runs
//! - `OperatorError` — isolated to one operator; the engine keeps the
//!   pre-operator text and continues
//! - `CapabilityError` — an external collaborator (rewrite backend,
//!   paraphraser, thesaurus source) failed; surfaced to the owning operator
//!   and absorbed there
//! - `OracleError` — scoring failed or the scoring model could not be
//!   constructed; the controller records the cycle as failed and the oracle
//!   factory degrades to the heuristic scorer

use thiserror::Error;

/// Invalid pipeline configuration. The only error class that reaches callers.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("stealth level must be between 1 and 5, got {0}")]
    LevelOutOfRange(u8),

    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {message}")]
    Parse { path: String, message: String },
}

/// Failure of an external collaborator behind a capability trait.
#[derive(Error, Debug)]
pub enum CapabilityError {
    #[error("missing API key: {env_var} not set")]
    MissingApiKey { env_var: String },

    #[error("{backend} request failed: {message}")]
    RequestFailed { backend: String, message: String },

    #[error("{backend} returned {status}: {message}")]
    ApiError {
        backend: String,
        status: u16,
        message: String,
    },

    #[error("failed to parse backend response: {0}")]
    ParseError(String),

    /// Every backend in an ordered fallback chain failed.
    #[error("all {attempted} backend(s) failed: {summary}")]
    AllBackendsFailed { attempted: usize, summary: String },

    #[error("capability unavailable: {0}")]
    Unavailable(&'static str),
}

/// Failure of a single mutation operator. Never aborts a pipeline run.
#[derive(Error, Debug)]
pub enum OperatorError {
    #[error("{operator}: {message}")]
    Failed {
        operator: &'static str,
        message: String,
    },

    #[error("{operator}: external service failed")]
    External {
        operator: &'static str,
        #[source]
        source: CapabilityError,
    },
}

impl OperatorError {
    pub fn failed(operator: &'static str, message: impl Into<String>) -> Self {
        Self::Failed {
            operator,
            message: message.into(),
        }
    }
}

/// Failure inside a quality oracle.
#[derive(Error, Debug)]
pub enum OracleError {
    /// The heavy scoring model could not be constructed. Sticky for the
    /// process lifetime; callers switch to the heuristic scorer.
    #[error("scoring model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("scoring failed: {0}")]
    ScoreFailed(String),
}
