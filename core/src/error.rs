use thiserror::Error;
use uuid::Uuid;

/// Errors surfaced by the footprint engine.
#[derive(Error, Debug)]
pub enum EcoError {
    #[error("invalid quantity for {input}: {value}")]
    InvalidInput { input: String, value: f64 },

    #[error("unknown activity input: {0}")]
    UnknownInput(String),

    #[error("ambiguous activity input {key}: matches {}", .matches.join(", "))]
    AmbiguousInput { key: String, matches: Vec<String> },

    #[error("challenge not found: {0}")]
    ChallengeNotFound(Uuid),

    #[error("persistence failed: {0}")]
    Persistence(#[source] anyhow::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl EcoError {
    pub fn invalid_input(input: impl Into<String>, value: f64) -> Self {
        EcoError::InvalidInput {
            input: input.into(),
            value,
        }
    }

    /// True for failures where the in-memory state is still authoritative.
    pub fn is_degraded(&self) -> bool {
        matches!(self, EcoError::Persistence(_))
    }
}

pub type EcoResult<T> = std::result::Result<T, EcoError>;
