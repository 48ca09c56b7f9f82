use thiserror::Error;

/// A candidate order that could not be coerced into a `NormalizedOrder`.
///
/// Validation is all-or-nothing, so a single one of these fails the batch.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Schema validation failed: normalizer output is not a JSON array")]
    NotAnArray,

    #[error("Schema validation failed: candidate {index} is not a JSON object")]
    NotAnObject { index: usize },

    #[error("Schema validation failed: candidate {index} is missing field '{field}'")]
    MissingField { index: usize, field: &'static str },

    #[error("Schema validation failed: candidate {index} has invalid '{field}': {reason}")]
    InvalidField {
        index: usize,
        field: &'static str,
        reason: String,
    },
}

/// Failures of the primary normalizer call itself (not of its output).
#[derive(Error, Debug)]
pub enum NormalizerError {
    #[error("Primary normalizer request failed: {0}")]
    Transport(String),

    #[error("Primary normalizer timed out after {0}s")]
    Timeout(u64),

    #[error("Primary normalizer rejected credentials ({status})")]
    Unauthorized { status: u16 },

    #[error("Primary normalizer API error ({status}): {body}")]
    Upstream { status: u16, body: String },

    #[error("Primary normalizer returned an unexpected response: {0}")]
    InvalidResponse(String),
}

impl NormalizerError {
    /// Transport errors, timeouts, rate limiting and 5xx responses are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            NormalizerError::Transport(_) | NormalizerError::Timeout(_) => true,
            NormalizerError::Upstream { status, .. } => *status == 429 || *status >= 500,
            NormalizerError::Unauthorized { .. } | NormalizerError::InvalidResponse(_) => false,
        }
    }
}

impl From<reqwest::Error> for NormalizerError {
    fn from(err: reqwest::Error) -> Self {
        NormalizerError::Transport(err.to_string())
    }
}

#[derive(Error, Debug)]
pub enum AgentError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    PrimaryNormalizer(#[from] NormalizerError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AgentError>;
