use serde_json::Value;
use tracing::error;

use crate::error::ValidationError;

pub mod fallback;

pub use fallback::FallbackNormalizer;

/// An untyped record proposed by a normalizer and not yet validated.
///
/// Expected keys are `orderId`, `buyer`, `state` and `total`, but nothing is
/// guaranteed until the record passes schema validation.
pub type CandidateOrder = Value;

/// What the primary normalizer's text turned out to be.
#[derive(Debug, Clone, PartialEq)]
pub enum PrimaryOutcome {
    /// The text was well-formed JSON. Its shape is still unchecked.
    Decoded(Value),
    /// The text was not JSON at all; the raw text is kept for diagnostics.
    MalformedOutput(String),
}

impl PrimaryOutcome {
    /// Classifies the primary normalizer's reply. Only a decode failure
    /// produces `MalformedOutput`; a well-formed but wrongly shaped reply
    /// is `Decoded` and left for validation to reject.
    pub fn classify(text: String) -> Self {
        match serde_json::from_str::<Value>(&text) {
            Ok(value) => PrimaryOutcome::Decoded(value),
            Err(e) => {
                error!("Primary normalizer returned invalid JSON, falling back: {}", e);
                PrimaryOutcome::MalformedOutput(text)
            }
        }
    }
}

/// Unwraps a decoded reply into its candidate list.
pub fn candidates_from_json(value: Value) -> Result<Vec<CandidateOrder>, ValidationError> {
    match value {
        Value::Array(items) => Ok(items),
        _ => Err(ValidationError::NotAnArray),
    }
}
