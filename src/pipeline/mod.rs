// Order pipeline: normalization, validation, filtering and aggregation

pub mod processing;

pub use processing::aggregate::{aggregate, AggregateModel};
pub use processing::filter::QueryFilter;
pub use processing::normalize::{CandidateOrder, FallbackNormalizer, PrimaryOutcome};
pub use processing::validate::validate_batch;
