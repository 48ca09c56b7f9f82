pub mod ports;
pub mod resilience;
pub mod query_use_case;

pub use query_use_case::QueryUseCase;
