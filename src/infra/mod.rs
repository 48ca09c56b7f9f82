// Adapters for the app-layer ports

pub mod http_client;
pub mod llm_normalizer;

pub use http_client::ReqwestOrderSource;
pub use llm_normalizer::OpenRouterNormalizer;
