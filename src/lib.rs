//! Turns free-text order lines into validated records and answers keyword
//! queries over them.

pub mod config;
pub mod constants;
pub mod demo_api;
pub mod error;
pub mod logging;
pub mod observability;
pub mod pipeline;
pub mod server;
pub mod types;

// Application use cases and the ports they depend on
pub mod app;
// Adapters implementing those ports
pub mod infra;
