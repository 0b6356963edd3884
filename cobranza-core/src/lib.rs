//! cobranza-core: Shared infrastructure for the cobranza services.
pub mod config;
pub mod error;
pub mod observability;

pub use axum;
pub use serde;
pub use tracing;
