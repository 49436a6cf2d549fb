//! service-core: Shared infrastructure for the coffeepush services.
pub mod config;
pub mod error;
pub mod middleware;
pub mod observability;

pub use axum;
pub use tokio;
pub use tower_http;
pub use tracing;
