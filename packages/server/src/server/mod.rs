//! HTTP server: routing, middleware, and error mapping.

pub mod app;
pub mod error;
pub mod middleware;
pub mod routes;

pub use app::build_app;
pub use error::ApiError;
