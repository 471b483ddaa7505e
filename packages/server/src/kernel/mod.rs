//! Kernel: cross-domain infrastructure.
//!
//! Holds the dependency container and the background job machinery.
//! Business logic stays in `domains`.

mod deps;
pub mod jobs;

pub use deps::ServerDeps;
