//! Posts domain: posts, comments, and comment analytics.
//!
//! Everything a reader sees goes through the approved-only queries; new
//! content enters as pending and is promoted (or blocked) by the moderation
//! pipeline.

pub mod actions;
pub mod analytics;
pub mod data;
pub mod models;
pub mod queries;

pub use actions::PostError;
pub use models::{Comment, ModerationStatus, Post};
