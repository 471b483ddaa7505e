pub mod analytics;
pub mod auth;
pub mod comments;
pub mod health;
pub mod posts;
