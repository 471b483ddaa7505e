//! Users domain: registration, login, JWT issuance, auto-response policy.

pub mod actions;
pub mod jwt;
pub mod models;
pub mod password;
pub mod queries;

pub use actions::AuthError;
pub use jwt::{Claims, JwtService, TokenPair};
pub use models::User;
