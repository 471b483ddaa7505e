use chrono::{DateTime, Utc};

use crate::common::UserId;

/// Registered user.
///
/// `auto_response_enabled` and `auto_response_delay` are the policy knobs
/// consumed by the moderation pipeline when deciding whether to schedule an
/// auto-reply to an approved comment. The pipeline never mutates them.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub is_active: bool,
    pub auto_response_enabled: bool,
    /// Delay before the auto-response job runs, in minutes (>= 0)
    pub auto_response_delay: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
