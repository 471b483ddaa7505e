use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::{CommentId, PostId, UserId};

/// Moderation lifecycle state shared by posts and comments.
///
/// New content starts as `Pending` and is only readable once the pipeline
/// promotes it to `Approved`. `Blocked` content stays stored but is never
/// served.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "moderation_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ModerationStatus {
    Pending,
    Approved,
    Blocked,
}

impl ModerationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModerationStatus::Pending => "pending",
            ModerationStatus::Approved => "approved",
            ModerationStatus::Blocked => "blocked",
        }
    }
}

impl std::fmt::Display for ModerationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Post {
    pub id: PostId,
    pub author_id: UserId,
    pub title: String,
    pub content: String,
    pub status: ModerationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Comment {
    pub id: CommentId,
    pub post_id: PostId,
    pub author_id: UserId,
    pub content: String,
    pub status: ModerationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_display_matches_db_labels() {
        assert_eq!(ModerationStatus::Pending.to_string(), "pending");
        assert_eq!(ModerationStatus::Approved.to_string(), "approved");
        assert_eq!(ModerationStatus::Blocked.to_string(), "blocked");
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&ModerationStatus::Approved).unwrap();
        assert_eq!(json, "\"approved\"");
    }
}
