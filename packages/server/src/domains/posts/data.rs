//! API representations of posts and comments.

use serde::{Deserialize, Serialize};

use super::models::{Comment, Post};

/// Post row joined with its author's username, as read by the list/detail
/// queries.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PostRecord {
    pub id: crate::common::PostId,
    pub author_id: crate::common::UserId,
    pub author_username: String,
    pub title: String,
    pub content: String,
    pub status: super::models::ModerationStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Comment row joined with its author's username.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CommentRecord {
    pub id: crate::common::CommentId,
    pub post_id: crate::common::PostId,
    pub author_id: crate::common::UserId,
    pub author_username: String,
    pub content: String,
    pub status: super::models::ModerationStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// API representation of a post
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostData {
    pub id: String,
    pub author: String,
    pub title: String,
    pub content: String,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

/// API representation of a comment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentData {
    pub id: String,
    pub post_id: String,
    pub author: String,
    pub content: String,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<PostRecord> for PostData {
    fn from(record: PostRecord) -> Self {
        Self {
            id: record.id.to_string(),
            author: record.author_username,
            title: record.title,
            content: record.content,
            status: record.status.to_string(),
            created_at: record.created_at.to_rfc3339(),
            updated_at: record.updated_at.to_rfc3339(),
        }
    }
}

impl From<CommentRecord> for CommentData {
    fn from(record: CommentRecord) -> Self {
        Self {
            id: record.id.to_string(),
            post_id: record.post_id.to_string(),
            author: record.author_username,
            content: record.content,
            status: record.status.to_string(),
            created_at: record.created_at.to_rfc3339(),
            updated_at: record.updated_at.to_rfc3339(),
        }
    }
}

impl PostData {
    /// Build the response for content the author just created, where the
    /// author's username is already known from the authenticated request.
    pub fn from_post(post: Post, author_username: &str) -> Self {
        Self {
            id: post.id.to_string(),
            author: author_username.to_string(),
            title: post.title,
            content: post.content,
            status: post.status.to_string(),
            created_at: post.created_at.to_rfc3339(),
            updated_at: post.updated_at.to_rfc3339(),
        }
    }
}

impl CommentData {
    pub fn from_comment(comment: Comment, author_username: &str) -> Self {
        Self {
            id: comment.id.to_string(),
            post_id: comment.post_id.to_string(),
            author: author_username.to_string(),
            content: comment.content,
            status: comment.status.to_string(),
            created_at: comment.created_at.to_rfc3339(),
            updated_at: comment.updated_at.to_rfc3339(),
        }
    }
}
