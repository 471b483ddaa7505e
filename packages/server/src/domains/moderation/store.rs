//! Persistence seam for the moderation pipeline.
//!
//! The pipeline talks to storage through [`ModerationStore`] so its logic can
//! be exercised against an in-memory fake. [`PostgresModerationStore`] is the
//! production implementation, delegating to the posts/users query modules.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;

use crate::common::{CommentId, PostId, UserId};
use crate::domains::posts::models::{Comment, ModerationStatus, Post};
use crate::domains::posts::queries as post_queries;
use crate::domains::users::queries as user_queries;

/// A post author's auto-response settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoResponsePolicy {
    pub enabled: bool,
    /// Minutes to wait before posting the auto-response
    pub delay_minutes: i32,
}

#[async_trait]
pub trait ModerationStore: Send + Sync {
    async fn post_by_id(&self, id: PostId) -> Result<Option<Post>>;
    async fn comment_by_id(&self, id: CommentId) -> Result<Option<Comment>>;
    async fn set_post_status(&self, id: PostId, status: ModerationStatus) -> Result<()>;
    async fn set_comment_status(&self, id: CommentId, status: ModerationStatus) -> Result<()>;
    /// Auto-response settings for a user, or `None` if the user is gone.
    async fn auto_response_policy(&self, user_id: UserId) -> Result<Option<AutoResponsePolicy>>;
    /// Insert an auto-response comment, already approved, authored by the
    /// post author.
    async fn insert_approved_comment(
        &self,
        post_id: PostId,
        author_id: UserId,
        content: &str,
    ) -> Result<Comment>;
}

pub struct PostgresModerationStore {
    db: PgPool,
}

impl PostgresModerationStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ModerationStore for PostgresModerationStore {
    async fn post_by_id(&self, id: PostId) -> Result<Option<Post>> {
        post_queries::get_post(&self.db, id).await
    }

    async fn comment_by_id(&self, id: CommentId) -> Result<Option<Comment>> {
        post_queries::get_comment(&self.db, id).await
    }

    async fn set_post_status(&self, id: PostId, status: ModerationStatus) -> Result<()> {
        post_queries::set_post_status(&self.db, id, status).await
    }

    async fn set_comment_status(&self, id: CommentId, status: ModerationStatus) -> Result<()> {
        post_queries::set_comment_status(&self.db, id, status).await
    }

    async fn auto_response_policy(&self, user_id: UserId) -> Result<Option<AutoResponsePolicy>> {
        let user = user_queries::find_by_id(&self.db, user_id).await?;
        Ok(user.map(|u| AutoResponsePolicy {
            enabled: u.auto_response_enabled,
            delay_minutes: u.auto_response_delay,
        }))
    }

    async fn insert_approved_comment(
        &self,
        post_id: PostId,
        author_id: UserId,
        content: &str,
    ) -> Result<Comment> {
        post_queries::insert_comment(
            &self.db,
            post_id,
            author_id,
            content,
            ModerationStatus::Approved,
        )
        .await
    }
}
