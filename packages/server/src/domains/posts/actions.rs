//! Write-side operations for posts and comments.
//!
//! Creation persists content as pending and enqueues exactly one moderation
//! job; the HTTP response returns before any classification happens.

use anyhow::Context;
use serde::Deserialize;
use sqlx::PgPool;
use tracing::info;

use crate::common::{CommentId, PostId, UserId};
use crate::domains::moderation::jobs::{ModerateCommentJob, ModeratePostJob};
use crate::kernel::jobs::{JobQueue, JobQueueExt};

use super::models::{Comment, ModerationStatus, Post};
use super::queries;

#[derive(Debug, thiserror::Error)]
pub enum PostError {
    #[error("{0}")]
    Validation(String),
    #[error("not found")]
    NotFound,
    #[error("you do not have permission to modify this content")]
    Forbidden,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Debug, Deserialize)]
pub struct PostInput {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct CommentInput {
    pub content: String,
}

fn validate_post_input(input: &PostInput) -> Result<(), PostError> {
    if input.title.trim().is_empty() {
        return Err(PostError::Validation("title must not be empty".to_string()));
    }
    if input.content.trim().is_empty() {
        return Err(PostError::Validation("content must not be empty".to_string()));
    }
    Ok(())
}

/// Create a post as pending and enqueue its moderation job.
pub async fn create_post(
    pool: &PgPool,
    job_queue: &dyn JobQueue,
    author_id: UserId,
    input: PostInput,
) -> Result<Post, PostError> {
    validate_post_input(&input)?;

    let post = queries::insert_post(pool, author_id, &input.title, &input.content).await?;

    job_queue
        .enqueue(&ModeratePostJob { post_id: post.id })
        .await
        .context("failed to enqueue post moderation")?;

    info!(post_id = %post.id, author_id = %author_id, "created pending post");
    Ok(post)
}

/// Create a comment on an approved post and enqueue its moderation job.
///
/// Commenting on a pending or blocked post is rejected outright, as is
/// commenting on a post that does not exist.
pub async fn create_comment(
    pool: &PgPool,
    job_queue: &dyn JobQueue,
    author_id: UserId,
    post_id: PostId,
    input: CommentInput,
) -> Result<Comment, PostError> {
    if input.content.trim().is_empty() {
        return Err(PostError::Validation("content must not be empty".to_string()));
    }

    let Some(post) = queries::get_post(pool, post_id).await? else {
        return Err(PostError::NotFound);
    };
    if post.status != ModerationStatus::Approved {
        return Err(PostError::Validation(
            "You can't comment on a post that is not approved.".to_string(),
        ));
    }

    let comment =
        queries::insert_comment(pool, post_id, author_id, &input.content, ModerationStatus::Pending)
            .await?;

    job_queue
        .enqueue(&ModerateCommentJob { comment_id: comment.id })
        .await
        .context("failed to enqueue comment moderation")?;

    info!(comment_id = %comment.id, post_id = %post_id, "created pending comment");
    Ok(comment)
}

/// Update an approved post owned by the caller.
pub async fn update_post(
    pool: &PgPool,
    author_id: UserId,
    post_id: PostId,
    input: PostInput,
) -> Result<Post, PostError> {
    validate_post_input(&input)?;

    let Some(existing) = queries::get_approved_post_record(pool, post_id).await? else {
        return Err(PostError::NotFound);
    };
    if existing.author_id != author_id {
        return Err(PostError::Forbidden);
    }

    queries::update_post(pool, post_id, &input.title, &input.content)
        .await?
        .ok_or(PostError::NotFound)
}

pub async fn delete_post(
    pool: &PgPool,
    author_id: UserId,
    post_id: PostId,
) -> Result<(), PostError> {
    let Some(existing) = queries::get_approved_post_record(pool, post_id).await? else {
        return Err(PostError::NotFound);
    };
    if existing.author_id != author_id {
        return Err(PostError::Forbidden);
    }

    if !queries::delete_post(pool, post_id).await? {
        return Err(PostError::NotFound);
    }
    Ok(())
}

/// Update an approved comment owned by the caller.
pub async fn update_comment(
    pool: &PgPool,
    author_id: UserId,
    comment_id: CommentId,
    input: CommentInput,
) -> Result<Comment, PostError> {
    if input.content.trim().is_empty() {
        return Err(PostError::Validation("content must not be empty".to_string()));
    }

    let Some(existing) = queries::get_approved_comment_record(pool, comment_id).await? else {
        return Err(PostError::NotFound);
    };
    if existing.author_id != author_id {
        return Err(PostError::Forbidden);
    }

    queries::update_comment(pool, comment_id, &input.content)
        .await?
        .ok_or(PostError::NotFound)
}

pub async fn delete_comment(
    pool: &PgPool,
    author_id: UserId,
    comment_id: CommentId,
) -> Result<(), PostError> {
    let Some(existing) = queries::get_approved_comment_record(pool, comment_id).await? else {
        return Err(PostError::NotFound);
    };
    if existing.author_id != author_id {
        return Err(PostError::Forbidden);
    }

    if !queries::delete_comment(pool, comment_id).await? {
        return Err(PostError::NotFound);
    }
    Ok(())
}
