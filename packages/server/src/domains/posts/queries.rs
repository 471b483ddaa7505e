//! Database access for posts and comments.
//!
//! The `*_approved_*` functions implement the read-side visibility rule:
//! only approved content is ever returned to API consumers. The unfiltered
//! getters exist for the moderation pipeline and for ownership checks.

use anyhow::{Context, Result};
use sqlx::PgPool;

use crate::common::{CommentId, PostId, UserId};

use super::data::{CommentRecord, PostRecord};
use super::models::{Comment, ModerationStatus, Post};

const POST_RECORD_SELECT: &str = r#"
    SELECT p.id, p.author_id, u.username AS author_username,
           p.title, p.content, p.status, p.created_at, p.updated_at
    FROM posts p
    JOIN users u ON u.id = p.author_id
"#;

const COMMENT_RECORD_SELECT: &str = r#"
    SELECT c.id, c.post_id, c.author_id, u.username AS author_username,
           c.content, c.status, c.created_at, c.updated_at
    FROM comments c
    JOIN users u ON u.id = c.author_id
"#;

pub async fn insert_post(
    pool: &PgPool,
    author_id: UserId,
    title: &str,
    content: &str,
) -> Result<Post> {
    sqlx::query_as::<_, Post>(
        r#"
        INSERT INTO posts (id, author_id, title, content, status)
        VALUES ($1, $2, $3, $4, 'pending')
        RETURNING *
        "#,
    )
    .bind(PostId::new())
    .bind(author_id)
    .bind(title)
    .bind(content)
    .fetch_one(pool)
    .await
    .context("failed to insert post")
}

/// Fetch a post regardless of status.
pub async fn get_post(pool: &PgPool, id: PostId) -> Result<Option<Post>> {
    sqlx::query_as::<_, Post>("SELECT * FROM posts WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch post")
}

pub async fn get_approved_post_record(pool: &PgPool, id: PostId) -> Result<Option<PostRecord>> {
    let sql = format!("{POST_RECORD_SELECT} WHERE p.id = $1 AND p.status = 'approved'");
    sqlx::query_as::<_, PostRecord>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch approved post")
}

pub async fn list_approved_post_records(pool: &PgPool) -> Result<Vec<PostRecord>> {
    let sql = format!("{POST_RECORD_SELECT} WHERE p.status = 'approved' ORDER BY p.created_at DESC");
    sqlx::query_as::<_, PostRecord>(&sql)
        .fetch_all(pool)
        .await
        .context("failed to list approved posts")
}

pub async fn update_post(
    pool: &PgPool,
    id: PostId,
    title: &str,
    content: &str,
) -> Result<Option<Post>> {
    sqlx::query_as::<_, Post>(
        r#"
        UPDATE posts
        SET title = $2, content = $3, updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(title)
    .bind(content)
    .fetch_optional(pool)
    .await
    .context("failed to update post")
}

pub async fn delete_post(pool: &PgPool, id: PostId) -> Result<bool> {
    let result = sqlx::query("DELETE FROM posts WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .context("failed to delete post")?;
    Ok(result.rows_affected() > 0)
}

pub async fn set_post_status(pool: &PgPool, id: PostId, status: ModerationStatus) -> Result<()> {
    sqlx::query("UPDATE posts SET status = $2, updated_at = NOW() WHERE id = $1")
        .bind(id)
        .bind(status)
        .execute(pool)
        .await
        .context("failed to update post status")?;
    Ok(())
}

pub async fn insert_comment(
    pool: &PgPool,
    post_id: PostId,
    author_id: UserId,
    content: &str,
    status: ModerationStatus,
) -> Result<Comment> {
    sqlx::query_as::<_, Comment>(
        r#"
        INSERT INTO comments (id, post_id, author_id, content, status)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(CommentId::new())
    .bind(post_id)
    .bind(author_id)
    .bind(content)
    .bind(status)
    .fetch_one(pool)
    .await
    .context("failed to insert comment")
}

/// Fetch a comment regardless of status.
pub async fn get_comment(pool: &PgPool, id: CommentId) -> Result<Option<Comment>> {
    sqlx::query_as::<_, Comment>("SELECT * FROM comments WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch comment")
}

pub async fn get_approved_comment_record(
    pool: &PgPool,
    id: CommentId,
) -> Result<Option<CommentRecord>> {
    let sql = format!("{COMMENT_RECORD_SELECT} WHERE c.id = $1 AND c.status = 'approved'");
    sqlx::query_as::<_, CommentRecord>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch approved comment")
}

pub async fn list_approved_comment_records(
    pool: &PgPool,
    post_id: PostId,
) -> Result<Vec<CommentRecord>> {
    let sql = format!(
        "{COMMENT_RECORD_SELECT} WHERE c.post_id = $1 AND c.status = 'approved' ORDER BY c.created_at ASC"
    );
    sqlx::query_as::<_, CommentRecord>(&sql)
        .bind(post_id)
        .fetch_all(pool)
        .await
        .context("failed to list approved comments")
}

pub async fn update_comment(
    pool: &PgPool,
    id: CommentId,
    content: &str,
) -> Result<Option<Comment>> {
    sqlx::query_as::<_, Comment>(
        r#"
        UPDATE comments
        SET content = $2, updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(content)
    .fetch_optional(pool)
    .await
    .context("failed to update comment")
}

pub async fn delete_comment(pool: &PgPool, id: CommentId) -> Result<bool> {
    let result = sqlx::query("DELETE FROM comments WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .context("failed to delete comment")?;
    Ok(result.rows_affected() > 0)
}

pub async fn set_comment_status(
    pool: &PgPool,
    id: CommentId,
    status: ModerationStatus,
) -> Result<()> {
    sqlx::query("UPDATE comments SET status = $2, updated_at = NOW() WHERE id = $1")
        .bind(id)
        .bind(status)
        .execute(pool)
        .await
        .context("failed to update comment status")?;
    Ok(())
}
