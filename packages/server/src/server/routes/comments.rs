//! Comment endpoints.
//!
//! Same visibility rule as posts: reads only surface approved comments.
//! Creating a comment requires the parent post to be approved.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::common::{CommentId, PostId};
use crate::domains::posts::actions::{self, CommentInput};
use crate::domains::posts::data::CommentData;
use crate::domains::posts::queries;
use crate::kernel::ServerDeps;
use crate::server::error::ApiError;
use crate::server::middleware::AuthUser;

pub async fn list_comments_handler(
    State(deps): State<Arc<ServerDeps>>,
    Path(post_id): Path<PostId>,
) -> Result<Json<Vec<CommentData>>, ApiError> {
    // Pure filter: a pending/blocked/unknown post simply yields an empty list
    let records = queries::list_approved_comment_records(&deps.db_pool, post_id).await?;
    Ok(Json(records.into_iter().map(CommentData::from).collect()))
}

pub async fn get_comment_handler(
    State(deps): State<Arc<ServerDeps>>,
    Path(comment_id): Path<CommentId>,
) -> Result<Json<CommentData>, ApiError> {
    let record = queries::get_approved_comment_record(&deps.db_pool, comment_id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(record.into()))
}

pub async fn create_comment_handler(
    State(deps): State<Arc<ServerDeps>>,
    auth: AuthUser,
    Path(post_id): Path<PostId>,
    Json(input): Json<CommentInput>,
) -> Result<(StatusCode, Json<CommentData>), ApiError> {
    let comment = actions::create_comment(
        &deps.db_pool,
        deps.job_queue.as_ref(),
        auth.user_id,
        post_id,
        input,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(CommentData::from_comment(comment, &auth.username)),
    ))
}

pub async fn update_comment_handler(
    State(deps): State<Arc<ServerDeps>>,
    auth: AuthUser,
    Path(comment_id): Path<CommentId>,
    Json(input): Json<CommentInput>,
) -> Result<Json<CommentData>, ApiError> {
    let comment =
        actions::update_comment(&deps.db_pool, auth.user_id, comment_id, input).await?;
    Ok(Json(CommentData::from_comment(comment, &auth.username)))
}

pub async fn delete_comment_handler(
    State(deps): State<Arc<ServerDeps>>,
    auth: AuthUser,
    Path(comment_id): Path<CommentId>,
) -> Result<StatusCode, ApiError> {
    actions::delete_comment(&deps.db_pool, auth.user_id, comment_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
