//! Post endpoints.
//!
//! Reads are public and only ever see approved posts. Writes require
//! authentication; newly created posts come back as pending and disappear
//! from the read endpoints until moderation approves them.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::common::PostId;
use crate::domains::posts::actions::{self, PostInput};
use crate::domains::posts::data::PostData;
use crate::domains::posts::queries;
use crate::kernel::ServerDeps;
use crate::server::error::ApiError;
use crate::server::middleware::AuthUser;

pub async fn list_posts_handler(
    State(deps): State<Arc<ServerDeps>>,
) -> Result<Json<Vec<PostData>>, ApiError> {
    let records = queries::list_approved_post_records(&deps.db_pool).await?;
    Ok(Json(records.into_iter().map(PostData::from).collect()))
}

pub async fn get_post_handler(
    State(deps): State<Arc<ServerDeps>>,
    Path(post_id): Path<PostId>,
) -> Result<Json<PostData>, ApiError> {
    let record = queries::get_approved_post_record(&deps.db_pool, post_id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(record.into()))
}

pub async fn create_post_handler(
    State(deps): State<Arc<ServerDeps>>,
    auth: AuthUser,
    Json(input): Json<PostInput>,
) -> Result<(StatusCode, Json<PostData>), ApiError> {
    let post =
        actions::create_post(&deps.db_pool, deps.job_queue.as_ref(), auth.user_id, input).await?;

    Ok((
        StatusCode::CREATED,
        Json(PostData::from_post(post, &auth.username)),
    ))
}

pub async fn update_post_handler(
    State(deps): State<Arc<ServerDeps>>,
    auth: AuthUser,
    Path(post_id): Path<PostId>,
    Json(input): Json<PostInput>,
) -> Result<Json<PostData>, ApiError> {
    let post = actions::update_post(&deps.db_pool, auth.user_id, post_id, input).await?;
    Ok(Json(PostData::from_post(post, &auth.username)))
}

pub async fn delete_post_handler(
    State(deps): State<Arc<ServerDeps>>,
    auth: AuthUser,
    Path(post_id): Path<PostId>,
) -> Result<StatusCode, ApiError> {
    actions::delete_post(&deps.db_pool, auth.user_id, post_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
