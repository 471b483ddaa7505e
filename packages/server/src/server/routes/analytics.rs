//! Comment analytics endpoint.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::domains::posts::analytics::{daily_comment_stats, DailyCommentStats, DateRange};
use crate::kernel::ServerDeps;
use crate::server::error::ApiError;
use crate::server::middleware::AuthUser;

#[derive(Debug, Deserialize)]
pub struct AnalyticsQuery {
    pub date_from: String,
    pub date_to: String,
}

pub async fn daily_comments_handler(
    State(deps): State<Arc<ServerDeps>>,
    _auth: AuthUser,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<Vec<DailyCommentStats>>, ApiError> {
    let range = DateRange::parse(&query.date_from, &query.date_to)
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let stats = daily_comment_stats(&deps.db_pool, range).await?;
    Ok(Json(stats))
}
