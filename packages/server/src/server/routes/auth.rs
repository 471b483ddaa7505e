//! Registration, login, and token refresh endpoints.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::domains::users::actions::{self, LoginInput, RegisterInput};
use crate::kernel::ServerDeps;
use crate::server::error::ApiError;

pub async fn register_handler(
    State(deps): State<Arc<ServerDeps>>,
    Json(input): Json<RegisterInput>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let (user, tokens) = actions::register(&deps.db_pool, &deps.jwt_service, input).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "id": user.id.to_string(),
            "username": user.username,
            "email": user.email,
            "access": tokens.access,
            "refresh": tokens.refresh,
        })),
    ))
}

pub async fn login_handler(
    State(deps): State<Arc<ServerDeps>>,
    Json(input): Json<LoginInput>,
) -> Result<Json<Value>, ApiError> {
    let (_user, tokens) = actions::login(&deps.db_pool, &deps.jwt_service, input).await?;

    Ok(Json(json!({
        "access": tokens.access,
        "refresh": tokens.refresh,
    })))
}

#[derive(Debug, Deserialize)]
pub struct RefreshInput {
    pub refresh: String,
}

pub async fn refresh_handler(
    State(deps): State<Arc<ServerDeps>>,
    Json(input): Json<RefreshInput>,
) -> Result<Json<Value>, ApiError> {
    let access = actions::refresh(&deps.jwt_service, &input.refresh).await?;
    Ok(Json(json!({ "access": access })))
}
