//! User Directory HTTP Routes
//!
//! Thin mapping from HTTP requests onto [`DirectoryService`] calls.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;

use crate::model::UserInput;
use crate::query::ListParams;
use crate::service::{DeleteResponse, DirectoryService, ResetResponse, SingleResponse};

use super::errors::{ApiError, ApiResult};

// ==================
// Shared State
// ==================

/// State shared across user handlers
pub struct UserState {
    pub service: DirectoryService,
}

impl UserState {
    pub fn new(service: DirectoryService) -> Self {
        Self { service }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub backend: &'static str,
    pub version: &'static str,
}

// ==================
// Routers
// ==================

/// Root and health routes
pub fn health_routes(state: Arc<UserState>) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

/// User routes, to be nested under `/api/users`
pub fn user_routes(state: Arc<UserState>) -> Router {
    Router::new()
        .route("/", get(list_users_handler).post(create_user_handler))
        .route("/reset-db", get(reset_handler))
        .route(
            "/:id",
            get(get_user_handler)
                .put(update_user_handler)
                .delete(delete_user_handler),
        )
        .with_state(state)
}

// ==================
// Handlers
// ==================

async fn root_handler() -> &'static str {
    "API is running"
}

async fn health_handler(State(state): State<Arc<UserState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        backend: state.service.backend_kind().as_str(),
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// List users; repeated `hobbies` keys are all kept
async fn list_users_handler(
    State(state): State<Arc<UserState>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> impl IntoResponse {
    let params = ListParams::from_pairs(pairs);
    Json(state.service.list(&params).await)
}

async fn get_user_handler(
    State(state): State<Arc<UserState>>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let user = state.service.get(&id).await?;
    Ok(Json(SingleResponse::new(user)))
}

async fn create_user_handler(
    State(state): State<Arc<UserState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let input = read_input(body)?;
    let user = state.service.create(input).await?;
    Ok((StatusCode::CREATED, Json(SingleResponse::new(user))))
}

async fn update_user_handler(
    State(state): State<Arc<UserState>>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let input = read_input(body)?;
    let user = state.service.update(&id, input).await?;
    Ok(Json(SingleResponse::new(user)))
}

async fn delete_user_handler(
    State(state): State<Arc<UserState>>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    state.service.delete(&id).await?;
    Ok(Json(DeleteResponse::success()))
}

async fn reset_handler(State(state): State<Arc<UserState>>) -> ApiResult<impl IntoResponse> {
    state.service.reset().await?;
    Ok(Json(ResetResponse::success()))
}

fn read_input(body: Result<Json<Value>, JsonRejection>) -> ApiResult<UserInput> {
    let Json(value) = body.map_err(|e| ApiError::InvalidBody(e.body_text()))?;
    if !value.is_object() {
        return Err(ApiError::InvalidBody("expected a JSON object".to_string()));
    }
    Ok(UserInput::from_json(&value))
}
