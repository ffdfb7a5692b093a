use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use validator::Validate;

use application::{services::CreateUserRequest, UserDto};

use crate::{error::ApiError, state::AppState};

#[derive(Debug, Deserialize, Validate)]
struct CreateUserPayload {
    #[validate(length(min = 1, message = "cannot be empty"))]
    username: String,
    #[validate(length(min = 1, message = "cannot be empty"))]
    password: String,
    #[validate(email)]
    email: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(create_user))
        .route("/users/{username}", get(get_user_by_username))
        .route("/users/id/{id}", get(get_user_by_id))
}

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserPayload>, JsonRejection>,
) -> Result<Json<UserDto>, ApiError> {
    // 请求体绑定失败和字段校验失败都以 400 终止处理
    let Json(payload) = payload.map_err(|err| ApiError::bad_request(err.body_text()))?;
    payload
        .validate()
        .map_err(|err| ApiError::bad_request(err.to_string()))?;

    let dto = state
        .user_service
        .create_user(CreateUserRequest {
            username: payload.username,
            email: payload.email,
            password: payload.password,
        })
        .await?;

    Ok(Json(dto))
}

async fn get_user_by_username(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<UserDto>, ApiError> {
    let dto = state.user_service.get_by_username(username).await?;
    Ok(Json(dto))
}

async fn get_user_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<UserDto>, ApiError> {
    let dto = state.user_service.get_by_id(id).await?;
    Ok(Json(dto))
}
