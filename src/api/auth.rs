use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::json;

use crate::api::{response::ApiError, AppState};
use crate::auth::{AuthUser, Credentials, Signup};

/// Resolves the acting user from the `Authorization: Bearer` header, if
/// any. A missing or stale token is simply "no user"; the repository
/// decides which operations require one.
pub async fn acting_user(state: &AppState, headers: &HeaderMap) -> Option<AuthUser> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))?;

    state.auth.current_user(token).await
}

pub async fn sign_up(
    State(state): State<AppState>,
    Json(payload): Json<Signup>,
) -> Result<impl IntoResponse, ApiError> {
    let session = state.auth.sign_up(payload).await?;
    Ok((StatusCode::CREATED, Json(json!(session))))
}

pub async fn sign_in(
    State(state): State<AppState>,
    Json(payload): Json<Credentials>,
) -> Result<impl IntoResponse, ApiError> {
    let session = state.auth.sign_in(payload).await?;
    Ok(Json(json!(session)))
}

pub async fn sign_out(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(token) = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
    {
        state.auth.sign_out(token).await?;
    }

    Ok(StatusCode::NO_CONTENT)
}

pub async fn me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    match acting_user(&state, &headers).await {
        Some(user) => Ok(Json(json!(user))),
        None => Err(ApiError {
            status: StatusCode::UNAUTHORIZED,
            message: "Not signed in".to_string(),
        }),
    }
}
