use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::auth::AuthError;
use crate::error::EventError;

pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<EventError> for ApiError {
    fn from(err: EventError) -> Self {
        let status = match &err {
            EventError::BackendUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            EventError::AuthRequired => StatusCode::UNAUTHORIZED,
            EventError::NotFound(_) => StatusCode::NOT_FOUND,
            EventError::AtCapacity(_) => StatusCode::CONFLICT,
            EventError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            EventError::Backend(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        let status = match &err {
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::AlreadyRegistered(_) => StatusCode::CONFLICT,
        };

        Self {
            status,
            message: err.to_string(),
        }
    }
}
