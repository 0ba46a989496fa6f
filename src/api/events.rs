use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use crate::api::auth::acting_user;
use crate::api::{response::ApiError, AppState};
use crate::error::EventError;
use crate::models::{CreateEvent, UpdateEvent};
use crate::services::Notification;

const DEFAULT_FEED_LIMIT: i64 = 3;

#[derive(Debug, Deserialize)]
pub struct ListEventsQuery {
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    pub limit: Option<i64>,
}

/// Relay adapter for failed writes: log, notify, translate to a response.
/// Reads recover inside the repository and never reach this.
fn relay_failure(state: &AppState, context: &str, err: EventError) -> ApiError {
    error!("{}: {}", context, err);
    state
        .notifier
        .publish(Notification::for_error(context, &err));
    ApiError::from(err)
}

pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<ListEventsQuery>,
) -> impl IntoResponse {
    let events = state.repo.list(query.search.as_deref()).await;
    Json(json!(events))
}

pub async fn upcoming_events(
    State(state): State<AppState>,
    Query(query): Query<FeedQuery>,
) -> impl IntoResponse {
    let events = state.repo.upcoming(query.limit.unwrap_or(DEFAULT_FEED_LIMIT)).await;
    Json(json!(events))
}

pub async fn featured_events(
    State(state): State<AppState>,
    Query(query): Query<FeedQuery>,
) -> impl IntoResponse {
    let events = state.repo.featured(query.limit.unwrap_or(DEFAULT_FEED_LIMIT)).await;
    Json(json!(events))
}

pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let event = state.repo.get(id).await?;
    Ok(Json(json!(event)))
}

#[axum::debug_handler]
pub async fn create_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateEvent>,
) -> Result<impl IntoResponse, ApiError> {
    let user = acting_user(&state, &headers).await;

    match state.repo.create(payload, user.as_ref()).await {
        Ok(event) => {
            state.notifier.publish(Notification::success(
                "Event Created",
                "Your event has been created successfully.",
            ));
            Ok((StatusCode::CREATED, Json(json!(event))))
        }
        Err(err) => Err(relay_failure(&state, "Failed to create event", err)),
    }
}

pub async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    Json(payload): Json<UpdateEvent>,
) -> Result<impl IntoResponse, ApiError> {
    let user = acting_user(&state, &headers).await;

    match state.repo.update(id, payload, user.as_ref()).await {
        Ok(event) => {
            state.notifier.publish(Notification::success(
                "Event Updated",
                "Your event has been updated successfully.",
            ));
            Ok(Json(json!(event)))
        }
        Err(err) => Err(relay_failure(&state, "Failed to update event", err)),
    }
}

pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let user = acting_user(&state, &headers).await;

    match state.repo.delete(id, user.as_ref()).await {
        Ok(()) => {
            state.notifier.publish(Notification::success(
                "Event Deleted",
                "Your event has been deleted successfully.",
            ));
            Ok(StatusCode::NO_CONTENT)
        }
        Err(err) => Err(relay_failure(&state, "Failed to delete event", err)),
    }
}

pub async fn register_for_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    match state.repo.register(id).await {
        Ok(event) => {
            state.notifier.publish(Notification::success(
                "Registration Successful",
                "You have been registered for this event.",
            ));
            Ok(Json(json!(event)))
        }
        Err(err) => Err(relay_failure(&state, "Failed to register for event", err)),
    }
}

pub async fn my_events(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let user = acting_user(&state, &headers).await;

    let events = state.repo.list_for_user(user.as_ref()).await?;
    Ok(Json(json!(events)))
}
