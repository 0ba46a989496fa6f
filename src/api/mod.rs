pub mod auth;
pub mod events;
pub mod health;
pub mod response;

use std::sync::Arc;

use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use crate::auth::AuthProvider;
use crate::repositories::EventRepository;
use crate::services::Notifier;

#[derive(Clone)]
pub struct AppState {
    pub repo: EventRepository,
    pub auth: Arc<dyn AuthProvider>,
    pub notifier: Notifier,
}

pub fn build_router(
    repo: EventRepository,
    auth: Arc<dyn AuthProvider>,
    notifier: Notifier,
) -> Router {
    let state = AppState {
        repo,
        auth,
        notifier,
    };

    Router::new()
        .route("/health", get(health::health_check))
        .route("/events", get(events::list_events))
        .route("/events", post(events::create_event))
        .route("/events/upcoming", get(events::upcoming_events))
        .route("/events/featured", get(events::featured_events))
        .route("/events/{id}", get(events::get_event))
        .route("/events/{id}", patch(events::update_event))
        .route("/events/{id}", delete(events::delete_event))
        .route("/events/{id}/register", post(events::register_for_event))
        .route("/me/events", get(events::my_events))
        .route("/auth/signup", post(auth::sign_up))
        .route("/auth/signin", post(auth::sign_in))
        .route("/auth/signout", post(auth::sign_out))
        .route("/auth/me", get(auth::me))
        .with_state(state)
}
