//! Router assembly

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use super::{auth, events, groups, health, users, AppState};

/// Build the application router over the given state
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/users", get(users::list_users))
        .route(
            "/users/me",
            get(users::me).put(users::update_me).delete(users::delete_me),
        )
        .route(
            "/users/me/participate/{event_id}",
            post(users::join_event).delete(users::leave_event),
        )
        .route(
            "/users/me/join/{group_id}",
            post(users::join_group).delete(users::leave_group),
        )
        .route("/users/{id}", get(users::get_user))
        .route("/users/{id}/participating_events", get(users::participating_events))
        .route("/users/{id}/created_events", get(users::created_events))
        .route("/users/{id}/groups", get(users::groups))
        .route("/users/{id}/created_groups", get(users::created_groups))
        .route("/events", get(events::list_events).post(events::create_event))
        .route(
            "/events/{id}",
            get(events::get_event)
                .put(events::update_event)
                .delete(events::delete_event),
        )
        .route("/events/{id}/participants", get(events::participants))
        .route("/groups", get(groups::list_groups).post(groups::create_group))
        .route(
            "/groups/{id}",
            get(groups::get_group)
                .put(groups::update_group)
                .delete(groups::delete_group),
        )
        .route("/groups/{id}/members", get(groups::members))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
