//! Event endpoints

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use super::{ApiJson, ApiPath, ApiQuery, AppState, CurrentUser};
use crate::models::{CreateEventRequest, Event, PageRequest, UpdateEventRequest, UserProfile};
use crate::utils::errors::Result;

/// POST /events
pub async fn create_event(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiJson(request): ApiJson<CreateEventRequest>,
) -> Result<(StatusCode, Json<Event>)> {
    let event = state.services.event_service.create_event(user.id, request).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// GET /events
pub async fn list_events(
    State(state): State<AppState>,
    ApiQuery(page): ApiQuery<PageRequest>,
) -> Result<Json<Vec<Event>>> {
    Ok(Json(state.services.event_service.list_events(page).await?))
}

/// GET /events/{id}
pub async fn get_event(
    State(state): State<AppState>,
    ApiPath(event_id): ApiPath<Uuid>,
) -> Result<Json<Event>> {
    Ok(Json(state.services.event_service.get_event(event_id).await?))
}

/// PUT /events/{id}
pub async fn update_event(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(event_id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<UpdateEventRequest>,
) -> Result<Json<Event>> {
    let event = state
        .services
        .event_service
        .update_event(user.id, event_id, request)
        .await?;
    Ok(Json(event))
}

/// DELETE /events/{id}
pub async fn delete_event(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(event_id): ApiPath<Uuid>,
) -> Result<StatusCode> {
    state.services.event_service.delete_event(user.id, event_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /events/{id}/participants
pub async fn participants(
    State(state): State<AppState>,
    ApiPath(event_id): ApiPath<Uuid>,
) -> Result<Json<Vec<UserProfile>>> {
    let users = state.services.event_service.participants(event_id).await?;
    Ok(Json(users.into_iter().map(UserProfile::from).collect()))
}
