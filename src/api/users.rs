//! User endpoints, including joining and leaving events and groups

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use super::{ApiJson, ApiPath, ApiQuery, AppState, CurrentUser};
use crate::models::{
    Event, Group, PageRequest, ProfileUpdateResponse, UpdateUserRequest, UserProfile,
};
use crate::utils::errors::{GatherError, Result};

/// GET /users
pub async fn list_users(
    State(state): State<AppState>,
    ApiQuery(page): ApiQuery<PageRequest>,
) -> Result<Json<Vec<UserProfile>>> {
    let users = state.services.user_service.list_users(page).await?;
    Ok(Json(users.into_iter().map(UserProfile::from).collect()))
}

/// GET /users/me
pub async fn me(CurrentUser(user): CurrentUser) -> Json<UserProfile> {
    Json(user.into())
}

/// PUT /users/me
///
/// Reissues the bearer token when the email changes.
pub async fn update_me(
    State(state): State<AppState>,
    CurrentUser(current): CurrentUser,
    ApiJson(request): ApiJson<UpdateUserRequest>,
) -> Result<Json<ProfileUpdateResponse>> {
    let user = state.services.user_service.update_user(current.id, request).await?;
    let token = if user.email != current.email {
        Some(state.services.auth_service.issue_token(&user)?)
    } else {
        None
    };
    Ok(Json(ProfileUpdateResponse { user: user.into(), token }))
}

/// DELETE /users/me
pub async fn delete_me(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<StatusCode> {
    state.services.user_service.delete_user(user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<Uuid>,
) -> Result<Json<UserProfile>> {
    let user = state.services.user_service.get_user(user_id).await?;
    Ok(Json(user.into()))
}

/// GET /users/{id}/participating_events
pub async fn participating_events(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<Uuid>,
) -> Result<Json<Vec<Event>>> {
    let events = state.services.user_service.participating_events(user_id).await?;
    non_empty(events, "No events found for this user")
}

/// GET /users/{id}/created_events
pub async fn created_events(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<Uuid>,
) -> Result<Json<Vec<Event>>> {
    let events = state.services.user_service.created_events(user_id).await?;
    non_empty(events, "No events found for this user")
}

/// GET /users/{id}/groups
pub async fn groups(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<Uuid>,
) -> Result<Json<Vec<Group>>> {
    let groups = state.services.user_service.groups(user_id).await?;
    non_empty(groups, "No groups found for this user")
}

/// GET /users/{id}/created_groups
pub async fn created_groups(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<Uuid>,
) -> Result<Json<Vec<Group>>> {
    let groups = state.services.user_service.created_groups(user_id).await?;
    non_empty(groups, "No groups found for this user")
}

/// POST /users/me/participate/{event_id}
pub async fn join_event(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(event_id): ApiPath<Uuid>,
) -> Result<Json<Event>> {
    Ok(Json(state.services.event_service.join_event(user.id, event_id).await?))
}

/// DELETE /users/me/participate/{event_id}
pub async fn leave_event(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(event_id): ApiPath<Uuid>,
) -> Result<Json<Event>> {
    Ok(Json(state.services.event_service.leave_event(user.id, event_id).await?))
}

/// POST /users/me/join/{group_id}
pub async fn join_group(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(group_id): ApiPath<Uuid>,
) -> Result<Json<Group>> {
    Ok(Json(state.services.group_service.join_group(user.id, group_id).await?))
}

/// DELETE /users/me/join/{group_id}
pub async fn leave_group(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(group_id): ApiPath<Uuid>,
) -> Result<Json<Group>> {
    Ok(Json(state.services.group_service.leave_group(user.id, group_id).await?))
}

fn non_empty<T>(items: Vec<T>, message: &str) -> Result<Json<Vec<T>>> {
    if items.is_empty() {
        return Err(GatherError::NotFound(message.to_string()));
    }
    Ok(Json(items))
}
