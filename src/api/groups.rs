//! Group endpoints

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use super::{ApiJson, ApiPath, ApiQuery, AppState, CurrentUser};
use crate::models::{CreateGroupRequest, Group, PageRequest, UpdateGroupRequest, UserProfile};
use crate::utils::errors::Result;

/// POST /groups
pub async fn create_group(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiJson(request): ApiJson<CreateGroupRequest>,
) -> Result<(StatusCode, Json<Group>)> {
    let group = state.services.group_service.create_group(user.id, request).await?;
    Ok((StatusCode::CREATED, Json(group)))
}

/// GET /groups
pub async fn list_groups(
    State(state): State<AppState>,
    ApiQuery(page): ApiQuery<PageRequest>,
) -> Result<Json<Vec<Group>>> {
    Ok(Json(state.services.group_service.list_groups(page).await?))
}

/// GET /groups/{id}
pub async fn get_group(
    State(state): State<AppState>,
    ApiPath(group_id): ApiPath<Uuid>,
) -> Result<Json<Group>> {
    Ok(Json(state.services.group_service.get_group(group_id).await?))
}

/// PUT /groups/{id}
pub async fn update_group(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(group_id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<UpdateGroupRequest>,
) -> Result<Json<Group>> {
    let group = state
        .services
        .group_service
        .update_group(user.id, group_id, request)
        .await?;
    Ok(Json(group))
}

/// DELETE /groups/{id}
pub async fn delete_group(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(group_id): ApiPath<Uuid>,
) -> Result<StatusCode> {
    state.services.group_service.delete_group(user.id, group_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /groups/{id}/members
pub async fn members(
    State(state): State<AppState>,
    ApiPath(group_id): ApiPath<Uuid>,
) -> Result<Json<Vec<UserProfile>>> {
    let users = state.services.group_service.members(group_id).await?;
    Ok(Json(users.into_iter().map(UserProfile::from).collect()))
}
