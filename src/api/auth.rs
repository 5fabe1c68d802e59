//! Bearer authentication and the login/registration endpoints

use axum::extract::{FromRequestParts, State};
use axum::http::request::Parts;
use axum::http::{header, StatusCode};
use axum::Json;

use super::{ApiJson, AppState};
use crate::models::{CreateUserRequest, LoginRequest, TokenResponse, User};
use crate::utils::errors::{GatherError, Result};

/// The user a request's bearer token resolves to
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = GatherError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let token = bearer_token(parts)?;
        let user = state.services.auth_service.resolve_current_user(token).await?;
        Ok(CurrentUser(user))
    }
}

fn bearer_token(parts: &Parts) -> Result<&str> {
    let value = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| GatherError::Authentication("Not authenticated".to_string()))?;

    match value.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() => {
            Ok(token.trim())
        }
        _ => Err(GatherError::Authentication("Not authenticated".to_string())),
    }
}

/// POST /register
pub async fn register(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<TokenResponse>)> {
    let user = state.services.user_service.register(request).await?;
    let token = state.services.auth_service.issue_token(&user)?;
    Ok((StatusCode::CREATED, Json(token)))
}

/// POST /login
pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<TokenResponse>> {
    let user = state
        .services
        .auth_service
        .authenticate(&request.email, &request.password)
        .await?;
    Ok(Json(state.services.auth_service.issue_token(&user)?))
}
