//! Authentication endpoints

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    error::AppResult,
    models::user::{AuthResponse, LoginRequest, RegisterRequest, UserProfile},
};

use super::{AuthenticatedUser, CreatedResponse};

/// Authenticate with email and password
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = AuthResponse),
        (status = 400, description = "Missing credentials"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<crate::AppState>,
    Json(data): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let response = state.services.auth.login(&data).await?;
    Ok(Json(response))
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = CreatedResponse),
        (status = 400, description = "Missing or invalid fields, or email taken")
    )
)]
pub async fn register(
    State(state): State<crate::AppState>,
    Json(data): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<CreatedResponse>)> {
    let id = state.services.auth.register(&data).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            message: "Usuário registrado com sucesso".to_string(),
            id,
        }),
    ))
}

/// Profile of the authenticated user
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = UserProfile),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "User no longer exists")
    )
)]
pub async fn me(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<UserProfile>> {
    let profile = state.services.auth.me(claims.id).await?;
    Ok(Json(profile))
}
