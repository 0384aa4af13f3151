//! API handlers for Palco REST endpoints

pub mod auth;
pub mod equipment;
pub mod events;
pub mod health;
pub mod openapi;
pub mod rate_limit;
pub mod transfers;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{error::AppError, models::user::Claims, AppState};

/// Extractor for authenticated user from JWT token
pub struct AuthenticatedUser(pub Claims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // Get the Authorization header
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Token não fornecido".to_string()))?;

        // Check for Bearer token
        if !auth_header.starts_with("Bearer ") {
            return Err(AppError::Authentication("Token inválido".to_string()));
        }

        let token = &auth_header[7..];

        // Validate JWT token using the secret from configuration
        let claims = Claims::from_token(token, &state.config.auth.jwt_secret)
            .map_err(|_| AppError::Authentication("Token inválido".to_string()))?;

        Ok(AuthenticatedUser(claims))
    }
}

/// Plain confirmation body
#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Confirmation body carrying the id of a created row
#[derive(Serialize, ToSchema)]
pub struct CreatedResponse {
    pub message: String,
    pub id: i32,
}
