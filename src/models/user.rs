//! User model, JWT claims and auth payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::error::AppError;
use crate::models::enums::UserRole;

/// Full user row. The password hash never leaves the server.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: i32,
    pub nome: String,
    pub email: String,
    /// Hashed password (argon2)
    #[serde(skip_serializing)]
    pub senha: String,
    pub tipo: UserRole,
    pub ativo: bool,
    pub criado_em: DateTime<Utc>,
}

/// Profile returned by `GET /auth/me`
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct UserProfile {
    pub id: i32,
    pub nome: String,
    pub email: String,
    pub tipo: UserRole,
    pub criado_em: DateTime<Utc>,
}

/// Registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 2, message = "Nome muito curto"))]
    pub nome: Option<String>,
    #[validate(email(message = "Email inválido"))]
    pub email: Option<String>,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres"))]
    pub senha: Option<String>,
    /// One of: coordenador, responsavel_entrega, responsavel_recebimento, tecnico
    pub tipo: Option<String>,
}

/// Login request
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub senha: Option<String>,
}

/// Token + user pair returned on login
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub usuario: User,
}

/// JWT claims for authenticated users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub id: i32,
    pub email: String,
    pub tipo: UserRole,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user: &User, validity_hours: u64) -> Self {
        let now = Utc::now();
        Self {
            id: user.id,
            email: user.email.clone(),
            tipo: user.tipo,
            iat: now.timestamp(),
            exp: (now + chrono::Duration::hours(validity_hours as i64)).timestamp(),
        }
    }

    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    pub fn is_coordenador(&self) -> bool {
        self.tipo == UserRole::Coordenador
    }

    /// Require the coordenador role
    pub fn require_coordenador(&self) -> Result<(), AppError> {
        if self.is_coordenador() {
            Ok(())
        } else {
            Err(AppError::Authorization(
                "Apenas coordenadores podem executar esta ação".to_string(),
            ))
        }
    }
}
