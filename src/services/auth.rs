//! Authentication service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use validator::Validate;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::enums::UserRole,
    models::user::{AuthResponse, Claims, LoginRequest, RegisterRequest, UserProfile},
    repository::Repository,
};

#[derive(Clone)]
pub struct AuthService {
    repository: Repository,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Authenticate by email and password, returning a JWT and the user
    pub async fn login(&self, data: &LoginRequest) -> AppResult<AuthResponse> {
        let (email, senha) = match (&data.email, &data.senha) {
            (Some(email), Some(senha)) => (email, senha),
            _ => {
                return Err(AppError::Validation(
                    "Email e senha são obrigatórios".to_string(),
                ))
            }
        };

        let user = self
            .repository
            .users
            .find_active_by_email(email)
            .await?
            .ok_or_else(|| AppError::Authentication("Credenciais inválidas".to_string()))?;

        if !self.verify_password(&user.senha, senha)? {
            return Err(AppError::Authentication("Credenciais inválidas".to_string()));
        }

        let claims = Claims::new(&user, self.config.jwt_expiration_hours);
        let token = claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))?;

        Ok(AuthResponse {
            token,
            usuario: user,
        })
    }

    /// Register a new user, returning the new id
    pub async fn register(&self, data: &RegisterRequest) -> AppResult<i32> {
        let (nome, email, senha, tipo) = match (&data.nome, &data.email, &data.senha, &data.tipo) {
            (Some(nome), Some(email), Some(senha), Some(tipo)) => (nome, email, senha, tipo),
            _ => {
                return Err(AppError::Validation(
                    "Todos os campos são obrigatórios".to_string(),
                ))
            }
        };
        data.validate()?;

        let tipo: UserRole = tipo
            .parse()
            .map_err(|_| AppError::Validation("Tipo de usuário inválido".to_string()))?;

        if self.repository.users.email_exists(email).await? {
            return Err(AppError::Conflict("Email já cadastrado".to_string()));
        }

        let senha_hash = self.hash_password(senha)?;
        self.repository
            .users
            .create(nome, email, &senha_hash, tipo)
            .await
    }

    /// Profile of the authenticated user
    pub async fn me(&self, user_id: i32) -> AppResult<UserProfile> {
        self.repository.users.get_profile(user_id).await
    }

    /// Verify a password against its stored hash
    fn verify_password(&self, hash: &str, password: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash a password using Argon2
    fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }
}
