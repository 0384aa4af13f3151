//! Users repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::enums::UserRole,
    models::user::{User, UserProfile},
};

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Postgres>,
}

impl UsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get an active user by email. Deactivated accounts cannot log in.
    pub async fn find_active_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT * FROM usuarios WHERE email = $1 AND ativo = TRUE",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Check if an email is already registered
    pub async fn email_exists(&self, email: &str) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM usuarios WHERE email = $1)")
                .bind(email)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    /// Create a user, returning the new id
    pub async fn create(
        &self,
        nome: &str,
        email: &str,
        senha_hash: &str,
        tipo: UserRole,
    ) -> AppResult<i32> {
        let id: i32 = sqlx::query_scalar(
            "INSERT INTO usuarios (nome, email, senha, tipo) VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(nome)
        .bind(email)
        .bind(senha_hash)
        .bind(tipo)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    /// Get the profile of an authenticated user
    pub async fn get_profile(&self, id: i32) -> AppResult<UserProfile> {
        sqlx::query_as::<_, UserProfile>(
            "SELECT id, nome, email, tipo, criado_em FROM usuarios WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Usuário não encontrado".to_string()))
    }
}
