//! Equipment category model (reference data)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Equipment category. Seeded reference data, never mutated by the API.
/// `tipo` groups categories into som / iluminacao / palco.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Category {
    pub id: i32,
    pub nome: String,
    pub tipo: String,
    pub descricao: Option<String>,
    pub criado_em: DateTime<Utc>,
}
