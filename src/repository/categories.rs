//! Categories repository

use sqlx::{Pool, Postgres};

use crate::{error::AppResult, models::category::Category};

#[derive(Clone)]
pub struct CategoriesRepository {
    pool: Pool<Postgres>,
}

impl CategoriesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List every category, grouped by kind
    pub async fn list(&self) -> AppResult<Vec<Category>> {
        let rows = sqlx::query_as::<_, Category>(
            "SELECT * FROM categorias_equipamentos ORDER BY tipo, nome",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
