//! Equipment repository: equipment rows, problem reports and the shared
//! movement history table

use chrono::Utc;
use sqlx::{Pool, Postgres, Transaction};

use crate::{
    error::{AppError, AppResult},
    models::enums::{EquipmentCondition, EquipmentStatus, ProblemSeverity},
    models::equipment::{
        CreateEquipment, Equipment, EquipmentQuery, EquipmentSummary, HistoryEntryWithUser,
        Problem, ProblemWithReporter, UpdateEquipment,
    },
};

const SUMMARY_SELECT: &str = r#"
    SELECT e.*, c.nome AS categoria_nome, c.tipo AS categoria_tipo, d.nome AS deposito_nome
    FROM equipamentos e
    JOIN categorias_equipamentos c ON e.categoria_id = c.id
    LEFT JOIN depositos d ON e.deposito_id = d.id
"#;

#[derive(Clone)]
pub struct EquipmentRepository {
    pool: Pool<Postgres>,
}

impl EquipmentRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List equipment with optional filters, joined with category and depot
    pub async fn list(&self, query: &EquipmentQuery) -> AppResult<Vec<EquipmentSummary>> {
        let mut conditions = Vec::new();
        let mut idx = 1;

        if query.status.is_some() {
            conditions.push(format!("e.status = ${}", idx));
            idx += 1;
        }
        if query.categoria_id.is_some() {
            conditions.push(format!("e.categoria_id = ${}", idx));
            idx += 1;
        }
        if query.deposito_id.is_some() {
            conditions.push(format!("e.deposito_id = ${}", idx));
            idx += 1;
        }
        if query.search.is_some() {
            conditions.push(format!(
                "(e.codigo ILIKE ${i} OR e.tombamento ILIKE ${i} OR e.nome ILIKE ${i} \
                 OR e.marca ILIKE ${i} OR e.modelo ILIKE ${i})",
                i = idx
            ));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let select_q = format!("{} {} ORDER BY e.codigo", SUMMARY_SELECT, where_clause);
        let mut builder = sqlx::query_as::<_, EquipmentSummary>(&select_q);
        if let Some(status) = query.status {
            builder = builder.bind(status);
        }
        if let Some(categoria_id) = query.categoria_id {
            builder = builder.bind(categoria_id);
        }
        if let Some(deposito_id) = query.deposito_id {
            builder = builder.bind(deposito_id);
        }
        if let Some(ref search) = query.search {
            builder = builder.bind(format!("%{}%", search));
        }

        let rows = builder.fetch_all(&self.pool).await?;
        Ok(rows)
    }

    /// Unresolved problems for a set of equipment ids, newest first
    pub async fn unresolved_problems(&self, equipment_ids: &[i32]) -> AppResult<Vec<Problem>> {
        let rows = sqlx::query_as::<_, Problem>(
            r#"
            SELECT * FROM problemas_equipamentos
            WHERE equipamento_id = ANY($1) AND resolvido = FALSE
            ORDER BY data_relato DESC
            "#,
        )
        .bind(equipment_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Get equipment by ID with category and depot names
    pub async fn get_summary(&self, id: i32) -> AppResult<EquipmentSummary> {
        let select_q = format!("{} WHERE e.id = $1", SUMMARY_SELECT);
        sqlx::query_as::<_, EquipmentSummary>(&select_q)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Equipamento não encontrado".to_string()))
    }

    /// Get equipment by its tracking tag
    pub async fn get_by_tombamento(&self, tombamento: &str) -> AppResult<EquipmentSummary> {
        let select_q = format!("{} WHERE e.tombamento = $1", SUMMARY_SELECT);
        sqlx::query_as::<_, EquipmentSummary>(&select_q)
            .bind(tombamento)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Equipamento não encontrado".to_string()))
    }

    /// Get the bare equipment row
    pub async fn get(&self, id: i32) -> AppResult<Equipment> {
        sqlx::query_as::<_, Equipment>("SELECT * FROM equipamentos WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Equipamento não encontrado".to_string()))
    }

    /// All problem reports for one equipment, with reporter names
    pub async fn problems_with_reporter(
        &self,
        equipment_id: i32,
    ) -> AppResult<Vec<ProblemWithReporter>> {
        let rows = sqlx::query_as::<_, ProblemWithReporter>(
            r#"
            SELECT p.*, u.nome AS reportado_por_nome
            FROM problemas_equipamentos p
            LEFT JOIN usuarios u ON p.reportado_por = u.id
            WHERE p.equipamento_id = $1
            ORDER BY p.data_relato DESC
            "#,
        )
        .bind(equipment_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Recent movement history for one equipment, with acting-user names
    pub async fn history_with_user(&self, equipment_id: i32) -> AppResult<Vec<HistoryEntryWithUser>> {
        let rows = sqlx::query_as::<_, HistoryEntryWithUser>(
            r#"
            SELECT h.*, u.nome AS usuario_nome
            FROM historico_movimentacoes h
            LEFT JOIN usuarios u ON h.usuario_id = u.id
            WHERE h.equipamento_id = $1
            ORDER BY h.data_movimentacao DESC
            LIMIT 20
            "#,
        )
        .bind(equipment_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Check if a code is already taken
    pub async fn codigo_exists(&self, codigo: &str) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM equipamentos WHERE codigo = $1)")
                .bind(codigo)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    /// Check if a tracking tag is already taken
    pub async fn tombamento_exists(&self, tombamento: &str) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM equipamentos WHERE tombamento = $1)")
                .bind(tombamento)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    /// Insert equipment, returning the new id
    pub async fn insert(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        data: &CreateEquipment,
        codigo: &str,
        nome: &str,
        categoria_id: i32,
        tombamento: &str,
        condicao: EquipmentCondition,
    ) -> AppResult<i32> {
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO equipamentos
                (codigo, tombamento, nome, categoria_id, marca, modelo,
                 numero_serie, deposito_id, condicao, observacoes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id
            "#,
        )
        .bind(codigo)
        .bind(tombamento)
        .bind(nome)
        .bind(categoria_id)
        .bind(&data.marca)
        .bind(&data.modelo)
        .bind(&data.numero_serie)
        .bind(data.deposito_id)
        .bind(condicao)
        .bind(&data.observacoes)
        .fetch_one(&mut **tx)
        .await?;
        Ok(id)
    }

    /// Partial update; absent fields keep their stored value
    pub async fn update(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: i32,
        data: &UpdateEquipment,
    ) -> AppResult<Equipment> {
        let now = Utc::now();
        let mut sets = vec!["atualizado_em = $1".to_string()];
        let mut idx = 2;

        macro_rules! add_field {
            ($field:expr, $name:expr) => {
                if $field.is_some() {
                    sets.push(format!("{} = ${}", $name, idx));
                    idx += 1;
                }
            };
        }

        add_field!(data.nome, "nome");
        add_field!(data.categoria_id, "categoria_id");
        add_field!(data.marca, "marca");
        add_field!(data.modelo, "modelo");
        add_field!(data.numero_serie, "numero_serie");
        add_field!(data.status, "status");
        add_field!(data.condicao, "condicao");
        add_field!(data.deposito_id, "deposito_id");
        add_field!(data.observacoes, "observacoes");

        let query = format!(
            "UPDATE equipamentos SET {} WHERE id = {} RETURNING *",
            sets.join(", "),
            id
        );

        let mut builder = sqlx::query_as::<_, Equipment>(&query).bind(now);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(data.nome);
        bind_field!(data.categoria_id);
        bind_field!(data.marca);
        bind_field!(data.modelo);
        bind_field!(data.numero_serie);
        bind_field!(data.status);
        bind_field!(data.condicao);
        bind_field!(data.deposito_id);
        bind_field!(data.observacoes);

        builder
            .fetch_optional(&mut **tx)
            .await?
            .ok_or_else(|| AppError::NotFound("Equipamento não encontrado".to_string()))
    }

    /// Set the lifecycle status
    pub async fn set_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: i32,
        status: EquipmentStatus,
    ) -> AppResult<()> {
        sqlx::query("UPDATE equipamentos SET status = $1 WHERE id = $2")
            .bind(status)
            .bind(id)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    /// Set status and condition together (problem report / resolution)
    pub async fn set_status_condition(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: i32,
        status: EquipmentStatus,
        condicao: EquipmentCondition,
    ) -> AppResult<()> {
        sqlx::query("UPDATE equipamentos SET status = $1, condicao = $2 WHERE id = $3")
            .bind(status)
            .bind(condicao)
            .bind(id)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    /// Move equipment to a depot (or out of any depot) and mark it available.
    /// Used when a transfer completes.
    pub async fn relocate(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: i32,
        deposito_id: Option<i32>,
    ) -> AppResult<()> {
        sqlx::query("UPDATE equipamentos SET deposito_id = $1, status = 'disponivel' WHERE id = $2")
            .bind(deposito_id)
            .bind(id)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    /// Insert a problem report, returning the new id
    pub async fn insert_problem(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        equipment_id: i32,
        descricao: &str,
        gravidade: ProblemSeverity,
        reportado_por: i32,
    ) -> AppResult<i32> {
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO problemas_equipamentos (equipamento_id, descricao, gravidade, reportado_por)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(equipment_id)
        .bind(descricao)
        .bind(gravidade)
        .bind(reportado_por)
        .fetch_one(&mut **tx)
        .await?;
        Ok(id)
    }

    /// Get one problem report of one equipment
    pub async fn get_problem(&self, equipment_id: i32, problem_id: i32) -> AppResult<Problem> {
        sqlx::query_as::<_, Problem>(
            "SELECT * FROM problemas_equipamentos WHERE id = $1 AND equipamento_id = $2",
        )
        .bind(problem_id)
        .bind(equipment_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Problema não encontrado".to_string()))
    }

    /// Mark a problem as resolved
    pub async fn resolve_problem(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        problem_id: i32,
        resolved_by: i32,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE problemas_equipamentos
            SET resolvido = TRUE, resolvido_por = $1, data_resolucao = NOW()
            WHERE id = $2
            "#,
        )
        .bind(resolved_by)
        .bind(problem_id)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    /// Count unresolved problems of one equipment, inside the current
    /// transaction so the resolution path sees its own write
    pub async fn count_unresolved(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        equipment_id: i32,
    ) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM problemas_equipamentos WHERE equipamento_id = $1 AND resolvido = FALSE",
        )
        .bind(equipment_id)
        .fetch_one(&mut **tx)
        .await?;
        Ok(count)
    }

    /// Append a movement history entry
    pub async fn insert_history(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        equipment_id: i32,
        tipo_movimentacao: &str,
        origem: Option<&str>,
        destino: Option<&str>,
        usuario_id: i32,
        observacoes: &str,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO historico_movimentacoes
                (equipamento_id, tipo_movimentacao, origem, destino, usuario_id, observacoes)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(equipment_id)
        .bind(tipo_movimentacao)
        .bind(origem)
        .bind(destino)
        .bind(usuario_id)
        .bind(observacoes)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}
