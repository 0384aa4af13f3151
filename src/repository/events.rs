//! Events repository: events, staffers, equipment assignments, templates
//! and checklist rules

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{Pool, Postgres, Transaction};

use crate::{
    error::{AppError, AppResult},
    models::enums::EventStatus,
    models::event::{
        AddEquipmentItem, ChecklistItemDetail, Event, EventAssignment, EventQuery, EventStaffer,
        EventSummary, Template, TemplateWithChecklist,
    },
    workflow::checklist::ChecklistRequirement,
};

const SUMMARY_SELECT: &str = r#"
    SELECT e.*, t.nome AS template_nome, t.tamanho AS template_tamanho, u.nome AS criado_por_nome
    FROM eventos e
    LEFT JOIN templates_eventos t ON e.template_id = t.id
    LEFT JOIN usuarios u ON e.criado_por = u.id
"#;

#[derive(Clone)]
pub struct EventsRepository {
    pool: Pool<Postgres>,
}

impl EventsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List events with optional status and date filters
    pub async fn list(&self, query: &EventQuery) -> AppResult<Vec<EventSummary>> {
        let mut conditions = Vec::new();
        let mut idx = 1;

        if query.status.is_some() {
            conditions.push(format!("e.status = ${}", idx));
            idx += 1;
        }
        if query.data_inicio.is_some() {
            conditions.push(format!("e.data_inicio >= ${}", idx));
            idx += 1;
        }
        if query.data_fim.is_some() {
            conditions.push(format!("e.data_fim <= ${}", idx));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        // Parse dates once
        let inicio = query
            .data_inicio
            .as_ref()
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok());
        let fim = query
            .data_fim
            .as_ref()
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok());

        let select_q = format!(
            "{} {} ORDER BY e.data_inicio DESC",
            SUMMARY_SELECT, where_clause
        );
        let mut builder = sqlx::query_as::<_, EventSummary>(&select_q);
        if let Some(status) = query.status {
            builder = builder.bind(status);
        }
        if let Some(inicio) = inicio {
            builder = builder.bind(inicio);
        }
        if let Some(fim) = fim {
            builder = builder.bind(fim);
        }

        let rows = builder.fetch_all(&self.pool).await?;
        Ok(rows)
    }

    /// Get event by ID with template and creator names
    pub async fn get_summary(&self, id: i32) -> AppResult<EventSummary> {
        let select_q = format!("{} WHERE e.id = $1", SUMMARY_SELECT);
        sqlx::query_as::<_, EventSummary>(&select_q)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Evento não encontrado".to_string()))
    }

    /// Get the bare event row
    pub async fn get(&self, id: i32) -> AppResult<Event> {
        sqlx::query_as::<_, Event>("SELECT * FROM eventos WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Evento não encontrado".to_string()))
    }

    /// Staffers of an event, with user names and emails
    pub async fn staffers(&self, event_id: i32) -> AppResult<Vec<EventStaffer>> {
        let rows = sqlx::query_as::<_, EventStaffer>(
            r#"
            SELECT r.*, u.nome AS usuario_nome, u.email AS usuario_email
            FROM responsaveis_evento r
            JOIN usuarios u ON r.usuario_id = u.id
            WHERE r.evento_id = $1
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Equipment assignments of an event, with equipment and category details
    pub async fn assignments(&self, event_id: i32) -> AppResult<Vec<EventAssignment>> {
        let rows = sqlx::query_as::<_, EventAssignment>(
            r#"
            SELECT ee.*, e.codigo, e.nome, e.status AS equipamento_status,
                   c.nome AS categoria_nome, c.tipo AS categoria_tipo,
                   u.nome AS responsavel_nome
            FROM equipamentos_evento ee
            JOIN equipamentos e ON ee.equipamento_id = e.id
            JOIN categorias_equipamentos c ON e.categoria_id = c.id
            LEFT JOIN usuarios u ON ee.responsavel_id = u.id
            WHERE ee.evento_id = $1
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Insert an event, returning the new id
    #[allow(clippy::too_many_arguments)]
    pub async fn insert(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        nome: &str,
        local: &str,
        template_id: Option<i32>,
        data_inicio: DateTime<Utc>,
        data_fim: DateTime<Utc>,
        observacoes: Option<&str>,
        criado_por: i32,
    ) -> AppResult<i32> {
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO eventos (nome, local, template_id, data_inicio, data_fim, observacoes, criado_por)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(nome)
        .bind(local)
        .bind(template_id)
        .bind(data_inicio)
        .bind(data_fim)
        .bind(observacoes)
        .bind(criado_por)
        .fetch_one(&mut **tx)
        .await?;
        Ok(id)
    }

    /// Attach a staffer to an event
    pub async fn insert_staffer(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        event_id: i32,
        usuario_id: i32,
        area: Option<&str>,
        tipo: Option<&str>,
    ) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO responsaveis_evento (evento_id, usuario_id, area, tipo) VALUES ($1, $2, $3, $4)",
        )
        .bind(event_id)
        .bind(usuario_id)
        .bind(area)
        .bind(tipo)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    /// Assign one equipment to an event
    pub async fn insert_assignment(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        event_id: i32,
        item: &AddEquipmentItem,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO equipamentos_evento (evento_id, equipamento_id, responsavel_id, area, quantidade)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(event_id)
        .bind(item.equipamento_id)
        .bind(item.responsavel_id)
        .bind(item.area.as_deref().unwrap_or("geral"))
        .bind(item.quantidade.unwrap_or(1))
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    /// Find an equipment assignment inside an event
    pub async fn find_assignment(
        &self,
        event_id: i32,
        equipment_id: i32,
    ) -> AppResult<Option<i32>> {
        let id: Option<i32> = sqlx::query_scalar(
            "SELECT id FROM equipamentos_evento WHERE evento_id = $1 AND equipamento_id = $2",
        )
        .bind(event_id)
        .bind(equipment_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(id)
    }

    /// Hand an assignment over to another responsible, optionally moving it
    /// to a different area
    pub async fn reassign(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        assignment_id: i32,
        responsavel_id: i32,
        area: Option<&str>,
    ) -> AppResult<()> {
        sqlx::query(
            "UPDATE equipamentos_evento SET responsavel_id = $1, area = COALESCE($2, area) WHERE id = $3",
        )
        .bind(responsavel_id)
        .bind(area)
        .bind(assignment_id)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    /// Checklist rules of a template, joined with their categories
    pub async fn checklist_requirements(
        &self,
        template_id: i32,
    ) -> AppResult<Vec<ChecklistRequirement>> {
        let rows = sqlx::query_as::<_, (i32, String, String, i32, bool)>(
            r#"
            SELECT ct.categoria_id, c.nome, c.tipo, ct.quantidade_minima, ct.obrigatorio
            FROM checklist_template ct
            JOIN categorias_equipamentos c ON ct.categoria_id = c.id
            WHERE ct.template_id = $1
            ORDER BY ct.id
            "#,
        )
        .bind(template_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(
                |(categoria_id, categoria, tipo, quantidade_minima, obrigatorio)| {
                    ChecklistRequirement {
                        categoria_id,
                        categoria,
                        tipo,
                        quantidade_minima,
                        obrigatorio,
                    }
                },
            )
            .collect())
    }

    /// Assigned quantity per category for one event
    pub async fn assignment_counts(&self, event_id: i32) -> AppResult<HashMap<i32, i64>> {
        let rows = sqlx::query_as::<_, (i32, i64)>(
            r#"
            SELECT e.categoria_id, COALESCE(SUM(ee.quantidade), 0)
            FROM equipamentos_evento ee
            JOIN equipamentos e ON ee.equipamento_id = e.id
            WHERE ee.evento_id = $1
            GROUP BY e.categoria_id
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().collect())
    }

    /// Set the event status
    pub async fn set_status(&self, id: i32, status: EventStatus) -> AppResult<()> {
        let result = sqlx::query("UPDATE eventos SET status = $1 WHERE id = $2")
            .bind(status)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Evento não encontrado".to_string()));
        }
        Ok(())
    }

    /// Every template with its checklist rules
    pub async fn templates_with_checklist(&self) -> AppResult<Vec<TemplateWithChecklist>> {
        let templates =
            sqlx::query_as::<_, Template>("SELECT * FROM templates_eventos ORDER BY tamanho")
                .fetch_all(&self.pool)
                .await?;

        let items = sqlx::query_as::<_, ChecklistItemDetail>(
            r#"
            SELECT ct.*, c.nome AS categoria_nome, c.tipo AS categoria_tipo
            FROM checklist_template ct
            JOIN categorias_equipamentos c ON ct.categoria_id = c.id
            ORDER BY c.tipo, c.nome
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut by_template: HashMap<i32, Vec<ChecklistItemDetail>> = HashMap::new();
        for item in items {
            by_template.entry(item.template_id).or_default().push(item);
        }

        Ok(templates
            .into_iter()
            .map(|template| {
                let checklist = by_template.remove(&template.id).unwrap_or_default();
                TemplateWithChecklist {
                    template,
                    checklist,
                }
            })
            .collect())
    }
}
