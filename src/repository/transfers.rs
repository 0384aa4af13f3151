//! Transfers repository

use sqlx::{Pool, Postgres, Transaction};

use crate::{
    error::{AppError, AppResult},
    models::enums::TransferStatus,
    models::transfer::{NewTransfer, Transfer, TransferDetails, TransferQuery, TransferSummary},
    workflow::ApprovalFlags,
};

const SUMMARY_SELECT: &str = r#"
    SELECT t.*, e.codigo AS equipamento_codigo, e.nome AS equipamento_nome,
           s.nome AS solicitante_nome, c.nome AS coordenador_nome,
           re.nome AS responsavel_entrega_nome, rr.nome AS responsavel_recebimento_nome
    FROM transferencias t
    JOIN equipamentos e ON t.equipamento_id = e.id
    JOIN usuarios s ON t.solicitante_id = s.id
    LEFT JOIN usuarios c ON t.coordenador_id = c.id
    LEFT JOIN usuarios re ON t.responsavel_entrega_id = re.id
    LEFT JOIN usuarios rr ON t.responsavel_recebimento_id = rr.id
"#;

#[derive(Clone)]
pub struct TransfersRepository {
    pool: Pool<Postgres>,
}

impl TransfersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List transfers the user takes part in, newest first
    pub async fn list_for_user(
        &self,
        user_id: i32,
        query: &TransferQuery,
    ) -> AppResult<Vec<TransferSummary>> {
        let mut where_clause = String::from(
            "WHERE (t.solicitante_id = $1 OR t.responsavel_entrega_id = $1 \
             OR t.responsavel_recebimento_id = $1 OR t.coordenador_id = $1)",
        );
        if query.status.is_some() {
            where_clause.push_str(" AND t.status = $2");
        }

        let select_q = format!(
            "{} {} ORDER BY t.data_solicitacao DESC",
            SUMMARY_SELECT, where_clause
        );
        let mut builder = sqlx::query_as::<_, TransferSummary>(&select_q).bind(user_id);
        if let Some(status) = query.status {
            builder = builder.bind(status);
        }

        let rows = builder.fetch_all(&self.pool).await?;
        Ok(rows)
    }

    /// Get transfer by ID with participant details and equipment status
    pub async fn get_details(&self, id: i32) -> AppResult<TransferDetails> {
        sqlx::query_as::<_, TransferDetails>(
            r#"
            SELECT t.*, e.codigo AS equipamento_codigo, e.nome AS equipamento_nome,
                   e.status AS equipamento_status,
                   s.nome AS solicitante_nome, s.email AS solicitante_email,
                   c.nome AS coordenador_nome, c.email AS coordenador_email,
                   re.nome AS responsavel_entrega_nome, re.email AS responsavel_entrega_email,
                   rr.nome AS responsavel_recebimento_nome, rr.email AS responsavel_recebimento_email
            FROM transferencias t
            JOIN equipamentos e ON t.equipamento_id = e.id
            JOIN usuarios s ON t.solicitante_id = s.id
            LEFT JOIN usuarios c ON t.coordenador_id = c.id
            LEFT JOIN usuarios re ON t.responsavel_entrega_id = re.id
            LEFT JOIN usuarios rr ON t.responsavel_recebimento_id = rr.id
            WHERE t.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Transferência não encontrada".to_string()))
    }

    /// Get the bare transfer row
    pub async fn get(&self, id: i32) -> AppResult<Transfer> {
        sqlx::query_as::<_, Transfer>("SELECT * FROM transferencias WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Transferência não encontrada".to_string()))
    }

    /// Insert a transfer awaiting its approvals, returning the new id
    pub async fn insert_pending(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        data: &NewTransfer,
    ) -> AppResult<i32> {
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO transferencias
                (equipamento_id, origem_tipo, origem_id, destino_tipo, destino_id,
                 solicitante_id, coordenador_id, responsavel_entrega_id,
                 responsavel_recebimento_id, motivo, observacoes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id
            "#,
        )
        .bind(data.equipamento_id)
        .bind(data.origem_tipo)
        .bind(data.origem_id)
        .bind(data.destino_tipo)
        .bind(data.destino_id)
        .bind(data.solicitante_id)
        .bind(data.coordenador_id)
        .bind(data.responsavel_entrega_id)
        .bind(data.responsavel_recebimento_id)
        .bind(&data.motivo)
        .bind(&data.observacoes)
        .fetch_one(&mut **tx)
        .await?;
        Ok(id)
    }

    /// Insert an already-completed transfer (quick hand-over inside an
    /// event), returning the new id
    pub async fn insert_completed(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        data: &NewTransfer,
    ) -> AppResult<i32> {
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO transferencias
                (equipamento_id, origem_tipo, origem_id, destino_tipo, destino_id,
                 solicitante_id, coordenador_id, responsavel_entrega_id,
                 responsavel_recebimento_id, motivo, observacoes,
                 aprovacao_coordenador, aprovacao_entrega, aprovacao_recebimento,
                 status, data_conclusao)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11,
                    TRUE, TRUE, TRUE, 'concluida', NOW())
            RETURNING id
            "#,
        )
        .bind(data.equipamento_id)
        .bind(data.origem_tipo)
        .bind(data.origem_id)
        .bind(data.destino_tipo)
        .bind(data.destino_id)
        .bind(data.solicitante_id)
        .bind(data.coordenador_id)
        .bind(data.responsavel_entrega_id)
        .bind(data.responsavel_recebimento_id)
        .bind(&data.motivo)
        .bind(&data.observacoes)
        .fetch_one(&mut **tx)
        .await?;
        Ok(id)
    }

    /// Persist the new flag set and the status derived from it. The
    /// approval date is stamped once, on the coordinator's sign-off.
    pub async fn apply_approval(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: i32,
        flags: ApprovalFlags,
        status: TransferStatus,
        stamp_approval_date: bool,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE transferencias
            SET aprovacao_coordenador = $1, aprovacao_entrega = $2, aprovacao_recebimento = $3,
                status = $4,
                data_aprovacao = CASE WHEN $5 AND data_aprovacao IS NULL THEN NOW()
                                      ELSE data_aprovacao END
            WHERE id = $6
            "#,
        )
        .bind(flags.coordenador)
        .bind(flags.entrega)
        .bind(flags.recebimento)
        .bind(status)
        .bind(stamp_approval_date)
        .bind(id)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    /// Stamp the completion date
    pub async fn set_conclusion(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: i32,
    ) -> AppResult<()> {
        sqlx::query("UPDATE transferencias SET data_conclusao = NOW() WHERE id = $1")
            .bind(id)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    /// Cancel a transfer, keeping the previous notes when no reason is given
    pub async fn cancel(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: i32,
        motivo: Option<&str>,
    ) -> AppResult<()> {
        sqlx::query(
            "UPDATE transferencias SET status = 'cancelada', observacoes = COALESCE($1, observacoes) WHERE id = $2",
        )
        .bind(motivo)
        .bind(id)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}
