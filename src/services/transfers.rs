//! Transfers service: the three-approval custody workflow

use crate::{
    error::{AppError, AppResult},
    models::enums::{ApprovalKind, EquipmentStatus, PartyKind, TransferStatus},
    models::transfer::{
        ApproveTransfer, CancelTransfer, CreateTransfer, CrossEventTransfer, NewTransfer,
        QuickTransfer, TransferDetails, TransferQuery, TransferSummary,
    },
    models::user::Claims,
    repository::Repository,
    workflow::transfer::{derive_status, may_approve, periods_overlap},
    workflow::ApprovalFlags,
};

#[derive(Clone)]
pub struct TransfersService {
    repository: Repository,
}

impl TransfersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Transfers the user takes part in, as requester, approver or courier
    pub async fn list(&self, user_id: i32, query: &TransferQuery) -> AppResult<Vec<TransferSummary>> {
        self.repository.transfers.list_for_user(user_id, query).await
    }

    pub async fn get(&self, id: i32) -> AppResult<TransferDetails> {
        self.repository.transfers.get_details(id).await
    }

    /// Request a transfer. The equipment is parked in the transferencia
    /// status until the workflow finishes or is cancelled.
    pub async fn create(&self, data: &CreateTransfer, user_id: i32) -> AppResult<i32> {
        let (equipamento_id, origem_tipo, destino_tipo, destino_id) = match (
            data.equipamento_id,
            data.origem_tipo,
            data.destino_tipo,
            data.destino_id,
        ) {
            (Some(equipamento_id), Some(origem_tipo), Some(destino_tipo), Some(destino_id)) => {
                (equipamento_id, origem_tipo, destino_tipo, destino_id)
            }
            _ => {
                return Err(AppError::Validation(
                    "Dados obrigatórios não fornecidos".to_string(),
                ))
            }
        };

        let equipment = self.repository.equipment.get(equipamento_id).await?;
        if equipment.status == EquipmentStatus::Manutencao {
            return Err(AppError::BusinessRule(
                "Equipamento em manutenção não pode ser transferido".to_string(),
            ));
        }

        let new_transfer = NewTransfer {
            equipamento_id,
            origem_tipo,
            origem_id: data.origem_id,
            destino_tipo,
            destino_id: Some(destino_id),
            solicitante_id: user_id,
            coordenador_id: data.coordenador_id,
            responsavel_entrega_id: data.responsavel_entrega_id,
            responsavel_recebimento_id: data.responsavel_recebimento_id,
            motivo: data.motivo.clone(),
            observacoes: data.observacoes.clone(),
        };

        let mut tx = self.repository.pool.begin().await?;
        let id = self
            .repository
            .transfers
            .insert_pending(&mut tx, &new_transfer)
            .await?;
        self.repository
            .equipment
            .set_status(&mut tx, equipamento_id, EquipmentStatus::Transferencia)
            .await?;
        tx.commit().await?;

        Ok(id)
    }

    /// Record one of the three approvals. The status is re-derived from the
    /// full flag set, so approvals may arrive in any order; completion fires
    /// side effects exactly once, on the transition into concluida.
    pub async fn approve(
        &self,
        id: i32,
        data: &ApproveTransfer,
        claims: &Claims,
    ) -> AppResult<TransferStatus> {
        let transfer = self.repository.transfers.get(id).await?;
        if transfer.status.is_terminal() {
            return Err(AppError::BusinessRule(
                "Transferência já finalizada".to_string(),
            ));
        }

        let kind: ApprovalKind = data
            .tipo_aprovacao
            .as_deref()
            .unwrap_or_default()
            .parse()
            .map_err(|_| AppError::Validation("Tipo de aprovação inválido".to_string()))?;

        let (designated, denial) = match kind {
            ApprovalKind::Coordenador => (
                transfer.coordenador_id,
                "Você não é o coordenador desta transferência",
            ),
            ApprovalKind::Entrega => (
                transfer.responsavel_entrega_id,
                "Você não é o responsável pela entrega",
            ),
            ApprovalKind::Recebimento => (
                transfer.responsavel_recebimento_id,
                "Você não é o responsável pelo recebimento",
            ),
        };
        if !may_approve(designated, claims.id) {
            return Err(AppError::Authorization(denial.to_string()));
        }

        let flags = ApprovalFlags {
            coordenador: transfer.aprovacao_coordenador,
            entrega: transfer.aprovacao_entrega,
            recebimento: transfer.aprovacao_recebimento,
        };
        let new_flags = flags.approve(kind);
        let new_status = derive_status(new_flags, false);

        let mut tx = self.repository.pool.begin().await?;
        self.repository
            .transfers
            .apply_approval(
                &mut tx,
                id,
                new_flags,
                new_status,
                kind == ApprovalKind::Coordenador,
            )
            .await?;

        if new_status == TransferStatus::Concluida {
            self.repository.transfers.set_conclusion(&mut tx, id).await?;

            let new_depot = match transfer.destino_tipo {
                PartyKind::Deposito => transfer.destino_id,
                _ => None,
            };
            self.repository
                .equipment
                .relocate(&mut tx, transfer.equipamento_id, new_depot)
                .await?;

            let origem = format!(
                "{}: {}",
                transfer.origem_tipo,
                transfer
                    .origem_id
                    .map_or_else(|| "N/A".to_string(), |v| v.to_string())
            );
            let destino = format!(
                "{}: {}",
                transfer.destino_tipo,
                transfer
                    .destino_id
                    .map_or_else(|| "N/A".to_string(), |v| v.to_string())
            );
            self.repository
                .equipment
                .insert_history(
                    &mut tx,
                    transfer.equipamento_id,
                    "transferencia",
                    Some(&origem),
                    Some(&destino),
                    claims.id,
                    &format!("Transferência #{} concluída", id),
                )
                .await?;
        }
        tx.commit().await?;

        Ok(new_status)
    }

    /// Cancel a pending transfer. Only coordinators or the requester may
    /// cancel; completed transfers stay closed.
    pub async fn cancel(&self, id: i32, data: &CancelTransfer, claims: &Claims) -> AppResult<()> {
        let transfer = self.repository.transfers.get(id).await?;
        if transfer.status == TransferStatus::Concluida {
            return Err(AppError::BusinessRule(
                "Não é possível cancelar transferência concluída".to_string(),
            ));
        }
        if !claims.is_coordenador() && transfer.solicitante_id != claims.id {
            return Err(AppError::Authorization(
                "Sem permissão para cancelar esta transferência".to_string(),
            ));
        }

        let mut tx = self.repository.pool.begin().await?;
        self.repository
            .transfers
            .cancel(&mut tx, id, data.motivo.as_deref())
            .await?;
        self.repository
            .equipment
            .set_status(&mut tx, transfer.equipamento_id, EquipmentStatus::Disponivel)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    /// Hand an assigned equipment to another responsible inside the same
    /// event. Recorded as an already-completed transfer between users.
    pub async fn quick(&self, data: &QuickTransfer, user_id: i32) -> AppResult<i32> {
        let (equipamento_id, evento_id, responsavel_destino_id) = match (
            data.equipamento_id,
            data.evento_id,
            data.responsavel_destino_id,
        ) {
            (Some(equipamento_id), Some(evento_id), Some(responsavel_destino_id)) => {
                (equipamento_id, evento_id, responsavel_destino_id)
            }
            _ => {
                return Err(AppError::Validation(
                    "Dados obrigatórios não fornecidos".to_string(),
                ))
            }
        };

        let assignment_id = self
            .repository
            .events
            .find_assignment(evento_id, equipamento_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound("Equipamento não encontrado neste evento".to_string())
            })?;

        let new_transfer = NewTransfer {
            equipamento_id,
            origem_tipo: PartyKind::Usuario,
            origem_id: data.responsavel_origem_id.or(Some(user_id)),
            destino_tipo: PartyKind::Usuario,
            destino_id: Some(responsavel_destino_id),
            solicitante_id: user_id,
            coordenador_id: None,
            responsavel_entrega_id: Some(user_id),
            responsavel_recebimento_id: Some(responsavel_destino_id),
            motivo: Some(
                data.motivo
                    .clone()
                    .unwrap_or_else(|| "Transferência entre responsáveis no mesmo evento".to_string()),
            ),
            observacoes: None,
        };

        let mut tx = self.repository.pool.begin().await?;
        self.repository
            .events
            .reassign(&mut tx, assignment_id, responsavel_destino_id, data.area.as_deref())
            .await?;
        let id = self
            .repository
            .transfers
            .insert_completed(&mut tx, &new_transfer)
            .await?;
        tx.commit().await?;

        Ok(id)
    }

    /// Urgent transfer between two running events. Both events must be
    /// active at the same time and their periods must overlap.
    pub async fn cross_event(&self, data: &CrossEventTransfer, user_id: i32) -> AppResult<i32> {
        let (equipamento_id, origem_id, destino_id) = match (
            data.equipamento_id,
            data.evento_origem_id,
            data.evento_destino_id,
        ) {
            (Some(equipamento_id), Some(origem_id), Some(destino_id)) => {
                (equipamento_id, origem_id, destino_id)
            }
            _ => {
                return Err(AppError::Validation(
                    "Dados obrigatórios não fornecidos".to_string(),
                ))
            }
        };

        let origem = self.repository.events.get(origem_id).await?;
        let destino = self.repository.events.get(destino_id).await?;
        if !origem.status.accepts_transfers() || !destino.status.accepts_transfers() {
            return Err(AppError::BusinessRule(
                "Ambos os eventos devem estar aprovados ou em andamento".to_string(),
            ));
        }
        if !periods_overlap(
            origem.data_inicio,
            origem.data_fim,
            destino.data_inicio,
            destino.data_fim,
        ) {
            return Err(AppError::BusinessRule(
                "Os períodos dos eventos não se sobrepõem".to_string(),
            ));
        }

        let equipment = self.repository.equipment.get(equipamento_id).await?;
        if equipment.status == EquipmentStatus::Manutencao {
            return Err(AppError::BusinessRule(
                "Equipamento em manutenção não pode ser transferido".to_string(),
            ));
        }

        let new_transfer = NewTransfer {
            equipamento_id,
            origem_tipo: PartyKind::Evento,
            origem_id: Some(origem_id),
            destino_tipo: PartyKind::Evento,
            destino_id: Some(destino_id),
            solicitante_id: user_id,
            coordenador_id: data.coordenador_id,
            responsavel_entrega_id: data.responsavel_entrega_id,
            responsavel_recebimento_id: data.responsavel_recebimento_id,
            motivo: data.motivo.clone(),
            observacoes: data.observacoes.clone(),
        };

        let mut tx = self.repository.pool.begin().await?;
        let id = self
            .repository
            .transfers
            .insert_pending(&mut tx, &new_transfer)
            .await?;
        self.repository
            .equipment
            .set_status(&mut tx, equipamento_id, EquipmentStatus::Transferencia)
            .await?;
        self.repository
            .equipment
            .insert_history(
                &mut tx,
                equipamento_id,
                "transferencia_urgente",
                Some(&format!("evento: {}", origem_id)),
                Some(&format!("evento: {}", destino_id)),
                user_id,
                &format!("Transferência urgente #{} entre eventos", id),
            )
            .await?;
        tx.commit().await?;

        Ok(id)
    }
}
