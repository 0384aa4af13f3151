//! Transfer model and workflow payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use crate::models::enums::{EquipmentStatus, PartyKind, TransferStatus};

/// Transfer record. The three approval flags drive `status`; the status
/// column is never written independently of them.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Transfer {
    pub id: i32,
    pub equipamento_id: i32,
    pub origem_tipo: PartyKind,
    pub origem_id: Option<i32>,
    pub destino_tipo: PartyKind,
    pub destino_id: Option<i32>,
    pub solicitante_id: i32,
    pub coordenador_id: Option<i32>,
    pub responsavel_entrega_id: Option<i32>,
    pub responsavel_recebimento_id: Option<i32>,
    pub aprovacao_coordenador: bool,
    pub aprovacao_entrega: bool,
    pub aprovacao_recebimento: bool,
    pub status: TransferStatus,
    pub motivo: Option<String>,
    pub observacoes: Option<String>,
    pub data_solicitacao: DateTime<Utc>,
    pub data_aprovacao: Option<DateTime<Utc>>,
    pub data_conclusao: Option<DateTime<Utc>>,
}

/// Transfer row joined with equipment code/name and participant names
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct TransferSummary {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub transferencia: Transfer,
    pub equipamento_codigo: String,
    pub equipamento_nome: String,
    pub solicitante_nome: String,
    pub coordenador_nome: Option<String>,
    pub responsavel_entrega_nome: Option<String>,
    pub responsavel_recebimento_nome: Option<String>,
}

/// Full detail view: summary plus participant emails and the current
/// equipment status
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct TransferDetails {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub transferencia: TransferSummary,
    pub equipamento_status: EquipmentStatus,
    pub solicitante_email: String,
    pub coordenador_email: Option<String>,
    pub responsavel_entrega_email: Option<String>,
    pub responsavel_recebimento_email: Option<String>,
}

/// Create transfer request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTransfer {
    pub equipamento_id: Option<i32>,
    pub origem_tipo: Option<PartyKind>,
    pub origem_id: Option<i32>,
    pub destino_tipo: Option<PartyKind>,
    pub destino_id: Option<i32>,
    pub coordenador_id: Option<i32>,
    pub responsavel_entrega_id: Option<i32>,
    pub responsavel_recebimento_id: Option<i32>,
    pub motivo: Option<String>,
    pub observacoes: Option<String>,
}

/// Validated transfer ready for insertion. Built by the service once the
/// request payload and the equipment have been checked.
#[derive(Debug, Clone)]
pub struct NewTransfer {
    pub equipamento_id: i32,
    pub origem_tipo: PartyKind,
    pub origem_id: Option<i32>,
    pub destino_tipo: PartyKind,
    pub destino_id: Option<i32>,
    pub solicitante_id: i32,
    pub coordenador_id: Option<i32>,
    pub responsavel_entrega_id: Option<i32>,
    pub responsavel_recebimento_id: Option<i32>,
    pub motivo: Option<String>,
    pub observacoes: Option<String>,
}

/// Approval request. `tipo_aprovacao` is coordenador, entrega or recebimento.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ApproveTransfer {
    pub tipo_aprovacao: Option<String>,
}

/// Cancellation request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CancelTransfer {
    pub motivo: Option<String>,
}

/// Quick transfer between responsibles inside the same event
#[derive(Debug, Deserialize, ToSchema)]
pub struct QuickTransfer {
    pub equipamento_id: Option<i32>,
    pub evento_id: Option<i32>,
    pub responsavel_origem_id: Option<i32>,
    pub responsavel_destino_id: Option<i32>,
    pub area: Option<String>,
    pub motivo: Option<String>,
}

/// Urgent transfer between two running events
#[derive(Debug, Deserialize, ToSchema)]
pub struct CrossEventTransfer {
    pub equipamento_id: Option<i32>,
    pub evento_origem_id: Option<i32>,
    pub evento_destino_id: Option<i32>,
    pub coordenador_id: Option<i32>,
    pub responsavel_entrega_id: Option<i32>,
    pub responsavel_recebimento_id: Option<i32>,
    pub motivo: Option<String>,
    pub observacoes: Option<String>,
}

/// Query parameters for the transfer list
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct TransferQuery {
    pub status: Option<TransferStatus>,
}
