//! Event, template and checklist models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use crate::models::enums::{EquipmentStatus, EventStatus};
use crate::workflow::checklist::ChecklistWarning;

/// Event record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Event {
    pub id: i32,
    pub nome: String,
    pub local: String,
    pub data_inicio: DateTime<Utc>,
    pub data_fim: DateTime<Utc>,
    pub status: EventStatus,
    pub template_id: Option<i32>,
    pub observacoes: Option<String>,
    pub criado_por: Option<i32>,
    pub criado_em: DateTime<Utc>,
}

/// Event row joined with template and creator names
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct EventSummary {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub evento: Event,
    pub template_nome: Option<String>,
    pub template_tamanho: Option<String>,
    pub criado_por_nome: Option<String>,
}

/// Full detail view: summary plus staffers and equipment assignments
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EventDetails {
    #[serde(flatten)]
    pub evento: EventSummary,
    pub responsaveis: Vec<EventStaffer>,
    pub equipamentos: Vec<EventAssignment>,
}

/// Staffer assigned to an event, joined with the user's name and email
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct EventStaffer {
    pub id: i32,
    pub evento_id: i32,
    pub usuario_id: i32,
    pub area: Option<String>,
    pub tipo: Option<String>,
    pub usuario_nome: String,
    pub usuario_email: String,
}

/// Equipment assignment row joined with equipment, category and
/// responsible-user details
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct EventAssignment {
    pub id: i32,
    pub evento_id: i32,
    pub equipamento_id: i32,
    pub responsavel_id: Option<i32>,
    pub area: String,
    pub quantidade: i32,
    pub status: String,
    pub data_alocacao: DateTime<Utc>,
    pub codigo: String,
    pub nome: String,
    pub equipamento_status: EquipmentStatus,
    pub categoria_nome: String,
    pub categoria_tipo: String,
    pub responsavel_nome: Option<String>,
}

/// Event size template. Seeded reference data.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Template {
    pub id: i32,
    pub nome: String,
    pub tamanho: String,
    pub descricao: Option<String>,
}

/// Template with its checklist rules
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TemplateWithChecklist {
    #[serde(flatten)]
    pub template: Template,
    pub checklist: Vec<ChecklistItemDetail>,
}

/// Checklist rule joined with the category it refers to
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ChecklistItemDetail {
    pub id: i32,
    pub template_id: i32,
    pub categoria_id: i32,
    pub quantidade_minima: i32,
    pub obrigatorio: bool,
    pub categoria_nome: String,
    pub categoria_tipo: String,
}

/// Create event request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateEvent {
    pub nome: Option<String>,
    pub local: Option<String>,
    pub template_id: Option<i32>,
    /// ISO datetime, e.g. 2025-08-01T08:00
    pub data_inicio: Option<String>,
    pub data_fim: Option<String>,
    pub observacoes: Option<String>,
    #[serde(default)]
    pub responsaveis: Vec<CreateEventStaffer>,
}

/// Staffer entry inside a create-event request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateEventStaffer {
    pub usuario_id: i32,
    pub area: Option<String>,
    pub tipo: Option<String>,
}

/// Add-equipment request body
#[derive(Debug, Deserialize, ToSchema)]
pub struct AddEquipments {
    #[serde(default)]
    pub equipamentos: Vec<AddEquipmentItem>,
}

/// One equipment assignment inside an add-equipment request
#[derive(Debug, Deserialize, ToSchema)]
pub struct AddEquipmentItem {
    pub equipamento_id: i32,
    pub responsavel_id: Option<i32>,
    pub area: Option<String>,
    pub quantidade: Option<i32>,
}

/// Status change request. `status` is one of the five event statuses.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateEventStatus {
    pub status: Option<String>,
}

/// Checklist validation response
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ChecklistResult {
    pub valido: bool,
    pub mensagem: String,
    pub avisos: Vec<ChecklistWarning>,
}

/// Query parameters for the event list
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct EventQuery {
    pub status: Option<EventStatus>,
    /// Only events starting on or after this date (YYYY-MM-DD)
    pub data_inicio: Option<String>,
    /// Only events ending on or before this date (YYYY-MM-DD)
    pub data_fim: Option<String>,
}
