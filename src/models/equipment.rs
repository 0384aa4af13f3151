//! Equipment, problem report and movement history models

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::models::enums::{EquipmentCondition, EquipmentStatus, ProblemSeverity};

/// Equipment codes are three uppercase letters followed by four digits
static CODIGO_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z]{3}[0-9]{4}$").unwrap());

/// Equipment record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Equipment {
    pub id: i32,
    /// Human-readable code, e.g. MIC0001
    pub codigo: String,
    /// Internal tracking tag, e.g. TOMB-2025-000001
    pub tombamento: Option<String>,
    pub nome: String,
    pub categoria_id: i32,
    pub marca: Option<String>,
    pub modelo: Option<String>,
    pub numero_serie: Option<String>,
    pub status: EquipmentStatus,
    pub condicao: EquipmentCondition,
    pub deposito_id: Option<i32>,
    pub observacoes: Option<String>,
    pub criado_em: DateTime<Utc>,
    pub atualizado_em: DateTime<Utc>,
}

/// Equipment row joined with category and depot names
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct EquipmentSummary {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub equipamento: Equipment,
    pub categoria_nome: String,
    pub categoria_tipo: String,
    pub deposito_nome: Option<String>,
}

/// List entry: summary plus the unresolved problem reports
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EquipmentListItem {
    #[serde(flatten)]
    pub equipamento: EquipmentSummary,
    pub problemas_ativos: Vec<Problem>,
}

/// Full detail view: summary plus every problem report and the recent
/// movement history
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EquipmentDetails {
    #[serde(flatten)]
    pub equipamento: EquipmentSummary,
    pub problemas: Vec<ProblemWithReporter>,
    pub historico: Vec<HistoryEntryWithUser>,
}

/// Problem report
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Problem {
    pub id: i32,
    pub equipamento_id: i32,
    pub reportado_por: Option<i32>,
    pub descricao: String,
    pub gravidade: ProblemSeverity,
    pub resolvido: bool,
    pub resolvido_por: Option<i32>,
    pub data_resolucao: Option<DateTime<Utc>>,
    pub data_relato: DateTime<Utc>,
}

/// Problem report joined with the reporter's name
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct ProblemWithReporter {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub problema: Problem,
    pub reportado_por_nome: Option<String>,
}

/// Movement history entry
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct HistoryEntry {
    pub id: i32,
    pub equipamento_id: i32,
    pub usuario_id: Option<i32>,
    /// criacao, atualizacao, transferencia, transferencia_urgente
    pub tipo_movimentacao: String,
    pub origem: Option<String>,
    pub destino: Option<String>,
    pub observacoes: Option<String>,
    pub data_movimentacao: DateTime<Utc>,
}

/// Movement history entry joined with the acting user's name
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct HistoryEntryWithUser {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub movimentacao: HistoryEntry,
    pub usuario_nome: Option<String>,
}

/// Create equipment request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateEquipment {
    #[validate(regex(path = *CODIGO_RE, message = "Código deve ter o formato XXX0000"))]
    pub codigo: Option<String>,
    pub nome: Option<String>,
    pub categoria_id: Option<i32>,
    pub marca: Option<String>,
    pub modelo: Option<String>,
    pub numero_serie: Option<String>,
    pub deposito_id: Option<i32>,
    pub condicao: Option<EquipmentCondition>,
    pub observacoes: Option<String>,
}

/// Update equipment request. Absent fields keep their current value;
/// codigo and tombamento are immutable.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateEquipment {
    pub nome: Option<String>,
    pub categoria_id: Option<i32>,
    pub marca: Option<String>,
    pub modelo: Option<String>,
    pub numero_serie: Option<String>,
    pub status: Option<EquipmentStatus>,
    pub condicao: Option<EquipmentCondition>,
    pub deposito_id: Option<i32>,
    pub observacoes: Option<String>,
}

/// Problem report request
#[derive(Debug, Deserialize, ToSchema)]
pub struct ReportProblem {
    pub descricao: Option<String>,
    pub gravidade: Option<ProblemSeverity>,
}

/// Query parameters for the equipment list
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct EquipmentQuery {
    pub status: Option<EquipmentStatus>,
    pub categoria_id: Option<i32>,
    pub deposito_id: Option<i32>,
    /// Matches codigo, tombamento, nome, marca or modelo
    pub search: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codigo_format() {
        assert!(CODIGO_RE.is_match("MIC0001"));
        assert!(CODIGO_RE.is_match("TRL0042"));
        assert!(!CODIGO_RE.is_match("mic0001"));
        assert!(!CODIGO_RE.is_match("MIC001"));
        assert!(!CODIGO_RE.is_match("MICR0001"));
        assert!(!CODIGO_RE.is_match("MIC0001X"));
    }
}
