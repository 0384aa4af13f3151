//! Shared domain enums. All of them are persisted as Postgres TEXT using
//! the wire (Portuguese) spelling, so each gets the full string round-trip:
//! `as_str` / `Display` / `FromStr` plus the sqlx TEXT conversions.

use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, Postgres};
use utoipa::ToSchema;

/// Implements the sqlx TEXT conversions for a string-backed enum.
macro_rules! impl_pg_text {
    ($ty:ty) => {
        impl sqlx::Type<Postgres> for $ty {
            fn type_info() -> sqlx::postgres::PgTypeInfo {
                <String as sqlx::Type<Postgres>>::type_info()
            }
        }

        impl<'r> Decode<'r, Postgres> for $ty {
            fn decode(
                value: sqlx::postgres::PgValueRef<'r>,
            ) -> Result<Self, sqlx::error::BoxDynError> {
                let s: String = Decode::<Postgres>::decode(value)?;
                s.parse().map_err(|e: String| e.into())
            }
        }

        impl Encode<'_, Postgres> for $ty {
            fn encode_by_ref(
                &self,
                buf: &mut sqlx::postgres::PgArgumentBuffer,
            ) -> sqlx::encode::IsNull {
                let s: String = self.as_str().to_string();
                <String as Encode<Postgres>>::encode(s, buf)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// UserRole
// ---------------------------------------------------------------------------

/// User roles (`usuarios.tipo`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Coordenador,
    ResponsavelEntrega,
    ResponsavelRecebimento,
    Tecnico,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Coordenador => "coordenador",
            UserRole::ResponsavelEntrega => "responsavel_entrega",
            UserRole::ResponsavelRecebimento => "responsavel_recebimento",
            UserRole::Tecnico => "tecnico",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "coordenador" => Ok(UserRole::Coordenador),
            "responsavel_entrega" => Ok(UserRole::ResponsavelEntrega),
            "responsavel_recebimento" => Ok(UserRole::ResponsavelRecebimento),
            "tecnico" => Ok(UserRole::Tecnico),
            _ => Err(format!("Invalid user role: {}", s)),
        }
    }
}

impl_pg_text!(UserRole);

// ---------------------------------------------------------------------------
// EquipmentStatus
// ---------------------------------------------------------------------------

/// Equipment lifecycle status (`equipamentos.status`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentStatus {
    Disponivel,
    EmUso,
    Manutencao,
    Transferencia,
    ComProblema,
}

impl EquipmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EquipmentStatus::Disponivel => "disponivel",
            EquipmentStatus::EmUso => "em_uso",
            EquipmentStatus::Manutencao => "manutencao",
            EquipmentStatus::Transferencia => "transferencia",
            EquipmentStatus::ComProblema => "com_problema",
        }
    }
}

impl std::fmt::Display for EquipmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for EquipmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "disponivel" => Ok(EquipmentStatus::Disponivel),
            "em_uso" => Ok(EquipmentStatus::EmUso),
            "manutencao" => Ok(EquipmentStatus::Manutencao),
            "transferencia" => Ok(EquipmentStatus::Transferencia),
            "com_problema" => Ok(EquipmentStatus::ComProblema),
            _ => Err(format!("Invalid equipment status: {}", s)),
        }
    }
}

impl_pg_text!(EquipmentStatus);

// ---------------------------------------------------------------------------
// EquipmentCondition
// ---------------------------------------------------------------------------

/// Physical condition (`equipamentos.condicao`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentCondition {
    Excelente,
    Bom,
    Regular,
    Ruim,
    Quebrado,
}

impl EquipmentCondition {
    pub fn as_str(&self) -> &'static str {
        match self {
            EquipmentCondition::Excelente => "excelente",
            EquipmentCondition::Bom => "bom",
            EquipmentCondition::Regular => "regular",
            EquipmentCondition::Ruim => "ruim",
            EquipmentCondition::Quebrado => "quebrado",
        }
    }
}

impl std::fmt::Display for EquipmentCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for EquipmentCondition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "excelente" => Ok(EquipmentCondition::Excelente),
            "bom" => Ok(EquipmentCondition::Bom),
            "regular" => Ok(EquipmentCondition::Regular),
            "ruim" => Ok(EquipmentCondition::Ruim),
            "quebrado" => Ok(EquipmentCondition::Quebrado),
            _ => Err(format!("Invalid equipment condition: {}", s)),
        }
    }
}

impl_pg_text!(EquipmentCondition);

// ---------------------------------------------------------------------------
// ProblemSeverity
// ---------------------------------------------------------------------------

/// Problem report severity (`problemas_equipamentos.gravidade`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProblemSeverity {
    Baixa,
    Media,
    Alta,
    Critica,
}

impl ProblemSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProblemSeverity::Baixa => "baixa",
            ProblemSeverity::Media => "media",
            ProblemSeverity::Alta => "alta",
            ProblemSeverity::Critica => "critica",
        }
    }

    /// Severities that take the equipment out of service
    pub fn is_blocking(&self) -> bool {
        matches!(self, ProblemSeverity::Alta | ProblemSeverity::Critica)
    }
}

impl std::fmt::Display for ProblemSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ProblemSeverity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "baixa" => Ok(ProblemSeverity::Baixa),
            "media" => Ok(ProblemSeverity::Media),
            "alta" => Ok(ProblemSeverity::Alta),
            "critica" => Ok(ProblemSeverity::Critica),
            _ => Err(format!("Invalid severity: {}", s)),
        }
    }
}

impl_pg_text!(ProblemSeverity);

// ---------------------------------------------------------------------------
// EventStatus
// ---------------------------------------------------------------------------

/// Event lifecycle status (`eventos.status`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    Planejamento,
    Aprovado,
    EmAndamento,
    Concluido,
    Cancelado,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Planejamento => "planejamento",
            EventStatus::Aprovado => "aprovado",
            EventStatus::EmAndamento => "em_andamento",
            EventStatus::Concluido => "concluido",
            EventStatus::Cancelado => "cancelado",
        }
    }

    /// Events that may take part in a cross-event transfer
    pub fn accepts_transfers(&self) -> bool {
        matches!(self, EventStatus::Aprovado | EventStatus::EmAndamento)
    }
}

impl std::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for EventStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "planejamento" => Ok(EventStatus::Planejamento),
            "aprovado" => Ok(EventStatus::Aprovado),
            "em_andamento" => Ok(EventStatus::EmAndamento),
            "concluido" => Ok(EventStatus::Concluido),
            "cancelado" => Ok(EventStatus::Cancelado),
            _ => Err(format!("Invalid event status: {}", s)),
        }
    }
}

impl_pg_text!(EventStatus);

// ---------------------------------------------------------------------------
// TransferStatus
// ---------------------------------------------------------------------------

/// Transfer workflow status (`transferencias.status`). Derived from the
/// approval flags, never written independently of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TransferStatus {
    Pendente,
    AprovadaCoordenador,
    EmTransito,
    Concluida,
    Cancelada,
}

impl TransferStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransferStatus::Pendente => "pendente",
            TransferStatus::AprovadaCoordenador => "aprovada_coordenador",
            TransferStatus::EmTransito => "em_transito",
            TransferStatus::Concluida => "concluida",
            TransferStatus::Cancelada => "cancelada",
        }
    }

    /// Terminal states accept no further approvals or cancellation
    pub fn is_terminal(&self) -> bool {
        matches!(self, TransferStatus::Concluida | TransferStatus::Cancelada)
    }
}

impl std::fmt::Display for TransferStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TransferStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pendente" => Ok(TransferStatus::Pendente),
            "aprovada_coordenador" => Ok(TransferStatus::AprovadaCoordenador),
            "em_transito" => Ok(TransferStatus::EmTransito),
            "concluida" => Ok(TransferStatus::Concluida),
            "cancelada" => Ok(TransferStatus::Cancelada),
            _ => Err(format!("Invalid transfer status: {}", s)),
        }
    }
}

impl_pg_text!(TransferStatus);

// ---------------------------------------------------------------------------
// PartyKind
// ---------------------------------------------------------------------------

/// Kind of transfer endpoint (`origem_tipo` / `destino_tipo`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PartyKind {
    Deposito,
    Evento,
    Usuario,
}

impl PartyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PartyKind::Deposito => "deposito",
            PartyKind::Evento => "evento",
            PartyKind::Usuario => "usuario",
        }
    }
}

impl std::fmt::Display for PartyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PartyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "deposito" => Ok(PartyKind::Deposito),
            "evento" => Ok(PartyKind::Evento),
            "usuario" => Ok(PartyKind::Usuario),
            _ => Err(format!("Invalid party kind: {}", s)),
        }
    }
}

impl_pg_text!(PartyKind);

// ---------------------------------------------------------------------------
// ApprovalKind
// ---------------------------------------------------------------------------

/// Which of the three transfer approvals is being granted. Request-only,
/// never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalKind {
    Coordenador,
    Entrega,
    Recebimento,
}

impl ApprovalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalKind::Coordenador => "coordenador",
            ApprovalKind::Entrega => "entrega",
            ApprovalKind::Recebimento => "recebimento",
        }
    }
}

impl std::fmt::Display for ApprovalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ApprovalKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "coordenador" => Ok(ApprovalKind::Coordenador),
            "entrega" => Ok(ApprovalKind::Entrega),
            "recebimento" => Ok(ApprovalKind::Recebimento),
            _ => Err(format!("Invalid approval kind: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_wire_spellings() {
        for status in [
            TransferStatus::Pendente,
            TransferStatus::AprovadaCoordenador,
            TransferStatus::EmTransito,
            TransferStatus::Concluida,
            TransferStatus::Cancelada,
        ] {
            assert_eq!(status.as_str().parse::<TransferStatus>(), Ok(status));
        }
        assert_eq!(
            "responsavel_entrega".parse::<UserRole>(),
            Ok(UserRole::ResponsavelEntrega)
        );
        assert_eq!(
            "com_problema".parse::<EquipmentStatus>(),
            Ok(EquipmentStatus::ComProblema)
        );
        assert!("invalido".parse::<EventStatus>().is_err());
    }

    #[test]
    fn terminal_states() {
        assert!(TransferStatus::Concluida.is_terminal());
        assert!(TransferStatus::Cancelada.is_terminal());
        assert!(!TransferStatus::Pendente.is_terminal());
        assert!(!TransferStatus::AprovadaCoordenador.is_terminal());
        assert!(!TransferStatus::EmTransito.is_terminal());
    }

    #[test]
    fn blocking_severities() {
        assert!(ProblemSeverity::Alta.is_blocking());
        assert!(ProblemSeverity::Critica.is_blocking());
        assert!(!ProblemSeverity::Baixa.is_blocking());
        assert!(!ProblemSeverity::Media.is_blocking());
    }

    #[test]
    fn serde_uses_wire_spelling() {
        let s = serde_json::to_string(&TransferStatus::AprovadaCoordenador).unwrap();
        assert_eq!(s, "\"aprovada_coordenador\"");
        let r: UserRole = serde_json::from_str("\"responsavel_recebimento\"").unwrap();
        assert_eq!(r, UserRole::ResponsavelRecebimento);
    }
}
