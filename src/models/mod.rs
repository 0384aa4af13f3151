//! Data models for Palco

pub mod category;
pub mod enums;
pub mod equipment;
pub mod event;
pub mod transfer;
pub mod user;

// Re-export commonly used types
pub use category::Category;
pub use enums::{
    ApprovalKind, EquipmentCondition, EquipmentStatus, EventStatus, PartyKind, ProblemSeverity,
    TransferStatus, UserRole,
};
pub use equipment::{Equipment, EquipmentDetails, EquipmentListItem, Problem};
pub use event::{Event, EventDetails, EventSummary, Template};
pub use transfer::{Transfer, TransferDetails, TransferSummary};
pub use user::{Claims, User};
