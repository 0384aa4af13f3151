//! Pure workflow rules
//!
//! This module holds the transfer approval state machine and the event
//! checklist engine. Both are pure functions over in-memory data: the
//! surrounding services load the rows, call in here, and persist whatever
//! comes back.

pub mod checklist;
pub mod transfer;

pub use checklist::{ChecklistOutcome, ChecklistRequirement, ChecklistWarning, MandatoryDeficit};
pub use transfer::ApprovalFlags;
