//! Transfer approval state machine
//!
//! A transfer carries three independent approval flags (coordinator,
//! delivery, receipt). The row status is always derived from the flags,
//! so approvals arriving in any order can never leave the two out of sync.

use chrono::{DateTime, Utc};

use crate::models::enums::{ApprovalKind, TransferStatus};

/// The three approval flags of a transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ApprovalFlags {
    pub coordenador: bool,
    pub entrega: bool,
    pub recebimento: bool,
}

impl ApprovalFlags {
    /// Returns a copy with the given approval granted
    pub fn approve(self, kind: ApprovalKind) -> Self {
        match kind {
            ApprovalKind::Coordenador => Self {
                coordenador: true,
                ..self
            },
            ApprovalKind::Entrega => Self {
                entrega: true,
                ..self
            },
            ApprovalKind::Recebimento => Self {
                recebimento: true,
                ..self
            },
        }
    }

    pub fn all(&self) -> bool {
        self.coordenador && self.entrega && self.recebimento
    }
}

/// Derives the transfer status from its approval flags.
///
/// The workflow advances coordinator-first: delivery and receipt approvals
/// may be recorded early but only move the status once the coordinator has
/// signed off. Cancellation wins over everything.
pub fn derive_status(flags: ApprovalFlags, cancelled: bool) -> TransferStatus {
    if cancelled {
        TransferStatus::Cancelada
    } else if flags.all() {
        TransferStatus::Concluida
    } else if flags.coordenador && flags.entrega {
        TransferStatus::EmTransito
    } else if flags.coordenador {
        TransferStatus::AprovadaCoordenador
    } else {
        TransferStatus::Pendente
    }
}

/// Whether `caller` may grant an approval reserved for `designated`.
/// Transfers created without a designated approver accept the approval
/// from any authenticated user.
pub fn may_approve(designated: Option<i32>, caller: i32) -> bool {
    designated.map_or(true, |id| id == caller)
}

/// Closed-interval overlap test on two event periods
pub fn periods_overlap(
    a_inicio: DateTime<Utc>,
    a_fim: DateTime<Utc>,
    b_inicio: DateTime<Utc>,
    b_fim: DateTime<Utc>,
) -> bool {
    a_inicio <= b_fim && b_inicio <= a_fim
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn flags(c: bool, e: bool, r: bool) -> ApprovalFlags {
        ApprovalFlags {
            coordenador: c,
            entrega: e,
            recebimento: r,
        }
    }

    #[test]
    fn test_derive_status_table() {
        let cases = [
            (flags(false, false, false), TransferStatus::Pendente),
            (flags(false, true, false), TransferStatus::Pendente),
            (flags(false, false, true), TransferStatus::Pendente),
            (flags(false, true, true), TransferStatus::Pendente),
            (flags(true, false, false), TransferStatus::AprovadaCoordenador),
            (flags(true, false, true), TransferStatus::AprovadaCoordenador),
            (flags(true, true, false), TransferStatus::EmTransito),
            (flags(true, true, true), TransferStatus::Concluida),
        ];
        for (f, expected) in cases {
            assert_eq!(derive_status(f, false), expected, "flags {:?}", f);
        }
    }

    #[test]
    fn test_cancelled_wins() {
        for f in [
            flags(false, false, false),
            flags(true, true, false),
            flags(true, true, true),
        ] {
            assert_eq!(derive_status(f, true), TransferStatus::Cancelada);
        }
    }

    #[test]
    fn test_approvals_commute() {
        // Receipt recorded before delivery still completes once all three land
        let f = ApprovalFlags::default()
            .approve(ApprovalKind::Recebimento)
            .approve(ApprovalKind::Coordenador);
        assert_eq!(derive_status(f, false), TransferStatus::AprovadaCoordenador);
        let f = f.approve(ApprovalKind::Entrega);
        assert_eq!(derive_status(f, false), TransferStatus::Concluida);
    }

    #[test]
    fn test_approve_is_idempotent() {
        let once = ApprovalFlags::default().approve(ApprovalKind::Entrega);
        assert_eq!(once.approve(ApprovalKind::Entrega), once);
    }

    #[test]
    fn test_may_approve() {
        assert!(may_approve(None, 7));
        assert!(may_approve(Some(7), 7));
        assert!(!may_approve(Some(3), 7));
    }

    #[test]
    fn test_periods_overlap() {
        let d = |day: u32, h: u32| Utc.with_ymd_and_hms(2025, 8, day, h, 0, 0).unwrap();
        // plain overlap
        assert!(periods_overlap(d(1, 8), d(3, 22), d(2, 8), d(4, 22)));
        // containment
        assert!(periods_overlap(d(1, 8), d(10, 22), d(2, 8), d(3, 22)));
        // touching endpoints count as overlap (closed intervals)
        assert!(periods_overlap(d(1, 8), d(2, 12), d(2, 12), d(3, 22)));
        // disjoint
        assert!(!periods_overlap(d(1, 8), d(2, 12), d(2, 13), d(3, 22)));
        assert!(!periods_overlap(d(5, 0), d(6, 0), d(1, 0), d(2, 0)));
    }
}
