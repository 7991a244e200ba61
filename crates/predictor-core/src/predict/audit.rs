//! Checkpoint audit over the pending-transaction table.

use crate::fault::PredictFault;
use crate::model::{RegisterId, RegisterSpace};
use crate::predict::{PendingAccess, Predictor};
use crate::report::{Report, ReportSink};

/// Result of one checkpoint audit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct AuditOutcome {
    /// Registers still mid-accumulation, in identity order.
    pub pending: Vec<RegisterId>,
}

impl AuditOutcome {
    /// Returns `true` when no accumulation was outstanding.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.pending.is_empty()
    }
}

impl<T> Predictor<T> {
    /// Audits the pending-transaction table at a lifecycle checkpoint.
    ///
    /// A non-empty table means a register access started but never received
    /// all its expected beats; the audit names every such register in one
    /// error report. The table itself is never mutated.
    ///
    /// # Panics
    ///
    /// Panics when a pending entry references a register identity that was
    /// not issued by `space`.
    pub fn audit(&mut self, space: &RegisterSpace, reporter: &mut dyn ReportSink) -> AuditOutcome {
        if self.pending().is_empty() {
            return AuditOutcome::default();
        }

        let pending: Vec<RegisterId> = self.pending().iter().map(PendingAccess::register).collect();
        let registers = pending
            .iter()
            .map(|id| space.full_name(*id))
            .collect::<Vec<_>>()
            .join(", ");
        let cause = PredictFault::PendingAtCheckpoint {
            count: pending.len(),
            registers,
        };
        self.emit(reporter, Report::from_fault(&cause));
        AuditOutcome { pending }
    }
}
