use thiserror::Error;

use crate::report::{ReportTag, Severity};

/// Stable fault taxonomy for prediction-path failures.
///
/// Faults never unwind the observation stream; each carries enough context
/// to produce its canonical diagnostic report, and the engine continues with
/// the next transfer except where a fault explicitly discards one register's
/// accumulated state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum PredictFault {
    /// `observe` was called before a bus adapter was configured.
    #[error("no bus adapter is configured; transfer cannot be decoded")]
    MissingAdapter,
    /// A resolved address was missing from its register's expected set.
    #[error(
        "address {addr:#06x} resolved to register `{register}` but is not in its expected address set"
    )]
    SlotLookupFailed {
        /// Full identity of the resolved register.
        register: String,
        /// Offending bus address.
        addr: u64,
    },
    /// An address was re-observed within an in-progress accumulation.
    #[error(
        "address {addr:#06x} observed twice within the in-progress access to `{register}`; accumulated state discarded"
    )]
    Collision {
        /// Full identity of the register whose entry was discarded.
        register: String,
        /// Re-observed bus address.
        addr: u64,
    },
    /// An assembled read value disagreed with the register's mirror.
    #[error(
        "read of `{register}` assembled {observed:#x} but {mirrored:#x} was mirrored"
    )]
    MirrorMismatch {
        /// Full identity of the checked register.
        register: String,
        /// Value held by the mirror at check time.
        mirrored: u64,
        /// Value assembled from the observed beats.
        observed: u64,
    },
    /// Incomplete accumulations remained at the lifecycle checkpoint.
    #[error("{count} register access(es) incomplete at checkpoint: {registers}")]
    PendingAtCheckpoint {
        /// Number of registers still accumulating.
        count: usize,
        /// Comma-separated full identities of the pending registers.
        registers: String,
    },
}

impl PredictFault {
    /// Returns the report severity for this fault.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        match self {
            Self::MissingAdapter => Severity::Fatal,
            Self::SlotLookupFailed { .. }
            | Self::Collision { .. }
            | Self::MirrorMismatch { .. }
            | Self::PendingAtCheckpoint { .. } => Severity::Error,
        }
    }

    /// Returns the report category tag for this fault.
    #[must_use]
    pub const fn tag(&self) -> ReportTag {
        match self {
            Self::MissingAdapter => ReportTag::MissingAdapter,
            Self::SlotLookupFailed { .. } => ReportTag::InternalLookupFailure,
            Self::Collision { .. } => ReportTag::Collision,
            Self::MirrorMismatch { .. } => ReportTag::MirrorMismatch,
            Self::PendingAtCheckpoint { .. } => ReportTag::PendingAtCheckpoint,
        }
    }

    /// Faults that abort processing of the triggering call entirely.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self.severity(), Severity::Fatal)
    }
}
