//! Bus-to-register mirror prediction core.
//!
//! Observes wire-level bus transfers, reassembles the register-model
//! operations they represent, and keeps each register's mirror value in step
//! with its access policy.

/// Canonical bus-operation model and the raw-transfer adapter seam.
pub mod bus;
pub use bus::{
    lane_mask, AccessStatus, BusAdapter, BusDirection, BusOperation, BUS_BYTE_LANES,
    BYTE_ENABLE_ALL,
};

/// Structured diagnostic reports, sinks, and aggregate counters.
pub mod report;
pub use report::{
    NullReporter, RecordingReporter, Report, ReportCounters, ReportSink, ReportTag, Severity,
};

/// Stable fault taxonomy for prediction-path failures.
pub mod fault;
pub use fault::PredictFault;

/// Register arena model: blocks, registers, fields, address resolution.
pub mod model;
pub use model::{
    Block, BlockCoverage, BlockId, CoverageRecord, Field, FieldAccess, Register, RegisterId,
    RegisterSpace, RegisterSpec, Resolution, SpaceError, MAX_REGISTER_WIDTH_BITS,
};

/// Prediction engine, pending-transaction table, and checkpoint audit.
pub mod predict;
pub use predict::{
    AuditOutcome, CompletionSink, NoopHook, ObserveOutcome, PendingAccess, PendingTable,
    PredictHook, PredictedTransaction, Predictor, RecordingSink, TransactionKind,
};

#[cfg(test)]
use proptest as _;
#[cfg(test)]
use rstest as _;
