//! Prediction engine reconciling bus beats into register-model operations.
//!
//! Each observed transfer runs the full sequence before the next is accepted:
//! 1. Decode the raw transfer through the configured adapter
//! 2. Resolve the address to a register, or discard as not applicable
//! 3. Look up or create the pending entry; detect collisions
//! 4. Merge the beat into the accumulator at its slot offset
//! 5. On completion: read-check, pre-publish hook, coverage sampling,
//!    mirror update, publish, entry removal
//!
//! A completing access leaves the table the instant its last beat merges, so
//! the table never holds a complete-but-unpublished entry.

/// Checkpoint audit over the pending-transaction table.
pub mod audit;
/// Pending-transaction table and its per-register accumulator entries.
pub mod pending;

pub use audit::AuditOutcome;
pub use pending::{PendingAccess, PendingTable};

use crate::bus::{lane_mask, AccessStatus, BusAdapter, BusDirection};
use crate::fault::PredictFault;
use crate::model::{RegisterId, RegisterSpace, Resolution};
use crate::report::{Report, ReportCounters, ReportSink, ReportTag, Severity};

/// Kind label carried by a predicted register transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum TransactionKind {
    /// Reconstructed from observed read beats.
    PredictedRead,
    /// Reconstructed from observed write beats.
    PredictedWrite,
}

impl TransactionKind {
    /// Returns the kind label for a bus direction.
    #[must_use]
    pub const fn from_direction(direction: BusDirection) -> Self {
        match direction {
            BusDirection::Read => Self::PredictedRead,
            BusDirection::Write => Self::PredictedWrite,
        }
    }

    /// Returns the bus direction this kind was reconstructed from.
    #[must_use]
    pub const fn direction(self) -> BusDirection {
        match self {
            Self::PredictedRead => BusDirection::Read,
            Self::PredictedWrite => BusDirection::Write,
        }
    }

    /// Returns `true` for predicted reads.
    #[must_use]
    pub const fn is_read(self) -> bool {
        matches!(self, Self::PredictedRead)
    }
}

/// One fully reassembled abstract register transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct PredictedTransaction {
    /// Target register of the access.
    pub target: RegisterId,
    /// Kind label of the access.
    pub kind: TransactionKind,
    /// Assembled value across all observed beats.
    pub value: u64,
    /// Accumulated completion status.
    pub status: AccessStatus,
}

/// Sink receiving completed transactions in completion order.
pub trait CompletionSink {
    /// Takes ownership of one completed transaction.
    fn publish(&mut self, txn: PredictedTransaction);
}

/// Completion sink retaining every published transaction.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    /// Published transactions in completion order.
    pub published: Vec<PredictedTransaction>,
}

impl RecordingSink {
    /// Creates an empty recording sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl CompletionSink for RecordingSink {
    fn publish(&mut self, txn: PredictedTransaction) {
        self.published.push(txn);
    }
}

/// Extension point invoked once per completed access before mirror update
/// and publish.
///
/// The engine proceeds with whatever target, value, kind, and status the
/// hook leaves behind.
pub trait PredictHook {
    /// Inspects or rewrites a transaction about to be published.
    fn pre_publish(&mut self, txn: &mut PredictedTransaction) {
        let _ = txn;
    }
}

/// Default hook leaving every transaction untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHook;

impl PredictHook for NoopHook {}

/// Outcome of observing one raw bus transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum ObserveOutcome {
    /// The beat completed an access; a transaction was published.
    Completed {
        /// Register the transaction was published for (post-hook target).
        register: RegisterId,
    },
    /// The beat merged into an accumulation that is still incomplete.
    Accumulated {
        /// Register being accumulated.
        register: RegisterId,
        /// Distinct addresses observed so far.
        observed: usize,
        /// Size of the expected address set.
        expected: usize,
    },
    /// The transfer resolved to no register and was discarded.
    Ignored,
    /// A collision discarded the register's accumulated state.
    Collision {
        /// Register whose entry was discarded.
        register: RegisterId,
    },
    /// A fault aborted processing of this transfer.
    Fault {
        /// Fault raised while processing the transfer.
        cause: PredictFault,
    },
}

/// Prediction engine over raw transfers of type `T`.
///
/// Owns the pending-transaction table exclusively; `&mut self` on
/// [`Predictor::observe`] serializes the observation stream.
pub struct Predictor<T> {
    adapter: Option<Box<dyn BusAdapter<T>>>,
    hook: Box<dyn PredictHook>,
    pending: PendingTable,
    counters: ReportCounters,
}

impl<T> Default for Predictor<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Predictor<T> {
    /// Creates an engine with no adapter and the no-op hook.
    #[must_use]
    pub fn new() -> Self {
        Self {
            adapter: None,
            hook: Box::new(NoopHook),
            pending: PendingTable::new(),
            counters: ReportCounters::new(),
        }
    }

    /// Installs the bus adapter; required before the first observation.
    pub fn set_adapter(&mut self, adapter: Box<dyn BusAdapter<T>>) {
        self.adapter = Some(adapter);
    }

    /// Returns `true` when a bus adapter is installed.
    #[must_use]
    pub const fn has_adapter(&self) -> bool {
        self.adapter.is_some()
    }

    /// Installs the pre-publish hook, replacing the current one.
    pub fn set_hook(&mut self, hook: Box<dyn PredictHook>) {
        self.hook = hook;
    }

    /// Returns the pending-transaction table for inspection.
    #[must_use]
    pub const fn pending(&self) -> &PendingTable {
        &self.pending
    }

    /// Returns the aggregate report counters.
    #[must_use]
    pub const fn counters(&self) -> &ReportCounters {
        &self.counters
    }

    fn emit(&mut self, reporter: &mut dyn ReportSink, report: Report) {
        self.counters.record(&report);
        reporter.report(report);
    }

    /// Observes one raw bus transfer and advances the prediction state.
    ///
    /// All mandated observability flows through `sink` and `reporter`; the
    /// returned outcome is advisory and may be ignored.
    ///
    /// # Panics
    ///
    /// Panics when a pre-publish hook redirects a transaction to a register
    /// identity that was not issued by `space`.
    #[allow(clippy::too_many_lines)]
    pub fn observe(
        &mut self,
        transfer: &T,
        space: &mut RegisterSpace,
        sink: &mut dyn CompletionSink,
        reporter: &mut dyn ReportSink,
    ) -> ObserveOutcome {
        let Some(adapter) = self.adapter.as_ref() else {
            let cause = PredictFault::MissingAdapter;
            self.emit(reporter, Report::from_fault(&cause));
            return ObserveOutcome::Fault { cause };
        };
        let op = adapter.decode(transfer);

        let register = match space.resolve(op.addr) {
            Resolution::Register(register) => register,
            Resolution::Memory => {
                self.emit(
                    reporter,
                    Report::new(
                        Severity::Info,
                        ReportTag::NotApplicable,
                        format!(
                            "address {:#06x} targets a memory range excluded from prediction",
                            op.addr
                        ),
                    ),
                );
                return ObserveOutcome::Ignored;
            }
            Resolution::Unmapped => {
                self.emit(
                    reporter,
                    Report::new(
                        Severity::Info,
                        ReportTag::NotApplicable,
                        format!("no register is mapped at address {:#06x}", op.addr),
                    ),
                );
                return ObserveOutcome::Ignored;
            }
        };

        let kind = TransactionKind::from_direction(op.direction);
        let mut entry = self.pending.take_or_create(register, kind);

        if entry.has_observed(op.addr) {
            let cause = PredictFault::Collision {
                register: space.full_name(register),
                addr: op.addr,
            };
            self.emit(reporter, Report::from_fault(&cause));
            return ObserveOutcome::Collision { register };
        }

        let expected = space.expected_addresses(register);
        let Some(slot) = expected.iter().position(|candidate| *candidate == op.addr) else {
            self.pending.restore(entry);
            let cause = PredictFault::SlotLookupFailed {
                register: space.full_name(register),
                addr: op.addr,
            };
            self.emit(reporter, Report::from_fault(&cause));
            return ObserveOutcome::Fault { cause };
        };
        let expected_len = expected.len();

        // Slots of one register are disjoint bit ranges of a zero-initialized
        // accumulator, so shifted OR is placement.
        let bus_bytes = space.bus_bytes();
        #[allow(clippy::cast_possible_truncation)]
        let shift = (slot as u32) * u32::from(bus_bytes) * 8;
        let contribution = (op.data & lane_mask(op.byte_enable, bus_bytes)) << shift;
        entry.merge_beat(op.addr, contribution, op.status);

        if entry.observed_len() < expected_len {
            let observed = entry.observed_len();
            self.pending.restore(entry);
            return ObserveOutcome::Accumulated {
                register,
                observed,
                expected: expected_len,
            };
        }

        self.finish(entry, register, space, sink, reporter)
    }

    /// Runs the completion sequence for a fully accumulated access.
    fn finish(
        &mut self,
        entry: PendingAccess,
        register: RegisterId,
        space: &mut RegisterSpace,
        sink: &mut dyn CompletionSink,
        reporter: &mut dyn ReportSink,
    ) -> ObserveOutcome {
        if entry.kind().is_read() && space.check_on_read() && entry.status().is_ok() {
            let mirrored = space.register(register).mirror();
            if mirrored != entry.value() {
                let cause = PredictFault::MirrorMismatch {
                    register: space.full_name(register),
                    mirrored,
                    observed: entry.value(),
                };
                self.emit(reporter, Report::from_fault(&cause));
            }
        }

        let mut txn = PredictedTransaction {
            target: register,
            kind: entry.kind(),
            value: entry.value(),
            status: entry.status(),
        };
        self.hook.pre_publish(&mut txn);

        let target = txn.target;
        let direction = txn.kind.direction();
        let alias = space.register(target).alias();
        space.register_mut(target).sample(txn.value, direction);
        if let Some(alias) = alias {
            space.register_mut(alias).sample(txn.value, direction);
        }

        let block = space.register(target).block();
        let offset = space
            .register(target)
            .addresses()
            .first()
            .map_or(0, |base| base.saturating_sub(space.block(block).base()));
        space.block_mut(block).sample_offset(offset, direction);

        space.register_mut(target).predict_mirror(txn.value, direction);

        sink.publish(txn);
        self.counters.record_published();
        ObserveOutcome::Completed { register: target }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        CompletionSink, NoopHook, ObserveOutcome, PredictHook, PredictedTransaction, Predictor,
        RecordingSink, TransactionKind,
    };
    use crate::bus::{AccessStatus, BusAdapter, BusDirection, BusOperation};
    use crate::fault::PredictFault;
    use crate::model::{RegisterId, RegisterSpace, RegisterSpec};
    use crate::report::{RecordingReporter, ReportTag, Severity};

    /// Raw transfer type used by the unit tests: already canonical.
    struct PassThrough;

    impl BusAdapter<BusOperation> for PassThrough {
        fn decode(&self, transfer: &BusOperation) -> BusOperation {
            *transfer
        }
    }

    fn predictor() -> Predictor<BusOperation> {
        let mut predictor = Predictor::new();
        predictor.set_adapter(Box::new(PassThrough));
        predictor
    }

    fn space_with(registers: &[(&str, &[u64], u8)]) -> (RegisterSpace, Vec<RegisterId>) {
        let mut space = RegisterSpace::new(4).expect("4-byte bus is supported");
        let block = space.add_block("blk", 0x0);
        let ids = registers
            .iter()
            .map(|(name, addrs, width)| {
                space
                    .add_register(block, RegisterSpec::new(*name, addrs.to_vec(), *width))
                    .expect("valid declaration")
            })
            .collect();
        (space, ids)
    }

    fn write(addr: u64, data: u64) -> BusOperation {
        BusOperation::new(addr, data, BusDirection::Write)
    }

    #[test]
    fn missing_adapter_is_fatal_and_aborts_the_call() {
        let mut predictor: Predictor<BusOperation> = Predictor::new();
        let (mut space, _) = space_with(&[("r", &[0x10], 32)]);
        let mut sink = RecordingSink::new();
        let mut reporter = RecordingReporter::new();

        let outcome = predictor.observe(&write(0x10, 1), &mut space, &mut sink, &mut reporter);

        assert_eq!(
            outcome,
            ObserveOutcome::Fault {
                cause: PredictFault::MissingAdapter,
            }
        );
        assert!(predictor.pending().is_empty());
        assert!(sink.published.is_empty());
        assert_eq!(reporter.reports.len(), 1);
        assert_eq!(reporter.reports[0].severity, Severity::Fatal);
        assert_eq!(reporter.reports[0].tag, ReportTag::MissingAdapter);
        assert_eq!(predictor.counters().missing_adapter_count, 1);
    }

    #[test]
    fn single_slot_register_completes_on_one_beat() {
        let mut predictor = predictor();
        let (mut space, ids) = space_with(&[("r", &[0x10], 32)]);
        let mut sink = RecordingSink::new();
        let mut reporter = RecordingReporter::new();

        let outcome =
            predictor.observe(&write(0x10, 0xDEAD_BEEF), &mut space, &mut sink, &mut reporter);

        assert_eq!(outcome, ObserveOutcome::Completed { register: ids[0] });
        assert_eq!(
            sink.published,
            [PredictedTransaction {
                target: ids[0],
                kind: TransactionKind::PredictedWrite,
                value: 0xDEAD_BEEF,
                status: AccessStatus::Ok,
            }]
        );
        assert!(predictor.pending().is_empty());
        assert_eq!(space.register(ids[0]).mirror(), 0xDEAD_BEEF);
        assert!(reporter.reports.is_empty());
        assert_eq!(predictor.counters().published_count, 1);
    }

    #[test]
    fn multi_slot_register_accumulates_then_completes() {
        let mut predictor = predictor();
        let (mut space, ids) = space_with(&[("wide", &[0x10, 0x14], 64)]);
        let mut sink = RecordingSink::new();
        let mut reporter = RecordingReporter::new();

        let first = predictor.observe(&write(0x10, 0xAA), &mut space, &mut sink, &mut reporter);
        assert_eq!(
            first,
            ObserveOutcome::Accumulated {
                register: ids[0],
                observed: 1,
                expected: 2,
            }
        );
        assert!(predictor.pending().contains(ids[0]));
        assert!(sink.published.is_empty());

        let second = predictor.observe(&write(0x14, 0xBB), &mut space, &mut sink, &mut reporter);
        assert_eq!(second, ObserveOutcome::Completed { register: ids[0] });
        assert_eq!(sink.published.len(), 1);
        assert_eq!(sink.published[0].value, 0x0000_00BB_0000_00AA);
        assert!(predictor.pending().is_empty());
    }

    #[test]
    fn collision_discards_the_entry_without_publishing() {
        let mut predictor = predictor();
        let (mut space, ids) = space_with(&[("wide", &[0x10, 0x14], 64)]);
        let mut sink = RecordingSink::new();
        let mut reporter = RecordingReporter::new();

        predictor.observe(&write(0x10, 0xAA), &mut space, &mut sink, &mut reporter);
        let outcome = predictor.observe(&write(0x10, 0xAA), &mut space, &mut sink, &mut reporter);

        assert_eq!(outcome, ObserveOutcome::Collision { register: ids[0] });
        assert!(predictor.pending().is_empty());
        assert!(sink.published.is_empty());
        assert!(reporter.has(ReportTag::Collision));
        assert!(reporter.reports[0].message.contains("blk.wide"));
        assert_eq!(predictor.counters().collision_count, 1);
    }

    #[test]
    fn unmapped_and_memory_addresses_are_ignored_with_info_reports() {
        let mut predictor = predictor();
        let (mut space, _) = space_with(&[("r", &[0x10], 32)]);
        space
            .add_memory_range("dram", 0x1000, 0x1FFF)
            .expect("disjoint range");
        let mut sink = RecordingSink::new();
        let mut reporter = RecordingReporter::new();

        let unmapped = predictor.observe(&write(0x80, 1), &mut space, &mut sink, &mut reporter);
        let memory = predictor.observe(&write(0x1004, 1), &mut space, &mut sink, &mut reporter);

        assert_eq!(unmapped, ObserveOutcome::Ignored);
        assert_eq!(memory, ObserveOutcome::Ignored);
        assert!(predictor.pending().is_empty());
        assert!(sink.published.is_empty());
        assert_eq!(reporter.count_of(ReportTag::NotApplicable), 2);
        assert!(reporter
            .reports
            .iter()
            .all(|report| report.severity == Severity::Info));
    }

    #[test]
    fn interleaved_registers_accumulate_independently() {
        let mut predictor = predictor();
        let (mut space, ids) =
            space_with(&[("a", &[0x10, 0x14], 64), ("b", &[0x20, 0x24], 64)]);
        let mut sink = RecordingSink::new();
        let mut reporter = RecordingReporter::new();

        predictor.observe(&write(0x10, 0x1), &mut space, &mut sink, &mut reporter);
        predictor.observe(&write(0x20, 0x2), &mut space, &mut sink, &mut reporter);
        assert_eq!(predictor.pending().len(), 2);

        predictor.observe(&write(0x24, 0x3), &mut space, &mut sink, &mut reporter);
        assert_eq!(sink.published.len(), 1);
        assert_eq!(sink.published[0].target, ids[1]);

        predictor.observe(&write(0x14, 0x4), &mut space, &mut sink, &mut reporter);
        assert_eq!(sink.published.len(), 2);
        assert_eq!(sink.published[1].target, ids[0]);
        assert!(predictor.pending().is_empty());
    }

    #[test]
    fn byte_enable_masks_disabled_lanes_out_of_the_merge() {
        let mut predictor = predictor();
        let (mut space, _) = space_with(&[("r", &[0x10], 32)]);
        let mut sink = RecordingSink::new();
        let mut reporter = RecordingReporter::new();

        let op = BusOperation::new(0x10, 0xAABB_CCDD, BusDirection::Write).with_byte_enable(0b0011);
        predictor.observe(&op, &mut space, &mut sink, &mut reporter);

        assert_eq!(sink.published[0].value, 0x0000_CCDD);
    }

    #[test]
    fn errored_beat_degrades_status_and_skips_read_check() {
        let mut predictor = predictor();
        let (mut space, ids) = space_with(&[("r", &[0x10], 32)]);
        space.set_check_on_read(true);
        space.register_mut(ids[0]).set_mirror(0x1111);
        let mut sink = RecordingSink::new();
        let mut reporter = RecordingReporter::new();

        let op = BusOperation::new(0x10, 0x2222, BusDirection::Read)
            .with_status(AccessStatus::Error);
        predictor.observe(&op, &mut space, &mut sink, &mut reporter);

        assert_eq!(sink.published[0].status, AccessStatus::Error);
        assert!(!reporter.has(ReportTag::MirrorMismatch));
    }

    #[test]
    fn read_check_reports_mismatch_and_still_predicts() {
        let mut predictor = predictor();
        let (mut space, ids) = space_with(&[("r", &[0x10], 32)]);
        space.set_check_on_read(true);
        space.register_mut(ids[0]).set_mirror(0x1111);
        let mut sink = RecordingSink::new();
        let mut reporter = RecordingReporter::new();

        let op = BusOperation::new(0x10, 0x2222, BusDirection::Read);
        let outcome = predictor.observe(&op, &mut space, &mut sink, &mut reporter);

        assert_eq!(outcome, ObserveOutcome::Completed { register: ids[0] });
        assert!(reporter.has(ReportTag::MirrorMismatch));
        assert_eq!(sink.published[0].value, 0x2222);
        assert_eq!(space.register(ids[0]).mirror(), 0x2222);
        assert_eq!(predictor.counters().mirror_mismatch_count, 1);
    }

    #[test]
    fn matching_read_check_is_silent() {
        let mut predictor = predictor();
        let (mut space, ids) = space_with(&[("r", &[0x10], 32)]);
        space.set_check_on_read(true);
        space.register_mut(ids[0]).set_mirror(0x2222);
        let mut sink = RecordingSink::new();
        let mut reporter = RecordingReporter::new();

        let op = BusOperation::new(0x10, 0x2222, BusDirection::Read);
        predictor.observe(&op, &mut space, &mut sink, &mut reporter);

        assert!(!reporter.has(ReportTag::MirrorMismatch));
        assert_eq!(sink.published.len(), 1);
    }

    struct Redirect {
        to: RegisterId,
    }

    impl PredictHook for Redirect {
        fn pre_publish(&mut self, txn: &mut PredictedTransaction) {
            txn.target = self.to;
            txn.value ^= 0xFF;
        }
    }

    #[test]
    fn hook_redirection_drives_sampling_mirror_and_publish() {
        let mut predictor = predictor();
        let (mut space, ids) = space_with(&[("orig", &[0x10], 32), ("redir", &[0x20], 32)]);
        predictor.set_hook(Box::new(Redirect { to: ids[1] }));
        let mut sink = RecordingSink::new();
        let mut reporter = RecordingReporter::new();

        let outcome = predictor.observe(&write(0x10, 0x100), &mut space, &mut sink, &mut reporter);

        assert_eq!(outcome, ObserveOutcome::Completed { register: ids[1] });
        assert_eq!(sink.published[0].target, ids[1]);
        assert_eq!(sink.published[0].value, 0x1FF);
        assert_eq!(space.register(ids[1]).mirror(), 0x1FF);
        assert_eq!(space.register(ids[1]).coverage().samples, 1);
        assert_eq!(space.register(ids[0]).mirror(), 0);
        assert_eq!(space.register(ids[0]).coverage().samples, 0);
    }

    #[test]
    fn completion_samples_the_indirect_alias_target() {
        let mut space = RegisterSpace::new(4).expect("4-byte bus is supported");
        let block = space.add_block("blk", 0x0);
        let backing = space
            .add_register(block, RegisterSpec::new("backing", vec![0x40], 32))
            .expect("valid declaration");
        let data = space
            .add_register(
                block,
                RegisterSpec::new("data", vec![0x10], 32).aliasing(backing),
            )
            .expect("valid declaration");

        let mut predictor = predictor();
        let mut sink = RecordingSink::new();
        let mut reporter = RecordingReporter::new();
        predictor.observe(&write(0x10, 0x55), &mut space, &mut sink, &mut reporter);

        assert_eq!(space.register(data).coverage().samples, 1);
        assert_eq!(space.register(backing).coverage().samples, 1);
        assert_eq!(space.register(data).mirror(), 0x55);
        assert_eq!(space.register(backing).mirror(), 0);
    }

    #[test]
    fn completion_samples_the_owning_block_at_the_map_relative_offset() {
        let mut space = RegisterSpace::new(4).expect("4-byte bus is supported");
        let block = space.add_block("blk", 0x100);
        space
            .add_register(block, RegisterSpec::new("r", vec![0x110], 32))
            .expect("valid declaration");

        let mut predictor = predictor();
        let mut sink = RecordingSink::new();
        let mut reporter = RecordingReporter::new();
        predictor.observe(&write(0x110, 0x1), &mut space, &mut sink, &mut reporter);

        let coverage = space.block(block).coverage();
        assert_eq!(coverage.samples, 1);
        assert_eq!(coverage.last_offset, Some(0x10));
        assert_eq!(coverage.last_direction, Some(BusDirection::Write));
    }

    #[test]
    fn noop_hook_leaves_transactions_untouched() {
        let mut hook = NoopHook;
        let mut txn = PredictedTransaction {
            target: RegisterId::new(0),
            kind: TransactionKind::PredictedRead,
            value: 0x42,
            status: AccessStatus::Ok,
        };
        hook.pre_publish(&mut txn);
        assert_eq!(txn.value, 0x42);
        assert_eq!(txn.kind, TransactionKind::PredictedRead);
    }

    /// Sink counting publishes without retaining them.
    struct CountingSink {
        published: usize,
    }

    impl CompletionSink for CountingSink {
        fn publish(&mut self, _txn: PredictedTransaction) {
            self.published += 1;
        }
    }

    #[test]
    fn read_and_write_kinds_are_labeled_from_the_first_beat() {
        let mut predictor = predictor();
        let (mut space, _) = space_with(&[("r", &[0x10], 32), ("s", &[0x20], 32)]);
        let mut sink = RecordingSink::new();
        let mut reporter = RecordingReporter::new();

        predictor.observe(
            &BusOperation::new(0x10, 0, BusDirection::Read),
            &mut space,
            &mut sink,
            &mut reporter,
        );
        predictor.observe(
            &BusOperation::new(0x20, 0, BusDirection::Write),
            &mut space,
            &mut sink,
            &mut reporter,
        );

        assert_eq!(sink.published[0].kind, TransactionKind::PredictedRead);
        assert_eq!(sink.published[1].kind, TransactionKind::PredictedWrite);

        let mut counting = CountingSink { published: 0 };
        predictor.observe(&write(0x10, 1), &mut space, &mut counting, &mut reporter);
        assert_eq!(counting.published, 1);
    }
}
