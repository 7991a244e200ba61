//! Pending-transaction table tracking partially accumulated accesses.

use std::collections::{BTreeMap, BTreeSet};

use crate::bus::AccessStatus;
use crate::model::RegisterId;
use crate::predict::TransactionKind;

/// One register access mid-accumulation.
///
/// The observed address set is always a strict subset of the register's
/// expected set while the entry lives in the table; the entry is removed the
/// instant the two sets become equal.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct PendingAccess {
    register: RegisterId,
    kind: TransactionKind,
    value: u64,
    status: AccessStatus,
    observed: BTreeSet<u64>,
}

impl PendingAccess {
    pub(crate) fn new(register: RegisterId, kind: TransactionKind) -> Self {
        Self {
            register,
            kind,
            value: 0,
            status: AccessStatus::Ok,
            observed: BTreeSet::new(),
        }
    }

    /// Returns the register this entry accumulates for.
    #[must_use]
    pub const fn register(&self) -> RegisterId {
        self.register
    }

    /// Returns the access kind seeded from the first observed beat.
    #[must_use]
    pub const fn kind(&self) -> TransactionKind {
        self.kind
    }

    /// Returns the value accumulated so far.
    #[must_use]
    pub const fn value(&self) -> u64 {
        self.value
    }

    /// Returns the accumulated status; any errored beat degrades it.
    #[must_use]
    pub const fn status(&self) -> AccessStatus {
        self.status
    }

    /// Returns `true` when `addr` was already observed for this entry.
    #[must_use]
    pub fn has_observed(&self, addr: u64) -> bool {
        self.observed.contains(&addr)
    }

    /// Returns the number of distinct addresses observed so far.
    #[must_use]
    pub fn observed_len(&self) -> usize {
        self.observed.len()
    }

    pub(crate) fn merge_beat(&mut self, addr: u64, contribution: u64, status: AccessStatus) {
        self.value |= contribution;
        self.observed.insert(addr);
        if !status.is_ok() {
            self.status = AccessStatus::Error;
        }
    }
}

/// Keyed store of at most one [`PendingAccess`] per register.
///
/// Private core state of the prediction engine; external readers see it only
/// through shared references, and iteration order is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct PendingTable {
    entries: BTreeMap<RegisterId, PendingAccess>,
}

impl PendingTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when `register` has an accumulation in progress.
    #[must_use]
    pub fn contains(&self, register: RegisterId) -> bool {
        self.entries.contains_key(&register)
    }

    /// Returns the entry for `register`, if one is in progress.
    #[must_use]
    pub fn get(&self, register: RegisterId) -> Option<&PendingAccess> {
        self.entries.get(&register)
    }

    /// Returns the number of registers with an accumulation in progress.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no accumulation is in progress.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates current entries in register-identity order.
    pub fn iter(&self) -> impl Iterator<Item = &PendingAccess> {
        self.entries.values()
    }

    pub(crate) fn take_or_create(
        &mut self,
        register: RegisterId,
        kind: TransactionKind,
    ) -> PendingAccess {
        self.entries
            .remove(&register)
            .unwrap_or_else(|| PendingAccess::new(register, kind))
    }

    pub(crate) fn restore(&mut self, entry: PendingAccess) {
        self.entries.insert(entry.register(), entry);
    }

    pub(crate) fn remove(&mut self, register: RegisterId) -> Option<PendingAccess> {
        self.entries.remove(&register)
    }
}

#[cfg(test)]
mod tests {
    use super::PendingTable;
    use crate::bus::AccessStatus;
    use crate::model::RegisterId;
    use crate::predict::TransactionKind;

    #[test]
    fn take_or_create_seeds_a_zeroed_entry() {
        let mut table = PendingTable::new();
        let entry = table.take_or_create(RegisterId::new(0), TransactionKind::PredictedWrite);

        assert_eq!(entry.register(), RegisterId::new(0));
        assert_eq!(entry.kind(), TransactionKind::PredictedWrite);
        assert_eq!(entry.value(), 0);
        assert_eq!(entry.status(), AccessStatus::Ok);
        assert_eq!(entry.observed_len(), 0);
        assert!(table.is_empty());
    }

    #[test]
    fn take_or_create_keeps_the_original_kind() {
        let mut table = PendingTable::new();
        let mut entry = table.take_or_create(RegisterId::new(0), TransactionKind::PredictedWrite);
        entry.merge_beat(0x10, 0xAA, AccessStatus::Ok);
        table.restore(entry);

        let entry = table.take_or_create(RegisterId::new(0), TransactionKind::PredictedRead);
        assert_eq!(entry.kind(), TransactionKind::PredictedWrite);
    }

    #[test]
    fn restored_entries_are_observable() {
        let mut table = PendingTable::new();
        let mut entry = table.take_or_create(RegisterId::new(2), TransactionKind::PredictedRead);
        entry.merge_beat(0x10, 0xAA, AccessStatus::Ok);
        table.restore(entry);

        assert!(table.contains(RegisterId::new(2)));
        assert_eq!(table.len(), 1);
        let entry = table.get(RegisterId::new(2)).expect("entry restored");
        assert!(entry.has_observed(0x10));
        assert!(!entry.has_observed(0x14));
        assert_eq!(entry.value(), 0xAA);
    }

    #[test]
    fn merge_accumulates_value_and_degrades_status_stickily() {
        let mut table = PendingTable::new();
        let mut entry = table.take_or_create(RegisterId::new(0), TransactionKind::PredictedWrite);

        entry.merge_beat(0x10, 0xAA, AccessStatus::Ok);
        entry.merge_beat(0x14, 0xBB00, AccessStatus::Error);
        entry.merge_beat(0x18, 0xCC_0000, AccessStatus::Ok);

        assert_eq!(entry.value(), 0xCC_BBAA);
        assert_eq!(entry.status(), AccessStatus::Error);
        assert_eq!(entry.observed_len(), 3);
    }

    #[test]
    fn removal_empties_the_table() {
        let mut table = PendingTable::new();
        let entry = table.take_or_create(RegisterId::new(1), TransactionKind::PredictedRead);
        table.restore(entry);

        assert!(table.remove(RegisterId::new(1)).is_some());
        assert!(table.remove(RegisterId::new(1)).is_none());
        assert!(table.is_empty());
    }

    #[test]
    fn iteration_is_ordered_by_register_identity() {
        let mut table = PendingTable::new();
        for index in [3_u32, 0, 2] {
            let entry =
                table.take_or_create(RegisterId::new(index), TransactionKind::PredictedWrite);
            table.restore(entry);
        }

        let order: Vec<_> = table.iter().map(super::PendingAccess::register).collect();
        assert_eq!(
            order,
            [RegisterId::new(0), RegisterId::new(2), RegisterId::new(3)]
        );
    }
}
