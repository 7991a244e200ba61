//! Register object: fields, access policy, mirror storage, and coverage.

use crate::bus::BusDirection;
use crate::model::space::{BlockId, RegisterId};

/// Maximum register width supported by the mirror storage, in bits.
pub const MAX_REGISTER_WIDTH_BITS: u8 = 64;

/// Field-level access policy applied when predicting a mirror update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum FieldAccess {
    /// Writes replace the field; reads reflect it.
    #[default]
    ReadWrite,
    /// Writes are ignored; reads reflect the field.
    ReadOnly,
    /// Writes replace the field; read data is undefined and not mirrored.
    WriteOnly,
    /// Writing a one clears the corresponding bit; reads reflect the field.
    WriteOneToClear,
}

/// One named bit field within a register.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Field {
    /// Field name, unique within its register.
    pub name: String,
    /// Least-significant bit position within the register.
    pub lsb: u8,
    /// Field width in bits.
    pub width: u8,
    /// Access policy applied on mirror prediction.
    pub access: FieldAccess,
}

impl Field {
    /// Creates a field from its position, width, and policy.
    #[must_use]
    pub fn new(name: impl Into<String>, lsb: u8, width: u8, access: FieldAccess) -> Self {
        Self {
            name: name.into(),
            lsb,
            width,
            access,
        }
    }

    /// Returns the register-relative bit mask covered by this field.
    #[must_use]
    pub const fn mask(&self) -> u64 {
        let bits = if self.width >= MAX_REGISTER_WIDTH_BITS {
            u64::MAX
        } else {
            (1_u64 << self.width) - 1
        };
        bits << self.lsb
    }
}

/// Sampling record accumulated for functional-coverage bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct CoverageRecord {
    /// Number of completed accesses sampled.
    pub samples: u64,
    /// Value carried by the most recent sample.
    pub last_value: Option<u64>,
    /// Direction of the most recent sample.
    pub last_direction: Option<BusDirection>,
}

impl CoverageRecord {
    /// Records one sampled access.
    #[allow(clippy::missing_const_for_fn)]
    pub fn record(&mut self, value: u64, direction: BusDirection) {
        self.samples = self.samples.saturating_add(1);
        self.last_value = Some(value);
        self.last_direction = Some(direction);
    }
}

/// One register of the arena: identity, expected addresses, fields, mirror.
///
/// Constructed through `RegisterSpace::add_register`, which validates the
/// declaration; the arena hands out `RegisterId` handles for lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Register {
    name: String,
    block: BlockId,
    addresses: Vec<u64>,
    width_bits: u8,
    fields: Vec<Field>,
    mirror: u64,
    alias: Option<RegisterId>,
    coverage: CoverageRecord,
}

impl Register {
    pub(crate) fn new(
        name: String,
        block: BlockId,
        addresses: Vec<u64>,
        width_bits: u8,
        fields: Vec<Field>,
        reset: u64,
        alias: Option<RegisterId>,
    ) -> Self {
        let mut register = Self {
            name,
            block,
            addresses,
            width_bits,
            fields,
            mirror: 0,
            alias,
            coverage: CoverageRecord::default(),
        };
        register.mirror = reset & register.width_mask();
        register
    }

    /// Returns the register name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the owning block.
    #[must_use]
    pub const fn block(&self) -> BlockId {
        self.block
    }

    /// Returns the expected bus addresses in ascending slot order.
    #[must_use]
    pub fn addresses(&self) -> &[u64] {
        &self.addresses
    }

    /// Returns the register width in bits.
    #[must_use]
    pub const fn width_bits(&self) -> u8 {
        self.width_bits
    }

    /// Returns the declared fields in ascending bit order.
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Returns the indirect-register target this register aliases, if any.
    #[must_use]
    pub const fn alias(&self) -> Option<RegisterId> {
        self.alias
    }

    /// Returns the current mirror value.
    #[must_use]
    pub const fn mirror(&self) -> u64 {
        self.mirror
    }

    /// Returns the coverage record accumulated so far.
    #[must_use]
    pub const fn coverage(&self) -> &CoverageRecord {
        &self.coverage
    }

    /// Sets the mirror directly, bypassing field access policy.
    ///
    /// Host-side seeding path for known hardware state; predicted updates go
    /// through [`Register::predict_mirror`] instead.
    pub const fn set_mirror(&mut self, value: u64) {
        self.mirror = value & self.width_mask();
    }

    /// Updates the mirror from an observed access, honoring field policy.
    ///
    /// Written fields replace their mirrored bits except where the policy
    /// ignores writes (`ReadOnly`) or clears on ones (`WriteOneToClear`).
    /// Observed reads teach the mirror the device value except for
    /// `WriteOnly` fields, whose read data is undefined.
    pub fn predict_mirror(&mut self, value: u64, direction: BusDirection) {
        let mut mirror = self.mirror;
        for field in &self.fields {
            let mask = field.mask();
            let incoming = value & mask;
            match (direction, field.access) {
                (BusDirection::Write, FieldAccess::ReadWrite | FieldAccess::WriteOnly) => {
                    mirror = (mirror & !mask) | incoming;
                }
                (BusDirection::Write, FieldAccess::WriteOneToClear) => {
                    mirror &= !incoming;
                }
                (BusDirection::Write, FieldAccess::ReadOnly)
                | (BusDirection::Read, FieldAccess::WriteOnly) => {}
                (BusDirection::Read, _) => {
                    mirror = (mirror & !mask) | incoming;
                }
            }
        }
        self.mirror = mirror & self.width_mask();
    }

    /// Records a completed access for coverage purposes.
    #[allow(clippy::missing_const_for_fn)]
    pub fn sample(&mut self, value: u64, direction: BusDirection) {
        self.coverage.record(value, direction);
    }

    /// Returns the mask of bits covered by the register width.
    #[must_use]
    pub const fn width_mask(&self) -> u64 {
        if self.width_bits >= MAX_REGISTER_WIDTH_BITS {
            u64::MAX
        } else {
            (1_u64 << self.width_bits) - 1
        }
    }
}
