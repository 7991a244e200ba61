//! Register arena: stable identities, address resolution, and validation.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::bus::{BusDirection, BUS_BYTE_LANES};
use crate::model::register::{Field, FieldAccess, Register, MAX_REGISTER_WIDTH_BITS};

/// Stable arena identity of one register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct RegisterId(u32);

impl RegisterId {
    /// Creates an identity from its raw arena index.
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw arena index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Stable arena identity of one register block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct BlockId(u32);

impl BlockId {
    /// Creates an identity from its raw arena index.
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw arena index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Sampling record accumulated by a block across its registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct BlockCoverage {
    /// Number of completed accesses sampled within the block.
    pub samples: u64,
    /// Map-relative offset of the most recent sample.
    pub last_offset: Option<u64>,
    /// Direction of the most recent sample.
    pub last_direction: Option<BusDirection>,
}

/// One register block: a named group of registers sharing a base address.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Block {
    name: String,
    base: u64,
    coverage: BlockCoverage,
}

impl Block {
    /// Returns the block name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the block base address.
    #[must_use]
    pub const fn base(&self) -> u64 {
        self.base
    }

    /// Returns the coverage record accumulated so far.
    #[must_use]
    pub const fn coverage(&self) -> &BlockCoverage {
        &self.coverage
    }

    /// Records a completed access at a map-relative offset.
    #[allow(clippy::missing_const_for_fn)]
    pub fn sample_offset(&mut self, offset: u64, direction: BusDirection) {
        self.coverage.samples = self.coverage.samples.saturating_add(1);
        self.coverage.last_offset = Some(offset);
        self.coverage.last_direction = Some(direction);
    }
}

/// Declaration of one register, validated by [`RegisterSpace::add_register`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct RegisterSpec {
    /// Register name, unique within its block.
    pub name: String,
    /// Expected bus addresses in ascending slot order.
    pub addresses: Vec<u64>,
    /// Register width in bits (1..=64).
    pub width_bits: u8,
    /// Declared fields; empty means one full-width read-write field.
    pub fields: Vec<Field>,
    /// Reset value seeding the mirror.
    pub reset: u64,
    /// Indirect-register target this register aliases.
    pub alias: Option<RegisterId>,
}

impl RegisterSpec {
    /// Creates a declaration with no fields, zero reset, and no alias.
    #[must_use]
    pub fn new(name: impl Into<String>, addresses: Vec<u64>, width_bits: u8) -> Self {
        Self {
            name: name.into(),
            addresses,
            width_bits,
            fields: Vec::new(),
            reset: 0,
            alias: None,
        }
    }

    /// Declares explicit fields.
    #[must_use]
    pub fn with_fields(mut self, fields: Vec<Field>) -> Self {
        self.fields = fields;
        self
    }

    /// Declares a reset value.
    #[must_use]
    pub const fn with_reset(mut self, reset: u64) -> Self {
        self.reset = reset;
        self
    }

    /// Declares an indirect-register alias target.
    #[must_use]
    pub const fn aliasing(mut self, target: RegisterId) -> Self {
        self.alias = Some(target);
        self
    }
}

/// Outcome of resolving one bus address against the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Resolution {
    /// The address belongs to a register's expected address set.
    Register(RegisterId),
    /// The address falls in a bulk memory range excluded from prediction.
    Memory,
    /// No register or memory range claims the address.
    Unmapped,
}

/// Rejected register-arena declarations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum SpaceError {
    /// The bus width is outside the supported lane range.
    #[error("bus width of {bus_bytes} bytes is outside the supported 1..={BUS_BYTE_LANES} range")]
    UnsupportedBusWidth {
        /// Declared bus width in bytes.
        bus_bytes: u8,
    },
    /// The register width is outside the supported mirror range.
    #[error(
        "register `{name}` declares {width_bits} bits, outside the supported 1..={MAX_REGISTER_WIDTH_BITS} range"
    )]
    UnsupportedRegisterWidth {
        /// Register name.
        name: String,
        /// Declared width in bits.
        width_bits: u8,
    },
    /// The declared address count does not cover the register width.
    #[error(
        "register `{name}` declares {declared} address(es) but its width requires {required} slot(s)"
    )]
    SlotCountMismatch {
        /// Register name.
        name: String,
        /// Number of declared addresses.
        declared: usize,
        /// Number of slots required by the width.
        required: usize,
    },
    /// An address is already claimed by another register or memory range.
    #[error("address {addr:#06x} is already claimed by `{owner}`")]
    AddressClaimed {
        /// Contested bus address.
        addr: u64,
        /// Full identity of the current owner.
        owner: String,
    },
    /// A field extends beyond the register width.
    #[error("field `{field}` of register `{name}` extends beyond its {width_bits}-bit width")]
    FieldOutOfRange {
        /// Register name.
        name: String,
        /// Offending field name.
        field: String,
        /// Register width in bits.
        width_bits: u8,
    },
    /// Two fields of one register overlap.
    #[error("fields `{first}` and `{second}` of register `{name}` overlap")]
    FieldOverlap {
        /// Register name.
        name: String,
        /// First overlapping field.
        first: String,
        /// Second overlapping field.
        second: String,
    },
    /// An alias target was never registered.
    #[error("alias target of register `{name}` is not a registered identity")]
    UnknownAliasTarget {
        /// Register name.
        name: String,
    },
    /// A memory range was declared with its bounds inverted.
    #[error("memory range `{name}` has inverted bounds")]
    InvertedMemoryRange {
        /// Range name.
        name: String,
    },
    /// A block identity was never issued by this arena.
    #[error("block identity is not registered in this arena")]
    UnknownBlock,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
struct MemRange {
    name: String,
    start: u64,
    end: u64,
}

impl MemRange {
    const fn contains(&self, addr: u64) -> bool {
        addr >= self.start && addr <= self.end
    }
}

/// Arena of register blocks, registers, and their address index.
///
/// Identities handed out by the arena are plain indices; lookups through a
/// foreign arena's identities are a host error.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct RegisterSpace {
    bus_bytes: u8,
    check_on_read: bool,
    blocks: Vec<Block>,
    registers: Vec<Register>,
    by_address: BTreeMap<u64, RegisterId>,
    memory: Vec<MemRange>,
}

impl RegisterSpace {
    /// Creates an empty arena for a bus carrying `bus_bytes` bytes per beat.
    ///
    /// # Errors
    ///
    /// Returns [`SpaceError::UnsupportedBusWidth`] when `bus_bytes` is zero
    /// or wider than [`BUS_BYTE_LANES`].
    pub fn new(bus_bytes: u8) -> Result<Self, SpaceError> {
        if bus_bytes == 0 || bus_bytes > BUS_BYTE_LANES {
            return Err(SpaceError::UnsupportedBusWidth { bus_bytes });
        }
        Ok(Self {
            bus_bytes,
            check_on_read: false,
            blocks: Vec::new(),
            registers: Vec::new(),
            by_address: BTreeMap::new(),
            memory: Vec::new(),
        })
    }

    /// Returns the bus width in bytes.
    #[must_use]
    pub const fn bus_bytes(&self) -> u8 {
        self.bus_bytes
    }

    /// Returns `true` when completed reads are verified against mirrors.
    #[must_use]
    pub const fn check_on_read(&self) -> bool {
        self.check_on_read
    }

    /// Enables or disables read verification against mirrors.
    pub const fn set_check_on_read(&mut self, enabled: bool) {
        self.check_on_read = enabled;
    }

    /// Adds a block and returns its identity.
    #[allow(clippy::cast_possible_truncation)]
    pub fn add_block(&mut self, name: impl Into<String>, base: u64) -> BlockId {
        let id = BlockId::new(self.blocks.len() as u32);
        self.blocks.push(Block {
            name: name.into(),
            base,
            coverage: BlockCoverage::default(),
        });
        id
    }

    /// Adds a register to `block` and returns its identity.
    ///
    /// # Errors
    ///
    /// Returns a [`SpaceError`] when the declaration is inconsistent: unknown
    /// block or alias target, unsupported width, address count not matching
    /// the slot count implied by the width, an address already claimed, or
    /// out-of-range/overlapping fields.
    #[allow(clippy::cast_possible_truncation)]
    pub fn add_register(
        &mut self,
        block: BlockId,
        spec: RegisterSpec,
    ) -> Result<RegisterId, SpaceError> {
        if block.index() >= self.blocks.len() {
            return Err(SpaceError::UnknownBlock);
        }
        if spec.width_bits == 0 || spec.width_bits > MAX_REGISTER_WIDTH_BITS {
            return Err(SpaceError::UnsupportedRegisterWidth {
                name: spec.name,
                width_bits: spec.width_bits,
            });
        }

        let slot_bits = usize::from(self.bus_bytes) * 8;
        let required = usize::from(spec.width_bits).div_ceil(slot_bits);
        if spec.addresses.len() != required {
            return Err(SpaceError::SlotCountMismatch {
                name: spec.name,
                declared: spec.addresses.len(),
                required,
            });
        }

        for (position, addr) in spec.addresses.iter().enumerate() {
            if let Some(owner) = self.by_address.get(addr) {
                return Err(SpaceError::AddressClaimed {
                    addr: *addr,
                    owner: self.full_name(*owner),
                });
            }
            if let Some(range) = self.memory.iter().find(|range| range.contains(*addr)) {
                return Err(SpaceError::AddressClaimed {
                    addr: *addr,
                    owner: range.name.clone(),
                });
            }
            if spec.addresses[..position].contains(addr) {
                return Err(SpaceError::AddressClaimed {
                    addr: *addr,
                    owner: spec.name,
                });
            }
        }

        let fields = if spec.fields.is_empty() {
            vec![Field::new("value", 0, spec.width_bits, FieldAccess::ReadWrite)]
        } else {
            spec.fields
        };
        for (position, field) in fields.iter().enumerate() {
            let top = u16::from(field.lsb) + u16::from(field.width);
            if field.width == 0 || top > u16::from(spec.width_bits) {
                return Err(SpaceError::FieldOutOfRange {
                    name: spec.name,
                    field: field.name.clone(),
                    width_bits: spec.width_bits,
                });
            }
            if let Some(other) = fields[..position]
                .iter()
                .find(|other| other.mask() & field.mask() != 0)
            {
                return Err(SpaceError::FieldOverlap {
                    name: spec.name,
                    first: other.name.clone(),
                    second: field.name.clone(),
                });
            }
        }

        if let Some(alias) = spec.alias {
            if alias.index() >= self.registers.len() {
                return Err(SpaceError::UnknownAliasTarget { name: spec.name });
            }
        }

        let id = RegisterId::new(self.registers.len() as u32);
        for addr in &spec.addresses {
            self.by_address.insert(*addr, id);
        }
        self.registers.push(Register::new(
            spec.name,
            block,
            spec.addresses,
            spec.width_bits,
            fields,
            spec.reset,
            spec.alias,
        ));
        Ok(id)
    }

    /// Declares a bulk memory range excluded from prediction.
    ///
    /// # Errors
    ///
    /// Returns [`SpaceError::InvertedMemoryRange`] when `start > end` and
    /// [`SpaceError::AddressClaimed`] when the range covers an address
    /// already claimed by a register.
    pub fn add_memory_range(
        &mut self,
        name: impl Into<String>,
        start: u64,
        end: u64,
    ) -> Result<(), SpaceError> {
        let name = name.into();
        if start > end {
            return Err(SpaceError::InvertedMemoryRange { name });
        }
        if let Some((addr, owner)) = self
            .by_address
            .range(start..=end)
            .next()
            .map(|(addr, owner)| (*addr, *owner))
        {
            return Err(SpaceError::AddressClaimed {
                addr,
                owner: self.full_name(owner),
            });
        }
        self.memory.push(MemRange { name, start, end });
        Ok(())
    }

    /// Resolves one bus address against the arena.
    #[must_use]
    pub fn resolve(&self, addr: u64) -> Resolution {
        if let Some(id) = self.by_address.get(&addr) {
            return Resolution::Register(*id);
        }
        if self.memory.iter().any(|range| range.contains(addr)) {
            return Resolution::Memory;
        }
        Resolution::Unmapped
    }

    /// Returns the register for an identity issued by this arena.
    ///
    /// # Panics
    ///
    /// Panics when `id` was not issued by this arena.
    #[must_use]
    pub fn register(&self, id: RegisterId) -> &Register {
        &self.registers[id.index()]
    }

    /// Returns the mutable register for an identity issued by this arena.
    ///
    /// # Panics
    ///
    /// Panics when `id` was not issued by this arena.
    #[must_use]
    pub fn register_mut(&mut self, id: RegisterId) -> &mut Register {
        &mut self.registers[id.index()]
    }

    /// Returns the register for an identity, if it was issued by this arena.
    #[must_use]
    pub fn get_register(&self, id: RegisterId) -> Option<&Register> {
        self.registers.get(id.index())
    }

    /// Returns the block for an identity issued by this arena.
    ///
    /// # Panics
    ///
    /// Panics when `id` was not issued by this arena.
    #[must_use]
    pub fn block(&self, id: BlockId) -> &Block {
        &self.blocks[id.index()]
    }

    /// Returns the mutable block for an identity issued by this arena.
    ///
    /// # Panics
    ///
    /// Panics when `id` was not issued by this arena.
    #[must_use]
    pub fn block_mut(&mut self, id: BlockId) -> &mut Block {
        &mut self.blocks[id.index()]
    }

    /// Returns the full `block.register` identity of a register.
    ///
    /// # Panics
    ///
    /// Panics when `id` was not issued by this arena.
    #[must_use]
    pub fn full_name(&self, id: RegisterId) -> String {
        let register = self.register(id);
        format!("{}.{}", self.block(register.block()).name(), register.name())
    }

    /// Returns the expected bus addresses of a register in slot order.
    ///
    /// # Panics
    ///
    /// Panics when `id` was not issued by this arena.
    #[must_use]
    pub fn expected_addresses(&self, id: RegisterId) -> &[u64] {
        self.register(id).addresses()
    }

    /// Returns the number of registered registers.
    #[must_use]
    pub fn register_count(&self) -> usize {
        self.registers.len()
    }
}
