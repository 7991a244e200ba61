//! Register arena model: blocks, registers, fields, and address resolution.

/// Register object, field policy, mirror storage, and coverage records.
pub mod register;
/// Arena of blocks and registers with stable identities and validation.
pub mod space;

pub use register::{
    CoverageRecord, Field, FieldAccess, Register, MAX_REGISTER_WIDTH_BITS,
};
pub use space::{
    Block, BlockCoverage, BlockId, RegisterId, RegisterSpace, RegisterSpec, Resolution, SpaceError,
};
