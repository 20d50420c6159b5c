//! x86-64 opcodes.

/// Near return to the caller.
pub const RET: u8 = 0xC3;

/// One byte no-op.
pub const NOP: u8 = 0x90;
