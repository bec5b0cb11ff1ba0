use std::fmt;

/// Bytes reserved per spilled value.
pub const SLOT_SIZE: u32 = 8;

/// A stack slot, addressed as a positive byte offset below the frame base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StackSlot {
    offset: u32,
}

impl StackSlot {
    /// Panics on a non-positive or misaligned offset; such a slot can only
    /// come from an allocator defect.
    pub fn new(offset: u32) -> Self {
        assert!(
            offset > 0 && offset % SLOT_SIZE == 0,
            "slot offset must be a positive multiple of {SLOT_SIZE}, got {offset}"
        );
        Self { offset }
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }
}

impl fmt::Display for StackSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dword ptr [rbp - {}]", self.offset)
    }
}
