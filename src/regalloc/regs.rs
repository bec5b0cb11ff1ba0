use std::fmt;

/// x86-64 general-purpose registers (System V AMD64 ABI).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum X86Reg {
    Rax,
    Rbx,
    Rcx,
    Rdx,
    Rsi,
    Rdi,
    Rbp,
    Rsp,
    R8,
    R9,
    R10,
    R11,
    R12,
    R13,
    R14,
    R15,
}

impl X86Reg {
    pub fn name64(&self) -> &'static str {
        match self {
            X86Reg::Rax => "rax",
            X86Reg::Rbx => "rbx",
            X86Reg::Rcx => "rcx",
            X86Reg::Rdx => "rdx",
            X86Reg::Rsi => "rsi",
            X86Reg::Rdi => "rdi",
            X86Reg::Rbp => "rbp",
            X86Reg::Rsp => "rsp",
            X86Reg::R8 => "r8",
            X86Reg::R9 => "r9",
            X86Reg::R10 => "r10",
            X86Reg::R11 => "r11",
            X86Reg::R12 => "r12",
            X86Reg::R13 => "r13",
            X86Reg::R14 => "r14",
            X86Reg::R15 => "r15",
        }
    }

    /// 32-bit name; all value operations in this backend are 32-bit.
    pub fn name32(&self) -> &'static str {
        match self {
            X86Reg::Rax => "eax",
            X86Reg::Rbx => "ebx",
            X86Reg::Rcx => "ecx",
            X86Reg::Rdx => "edx",
            X86Reg::Rsi => "esi",
            X86Reg::Rdi => "edi",
            X86Reg::Rbp => "ebp",
            X86Reg::Rsp => "esp",
            X86Reg::R8 => "r8d",
            X86Reg::R9 => "r9d",
            X86Reg::R10 => "r10d",
            X86Reg::R11 => "r11d",
            X86Reg::R12 => "r12d",
            X86Reg::R13 => "r13d",
            X86Reg::R14 => "r14d",
            X86Reg::R15 => "r15d",
        }
    }

    pub fn is_caller_saved(&self) -> bool {
        matches!(
            self,
            X86Reg::Rax
                | X86Reg::Rcx
                | X86Reg::Rdx
                | X86Reg::Rsi
                | X86Reg::Rdi
                | X86Reg::R8
                | X86Reg::R9
                | X86Reg::R10
                | X86Reg::R11
        )
    }

    pub fn is_callee_saved(&self) -> bool {
        !self.is_caller_saved()
    }
}

impl fmt::Display for X86Reg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name32())
    }
}

/// Register reserved to legalize instructions that would otherwise need two
/// memory operands (or whose register operand was stolen by the result).
pub const SCRATCH: X86Reg = X86Reg::R11;

/// Return value register; also the fixed low half of the idiv dividend.
pub const RETURN_VALUE: X86Reg = X86Reg::Rax;

/// Fixed high half of the idiv dividend; receives the remainder.
pub const DIV_REMAINDER: X86Reg = X86Reg::Rdx;

/// Registers handed out by the allocator, in allocation order. Excluded:
/// rsp/rbp (stack and frame pointers), r11 (scratch), rax/rdx (pinned by
/// division and the return value) and rbx.
pub const ALLOCATABLE: [X86Reg; 10] = [
    X86Reg::Rcx,
    X86Reg::Rsi,
    X86Reg::Rdi,
    X86Reg::R8,
    X86Reg::R9,
    X86Reg::R10,
    X86Reg::R12,
    X86Reg::R13,
    X86Reg::R14,
    X86Reg::R15,
];
