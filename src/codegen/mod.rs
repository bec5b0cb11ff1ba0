pub mod x86;

use std::fmt;

use crate::regalloc::{StackSlot, X86Reg};

pub use x86::{CodegenError, X86CodeGenerator};

const INDENT: &str = "    ";

/// Instruction operand in Intel syntax. Registers render as their 32-bit
/// names; every value in this backend is a 32-bit integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    Reg(X86Reg),
    Mem(StackSlot),
    Imm(i32),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Reg(reg) => write!(f, "{}", reg.name32()),
            Operand::Mem(slot) => write!(f, "{slot}"),
            Operand::Imm(value) => write!(f, "{value}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Mov,
    Add,
    Sub,
    Imul,
    Idiv,
    Cdq,
}

impl Op {
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Op::Mov => "mov",
            Op::Add => "add",
            Op::Sub => "sub",
            Op::Imul => "imul",
            Op::Idiv => "idiv",
            Op::Cdq => "cdq",
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mnemonic())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instr {
    pub op: Op,
    pub operands: Vec<Operand>,
}

impl Instr {
    pub fn nullary(op: Op) -> Self {
        Self {
            op,
            operands: vec![],
        }
    }

    pub fn unary(op: Op, operand: Operand) -> Self {
        Self {
            op,
            operands: vec![operand],
        }
    }

    pub fn binary(op: Op, dest: Operand, src: Operand) -> Self {
        Self {
            op,
            operands: vec![dest, src],
        }
    }
}

impl fmt::Display for Instr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.op)?;
        for (i, operand) in self.operands.iter().enumerate() {
            if i == 0 {
                write!(f, " {operand}")?;
            } else {
                write!(f, ", {operand}")?;
            }
        }
        Ok(())
    }
}

/// One emitted function: label, body instructions and the frame size its
/// prologue/epilogue reserve (already 16-byte aligned).
pub struct AsmFunction {
    pub label: String,
    pub frame_size: u32,
    pub instrs: Vec<Instr>,
}

impl AsmFunction {
    pub fn new(label: impl Into<String>, frame_size: u32) -> Self {
        Self {
            label: label.into(),
            frame_size,
            instrs: Vec::new(),
        }
    }

    pub fn push(&mut self, instr: Instr) {
        self.instrs.push(instr);
    }
}

impl fmt::Display for AsmFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}:", self.label)?;
        writeln!(f, "{INDENT}push rbp")?;
        writeln!(f, "{INDENT}mov rbp, rsp")?;
        if self.frame_size > 0 {
            writeln!(f, "{INDENT}sub rsp, {}", self.frame_size)?;
        }
        for instr in &self.instrs {
            writeln!(f, "{INDENT}{instr}")?;
        }
        if self.frame_size > 0 {
            writeln!(f, "{INDENT}add rsp, {}", self.frame_size)?;
        }
        writeln!(f, "{INDENT}pop rbp")?;
        writeln!(f, "{INDENT}ret")
    }
}

/// In-memory assembly program: one shared header plus the emitted functions,
/// appended in compilation order. Rendering to text happens in `Display`;
/// assembling/linking the text is a collaborator's job.
pub struct AsmProgram {
    header: String,
    functions: Vec<AsmFunction>,
}

impl AsmProgram {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            functions: Vec::new(),
        }
    }

    pub fn add_function(&mut self, function: AsmFunction) {
        self.functions.push(function);
    }

    pub fn functions(&self) -> &[AsmFunction] {
        &self.functions
    }
}

impl fmt::Display for AsmProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.header)?;
        for function in &self.functions {
            writeln!(f)?;
            write!(f, "{function}")?;
        }
        Ok(())
    }
}
