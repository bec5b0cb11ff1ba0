use log::debug;
use thiserror::Error;

use crate::codegen::{AsmFunction, AsmProgram, Instr, Op, Operand};
use crate::ir::node::{LEFT, RESULT, RIGHT};
use crate::ir::{BinaryOp, IrGraph, NodeId, NodeKind};
use crate::regalloc::{
    AllocationResult, Location, RegisterAllocator, DIV_REMAINDER, RETURN_VALUE, SCRATCH,
};

/// Internal backend failures. The input contract guarantees well-formed
/// graphs, so any of these indicates a compiler bug, never bad user input.
#[derive(Debug, Error)]
pub enum CodegenError {
    #[error("no location assigned for node {0}")]
    MissingLocation(NodeId),

    #[error("phi node {0} in a single-block function")]
    UnexpectedPhi(NodeId),
}

/// Program entry point: calls the compiled main function and turns its
/// return value into the process exit status.
const PROGRAM_HEADER: &str = "\
.intel_syntax noprefix
.global main
.global _main
.text

main:
    call _main
    mov edi, eax
    mov eax, 60
    syscall";

pub struct X86CodeGenerator;

impl X86CodeGenerator {
    /// Emits one function per graph plus the shared program header.
    pub fn generate(graphs: &[IrGraph]) -> Result<AsmProgram, CodegenError> {
        let mut program = AsmProgram::new(PROGRAM_HEADER);
        for graph in graphs {
            let allocation = RegisterAllocator::allocate(graph);
            program.add_function(Self::generate_function(graph, &allocation)?);
        }
        Ok(program)
    }

    /// Emits a single function against a precomputed location map.
    pub fn generate_function(
        graph: &IrGraph,
        allocation: &AllocationResult,
    ) -> Result<AsmFunction, CodegenError> {
        // ABI-mandated 16-byte stack alignment.
        let frame_size = (allocation.spilled_bytes() + 15) & !15;
        let mut emit = FuncEmit {
            graph,
            allocation,
            function: AsmFunction::new(format!("_{}", graph.name()), frame_size),
        };

        // Reverse postorder visits operands before their uses, matching a
        // postorder walk of the operand edges from the end block.
        for node in graph.reverse_postorder() {
            emit.emit_node(node)?;
        }

        debug!(
            "{}: emitted {} instructions, frame size {}",
            graph.name(),
            emit.function.instrs.len(),
            frame_size
        );
        Ok(emit.function)
    }
}

struct FuncEmit<'a> {
    graph: &'a IrGraph,
    allocation: &'a AllocationResult,
    function: AsmFunction,
}

impl FuncEmit<'_> {
    fn emit_node(&mut self, node: NodeId) -> Result<(), CodegenError> {
        match self.graph.kind(node) {
            NodeKind::Binary(BinaryOp::Add) => self.emit_binary(node, Op::Add),
            NodeKind::Binary(BinaryOp::Sub) => self.emit_binary(node, Op::Sub),
            NodeKind::Binary(BinaryOp::Mul) => self.emit_binary(node, Op::Imul),
            NodeKind::Binary(BinaryOp::Div) => self.emit_div_mod(node, false),
            NodeKind::Binary(BinaryOp::Mod) => self.emit_div_mod(node, true),
            NodeKind::Return => self.emit_return(node),
            NodeKind::ConstInt(_) | NodeKind::Proj(_) | NodeKind::Start | NodeKind::Block => {
                Ok(())
            }
            NodeKind::Phi => Err(CodegenError::UnexpectedPhi(node)),
        }
    }

    fn location(&self, node: NodeId) -> Result<Location, CodegenError> {
        self.allocation
            .location(node)
            .ok_or(CodegenError::MissingLocation(node))
    }

    /// A node as an instruction operand: constants fold into immediates,
    /// everything else reads from its assigned location.
    fn operand(&self, node: NodeId) -> Result<Operand, CodegenError> {
        if let NodeKind::ConstInt(value) = self.graph.kind(node) {
            return Ok(Operand::Imm(value));
        }
        self.location(node).map(location_operand)
    }

    /// Emits a move unless source and destination are already the same.
    fn mov(&mut self, dest: Operand, src: Operand) {
        if dest != src {
            self.function.push(Instr::binary(Op::Mov, dest, src));
        }
    }

    fn emit_binary(&mut self, node: NodeId, op: Op) -> Result<(), CodegenError> {
        let left = self.graph.pred_skip_proj(node, LEFT);
        let right = self.graph.pred_skip_proj(node, RIGHT);
        let dest = self.location(node)?;

        // The operation runs in the destination register; a spilled
        // destination computes in the scratch register and writes back.
        let op_reg = match dest {
            Location::Reg(reg) => reg,
            Location::Stack(_) => SCRATCH,
        };

        let mut right_operand = self.operand(right)?;
        if right_operand == Operand::Reg(op_reg) {
            // The right operand would be clobbered by the left move below;
            // park it in the scratch register first.
            self.mov(Operand::Reg(SCRATCH), right_operand);
            right_operand = Operand::Reg(SCRATCH);
        }

        let left_operand = self.operand(left)?;
        self.mov(Operand::Reg(op_reg), left_operand);

        // One register operand keeps the instruction encodable regardless of
        // whether the right operand is a register, slot or immediate.
        self.function
            .push(Instr::binary(op, Operand::Reg(op_reg), right_operand));

        self.mov(location_operand(dest), Operand::Reg(op_reg));
        Ok(())
    }

    fn emit_div_mod(&mut self, node: NodeId, remainder: bool) -> Result<(), CodegenError> {
        let left = self.graph.pred_skip_proj(node, LEFT);
        let right = self.graph.pred_skip_proj(node, RIGHT);
        let dest = self.location(node)?;

        // Dividend goes into edx:eax, sign-extended by cdq.
        let left_operand = self.operand(left)?;
        self.mov(Operand::Reg(RETURN_VALUE), left_operand);

        // idiv has no immediate form.
        let mut divisor = self.operand(right)?;
        if let Operand::Imm(_) = divisor {
            self.mov(Operand::Reg(SCRATCH), divisor);
            divisor = Operand::Reg(SCRATCH);
        }

        self.function.push(Instr::nullary(Op::Cdq));
        self.function.push(Instr::unary(Op::Idiv, divisor));

        let result = if remainder { DIV_REMAINDER } else { RETURN_VALUE };
        self.mov(location_operand(dest), Operand::Reg(result));
        Ok(())
    }

    fn emit_return(&mut self, node: NodeId) -> Result<(), CodegenError> {
        let value = self.graph.pred_skip_proj(node, RESULT);
        let operand = self.operand(value)?;
        self.mov(Operand::Reg(RETURN_VALUE), operand);
        // The ret itself is part of the epilogue.
        Ok(())
    }
}

fn location_operand(location: Location) -> Operand {
    match location {
        Location::Reg(reg) => Operand::Reg(reg),
        Location::Stack(slot) => Operand::Mem(slot),
    }
}

#[cfg(test)]
#[path = "../tests/t_codegen.rs"]
mod tests;
