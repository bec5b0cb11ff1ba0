use crate::codegen::{AsmProgram, CodegenError, X86CodeGenerator};
use crate::ir::IrGraph;

/// Compiles one graph per top-level function into an assembly program.
///
/// Graphs are compiled independently and in order; the program is the only
/// state shared between them, and it is append-only.
pub fn compile(graphs: &[IrGraph]) -> Result<AsmProgram, CodegenError> {
    X86CodeGenerator::generate(graphs)
}

#[cfg(test)]
#[path = "tests/t_compile.rs"]
mod tests;
