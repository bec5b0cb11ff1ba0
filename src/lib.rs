pub mod codegen;
pub mod compile;
pub mod dataflow;
pub mod ir;
pub mod regalloc;
