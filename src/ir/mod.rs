pub mod builder;
pub mod graph;
pub mod node;

pub use builder::GraphBuilder;
pub use graph::IrGraph;
pub use node::{BinaryOp, Node, NodeId, NodeKind, ProjKind};
