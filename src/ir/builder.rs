use crate::ir::graph::IrGraph;
use crate::ir::node::{BinaryOp, NodeId, NodeKind, ProjKind};

/// Builds well-formed single-block graphs.
///
/// This is the surface the SSA translation sits on; tests and the driver use
/// it directly. The builder threads the start node's side-effect projection
/// into the return node, so return operands line up with the fixed
/// `SIDE_EFFECT`/`RESULT` indices.
pub struct GraphBuilder {
    graph: IrGraph,
    side_effect: NodeId,
}

impl GraphBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        let mut graph = IrGraph::new(name);
        let start_block = graph.start_block();
        let start = graph.new_node(NodeKind::Start, vec![], start_block);
        let side_effect = graph.new_node(
            NodeKind::Proj(ProjKind::SideEffect),
            vec![start],
            start_block,
        );
        Self { graph, side_effect }
    }

    pub fn const_int(&mut self, value: i32) -> NodeId {
        let block = self.graph.start_block();
        self.graph.new_node(NodeKind::ConstInt(value), vec![], block)
    }

    pub fn binary(&mut self, op: BinaryOp, left: NodeId, right: NodeId) -> NodeId {
        let block = self.graph.start_block();
        self.graph
            .new_node(NodeKind::Binary(op), vec![left, right], block)
    }

    pub fn add(&mut self, left: NodeId, right: NodeId) -> NodeId {
        self.binary(BinaryOp::Add, left, right)
    }

    pub fn sub(&mut self, left: NodeId, right: NodeId) -> NodeId {
        self.binary(BinaryOp::Sub, left, right)
    }

    pub fn mul(&mut self, left: NodeId, right: NodeId) -> NodeId {
        self.binary(BinaryOp::Mul, left, right)
    }

    pub fn div(&mut self, left: NodeId, right: NodeId) -> NodeId {
        self.binary(BinaryOp::Div, left, right)
    }

    pub fn modulo(&mut self, left: NodeId, right: NodeId) -> NodeId {
        self.binary(BinaryOp::Mod, left, right)
    }

    /// Terminates the function: wires the return node into the end block.
    pub fn ret(&mut self, value: NodeId) -> NodeId {
        let block = self.graph.start_block();
        let ret = self
            .graph
            .new_node(NodeKind::Return, vec![self.side_effect, value], block);
        let end = self.graph.end_block();
        self.graph.add_predecessor(end, ret);
        ret
    }

    pub fn finish(self) -> IrGraph {
        self.graph
    }
}
