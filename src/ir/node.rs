use std::fmt;

/// Stable handle for a node in an [`IrGraph`](crate::ir::IrGraph) arena.
///
/// Handles carry identity, not value equality: two nodes with the same kind
/// and operands are still distinct values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn id(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BinaryOp::Add => "add",
            BinaryOp::Sub => "sub",
            BinaryOp::Mul => "mul",
            BinaryOp::Div => "div",
            BinaryOp::Mod => "mod",
        };
        write!(f, "{s}")
    }
}

/// What a projection extracts from its operand's result tuple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjKind {
    SideEffect,
    Result,
}

/// Kind tag for an IR node. Exhaustive; matching on it is how every
/// downstream pass dispatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    ConstInt(i32),
    Binary(BinaryOp),
    Return,
    Proj(ProjKind),
    Start,
    Block,
    Phi,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::ConstInt(value) => write!(f, "const {value}"),
            NodeKind::Binary(op) => write!(f, "{op}"),
            NodeKind::Return => write!(f, "return"),
            NodeKind::Proj(ProjKind::SideEffect) => write!(f, "proj.sideeffect"),
            NodeKind::Proj(ProjKind::Result) => write!(f, "proj.result"),
            NodeKind::Start => write!(f, "start"),
            NodeKind::Block => write!(f, "block"),
            NodeKind::Phi => write!(f, "phi"),
        }
    }
}

/// Operand indices for binary operation nodes.
pub const LEFT: usize = 0;
pub const RIGHT: usize = 1;

/// Operand indices for return nodes.
pub const SIDE_EFFECT: usize = 0;
pub const RESULT: usize = 1;

/// An IR node: a kind tag, its operands (predecessor edges, in role order),
/// and the block it belongs to. SSA form: defined once, used many times.
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub preds: Vec<NodeId>,
    pub block: NodeId,
}
