use indexmap::{IndexMap, IndexSet};

use crate::ir::node::{Node, NodeId, NodeKind};

/// SSA graph for one function.
///
/// The graph owns all nodes reachable backward from the end block via
/// predecessor (operand) edges. The successor map is derived: it is updated
/// whenever a predecessor edge is recorded and never mutated independently.
pub struct IrGraph {
    name: String,
    nodes: Vec<Node>,
    successors: IndexMap<NodeId, IndexSet<NodeId>>,
    start_block: NodeId,
    end_block: NodeId,
}

impl IrGraph {
    pub fn new(name: impl Into<String>) -> Self {
        let mut graph = Self {
            name: name.into(),
            nodes: Vec::new(),
            successors: IndexMap::new(),
            start_block: NodeId(0),
            end_block: NodeId(0),
        };
        graph.start_block = graph.alloc_block();
        graph.end_block = graph.alloc_block();
        graph
    }

    fn alloc_block(&mut self) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            kind: NodeKind::Block,
            preds: Vec::new(),
            block: id,
        });
        id
    }

    /// Creates a node and records the successor edge for each operand.
    pub fn new_node(&mut self, kind: NodeKind, preds: Vec<NodeId>, block: NodeId) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node { kind, preds, block });
        for i in 0..self.nodes[id.0 as usize].preds.len() {
            let pred = self.nodes[id.0 as usize].preds[i];
            self.register_successor(pred, id);
        }
        id
    }

    /// Appends a predecessor edge to an existing node (used to wire the end
    /// block to the return node).
    pub fn add_predecessor(&mut self, node: NodeId, pred: NodeId) {
        self.nodes[node.0 as usize].preds.push(pred);
        self.register_successor(pred, node);
    }

    /// Records that `successor` consumes `node`'s value. Idempotent,
    /// insertion-ordered.
    pub fn register_successor(&mut self, node: NodeId, successor: NodeId) {
        self.successors.entry(node).or_default().insert(successor);
    }

    /// The nodes that have `node` as one of their inputs.
    pub fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.successors
            .get(&node)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0 as usize]
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.nodes[id.0 as usize].kind
    }

    pub fn preds(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0 as usize].preds
    }

    /// Operand at `idx`, looking through a projection if one sits in between.
    pub fn pred_skip_proj(&self, node: NodeId, idx: usize) -> NodeId {
        let pred = self.preds(node)[idx];
        match self.kind(pred) {
            NodeKind::Proj(_) => self.preds(pred)[0],
            _ => pred,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn start_block(&self) -> NodeId {
        self.start_block
    }

    pub fn end_block(&self) -> NodeId {
        self.end_block
    }

    /// Deterministic reverse postorder: a depth-first walk from the end block
    /// that appends a node only after all of its predecessors. This order is
    /// the single source of truth for "appears before" in the backend.
    ///
    /// Iterative on an explicit stack so deep operand chains cannot overflow
    /// the call stack.
    pub fn reverse_postorder(&self) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut visited: IndexSet<NodeId> = IndexSet::new();
        visited.insert(self.end_block);

        // (node, index of the next predecessor to visit)
        let mut stack: Vec<(NodeId, usize)> = vec![(self.end_block, 0)];
        while let Some((node, next_pred)) = stack.last_mut() {
            let preds = self.preds(*node);
            if *next_pred < preds.len() {
                let pred = preds[*next_pred];
                *next_pred += 1;
                if visited.insert(pred) {
                    stack.push((pred, 0));
                }
            } else {
                result.push(*node);
                stack.pop();
            }
        }
        result
    }

    /// All nodes known to the graph: every key and value of the successor
    /// map plus the two marker blocks.
    pub fn nodes(&self) -> Vec<NodeId> {
        let mut nodes: IndexSet<NodeId> = IndexSet::new();
        for (node, successors) in &self.successors {
            nodes.insert(*node);
            nodes.extend(successors.iter().copied());
        }
        nodes.insert(self.start_block);
        nodes.insert(self.end_block);
        nodes.into_iter().collect()
    }
}

#[cfg(test)]
#[path = "../tests/t_graph.rs"]
mod tests;
