pub mod liveness;

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::ir::{IrGraph, NodeId};

/// Transfer functions of a backward dataflow analysis.
///
/// The engine supplies the control-flow structure; an analysis only decides
/// how to merge successor in-values into an out-value and how to derive a
/// node's in-value from its out-value.
pub trait BackwardAnalysis {
    type Value: Clone + PartialEq;

    /// Merges the in-values of a node's control-flow successors.
    fn out_value(&self, graph: &IrGraph, node: NodeId, succ_ins: &[Self::Value]) -> Self::Value;

    /// Derives a node's in-value from its out-value.
    fn in_value(&self, graph: &IrGraph, node: NodeId, out_value: &Self::Value) -> Self::Value;
}

/// In/out pair computed for one node.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowValues<V> {
    pub in_value: V,
    pub out_value: V,
}

/// Immutable result of a backward analysis, keyed by node in reverse
/// postorder.
pub struct DataflowResult<V> {
    values: IndexMap<NodeId, FlowValues<V>>,
}

impl<V> DataflowResult<V> {
    pub fn get(&self, node: NodeId) -> Option<&FlowValues<V>> {
        self.values.get(&node)
    }

    pub fn in_value(&self, node: NodeId) -> &V {
        &self.values[&node].in_value
    }

    pub fn out_value(&self, node: NodeId) -> &V {
        &self.values[&node].out_value
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &FlowValues<V>)> {
        self.values.iter().map(|(node, values)| (*node, values))
    }
}

/// Generic backward fixed-point engine.
///
/// Control-flow predecessor/successor of a node are its neighbors in reverse
/// postorder; this models straight-line control flow, not operand edges. The
/// engine starts at the end node, computes out/in values from the successors'
/// in-values, and revisits predecessors until nothing changes. Per node the
/// last-seen tuple of successor in-values is memoized; an unchanged tuple
/// (by value) cuts off recomputation, which is the fixed-point guard. On the
/// acyclic graphs of this language subset every node settles in one pass,
/// but the engine does not rely on that.
pub struct BackwardFlow<'g, A: BackwardAnalysis> {
    graph: &'g IrGraph,
    analysis: A,
    order: Vec<NodeId>,
    order_index: HashMap<NodeId, usize>,
}

impl<'g, A: BackwardAnalysis> BackwardFlow<'g, A> {
    pub fn new(graph: &'g IrGraph, analysis: A) -> Self {
        let order = graph.reverse_postorder();
        let order_index = order
            .iter()
            .enumerate()
            .map(|(idx, node)| (*node, idx))
            .collect();
        Self {
            graph,
            analysis,
            order,
            order_index,
        }
    }

    fn flow_predecessor(&self, node: NodeId) -> Option<NodeId> {
        let idx = self.order_index[&node];
        (idx > 0).then(|| self.order[idx - 1])
    }

    fn flow_successor(&self, node: NodeId) -> Option<NodeId> {
        let idx = self.order_index[&node];
        (idx + 1 < self.order.len()).then(|| self.order[idx + 1])
    }

    pub fn analyze(self) -> DataflowResult<A::Value> {
        let mut ins: HashMap<NodeId, A::Value> = HashMap::new();
        let mut outs: HashMap<NodeId, A::Value> = HashMap::new();
        // Last tuple of successor in-values each node was computed from.
        let mut prev_succ_ins: HashMap<NodeId, Vec<A::Value>> = HashMap::new();

        let end = *self.order.last().expect("graph order is never empty");
        let mut worklist = vec![end];
        while let Some(node) = worklist.pop() {
            let succ_ins: Vec<A::Value> = self
                .flow_successor(node)
                .and_then(|succ| ins.get(&succ))
                .cloned()
                .into_iter()
                .collect();

            if prev_succ_ins.get(&node) == Some(&succ_ins) {
                continue;
            }

            let out_value = self.analysis.out_value(self.graph, node, &succ_ins);
            let in_value = self.analysis.in_value(self.graph, node, &out_value);
            outs.insert(node, out_value);
            ins.insert(node, in_value);
            prev_succ_ins.insert(node, succ_ins);

            if let Some(pred) = self.flow_predecessor(node) {
                worklist.push(pred);
            }
        }

        let mut values = IndexMap::new();
        for node in &self.order {
            let in_value = ins.remove(node).expect("every node was analyzed");
            let out_value = outs.remove(node).expect("every node was analyzed");
            values.insert(
                *node,
                FlowValues {
                    in_value,
                    out_value,
                },
            );
        }
        DataflowResult { values }
    }
}

#[cfg(test)]
#[path = "../tests/t_dataflow.rs"]
mod tests;
