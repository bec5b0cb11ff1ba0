use std::fmt;

use indexmap::IndexSet;

use crate::dataflow::{BackwardAnalysis, BackwardFlow, DataflowResult};
use crate::ir::node::{LEFT, RESULT, RIGHT};
use crate::ir::{IrGraph, NodeId, NodeKind};

/// Set of values live at a program point.
pub type LiveSet = IndexSet<NodeId>;

/// Values defined by `node`: binary operations and integer constants define
/// themselves, everything else defines nothing.
pub fn defs(graph: &IrGraph, node: NodeId) -> LiveSet {
    match graph.kind(node) {
        NodeKind::Binary(_) | NodeKind::ConstInt(_) => LiveSet::from_iter([node]),
        _ => LiveSet::new(),
    }
}

/// Values used by `node`: the operands of a binary operation, or the result
/// operand of a return.
pub fn uses(graph: &IrGraph, node: NodeId) -> LiveSet {
    match graph.kind(node) {
        NodeKind::Binary(_) => LiveSet::from_iter([
            graph.pred_skip_proj(node, LEFT),
            graph.pred_skip_proj(node, RIGHT),
        ]),
        NodeKind::Return => LiveSet::from_iter([graph.pred_skip_proj(node, RESULT)]),
        _ => LiveSet::new(),
    }
}

struct Liveness;

impl BackwardAnalysis for Liveness {
    type Value = LiveSet;

    fn out_value(&self, _graph: &IrGraph, _node: NodeId, succ_ins: &[LiveSet]) -> LiveSet {
        let mut live_out = LiveSet::new();
        for in_value in succ_ins {
            live_out.extend(in_value.iter().copied());
        }
        live_out
    }

    fn in_value(&self, graph: &IrGraph, node: NodeId, live_out: &LiveSet) -> LiveSet {
        // live_in = uses + (live_out - defs)
        let defs = defs(graph, node);
        let mut live_in = uses(graph, node);
        live_in.extend(live_out.iter().filter(|n| !defs.contains(*n)).copied());
        live_in
    }
}

/// Per-node (live-in, live-out) sets for one graph.
pub struct LivenessResult {
    result: DataflowResult<LiveSet>,
}

impl LivenessResult {
    pub fn analyze(graph: &IrGraph) -> Self {
        let result = BackwardFlow::new(graph, Liveness).analyze();
        let first = graph.reverse_postorder()[0];
        assert!(
            result.in_value(first).is_empty(),
            "nothing should be live before the start of the graph"
        );
        Self { result }
    }

    pub fn live_in(&self, node: NodeId) -> &LiveSet {
        self.result.in_value(node)
    }

    pub fn live_out(&self, node: NodeId) -> &LiveSet {
        self.result.out_value(node)
    }
}

/// Helper wrapper to pretty-print a `LivenessResult` in a stable order.
pub struct LivenessDisplay<'a> {
    pub graph: &'a IrGraph,
    pub liveness: &'a LivenessResult,
}

impl fmt::Display for LivenessDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "liveness for {}:", self.graph.name())?;
        for node in self.graph.reverse_postorder() {
            writeln!(f, "{node}: {}", self.graph.kind(node))?;
            write_set(f, "  live_in", self.liveness.live_in(node))?;
            write_set(f, "  live_out", self.liveness.live_out(node))?;
        }
        Ok(())
    }
}

fn write_set(f: &mut fmt::Formatter<'_>, label: &str, set: &LiveSet) -> fmt::Result {
    let mut nodes: Vec<_> = set.iter().copied().collect();
    nodes.sort_by_key(|n| n.id());
    write!(f, "{label}: [")?;
    for (i, node) in nodes.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{node}")?;
    }
    writeln!(f, "]")
}

#[cfg(test)]
#[path = "../tests/t_liveness.rs"]
mod tests;
