use indexmap::{IndexMap, IndexSet};
use log::debug;

use crate::dataflow::liveness::LivenessResult;
use crate::ir::{IrGraph, NodeId, NodeKind};

/// Whether a node's value competes for a register. Structural markers,
/// projections, returns and constants (folded into their consumers as
/// immediates) do not.
pub fn needs_register(graph: &IrGraph, node: NodeId) -> bool {
    !matches!(
        graph.kind(node),
        NodeKind::Proj(_)
            | NodeKind::Return
            | NodeKind::ConstInt(_)
            | NodeKind::Start
            | NodeKind::Block
    )
}

/// Undirected, irreflexive graph over register-needing nodes; an edge joins
/// two values that are live at the same time.
pub struct InterferenceGraph {
    adjacency: IndexMap<NodeId, IndexSet<NodeId>>,
}

impl InterferenceGraph {
    pub fn build(graph: &IrGraph, liveness: &LivenessResult) -> Self {
        let vertices: Vec<NodeId> = graph
            .reverse_postorder()
            .into_iter()
            .filter(|node| needs_register(graph, *node))
            .collect();

        let mut interference = Self {
            adjacency: vertices.iter().map(|v| (*v, IndexSet::new())).collect(),
        };

        // Every register-needing node in this subset is a definition point,
        // so connecting each definition to everything live after it covers
        // all simultaneous lifetimes.
        for node in &vertices {
            if let NodeKind::Binary(_) = graph.kind(*node) {
                for other in liveness.live_out(*node) {
                    if *other != *node && needs_register(graph, *other) {
                        interference.add_edge(*node, *other);
                    }
                }
            }
        }
        interference
    }

    fn add_edge(&mut self, a: NodeId, b: NodeId) {
        if a == b {
            return;
        }
        self.adjacency.entry(a).or_default().insert(b);
        self.adjacency.entry(b).or_default().insert(a);
    }

    pub fn vertices(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.adjacency.keys().copied()
    }

    pub fn neighbors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.adjacency
            .get(&node)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    pub fn contains_edge(&self, a: NodeId, b: NodeId) -> bool {
        self.adjacency.get(&a).is_some_and(|set| set.contains(&b))
    }

    pub fn degree(&self, node: NodeId) -> usize {
        self.adjacency.get(&node).map_or(0, |set| set.len())
    }

    pub fn max_degree(&self) -> usize {
        self.vertices()
            .map(|v| self.degree(v))
            .max()
            .unwrap_or(0)
    }

    /// Simplicial elimination ordering via maximum-cardinality search:
    /// repeatedly take the remaining vertex of highest weight, bumping the
    /// weight of its remaining neighbors. Ties go to the vertex that was
    /// inserted first, which keeps the order deterministic.
    pub fn elimination_order(&self) -> Vec<NodeId> {
        let mut weights: IndexMap<NodeId, u32> =
            self.vertices().map(|v| (v, 0)).collect();
        let mut remaining: IndexSet<NodeId> = self.vertices().collect();
        let mut order = Vec::with_capacity(remaining.len());

        while !remaining.is_empty() {
            // Strictly-greater comparison so the earliest-inserted vertex
            // wins ties.
            let mut next: Option<NodeId> = None;
            for v in &remaining {
                match next {
                    Some(best) if weights[v] <= weights[&best] => {}
                    _ => next = Some(*v),
                }
            }
            let next = next.expect("remaining set is non-empty");
            order.push(next);
            for neighbor in self.neighbors(next) {
                if remaining.contains(&neighbor) {
                    weights[&neighbor] += 1;
                }
            }
            remaining.swap_remove(&next);
        }
        order
    }

    /// Greedy coloring along the elimination order; optimal on chordal
    /// graphs, which this language subset produces.
    pub fn color(&self) -> Coloring {
        let order = self.elimination_order();
        let mut colors: IndexMap<NodeId, u32> = IndexMap::new();

        for node in order {
            let used: IndexSet<u32> = self
                .neighbors(node)
                .filter_map(|neighbor| colors.get(&neighbor).copied())
                .collect();
            let mut color = 0;
            while used.contains(&color) {
                color += 1;
            }
            colors.insert(node, color);
        }

        let max_color = colors.values().copied().max().unwrap_or(0);
        assert!(
            max_color as usize <= self.max_degree() + 1,
            "coloring sub-optimal: max color {} exceeds max degree {} + 1",
            max_color,
            self.max_degree()
        );
        debug!(
            "colored {} vertices with {} colors (max degree {})",
            colors.len(),
            if colors.is_empty() { 0 } else { max_color + 1 },
            self.max_degree()
        );
        Coloring { colors, max_color }
    }
}

/// Vertex-to-color assignment; adjacent vertices never share a color.
pub struct Coloring {
    colors: IndexMap<NodeId, u32>,
    max_color: u32,
}

impl Coloring {
    pub fn get(&self, node: NodeId) -> Option<u32> {
        self.colors.get(&node).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, u32)> + '_ {
        self.colors.iter().map(|(node, color)| (*node, *color))
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn max_color(&self) -> u32 {
        self.max_color
    }
}

#[cfg(test)]
#[path = "../tests/t_interference.rs"]
mod tests;
