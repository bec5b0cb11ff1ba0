pub mod interference;
pub mod regs;
pub mod spillall;
pub mod stack;

use std::fmt;

use indexmap::{IndexMap, IndexSet};
use log::debug;

use crate::dataflow::liveness::LivenessResult;
use crate::ir::{IrGraph, NodeId};

pub use interference::{needs_register, Coloring, InterferenceGraph};
pub use regs::{X86Reg, ALLOCATABLE, DIV_REMAINDER, RETURN_VALUE, SCRATCH};
pub use spillall::SpillAllAllocator;
pub use stack::{StackSlot, SLOT_SIZE};

/// Final storage of a value: a physical register or a stack slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Reg(X86Reg),
    Stack(StackSlot),
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Reg(reg) => write!(f, "{reg}"),
            Location::Stack(slot) => write!(f, "{slot}"),
        }
    }
}

/// Node-to-location assignment for one function. Computed once before code
/// generation and immutable afterwards.
pub type LocationMap = IndexMap<NodeId, Location>;

/// Helper wrapper to pretty-print a `LocationMap` in a stable order.
pub struct LocationMapDisplay<'a>(pub &'a LocationMap);

impl fmt::Display for LocationMapDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut entries: Vec<_> = self.0.iter().collect();
        entries.sort_by_key(|(node, _)| node.id());
        for (i, (node, location)) in entries.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{node} -> {location}")?;
        }
        Ok(())
    }
}

pub struct AllocationResult {
    pub locations: LocationMap,
    pub slot_count: u32,
}

impl AllocationResult {
    pub fn location(&self, node: NodeId) -> Option<Location> {
        self.locations.get(&node).copied()
    }

    pub fn spilled_bytes(&self) -> u32 {
        self.slot_count * SLOT_SIZE
    }
}

/// Maps the interference coloring to concrete locations: the first `R`
/// colors get the `R` allocatable registers, every color beyond that gets
/// its own stack slot.
pub struct RegisterAllocator;

impl RegisterAllocator {
    pub fn allocate(graph: &IrGraph) -> AllocationResult {
        Self::allocate_with(graph, &ALLOCATABLE)
    }

    /// Same as [`allocate`](Self::allocate) with an explicit register list;
    /// tests use this to force spilling with a small list.
    pub fn allocate_with(graph: &IrGraph, registers: &[X86Reg]) -> AllocationResult {
        assert!(
            !registers.is_empty(),
            "allocation requires at least one register"
        );

        let liveness = LivenessResult::analyze(graph);
        let coloring = InterferenceGraph::build(graph, &liveness).color();

        // Slots are handed out in increasing color order so the offsets do
        // not depend on any map iteration order.
        let reg_count = registers.len() as u32;
        let mut spilled_colors: Vec<u32> = coloring
            .iter()
            .map(|(_, color)| color)
            .filter(|color| *color >= reg_count)
            .collect::<IndexSet<u32>>()
            .into_iter()
            .collect();
        spilled_colors.sort_unstable();
        let slots: IndexMap<u32, StackSlot> = spilled_colors
            .iter()
            .enumerate()
            .map(|(i, color)| (*color, StackSlot::new((i as u32 + 1) * SLOT_SIZE)))
            .collect();

        let mut locations = LocationMap::new();
        for (node, color) in coloring.iter() {
            let location = if color < reg_count {
                Location::Reg(registers[color as usize])
            } else {
                Location::Stack(slots[&color])
            };
            locations.insert(node, location);
        }

        let spilled = locations
            .values()
            .filter(|l| matches!(l, Location::Stack(_)))
            .count();
        debug!(
            "{}: {} values, {} spilled across {} slots",
            graph.name(),
            locations.len(),
            spilled,
            slots.len()
        );
        AllocationResult {
            locations,
            slot_count: slots.len() as u32,
        }
    }
}

#[cfg(test)]
#[path = "../tests/t_regalloc.rs"]
mod tests;
