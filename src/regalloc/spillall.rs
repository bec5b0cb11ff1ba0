use crate::ir::IrGraph;
use crate::regalloc::interference::needs_register;
use crate::regalloc::stack::{StackSlot, SLOT_SIZE};
use crate::regalloc::{AllocationResult, Location, LocationMap};

/// Allocator that gives every register-needing value its own stack slot.
///
/// No coloring, no registers. Kept as an independent reference point for
/// differential tests against [`RegisterAllocator`](crate::regalloc::RegisterAllocator):
/// both must produce location maps the code generator accepts, and the
/// coloring allocator must never use more slots than this one.
pub struct SpillAllAllocator;

impl SpillAllAllocator {
    pub fn allocate(graph: &IrGraph) -> AllocationResult {
        let mut locations = LocationMap::new();
        let mut slot_count = 0u32;
        for node in graph.reverse_postorder() {
            if needs_register(graph, node) {
                slot_count += 1;
                let slot = StackSlot::new(slot_count * SLOT_SIZE);
                locations.insert(node, Location::Stack(slot));
            }
        }
        AllocationResult {
            locations,
            slot_count,
        }
    }
}
