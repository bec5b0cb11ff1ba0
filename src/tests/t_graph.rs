use crate::ir::node::{RESULT, SIDE_EFFECT};
use crate::ir::NodeKind;

include!("graph_test_utils.rs");

#[test]
fn test_register_successor_is_idempotent() {
    let mut graph = IrGraph::new("test");
    let block = graph.start_block();
    let c = graph.new_node(NodeKind::ConstInt(1), vec![], block);
    let add = graph.new_node(NodeKind::Binary(crate::ir::BinaryOp::Add), vec![c, c], block);

    // Both operand edges point at the same node; the successor set must
    // still contain the consumer exactly once.
    assert_eq!(graph.successors(c).collect::<Vec<_>>(), vec![add]);

    graph.register_successor(c, add);
    assert_eq!(graph.successors(c).collect::<Vec<_>>(), vec![add]);
}

#[test]
fn test_successors_of_unknown_node_is_empty() {
    let graph = IrGraph::new("test");
    let end = graph.end_block();
    assert_eq!(graph.successors(end).count(), 0);
}

#[test]
fn test_reverse_postorder_visits_preds_first() {
    let (graph, one, two, sum) = add_graph();
    let order = graph.reverse_postorder();

    let pos = |n| order.iter().position(|o| *o == n).expect("node in order");
    assert!(pos(one) < pos(sum));
    assert!(pos(two) < pos(sum));

    // The walk starts below the start node and ends at the end block.
    assert_eq!(graph.kind(order[0]), NodeKind::Start);
    assert_eq!(*order.last().unwrap(), graph.end_block());
}

#[test]
fn test_reverse_postorder_is_deterministic() {
    let (graph, _, _, _) = add_graph();
    assert_eq!(graph.reverse_postorder(), graph.reverse_postorder());
}

#[test]
fn test_nodes_includes_marker_blocks() {
    let (graph, one, two, sum) = add_graph();
    let nodes = graph.nodes();
    for n in [one, two, sum, graph.start_block(), graph.end_block()] {
        assert!(nodes.contains(&n));
    }
}

#[test]
fn test_pred_skip_proj_looks_through_projections() {
    let mut b = GraphBuilder::new("test");
    let c = b.const_int(7);
    let ret = b.ret(c);
    let graph = b.finish();

    // The side-effect operand is a projection of the start node.
    let skipped = graph.pred_skip_proj(ret, SIDE_EFFECT);
    assert_eq!(graph.kind(skipped), NodeKind::Start);

    // The result operand is not a projection and comes back unchanged.
    assert_eq!(graph.pred_skip_proj(ret, RESULT), c);
}
