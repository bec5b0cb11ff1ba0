use indoc::indoc;

use crate::codegen::x86::{CodegenError, X86CodeGenerator};
use crate::ir::node::{NodeKind, ProjKind};
use crate::regalloc::{
    AllocationResult, Location, LocationMap, RegisterAllocator, SpillAllAllocator, X86Reg,
};

include!("graph_test_utils.rs");

#[test]
fn test_add_program_text() {
    let (graph, _, _, _) = add_graph();
    let program = X86CodeGenerator::generate(&[graph]).unwrap();

    let expected = indoc! {"
        .intel_syntax noprefix
        .global main
        .global _main
        .text

        main:
            call _main
            mov edi, eax
            mov eax, 60
            syscall

        _main:
            push rbp
            mov rbp, rsp
            mov ecx, 1
            add ecx, 2
            mov eax, ecx
            pop rbp
            ret
    "};
    assert_eq!(program.to_string(), expected);
}

#[test]
fn test_div_uses_fixed_registers() {
    let mut b = GraphBuilder::new("main");
    let seven = b.const_int(7);
    let two = b.const_int(2);
    let quot = b.div(seven, two);
    b.ret(quot);
    let graph = b.finish();

    let program = X86CodeGenerator::generate(&[graph]).unwrap();
    let body = indoc! {"
        _main:
            push rbp
            mov rbp, rsp
            mov eax, 7
            mov r11d, 2
            cdq
            idiv r11d
            mov ecx, eax
            mov eax, ecx
            pop rbp
            ret
    "};
    assert!(program.to_string().ends_with(body));
}

#[test]
fn test_mod_takes_remainder_from_edx() {
    let mut b = GraphBuilder::new("main");
    let seven = b.const_int(7);
    let two = b.const_int(2);
    let rem = b.modulo(seven, two);
    b.ret(rem);
    let graph = b.finish();

    let program = X86CodeGenerator::generate(&[graph]).unwrap();
    assert!(program.to_string().contains("mov ecx, edx"));
}

#[test]
fn test_spilled_destination_computes_in_scratch() {
    let (graph, _, _, _) = add_graph();
    let allocation = SpillAllAllocator::allocate(&graph);
    let function = X86CodeGenerator::generate_function(&graph, &allocation).unwrap();

    let expected = indoc! {"
        _main:
            push rbp
            mov rbp, rsp
            sub rsp, 16
            mov r11d, 1
            add r11d, 2
            mov dword ptr [rbp - 8], r11d
            mov eax, dword ptr [rbp - 8]
            add rsp, 16
            pop rbp
            ret
    "};
    assert_eq!(function.to_string(), expected);
}

#[test]
fn test_right_operand_collision_is_preserved() {
    // Force the right operand of the final addition into the operation
    // register: z and y share ecx, so y must be parked in the scratch
    // register before the left operand overwrites ecx.
    let mut b = GraphBuilder::new("main");
    let one = b.const_int(1);
    let two = b.const_int(2);
    let x = b.add(one, one);
    let y = b.add(two, two);
    let z = b.add(x, y);
    b.ret(z);
    let graph = b.finish();

    let locations = LocationMap::from_iter([
        (x, Location::Reg(X86Reg::Rsi)),
        (y, Location::Reg(X86Reg::Rcx)),
        (z, Location::Reg(X86Reg::Rcx)),
    ]);
    let allocation = AllocationResult {
        locations,
        slot_count: 0,
    };
    let function = X86CodeGenerator::generate_function(&graph, &allocation).unwrap();

    let expected = indoc! {"
        _main:
            push rbp
            mov rbp, rsp
            mov esi, 1
            add esi, 1
            mov ecx, 2
            add ecx, 2
            mov r11d, ecx
            mov ecx, esi
            add ecx, r11d
            mov eax, ecx
            pop rbp
            ret
    "};
    assert_eq!(function.to_string(), expected);
}

#[test]
fn test_phi_is_a_hard_error() {
    let mut graph = IrGraph::new("main");
    let block = graph.start_block();
    let start = graph.new_node(NodeKind::Start, vec![], block);
    let proj = graph.new_node(NodeKind::Proj(ProjKind::SideEffect), vec![start], block);
    let c = graph.new_node(NodeKind::ConstInt(1), vec![], block);
    let phi = graph.new_node(NodeKind::Phi, vec![c, c], block);
    let ret = graph.new_node(NodeKind::Return, vec![proj, phi], block);
    let end = graph.end_block();
    graph.add_predecessor(end, ret);

    let allocation = AllocationResult {
        locations: LocationMap::from_iter([(phi, Location::Reg(X86Reg::Rcx))]),
        slot_count: 0,
    };
    let result = X86CodeGenerator::generate_function(&graph, &allocation);
    assert!(matches!(result, Err(CodegenError::UnexpectedPhi(n)) if n == phi));
}

#[test]
fn test_missing_location_is_an_error() {
    let (graph, _, _, _) = add_graph();
    let allocation = AllocationResult {
        locations: LocationMap::new(),
        slot_count: 0,
    };
    let result = X86CodeGenerator::generate_function(&graph, &allocation);
    assert!(matches!(result, Err(CodegenError::MissingLocation(_))));
}

#[test]
fn test_codegen_is_deterministic() {
    let (graph, _) = many_live(6);
    let first = X86CodeGenerator::generate(std::slice::from_ref(&graph))
        .unwrap()
        .to_string();
    let second = X86CodeGenerator::generate(std::slice::from_ref(&graph))
        .unwrap()
        .to_string();
    assert_eq!(first, second);

    // Regenerating against the same location map is also byte-identical.
    let allocation = RegisterAllocator::allocate(&graph);
    let once = X86CodeGenerator::generate_function(&graph, &allocation).unwrap();
    let twice = X86CodeGenerator::generate_function(&graph, &allocation).unwrap();
    assert_eq!(once.to_string(), twice.to_string());
}
