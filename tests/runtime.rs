#![cfg(all(target_arch = "x86_64", target_os = "linux"))]

use std::path::PathBuf;
use std::process::Command;
use std::sync::atomic::{AtomicUsize, Ordering};

use l1c::compile::compile;
use l1c::ir::{GraphBuilder, IrGraph};

static TEST_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Compiles the graph, assembles it with the system toolchain and returns
/// the process exit status of the resulting executable.
fn run_graph(name: &str, graph: IrGraph) -> i32 {
    let run_id = TEST_COUNTER.fetch_add(1, Ordering::Relaxed);
    let temp_dir = std::env::temp_dir().join(format!(
        "l1c_runtime_test_{}_{}_{}",
        name,
        std::process::id(),
        run_id
    ));
    std::fs::create_dir_all(&temp_dir).expect("failed to create temp dir");

    let program = compile(&[graph]).expect("compile failed");

    let asm_path = temp_dir.join(format!("{name}.s"));
    let exe_path = temp_dir.join(name);
    std::fs::write(&asm_path, program.to_string()).expect("failed to write asm");
    link_exe(&exe_path, &asm_path);

    let run = Command::new(&exe_path)
        .output()
        .expect("failed to run executable");
    let _ = std::fs::remove_dir_all(&temp_dir);
    run.status.code().expect("process exited without a code")
}

fn link_exe(exe_path: &PathBuf, asm_path: &PathBuf) {
    let output = Command::new("cc")
        .arg(asm_path)
        .arg("-o")
        .arg(exe_path)
        .output()
        .expect("failed to invoke cc");
    assert!(
        output.status.success(),
        "cc failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn test_add_exits_with_sum() {
    let mut b = GraphBuilder::new("main");
    let one = b.const_int(1);
    let two = b.const_int(2);
    let sum = b.add(one, two);
    b.ret(sum);
    assert_eq!(run_graph("add", b.finish()), 3);
}

#[test]
fn test_div_truncates() {
    let mut b = GraphBuilder::new("main");
    let seven = b.const_int(7);
    let two = b.const_int(2);
    let quot = b.div(seven, two);
    b.ret(quot);
    assert_eq!(run_graph("div", b.finish()), 3);
}

#[test]
fn test_mod_matches_truncating_division() {
    let mut b = GraphBuilder::new("main");
    let seven = b.const_int(7);
    let two = b.const_int(2);
    let rem = b.modulo(seven, two);
    b.ret(rem);
    assert_eq!(run_graph("mod", b.finish()), 1);
}

#[test]
fn test_mixed_expression() {
    // (12 + 30) / (9 % 5) = 42 / 4 = 10
    let mut b = GraphBuilder::new("main");
    let twelve = b.const_int(12);
    let thirty = b.const_int(30);
    let sum = b.add(twelve, thirty);
    let nine = b.const_int(9);
    let five = b.const_int(5);
    let rem = b.modulo(nine, five);
    let quot = b.div(sum, rem);
    b.ret(quot);
    assert_eq!(run_graph("mixed", b.finish()), 10);
}

#[test]
fn test_register_pressure_forces_correct_spills() {
    // Twelve simultaneously live values overflow the ten allocatable
    // registers; the spilled values must still compute the right sum.
    let k = 12;
    let mut b = GraphBuilder::new("main");
    let one = b.const_int(1);
    let mut live = Vec::new();
    for i in 1..=k {
        let c = b.const_int(i);
        live.push(b.add(one, c));
    }
    let mut acc = b.add(live[0], live[1]);
    for value in &live[2..] {
        acc = b.add(acc, *value);
    }
    b.ret(acc);

    // sum of (1 + i) for i in 1..=12
    let expected: i32 = (1..=k).map(|i| 1 + i).sum();
    assert_eq!(run_graph("pressure", b.finish()), expected);
}

#[test]
fn test_subtraction_and_multiplication() {
    // (6 - 2) * 9 = 36
    let mut b = GraphBuilder::new("main");
    let six = b.const_int(6);
    let two = b.const_int(2);
    let diff = b.sub(six, two);
    let nine = b.const_int(9);
    let product = b.mul(diff, nine);
    b.ret(product);
    assert_eq!(run_graph("submul", b.finish()), 36);
}
