use clap::Parser;

use l1c::compile::compile;
use l1c::dataflow::liveness::{LivenessDisplay, LivenessResult};
use l1c::ir::{GraphBuilder, IrGraph};
use l1c::regalloc::{LocationMapDisplay, RegisterAllocator};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Comma-separated list of things to dump: liveness,regalloc,asm
    #[clap(long)]
    dump: Option<String>,

    /// Output assembly file
    #[clap(long, default_value = "output.s")]
    out: String,
}

/// Stand-in for the frontend: the SSA construction lives outside this crate,
/// so the driver compiles a hand-built graph for `(12 + 30) / (9 % 5)`.
fn demo_graph() -> IrGraph {
    let mut b = GraphBuilder::new("main");
    let twelve = b.const_int(12);
    let thirty = b.const_int(30);
    let sum = b.add(twelve, thirty);
    let nine = b.const_int(9);
    let five = b.const_int(5);
    let rem = b.modulo(nine, five);
    let quot = b.div(sum, rem);
    b.ret(quot);
    b.finish()
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    let dumps: Vec<&str> = args
        .dump
        .as_deref()
        .map(|d| d.split(',').collect())
        .unwrap_or_default();

    let graphs = vec![demo_graph()];

    if dumps.contains(&"liveness") {
        for graph in &graphs {
            let liveness = LivenessResult::analyze(graph);
            println!(
                "{}",
                LivenessDisplay {
                    graph,
                    liveness: &liveness
                }
            );
        }
    }

    if dumps.contains(&"regalloc") {
        for graph in &graphs {
            let allocation = RegisterAllocator::allocate(graph);
            println!("regalloc for {}:", graph.name());
            println!("{}", LocationMapDisplay(&allocation.locations));
        }
    }

    match compile(&graphs) {
        Ok(program) => {
            let asm = program.to_string();
            if dumps.contains(&"asm") {
                println!("{asm}");
            }
            match std::fs::write(&args.out, asm) {
                Ok(_) => println!("[SUCCESS] assembly written to {}", args.out),
                Err(e) => {
                    eprintln!("[ERROR] failed to write assembly: {e}");
                    std::process::exit(1);
                }
            }
        }
        Err(e) => {
            eprintln!("[ERROR] code generation failed: {e}");
            std::process::exit(1);
        }
    }
}
