//! Tarn CLI
//!
//! Dumps the predeclared universe and, with `--frame`, a sample activation
//! chain built through the runtime API.

use tarn_eval::{universe, EvalResult, IntWidth, Type, Value};

fn main() {
    init_tracing();

    let mut show_frame = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--frame" => show_frame = true,
            "-h" | "--help" => {
                print_usage();
                return;
            }
            other => {
                eprintln!("error: unknown argument '{other}'");
                print_usage();
                std::process::exit(1);
            }
        }
    }

    print_universe();

    if show_frame {
        println!();
        if let Err(err) = print_sample_frame() {
            eprintln!("error: {err}");
            std::process::exit(if err.is_fatal() { 101 } else { 1 });
        }
    }
}

/// Enable with `RUST_LOG=tarn_eval=trace`.
fn init_tracing() {
    use tracing_subscriber::{prelude::*, EnvFilter};

    // Only initialize if RUST_LOG is set
    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(EnvFilter::from_default_env())
            .with(tracing_tree::HierarchicalLayer::new(2).with_targets(true))
            .init();
    }
}

fn print_usage() {
    println!("Usage: tarn [--frame]");
    println!();
    println!("Options:");
    println!("  --frame    Also build and print a sample frame chain");
}

fn print_universe() {
    println!("universe:");
    for (name, def) in universe().local_defs() {
        println!("  {name}: {def}");
    }
}

/// A program scope with a global, and a function body that reads it.
fn print_sample_frame() -> EvalResult {
    let int = Type::int(IntWidth::W64, "int");

    let program = universe().fork_func();
    program.define_var("count", int.clone())?;
    let limit = int.convert_const(&Value::ideal_int(100.into()))?;
    program.define_const("limit", int.clone(), limit)?;

    let body = program.fork_func();
    let arg = body.define_var("n", int.clone())?;
    let block = body.fork();
    let (_, tmp) = block.define_temp(Type::array(3, int))?;

    let globals = program.new_frame(None);
    let frame = body.new_frame(Some(&globals));
    globals.get(&program, 0)?.as_int()?.set(1);
    frame.get(&body, arg.index)?.as_int()?.set(41);
    frame.get(&block, tmp.index)?.as_array()?.elem(2)?.as_int()?.set(7);

    println!("scope {} depth to program: {:?}", block.id(), block.frame_depth(&program));
    print!("{frame}");
    Ok(())
}
