//! Complexia CLI — evaluate complex-number expressions and render graphs.
//!
//! With an expression argument, compiles and evaluates it once (or, with
//! `--disasm`, prints the bytecode; with `--graph`, renders it over a grid
//! to an SVG file). With no argument, runs a read-eval-print loop where a
//! bad line prints its error and the loop continues.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use complexia_core::bytecode::{disassemble, Program};
use complexia_core::compiler;
use complexia_core::vm;
use complexia_grid::{sample, GridOptions, Rect};

#[derive(Parser)]
#[command(version, about = "Complexia \u{2014} complex-number expression calculator")]
struct Cli {
    /// Expression to compile and evaluate
    #[arg(allow_hyphen_values = true)]
    expr: Option<String>,

    /// Print the compiled bytecode instead of evaluating
    #[arg(long)]
    disasm: bool,

    /// Render the expression over a grid and write an SVG file.
    /// The expression's first numeric literal is the input slot,
    /// replaced by each cell's coordinate.
    #[arg(long, value_name = "FILE")]
    graph: Option<PathBuf>,

    /// Grid cell size in complex-plane units
    #[arg(long, default_value_t = 0.1)]
    step: f64,

    /// Complex-plane window as `x0,y0,x1,y1`
    #[arg(
        long,
        default_value = "-2,-2,2,2",
        value_parser = parse_window,
        allow_hyphen_values = true
    )]
    window: Window,
}

/// A rectangular window of the complex plane.
#[derive(Clone, Copy, Debug)]
struct Window {
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
}

fn parse_window(s: &str) -> Result<Window, String> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 4 {
        return Err(format!("expected `x0,y0,x1,y1`, got \"{s}\""));
    }
    let mut values = [0.0f64; 4];
    for (slot, part) in values.iter_mut().zip(&parts) {
        *slot = part
            .trim()
            .parse()
            .map_err(|_| format!("invalid number \"{}\"", part.trim()))?;
    }
    Ok(Window {
        x0: values[0],
        y0: values[1],
        x1: values[2],
        y1: values[3],
    })
}

fn main() {
    let cli = Cli::parse();

    match &cli.expr {
        Some(expr) => {
            if let Err(err) = run_once(&cli, expr) {
                eprintln!("error: {err}");
                process::exit(1);
            }
        }
        None => {
            if cli.disasm || cli.graph.is_some() {
                eprintln!("error: --disasm and --graph need an expression argument");
                process::exit(2);
            }
            repl();
        }
    }
}

/// Compile and run a single expression in whichever mode the flags pick.
fn run_once(cli: &Cli, expr: &str) -> Result<(), Box<dyn std::error::Error>> {
    let program = compiler::compile(expr)?;

    if cli.disasm {
        print!("{}", disassemble(&program)?);
        return Ok(());
    }

    if let Some(path) = &cli.graph {
        write_graph(cli, program, path)?;
        return Ok(());
    }

    println!("{}", vm::evaluate(&program)?);
    Ok(())
}

fn write_graph(cli: &Cli, program: Program, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let w = cli.window;
    let options = GridOptions {
        window: Rect::new(w.x0, w.y0, w.x1, w.y1),
        step: cli.step,
    };
    let grid = sample(program, &options)?;
    fs::write(path, complexia_grid::svg::render_to_string(&grid))?;
    Ok(())
}

/// Read-eval-print loop. One bad line prints its error and the loop goes
/// on; `q`, `quit`, or end of input exits.
fn repl() {
    let stdin = io::stdin();
    loop {
        print!("> ");
        let _ = io::stdout().flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "q" || line == "quit" {
            break;
        }

        match compiler::compile(line).and_then(|program| vm::evaluate(&program)) {
            Ok(value) => println!("{value}"),
            Err(err) => eprintln!("error: {err}"),
        }
    }
}
