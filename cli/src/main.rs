//! Marginalia CLI: evaluate a script once and print it with annotations.

use std::path::PathBuf;

use clap::Parser;
use marginalia::{Engine, MarkerConfig, Outcome, RenderOptions, render_block, render_inline};
use miette::{Result, miette};

/// Marginalia - live evaluation annotations for scripts
#[derive(Parser, Debug)]
#[command(name = "marginalia")]
#[command(about = "Annotate a script with the values of its statements", long_about = None)]
struct Args {
    /// Print the parsed statements (for debugging)
    #[arg(long)]
    debug_parse: bool,

    /// Print full multi-line renderings beneath marked lines
    #[arg(long)]
    multiline: bool,

    /// Script file to evaluate
    file: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    let source = std::fs::read_to_string(&args.file)
        .map_err(|e| miette!("cannot read {}: {e}", args.file.display()))?;
    let lines: Vec<String> = source.split('\n').map(str::to_string).collect();

    let markers = MarkerConfig::default();
    let render = RenderOptions::default();
    let mut engine = Engine::new();

    if args.debug_parse {
        let line_refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let program = marginalia_core::patch::parse_tolerant(&line_refs);
        println!("=== Statements ===");
        for stmt in &program.statements {
            println!("{:?}: {:?}", stmt.span, stmt.kind);
        }
        println!();
    }

    let annotations = engine.evaluate(&lines, &markers);

    for (number, line) in lines.iter().enumerate() {
        println!("{line}");
        for annotation in annotations.iter().filter(|a| a.line == number) {
            print_annotation(&annotation.outcome, args.multiline, &render);
        }
    }
    Ok(())
}

fn print_annotation(outcome: &Outcome, multiline: bool, render: &RenderOptions) {
    if multiline {
        if let Some(text) = render_block(outcome, render) {
            for (i, chunk) in text.split('\n').enumerate() {
                if i == 0 {
                    println!("# >>> {chunk}");
                } else {
                    println!("# ... {chunk}");
                }
            }
        }
    } else if let Some(text) = render_inline(outcome) {
        println!("# => {text}");
    }
}
