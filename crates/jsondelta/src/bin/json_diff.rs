//! `json-diff`: print the JSON Patch that turns one document into another.
//!
//! Usage:
//!   json-diff <SRC> <DST>
//!
//! Either file may be `-` to read it from stdin.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use jsondelta::json_cli::{diff_json, init_tracing, read_input, CliError};
use jsondelta::DiffOptions;

#[derive(Parser)]
#[command(name = "json-diff", about = "Diff two JSON documents as a JSON Patch", version)]
struct Cli {
    /// Source document
    src: PathBuf,

    /// Destination document
    dst: PathBuf,

    /// Pretty-print the patch with this many spaces
    #[arg(long)]
    indent: Option<usize>,

    /// Emit only add, remove and replace operations
    #[arg(long)]
    no_moves: bool,

    #[arg(short, long)]
    verbose: bool,
}

fn run(cli: &Cli) -> Result<String, CliError> {
    let src = read_input(Some(cli.src.as_path()))?;
    let dst = read_input(Some(cli.dst.as_path()))?;
    let options = DiffOptions {
        infer_moves: !cli.no_moves,
        ..DiffOptions::default()
    };
    diff_json(&src, &dst, &options, cli.indent)
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(result) => {
            if let Err(e) = writeln!(io::stdout(), "{result}") {
                eprintln!("{e}");
                process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    }
}
