//! `json-patch`: apply a JSON Patch (RFC 6902) to a document.
//!
//! Usage:
//!   json-patch <PATCH> [DOC]
//!
//! The patch is read from the `PATCH` file. The document is read from `DOC`,
//! or from stdin when `DOC` is omitted or `-`.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use jsondelta::json_cli::{apply_json_patch, init_tracing, read_input, CliError};

#[derive(Parser)]
#[command(name = "json-patch", about = "Apply a JSON Patch to a JSON document", version)]
struct Cli {
    /// File holding the patch operations as a JSON array
    patch: PathBuf,

    /// Document to patch; stdin when omitted
    doc: Option<PathBuf>,

    /// Pretty-print the result with this many spaces
    #[arg(long)]
    indent: Option<usize>,

    #[arg(short, long)]
    verbose: bool,
}

fn run(cli: &Cli) -> Result<String, CliError> {
    let patch = read_input(Some(cli.patch.as_path()))?;
    let doc = read_input(cli.doc.as_deref())?;
    apply_json_patch(&doc, &patch, cli.indent)
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
