//! `json-cli`: shared logic for the command-line tools.
//!
//! - `json-patch`: apply a JSON Patch to a document
//! - `json-diff`: print the JSON Patch between two documents

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, Level};

use crate::json_patch::{Patch, PatchError};
use crate::json_patch_diff::{make_patch_with, DiffOptions};

// ── Errors ────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Patch(#[from] PatchError),
}

// ── Shared plumbing ───────────────────────────────────────────────────────

/// Install a stderr `fmt` subscriber. `verbose` raises the level to debug.
pub fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

/// Read a file, or stdin when `path` is `None` or `-`.
pub fn read_input(path: Option<&Path>) -> Result<String, CliError> {
    match path {
        Some(p) if p != Path::new("-") => fs::read_to_string(p).map_err(|source| CliError::Read {
            path: p.display().to_string(),
            source,
        }),
        _ => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .map_err(|source| CliError::Read {
                    path: "<stdin>".into(),
                    source,
                })?;
            Ok(buf)
        }
    }
}

/// Render a value as compact JSON, or pretty-printed with `indent` spaces.
pub fn render(value: &Value, indent: Option<usize>) -> Result<String, CliError> {
    let Some(width) = indent else {
        return Ok(serde_json::to_string(value)?);
    };
    let spaces = " ".repeat(width);
    let mut ser =
        serde_json::Serializer::with_formatter(Vec::new(), PrettyFormatter::with_indent(spaces.as_bytes()));
    value.serialize(&mut ser)?;
    Ok(String::from_utf8_lossy(&ser.into_inner()).into_owned())
}

// ── json-patch ────────────────────────────────────────────────────────────

/// Apply a JSON Patch (RFC 6902) to a document.
///
/// `doc_json`: the document as JSON text.
/// `patch_json`: the patch operations as a JSON array.
pub fn apply_json_patch(
    doc_json: &str,
    patch_json: &str,
    indent: Option<usize>,
) -> Result<String, CliError> {
    let mut doc: Value = serde_json::from_str(doc_json)?;
    let patch = Patch::from_string(patch_json)?;
    debug!(ops = patch.len(), "loaded patch");
    patch.apply_in_place(&mut doc)?;
    render(&doc, indent)
}

// ── json-diff ─────────────────────────────────────────────────────────────

/// Print the patch that turns `src_json` into `dst_json`.
pub fn diff_json(
    src_json: &str,
    dst_json: &str,
    options: &DiffOptions,
    indent: Option<usize>,
) -> Result<String, CliError> {
    let src: Value = serde_json::from_str(src_json)?;
    let dst: Value = serde_json::from_str(dst_json)?;
    let patch = make_patch_with(&src, &dst, options);
    render(&patch.to_value(), indent)
}
