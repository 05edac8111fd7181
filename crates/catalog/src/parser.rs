//! Parser for catalog snapshot files.
//!
//! Two layouts are accepted:
//! - JSON Lines: one product object per line, blank lines skipped
//! - JSON array: a single top-level array of product objects
//!
//! The layout is picked from the file extension (`.jsonl` / `.ndjson` vs
//! `.json`); for any other extension the first non-whitespace byte decides.

use crate::error::{CatalogError, Result};
use crate::types::ProductRecord;
use rayon::prelude::*;
use std::fs;
use std::path::Path;

/// Snapshot layout on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    JsonLines,
    JsonArray,
}

impl SnapshotFormat {
    /// Pick the layout for a file, looking at its contents only when the
    /// extension is not conclusive
    pub fn detect(path: &Path, contents: &str) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("jsonl") | Some("ndjson") => SnapshotFormat::JsonLines,
            Some("json") => SnapshotFormat::JsonArray,
            _ => {
                if contents.trim_start().starts_with('[') {
                    SnapshotFormat::JsonArray
                } else {
                    SnapshotFormat::JsonLines
                }
            }
        }
    }
}

/// Read and decode every record of a snapshot file
pub fn parse_snapshot(path: &Path) -> Result<Vec<ProductRecord>> {
    let contents = fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let file = file_label(path);

    match SnapshotFormat::detect(path, &contents) {
        SnapshotFormat::JsonLines => parse_json_lines(&file, &contents),
        SnapshotFormat::JsonArray => parse_json_array(&file, &contents),
    }
}

/// Decode a JSON Lines document.
///
/// Lines are independent, so they are decoded in parallel; the result keeps
/// file order and the first failing line (lowest line number) is reported.
pub fn parse_json_lines(file: &str, contents: &str) -> Result<Vec<ProductRecord>> {
    let lines: Vec<(usize, &str)> = contents
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
        .collect();

    lines
        .par_iter()
        .map(|&(line_no, line)| {
            serde_json::from_str::<ProductRecord>(line).map_err(|e| CatalogError::ParseError {
                file: file.to_string(),
                line: line_no,
                reason: e.to_string(),
            })
        })
        .collect::<Vec<_>>()
        .into_iter()
        .collect()
}

/// Decode a document holding one JSON array of records
pub fn parse_json_array(file: &str, contents: &str) -> Result<Vec<ProductRecord>> {
    serde_json::from_str::<Vec<ProductRecord>>(contents).map_err(|e| CatalogError::ParseError {
        file: file.to_string(),
        line: e.line(),
        reason: e.to_string(),
    })
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
