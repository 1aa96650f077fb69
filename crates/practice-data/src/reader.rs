//! Export file loading.
//!
//! Two shapes are read: single JSON documents holding an array of records
//! (`history.json`, `stats.json`, `exercise_progress.json`) and the
//! newline-delimited event stream (`ysapi.jsonl`). The documents are
//! required; the event stream is optional.

use std::io::BufRead;
use std::path::Path;

use practice_core::error::{PracticeError, Result};
use serde_json::Value;
use tracing::{debug, info, warn};

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a required JSON document containing an array of records.
///
/// Fails with [`PracticeError::RequiredFileMissing`] when the file does not
/// exist, [`PracticeError::JsonDocument`] when it is not valid JSON and
/// [`PracticeError::UnexpectedShape`] when the top level is not an array.
/// An empty array is a valid, empty result.
pub fn read_json_document(path: &Path) -> Result<Vec<Value>> {
    if !path.exists() {
        return Err(PracticeError::RequiredFileMissing {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| PracticeError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let document: Value =
        serde_json::from_str(&content).map_err(|source| PracticeError::JsonDocument {
            path: path.to_path_buf(),
            source,
        })?;

    match document {
        Value::Array(records) => {
            info!("Loaded {} records from {}", records.len(), path.display());
            Ok(records)
        }
        other => Err(PracticeError::UnexpectedShape {
            path: path.to_path_buf(),
            found: value_kind(&other).to_string(),
        }),
    }
}

/// Load an optional newline-delimited JSON stream.
///
/// A missing file is "no events" and yields an empty collection. Blank and
/// malformed lines are skipped without aborting the read.
pub fn read_jsonl(path: &Path) -> Vec<Value> {
    if !path.exists() {
        debug!("Event stream {} not found; treating as empty", path.display());
        return Vec::new();
    }

    let file = match std::fs::File::open(path) {
        Ok(f) => f,
        Err(e) => {
            warn!("Failed to read event stream {}: {}", path.display(), e);
            return Vec::new();
        }
    };

    let records = read_jsonl_from(std::io::BufReader::new(file));
    info!("Loaded {} events from {}", records.len(), path.display());
    records
}

/// Decode one JSON value per line from any buffered reader.
pub fn read_jsonl_from<R: BufRead>(reader: R) -> Vec<Value> {
    let mut records = Vec::new();

    for (index, line_result) in reader.lines().enumerate() {
        let line = match line_result {
            Ok(l) => l,
            Err(e) if e.kind() == std::io::ErrorKind::InvalidData => continue,
            Err(e) => {
                warn!("Stopped reading event stream at line {}: {}", index + 1, e);
                break;
            }
        };
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        match serde_json::from_str(trimmed) {
            Ok(value) => records.push(value),
            Err(e) => debug!("Skipping malformed event line {}: {}", index + 1, e),
        }
    }

    records
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
