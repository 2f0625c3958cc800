//! Persisted index format: fingerprint snapshots and their on-disk handling.
//!
//! Owns the serialized shape shared by the builder (write path) and the
//! repository (read path).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("index io: {0}")]
    Io(#[from] std::io::Error),
    #[error("index format: {0}")]
    Format(#[from] serde_json::Error),
}

/// Where a checkpoint came from: article id plus paragraph/checkpoint
/// offsets, with the checkpoint text kept for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    pub article: String,
    pub paragraph: usize,
    pub checkpoint: usize,
    pub text: Option<String>,
}

/// One strategy's full index: fingerprint -> ordered locations.
/// Buckets are never empty in a persisted snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexSnapshot {
    pub strategy: String,
    pub built_at: i64,
    pub entries: HashMap<u64, Vec<SourceLocation>>,
}

impl IndexSnapshot {
    pub fn new(strategy: impl Into<String>) -> Self {
        Self {
            strategy: strategy.into(),
            built_at: chrono::Utc::now().timestamp(),
            entries: HashMap::new(),
        }
    }
}

/// Writes a snapshot next to `path` and renames it into place, so a
/// concurrent reader sees either the old index or the new one, never a
/// half-written file.
pub fn save(path: &Path, snapshot: &IndexSnapshot) -> Result<(), IndexError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("tmp");
    {
        let file = fs::File::create(&tmp)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, snapshot)?;
        writer.flush()?;
    }
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Reads a snapshot fully into memory. Fails on a missing, unreadable, or
/// structurally invalid file; never returns a partial snapshot.
pub fn load(path: &Path) -> Result<IndexSnapshot, IndexError> {
    let file = fs::File::open(path)?;
    let reader = BufReader::new(file);
    let snapshot = serde_json::from_reader(reader)?;
    Ok(snapshot)
}
