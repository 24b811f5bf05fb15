use std::fs;
use std::path::{Path, PathBuf};

use crate::io::list_io::{ListError, atomic_write};
use crate::model::config::Config;
use crate::ops::side_tables::SideTables;

/// Where the side tables for `list_path` live: next to the list file
pub fn state_path(list_path: &Path, config: &Config) -> PathBuf {
    match list_path.parent() {
        Some(dir) => dir.join(&config.state.file),
        None => PathBuf::from(&config.state.file),
    }
}

/// Read side tables. A missing file means no records.
pub fn read_state(path: &Path) -> Result<SideTables, ListError> {
    if !path.exists() {
        return Ok(SideTables::default());
    }
    let content = fs::read_to_string(path).map_err(|e| ListError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    serde_json::from_str(&content).map_err(|e| ListError::StateParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Write side tables. Nothing is written for empty tables unless a state
/// file already exists.
pub fn write_state(path: &Path, tables: &SideTables) -> Result<(), ListError> {
    if tables.is_empty() && !path.exists() {
        return Ok(());
    }
    let content = serde_json::to_string_pretty(tables)?;
    atomic_write(path, content.as_bytes()).map_err(|e| ListError::WriteError {
        path: path.to_path_buf(),
        source: e,
    })
}
