use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::model::node::{IdGen, Tree};
use crate::parse::{node_to_string_with, parse_md_with};

/// Error type for list and state file I/O
#[derive(Debug, thiserror::Error)]
pub enum ListError {
    #[error("could not read {path}: {source}")]
    ReadError { path: PathBuf, source: io::Error },
    #[error("could not write {path}: {source}")]
    WriteError { path: PathBuf, source: io::Error },
    #[error("could not parse {path}: {source}")]
    StateParseError {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("could not serialize state: {0}")]
    StateSerializeError(#[from] serde_json::Error),
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Read and parse a list file. A missing file is an empty list.
pub fn read_list(path: &Path, indent_width: usize, ids: &mut IdGen) -> Result<Tree, ListError> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "list file not found, starting empty");
        return Ok(Tree::new(ids));
    }
    let text = fs::read_to_string(path).map_err(|e| ListError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    let tree = parse_md_with(&text, indent_width, ids);
    tracing::debug!(path = %path.display(), lines = tree.len(), "read list");
    Ok(tree)
}

/// Serialize a tree and write it back atomically
pub fn write_list(path: &Path, tree: &Tree, indent_width: usize) -> Result<(), ListError> {
    let text = node_to_string_with(tree, indent_width);
    atomic_write(path, text.as_bytes()).map_err(|e| ListError::WriteError {
        path: path.to_path_buf(),
        source: e,
    })
}
