use std::fs;
use std::path::{Path, PathBuf};

use crate::io::list_io::atomic_write;
use crate::model::config::Config;

/// Config file name, looked up beside the list file
pub const CONFIG_FILE: &str = "tickmark.toml";

/// Error type for config I/O
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("could not edit config: {0}")]
    EditError(#[from] toml_edit::TomlError),
    #[error("invalid config key: {0:?}")]
    InvalidKey(String),
}

/// The explicit `--config` path if given, otherwise `tickmark.toml` in
/// the list file's directory
pub fn config_path(explicit: Option<&Path>, list_path: &Path) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    match list_path.parent() {
        Some(dir) => dir.join(CONFIG_FILE),
        None => PathBuf::from(CONFIG_FILE),
    }
}

fn read_text(path: &Path) -> Result<Option<String>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    fs::read_to_string(path)
        .map(Some)
        .map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })
}

/// Read the config file. A missing file gives the defaults.
pub fn read_config(path: &Path) -> Result<Config, ConfigError> {
    match read_text(path)? {
        Some(text) => Ok(toml::from_str(&text)?),
        None => {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Config::default())
        }
    }
}

/// Set a dotted key (`list.indent_width`, `tags.colors.work`) in the
/// document. The value is read as a TOML literal when it parses as one,
/// otherwise as a plain string.
pub fn set_key(doc: &mut toml_edit::DocumentMut, key: &str, value: &str) -> Result<(), ConfigError> {
    let parts: Vec<&str> = key.split('.').collect();
    let Some((last, tables)) = parts.split_last() else {
        return Err(ConfigError::InvalidKey(key.to_string()));
    };
    if parts.iter().any(|p| p.trim().is_empty()) {
        return Err(ConfigError::InvalidKey(key.to_string()));
    }

    let mut table = doc.as_table_mut();
    for name in tables {
        if !table.contains_key(name) {
            let mut new_table = toml_edit::Table::new();
            new_table.set_implicit(true);
            table[*name] = toml_edit::Item::Table(new_table);
        }
        table = table[*name]
            .as_table_mut()
            .ok_or_else(|| ConfigError::InvalidKey(key.to_string()))?;
    }

    let parsed = value
        .parse::<toml_edit::Value>()
        .unwrap_or_else(|_| toml_edit::Value::from(value));
    table[*last] = toml_edit::value(parsed);
    Ok(())
}

/// Set one key in the config file, keeping the rest of its formatting.
/// The edit is rejected if the result is not a valid config.
pub fn update_config(path: &Path, key: &str, value: &str) -> Result<Config, ConfigError> {
    let text = read_text(path)?.unwrap_or_default();
    let mut doc: toml_edit::DocumentMut = text.parse()?;
    set_key(&mut doc, key, value)?;

    let updated = doc.to_string();
    let config: Config = toml::from_str(&updated)?;
    atomic_write(path, updated.as_bytes()).map_err(|e| ConfigError::WriteError {
        path: path.to_path_buf(),
        source: e,
    })?;
    tracing::info!(key, value, "updated config");
    Ok(config)
}
