use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::{Config, DropConfig};
use crate::tracker::DropPolicy;

pub const CONFIG_FILE: &str = "reorder.toml";

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
    #[error("could not parse reorder.toml: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("could not edit reorder.toml: {0}")]
    EditError(#[from] toml_edit::TomlError),
    #[error("drop threshold {0} in reorder.toml is outside 0.0..=1.0")]
    InvalidThreshold(f32),
}

/// Read the config from `dir`, returning both the parsed config and the raw
/// toml_edit document for round-trip-safe editing. A missing file yields the
/// defaults and an empty document.
pub fn read_config(dir: &Path) -> Result<(Config, toml_edit::DocumentMut), ConfigError> {
    let path = dir.join(CONFIG_FILE);
    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(ConfigError::ReadError { path, source: e }),
    };
    let config: Config = toml::from_str(&text)?;
    if !DropConfig::threshold_in_range(config.drop.threshold) {
        return Err(ConfigError::InvalidThreshold(config.drop.threshold));
    }
    let doc: toml_edit::DocumentMut = text.parse()?;
    Ok((config, doc))
}

/// Write the config document back to disk, preserving formatting.
pub fn write_config(dir: &Path, doc: &toml_edit::DocumentMut) -> Result<(), ConfigError> {
    let path = dir.join(CONFIG_FILE);
    fs::write(&path, doc.to_string()).map_err(|e| ConfigError::WriteError { path, source: e })
}

fn drop_table(doc: &mut toml_edit::DocumentMut) -> &mut toml_edit::Item {
    if !doc.contains_key("drop") {
        doc["drop"] = toml_edit::Item::Table(toml_edit::Table::new());
    }
    &mut doc["drop"]
}

/// Update the drop policy in the config document
pub fn set_drop_policy(doc: &mut toml_edit::DocumentMut, policy: DropPolicy) {
    drop_table(doc)["policy"] = toml_edit::value(policy.to_string());
}

/// Update the midpoint threshold in the config document
pub fn set_threshold(doc: &mut toml_edit::DocumentMut, threshold: f32) {
    drop_table(doc)["threshold"] = toml_edit::value(f64::from(threshold));
}
