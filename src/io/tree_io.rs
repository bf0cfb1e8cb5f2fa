use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::model::document::ProjectDoc;
use crate::model::project::Project;
use crate::model::tree::TreeError;

/// Error type for tree file I/O
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not read {path}: {source}")]
    ReadError { path: PathBuf, source: io::Error },
    #[error("could not write {path}: {source}")]
    WriteError { path: PathBuf, source: io::Error },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid tree in {path}: {source}")]
    InvalidTree { path: PathBuf, source: TreeError },
    #[error("could not serialize tree: {0}")]
    SerializeError(#[from] serde_json::Error),
}

/// Read a project document without building the tree (for `check`).
pub fn read_document(path: &Path) -> Result<ProjectDoc, StoreError> {
    let text = fs::read_to_string(path).map_err(|e| StoreError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    serde_json::from_str(&text).map_err(|e| StoreError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Load a tree file into a project.
pub fn load_project(path: &Path) -> Result<Project, StoreError> {
    let doc = read_document(path)?;
    Project::from_document(&doc).map_err(|e| StoreError::InvalidTree {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Save a project back to its tree file, renumbering sibling indexes.
pub fn save_project(path: &Path, project: &Project) -> Result<(), StoreError> {
    let mut content = serde_json::to_string_pretty(&project.to_document())?;
    content.push('\n');
    atomic_write(path, content.as_bytes()).map_err(|e| StoreError::WriteError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Write via a temp file in the same directory, then rename over `path`.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
