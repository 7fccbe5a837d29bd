//! JSON persistence for the trail graph and its write-once backup.

use crate::error::StoreError;
use crate::graph::{Graph, GraphDocument};
use serde_json::Value;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const BACKUP_SUFFIX: &str = "backup.json";

/// Loads the graph at `path`.
///
/// Only the document shape is checked here: the top level must be an object whose `nodes` and
/// `edges` are lists of objects. Field-level problems are left for the validator.
pub fn load(path: &Path) -> Result<Graph, StoreError> {
    let value = read_document(path)?;
    let object = match value.as_object() {
        Some(object) => object,
        None => return Err(malformed(path, "top-level value is not an object")),
    };
    for key in ["nodes", "edges"] {
        if !object.contains_key(key) {
            return Err(malformed(path, format!("missing `{key}`")));
        }
    }
    let document: GraphDocument =
        serde_json::from_value(value).map_err(|error| malformed(path, error.to_string()))?;
    let graph = Graph::from(document);
    debug!(
        nodes = graph.nodes().len(),
        edges = graph.edges().len(),
        path = %path.display(),
        "loaded graph"
    );
    Ok(graph)
}

/// Reads the document as untyped JSON so callers such as the validator can inspect any shape.
pub fn read_document(path: &Path) -> Result<Value, StoreError> {
    let raw = fs::read_to_string(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => StoreError::NotFound(path.to_path_buf()),
        _ => StoreError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;
    serde_json::from_str(&raw).map_err(|error| malformed(path, error.to_string()))
}

/// Writes `{"nodes": [...], "edges": [...]}`; any other top-level keys of the source are dropped.
/// Node and edge objects are written back exactly as held, so only renamed names differ.
pub fn save(path: &Path, graph: &Graph) -> Result<(), StoreError> {
    let json = graph.to_json_pretty()?;
    fs::write(path, json).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "graph saved");
    Ok(())
}

/// Copies the bytes currently on disk at `path` to `backup_path` unless a backup already exists.
///
/// An existing backup is never overwritten or refreshed. Returns whether a backup was written.
pub fn backup_if_absent(path: &Path, backup_path: &Path) -> Result<bool, StoreError> {
    if backup_path.exists() {
        debug!(backup = %backup_path.display(), "backup already present");
        return Ok(false);
    }
    let bytes = fs::read(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut file = match OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(backup_path)
    {
        Ok(file) => file,
        Err(error) if error.kind() == ErrorKind::AlreadyExists => return Ok(false),
        Err(source) => {
            return Err(StoreError::Io {
                path: backup_path.to_path_buf(),
                source,
            });
        }
    };
    file.write_all(&bytes).map_err(|source| StoreError::Io {
        path: backup_path.to_path_buf(),
        source,
    })?;
    info!(backup = %backup_path.display(), "backup written");
    Ok(true)
}

/// Sibling of `path` named `<stem>.backup.json`, e.g. `graph.json` -> `graph.backup.json`.
pub fn backup_path_for(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!("{stem}.{BACKUP_SUFFIX}"))
}

fn malformed(path: &Path, reason: impl Into<String>) -> StoreError {
    StoreError::MalformedDocument {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
}
