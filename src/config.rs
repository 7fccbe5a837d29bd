use crate::store::backup_path_for;
use std::env;
use std::path::PathBuf;

pub const DEFAULT_ELEVATIONS_PATH: &str = "elevations.csv";
pub const DEFAULT_GRAPH_PATH: &str = "data/graph.json";
pub const ELEVATIONS_ENV: &str = "ELEVATIONS_CSV";

/// File locations for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub elevations_path: PathBuf,
    pub graph_path: PathBuf,
    pub backup_path: PathBuf,
}

impl Config {
    /// Backup path is derived from the graph path.
    pub fn new(elevations_path: impl Into<PathBuf>, graph_path: impl Into<PathBuf>) -> Self {
        let graph_path = graph_path.into();
        Config {
            elevations_path: elevations_path.into(),
            backup_path: backup_path_for(&graph_path),
            graph_path,
        }
    }

    /// Defaults, with `ELEVATIONS_CSV` overriding the elevation source.
    pub fn from_env() -> Self {
        let elevations_path =
            env::var(ELEVATIONS_ENV).unwrap_or_else(|_| DEFAULT_ELEVATIONS_PATH.to_string());
        Config::new(elevations_path, DEFAULT_GRAPH_PATH)
    }

    pub fn with_graph_path(self, graph_path: impl Into<PathBuf>) -> Self {
        let graph_path = graph_path.into();
        Config {
            backup_path: backup_path_for(&graph_path),
            graph_path,
            ..self
        }
    }

    pub fn with_elevations_path(self, elevations_path: impl Into<PathBuf>) -> Self {
        Config {
            elevations_path: elevations_path.into(),
            ..self
        }
    }

    pub fn with_backup_path(self, backup_path: impl Into<PathBuf>) -> Self {
        Config {
            backup_path: backup_path.into(),
            ..self
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::new(DEFAULT_ELEVATIONS_PATH, DEFAULT_GRAPH_PATH)
    }
}
