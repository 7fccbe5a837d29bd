//! The apply run: load, label, back up, save.

use crate::config::Config;
use crate::elevation;
use crate::error::{ElevationError, Result, StoreError};
use crate::labeler;
use crate::stats::GraphStats;
use crate::store;
use serde::Serialize;
use tracing::info;

const BUSIEST_NODES: usize = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyOptions {
    /// Label in memory only; no backup and no save.
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplyOutcome {
    pub rows_loaded: usize,
    pub renamed: usize,
    pub backup_written: bool,
    pub saved: bool,
    pub stats: GraphStats,
}

/// Relabels the graph at `config.graph_path` from the elevations at `config.elevations_path`.
///
/// Missing inputs and an empty elevation file fail before anything is written. The backup is
/// copied from the graph file as it is on disk after labeling and before the save, and only when
/// no backup exists yet.
pub fn apply(config: &Config, options: ApplyOptions) -> Result<ApplyOutcome> {
    if !config.elevations_path.exists() {
        return Err(ElevationError::NotFound(config.elevations_path.clone()).into());
    }
    if !config.graph_path.exists() {
        return Err(StoreError::NotFound(config.graph_path.clone()).into());
    }

    let heights = elevation::load(&config.elevations_path)?;
    let mut graph = store::load(&config.graph_path)?;
    let renamed = labeler::apply(&mut graph, &heights);

    let (backup_written, saved) = if options.dry_run {
        info!(renamed, "dry run, graph left unchanged on disk");
        (false, false)
    } else {
        let backup_written = store::backup_if_absent(&config.graph_path, &config.backup_path)?;
        store::save(&config.graph_path, &graph)?;
        (backup_written, true)
    };

    Ok(ApplyOutcome {
        rows_loaded: heights.rows(),
        renamed,
        backup_written,
        saved,
        stats: GraphStats::compute(&graph, BUSIEST_NODES),
    })
}
