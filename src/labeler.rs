//! Top/Bottom endpoint naming driven by elevation.
//!
//! For each lift or run, the higher endpoint becomes `"<edge name> Top"` and the lower one
//! `"<edge name> Bottom"`, provided the node is still a `junction` placeholder or already carries
//! the edge name. Ties are left alone. Nodes shared by several edges take the name from the last
//! edge that renames them.

use crate::elevation::HeightMap;
use crate::graph::Graph;
use std::fmt;
use tracing::{debug, info};

const FALLBACK_SEGMENT: &str = "Segment";
const PLACEHOLDER: &str = "junction";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Top,
    Bottom,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Top => f.write_str("Top"),
            Endpoint::Bottom => f.write_str("Bottom"),
        }
    }
}

/// Renames eligible endpoints in place and returns how many names actually changed.
pub fn apply(graph: &mut Graph, heights: &HeightMap) -> usize {
    let mut renamed = 0;
    let mut ties = 0;

    // Indexing keeps the edge borrow short so nodes can be mutated.
    for position in 0..graph.edges().len() {
        let edge = &graph.edges()[position];
        if !edge.is_labelable() {
            continue;
        }
        let segment = if edge.name().is_empty() {
            FALLBACK_SEGMENT.to_string()
        } else {
            edge.name().to_string()
        };
        let from = edge.from().to_string();
        let to = edge.to().to_string();

        let from_height = heights.height(&from);
        let to_height = heights.height(&to);
        if from_height == to_height {
            debug!(edge = %edge.id(), height = from_height, "skipping tied endpoints");
            ties += 1;
            continue;
        }
        let (high, low) = if from_height > to_height {
            (from, to)
        } else {
            (to, from)
        };

        for (node_id, endpoint) in [(high, Endpoint::Top), (low, Endpoint::Bottom)] {
            if rename_endpoint(graph, &node_id, &segment, endpoint) {
                renamed += 1;
            }
        }
    }

    info!(renamed, ties, "labeled lift and run endpoints");
    renamed
}

fn rename_endpoint(graph: &mut Graph, node_id: &str, segment: &str, endpoint: Endpoint) -> bool {
    let node = match graph.node_mut(node_id) {
        Some(node) => node,
        None => return false,
    };
    if !is_eligible(node.name(), segment) {
        return false;
    }
    let new_name = format!("{segment} {endpoint}");
    if node.name() == new_name {
        return false;
    }
    debug!(node = %node_id, from = %node.name(), to = %new_name, "renaming endpoint");
    node.set_name(new_name);
    true
}

fn is_eligible(current: &str, segment: &str) -> bool {
    let current = current.to_lowercase();
    current == PLACEHOLDER || current.contains(&segment.to_lowercase())
}
