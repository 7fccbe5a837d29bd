use crate::graph::Graph;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Degree {
    pub incoming: usize,
    pub outgoing: usize,
}

impl Degree {
    pub fn total(&self) -> usize {
        self.incoming + self.outgoing
    }
}

/// Per-node edge counts. Every node id starts at zero, so lookups never need a default.
#[derive(Debug, Clone, Default)]
pub struct DegreeTable {
    order: Vec<String>,
    degrees: HashMap<String, Degree>,
    dangling: usize,
    missing: BTreeSet<String>,
}

impl DegreeTable {
    pub fn build(graph: &Graph) -> Self {
        let mut table = DegreeTable::default();
        for node in graph.nodes() {
            if table.degrees.insert(node.id().to_string(), Degree::default()).is_none() {
                table.order.push(node.id().to_string());
            }
        }

        // An absent endpoint is not a reference, so it is neither counted nor reported missing.
        for edge in graph.edges() {
            if !edge.from().is_empty() {
                match table.degrees.get_mut(edge.from()) {
                    Some(degree) => degree.outgoing += 1,
                    None => table.note_missing(edge.from()),
                }
            }
            if !edge.to().is_empty() {
                match table.degrees.get_mut(edge.to()) {
                    Some(degree) => degree.incoming += 1,
                    None => table.note_missing(edge.to()),
                }
            }
        }
        table
    }

    fn note_missing(&mut self, id: &str) {
        self.dangling += 1;
        self.missing.insert(id.to_string());
    }

    pub fn degree(&self, id: &str) -> Option<Degree> {
        self.degrees.get(id).copied()
    }

    /// Node ids with their degree, in the order the nodes were first listed.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Degree)> + '_ {
        self.order
            .iter()
            .map(|id| (id.as_str(), self.degrees[id.as_str()]))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeDegree {
    pub id: String,
    pub incoming: usize,
    pub outgoing: usize,
}

/// Summary of the network's connectivity after a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GraphStats {
    pub nodes: usize,
    pub edges: usize,
    /// Nodes with no outgoing edge.
    pub sources: usize,
    /// Nodes with no incoming edge.
    pub sinks: usize,
    pub isolated: Vec<String>,
    /// Connected nodes with incoming edges only, in node order.
    pub only_incoming: Vec<String>,
    /// Connected nodes with outgoing edges only, in node order.
    pub only_outgoing: Vec<String>,
    /// Edge endpoints that name an unknown node, counted per endpoint.
    pub dangling_references: usize,
    pub missing_ids: Vec<String>,
    pub busiest: Vec<NodeDegree>,
}

impl GraphStats {
    /// `top` bounds how many of the highest-degree nodes are kept in `busiest`.
    pub fn compute(graph: &Graph, top: usize) -> Self {
        let table = DegreeTable::build(graph);
        let mut stats = GraphStats {
            nodes: graph.nodes().len(),
            edges: graph.edges().len(),
            dangling_references: table.dangling,
            missing_ids: table.missing.iter().cloned().collect(),
            ..GraphStats::default()
        };

        // Counted per listed node, so a repeated id counts each time like the node list does.
        for node in graph.nodes() {
            let degree = table.degree(node.id()).unwrap_or_default();
            if degree.outgoing == 0 {
                stats.sources += 1;
            }
            if degree.incoming == 0 {
                stats.sinks += 1;
            }
        }

        let mut ranked: Vec<(&str, Degree)> = table.iter().collect();
        for (id, degree) in &ranked {
            if degree.total() == 0 {
                stats.isolated.push(id.to_string());
            } else if degree.outgoing == 0 {
                stats.only_incoming.push(id.to_string());
            } else if degree.incoming == 0 {
                stats.only_outgoing.push(id.to_string());
            }
        }
        ranked.sort_by(|(left_id, left), (right_id, right)| {
            right
                .total()
                .cmp(&left.total())
                .then_with(|| left_id.cmp(right_id))
        });
        stats.busiest = ranked
            .into_iter()
            .take(top)
            .map(|(id, degree)| NodeDegree {
                id: id.to_string(),
                incoming: degree.incoming,
                outgoing: degree.outgoing,
            })
            .collect();
        stats
    }
}
