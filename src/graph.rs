use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::collections::HashMap;

pub const LIFT: &str = "lift";
pub const RUN: &str = "run";

/// A named location on the mountain, usually a lift or run endpoint.
///
/// The node is kept as the JSON object it was loaded from. Only `name` is ever written; every other
/// key keeps its value, type and position through load and save.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Node {
    fields: Map<String, Value>,
}

impl Node {
    pub fn new(id: &str, name: &str) -> Self {
        let mut fields = Map::new();
        fields.insert("id".to_string(), Value::from(id));
        fields.insert("name".to_string(), Value::from(name));
        Node { fields }
    }

    pub fn at(mut self, lat: f64, lon: f64, elev_m: f64) -> Self {
        self.fields.insert("lat".to_string(), Value::from(lat));
        self.fields.insert("lon".to_string(), Value::from(lon));
        self.fields.insert("elev_m".to_string(), Value::from(elev_m));
        self
    }

    /// The string id, or `""` when absent or not a string.
    pub fn id(&self) -> &str {
        text(&self.fields, "id")
    }

    pub fn name(&self) -> &str {
        text(&self.fields, "name")
    }

    /// Replaces `name` in place, or appends it when the node had none.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.fields.insert("name".to_string(), Value::String(name.into()));
    }

    pub fn lat(&self) -> Option<f64> {
        self.fields.get("lat").and_then(Value::as_f64)
    }

    pub fn lon(&self) -> Option<f64> {
        self.fields.get("lon").and_then(Value::as_f64)
    }

    pub fn elev_m(&self) -> Option<f64> {
        self.fields.get("elev_m").and_then(Value::as_f64)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

/// A lift or run joining two nodes along a polyline, kept as its JSON object.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Edge {
    fields: Map<String, Value>,
}

impl Edge {
    pub fn new(id: &str, kind: &str, from: &str, to: &str) -> Self {
        let mut fields = Map::new();
        fields.insert("id".to_string(), Value::from(id));
        fields.insert("type".to_string(), Value::from(kind));
        fields.insert("from".to_string(), Value::from(from));
        fields.insert("to".to_string(), Value::from(to));
        Edge { fields }
    }

    pub fn named(mut self, name: &str) -> Self {
        self.fields.insert("name".to_string(), Value::from(name));
        self
    }

    pub fn with_geometry(mut self, geometry: Vec<Vec<f64>>) -> Self {
        self.fields.insert("geometry".to_string(), json!(geometry));
        self
    }

    pub fn id(&self) -> &str {
        text(&self.fields, "id")
    }

    pub fn name(&self) -> &str {
        text(&self.fields, "name")
    }

    /// The edge `type`, e.g. `lift`, `run` or `walk`.
    pub fn kind(&self) -> &str {
        text(&self.fields, "type")
    }

    pub fn from(&self) -> &str {
        text(&self.fields, "from")
    }

    pub fn to(&self) -> &str {
        text(&self.fields, "to")
    }

    pub fn geometry(&self) -> Option<&Value> {
        self.fields.get("geometry")
    }

    /// Only lifts and runs carry Top/Bottom endpoint names.
    pub fn is_labelable(&self) -> bool {
        self.kind() == LIFT || self.kind() == RUN
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

fn text<'a>(fields: &'a Map<String, Value>, key: &str) -> &'a str {
    fields.get(key).and_then(Value::as_str).unwrap_or("")
}

/// Owned form of the persisted document, used when loading. Other top-level keys are ignored.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct GraphDocument {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

#[derive(Serialize)]
struct GraphDocumentRef<'a> {
    nodes: &'a [Node],
    edges: &'a [Edge],
}

/// Trail network held in memory for one run.
///
/// Nodes keep their document order for saving and are addressed by id through an index. When a
/// document repeats an id, the last occurrence is the one the index points at. Nodes without a
/// string id stay in the list but cannot be addressed.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<Node>,
    index: HashMap<String, usize>,
    edges: Vec<Edge>,
}

impl Graph {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        let mut graph = Graph {
            nodes: Vec::with_capacity(nodes.len()),
            index: HashMap::new(),
            edges,
        };
        for node in nodes {
            graph.add_node(node);
        }
        graph
    }

    pub fn add_node(&mut self, node: Node) {
        if !node.id().is_empty() {
            self.index.insert(node.id().to_string(), self.nodes.len());
        }
        self.nodes.push(node);
    }

    pub fn add_edge(&mut self, edge: Edge) {
        self.edges.push(edge);
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.index.get(id).map(|&position| &self.nodes[position])
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        match self.index.get(id) {
            Some(&position) => self.nodes.get_mut(position),
            None => None,
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// The persisted form: exactly `{"nodes": [...], "edges": [...]}`.
    pub(crate) fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&GraphDocumentRef {
            nodes: &self.nodes,
            edges: &self.edges,
        })
    }
}

impl From<GraphDocument> for Graph {
    fn from(document: GraphDocument) -> Self {
        Graph::new(document.nodes, document.edges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_ids_resolve_to_last_occurrence() {
        let graph = Graph::new(
            vec![Node::new("A", "first"), Node::new("A", "second")],
            Vec::new(),
        );
        assert_eq!(graph.nodes().len(), 2);
        assert_eq!(graph.node("A").map(Node::name), Some("second"));
    }

    #[test]
    fn nodes_without_string_ids_are_kept_but_not_addressable() {
        let document: GraphDocument = serde_json::from_value(json!({
            "nodes": [{"name": "junction"}, {"id": 7, "name": "junction"}],
            "edges": []
        }))
        .expect("document should deserialize");
        let graph = Graph::from(document);
        assert_eq!(graph.nodes().len(), 2);
        assert!(graph.node("").is_none());
        assert!(graph.node("7").is_none());
    }

    #[test]
    fn fields_keep_their_json_types_and_order() {
        let node: Node = serde_json::from_value(json!({
            "name": null, "kind": "base", "id": "A", "lat": "50.1", "lon": -122, "elev_m": 675
        }))
        .expect("node should deserialize");
        assert_eq!(node.id(), "A");
        assert_eq!(node.name(), "");
        assert_eq!(node.lat(), None);
        assert_eq!(node.lon(), Some(-122.0));
        assert_eq!(node.elev_m(), Some(675.0));

        let keys: Vec<&str> = node.fields().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["name", "kind", "id", "lat", "lon", "elev_m"]);
        assert_eq!(node.fields()["elev_m"], json!(675));
    }

    #[test]
    fn set_name_keeps_key_position() {
        let mut node: Node = serde_json::from_value(json!({"name": "junction", "id": "A"}))
            .expect("node should deserialize");
        node.set_name("Peak Run Top");
        assert_eq!(
            serde_json::to_value(&node).expect("node should serialize"),
            json!({"name": "Peak Run Top", "id": "A"})
        );
        let keys: Vec<&str> = node.fields().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["name", "id"]);
    }

    #[test]
    fn edge_accessors_read_absent_fields_as_empty() {
        let edge: Edge = serde_json::from_value(json!({"id": "w1", "type": "walk", "to": "A", "geometry": null}))
            .expect("edge should deserialize");
        assert_eq!(edge.name(), "");
        assert_eq!(edge.from(), "");
        assert_eq!(edge.to(), "A");
        assert_eq!(edge.geometry(), Some(&Value::Null));
        assert!(!edge.fields().contains_key("from"));
    }

    #[test]
    fn only_lifts_and_runs_are_labelable() {
        assert!(Edge::new("e1", "lift", "A", "B").is_labelable());
        assert!(Edge::new("e2", "run", "A", "B").is_labelable());
        assert!(!Edge::new("e3", "walk", "A", "B").is_labelable());
        assert!(!Edge::new("e4", "Run", "A", "B").is_labelable());
    }
}
