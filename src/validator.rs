//! Structural checks over a graph document.
//!
//! Validation works on untyped JSON so that documents the store would refuse to load can still be
//! reported on. Every problem found is returned; nothing is fixed and nothing short-circuits.

use serde_json::{Map, Value};
use std::collections::HashSet;

/// Problems found in `document`, in node order then edge order. Empty means valid.
pub fn validate(document: &Value) -> Vec<String> {
    let mut errors = Vec::new();

    let object = match document.as_object() {
        Some(object) => object,
        None => {
            errors.push("graph is not an object".to_string());
            return errors;
        }
    };

    let nodes = non_empty_array(object, "nodes");
    if nodes.is_none() {
        errors.push("nodes missing or empty".to_string());
    }
    let edges = non_empty_array(object, "edges");
    if edges.is_none() {
        errors.push("edges missing or empty".to_string());
    }

    let mut node_ids = HashSet::new();
    for node in nodes.unwrap_or(&[]) {
        check_node(node, &mut node_ids, &mut errors);
    }
    for edge in edges.unwrap_or(&[]) {
        check_edge(edge, &node_ids, &mut errors);
    }

    errors
}

fn check_node<'a>(node: &'a Value, node_ids: &mut HashSet<&'a str>, errors: &mut Vec<String>) {
    let node = match node.as_object() {
        Some(node) => node,
        None => {
            errors.push("node is not an object".to_string());
            return;
        }
    };
    let id = display_id(node);

    match node.get("id") {
        Some(value) if is_truthy(value) => match value.as_str() {
            Some(raw) => {
                if !node_ids.insert(raw) {
                    errors.push(format!("node {id} duplicate id"));
                }
            }
            None => errors.push(format!("node {id} id is not a string")),
        },
        _ => errors.push("node missing id".to_string()),
    }
    if !field_is_truthy(node, "name") {
        errors.push(format!("node {id} missing name"));
    }
    if !field_is_number(node, "lat") || !field_is_number(node, "lon") {
        errors.push(format!("node {id} missing lat/lon"));
    }
    if !field_is_number(node, "elev_m") {
        errors.push(format!("node {id} missing elev_m"));
    }
}

fn check_edge(edge: &Value, node_ids: &HashSet<&str>, errors: &mut Vec<String>) {
    let edge = match edge.as_object() {
        Some(edge) => edge,
        None => {
            errors.push("edge is not an object".to_string());
            return;
        }
    };
    let id = display_id(edge);

    if !field_is_truthy(edge, "id") {
        errors.push("edge missing id".to_string());
    }
    for key in ["name", "type"] {
        if !field_is_truthy(edge, key) {
            errors.push(format!("edge {id} missing {key}"));
        }
    }
    for key in ["from", "to"] {
        let resolved = edge
            .get(key)
            .and_then(Value::as_str)
            .is_some_and(|target| !target.is_empty() && node_ids.contains(target));
        if !resolved {
            errors.push(format!("edge {id} invalid {key}"));
        }
    }

    match edge.get("geometry").and_then(Value::as_array) {
        Some(points) if points.len() >= 2 => {
            if points.iter().any(|point| !is_coordinate(point)) {
                errors.push(format!("edge {id} bad coord"));
            }
        }
        _ => errors.push(format!("edge {id} geometry short")),
    }
}

fn non_empty_array<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a [Value]> {
    object
        .get(key)
        .and_then(Value::as_array)
        .filter(|items| !items.is_empty())
        .map(Vec::as_slice)
}

fn is_coordinate(point: &Value) -> bool {
    match point.as_array() {
        Some(values) => values.len() >= 2 && values.iter().all(is_numeric),
        None => false,
    }
}

fn is_numeric(value: &Value) -> bool {
    match value {
        Value::Number(_) => true,
        Value::String(text) => text.trim().parse::<f64>().is_ok(),
        _ => false,
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|number| number != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

fn field_is_truthy(object: &Map<String, Value>, key: &str) -> bool {
    object.get(key).is_some_and(is_truthy)
}

fn field_is_number(object: &Map<String, Value>, key: &str) -> bool {
    object.get(key).is_some_and(Value::is_number)
}

/// Id as shown in messages: the raw string, other JSON rendered as text, or empty when absent.
fn display_id(object: &Map<String, Value>) -> String {
    match object.get("id") {
        Some(Value::String(id)) => id.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}
