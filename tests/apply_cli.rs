use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

const PEAK_RUN_GRAPH: &str = r#"{
  "resort": "test",
  "nodes": [
    {"id": "A", "name": "Junction", "lat": 50.0, "lon": -122.9, "elev_m": 100},
    {"id": "B", "name": "junction", "lat": 50.1, "lon": -122.9, "elev_m": 50},
    {"id": "C", "name": "Roundhouse", "lat": 50.2, "lon": -122.9, "elev_m": 10}
  ],
  "edges": [
    {"id": "e1", "name": "Peak Run", "type": "run", "from": "A", "to": "B",
     "geometry": [[-122.9, 50.0], [-122.9, 50.1]]},
    {"id": "e2", "name": "Connector", "type": "run", "from": "B", "to": "C",
     "geometry": [[-122.9, 50.1], [-122.9, 50.2]]}
  ]
}"#;

const PEAK_RUN_ELEVATIONS: &str = "id,name,lat,lon,elev_m\nA,A,50.0,-122.9,100\nB,B,50.1,-122.9,50\nC,C,50.2,-122.9,10\n";

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "trailgraph_test_{}_{}",
        name,
        std::process::id()
    ));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).expect("failed to create scratch dir");
    dir
}

fn run_trailgraph(args: &[&str], elevations_env: Option<&Path>) -> Output {
    let exe = env!("CARGO_BIN_EXE_trailgraph");
    let mut command = Command::new(exe);
    command.args(args).env_remove("ELEVATIONS_CSV").env_remove("RUST_LOG");
    if let Some(path) = elevations_env {
        command.env("ELEVATIONS_CSV", path);
    }
    command.output().expect("failed to run trailgraph")
}

fn apply(dir: &Path) -> Output {
    let csv = dir.join("elevations.csv");
    let graph = dir.join("graph.json");
    run_trailgraph(
        &[
            "apply",
            "--elevations",
            csv.to_str().unwrap(),
            "--graph",
            graph.to_str().unwrap(),
        ],
        None,
    )
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn node_name(graph: &Value, id: &str) -> String {
    graph["nodes"]
        .as_array()
        .expect("nodes array")
        .iter()
        .find(|node| node["id"] == id)
        .and_then(|node| node["name"].as_str())
        .unwrap_or_default()
        .to_string()
}

fn read_graph(dir: &Path) -> Value {
    let raw = fs::read_to_string(dir.join("graph.json")).expect("failed to read graph");
    serde_json::from_str(&raw).expect("invalid json")
}

#[test]
fn apply_labels_peak_run_and_reports_counts() {
    let dir = scratch_dir("apply_peak_run");
    fs::write(dir.join("graph.json"), PEAK_RUN_GRAPH).unwrap();
    fs::write(dir.join("elevations.csv"), PEAK_RUN_ELEVATIONS).unwrap();

    let output = apply(&dir);
    assert!(output.status.success(), "apply failed: {:?}", output);
    let text = stdout(&output);
    assert!(text.contains("Loaded 3 elevation rows"), "unexpected output: {text}");
    assert!(text.contains("Renamed nodes: 2"), "unexpected output: {text}");
    assert!(text.contains("Backup written:"), "unexpected output: {text}");
    assert!(text.contains("Graph stats: sources 1, sinks 1"), "unexpected output: {text}");

    let graph = read_graph(&dir);
    assert_eq!(node_name(&graph, "A"), "Peak Run Top");
    assert_eq!(node_name(&graph, "B"), "Peak Run Bottom");
    assert_eq!(node_name(&graph, "C"), "Roundhouse");
    assert!(graph.get("resort").is_none());
    assert_eq!(graph["edges"][0]["geometry"][1][1], 50.1);

    let backup = fs::read_to_string(dir.join("graph.backup.json")).expect("backup missing");
    assert_eq!(backup, PEAK_RUN_GRAPH);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn backup_is_never_refreshed() {
    let dir = scratch_dir("backup_once");
    fs::write(dir.join("graph.json"), PEAK_RUN_GRAPH).unwrap();
    fs::write(dir.join("elevations.csv"), PEAK_RUN_ELEVATIONS).unwrap();

    assert!(apply(&dir).status.success());
    let second = apply(&dir);
    assert!(second.status.success());
    let text = stdout(&second);
    assert!(text.contains("Renamed nodes: 0"), "unexpected output: {text}");
    assert!(!text.contains("Backup written:"), "unexpected output: {text}");

    let mut graph = read_graph(&dir);
    graph["nodes"][2]["name"] = Value::from("junction");
    fs::write(dir.join("graph.json"), graph.to_string()).unwrap();
    let third = apply(&dir);
    assert!(third.status.success());
    assert!(stdout(&third).contains("Renamed nodes: 1"));

    let backup = fs::read_to_string(dir.join("graph.backup.json")).expect("backup missing");
    assert_eq!(backup, PEAK_RUN_GRAPH);
    assert_eq!(node_name(&read_graph(&dir), "C"), "Connector Bottom");

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn elevations_path_comes_from_environment() {
    let dir = scratch_dir("env_override");
    let csv = dir.join("heights from export.csv");
    let graph = dir.join("graph.json");
    fs::write(&graph, PEAK_RUN_GRAPH).unwrap();
    fs::write(&csv, PEAK_RUN_ELEVATIONS.replace('\n', "\\n")).unwrap();

    let output = run_trailgraph(&["apply", "--graph", graph.to_str().unwrap()], Some(&csv));
    assert!(output.status.success(), "apply failed: {:?}", output);
    assert!(stdout(&output).contains("Renamed nodes: 2"));
    assert_eq!(node_name(&read_graph(&dir), "A"), "Peak Run Top");

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn dry_run_leaves_files_alone() {
    let dir = scratch_dir("dry_run");
    fs::write(dir.join("graph.json"), PEAK_RUN_GRAPH).unwrap();
    fs::write(dir.join("elevations.csv"), PEAK_RUN_ELEVATIONS).unwrap();

    let csv = dir.join("elevations.csv");
    let graph = dir.join("graph.json");
    let output = run_trailgraph(
        &[
            "apply",
            "--dry-run",
            "--json",
            "--elevations",
            csv.to_str().unwrap(),
            "--graph",
            graph.to_str().unwrap(),
        ],
        None,
    );
    assert!(output.status.success(), "apply failed: {:?}", output);
    let outcome: Value = serde_json::from_slice(&output.stdout).expect("invalid json");
    assert_eq!(outcome["renamed"], 2);
    assert_eq!(outcome["saved"], false);
    assert_eq!(outcome["stats"]["nodes"], 3);

    assert_eq!(fs::read_to_string(&graph).unwrap(), PEAK_RUN_GRAPH);
    assert!(!dir.join("graph.backup.json").exists());

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn missing_or_empty_inputs_abort_without_writing() {
    let dir = scratch_dir("abort");
    fs::write(dir.join("elevations.csv"), PEAK_RUN_ELEVATIONS).unwrap();

    let output = apply(&dir);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("graph not found"), "unexpected stderr: {stderr}");
    assert!(!dir.join("graph.json").exists());

    fs::write(dir.join("graph.json"), PEAK_RUN_GRAPH).unwrap();
    fs::write(dir.join("elevations.csv"), "id,name,lat,lon,elev_m\n").unwrap();
    let output = apply(&dir);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("elevations CSV is empty"), "unexpected stderr: {stderr}");
    assert!(!dir.join("graph.backup.json").exists());
    assert_eq!(fs::read_to_string(dir.join("graph.json")).unwrap(), PEAK_RUN_GRAPH);

    fs::remove_file(dir.join("elevations.csv")).unwrap();
    let output = apply(&dir);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("elevations CSV not found"), "unexpected stderr: {stderr}");

    let _ = fs::remove_dir_all(&dir);
}
