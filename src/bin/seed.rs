use serde::Serialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use trailgraph::graph::{Edge, Graph, LIFT, Node, RUN};
use trailgraph::store;

const LIFT_NAMES: [&str; 8] = [
    "Peak Express",
    "Harmony",
    "Emerald",
    "Catskinner",
    "Jersey Cream",
    "Solar Coaster",
    "Crystal Ridge",
    "Glacier Express",
];
const RUN_NAMES: [&str; 10] = [
    "Peak to Creek",
    "Dave Murray",
    "Franz's",
    "Ego Bowl",
    "Seventh Heaven",
    "Blue Line",
    "Cruiser",
    "Upper Dave",
    "Lower Olympic",
    "Ridge Run",
];
const BASE_LAT: f64 = 50.06;
const BASE_LON: f64 = -122.95;

struct Lcg {
    state: u64,
}

impl Lcg {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }

    fn gen_range(&mut self, max: u32) -> u32 {
        if max == 0 { 0 } else { self.next_u32() % max }
    }
}

#[derive(Serialize)]
struct ElevationRow<'a> {
    id: &'a str,
    name: &'a str,
    lat: f64,
    lon: f64,
    elev_m: f64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let out_dir = PathBuf::from(env::var("SEED_OUT_DIR").unwrap_or_else(|_| ".".to_string()));
    let reset = env::var("SEED_RESET").ok().as_deref() == Some("true");
    let escaped = env::var("SEED_ESCAPED_NEWLINES").ok().as_deref() == Some("true");

    let num_lifts = env::var("SEED_LIFTS")
        .ok()
        .and_then(|value| value.parse::<u32>().ok())
        .unwrap_or(5);
    let runs_per_lift = env::var("SEED_RUNS_PER_LIFT")
        .ok()
        .and_then(|value| value.parse::<u32>().ok())
        .unwrap_or(3);
    let rng_seed = env::var("SEED_RANDOM")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(42);

    fs::create_dir_all(&out_dir)?;
    let graph_path = out_dir.join("graph.json");
    let csv_path = out_dir.join("elevations.csv");
    if reset {
        let _ = fs::remove_file(store::backup_path_for(&graph_path));
    }

    let mut rng = Lcg::new(rng_seed);
    let graph = seed_resort(num_lifts, runs_per_lift, &mut rng);
    store::save(&graph_path, &graph)?;
    write_elevations(&csv_path, &graph, escaped)?;

    println!(
        "Seeded lifts={}, runs={}, nodes={}, edges={} into {}",
        num_lifts,
        num_lifts * runs_per_lift,
        graph.nodes().len(),
        graph.edges().len(),
        out_dir.display()
    );
    Ok(())
}

/// One base area feeding `num_lifts` lifts; each lift top drains back down through runs that
/// pass a mid-mountain junction.
fn seed_resort(num_lifts: u32, runs_per_lift: u32, rng: &mut Lcg) -> Graph {
    let mut graph = Graph::default();
    graph.add_node(Node::new("village", "Village").at(BASE_LAT, BASE_LON, 650.0));

    for lift in 0..num_lifts {
        let bottom_id = format!("lift{lift}:bottom");
        let top_id = format!("lift{lift}:top");
        let bottom = place(lift, 0.0, 700.0 + f64::from(rng.gen_range(300)));
        let top = place(lift, 1.0, 1600.0 + f64::from(rng.gen_range(600)));
        graph.add_node(Node::new(&bottom_id, "junction").at(bottom.0, bottom.1, bottom.2));
        graph.add_node(Node::new(&top_id, "junction").at(top.0, top.1, top.2));

        let lift_name = LIFT_NAMES[lift as usize % LIFT_NAMES.len()];
        graph.add_edge(
            Edge::new(&format!("lift{lift}"), LIFT, &bottom_id, &top_id)
                .named(lift_name)
                .with_geometry(line(bottom, top)),
        );
        graph.add_edge(
            Edge::new(&format!("access{lift}"), "walk", "village", &bottom_id)
                .named("Village Walkway")
                .with_geometry(line((BASE_LAT, BASE_LON, 650.0), bottom)),
        );

        for run in 0..runs_per_lift {
            let mid_id = format!("lift{lift}:run{run}:mid");
            let fraction = 0.3 + f64::from(rng.gen_range(40)) / 100.0;
            let mid = (
                bottom.0 + (top.0 - bottom.0) * fraction,
                bottom.1 + (top.1 - bottom.1) * fraction + 0.002 * f64::from(run + 1),
                bottom.2 + (top.2 - bottom.2) * fraction,
            );
            graph.add_node(Node::new(&mid_id, "junction").at(mid.0, mid.1, mid.2));

            let run_name = RUN_NAMES[rng.gen_range(RUN_NAMES.len() as u32) as usize];
            graph.add_edge(
                Edge::new(&format!("run{lift}_{run}a"), RUN, &top_id, &mid_id)
                    .named(run_name)
                    .with_geometry(line(top, mid)),
            );
            graph.add_edge(
                Edge::new(&format!("run{lift}_{run}b"), RUN, &mid_id, &bottom_id)
                    .named(run_name)
                    .with_geometry(line(mid, bottom)),
            );
        }
    }
    graph
}

fn place(lift: u32, height: f64, elev_m: f64) -> (f64, f64, f64) {
    let spread = 0.01 * f64::from(lift);
    (
        BASE_LAT + 0.005 + 0.03 * height,
        BASE_LON + spread + 0.01 * height,
        elev_m,
    )
}

fn line(from: (f64, f64, f64), to: (f64, f64, f64)) -> Vec<Vec<f64>> {
    let midpoint = ((from.0 + to.0) / 2.0, (from.1 + to.1) / 2.0);
    vec![
        vec![from.1, from.0],
        vec![midpoint.1, midpoint.0],
        vec![to.1, to.0],
    ]
}

fn write_elevations(
    path: &Path,
    graph: &Graph,
    escaped: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for node in graph.nodes() {
        writer.serialize(ElevationRow {
            id: node.id(),
            name: node.name(),
            lat: node.lat().unwrap_or_default(),
            lon: node.lon().unwrap_or_default(),
            elev_m: node.elev_m().unwrap_or_default(),
        })?;
    }
    let text = String::from_utf8(writer.into_inner().map_err(|error| error.into_error())?)?;
    let text = if escaped {
        text.replace('\n', "\\n")
    } else {
        text
    };
    fs::write(path, text)?;
    Ok(())
}
