use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use trailgraph::stats::GraphStats;
use trailgraph::{ApplyOptions, ApplyOutcome, Config, pipeline, store, validator};
use tracing_subscriber::{EnvFilter, fmt};

const VALIDATION_FAILED: u8 = 2;

/// Trail network maintenance for lift and run graphs
#[derive(Parser)]
#[command(name = "trailgraph", version)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Rename junction endpoints to "<name> Top" / "<name> Bottom" from elevations
    Apply(ApplyArgs),
    /// Check the graph document for structural problems
    Validate(GraphArgs),
    /// Print degree statistics for the graph
    Stats(StatsArgs),
}

#[derive(Args)]
struct GraphArgs {
    /// Graph document path
    #[arg(long)]
    graph: Option<PathBuf>,
}

#[derive(Args)]
struct ApplyArgs {
    /// Elevation CSV path (defaults to $ELEVATIONS_CSV, then elevations.csv)
    #[arg(long)]
    elevations: Option<PathBuf>,
    /// Graph document path
    #[arg(long)]
    graph: Option<PathBuf>,
    /// Backup path (defaults to <graph stem>.backup.json next to the graph)
    #[arg(long)]
    backup: Option<PathBuf>,
    /// Label without writing the backup or the graph
    #[arg(long)]
    dry_run: bool,
    /// Print the outcome as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct StatsArgs {
    #[command(flatten)]
    graph: GraphArgs,
    /// How many of the busiest nodes to list
    #[arg(long, default_value_t = 10)]
    top: usize,
    /// Print the statistics as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli.command) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<ExitCode, Box<dyn std::error::Error>> {
    match command {
        Command::Apply(args) => {
            let config = apply_config(&args);
            let outcome = pipeline::apply(
                &config,
                ApplyOptions {
                    dry_run: args.dry_run,
                },
            )?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                print_outcome(&config, &outcome);
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Validate(args) => {
            let path = graph_path(&args);
            let document = store::read_document(&path)?;
            let errors = validator::validate(&document);
            println!("error count {}", errors.len());
            for error in &errors {
                println!("{error}");
            }
            if errors.is_empty() {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::from(VALIDATION_FAILED))
            }
        }
        Command::Stats(args) => {
            let graph = store::load(&graph_path(&args.graph))?;
            let stats = GraphStats::compute(&graph, args.top);
            if args.json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                print_stats(&stats);
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn apply_config(args: &ApplyArgs) -> Config {
    let mut config = Config::from_env();
    if let Some(path) = &args.elevations {
        config = config.with_elevations_path(path);
    }
    if let Some(path) = &args.graph {
        config = config.with_graph_path(path);
    }
    if let Some(path) = &args.backup {
        config = config.with_backup_path(path);
    }
    config
}

fn graph_path(args: &GraphArgs) -> PathBuf {
    args.graph
        .clone()
        .unwrap_or_else(|| Config::from_env().graph_path)
}

fn print_outcome(config: &Config, outcome: &ApplyOutcome) {
    println!(
        "Loaded {} elevation rows from {}",
        outcome.rows_loaded,
        config.elevations_path.display()
    );
    println!("Renamed nodes: {}", outcome.renamed);
    if outcome.backup_written {
        println!("Backup written: {}", config.backup_path.display());
    }
    if !outcome.saved {
        println!("Dry run: {} not modified", config.graph_path.display());
    }
    println!(
        "Graph stats: sources {}, sinks {}",
        outcome.stats.sources, outcome.stats.sinks
    );
}

fn print_stats(stats: &GraphStats) {
    println!("nodes: {}", stats.nodes);
    println!("edges: {}", stats.edges);
    println!("edges referencing missing node ids: {}", stats.dangling_references);
    if !stats.missing_ids.is_empty() {
        println!("missing node ids referenced: {}", stats.missing_ids.join(", "));
    }
    println!("isolated nodes (degree 0): {}", list_or_none(&stats.isolated));
    println!(
        "nodes with only incoming edges: {}",
        list_or_none(&stats.only_incoming)
    );
    println!(
        "nodes with only outgoing edges: {}",
        list_or_none(&stats.only_outgoing)
    );
    println!("sources (no outgoing edges): {}", stats.sources);
    println!("sinks (no incoming edges): {}", stats.sinks);
    if !stats.busiest.is_empty() {
        println!("busiest nodes:");
        for node in &stats.busiest {
            println!(
                "  {}: deg={} (in={} out={})",
                node.id,
                node.incoming + node.outgoing,
                node.incoming,
                node.outgoing
            );
        }
    }
}

fn list_or_none(ids: &[String]) -> String {
    if ids.is_empty() {
        "(none)".to_string()
    } else {
        ids.join(", ")
    }
}
