use anyhow::{Context, Result, bail};
use argmap_core::{EdgeId, NodeId};
use argmap_graph::{GraphSnapshot, distribute_attachment_points, edge_path, parallel_edge_offset};
use argmap_interaction::{GraphDocument, InteractionSettings};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod replay;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Interaction settings JSON; missing keys take defaults
    #[arg(short, long, global = true)]
    settings: Option<PathBuf>,

    /// Log drag decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a scripted multi-editor session and print the events and final graph
    Replay { scenario: PathBuf },
    /// Spread attachment points for the edges meeting at one node
    Attachments {
        graph: PathBuf,
        #[arg(short, long)]
        node: String,
    },
    /// Offset of one edge among edges sharing its endpoints
    Parallel {
        graph: PathBuf,
        #[arg(short, long)]
        edge: String,
    },
    /// Drawn path of every edge
    Paths { graph: PathBuf },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_graph(path: &Path) -> Result<GraphSnapshot> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("reading graph {}", path.display()))?;
    let document: GraphDocument = serde_json::from_str(&data)
        .with_context(|| format!("parsing graph {}", path.display()))?;
    Ok(GraphSnapshot::new(document.nodes, document.edges))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let settings = args
        .settings
        .as_ref()
        .map(InteractionSettings::load)
        .transpose()
        .context("loading settings")?;
    let geometry = settings.clone().unwrap_or_default().geometry;

    match args.command {
        Command::Replay { scenario } => {
            let scenario = replay::Scenario::load(&scenario)?;
            let report = replay::replay(&scenario, settings)?;
            print_json(&report)?;
        }
        Command::Attachments { graph, node } => {
            let snapshot = load_graph(&graph)?;
            let id = NodeId::new(node);
            let Some(hub) = snapshot.node(&id) else {
                bail!("node {id} not found");
            };
            let slots = distribute_attachment_points(&snapshot, hub, &geometry).unwrap_or_default();
            print_json(&slots)?;
        }
        Command::Parallel { graph, edge } => {
            let snapshot = load_graph(&graph)?;
            let id = EdgeId::new(edge);
            let offset = parallel_edge_offset(
                &id,
                snapshot.edges(),
                geometry.parallel_edge_spacing,
                geometry.treat_reverse_as_parallel,
            )
            .with_context(|| format!("edge {id} not found"))?;
            print_json(&offset)?;
        }
        Command::Paths { graph } => {
            let snapshot = load_graph(&graph)?;
            let paths: Vec<_> = snapshot
                .edges()
                .iter()
                .filter_map(|e| {
                    let path = edge_path(&snapshot, &e.id, &geometry)?;
                    Some((e.id.clone(), path))
                })
                .collect();
            print_json(&paths)?;
        }
    }

    Ok(())
}
