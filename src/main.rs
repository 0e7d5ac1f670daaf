//! nodeport - Port Engine Inspection Tool
//!
//! Loads a JSON graph document and prints what the engine computes for it:
//! port geometry per node, or everything a given port could connect to.

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use nodeport_rs::{
    config::EngineConfig,
    connect::{connectable_node_types, connectable_port_ids, DerivedPorts, GraphDocument},
    ports::{compute_node_port_positions_for, derive_ports, find_port, NodeTypeRegistry},
    types::PortKey,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Layout config file (defaults to the platform config directory)
    #[clap(long)]
    config: Option<PathBuf>,

    /// Command to execute
    #[clap(subcommand)]
    cmd: Command,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Print the geometry of every port in a graph
    Geometry {
        /// Graph document (JSON)
        graph: PathBuf,
    },
    /// List the ports and node types a port can connect to
    Connectable {
        /// Graph document (JSON)
        graph: PathBuf,
        /// Source port as `node:port`
        port: String,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,nodeport_rs=debug")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => EngineConfig::load_or_default(),
    };

    match args.cmd {
        Command::Geometry { graph } => print_geometry(&graph, &config),
        Command::Connectable { graph, port } => print_connectable(&graph, &port),
    }
}

fn load_document(path: &Path) -> Result<GraphDocument> {
    let document = GraphDocument::load(path)?;
    tracing::info!(
        "Loaded {} node types, {} nodes, {} connections from {}",
        document.node_types.len(),
        document.nodes.len(),
        document.connections.len(),
        path.display()
    );
    Ok(document)
}

fn print_geometry(path: &Path, config: &EngineConfig) -> Result<()> {
    let (catalog, graph) = load_document(path)?.into_parts();

    for node_id in graph.sorted_node_ids() {
        let Some(node) = graph.node(node_id) else {
            continue;
        };
        let node_type = catalog.node_type(&node.node_type);
        let ports = derive_ports(node, node_type.as_deref());
        let geometry = compute_node_port_positions_for(node, node_type.as_deref(), &ports, &config.layout);

        println!("{} ({})", node.id, node.node_type);
        for port in &ports {
            let Some(g) = geometry.get(&port.id) else {
                continue;
            };
            println!(
                "  {:<16} {:<6} anchor=({:.1}, {:.1}) {:?}  center=({:.1}, {:.1})",
                port.id,
                port.direction,
                g.render_position.x,
                g.render_position.y,
                g.render_position.centering,
                g.connection_point.x,
                g.connection_point.y,
            );
        }
    }
    Ok(())
}

fn print_connectable(path: &Path, port: &str) -> Result<()> {
    let key = PortKey::parse(port).ok_or_else(|| anyhow!("Expected `node:port`, got '{}'", port))?;
    let (catalog, graph) = load_document(path)?.into_parts();

    let node = graph
        .node(&key.node_id)
        .ok_or_else(|| anyhow!("No node '{}' in {}", key.node_id, path.display()))?;
    let node_type = catalog.node_type(&node.node_type);
    let ports = derive_ports(node, node_type.as_deref());
    let from = find_port(&ports, &key.port_id)
        .ok_or_else(|| anyhow!("Node '{}' has no port '{}'", key.node_id, key.port_id))?;

    let provider = DerivedPorts::new(&graph, &catalog);
    let mut targets: Vec<PortKey> = connectable_port_ids(from, &graph, &catalog, &provider)
        .into_iter()
        .collect();
    targets.sort();

    println!("Ports connectable from {}:", key);
    for target in &targets {
        println!("  {}", target);
    }

    println!("Node types connectable from {}:", key);
    for node_type in connectable_node_types(from, &graph, &catalog) {
        println!("  {}", node_type);
    }
    Ok(())
}
