//! textgraph CLI
//!
//! Builds labeled property graphs from text, CSV, or JSON files and
//! persists them with idempotent upserts.

mod records;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use textgraph_core::{
    style, CoercionWarning, Graph, GraphBuilder, PropertyValue, StyleCatalog, TableMapping,
};
use textgraph_db::{init_memory, init_persistent, GraphUpserter, UpsertReport};
use textgraph_nlp::{clean_text, extract, resolve_spans, NlpClient};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use uuid::Uuid;

/// textgraph - turn documents and tables into a knowledge graph
#[derive(Parser)]
#[command(name = "textgraph")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Database path (defaults to ~/.textgraph/data)
    #[arg(short, long)]
    db_path: Option<PathBuf>,

    /// Use in-memory database (for testing)
    #[arg(long)]
    memory: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a graph from a file (.txt, .csv, or .json) and persist it
    Ingest {
        /// Path to the input file
        path: PathBuf,

        /// Column mapping file (JSON); required for tabular input
        #[arg(short, long)]
        mapping: Option<PathBuf>,

        /// Clear the persisted graph before ingesting
        #[arg(long)]
        clear: bool,
    },

    /// Show persisted graph statistics
    Stats,

    /// Export nodes, edges, and styles as JSON for rendering
    Export {
        /// Output file (stdout if not provided)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Delete the local database (fresh start)
    ResetDb {
        /// Database path (defaults to ~/.textgraph/data)
        #[arg(short, long)]
        db_path: Option<PathBuf>,
    },
}

fn default_db_path() -> PathBuf {
    let mut path = dirs::home_dir().expect("Could not find home directory");
    path.push(".textgraph");
    path.push("data");
    path
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env if present.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    if let Commands::ResetDb { db_path } = &cli.command {
        let path = db_path.clone().unwrap_or_else(default_db_path);

        if path.exists() {
            std::fs::remove_dir_all(&path)
                .with_context(|| format!("Failed to remove db at {}", path.display()))?;
            println!("✓ Removed database at {}", path.display());
        } else {
            println!("Database not found at {}, nothing to remove", path.display());
        }
        return Ok(());
    }

    // Initialize database
    let db = if cli.memory {
        info!("Using in-memory database");
        init_memory().await?
    } else {
        let db_path = cli.db_path.unwrap_or_else(default_db_path);

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        info!("Using database at: {}", db_path.display());
        init_persistent(&db_path).await?
    };

    let upserter = GraphUpserter::new(db);

    match cli.command {
        Commands::Ingest {
            path,
            mapping,
            clear,
        } => {
            cmd_ingest(upserter, path, mapping, clear).await?;
        }
        Commands::Stats => {
            cmd_stats(upserter).await?;
        }
        Commands::Export { out } => {
            cmd_export(upserter, out).await?;
        }
        Commands::ResetDb { .. } => {
            // Handled before database init.
        }
    }

    Ok(())
}

async fn cmd_ingest(
    upserter: GraphUpserter,
    path: PathBuf,
    mapping: Option<PathBuf>,
    clear: bool,
) -> Result<()> {
    let session = Uuid::new_v4();
    info!("Ingest session {} for {}", session, path.display());

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    let (graph, warnings) = match extension.as_str() {
        "txt" => ingest_text(&path).await?,
        "csv" | "json" => {
            let mapping_path = mapping.ok_or_else(|| {
                anyhow::anyhow!(
                    "Tabular input needs a column mapping; pass one with --mapping <file>"
                )
            })?;
            let mapping = records::load_mapping(&mapping_path)?;
            ingest_tabular(&path, &extension, &mapping)?
        }
        other => anyhow::bail!("Unsupported file type: .{} (expected .txt, .csv, or .json)", other),
    };

    if graph.is_empty() {
        println!("No entities found in {}", path.display());
        return Ok(());
    }

    if clear {
        upserter.clear().await?;
        info!("Cleared persisted graph");
    }

    let report = upserter.apply(&graph).await;

    print_summary(&path, &graph, &report, &warnings);

    Ok(())
}

/// Text mode: parse via the NLP worker, resolve entities, extract relations.
async fn ingest_text(path: &Path) -> Result<(Graph, Vec<CoercionWarning>)> {
    let nlp = NlpClient::default_local();
    let nlp_ok = nlp.health().await.unwrap_or(false);
    if !nlp_ok {
        eprintln!("Error: NLP worker is not reachable.");
        eprintln!("  Worker: {}", nlp.base_url());
        eprintln!("Start it, or point TEXTGRAPH_NLP_URL at a running instance.");
        anyhow::bail!("NLP worker unavailable");
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    let content = clean_text(&content);

    let sentences = nlp.parse(content).await?;
    info!("Parsed {} sentences", sentences.len());

    let mut builder = GraphBuilder::new();
    let mut candidates = 0usize;

    for sentence in &sentences {
        let entities = resolve_spans(&sentence.entities);
        for candidate in extract(sentence, &entities) {
            builder.add_candidate(&candidate);
            candidates += 1;
        }
    }

    info!("Extracted {} relation candidates", candidates);

    Ok(builder.finish())
}

/// Structured mode: records plus a declared mapping. A mapping that does
/// not fit the records aborts the whole file.
fn ingest_tabular(
    path: &Path,
    extension: &str,
    mapping: &TableMapping,
) -> Result<(Graph, Vec<CoercionWarning>)> {
    let records = match extension {
        "csv" => records::read_csv(path)?,
        _ => records::read_json(path)?,
    };

    info!("Read {} records from {}", records.len(), path.display());

    let mut builder = GraphBuilder::new();
    for record in &records {
        builder
            .add_record(record, mapping)
            .with_context(|| format!("Cannot interpret {} with this mapping", path.display()))?;
    }

    Ok(builder.finish())
}

fn print_summary(
    path: &Path,
    graph: &Graph,
    report: &UpsertReport,
    warnings: &[CoercionWarning],
) {
    println!(
        "✓ Ingested {}: {} nodes, {} edges",
        path.display(),
        graph.node_count(),
        graph.edge_count()
    );
    println!(
        "  • Persisted: {} nodes, {} edges",
        report.nodes_written, report.edges_written
    );

    if !warnings.is_empty() {
        println!("  • Coercion warnings: {}", warnings.len());
        for warning in warnings {
            println!("    - {}", warning);
        }
    }

    if !report.failures.is_empty() {
        println!("  • Failed records: {}", report.failures.len());
        for failure in &report.failures {
            println!("    - {}: {}", failure.id, failure.detail);
        }
    }
}

async fn cmd_stats(upserter: GraphUpserter) -> Result<()> {
    let stats = upserter.stats().await?;

    println!("Graph statistics:");
    println!("  • Nodes: {}", stats.node_count);
    println!("  • Edges: {}", stats.edge_count);

    if !stats.node_kinds.is_empty() {
        println!("  • Node kinds:");
        for kind in &stats.node_kinds {
            println!("    - {}: {}", kind.kind, kind.count);
        }
    }

    if !stats.edge_kinds.is_empty() {
        println!("  • Edge kinds:");
        for kind in &stats.edge_kinds {
            println!("    - {}: {}", kind.kind, kind.count);
        }
    }

    Ok(())
}

#[derive(Serialize)]
struct RenderNode {
    key: String,
    name: String,
    kind: String,
    properties: BTreeMap<String, PropertyValue>,
    style: textgraph_core::NodeStyle,
}

#[derive(Serialize)]
struct RenderEdge {
    src: String,
    dst: String,
    kind: String,
    properties: BTreeMap<String, PropertyValue>,
    color: String,
    width: u32,
}

#[derive(Serialize)]
struct RenderGraph {
    nodes: Vec<RenderNode>,
    edges: Vec<RenderEdge>,
}

/// Export the persisted graph with a deterministic visual encoding.
async fn cmd_export(upserter: GraphUpserter, out: Option<PathBuf>) -> Result<()> {
    let (nodes, edges) = upserter.export().await?;
    let mut catalog = StyleCatalog::new();

    let nodes: Vec<RenderNode> = nodes
        .into_iter()
        .map(|n| {
            let style = catalog.node_style(&n.kind);
            RenderNode {
                key: n.key,
                name: n.name,
                kind: n.kind,
                properties: n.properties,
                style,
            }
        })
        .collect();

    let edges: Vec<RenderEdge> = edges
        .into_iter()
        .map(|e| {
            let edge_style = catalog.edge_style(&e.kind);
            let confidence = e
                .properties
                .get("confidence")
                .map(|v| v.to_text())
                .unwrap_or_default();
            RenderEdge {
                src: e.src,
                dst: e.dst,
                kind: e.kind,
                properties: e.properties,
                color: edge_style.color,
                width: style::width_for_confidence(&confidence),
            }
        })
        .collect();

    let render = RenderGraph { nodes, edges };
    let json = serde_json::to_string_pretty(&render)?;

    match out {
        Some(path) => {
            std::fs::write(&path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!(
                "✓ Exported {} nodes and {} edges to {}",
                render.nodes.len(),
                render.edges.len(),
                path.display()
            );
        }
        None => println!("{}", json),
    }

    Ok(())
}
