//! Document Inspector
//!
//! Loads a saved dagtext document and reports what the engine sees in it:
//! node and edge counts, whether the graph is a DAG, every reading flow from
//! a root to a leaf, and layout position hints.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin dagtext-inspect -- path/to/document.yaml
//!
//! # JSON report instead of text
//! cargo run --bin dagtext-inspect -- path/to/document.yaml --json
//! ```
//!
//! # Environment
//!
//! - `DAGTEXT_LAYOUT` - layout method, defaults to `spring`
//! - `DAGTEXT_CANVAS` - canvas size as `WIDTHxHEIGHT`, defaults to `800x600`
//! - `DAGTEXT_CONFIG` - optional engine config file (`.yaml`/`.json`)
//! - `RUST_LOG` - log filter, defaults to `info`

use anyhow::{bail, Context};
use dagtext_core::{DocumentGraph, DocumentStore, EngineConfig, LayoutMethod};
use serde_json::json;

const DEFAULT_CANVAS: (f64, f64) = (800.0, 600.0);

fn parse_canvas(raw: &str) -> anyhow::Result<(f64, f64)> {
    let (width, height) = raw
        .split_once(['x', 'X'])
        .with_context(|| format!("canvas size must look like 800x600, got '{}'", raw))?;
    Ok((
        width.trim().parse::<f64>()?,
        height.trim().parse::<f64>()?,
    ))
}

/// Every reading from a root to a leaf. An isolated node is both, and reads
/// as its own text.
fn reading_flows(graph: &DocumentGraph) -> anyhow::Result<Vec<String>> {
    let query = graph.query();
    let leaves = graph.leaves();
    let mut flows = Vec::new();

    for root in graph.roots() {
        for &leaf in &leaves {
            if root == leaf {
                flows.push(graph.get_node(root)?.text);
            } else {
                flows.extend(query.flow_strings(root, leaf, "")?);
            }
        }
    }
    Ok(flows)
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        bail!("usage: dagtext-inspect <document.yaml|document.json> [--json]");
    };
    let as_json = args.any(|arg| arg == "--json");

    let config = match std::env::var("DAGTEXT_CONFIG") {
        Ok(config_path) => EngineConfig::load(&config_path)
            .with_context(|| format!("failed to load config {}", config_path))?,
        Err(_) => EngineConfig::default(),
    };

    let method: LayoutMethod = std::env::var("DAGTEXT_LAYOUT")
        .unwrap_or_else(|_| "spring".to_string())
        .parse()?;

    let (width, height) = match std::env::var("DAGTEXT_CANVAS") {
        Ok(raw) => parse_canvas(&raw)?,
        Err(_) => DEFAULT_CANVAS,
    };

    let store = DocumentStore::new(&path)?;
    let graph = store
        .load_with_config(config)
        .with_context(|| format!("failed to load document {}", path))?;
    let is_dag = graph.query().is_dag();

    let flows = if is_dag {
        reading_flows(&graph)?
    } else {
        tracing::warn!("Document contains a cycle; skipping flow enumeration");
        Vec::new()
    };

    let positions = graph.layout().compute_positions(width, height, method)?;

    if as_json {
        let report = json!({
            "nodes": graph.node_count(),
            "edges": graph.edge_count(),
            "isDag": is_dag,
            "flows": flows,
            "layout": method.as_str(),
            "positions": positions
                .iter()
                .map(|(id, p)| (id.to_string(), json!({"x": p.x, "y": p.y})))
                .collect::<serde_json::Map<_, _>>(),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("📄 {}", store.path().display());
    println!("   Nodes: {}", graph.node_count());
    println!("   Edges: {}", graph.edge_count());
    println!("   DAG:   {}", if is_dag { "yes" } else { "no" });

    if is_dag {
        println!("\n📖 Reading flows ({}):", flows.len());
        for (i, flow) in flows.iter().enumerate() {
            println!("   {}. {}", i + 1, flow);
        }
    }

    println!("\n📐 Layout ({}, {}x{}):", method, width, height);
    for (id, position) in &positions {
        let title = graph.get_node(*id)?.title;
        println!(
            "   {:>4} {:<24} ({:.1}, {:.1})",
            id.value(),
            title,
            position.x,
            position.y
        );
    }

    Ok(())
}
