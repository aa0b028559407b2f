//! Document snapshots
//!
//! A [`DocumentSnapshot`] is the plain-data form of a document graph: node
//! records, edge records, and the allocator position. It is what crosses
//! the persistence boundary; the encoding (YAML or JSON) is chosen by the
//! caller.
//!
//! ```yaml
//! nodes:
//! - id: 0
//!   title: Node 0
//!   text: I'm the first node!
//! edges: []
//! next_id: 1
//! ```

use crate::config::EngineConfig;
use crate::db::{FileFormat, StoreError};
use crate::models::{EdgeView, NodeView};
use crate::services::{DocumentGraph, Result};
use serde::{Deserialize, Serialize};

/// Plain-data form of a document graph
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentSnapshot {
    /// Node records, ordered by id
    #[serde(default)]
    pub nodes: Vec<NodeView>,

    /// Edge records, ordered by `(head, tail)`
    #[serde(default)]
    pub edges: Vec<EdgeView>,

    /// Allocator position at export time. Keeps ids of nodes removed before
    /// the save from being reissued after a reload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_id: Option<u64>,
}

impl DocumentSnapshot {
    /// Encode in the given format
    pub fn encode(&self, format: FileFormat) -> std::result::Result<String, StoreError> {
        Ok(match format {
            FileFormat::Yaml => serde_yaml::to_string(self)?,
            FileFormat::Json => serde_json::to_string_pretty(self)?,
        })
    }

    /// Decode from the given format
    pub fn decode(raw: &str, format: FileFormat) -> std::result::Result<Self, StoreError> {
        Ok(match format {
            FileFormat::Yaml => serde_yaml::from_str(raw)?,
            FileFormat::Json => serde_json::from_str(raw)?,
        })
    }
}

impl DocumentGraph {
    /// Export the current state as a detached snapshot
    pub fn export(&self) -> DocumentSnapshot {
        DocumentSnapshot {
            nodes: self.node_views(),
            edges: self.edge_views(),
            next_id: Some(self.allocator().peek().value()),
        }
    }

    /// Build a graph from a snapshot with the default config
    pub fn import(snapshot: DocumentSnapshot) -> Result<Self> {
        Self::import_with_config(snapshot, EngineConfig::default())
    }

    /// Build a graph from a snapshot.
    ///
    /// Node ids are kept as saved and the allocator is advanced past the
    /// largest one (and past `next_id`, when present). No events are
    /// published: the new graph has no subscribers yet.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` for duplicate node ids, duplicate edges, reserved
    ///   attribute keys, self-loops the config disallows, or a node id or
    ///   `next_id` too large to leave room for new nodes
    /// - `InvalidReference` for edges naming a node the snapshot lacks
    pub fn import_with_config(snapshot: DocumentSnapshot, config: EngineConfig) -> Result<Self> {
        let mut graph = Self::with_config(config);
        let (node_count, edge_count) = (snapshot.nodes.len(), snapshot.edges.len());

        for node in snapshot.nodes {
            graph.insert_imported_node(node)?;
        }
        for edge in snapshot.edges {
            graph.insert_imported_edge(edge)?;
        }
        if let Some(next_id) = snapshot.next_id {
            graph.allocator_mut().advance_to(next_id)?;
        }

        tracing::info!(
            "Imported document with {} nodes and {} edges",
            node_count,
            edge_count
        );
        Ok(graph)
    }
}
