//! File-backed document store
//!
//! Saves and loads a [`DocumentGraph`] at a fixed path. The encoding follows
//! the path's extension: `.yaml`/`.yml` for YAML, `.json` for JSON.

use crate::config::EngineConfig;
use crate::db::{DocumentSnapshot, FileFormat, StoreError};
use crate::services::DocumentGraph;
use std::path::{Path, PathBuf};

/// A document file on disk
#[derive(Debug, Clone)]
pub struct DocumentStore {
    path: PathBuf,
    format: FileFormat,
}

impl DocumentStore {
    /// Create a store for `path`.
    ///
    /// # Errors
    ///
    /// `UnsupportedFormat` if the extension names no known encoding.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let format =
            FileFormat::from_path(&path).ok_or_else(|| StoreError::unsupported_format(path.clone()))?;
        Ok(Self { path, format })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> FileFormat {
        self.format
    }

    /// Write the graph's current state, creating parent directories as needed
    pub fn save(&self, graph: &DocumentGraph) -> Result<(), StoreError> {
        let encoded = graph.export().encode(self.format)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::io(parent.to_path_buf(), e))?;
        }
        std::fs::write(&self.path, encoded).map_err(|e| StoreError::io(self.path.clone(), e))?;

        tracing::info!(
            "Saved document ({} nodes, {} edges) to {}",
            graph.node_count(),
            graph.edge_count(),
            self.path.display()
        );
        Ok(())
    }

    /// Read the file and build a graph with the default config
    pub fn load(&self) -> Result<DocumentGraph, StoreError> {
        self.load_with_config(EngineConfig::default())
    }

    /// Read the file and build a graph that applies `config`
    pub fn load_with_config(&self, config: EngineConfig) -> Result<DocumentGraph, StoreError> {
        let raw = std::fs::read_to_string(&self.path)
            .map_err(|e| StoreError::io(self.path.clone(), e))?;
        let snapshot = DocumentSnapshot::decode(&raw, self.format)?;
        let graph = DocumentGraph::import_with_config(snapshot, config)?;

        tracing::info!("Loaded document from {}", self.path.display());
        Ok(graph)
    }
}
