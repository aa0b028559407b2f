//! Engine configuration
//!
//! `EngineConfig` collects the policy choices a document graph applies:
//! whether self-loops are accepted, the default split wiring, the separators
//! used when joining nodes, and layout tuning. Every field has a default, so
//! a partial file (or none at all) is valid.

use crate::db::FileFormat;
use crate::operations::SplitPolicy;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Upper bound on spring layout iterations
const MAX_LAYOUT_ITERATIONS: usize = 10_000;

/// Errors loading an [`EngineConfig`] from disk
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Tuning for the layout service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Iterations of the force-directed ("spring") layout
    pub iterations: usize,

    /// Multiplicative temperature decay per spring iteration
    pub cooling: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            iterations: 50,
            cooling: 0.95,
        }
    }
}

/// Policy and tuning for a document graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Accept `add_edge(n, n)`. Off by default: a self-loop has no reading order.
    pub allow_self_loops: bool,

    /// Wiring used by `split_node_with_defaults`
    pub default_split_policy: SplitPolicy,

    /// Inserted between titles by `join_nodes_with_defaults`
    pub title_separator: String,

    /// Inserted between texts by `join_nodes_with_defaults`
    pub text_separator: String,

    pub layout: LayoutConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            allow_self_loops: false,
            default_split_policy: SplitPolicy::default(),
            title_separator: " ".to_string(),
            text_separator: String::new(),
            layout: LayoutConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load and validate a config file; the format follows the extension
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = FileFormat::from_path(path)
            .ok_or_else(|| ConfigError::UnsupportedFormat(path.display().to_string()))?;

        let raw = std::fs::read_to_string(path)?;
        let config: EngineConfig = match format {
            FileFormat::Json => serde_json::from_str(&raw)?,
            FileFormat::Yaml => serde_yaml::from_str(&raw)?,
        };

        config.validate().map_err(ConfigError::Invalid)?;
        tracing::info!("Loaded engine config from {}", path.display());
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.layout.iterations == 0 {
            return Err("layout.iterations must be greater than 0".to_string());
        }

        if self.layout.iterations > MAX_LAYOUT_ITERATIONS {
            return Err(format!(
                "layout.iterations cannot exceed {}",
                MAX_LAYOUT_ITERATIONS
            ));
        }

        if !(self.layout.cooling > 0.0 && self.layout.cooling <= 1.0) {
            return Err("layout.cooling must be in (0, 1]".to_string());
        }

        Ok(())
    }
}
