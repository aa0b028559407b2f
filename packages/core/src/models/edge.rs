//! Edge Data Structures
//!
//! Edges are directed `(head, tail)` pairs meaning "head's content precedes
//! tail's content in at least one reading order". They carry no identity of
//! their own; the pair is the key, so a graph holds at most one edge per
//! direction between two nodes.

use super::NodeId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Typed attribute map carried by an edge
pub type EdgeAttributes = BTreeMap<String, serde_json::Value>;

/// Keys reserved for the endpoints themselves
const RESERVED_KEYS: [&str; 2] = ["head", "tail"];

/// Rejected edge attribute key
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AttributeKeyError {
    #[error("Edge attribute key cannot be empty")]
    Empty,

    #[error("Edge attribute key '{0}' is reserved")]
    Reserved(String),
}

/// Validate an attribute key before it is stored on an edge
pub fn validate_attribute_key(key: &str) -> Result<(), AttributeKeyError> {
    if key.trim().is_empty() {
        return Err(AttributeKeyError::Empty);
    }
    if RESERVED_KEYS.contains(&key) {
        return Err(AttributeKeyError::Reserved(key.to_string()));
    }
    Ok(())
}

/// Owned copy of an edge, as returned by graph accessors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeView {
    pub head: NodeId,
    pub tail: NodeId,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attribs: EdgeAttributes,
}

impl EdgeView {
    /// The `(head, tail)` key of this edge
    pub fn key(&self) -> (NodeId, NodeId) {
        (self.head, self.tail)
    }
}
