//! Node Data Structures
//!
//! This module defines the text fragments that make up a dagtext document.
//!
//! # Architecture
//!
//! - **Fixed record**: every node carries exactly an id, a title, and its text
//! - **Graph-owned identity**: nodes are only created through
//!   [`DocumentGraph::add_node`](crate::services::DocumentGraph::add_node), which
//!   allocates the id and registers the node in one step
//! - **Views, not references**: readers get [`NodeView`] copies so a later
//!   mutation of the graph never changes a value that was already handed out
//!
//! # Examples
//!
//! ```rust
//! use dagtext_core::services::DocumentGraph;
//!
//! let mut graph = DocumentGraph::new();
//! let id = graph.add_node("I'm the first node!", Some("Node 0".to_string()));
//!
//! let view = graph.get_node(id).unwrap();
//! assert_eq!(view.title, "Node 0");
//! assert_eq!(view.text, "I'm the first node!");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique, monotonically assigned node identifier.
///
/// Ids are issued by the graph's [`IdentityAllocator`](crate::services::IdentityAllocator)
/// and are never reused, even after the node they named has been removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(u64);

impl NodeId {
    /// Wrap a raw identifier value
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw identifier value
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for NodeId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

/// Placeholder title for nodes created without one: `<Node N>`.
pub fn default_title(id: NodeId) -> String {
    format!("<Node {}>", id)
}

/// A text fragment stored in a document graph.
///
/// # Fields
///
/// - `id`: Immutable identity assigned at creation
/// - `title`: Short label shown on the node's handle in an editor canvas
/// - `text`: The node's content
///
/// Nodes cannot be built or deserialized outside the graph; saved documents
/// carry [`NodeView`] records instead.
///
/// ```compile_fail
/// let node: dagtext_core::models::Node =
///     serde_json::from_str(r#"{"id": 0, "title": "t", "text": "x"}"#).unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    id: NodeId,

    /// Display title
    pub title: String,

    /// Content text
    pub text: String,
}

impl Node {
    /// Build a node record for an id the graph has just allocated.
    pub(crate) fn new(id: NodeId, title: String, text: String) -> Self {
        Self { id, title, text }
    }

    /// The node's identity
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Snapshot of this node's current attributes
    pub fn view(&self) -> NodeView {
        NodeView {
            id: self.id,
            title: self.title.clone(),
            text: self.text.clone(),
        }
    }

    /// Apply a partial update, returning true if any field actually changed
    pub(crate) fn apply(&mut self, update: NodeUpdate) -> bool {
        let mut changed = false;

        if let Some(title) = update.title {
            if title != self.title {
                self.title = title;
                changed = true;
            }
        }

        if let Some(text) = update.text {
            if text != self.text {
                self.text = text;
                changed = true;
            }
        }

        changed
    }
}

/// Owned copy of a node's attributes, as returned by graph accessors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeView {
    pub id: NodeId,
    pub title: String,
    pub text: String,
}

impl fmt::Display for NodeView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Partial update for a node's mutable attributes.
///
/// Fields left as `None` are untouched.
///
/// ```rust
/// use dagtext_core::models::NodeUpdate;
///
/// let update = NodeUpdate::new().with_title("Chapter 1");
/// assert!(update.text.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl NodeUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl ToString) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn with_text(mut self, text: impl ToString) -> Self {
        self.text = Some(text.to_string());
        self
    }

    /// Whether this update would touch no field at all
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.text.is_none()
    }
}
