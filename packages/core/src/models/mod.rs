//! Data Models
//!
//! This module contains the core data structures of a dagtext document:
//!
//! - `Node` / `NodeView` - text fragments and their read-only snapshots
//! - `NodeUpdate` - partial attribute edits
//! - `EdgeView` / `EdgeAttributes` - directed flow relations between nodes

mod edge;
mod node;

pub use edge::{validate_attribute_key, AttributeKeyError, EdgeAttributes, EdgeView};
pub use node::{default_title, Node, NodeId, NodeUpdate, NodeView};
