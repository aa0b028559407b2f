//! Graph Rewrite Operations
//!
//! Compound rewrites built on top of the [`DocumentGraph`](crate::services::DocumentGraph)
//! mutation primitives:
//!
//! - [`split_node`](crate::services::DocumentGraph::split_node) - Cut one node's
//!   text in two and rewire its neighbourhood per a [`SplitPolicy`]
//! - [`join_nodes`](crate::services::DocumentGraph::join_nodes) - Merge two
//!   nodes into one
//!
//! Both validate before mutating, publish the primitive events they cause,
//! and finish with a single `NodeSplit` / `NodeJoined` event.

pub mod join;
pub mod split;

pub use split::SplitPolicy;
