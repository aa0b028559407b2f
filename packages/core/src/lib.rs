//! dagtext Core Document Graph Engine
//!
//! This crate provides the document model of the dagtext nonlinear text
//! editor: a directed graph of text fragments whose edges encode reading
//! order, together with the rewrites and queries an editor needs.
//!
//! # Architecture
//!
//! - **Explicit documents**: each `DocumentGraph` owns its nodes, edges, id
//!   allocator and notification bus; independent documents share nothing
//! - **Synchronous notifications**: every structural change is published
//!   in-line to subscribed observers, which never co-own graph state
//! - **Validation before mutation**: a failed call leaves the graph untouched
//! - **Acyclicity is checked, not enforced**: ask `GraphQuery::is_dag` before
//!   relying on flow traversal
//!
//! # Modules
//!
//! - [`models`] - Node and edge records (`NodeId`, `NodeView`, `EdgeView`)
//! - [`events`] - `GraphEvent`, `NotificationBus`, `EventRecorder`
//! - [`services`] - `DocumentGraph`, `GraphQuery`, `LayoutAdapter`, errors
//! - [`operations`] - Split and join rewrites
//! - [`db`] - Snapshot export/import and file-backed `DocumentStore`
//! - [`config`] - `EngineConfig`
//!
//! # Example
//!
//! ```rust
//! use dagtext_core::{DocumentGraph, LayoutMethod, SplitPolicy};
//!
//! let mut graph = DocumentGraph::new();
//! let id = graph.add_node("I'm the first node!", Some("Node 0".to_string()));
//! let (head, tail) = graph.split_node(id, 7, SplitPolicy::default()).unwrap();
//!
//! assert_eq!(graph.get_node(head).unwrap().text, "I'm the");
//! assert!(graph.contains_edge(head, tail));
//! assert!(graph.query().is_dag());
//!
//! let positions = graph
//!     .layout()
//!     .compute_positions(800.0, 600.0, LayoutMethod::Circular)
//!     .unwrap();
//! assert_eq!(positions.len(), 2);
//! ```

pub mod config;
pub mod db;
pub mod events;
pub mod models;
pub mod operations;
pub mod services;

// Re-export commonly used types
pub use config::{ConfigError, EngineConfig, LayoutConfig};
pub use db::{DocumentSnapshot, DocumentStore, FileFormat, StoreError};
pub use events::{EventKind, EventRecorder, GraphEvent, NotificationBus, SubscriptionId};
pub use models::{EdgeAttributes, EdgeView, NodeId, NodeUpdate, NodeView};
pub use operations::SplitPolicy;
pub use services::{
    DocumentGraph, ErrorKind, GraphError, GraphQuery, IdentityAllocator, LayoutAdapter,
    LayoutMethod, Position, Result, TitleGraph,
};
