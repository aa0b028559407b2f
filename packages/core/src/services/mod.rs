//! Graph Services
//!
//! This module contains the document graph engine services:
//!
//! - `IdentityAllocator` - Unique, monotonically increasing node ids
//! - `DocumentGraph` - Node/edge storage and mutation primitives
//! - `GraphQuery` - Read-only analysis (acyclicity, simple paths, title projection)
//! - `LayoutAdapter` - 2D position hints for visualization
//!
//! Compound rewrites (split, join) live in [`crate::operations`] and are built
//! from the `DocumentGraph` primitives.

pub mod error;
pub mod graph_store;
pub mod identity;
pub mod layout_service;
pub mod query_service;

pub use error::{ErrorKind, GraphError, Result};
pub use graph_store::DocumentGraph;
pub use identity::IdentityAllocator;
pub use layout_service::{LayoutAdapter, LayoutMethod, Position};
pub use query_service::{GraphQuery, SimplePaths, TitleGraph};
