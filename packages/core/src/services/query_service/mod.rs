//! Query Service - Read-only Graph Analysis
//!
//! `GraphQuery` borrows a [`DocumentGraph`] and answers structural questions
//! about its current state. Nothing is cached: every call recomputes from
//! the live topology, since the graph is not guaranteed acyclic between
//! mutations.
//!
//! # Reading flows
//!
//! A *flow* is one simple path through the document; mapping each node on it
//! to its text gives one "nonlinear reading" of the document.
//!
//! ```rust
//! use dagtext_core::services::DocumentGraph;
//!
//! let mut graph = DocumentGraph::new();
//! let a = graph.add_node("Once ", None);
//! let b = graph.add_node("upon ", None);
//! let c = graph.add_node("a time", None);
//! graph.add_edge(a, b).unwrap();
//! graph.add_edge(b, c).unwrap();
//!
//! let query = graph.query();
//! assert!(query.is_dag());
//! assert_eq!(query.flow_strings(a, c, "").unwrap(), vec!["Once upon a time"]);
//! ```

use crate::models::NodeId;
use crate::services::{DocumentGraph, GraphError, Result};
use petgraph::algo::{all_simple_paths, is_cyclic_directed, toposort};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Graph keyed by node titles instead of ids, for external visualization.
///
/// Nodes sharing a title collapse into one label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleGraph {
    pub nodes: BTreeSet<String>,
    pub edges: BTreeSet<(String, String)>,
}

impl TitleGraph {
    pub fn contains_edge(&self, head: &str, tail: &str) -> bool {
        self.edges.contains(&(head.to_string(), tail.to_string()))
    }
}

/// Lazy iterator over the simple paths between two nodes
pub struct SimplePaths<'a> {
    inner: Option<Box<dyn Iterator<Item = Vec<NodeId>> + 'a>>,
}

impl<'a> SimplePaths<'a> {
    fn empty() -> Self {
        Self { inner: None }
    }
}

impl Iterator for SimplePaths<'_> {
    type Item = Vec<NodeId>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.as_mut()?.next()
    }
}

impl fmt::Debug for SimplePaths<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimplePaths")
            .field("exhausted", &self.inner.is_none())
            .finish()
    }
}

/// Read-only analysis over a borrowed document graph
#[derive(Debug, Clone, Copy)]
pub struct GraphQuery<'a> {
    graph: &'a DocumentGraph,
}

impl<'a> GraphQuery<'a> {
    pub fn new(graph: &'a DocumentGraph) -> Self {
        Self { graph }
    }

    /// True iff the current edge set has no directed cycle
    pub fn is_dag(&self) -> bool {
        !is_cyclic_directed(self.graph.topology())
    }

    /// Node ids in a valid reading order.
    ///
    /// # Errors
    ///
    /// `CycleDetected` naming a node that lies on a cycle.
    pub fn topological_order(&self) -> Result<Vec<NodeId>> {
        toposort(self.graph.topology(), None).map_err(|cycle| GraphError::CycleDetected {
            node: cycle.node_id(),
        })
    }

    /// Every path from `start` to `end` that visits no node twice.
    ///
    /// Paths are produced lazily and include both endpoints. Calling this
    /// again on an unchanged graph yields the same paths in the same order.
    /// A path from a node to itself is never simple, so `start == end`
    /// yields nothing.
    ///
    /// # Errors
    ///
    /// `NodeNotFound` if either endpoint is absent.
    pub fn simple_paths(&self, start: NodeId, end: NodeId) -> Result<SimplePaths<'a>> {
        for id in [start, end] {
            if !self.graph.contains_node(id) {
                return Err(GraphError::node_not_found(id));
            }
        }

        if start == end {
            return Ok(SimplePaths::empty());
        }

        let paths = all_simple_paths::<Vec<NodeId>, _>(self.graph.topology(), start, end, 0, None);
        Ok(SimplePaths {
            inner: Some(Box::new(paths)),
        })
    }

    /// The texts along every simple path from `start` to `end`
    pub fn flow_text(&self, start: NodeId, end: NodeId) -> Result<Vec<Vec<String>>> {
        self.simple_paths(start, end)?
            .map(|path| {
                path.into_iter()
                    .map(|id| self.graph.node_ref(id).map(|node| node.text.clone()))
                    .collect::<Result<Vec<String>>>()
            })
            .collect()
    }

    /// Each flow from `start` to `end` as one string, texts joined by `joiner`
    pub fn flow_strings(&self, start: NodeId, end: NodeId, joiner: &str) -> Result<Vec<String>> {
        Ok(self
            .flow_text(start, end)?
            .into_iter()
            .map(|texts| texts.join(joiner))
            .collect())
    }

    /// Project the graph onto node titles.
    ///
    /// # Errors
    ///
    /// `Internal` if the topology names a node with no record; that can only
    /// happen through a defect in the store.
    pub fn project_by_title(&self) -> Result<TitleGraph> {
        let title_of = |id: NodeId| -> Result<String> {
            self.graph
                .node_ref(id)
                .map(|node| node.title.clone())
                .map_err(|_| {
                    GraphError::internal(format!("topology references unknown node {}", id))
                })
        };

        let mut projection = TitleGraph::default();
        for id in self.graph.topology().nodes() {
            projection.nodes.insert(title_of(id)?);
        }
        for (head, tail, _) in self.graph.topology().all_edges() {
            projection.edges.insert((title_of(head)?, title_of(tail)?));
        }
        Ok(projection)
    }
}

impl DocumentGraph {
    /// Read-only query view over the current state
    pub fn query(&self) -> GraphQuery<'_> {
        GraphQuery::new(self)
    }
}

#[cfg(test)]
mod query_service_test;
