//! Document Graph Store
//!
//! `DocumentGraph` owns a document's nodes, its directed edges, its identity
//! allocator, and its notification bus. It exposes the mutation primitives
//! (add/remove node, add/remove edge, attribute edits) that every higher-level
//! operation is built from.
//!
//! # Invariants
//!
//! - Every edge's head and tail are members of the node set
//! - Removing a node removes every incident edge first; no edge dangles
//! - Node ids are never reissued, even after removal
//! - At most one edge exists per `(head, tail)` pair
//!
//! Acyclicity is *not* enforced here. It is a checked property, see
//! [`GraphQuery::is_dag`](crate::services::GraphQuery::is_dag).
//!
//! # Notifications
//!
//! Each primitive publishes its [`GraphEvent`] synchronously on the graph's
//! bus after validation succeeds. Handlers observe; they never share
//! ownership of graph state, and their failures do not affect the graph.

use crate::config::EngineConfig;
use crate::events::{EventKind, GraphEvent, NotificationBus, SubscriptionId};
use crate::models::{
    default_title, validate_attribute_key, EdgeAttributes, EdgeView, Node, NodeId, NodeUpdate,
    NodeView,
};
use crate::services::error::{GraphError, Result};
use crate::services::IdentityAllocator;
use petgraph::graphmap::DiGraphMap;
use petgraph::Direction;
use std::collections::{BTreeMap, BTreeSet};

/// A nonlinear text document: text fragments connected by flow edges
#[derive(Debug)]
pub struct DocumentGraph {
    /// Node records keyed by id
    nodes: BTreeMap<NodeId, Node>,

    /// Flow topology; edge weights hold the edge attribute maps
    topology: DiGraphMap<NodeId, EdgeAttributes>,

    allocator: IdentityAllocator,

    bus: NotificationBus,

    config: EngineConfig,
}

impl Default for DocumentGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentGraph {
    /// Create an empty document with the default engine config
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Create an empty document that applies `config`
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            nodes: BTreeMap::new(),
            topology: DiGraphMap::new(),
            allocator: IdentityAllocator::new(),
            bus: NotificationBus::new(),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ---------------------------------------------------------------
    // Subscriptions
    // ---------------------------------------------------------------

    /// Subscribe to one kind of structural change
    pub fn subscribe<F>(&mut self, kind: EventKind, handler: F) -> SubscriptionId
    where
        F: FnMut(&GraphEvent) -> anyhow::Result<()> + Send + 'static,
    {
        self.bus.subscribe(kind, handler)
    }

    /// Subscribe to every structural change
    pub fn subscribe_all<F>(&mut self, handler: F) -> SubscriptionId
    where
        F: FnMut(&GraphEvent) -> anyhow::Result<()> + Send + 'static,
    {
        self.bus.subscribe_all(handler)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }

    /// Direct access to the bus, e.g. to attach an [`EventRecorder`](crate::events::EventRecorder)
    pub fn bus_mut(&mut self) -> &mut NotificationBus {
        &mut self.bus
    }

    pub(crate) fn emit(&mut self, event: GraphEvent) {
        self.bus.publish(&event);
    }

    // ---------------------------------------------------------------
    // Nodes
    // ---------------------------------------------------------------

    /// Create a node and register it in the graph.
    ///
    /// `text` is normalised to a `String` through `ToString`, so numbers and
    /// other displayable values are accepted. `title` is taken as an owned
    /// `String` so a bare `None` needs no type annotation; callers with a
    /// non-string title convert it themselves (`Some(n.to_string())`). A
    /// missing title defaults to `<Node N>` where `N` is the new id. Emits
    /// `NodeCreated`.
    pub fn add_node(&mut self, text: impl ToString, title: Option<String>) -> NodeId {
        let id = self.allocator.next();
        let title = title.unwrap_or_else(|| default_title(id));

        self.nodes.insert(id, Node::new(id, title, text.to_string()));
        self.topology.add_node(id);

        tracing::debug!("Created node {}", id);
        self.emit(GraphEvent::NodeCreated { id });
        id
    }

    /// Remove a node and every edge incident to it.
    ///
    /// Emits one `EdgeRemoved` per incident edge, then `NodeRemoved` carrying
    /// the node's last title and text.
    pub fn remove_node(&mut self, id: NodeId) -> Result<()> {
        if !self.nodes.contains_key(&id) {
            return Err(GraphError::node_not_found(id));
        }

        let mut incident: Vec<(NodeId, NodeId)> = self
            .topology
            .neighbors_directed(id, Direction::Outgoing)
            .map(|tail| (id, tail))
            .collect();
        incident.extend(
            self.topology
                .neighbors_directed(id, Direction::Incoming)
                .map(|head| (head, id)),
        );
        incident.sort_unstable();
        incident.dedup();

        for (head, tail) in incident {
            if self.topology.remove_edge(head, tail).is_some() {
                self.emit(GraphEvent::EdgeRemoved { head, tail });
            }
        }

        let (title, text) = match self.nodes.get(&id) {
            Some(node) => (node.title.clone(), node.text.clone()),
            None => return Err(GraphError::internal(format!("node {} vanished during removal", id))),
        };
        self.emit(GraphEvent::NodeRemoved { id, title, text });

        self.nodes.remove(&id);
        self.topology.remove_node(id);
        tracing::debug!("Removed node {}", id);
        Ok(())
    }

    /// Snapshot of a node's attributes
    pub fn get_node(&self, id: NodeId) -> Result<NodeView> {
        self.node_ref(id).map(Node::view)
    }

    pub(crate) fn node_ref(&self, id: NodeId) -> Result<&Node> {
        self.nodes.get(&id).ok_or(GraphError::node_not_found(id))
    }

    /// Apply a partial update to a node's title and/or text.
    ///
    /// Emits `NodeUpdated` only if a value actually changed.
    pub fn update_node(&mut self, id: NodeId, update: NodeUpdate) -> Result<NodeView> {
        let node = self
            .nodes
            .get_mut(&id)
            .ok_or(GraphError::node_not_found(id))?;

        let changed = node.apply(update);
        let view = node.view();

        if changed {
            tracing::debug!("Updated node {}", id);
            self.emit(GraphEvent::NodeUpdated { id });
        }
        Ok(view)
    }

    pub fn set_title(&mut self, id: NodeId, title: impl ToString) -> Result<NodeView> {
        self.update_node(id, NodeUpdate::new().with_title(title))
    }

    pub fn set_text(&mut self, id: NodeId, text: impl ToString) -> Result<NodeView> {
        self.update_node(id, NodeUpdate::new().with_text(text))
    }

    /// Current node ids, as a detached set
    pub fn nodes(&self) -> BTreeSet<NodeId> {
        self.nodes.keys().copied().collect()
    }

    /// Snapshots of every node, ordered by id
    pub fn node_views(&self) -> Vec<NodeView> {
        self.nodes.values().map(Node::view).collect()
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // ---------------------------------------------------------------
    // Edges
    // ---------------------------------------------------------------

    /// Create the directed edge `head -> tail`.
    ///
    /// Both endpoints must exist. Self-loops are rejected unless the config
    /// allows them. Re-adding an existing edge is a no-op that returns
    /// `Ok(false)` and emits nothing; a new edge emits `EdgeCreated`.
    pub fn add_edge(&mut self, head: NodeId, tail: NodeId) -> Result<bool> {
        self.validate_edge(head, tail)?;
        Ok(self.connect(head, tail))
    }

    fn validate_edge(&self, head: NodeId, tail: NodeId) -> Result<()> {
        for endpoint in [head, tail] {
            if !self.nodes.contains_key(&endpoint) {
                return Err(GraphError::invalid_reference(head, tail, endpoint));
            }
        }
        if head == tail && !self.config.allow_self_loops {
            return Err(GraphError::self_loop(head));
        }
        Ok(())
    }

    /// Insert an edge between nodes already known to exist.
    ///
    /// Rewrite operations wire edges through this after their own validation.
    /// Disallowed self-loops are skipped rather than failing mid-operation.
    pub(crate) fn connect(&mut self, head: NodeId, tail: NodeId) -> bool {
        if head == tail && !self.config.allow_self_loops {
            tracing::debug!("Skipping self-loop on node {}", head);
            return false;
        }
        if self.topology.contains_edge(head, tail) {
            return false;
        }

        self.topology.add_edge(head, tail, EdgeAttributes::new());
        tracing::debug!("Created edge {} -> {}", head, tail);
        self.emit(GraphEvent::EdgeCreated { head, tail });
        true
    }

    /// Remove the directed edge `head -> tail`. Emits `EdgeRemoved`.
    pub fn remove_edge(&mut self, head: NodeId, tail: NodeId) -> Result<()> {
        if self.topology.remove_edge(head, tail).is_none() {
            return Err(GraphError::edge_not_found(head, tail));
        }

        tracing::debug!("Removed edge {} -> {}", head, tail);
        self.emit(GraphEvent::EdgeRemoved { head, tail });
        Ok(())
    }

    /// Snapshot of an edge and its attributes
    pub fn get_edge(&self, head: NodeId, tail: NodeId) -> Result<EdgeView> {
        self.topology
            .edge_weight(head, tail)
            .map(|attribs| EdgeView {
                head,
                tail,
                attribs: attribs.clone(),
            })
            .ok_or(GraphError::edge_not_found(head, tail))
    }

    /// Set one attribute on an edge. Emits `EdgeUpdated`.
    pub fn set_edge_attribute(
        &mut self,
        head: NodeId,
        tail: NodeId,
        key: &str,
        value: serde_json::Value,
    ) -> Result<()> {
        validate_attribute_key(key)?;
        let attribs = self
            .topology
            .edge_weight_mut(head, tail)
            .ok_or(GraphError::edge_not_found(head, tail))?;

        attribs.insert(key.to_string(), value);
        self.emit(GraphEvent::EdgeUpdated { head, tail });
        Ok(())
    }

    /// Remove one attribute from an edge, returning its old value.
    ///
    /// Emits `EdgeUpdated` only when the key was present.
    pub fn remove_edge_attribute(
        &mut self,
        head: NodeId,
        tail: NodeId,
        key: &str,
    ) -> Result<Option<serde_json::Value>> {
        let attribs = self
            .topology
            .edge_weight_mut(head, tail)
            .ok_or(GraphError::edge_not_found(head, tail))?;

        let old = attribs.remove(key);
        if old.is_some() {
            self.emit(GraphEvent::EdgeUpdated { head, tail });
        }
        Ok(old)
    }

    /// Current `(head, tail)` pairs, as a detached set
    pub fn edges(&self) -> BTreeSet<(NodeId, NodeId)> {
        self.topology.all_edges().map(|(h, t, _)| (h, t)).collect()
    }

    /// Snapshots of every edge, ordered by `(head, tail)`
    pub fn edge_views(&self) -> Vec<EdgeView> {
        let mut views: Vec<EdgeView> = self
            .topology
            .all_edges()
            .map(|(head, tail, attribs)| EdgeView {
                head,
                tail,
                attribs: attribs.clone(),
            })
            .collect();
        views.sort_by_key(EdgeView::key);
        views
    }

    pub fn contains_edge(&self, head: NodeId, tail: NodeId) -> bool {
        self.topology.contains_edge(head, tail)
    }

    pub fn edge_count(&self) -> usize {
        self.topology.edge_count()
    }

    // ---------------------------------------------------------------
    // Neighbourhoods
    // ---------------------------------------------------------------

    /// Nodes with an edge into `id`
    pub fn incoming(&self, id: NodeId) -> Result<BTreeSet<NodeId>> {
        self.neighbors(id, Direction::Incoming)
    }

    /// Nodes `id` has an edge to
    pub fn outgoing(&self, id: NodeId) -> Result<BTreeSet<NodeId>> {
        self.neighbors(id, Direction::Outgoing)
    }

    fn neighbors(&self, id: NodeId, direction: Direction) -> Result<BTreeSet<NodeId>> {
        if !self.nodes.contains_key(&id) {
            return Err(GraphError::node_not_found(id));
        }

        let mut set: BTreeSet<NodeId> = self.topology.neighbors_directed(id, direction).collect();
        if self.topology.contains_edge(id, id) {
            set.insert(id);
        }
        Ok(set)
    }

    /// Nodes without incoming edges: where readings can start
    pub fn roots(&self) -> BTreeSet<NodeId> {
        self.nodes
            .keys()
            .copied()
            .filter(|&id| {
                self.topology
                    .neighbors_directed(id, Direction::Incoming)
                    .next()
                    .is_none()
                    && !self.topology.contains_edge(id, id)
            })
            .collect()
    }

    /// Nodes without outgoing edges: where readings end
    pub fn leaves(&self) -> BTreeSet<NodeId> {
        self.nodes
            .keys()
            .copied()
            .filter(|&id| {
                self.topology
                    .neighbors_directed(id, Direction::Outgoing)
                    .next()
                    .is_none()
            })
            .collect()
    }

    // ---------------------------------------------------------------
    // Crate-internal access for queries, layout and persistence
    // ---------------------------------------------------------------

    pub(crate) fn topology(&self) -> &DiGraphMap<NodeId, EdgeAttributes> {
        &self.topology
    }

    /// Raw topology access for tests that need to break invariants on purpose
    #[cfg(test)]
    pub(crate) fn topology_mut(&mut self) -> &mut DiGraphMap<NodeId, EdgeAttributes> {
        &mut self.topology
    }

    pub(crate) fn allocator(&self) -> &IdentityAllocator {
        &self.allocator
    }

    pub(crate) fn allocator_mut(&mut self) -> &mut IdentityAllocator {
        &mut self.allocator
    }

    /// Register a node record with a caller-chosen id, without notifying.
    /// Only used while building a graph from a snapshot.
    pub(crate) fn insert_imported_node(&mut self, view: NodeView) -> Result<()> {
        if self.nodes.contains_key(&view.id) {
            return Err(GraphError::invalid_argument(format!(
                "duplicate node id {} in imported document",
                view.id
            )));
        }
        self.allocator.advance_past(view.id)?;
        self.topology.add_node(view.id);
        self.nodes
            .insert(view.id, Node::new(view.id, view.title, view.text));
        Ok(())
    }

    /// Register an edge from a snapshot, validating endpoints, without notifying.
    pub(crate) fn insert_imported_edge(&mut self, edge: EdgeView) -> Result<()> {
        self.validate_edge(edge.head, edge.tail)?;
        if self.topology.contains_edge(edge.head, edge.tail) {
            return Err(GraphError::invalid_argument(format!(
                "duplicate edge {} -> {} in imported document",
                edge.head, edge.tail
            )));
        }
        for key in edge.attribs.keys() {
            validate_attribute_key(key)?;
        }
        self.topology.add_edge(edge.head, edge.tail, edge.attribs);
        Ok(())
    }
}

#[cfg(test)]
#[path = "graph_store_test.rs"]
mod graph_store_test;
