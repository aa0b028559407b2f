//! Node join
//!
//! Merges a head and a tail node into one new node. The joined node takes
//! over the head's incoming edges and the tail's outgoing edges; edges
//! between the pair itself are absorbed.

use crate::events::GraphEvent;
use crate::models::NodeId;
use crate::services::{DocumentGraph, GraphError, Result};
use std::collections::BTreeSet;

impl DocumentGraph {
    /// Join `head` and `tail` into a new node.
    ///
    /// The new node's title is `head.title + title_separator + tail.title` and
    /// its text is `head.text + text_separator + tail.text`. Both originals are
    /// removed (head first). Emits `NodeCreated`, `EdgeCreated` for each
    /// inherited edge, the removal events of both originals, then `NodeJoined`.
    ///
    /// # Errors
    ///
    /// - `NodeNotFound` if either id is absent
    /// - `InvalidArgument` if `head == tail`
    pub fn join_nodes(
        &mut self,
        head: NodeId,
        tail: NodeId,
        title_separator: &str,
        text_separator: &str,
    ) -> Result<NodeId> {
        let head_node = self.node_ref(head)?;
        let tail_node = self.node_ref(tail)?;
        if head == tail {
            return Err(GraphError::invalid_argument(format!(
                "cannot join node {} with itself",
                head
            )));
        }

        let title = [head_node.title.as_str(), tail_node.title.as_str()].join(title_separator);
        let text = [head_node.text.as_str(), tail_node.text.as_str()].join(text_separator);

        let pair = [head, tail];
        let incoming: BTreeSet<NodeId> = self
            .incoming(head)?
            .into_iter()
            .filter(|n| !pair.contains(n))
            .collect();
        let outgoing: BTreeSet<NodeId> = self
            .outgoing(tail)?
            .into_iter()
            .filter(|n| !pair.contains(n))
            .collect();

        let joined = self.add_node(text, Some(title));
        for &up in &incoming {
            self.connect(up, joined);
        }
        for &down in &outgoing {
            self.connect(joined, down);
        }

        self.remove_node(head)?;
        self.remove_node(tail)?;

        tracing::debug!("Joined nodes {} and {} into {}", head, tail, joined);
        self.emit(GraphEvent::NodeJoined { head, tail, joined });
        Ok(joined)
    }

    /// Join using the separators from this graph's [`EngineConfig`](crate::config::EngineConfig)
    pub fn join_nodes_with_defaults(&mut self, head: NodeId, tail: NodeId) -> Result<NodeId> {
        let title_separator = self.config().title_separator.clone();
        let text_separator = self.config().text_separator.clone();
        self.join_nodes(head, tail, &title_separator, &text_separator)
    }
}

#[cfg(test)]
#[path = "join_test.rs"]
mod join_test;
