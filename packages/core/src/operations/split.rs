//! Node split
//!
//! Cuts one node's text into a head and a tail node and rewires the original
//! node's neighbourhood according to a [`SplitPolicy`].
//!
//! ```text
//!   in ──► [ original ] ──► out        in ──► [ head ] ──► [ tail ] ──► out
//! ```
//!
//! Validation (node exists, location in range) happens before any mutation.
//! After that point the operation only calls primitives whose preconditions
//! it has already established, so it cannot fail halfway.

use crate::events::GraphEvent;
use crate::models::NodeId;
use crate::services::{DocumentGraph, GraphError, Result};
use serde::{Deserialize, Serialize};

/// Edge-rewiring switches applied by a split.
///
/// "in" is the original node's incoming neighbour set and "out" its outgoing
/// neighbour set, both captured before the split mutates anything. Switches
/// are applied in field order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitPolicy {
    /// Every incoming neighbour points to the head
    pub in_to_head: bool,

    /// Every incoming neighbour points to the tail
    pub in_to_tail: bool,

    /// The head points to the tail
    pub head_to_tail: bool,

    /// The head points to every outgoing neighbour
    pub head_to_out: bool,

    /// The tail points to every outgoing neighbour
    pub tail_to_out: bool,

    /// Every incoming neighbour points to every outgoing neighbour
    pub in_to_out: bool,
}

impl Default for SplitPolicy {
    fn default() -> Self {
        Self {
            in_to_head: true,
            in_to_tail: false,
            head_to_tail: true,
            head_to_out: false,
            tail_to_out: true,
            in_to_out: false,
        }
    }
}

impl SplitPolicy {
    /// Policy with every switch off: the halves are left unconnected
    pub fn disconnected() -> Self {
        Self {
            in_to_head: false,
            in_to_tail: false,
            head_to_tail: false,
            head_to_out: false,
            tail_to_out: false,
            in_to_out: false,
        }
    }

    /// Edges this policy produces, in application order
    fn wiring(
        &self,
        incoming: &[NodeId],
        outgoing: &[NodeId],
        head: NodeId,
        tail: NodeId,
    ) -> Vec<(NodeId, NodeId)> {
        let mut edges = Vec::new();

        if self.in_to_head {
            edges.extend(incoming.iter().map(|&n| (n, head)));
        }
        if self.in_to_tail {
            edges.extend(incoming.iter().map(|&n| (n, tail)));
        }
        if self.head_to_tail {
            edges.push((head, tail));
        }
        if self.head_to_out {
            edges.extend(outgoing.iter().map(|&n| (head, n)));
        }
        if self.tail_to_out {
            edges.extend(outgoing.iter().map(|&n| (tail, n)));
        }
        if self.in_to_out {
            for &up in incoming {
                edges.extend(outgoing.iter().map(|&down| (up, down)));
            }
        }

        edges
    }
}

/// Byte offset of the `location`-th character, or `None` past the end
fn char_boundary(text: &str, location: usize) -> Option<usize> {
    text.char_indices()
        .map(|(offset, _)| offset)
        .chain(std::iter::once(text.len()))
        .nth(location)
}

impl DocumentGraph {
    /// Split node `id` at character offset `location`.
    ///
    /// The head takes `text[..location]` and title `"<title> (1)"`, the tail
    /// takes `text[location..]` and title `"<title> (2)"`. The original node
    /// and all its edges are removed. `location` counts Unicode scalar
    /// values, so a cut never lands inside a character.
    ///
    /// Emits `NodeCreated` (head, tail), `EdgeCreated` for each new edge, the
    /// original node's removal events, then `NodeSplit`.
    ///
    /// # Errors
    ///
    /// - `NodeNotFound` if `id` is absent
    /// - `OutOfRange` if `location` exceeds the text length
    pub fn split_node(
        &mut self,
        id: NodeId,
        location: usize,
        policy: SplitPolicy,
    ) -> Result<(NodeId, NodeId)> {
        let original = self.node_ref(id)?;
        let cut = char_boundary(&original.text, location).ok_or_else(|| {
            GraphError::out_of_range(id, location, original.text.chars().count())
        })?;

        let (head_text, tail_text) = original.text.split_at(cut);
        let head_text = head_text.to_string();
        let tail_text = tail_text.to_string();
        let head_title = format!("{} (1)", original.title);
        let tail_title = format!("{} (2)", original.title);

        // A self-loop on the original has no counterpart among the halves
        let incoming: Vec<NodeId> = self.incoming(id)?.into_iter().filter(|&n| n != id).collect();
        let outgoing: Vec<NodeId> = self.outgoing(id)?.into_iter().filter(|&n| n != id).collect();

        let head = self.add_node(head_text, Some(head_title));
        let tail = self.add_node(tail_text, Some(tail_title));

        for (from, to) in policy.wiring(&incoming, &outgoing, head, tail) {
            self.connect(from, to);
        }

        self.remove_node(id)?;

        tracing::debug!(
            "Split node {} at {} into {} and {}",
            id,
            location,
            head,
            tail
        );
        self.emit(GraphEvent::NodeSplit {
            original: id,
            head,
            tail,
        });
        Ok((head, tail))
    }

    /// Split using the policy from this graph's [`EngineConfig`](crate::config::EngineConfig)
    pub fn split_node_with_defaults(
        &mut self,
        id: NodeId,
        location: usize,
    ) -> Result<(NodeId, NodeId)> {
        let policy = self.config().default_split_policy;
        self.split_node(id, location, policy)
    }
}
