//! Graph Events
//!
//! This module defines the structural change notifications a
//! [`DocumentGraph`](crate::services::DocumentGraph) publishes. They follow the
//! observer pattern: an editor canvas, an undo log, or a background analyzer
//! subscribes to the graph's [`NotificationBus`] and keeps its own state in
//! sync without the graph knowing about it.
//!
//! # Event Flow
//!
//! 1. A graph operation validates its inputs
//! 2. The operation mutates the graph one primitive at a time
//! 3. Each primitive publishes its event synchronously, in line with the change
//! 4. Compound rewrites (split, join) publish their summary event last
//!
//! Handlers run on the caller's thread before the mutating call returns.

mod bus;
mod recorder;

pub use bus::{EventHandler, NotificationBus, SubscriptionId};
pub use recorder::EventRecorder;

use crate::models::NodeId;
use serde::{Deserialize, Serialize};

/// Structural change announced by a document graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GraphEvent {
    /// A node was created and registered
    NodeCreated { id: NodeId },

    /// A node was removed; carries its last-known attributes
    NodeRemoved {
        id: NodeId,
        title: String,
        text: String,
    },

    /// A node's title or text changed
    NodeUpdated { id: NodeId },

    /// A directed edge was created
    EdgeCreated { head: NodeId, tail: NodeId },

    /// A directed edge was removed
    EdgeRemoved { head: NodeId, tail: NodeId },

    /// An edge's attribute map changed
    EdgeUpdated { head: NodeId, tail: NodeId },

    /// `original` was replaced by `head` and `tail`
    NodeSplit {
        original: NodeId,
        head: NodeId,
        tail: NodeId,
    },

    /// `head` and `tail` were merged into `joined`
    NodeJoined {
        head: NodeId,
        tail: NodeId,
        joined: NodeId,
    },
}

/// Discriminant of a [`GraphEvent`], used to subscribe to one kind of change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventKind {
    NodeCreated,
    NodeRemoved,
    NodeUpdated,
    EdgeCreated,
    EdgeRemoved,
    EdgeUpdated,
    NodeSplit,
    NodeJoined,
}

impl EventKind {
    /// Every event kind, in declaration order
    pub const ALL: [EventKind; 8] = [
        EventKind::NodeCreated,
        EventKind::NodeRemoved,
        EventKind::NodeUpdated,
        EventKind::EdgeCreated,
        EventKind::EdgeRemoved,
        EventKind::EdgeUpdated,
        EventKind::NodeSplit,
        EventKind::NodeJoined,
    ];
}

impl GraphEvent {
    /// The kind of this event
    pub fn kind(&self) -> EventKind {
        match self {
            GraphEvent::NodeCreated { .. } => EventKind::NodeCreated,
            GraphEvent::NodeRemoved { .. } => EventKind::NodeRemoved,
            GraphEvent::NodeUpdated { .. } => EventKind::NodeUpdated,
            GraphEvent::EdgeCreated { .. } => EventKind::EdgeCreated,
            GraphEvent::EdgeRemoved { .. } => EventKind::EdgeRemoved,
            GraphEvent::EdgeUpdated { .. } => EventKind::EdgeUpdated,
            GraphEvent::NodeSplit { .. } => EventKind::NodeSplit,
            GraphEvent::NodeJoined { .. } => EventKind::NodeJoined,
        }
    }

    /// Get a string representation of the event type, for logs and bridges
    pub fn event_type(&self) -> &'static str {
        match self {
            GraphEvent::NodeCreated { .. } => "node:created",
            GraphEvent::NodeRemoved { .. } => "node:removed",
            GraphEvent::NodeUpdated { .. } => "node:updated",
            GraphEvent::EdgeCreated { .. } => "edge:created",
            GraphEvent::EdgeRemoved { .. } => "edge:removed",
            GraphEvent::EdgeUpdated { .. } => "edge:updated",
            GraphEvent::NodeSplit { .. } => "node:split",
            GraphEvent::NodeJoined { .. } => "node:joined",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Contract test: pins the JSON shape an external bridge (e.g. a web canvas)
    /// relies on. Internally tagged, so fields sit next to `type`.
    #[test]
    fn test_graph_event_serialization_contract() {
        let event = GraphEvent::NodeSplit {
            original: NodeId::new(0),
            head: NodeId::new(1),
            tail: NodeId::new(2),
        };

        let parsed: serde_json::Value = serde_json::to_value(&event).unwrap();
        assert_eq!(parsed.get("type").unwrap(), "nodeSplit");
        assert_eq!(parsed.get("original").unwrap(), 0);
        assert_eq!(parsed.get("head").unwrap(), 1);
        assert_eq!(parsed.get("tail").unwrap(), 2);

        let back: GraphEvent = serde_json::from_value(parsed).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn test_node_removed_carries_payload() {
        let event = GraphEvent::NodeRemoved {
            id: NodeId::new(4),
            title: "Intro".to_string(),
            text: "Once upon a time".to_string(),
        };
        let parsed: serde_json::Value = serde_json::to_value(&event).unwrap();
        assert_eq!(parsed.get("type").unwrap(), "nodeRemoved");
        assert_eq!(parsed.get("title").unwrap(), "Intro");
        assert_eq!(parsed.get("text").unwrap(), "Once upon a time");
    }

    #[test]
    fn test_kind_and_event_type_agree() {
        let a = NodeId::new(1);
        let b = NodeId::new(2);
        let events = [
            GraphEvent::NodeCreated { id: a },
            GraphEvent::NodeRemoved {
                id: a,
                title: String::new(),
                text: String::new(),
            },
            GraphEvent::NodeUpdated { id: a },
            GraphEvent::EdgeCreated { head: a, tail: b },
            GraphEvent::EdgeRemoved { head: a, tail: b },
            GraphEvent::EdgeUpdated { head: a, tail: b },
            GraphEvent::NodeSplit {
                original: a,
                head: b,
                tail: b,
            },
            GraphEvent::NodeJoined {
                head: a,
                tail: b,
                joined: b,
            },
        ];

        let kinds: Vec<EventKind> = events.iter().map(GraphEvent::kind).collect();
        assert_eq!(kinds, EventKind::ALL.to_vec());

        assert_eq!(events[0].event_type(), "node:created");
        assert_eq!(events[4].event_type(), "edge:removed");
        assert_eq!(events[7].event_type(), "node:joined");
    }
}
