//! Graph Error Types
//!
//! This module defines the error type shared by every graph service and
//! rewrite operation. All failures are local and synchronous: they are
//! returned from the offending call, and validation always precedes
//! mutation, so a failed call leaves the graph untouched.

use crate::models::{AttributeKeyError, NodeId};
use thiserror::Error;

/// Errors returned by document graph operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// Referenced node does not exist
    #[error("Node not found: {id}")]
    NodeNotFound { id: NodeId },

    /// Referenced edge does not exist
    #[error("Edge not found: {head} -> {tail}")]
    EdgeNotFound { head: NodeId, tail: NodeId },

    /// Edge endpoints are not both members of the graph
    #[error("Invalid edge {head} -> {tail}: node {missing} is not in the graph")]
    InvalidReference {
        head: NodeId,
        tail: NodeId,
        missing: NodeId,
    },

    /// Edge from a node to itself while self-loops are disallowed
    #[error("Self-loop on node {id} is not allowed")]
    SelfLoop { id: NodeId },

    /// Malformed or contradictory argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Split location outside `0..=len(text)`
    #[error("Location {location} is out of range for node {id} (text length {length})")]
    OutOfRange {
        id: NodeId,
        location: usize,
        length: usize,
    },

    /// Unknown layout method name
    #[error("Unsupported layout method: {0}")]
    UnsupportedLayout(String),

    /// Operation requires an acyclic graph
    #[error("Cycle detected through node {node}")]
    CycleDetected { node: NodeId },

    /// Broken internal invariant. Indicates a defect, not a user error.
    #[error("Internal consistency error: {0}")]
    Internal(String),
}

/// Coarse error category, for callers that only branch on the kind of failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    InvalidReference,
    InvalidArgument,
    OutOfRange,
    UnsupportedLayout,
    Internal,
}

impl GraphError {
    /// Create a node not found error
    pub fn node_not_found(id: NodeId) -> Self {
        Self::NodeNotFound { id }
    }

    /// Create an edge not found error
    pub fn edge_not_found(head: NodeId, tail: NodeId) -> Self {
        Self::EdgeNotFound { head, tail }
    }

    /// Create an invalid reference error naming the missing endpoint
    pub fn invalid_reference(head: NodeId, tail: NodeId, missing: NodeId) -> Self {
        Self::InvalidReference {
            head,
            tail,
            missing,
        }
    }

    /// Create a self-loop error
    pub fn self_loop(id: NodeId) -> Self {
        Self::SelfLoop { id }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create an out of range error
    pub fn out_of_range(id: NodeId, location: usize, length: usize) -> Self {
        Self::OutOfRange {
            id,
            location,
            length,
        }
    }

    /// Create an unsupported layout error
    pub fn unsupported_layout(method: impl Into<String>) -> Self {
        Self::UnsupportedLayout(method.into())
    }

    /// Create an internal consistency error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// The category this error belongs to
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NodeNotFound { .. } | Self::EdgeNotFound { .. } => ErrorKind::NotFound,
            Self::InvalidReference { .. } => ErrorKind::InvalidReference,
            Self::SelfLoop { .. } | Self::InvalidArgument(_) | Self::CycleDetected { .. } => {
                ErrorKind::InvalidArgument
            }
            Self::OutOfRange { .. } => ErrorKind::OutOfRange,
            Self::UnsupportedLayout(_) => ErrorKind::UnsupportedLayout,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }
}

impl From<AttributeKeyError> for GraphError {
    fn from(err: AttributeKeyError) -> Self {
        Self::InvalidArgument(err.to_string())
    }
}

/// Result type for graph operations
pub type Result<T> = std::result::Result<T, GraphError>;
