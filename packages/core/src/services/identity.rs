//! Node identity allocation
//!
//! Each [`DocumentGraph`](crate::services::DocumentGraph) owns one allocator, so
//! independent documents never share an id counter. Ids start at 0 and only
//! ever increase; ids of removed nodes are left as gaps.

use crate::models::NodeId;
use crate::services::{GraphError, Result};

/// Counter value at which no further id can be issued
const EXHAUSTED: u64 = u64::MAX;

/// Issues unique, strictly increasing node identifiers
#[derive(Debug, Default)]
pub struct IdentityAllocator {
    next: u64,
}

impl IdentityAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next id
    ///
    /// # Panics
    ///
    /// Panics once the id space is exhausted instead of wrapping around and
    /// reissuing ids. Imports always leave room for at least one more id.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> NodeId {
        let id = NodeId::new(self.next);
        self.next = match self.next.checked_add(1) {
            Some(next) => next,
            None => panic!("node id space exhausted"),
        };
        id
    }

    /// The id the next call to [`next`](Self::next) will return
    pub fn peek(&self) -> NodeId {
        NodeId::new(self.next)
    }

    /// Make sure every future id is strictly greater than `id`.
    ///
    /// Used on import so ids loaded from a saved document are never reissued.
    /// Never moves the counter backwards.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `id` is so large that no id could follow it.
    pub fn advance_past(&mut self, id: NodeId) -> Result<()> {
        match id.value().checked_add(1) {
            Some(next) => self.advance_to(next),
            None => Err(GraphError::invalid_argument(format!(
                "node id {} leaves no room for new nodes",
                id
            ))),
        }
    }

    /// Raise the counter to at least `next`; never moves it backwards
    pub(crate) fn advance_to(&mut self, next: u64) -> Result<()> {
        if next >= EXHAUSTED {
            return Err(GraphError::invalid_argument(format!(
                "next id {} leaves no room for new nodes",
                next
            )));
        }
        self.next = self.next.max(next);
        Ok(())
    }

    /// Restart numbering from 0. Reissuing ids breaks the uniqueness
    /// guarantee of a live document, so this only exists for tests.
    #[cfg(test)]
    pub(crate) fn reset(&mut self) {
        self.next = 0;
    }
}
