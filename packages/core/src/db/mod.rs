//! Persistence Layer
//!
//! The engine hands its state across the persistence boundary as a
//! [`DocumentSnapshot`]; this module encodes snapshots and stores them:
//!
//! - `DocumentSnapshot` - plain-data export/import of a `DocumentGraph`
//! - `FileFormat` - YAML or JSON, chosen by file extension
//! - `DocumentStore` - save/load a document at a path
//!
//! Import validates the snapshot (unique ids, edge references) and advances
//! the identity allocator so saved ids are never reissued.

mod document_store;
mod error;
mod format;
mod snapshot;

pub use document_store::DocumentStore;
pub use error::StoreError;
pub use format::FileFormat;
pub use snapshot::DocumentSnapshot;
