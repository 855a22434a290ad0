//! Store Module
//!
//! Read path over an existing device file.
//!
//! ## Responsibilities
//! - Resolve opaque keys to slot numbers (hash-and-modulo)
//! - Locate variable-length blocks via offset arithmetic
//! - Serve single and batched fetches against the immutable file
//! - Cache block metadata in an optional in-memory index
//!
//! ## Concurrency Model
//! The device file is read-only and immutable for the lifetime of a store.
//! Every fetch opens its own file handle and owns its own output buffer, so
//! concurrent fetches never coordinate beyond sharing the path. The only
//! shared mutable state is the lazily-loaded index, behind an RwLock.

mod index;
mod store;

pub use index::{IndexEntry, MetadataIndex};
pub use store::{BlockStore, ResponseData};
