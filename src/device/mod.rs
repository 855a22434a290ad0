//! Device Module
//!
//! The flat device file: layout rules and the writer that produces it.
//!
//! ## File Format
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ Block 0                                                 │
//! │   Tag: u64 (8) | PayloadLen: u64 (8) | Payload (512)    │
//! ├─────────────────────────────────────────────────────────┤
//! │ Block 1  (sentinel: Tag = hash of the well-known key)   │
//! │   Tag: u64 (8) | PayloadLen: u64 (8) | Payload (513)    │
//! ├─────────────────────────────────────────────────────────┤
//! │ ...                                                     │
//! ├─────────────────────────────────────────────────────────┤
//! │ Block N-1                                               │
//! │   Tag: u64 (8) | PayloadLen: u64 (8) | Payload (512+N-1)│
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! Blocks are concatenated with no padding. Block `i`'s payload is
//! `512 + i` bytes of the single repeated character `'A' + (i % 26)`.
//! All integers are little-endian. The file is immutable once written.

mod builder;
mod record;

pub use builder::{DeviceBuilder, DeviceInfo};
pub use record::BlockRecord;

// =============================================================================
// Shared Constants (used by writer, index, store)
// =============================================================================

/// Metadata record size: Tag (8) + PayloadLen (8) = 16 bytes
pub const RECORD_LEN: u64 = 16;
