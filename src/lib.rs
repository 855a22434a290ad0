//! # BlockVault
//!
//! A minimal content-addressable block store backed by a single flat file:
//! - Deterministic device layout (fixed block count, growing payload sizes)
//! - Hash-and-modulo slot resolution from opaque key strings
//! - O(1) fetches via a precomputed metadata index
//! - Worker-per-key batch fetch with per-worker buffers
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     DeviceBuilder                            │
//! │         (writes the device file once, then done)             │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ produces
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                     Device File                              │
//! │    [tag u64][len u64][payload] ... x block_count             │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ read-only, immutable
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌──────────────┐         ┌──────────────┐
//!   │ MetadataIndex│         │  BlockStore  │
//!   │  (one scan,  │◄────────│   fetch /    │
//!   │ slots+offsets)│ caches │  fetch_many  │
//!   └──────────────┘         └──────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod device;
pub mod store;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{Result, VaultError};
pub use config::Geometry;
pub use device::{DeviceBuilder, DeviceInfo};
pub use store::{BlockStore, MetadataIndex, ResponseData};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of BlockVault
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
