//! Error types for BlockVault
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using VaultError
pub type Result<T> = std::result::Result<T, VaultError>;

/// Unified error type for BlockVault operations
#[derive(Debug, Error)]
pub enum VaultError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Device Layout Errors
    // -------------------------------------------------------------------------
    #[error("device length mismatch: expected {expected} bytes, file is {actual}")]
    LayoutMismatch { expected: u64, actual: u64 },

    #[error("device truncated: expected at least {expected} bytes, file is {actual}")]
    TruncatedDevice { expected: u64, actual: u64 },

    // -------------------------------------------------------------------------
    // Corruption / Sanity Errors
    // -------------------------------------------------------------------------
    #[error("corruption detected: {0}")]
    Corruption(String),

    // -------------------------------------------------------------------------
    // Fetch Errors
    // -------------------------------------------------------------------------
    #[error("fetch failed for key {key:?}: {source}")]
    Fetch {
        key: String,
        #[source]
        source: Box<VaultError>,
    },
}

impl VaultError {
    /// Wrap an error with the key whose fetch produced it.
    pub fn for_key(key: impl Into<String>, source: VaultError) -> Self {
        VaultError::Fetch {
            key: key.into(),
            source: Box::new(source),
        }
    }
}
