//! Device Builder
//!
//! Writes a brand-new device file with the deterministic block layout.

use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::config::Geometry;
use crate::error::{Result, VaultError};

use super::record::BlockRecord;
use super::RECORD_LEN;

/// Builder that lays out a new device file
pub struct DeviceBuilder {
    /// Output file path
    path: PathBuf,
    /// Layout parameters
    geometry: Geometry,
}

/// Summary of a freshly written device — lightweight handle for callers.
#[derive(Debug, Clone)]
pub struct DeviceInfo {
    /// Path to the device file
    pub path: PathBuf,
    /// Number of blocks written
    pub block_count: u64,
    /// Final file size in bytes
    pub file_size: u64,
}

impl DeviceBuilder {
    /// Create a builder targeting `path` with the given geometry
    pub fn new(path: impl AsRef<Path>, geometry: Geometry) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            geometry,
        }
    }

    /// Write the device file: all blocks in index order, then verify the
    /// resulting length against the geometry's expected total.
    ///
    /// Block `i` gets payload length `base + i`, every payload byte set to
    /// the block's fill character. The tag is the ordinal index, except the
    /// sentinel block, which is stamped with the hash of the well-known key.
    pub fn build(self) -> Result<DeviceInfo> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)?;

        let mut writer = BufWriter::new(file);
        let mut written: u64 = 0;

        for i in 0..self.geometry.block_count {
            let tag = if i == self.geometry.sentinel_slot {
                self.geometry.sentinel_tag()
            } else {
                i
            };

            let payload_len = self.geometry.payload_len(i);
            let record = BlockRecord { tag, payload_len };

            writer.write_all(&record.encode())?;

            let payload = vec![self.geometry.fill_byte(i); payload_len as usize];
            writer.write_all(&payload)?;

            written += RECORD_LEN + payload_len;
            tracing::trace!(block = i, tag, payload_len, written, "wrote block");
        }

        writer.flush()?;
        let file = writer
            .into_inner()
            .map_err(|e| VaultError::Io(e.into_error()))?;
        file.sync_all()?;

        // Consistency check: the file on disk must be exactly as long as the
        // geometry says. A mismatch means the layout above and the offset
        // arithmetic used by readers disagree.
        let expected = self.geometry.total_len();
        let actual = file.metadata()?.len();
        if actual != expected {
            tracing::warn!(expected, actual, "device length mismatch after build");
            return Err(VaultError::LayoutMismatch { expected, actual });
        }

        tracing::debug!(
            path = %self.path.display(),
            blocks = self.geometry.block_count,
            file_size = actual,
            "device created"
        );

        Ok(DeviceInfo {
            path: self.path,
            block_count: self.geometry.block_count,
            file_size: actual,
        })
    }
}
