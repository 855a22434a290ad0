//! Metadata Index
//!
//! One sequential scan of the device file at load time yields every block's
//! tag and payload length, plus a cumulative offset table that makes later
//! offset lookups O(1) instead of O(block).

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use crate::config::Geometry;
use crate::device::{BlockRecord, RECORD_LEN};
use crate::error::{Result, VaultError};

/// One block's cached metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexEntry {
    /// Tag stored in the block's metadata record
    pub tag: u64,

    /// Payload length stored in the block's metadata record
    pub payload_len: u64,
}

/// In-memory cache of all block metadata, built by a single file scan.
///
/// Invariant: a successfully loaded index holds exactly
/// `geometry.block_count` entries. The scan trusts the on-disk layout (it
/// walks records in file order using each record's stored length to skip
/// its payload; tags are recorded, never followed). No invalidation exists:
/// the device file is assumed immutable while the index is alive.
#[derive(Debug, Clone)]
pub struct MetadataIndex {
    /// Per-slot metadata, ordered by block index
    entries: Vec<IndexEntry>,

    /// Byte offset of each block's metadata record
    offsets: Vec<u64>,
}

impl MetadataIndex {
    /// Scan the device file and build the index.
    ///
    /// Fails if the file is missing, shorter than the geometry's expected
    /// total, or any record read comes up short.
    pub fn load(path: &Path, geometry: &Geometry) -> Result<Self> {
        let file = File::open(path)?;

        let expected = geometry.total_len();
        let actual = file.metadata()?.len();
        if actual < expected {
            return Err(VaultError::TruncatedDevice { expected, actual });
        }

        let mut reader = BufReader::new(file);
        let mut entries = Vec::with_capacity(geometry.block_count as usize);
        let mut offsets = Vec::with_capacity(geometry.block_count as usize);
        let mut offset: u64 = 0;

        for _ in 0..geometry.block_count {
            let mut buf = [0u8; RECORD_LEN as usize];
            reader.read_exact(&mut buf)?;
            let record = BlockRecord::decode(&buf);

            entries.push(IndexEntry {
                tag: record.tag,
                payload_len: record.payload_len,
            });
            offsets.push(offset);

            // Skip this block's payload to land on the next record
            reader.seek(SeekFrom::Current(record.payload_len as i64))?;
            offset += RECORD_LEN + record.payload_len;
        }

        tracing::debug!(
            path = %path.display(),
            blocks = entries.len(),
            "metadata index loaded"
        );

        Ok(Self { entries, offsets })
    }

    /// Number of indexed blocks
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the index holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cached metadata for `slot`, if in range
    pub fn entry(&self, slot: u64) -> Option<&IndexEntry> {
        self.entries.get(slot as usize)
    }

    /// Cached record offset for `slot`, if in range
    pub fn offset_of(&self, slot: u64) -> Option<u64> {
        self.offsets.get(slot as usize).copied()
    }

    /// Iterate over `(slot, entry)` pairs in block order
    pub fn iter(&self) -> impl Iterator<Item = (u64, &IndexEntry)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(slot, entry)| (slot as u64, entry))
    }
}
