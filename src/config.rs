//! Configuration for BlockVault
//!
//! The device geometry is an explicit immutable value passed to both the
//! writer and the store, so tests can vary block counts and size limits
//! without touching process-wide globals.

use crate::device::RECORD_LEN;

/// Immutable layout parameters shared by the device writer and the store.
///
/// The default geometry reproduces the production device: 100 blocks,
/// 512-byte base payload growing by one byte per block, 1 MiB sanity cap.
#[derive(Debug, Clone)]
pub struct Geometry {
    /// Number of blocks in the device file
    pub block_count: u64,

    /// Payload length of block 0; block `i` holds `base_payload_len + i` bytes
    pub base_payload_len: u64,

    /// Upper bound on any declared payload length (corruption guard)
    pub max_payload_len: u64,

    /// Well-known key whose hash tags the sentinel block
    pub known_key: String,

    /// Block index stamped with the sentinel tag instead of its ordinal
    pub sentinel_slot: u64,
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            block_count: 100,
            base_payload_len: 512,
            max_payload_len: 1024 * 1024, // 1 MiB
            known_key: "known_hash_7".to_string(),
            sentinel_slot: 1,
        }
    }
}

impl Geometry {
    /// Create a new geometry builder
    pub fn builder() -> GeometryBuilder {
        GeometryBuilder::default()
    }

    /// Payload length of block `block`
    pub fn payload_len(&self, block: u64) -> u64 {
        self.base_payload_len + block
    }

    /// Fill byte written into every payload byte of block `block`
    pub fn fill_byte(&self, block: u64) -> u8 {
        b'A' + (block % 26) as u8
    }

    /// Byte offset of block `block`'s metadata record within the file.
    ///
    /// Blocks are variable length, so this is the running total of
    /// record-plus-payload sizes of all preceding blocks. O(block); the
    /// store's index precomputes a cumulative table for O(1) lookups.
    pub fn offset_of(&self, block: u64) -> u64 {
        let mut offset = block * RECORD_LEN;
        for i in 0..block {
            offset += self.payload_len(i);
        }
        offset
    }

    /// Expected total device file length
    pub fn total_len(&self) -> u64 {
        self.offset_of(self.block_count)
    }

    /// Tag value stamped into the sentinel block: the stable hash of the
    /// well-known key, widened to the record's tag width.
    pub fn sentinel_tag(&self) -> u64 {
        crc32fast::hash(self.known_key.as_bytes()) as u64
    }
}

/// Builder for Geometry
#[derive(Default)]
pub struct GeometryBuilder {
    geometry: Geometry,
}

impl GeometryBuilder {
    /// Set the number of blocks in the device
    pub fn block_count(mut self, count: u64) -> Self {
        self.geometry.block_count = count;
        self
    }

    /// Set the payload length of block 0
    pub fn base_payload_len(mut self, len: u64) -> Self {
        self.geometry.base_payload_len = len;
        self
    }

    /// Set the maximum accepted payload length
    pub fn max_payload_len(mut self, len: u64) -> Self {
        self.geometry.max_payload_len = len;
        self
    }

    /// Set the well-known sentinel key
    pub fn known_key(mut self, key: impl Into<String>) -> Self {
        self.geometry.known_key = key.into();
        self
    }

    /// Set the block index carrying the sentinel tag
    pub fn sentinel_slot(mut self, slot: u64) -> Self {
        self.geometry.sentinel_slot = slot;
        self
    }

    pub fn build(self) -> Geometry {
        self.geometry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_geometry_matches_device_constants() {
        let g = Geometry::default();
        assert_eq!(g.block_count, 100);
        assert_eq!(g.payload_len(0), 512);
        assert_eq!(g.payload_len(99), 611);
        assert_eq!(g.fill_byte(0), b'A');
        assert_eq!(g.fill_byte(27), b'B');
    }

    #[test]
    fn offsets_are_running_totals() {
        let g = Geometry::default();
        assert_eq!(g.offset_of(0), 0);
        assert_eq!(g.offset_of(1), RECORD_LEN + 512);
        assert_eq!(g.offset_of(2), 2 * RECORD_LEN + 512 + 513);
    }

    #[test]
    fn total_len_matches_closed_formula() {
        let g = Geometry::default();
        // 100 * 16 + sum_{i=0}^{99} (512 + i)
        let expected = 100 * RECORD_LEN + (0..100u64).map(|i| 512 + i).sum::<u64>();
        assert_eq!(g.total_len(), expected);
    }

    #[test]
    fn builder_overrides_defaults() {
        let g = Geometry::builder()
            .block_count(4)
            .base_payload_len(8)
            .max_payload_len(64)
            .known_key("fixture")
            .sentinel_slot(2)
            .build();
        assert_eq!(g.block_count, 4);
        assert_eq!(g.payload_len(3), 11);
        assert_eq!(g.total_len(), 4 * RECORD_LEN + 8 + 9 + 10 + 11);
        assert_eq!(g.sentinel_tag(), crc32fast::hash(b"fixture") as u64);
    }
}
