//! Block metadata record
//!
//! The 16-byte header preceding every payload: an 8-byte tag and an
//! 8-byte payload length, both little-endian.

use super::RECORD_LEN;

/// One block's metadata record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockRecord {
    /// Block tag: the ordinal index, except for the sentinel block
    pub tag: u64,

    /// Length in bytes of the payload that follows this record
    pub payload_len: u64,
}

impl BlockRecord {
    /// Encode into the on-disk wire form
    pub fn encode(&self) -> [u8; RECORD_LEN as usize] {
        let mut buf = [0u8; RECORD_LEN as usize];
        buf[0..8].copy_from_slice(&self.tag.to_le_bytes());
        buf[8..16].copy_from_slice(&self.payload_len.to_le_bytes());
        buf
    }

    /// Decode from the on-disk wire form
    pub fn decode(buf: &[u8; RECORD_LEN as usize]) -> Self {
        let tag = u64::from_le_bytes(buf[0..8].try_into().unwrap());
        let payload_len = u64::from_le_bytes(buf[8..16].try_into().unwrap());
        Self { tag, payload_len }
    }
}
