//! Block Store
//!
//! Serves single and batched fetch requests by key against one device file.
//!
//! ## Fetch Pipeline
//! ```text
//! key ──hash──► slot ──offset──► metadata record ──seek──► payload
//! ```
//!
//! Slot resolution is purely positional: a key maps to
//! `hash(key) % block_count` and never consults the tags stored on disk.
//! Two distinct keys may resolve to the same slot; the store does not
//! attempt to detect or resolve such collisions.

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use bytes::{Bytes, BytesMut};
use parking_lot::RwLock;

use crate::config::Geometry;
use crate::device::{BlockRecord, RECORD_LEN};
use crate::error::{Result, VaultError};

use super::index::MetadataIndex;

/// Result of one fetch: the requesting key and the block's payload.
///
/// Ephemeral; constructed per fetch call and owned by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseData {
    /// The key the caller asked for
    pub key: String,

    /// The resolved block's payload bytes
    pub payload: Bytes,
}

/// Read-only store over an existing device file.
///
/// ## Concurrency:
/// - The file is immutable; every fetch opens an independent handle
/// - Each fetch allocates its own output buffer (never shared)
/// - `index`: the only shared mutable state, guarded by RwLock
/// - All methods take `&self`
pub struct BlockStore {
    /// Path to the device file
    path: PathBuf,

    /// Layout parameters (must match the writer's)
    geometry: Geometry,

    /// Optional metadata cache; `None` until loaded
    index: RwLock<Option<MetadataIndex>>,
}

impl BlockStore {
    /// Open a store and load the metadata index.
    ///
    /// Fails if the file is missing, unreadable, or too short to hold the
    /// geometry's block count.
    pub fn open(path: impl AsRef<Path>, geometry: Geometry) -> Result<Self> {
        let store = Self::open_unindexed(path, geometry)?;
        store.load_index()?;
        Ok(store)
    }

    /// Open a store without building the index.
    ///
    /// Every size lookup falls back to a direct read of that one record;
    /// offsets are recomputed per call. `load_index` can upgrade later.
    pub fn open_unindexed(path: impl AsRef<Path>, geometry: Geometry) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        // Probe now so a missing or unreadable device fails at open, not
        // on the first fetch.
        File::open(&path)?;

        Ok(Self {
            path,
            geometry,
            index: RwLock::new(None),
        })
    }

    /// The store's layout parameters
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Scan the device file once and cache all block metadata.
    ///
    /// Idempotent: a second call rescans and replaces the cache.
    pub fn load_index(&self) -> Result<()> {
        let index = MetadataIndex::load(&self.path, &self.geometry)?;
        *self.index.write() = Some(index);
        Ok(())
    }

    /// Run `f` against the loaded index, if any
    pub fn with_index<R>(&self, f: impl FnOnce(&MetadataIndex) -> R) -> Option<R> {
        self.index.read().as_ref().map(f)
    }

    // =========================================================================
    // Fetch Pipeline
    // =========================================================================

    /// Map a key to its slot: `hash(key) % block_count`.
    ///
    /// Pure function of the key; deterministic across processes and
    /// platforms. Distinct keys may collide.
    pub fn slot_for(&self, key: &str) -> u64 {
        crc32fast::hash(key.as_bytes()) as u64 % self.geometry.block_count
    }

    /// Byte offset of `slot`'s metadata record: O(1) when the index is
    /// loaded, otherwise the geometry's running-total computation.
    fn offset_of(&self, slot: u64) -> u64 {
        if let Some(offset) = self.with_index(|index| index.offset_of(slot)).flatten() {
            return offset;
        }
        self.geometry.offset_of(slot)
    }

    /// Read `slot`'s metadata record straight from the file
    fn read_record(&self, slot: u64) -> Result<BlockRecord> {
        let mut reader = BufReader::new(File::open(&self.path)?);
        reader.seek(SeekFrom::Start(self.offset_of(slot)))?;

        let mut buf = [0u8; RECORD_LEN as usize];
        reader.read_exact(&mut buf)?;
        Ok(BlockRecord::decode(&buf))
    }

    /// Resolve a key to `(slot, payload_len)`, guarding against corrupt
    /// size fields.
    fn resolve(&self, key: &str) -> Result<(u64, u64)> {
        let slot = self.slot_for(key);

        let payload_len = match self.with_index(|index| index.entry(slot).copied()).flatten() {
            Some(entry) => entry.payload_len,
            None => self.read_record(slot)?.payload_len,
        };

        if payload_len > self.geometry.max_payload_len {
            return Err(VaultError::Corruption(format!(
                "block {} declares {} payload bytes, limit is {}",
                slot, payload_len, self.geometry.max_payload_len
            )));
        }

        Ok((slot, payload_len))
    }

    /// Payload length of the block `key` resolves to
    pub fn block_size_for(&self, key: &str) -> Result<u64> {
        self.resolve(key).map(|(_, payload_len)| payload_len)
    }

    /// Read exactly `payload_len` bytes of `slot`'s payload.
    ///
    /// Opens an independent file handle and allocates a fresh buffer, so
    /// concurrent calls never share state. A short read is an error, never
    /// a truncated or padded result.
    pub fn read_payload(&self, slot: u64, payload_len: u64) -> Result<Bytes> {
        let mut reader = BufReader::new(File::open(&self.path)?);
        reader.seek(SeekFrom::Start(self.offset_of(slot) + RECORD_LEN))?;

        let mut buf = BytesMut::zeroed(payload_len as usize);
        reader.read_exact(&mut buf)?;
        Ok(buf.freeze())
    }

    /// Fetch the payload a key resolves to.
    ///
    /// Any failure is returned as a typed error naming the key; there is no
    /// empty-result sentinel.
    pub fn fetch(&self, key: &str) -> Result<ResponseData> {
        let (slot, payload_len) = self
            .resolve(key)
            .map_err(|e| VaultError::for_key(key, e))?;

        tracing::trace!(key, slot, payload_len, "fetch");

        let payload = self
            .read_payload(slot, payload_len)
            .map_err(|e| VaultError::for_key(key, e))?;

        Ok(ResponseData {
            key: key.to_string(),
            payload,
        })
    }

    /// Fetch many keys concurrently, one worker per key.
    ///
    /// Results come back in input order regardless of completion order.
    /// Each worker opens its own file handle and owns its own buffer. The
    /// first failure observed during assembly aborts the batch; there are
    /// no partial results.
    pub fn fetch_many<S>(&self, keys: &[S]) -> Result<Vec<ResponseData>>
    where
        S: AsRef<str> + Sync,
    {
        tracing::debug!(count = keys.len(), "batch fetch");

        let outcomes: Vec<Result<ResponseData>> = crossbeam::thread::scope(|scope| {
            let workers: Vec<_> = keys
                .iter()
                .map(|key| scope.spawn(move |_| self.fetch(key.as_ref())))
                .collect();

            workers
                .into_iter()
                .map(|worker| worker.join().expect("fetch worker panicked"))
                .collect()
        })
        .expect("batch fetch scope panicked");

        outcomes.into_iter().collect()
    }
}
