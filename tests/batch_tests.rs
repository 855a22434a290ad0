//! Tests for the batch fetch path
//!
//! These tests verify:
//! - Results come back in input order
//! - Batch results match single-fetch results byte for byte
//! - The documented sample-key scenario
//! - First failure aborts the batch and names the key
//! - Concurrent batches over a shared store stay independent

use std::io::{Seek, SeekFrom, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use blockvault::{BlockStore, DeviceBuilder, Geometry, VaultError};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_store() -> (TempDir, BlockStore) {
    let temp_dir = TempDir::new().unwrap();
    let path: PathBuf = temp_dir.path().join("device.dat");
    DeviceBuilder::new(&path, Geometry::default()).build().unwrap();
    let store = BlockStore::open(&path, Geometry::default()).unwrap();
    (temp_dir, store)
}

// =============================================================================
// Ordering Tests
// =============================================================================

#[test]
fn test_sample_scenario() {
    let (_temp, store) = setup_store();

    let keys = vec![
        "sample_hash_1".to_string(),
        "sample_hash_2".to_string(),
        "sample_hash_3".to_string(),
    ];
    let responses = store.fetch_many(&keys).unwrap();

    assert_eq!(responses.len(), 3);
    for (response, key) in responses.iter().zip(&keys) {
        assert_eq!(&response.key, key);
        assert!(!response.payload.is_empty());
        assert_eq!(
            response.payload.len() as u64,
            store.block_size_for(key).unwrap()
        );
    }
}

#[test]
fn test_results_preserve_input_order() {
    let (_temp, store) = setup_store();

    let keys: Vec<String> = (0..40).map(|n| format!("batch_key_{}", n)).collect();
    let responses = store.fetch_many(&keys).unwrap();

    assert_eq!(responses.len(), keys.len());
    for (response, key) in responses.iter().zip(&keys) {
        assert_eq!(&response.key, key);
    }
}

#[test]
fn test_batch_matches_single_fetches() {
    let (_temp, store) = setup_store();

    let keys: Vec<String> = (0..16).map(|n| format!("pair_key_{}", n)).collect();
    let batch = store.fetch_many(&keys).unwrap();

    for (response, key) in batch.iter().zip(&keys) {
        let single = store.fetch(key).unwrap();
        assert_eq!(response, &single);
    }
}

#[test]
fn test_empty_batch() {
    let (_temp, store) = setup_store();

    let responses = store.fetch_many::<String>(&[]).unwrap();
    assert!(responses.is_empty());
}

// =============================================================================
// Failure Tests
// =============================================================================

#[test]
fn test_first_failure_aborts_batch() {
    let geometry = Geometry::builder()
        .block_count(5)
        .base_payload_len(16)
        .max_payload_len(128)
        .sentinel_slot(1)
        .build();

    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("device.dat");
    DeviceBuilder::new(&path, geometry.clone()).build().unwrap();

    // Corrupt block 3's declared length (offset: 3 records + payloads 16+17+18)
    let record_offset = 3 * 16 + 16 + 17 + 18;
    let mut file = std::fs::OpenOptions::new().write(true).open(&path).unwrap();
    file.seek(SeekFrom::Start(record_offset + 8)).unwrap();
    file.write_all(&(4096u64).to_le_bytes()).unwrap();
    file.sync_all().unwrap();

    let store = BlockStore::open_unindexed(&path, geometry).unwrap();

    let good = (0u64..)
        .map(|n| format!("ok_{}", n))
        .find(|k| store.slot_for(k) != 3)
        .unwrap();
    let bad = (0u64..)
        .map(|n| format!("bad_{}", n))
        .find(|k| store.slot_for(k) == 3)
        .unwrap();

    let keys = vec![good, bad.clone()];
    match store.fetch_many(&keys) {
        Err(VaultError::Fetch { key, .. }) => assert_eq!(key, bad),
        other => panic!("expected batch failure, got {:?}", other.map(|r| r.len())),
    }
}

// =============================================================================
// Concurrency Tests
// =============================================================================

#[test]
fn test_concurrent_batches_are_independent() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("device.dat");
    DeviceBuilder::new(&path, Geometry::default()).build().unwrap();
    let store = Arc::new(BlockStore::open(&path, Geometry::default()).unwrap());

    let num_threads = 8;
    let mut handles = vec![];

    for thread_id in 0..num_threads {
        let store = Arc::clone(&store);
        let handle = thread::spawn(move || {
            let keys: Vec<String> = (0..20)
                .map(|n| format!("thread_{}_key_{}", thread_id, n))
                .collect();
            let responses = store.fetch_many(&keys).unwrap();

            // Every payload must be the resolved slot's fill pattern,
            // untouched by fetches running on other threads
            for (response, key) in responses.iter().zip(&keys) {
                let slot = store.slot_for(key);
                let fill = b'A' + (slot % 26) as u8;
                assert_eq!(&response.key, key);
                assert_eq!(response.payload.len() as u64, 512 + slot);
                assert!(response.payload.iter().all(|&b| b == fill));
            }
        });
        handles.push(handle);
    }

    for handle in handles {
        handle.join().unwrap();
    }
}
