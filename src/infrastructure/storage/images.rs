//! Vehicle image blob storage
//!
//! Images live outside the fleet tables: blobs are immutable once stored
//! and vehicles reference them by id, so a concurrent map with an atomic
//! id counter is enough. Id 1 is the permanent default image, seeded at
//! construction and refused by `delete`.

use std::sync::atomic::{AtomicI64, Ordering};

use dashmap::DashMap;

use crate::domain::DEFAULT_IMAGE_ID;

/// Smallest valid GIF, used as the default vehicle photo.
const DEFAULT_IMAGE_BYTES: &[u8] = &[
    0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x01, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00, 0x00, 0x00,
    0x00, 0xff, 0xff, 0xff, 0x21, 0xf9, 0x04, 0x01, 0x00, 0x00, 0x00, 0x00, 0x2c, 0x00, 0x00,
    0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x02, 0x02, 0x44, 0x01, 0x00, 0x3b,
];

pub struct ImageStore {
    images: DashMap<i64, Vec<u8>>,
    next_id: AtomicI64,
}

impl ImageStore {
    pub fn new() -> Self {
        let images = DashMap::new();
        images.insert(DEFAULT_IMAGE_ID, DEFAULT_IMAGE_BYTES.to_vec());
        Self {
            images,
            next_id: AtomicI64::new(DEFAULT_IMAGE_ID + 1),
        }
    }

    /// Stores a new blob and returns its id.
    pub fn store(&self, bytes: Vec<u8>) -> i64 {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.images.insert(id, bytes);
        id
    }

    pub fn get(&self, id: i64) -> Option<Vec<u8>> {
        self.images.get(&id).map(|entry| entry.value().clone())
    }

    pub fn contains(&self, id: i64) -> bool {
        self.images.contains_key(&id)
    }

    /// Removes a blob. The default image is permanent; deleting it is a
    /// no-op that returns false.
    pub fn delete(&self, id: i64) -> bool {
        if id == DEFAULT_IMAGE_ID {
            return false;
        }
        self.images.remove(&id).is_some()
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

impl Default for ImageStore {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ──────────────────────────────────────────────────────
