//! Image storage boundary.
//!
//! Product and event imagery is uploaded by admins and served back by
//! stored name. Only JPEGs are accepted, and every stored object is named
//! `{key}.jpeg` so the serving path never has to guess a content type.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::Result;

/// Largest accepted upload, in bytes.
pub const MAX_IMAGE_BYTES: usize = 3_000_000;

/// Interface to the image storage backend.
#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn put(&self, name: &str, data: Vec<u8>) -> Result<()>;
    async fn get(&self, name: &str) -> Result<Option<Vec<u8>>>;
    async fn delete(&self, name: &str) -> Result<()>;
}

/// An [`ImageStore`] backed by process memory.
#[derive(Default)]
pub struct MemoryImageStore {
    inner: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryImageStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ImageStore for MemoryImageStore {
    async fn put(&self, name: &str, data: Vec<u8>) -> Result<()> {
        self.inner.write().insert(name.to_string(), data);
        Ok(())
    }

    async fn get(&self, name: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.inner.read().get(name).cloned())
    }

    async fn delete(&self, name: &str) -> Result<()> {
        self.inner.write().remove(name);
        Ok(())
    }
}

/// Whether the bytes carry a JPEG magic number.
pub fn is_jpeg(data: &[u8]) -> bool {
    data.starts_with(&[0xFF, 0xD8, 0xFF])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get_delete() {
        let store = MemoryImageStore::new();
        store.put("poster.jpeg", vec![1, 2, 3]).await.unwrap();
        assert_eq!(store.get("poster.jpeg").await.unwrap(), Some(vec![1, 2, 3]));

        store.delete("poster.jpeg").await.unwrap();
        assert_eq!(store.get("poster.jpeg").await.unwrap(), None);
    }

    #[test]
    fn test_jpeg_sniff() {
        assert!(is_jpeg(&[0xFF, 0xD8, 0xFF, 0xE0, 0x00]));
        assert!(!is_jpeg(&[0x89, 0x50, 0x4E, 0x47])); // PNG
        assert!(!is_jpeg(&[]));
    }
}
