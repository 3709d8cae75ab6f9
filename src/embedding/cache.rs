//! Identity-keyed cache of verse embeddings.

use ahash::AHashMap;
use parking_lot::Mutex;

use crate::corpus::VerseKey;
use crate::vector::Vector;

/// Shared cache of verse embeddings keyed by verse identity.
///
/// Semantic retrieval seeds the cache with vectors returned by the index,
/// and deduplication consults it before calling the embedder. Verse
/// embeddings never change for a given model, so entries are kept for the
/// lifetime of the pipeline; the corpus bounds the size.
#[derive(Debug, Default)]
pub struct EmbeddingCache {
    inner: Mutex<AHashMap<VerseKey, Vector>>,
}

impl EmbeddingCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        EmbeddingCache {
            inner: Mutex::new(AHashMap::new()),
        }
    }

    /// Get the cached embedding for a verse, if present.
    pub fn get(&self, key: &VerseKey) -> Option<Vector> {
        self.inner.lock().get(key).cloned()
    }

    /// Store the embedding for a verse.
    pub fn insert(&self, key: VerseKey, vector: Vector) {
        self.inner.lock().insert(key, vector);
    }

    /// Number of cached embeddings.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let cache = EmbeddingCache::new();
        let key = VerseKey::new("Al-Fatihah", 1);
        assert!(cache.get(&key).is_none());

        cache.insert(key.clone(), Vector::new(vec![0.1, 0.2]));
        let cached = cache.get(&key).unwrap();
        assert_eq!(cached.data, vec![0.1, 0.2]);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_insert_overwrites() {
        let cache = EmbeddingCache::new();
        let key = VerseKey::new("Al-Fatihah", 1);
        cache.insert(key.clone(), Vector::new(vec![0.1]));
        cache.insert(key.clone(), Vector::new(vec![0.9]));
        assert_eq!(cache.get(&key).unwrap().data, vec![0.9]);
        assert_eq!(cache.len(), 1);
    }
}
