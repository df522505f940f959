//! In-memory object store, used by tests and local dry runs.

use std::collections::BTreeMap;
use std::sync::Mutex;

use super::ObjectStore;
use crate::error::PromoteError;

/// Object store backed by a process-local map keyed by `<bucket>/<path>`.
#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    objects: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes stored at `bucket`/`path`, if any.
    pub fn get(&self, bucket: &str, path: &str) -> Option<Vec<u8>> {
        let objects = self.objects.lock().expect("store lock poisoned");
        objects.get(&format!("{bucket}/{path}")).cloned()
    }

    /// All stored keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let objects = self.objects.lock().expect("store lock poisoned");
        objects.keys().cloned().collect()
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.objects.lock().expect("store lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ObjectStore for MemoryObjectStore {
    fn put(&self, bucket: &str, path: &str, bytes: &[u8]) -> Result<(), PromoteError> {
        let mut objects = self.objects.lock().expect("store lock poisoned");
        objects.insert(format!("{bucket}/{path}"), bytes.to_vec());
        Ok(())
    }
}
