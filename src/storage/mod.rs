//! Durable object storage capability
//!
//! Destination layout is fixed: `models/<model-name>/<run_id>/<relative_path>`.
//! Each run id maps to a unique prefix, so re-uploading the same run overwrites
//! the same keys with identical bytes and the whole upload is idempotent.

mod http;
mod memory;


pub use http::HttpObjectStore;
pub use memory::MemoryObjectStore;

use serde::{Deserialize, Serialize};

use crate::error::PromoteError;

/// A version-qualified destination in object storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageLocation {
    pub bucket: String,
    pub path: String,
}

impl StorageLocation {
    /// The deterministic destination for one run of one model.
    pub fn for_run(bucket: impl Into<String>, model_name: &str, run_id: &str) -> Self {
        Self {
            bucket: bucket.into(),
            path: format!("models/{model_name}/{run_id}"),
        }
    }

    /// Render the `s3://bucket/path` form written into the manifest.
    pub fn uri(&self) -> String {
        format!("s3://{}/{}", self.bucket, self.path)
    }

    /// Key for one file inside this location.
    pub fn key_for(&self, relative_path: &str) -> String {
        format!("{}/{relative_path}", self.path)
    }
}

impl std::fmt::Display for StorageLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.uri())
    }
}

/// Capability interface for durable object storage
pub trait ObjectStore: Send + Sync {
    /// Store `bytes` at `bucket`/`path`, overwriting any existing object.
    fn put(&self, bucket: &str, path: &str, bytes: &[u8]) -> Result<(), PromoteError>;
}
