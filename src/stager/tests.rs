//! Stager tests.

#![cfg(test)]

use chrono::{TimeZone, Utc};
use tempfile::TempDir;

use super::stage;
use crate::error::PromoteError;
use crate::registry::{MemoryRegistry, Run};
use crate::storage::{MemoryObjectStore, ObjectStore};

fn fixture_registry(files: &[(&str, &[u8])]) -> (MemoryRegistry, Run, TempDir) {
    let bundle = TempDir::new().unwrap();
    for (path, bytes) in files {
        let target = bundle.path().join(path);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(target, bytes).unwrap();
    }

    let run = Run::new("r1", "iris")
        .with_start_time(Utc.timestamp_opt(100, 0).single().unwrap())
        .with_artifact_uri("runs:/r1/model");
    let registry = MemoryRegistry::new();
    registry.record(run.clone());
    registry.attach_bundle("r1", bundle.path());
    (registry, run, bundle)
}

#[test]
fn test_stage_uploads_every_file_under_run_prefix() {
    let (registry, run, _bundle) =
        fixture_registry(&[("model.pkl", b"weights"), ("MLmodel", b"flavor: sklearn")]);
    let store = MemoryObjectStore::new();

    let location = stage(&registry, &store, &run, "ml-models", "iris").unwrap();

    assert_eq!(location.uri(), "s3://ml-models/models/iris/r1");
    assert_eq!(
        store.get("ml-models", "models/iris/r1/model.pkl"),
        Some(b"weights".to_vec())
    );
    assert_eq!(
        store.get("ml-models", "models/iris/r1/MLmodel"),
        Some(b"flavor: sklearn".to_vec())
    );
}

#[test]
fn test_stage_preserves_nested_relative_paths() {
    let (registry, run, _bundle) = fixture_registry(&[("conda/env.yaml", b"deps: []")]);
    let store = MemoryObjectStore::new();

    stage(&registry, &store, &run, "ml-models", "iris").unwrap();

    assert_eq!(
        store.get("ml-models", "models/iris/r1/conda/env.yaml"),
        Some(b"deps: []".to_vec())
    );
}

#[test]
fn test_staging_twice_is_idempotent() {
    let (registry, run, _bundle) = fixture_registry(&[("model.pkl", b"weights")]);
    let store = MemoryObjectStore::new();

    let first = stage(&registry, &store, &run, "ml-models", "iris").unwrap();
    let snapshot = store.get("ml-models", "models/iris/r1/model.pkl");
    let second = stage(&registry, &store, &run, "ml-models", "iris").unwrap();

    assert_eq!(first, second);
    assert_eq!(store.get("ml-models", "models/iris/r1/model.pkl"), snapshot);
    assert_eq!(store.len(), 1);
}

#[test]
fn test_empty_bundle_is_a_staging_error() {
    let (registry, run, _bundle) = fixture_registry(&[]);
    let store = MemoryObjectStore::new();

    let err = stage(&registry, &store, &run, "ml-models", "iris").unwrap_err();
    assert!(matches!(err, PromoteError::Staging { .. }));
}

/// Store that fails once a given number of objects have been accepted.
struct QuotaStore {
    inner: MemoryObjectStore,
    limit: usize,
}

impl ObjectStore for QuotaStore {
    fn put(&self, bucket: &str, path: &str, bytes: &[u8]) -> Result<(), PromoteError> {
        if self.inner.len() >= self.limit {
            return Err(PromoteError::Staging {
                detail: format!("upload of '{path}' failed: quota exceeded"),
                uploaded: Vec::new(),
            });
        }
        self.inner.put(bucket, path, bytes)
    }
}

#[test]
fn test_partial_upload_failure_lists_uploaded_files() {
    let (registry, run, _bundle) = fixture_registry(&[
        ("a.txt", b"1"),
        ("b.txt", b"2"),
        ("c.txt", b"3"),
        ("d.txt", b"4"),
        ("e.txt", b"5"),
    ]);
    let store = QuotaStore {
        inner: MemoryObjectStore::new(),
        limit: 2,
    };

    let err = stage(&registry, &store, &run, "ml-models", "iris").unwrap_err();
    match err {
        PromoteError::Staging { uploaded, .. } => {
            // Deterministic traversal order: a.txt and b.txt made it.
            assert_eq!(uploaded, vec!["a.txt".to_string(), "b.txt".to_string()]);
        }
        other => panic!("expected staging error, got {other:?}"),
    }
}

#[test]
fn test_auth_rejection_is_not_masked_as_staging() {
    struct RejectingStore;
    impl ObjectStore for RejectingStore {
        fn put(&self, _: &str, _: &str, _: &[u8]) -> Result<(), PromoteError> {
            Err(PromoteError::Auth {
                system: "object storage".to_string(),
                detail: "HTTP 403".to_string(),
            })
        }
    }

    let (registry, run, _bundle) = fixture_registry(&[("model.pkl", b"weights")]);
    let err = stage(&registry, &RejectingStore, &run, "ml-models", "iris").unwrap_err();
    assert!(matches!(err, PromoteError::Auth { .. }));
}
