//! Artifact staging
//!
//! Materializes a run's artifact bundle into a scratch directory, then uploads
//! every file under the run's deterministic storage location. The scratch
//! directory is a [`tempfile::TempDir`], so it is removed on every exit path.
//!
//! Staging is idempotent: the destination is derived from the run id alone, so
//! retrying uploads the same bytes to the same keys.

#[cfg(test)]
mod tests;

use std::fs;

use tempfile::TempDir;
use tracing::{debug, info, instrument};
use walkdir::WalkDir;

use crate::error::PromoteError;
use crate::registry::{Run, RunRegistry};
use crate::storage::{ObjectStore, StorageLocation};

/// Download `run`'s bundle and upload it to `models/<model_name>/<run_id>/…`
/// in `bucket`.
///
/// Any single-file failure is fatal to the whole call; the error carries the
/// relative paths already uploaded so an operator can clean up or resume.
#[instrument(skip(registry, store, run), fields(run_id = %run.run_id))]
pub fn stage(
    registry: &dyn RunRegistry,
    store: &dyn ObjectStore,
    run: &Run,
    bucket: &str,
    model_name: &str,
) -> Result<StorageLocation, PromoteError> {
    let scratch = TempDir::new().map_err(|e| PromoteError::Staging {
        detail: format!("failed to create scratch directory: {e}"),
        uploaded: Vec::new(),
    })?;

    registry.download_artifacts(run, scratch.path())?;

    let location = StorageLocation::for_run(bucket, model_name, &run.run_id);
    let files = bundle_files(scratch.path())?;
    if files.is_empty() {
        return Err(PromoteError::Staging {
            detail: format!("artifact bundle for run '{}' is empty", run.run_id),
            uploaded: Vec::new(),
        });
    }

    let mut uploaded: Vec<String> = Vec::with_capacity(files.len());
    for relative in &files {
        let bytes = fs::read(scratch.path().join(relative)).map_err(|e| {
            PromoteError::Staging {
                detail: format!("failed to read '{relative}': {e}"),
                uploaded: uploaded.clone(),
            }
        })?;

        store
            .put(bucket, &location.key_for(relative), &bytes)
            .map_err(|e| attach_uploaded(e, &uploaded))?;

        debug!(file = relative.as_str(), "uploaded bundle file");
        uploaded.push(relative.clone());
    }

    info!(
        run_id = %run.run_id,
        destination = %location,
        files = uploaded.len(),
        "artifact bundle staged"
    );
    Ok(location)
}

/// Relative paths of every file in the bundle, in deterministic order.
fn bundle_files(root: &std::path::Path) -> Result<Vec<String>, PromoteError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| PromoteError::Staging {
            detail: format!("bundle traversal failed: {e}"),
            uploaded: Vec::new(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(root)
            .expect("walkdir yields paths under its root");
        // Storage keys use forward slashes regardless of host platform.
        let key = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        files.push(key);
    }
    Ok(files)
}

/// Rewrite a store error so it carries the files uploaded so far.
fn attach_uploaded(error: PromoteError, uploaded: &[String]) -> PromoteError {
    match error {
        PromoteError::Staging { detail, .. } => PromoteError::Staging {
            detail,
            uploaded: uploaded.to_vec(),
        },
        other => other,
    }
}
