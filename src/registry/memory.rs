//! In-memory registry, used by tests and local dry runs.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use walkdir::WalkDir;

use super::{sort_most_recent_first, Run, RunRegistry};
use crate::error::PromoteError;

/// Registry backed by process memory: recorded runs plus, optionally, an
/// on-disk directory per run serving as its artifact bundle.
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    runs: HashMap<String, Vec<Run>>,
    bundles: HashMap<String, PathBuf>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a run under its experiment.
    pub fn record(&self, run: Run) {
        let mut inner = self.inner.lock().expect("registry lock poisoned");
        inner
            .runs
            .entry(run.experiment.clone())
            .or_default()
            .push(run);
    }

    /// Attach an on-disk artifact bundle directory to a run id.
    pub fn attach_bundle(&self, run_id: impl Into<String>, dir: impl Into<PathBuf>) {
        let mut inner = self.inner.lock().expect("registry lock poisoned");
        inner.bundles.insert(run_id.into(), dir.into());
    }
}

impl RunRegistry for MemoryRegistry {
    fn search(&self, experiment: &str) -> Result<Vec<Run>, PromoteError> {
        let inner = self.inner.lock().expect("registry lock poisoned");
        let mut runs = inner.runs.get(experiment).cloned().unwrap_or_default();
        sort_most_recent_first(&mut runs);
        Ok(runs)
    }

    fn download_artifacts(&self, run: &Run, dest: &Path) -> Result<(), PromoteError> {
        let bundle = {
            let inner = self.inner.lock().expect("registry lock poisoned");
            inner.bundles.get(&run.run_id).cloned()
        };
        let bundle = bundle.ok_or_else(|| PromoteError::RegistryUnavailable {
            detail: format!("no artifact bundle recorded for run '{}'", run.run_id),
        })?;

        copy_tree(&bundle, dest)
    }
}

fn copy_tree(src: &Path, dest: &Path) -> Result<(), PromoteError> {
    for entry in WalkDir::new(src).sort_by_file_name() {
        let entry = entry.map_err(|e| PromoteError::RegistryUnavailable {
            detail: format!("bundle traversal failed: {e}"),
        })?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .expect("walkdir yields paths under its root");
        let target = dest.join(relative);
        let io_err = |e: std::io::Error| PromoteError::RegistryUnavailable {
            detail: format!("bundle copy failed: {e}"),
        };
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(io_err)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
            fs::copy(entry.path(), &target).map_err(io_err)?;
        }
    }
    Ok(())
}
