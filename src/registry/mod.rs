//! Experiment registry client
//!
//! Resolves "latest run" for a named experiment and materializes run artifact
//! bundles. The backing store is abstracted behind [`RunRegistry`] so the
//! orchestrator can run against the REST client or an in-memory registry
//! without changes.
//!
//! Ordering contract: `search` returns runs sorted by start time descending,
//! ties broken by run id descending. The contract is pinned here rather than
//! inherited from whatever the backend happens to do.

mod client;
mod memory;
mod types;


pub use client::HttpRegistry;
pub use memory::MemoryRegistry;
pub use types::Run;

use std::path::Path;

use crate::error::PromoteError;

/// Capability interface for the experiment-tracking registry
pub trait RunRegistry: Send + Sync {
    /// All runs recorded under `experiment`, most recent first.
    fn search(&self, experiment: &str) -> Result<Vec<Run>, PromoteError>;

    /// Materialize the run's artifact bundle into `dest`, preserving the
    /// bundle's relative file layout.
    fn download_artifacts(&self, run: &Run, dest: &Path) -> Result<(), PromoteError>;

    /// The most recent run recorded under `experiment`.
    fn latest_run(&self, experiment: &str) -> Result<Run, PromoteError> {
        self.search(experiment)?
            .into_iter()
            .next()
            .ok_or_else(|| PromoteError::NotFound {
                experiment: experiment.to_string(),
            })
    }
}

/// Sort runs into the contract order: start time descending, run id
/// descending as the tie-break.
pub(crate) fn sort_most_recent_first(runs: &mut [Run]) {
    runs.sort_by(|a, b| {
        b.start_time
            .cmp(&a.start_time)
            .then_with(|| b.run_id.cmp(&a.run_id))
    });
}
