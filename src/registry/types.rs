//! Run record types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One completed training execution recorded by the experiment registry.
///
/// Immutable from the pipeline's point of view: identity is `run_id`, and
/// nothing downstream ever writes back to the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    /// Opaque registry-assigned identifier
    pub run_id: String,
    /// Experiment the run was recorded under
    pub experiment: String,
    /// Opaque locator for the run's artifact bundle
    pub artifact_uri: String,
    /// When the run started, per the registry's own clock
    pub start_time: DateTime<Utc>,
}

impl Run {
    pub fn new(run_id: impl Into<String>, experiment: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            experiment: experiment.into(),
            artifact_uri: String::new(),
            start_time: Utc::now(),
        }
    }

    pub fn with_artifact_uri(mut self, uri: impl Into<String>) -> Self {
        self.artifact_uri = uri.into();
        self
    }

    pub fn with_start_time(mut self, start_time: DateTime<Utc>) -> Self {
        self.start_time = start_time;
        self
    }
}
