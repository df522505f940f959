//! Promotion pipeline errors
//!
//! One error kind per failure surface, so callers can distinguish transient
//! network trouble (registry unreachable, push rejected) from structural
//! problems (no runs recorded, manifest missing the target field).

use thiserror::Error;

use crate::publisher::PublishState;

/// Errors that can occur during a promotion
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PromoteError {
    #[error("registry unavailable: {detail}")]
    RegistryUnavailable { detail: String },

    #[error("no runs recorded for experiment '{experiment}'")]
    NotFound { experiment: String },

    #[error("staging failed: {detail} ({} files already uploaded)", .uploaded.len())]
    Staging {
        detail: String,
        /// Relative paths uploaded before the failure, for manual cleanup or resume.
        uploaded: Vec<String>,
    },

    #[error("manifest schema error at '{field_path}': {detail}")]
    Schema { field_path: String, detail: String },

    #[error("push rejected by remote: {detail}")]
    PublishConflict { detail: String },

    #[error("credential rejected by {system}: {detail}")]
    Auth { system: String, detail: String },

    #[error("publish failed after reaching {state}: {detail}")]
    Publish { state: PublishState, detail: String },
}

/// A stage failure as surfaced by the orchestrator: the stage that failed,
/// the run under promotion (when one had been resolved), and the untouched
/// underlying cause.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("promotion failed at {stage} stage{}: {source}", run_display(.run_id))]
pub struct StageFailure {
    pub stage: StageName,
    pub run_id: Option<String>,
    #[source]
    pub source: PromoteError,
}

fn run_display(run_id: &Option<String>) -> String {
    match run_id {
        Some(id) => format!(" (run {id})"),
        None => String::new(),
    }
}

/// Pipeline stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageName {
    /// Resolve the latest run from the registry
    Resolve,
    /// Download the artifact bundle and upload it to object storage
    Stage,
    /// Patch the manifest and push the promotion commit
    Publish,
}

impl std::fmt::Display for StageName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Resolve => write!(f, "resolve"),
            Self::Stage => write!(f, "stage"),
            Self::Publish => write!(f, "publish"),
        }
    }
}

impl StageFailure {
    pub fn new(stage: StageName, run_id: Option<String>, source: PromoteError) -> Self {
        Self {
            stage,
            run_id,
            source,
        }
    }
}
