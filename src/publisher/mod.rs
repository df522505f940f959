//! GitOps publishing
//!
//! The configuration repository's remote is the durable record of desired
//! deployed state. Publishing clones into a scratch location, applies a
//! manifest mutation, and walks the state machine
//! `Cloned -> Patched -> Staged -> Committed -> Pushed`. Any failure before
//! `Pushed` discards the scratch clone and leaves the remote untouched.

mod git;

#[cfg(test)]
mod tests;

pub use git::GitPublisher;

use serde::{Deserialize, Serialize};

use crate::error::PromoteError;

/// Identifier of the promotion commit on the remote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitId(String);

impl CommitId {
    pub fn new(sha: impl Into<String>) -> Self {
        Self(sha.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CommitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Transitions of one publish attempt, reached strictly in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PublishState {
    /// No transition completed yet
    Init,
    Cloned,
    Patched,
    Staged,
    Committed,
    Pushed,
}

impl std::fmt::Display for PublishState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Init => "init",
            Self::Cloned => "cloned",
            Self::Patched => "patched",
            Self::Staged => "staged",
            Self::Committed => "committed",
            Self::Pushed => "pushed",
        };
        write!(f, "{name}")
    }
}

/// Service identity used as author and committer of promotion commits.
///
/// Fixed to automation rather than the invoking user, so promotion history
/// is attributable to the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitAuthor {
    pub name: String,
    pub email: String,
}

impl Default for CommitAuthor {
    fn default() -> Self {
        Self {
            name: "github-actions".to_string(),
            email: "github-actions@github.com".to_string(),
        }
    }
}

/// One requested manifest change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishRequest {
    /// Path of the manifest inside the repository
    pub manifest_path: String,
    /// Commit message, e.g. `Update model to run ID r1`
    pub commit_message: String,
}

/// Capability interface for publishing a manifest change to the GitOps
/// repository.
pub trait ManifestPublisher: Send + Sync {
    /// Apply `mutate` to the current manifest content and push the result as
    /// one commit. Returns the pushed commit's id.
    fn publish(
        &self,
        request: &PublishRequest,
        mutate: &dyn Fn(&str) -> Result<String, PromoteError>,
    ) -> Result<CommitId, PromoteError>;
}
