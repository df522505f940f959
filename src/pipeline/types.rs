//! Pipeline result types.

use serde::{Deserialize, Serialize};

use crate::publisher::CommitId;
use crate::storage::StorageLocation;

/// Outcome of a successful promotion: the run that is now the desired
/// deployed model, where its artifacts live, and the commit recording it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromotionResult {
    pub run_id: String,
    pub storage_location: StorageLocation,
    pub commit_id: CommitId,
}
