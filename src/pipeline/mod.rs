//! Promotion pipeline orchestration.
//!
//! Sequences the promotion stages strictly in order:
//! 1. Resolve - latest run for the experiment, from the registry
//! 2. Stage - artifact bundle into versioned object storage
//! 3. Publish - manifest patch committed and pushed to the GitOps repository
//!
//! There is no compensation across stage boundaries. A staged artifact with a
//! failed publish is inert: storage is content-addressed by run id, the
//! manifest still points at the previous model, and re-running the whole
//! pipeline for the same run is safe.

mod execution;
mod types;


pub use execution::PromotionPipeline;
pub use types::PromotionResult;
