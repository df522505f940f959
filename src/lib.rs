// Library exports for the Promover promotion pipeline
pub mod config;
pub mod error;
pub mod manifest;
pub mod pipeline;
pub mod publisher;
pub mod registry;
pub mod stager;
pub mod storage;

// Re-export key types for convenience
pub use config::PromotionConfig;
pub use error::{PromoteError, StageFailure, StageName};
pub use pipeline::{PromotionPipeline, PromotionResult};
pub use publisher::{
    CommitAuthor, CommitId, GitPublisher, ManifestPublisher, PublishRequest, PublishState,
};
pub use registry::{HttpRegistry, MemoryRegistry, Run, RunRegistry};
pub use storage::{HttpObjectStore, MemoryObjectStore, ObjectStore, StorageLocation};
