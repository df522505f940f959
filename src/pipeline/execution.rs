//! Pipeline execution engine.

use std::sync::Arc;

use tracing::{debug, info};

use super::types::PromotionResult;
use crate::config::PromotionConfig;
use crate::error::{PromoteError, StageFailure, StageName};
use crate::manifest;
use crate::publisher::{ManifestPublisher, PublishRequest};
use crate::registry::{Run, RunRegistry};
use crate::stager;
use crate::storage::ObjectStore;

/// Main promotion pipeline.
///
/// The three external systems are injected as capabilities at construction,
/// so the same orchestration runs against production backends or in-memory
/// fakes.
pub struct PromotionPipeline {
    registry: Arc<dyn RunRegistry>,
    store: Arc<dyn ObjectStore>,
    publisher: Arc<dyn ManifestPublisher>,
    config: PromotionConfig,
}

impl PromotionPipeline {
    pub fn new(
        registry: Arc<dyn RunRegistry>,
        store: Arc<dyn ObjectStore>,
        publisher: Arc<dyn ManifestPublisher>,
        config: PromotionConfig,
    ) -> Self {
        Self {
            registry,
            store,
            publisher,
            config,
        }
    }

    pub fn config(&self) -> &PromotionConfig {
        &self.config
    }

    /// Stage 1 only: the run that would be promoted. Used by dry runs.
    pub fn resolve(&self) -> Result<Run, StageFailure> {
        let run = self
            .registry
            .latest_run(&self.config.experiment)
            .map_err(|e| StageFailure::new(StageName::Resolve, None, e))?;
        info!(
            experiment = %self.config.experiment,
            run_id = %run.run_id,
            started = %run.start_time,
            "resolved latest run"
        );
        Ok(run)
    }

    /// Run the complete pipeline.
    pub fn run(&self) -> Result<PromotionResult, StageFailure> {
        info!(
            experiment = %self.config.experiment,
            model = %self.config.model_name,
            "starting promotion"
        );

        let run = self.resolve()?;
        let fail = |stage: StageName, source: PromoteError| {
            StageFailure::new(stage, Some(run.run_id.clone()), source)
        };

        let location = stager::stage(
            self.registry.as_ref(),
            self.store.as_ref(),
            &run,
            &self.config.bucket,
            &self.config.model_name,
        )
        .map_err(|e| fail(StageName::Stage, e))?;
        info!(run_id = %run.run_id, destination = %location, "artifacts staged");

        let field_path = manifest::storage_uri_path(&self.config.framework)
            .map_err(|e| fail(StageName::Publish, e))?;
        let storage_uri = location.uri();
        debug!(field = %field_path, value = %storage_uri, "manifest mutation prepared");

        let request = PublishRequest {
            manifest_path: self.config.manifest_path.clone(),
            commit_message: format!("Update model to run ID {}", run.run_id),
        };
        let commit_id = self
            .publisher
            .publish(&request, &|raw| {
                manifest::patch(raw, &field_path, &storage_uri)
            })
            .map_err(|e| fail(StageName::Publish, e))?;

        info!(
            run_id = %run.run_id,
            commit = %commit_id,
            "promotion complete"
        );
        Ok(PromotionResult {
            run_id: run.run_id,
            storage_location: location,
            commit_id,
        })
    }
}
