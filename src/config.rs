//! Promotion configuration
//!
//! Everything the orchestrator needs arrives here explicitly. Environment
//! resolution happens at the CLI edge; the library never reads process
//! environment, which keeps the pipeline testable with fakes.

use serde::{Deserialize, Serialize};

/// Parameters of one promotion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromotionConfig {
    /// Experiment whose latest run is promoted
    pub experiment: String,

    /// Model name, used in the storage path `models/<model-name>/<run_id>`
    pub model_name: String,

    /// Destination object storage bucket
    pub bucket: String,

    /// Predictor framework key inside the manifest
    /// (`spec.predictor.<framework>.storageUri`)
    pub framework: String,

    /// Manifest path inside the GitOps repository
    pub manifest_path: String,
}

impl PromotionConfig {
    /// Config with the conventional framework key and manifest path
    /// (`sklearn`, `<model>-deployment.yaml`).
    pub fn new(
        experiment: impl Into<String>,
        model_name: impl Into<String>,
        bucket: impl Into<String>,
    ) -> Self {
        let model_name = model_name.into();
        Self {
            experiment: experiment.into(),
            manifest_path: format!("{model_name}-deployment.yaml"),
            model_name,
            bucket: bucket.into(),
            framework: "sklearn".to_string(),
        }
    }

    pub fn with_framework(mut self, framework: impl Into<String>) -> Self {
        self.framework = framework.into();
        self
    }

    pub fn with_manifest_path(mut self, path: impl Into<String>) -> Self {
        self.manifest_path = path.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_follow_the_model_name() {
        let config = PromotionConfig::new("Iris Flower Classification", "iris", "ml-models");
        assert_eq!(config.manifest_path, "iris-deployment.yaml");
        assert_eq!(config.framework, "sklearn");
    }

    #[test]
    fn test_builder_overrides() {
        let config = PromotionConfig::new("exp", "wine", "ml-models")
            .with_framework("tensorflow")
            .with_manifest_path("deploy/wine.yaml");
        assert_eq!(config.framework, "tensorflow");
        assert_eq!(config.manifest_path, "deploy/wine.yaml");
    }
}
