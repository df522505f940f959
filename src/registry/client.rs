//! REST registry client (MLflow-compatible tracking server).

use std::fs;
use std::path::Path;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use serde::Deserialize;
use tracing::{debug, instrument};

use super::{sort_most_recent_first, Run, RunRegistry};
use crate::error::PromoteError;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for an MLflow-compatible tracking server.
#[derive(Debug)]
pub struct HttpRegistry {
    client: reqwest::blocking::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpRegistry {
    /// Create a client against `base_url` with the default timeout.
    pub fn new(base_url: impl Into<String>) -> Result<Self, PromoteError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Create a client with an explicit per-request timeout.
    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, PromoteError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("promover/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| PromoteError::RegistryUnavailable {
                detail: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Attach a bearer token for authenticated tracking servers.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    fn get(&self, url: &str) -> reqwest::blocking::RequestBuilder {
        let builder = self.client.get(url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn check_status(
        &self,
        response: reqwest::blocking::Response,
        context: &str,
    ) -> Result<reqwest::blocking::Response, PromoteError> {
        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(PromoteError::Auth {
                system: "registry".to_string(),
                detail: format!("{context}: HTTP {status}"),
            });
        }
        if !status.is_success() {
            return Err(PromoteError::RegistryUnavailable {
                detail: format!("{context}: HTTP {status}"),
            });
        }
        Ok(response)
    }

    fn transport_err(&self, e: reqwest::Error, context: &str) -> PromoteError {
        // Timeouts surface as this stage's error kind, not a generic failure.
        let detail = if e.is_timeout() {
            format!("{context}: request timed out")
        } else {
            format!("{context}: {e}")
        };
        PromoteError::RegistryUnavailable { detail }
    }

    fn experiment_id(&self, experiment: &str) -> Result<String, PromoteError> {
        let url = format!(
            "{}/api/2.0/mlflow/experiments/get-by-name",
            self.base_url
        );
        let response = self
            .get(&url)
            .query(&[("experiment_name", experiment)])
            .send()
            .map_err(|e| self.transport_err(e, "experiment lookup"))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(PromoteError::NotFound {
                experiment: experiment.to_string(),
            });
        }

        let body: ExperimentResponse = self
            .check_status(response, "experiment lookup")?
            .json()
            .map_err(|e| self.transport_err(e, "experiment lookup"))?;

        Ok(body.experiment.experiment_id)
    }

    fn list_artifacts(&self, run: &Run, path: &str) -> Result<Vec<FileInfo>, PromoteError> {
        let url = format!("{}/api/2.0/mlflow/artifacts/list", self.base_url);
        let response = self
            .get(&url)
            .query(&[("run_id", run.run_id.as_str()), ("path", path)])
            .send()
            .map_err(|e| self.transport_err(e, "artifact listing"))?;

        let body: ArtifactListResponse = self
            .check_status(response, "artifact listing")?
            .json()
            .map_err(|e| self.transport_err(e, "artifact listing"))?;

        Ok(body.files)
    }

    fn fetch_artifact(&self, run: &Run, path: &str, dest: &Path) -> Result<(), PromoteError> {
        let url = format!("{}/get-artifact", self.base_url);
        let response = self
            .get(&url)
            .query(&[("run_id", run.run_id.as_str()), ("path", path)])
            .send()
            .map_err(|e| self.transport_err(e, "artifact download"))?;

        let bytes = self
            .check_status(response, "artifact download")?
            .bytes()
            .map_err(|e| self.transport_err(e, "artifact download"))?;

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).map_err(|e| PromoteError::RegistryUnavailable {
                detail: format!("artifact download: {e}"),
            })?;
        }
        fs::write(dest, &bytes).map_err(|e| PromoteError::RegistryUnavailable {
            detail: format!("artifact download: {e}"),
        })?;

        debug!(path, bytes = bytes.len(), "downloaded artifact file");
        Ok(())
    }
}

impl RunRegistry for HttpRegistry {
    #[instrument(skip(self))]
    fn search(&self, experiment: &str) -> Result<Vec<Run>, PromoteError> {
        let experiment_id = self.experiment_id(experiment)?;

        let url = format!("{}/api/2.0/mlflow/runs/search", self.base_url);
        let request = serde_json::json!({
            "experiment_ids": [experiment_id],
            // Ordering is requested explicitly, never assumed from the backend.
            "order_by": ["attributes.start_time DESC"],
            "max_results": 100,
        });

        let builder = self.client.post(&url).json(&request);
        let builder = match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        };
        let response = builder
            .send()
            .map_err(|e| self.transport_err(e, "run search"))?;

        let body: SearchResponse = self
            .check_status(response, "run search")?
            .json()
            .map_err(|e| self.transport_err(e, "run search"))?;

        let mut runs: Vec<Run> = body
            .runs
            .into_iter()
            .map(|r| {
                let start_time = Utc
                    .timestamp_millis_opt(r.info.start_time)
                    .single()
                    .unwrap_or_else(Utc::now);
                Run::new(r.info.run_id, experiment)
                    .with_artifact_uri(r.info.artifact_uri)
                    .with_start_time(start_time)
            })
            .collect();

        // Local re-sort enforces the tie-break the REST API does not specify.
        sort_most_recent_first(&mut runs);
        debug!(experiment, count = runs.len(), "registry search complete");
        Ok(runs)
    }

    #[instrument(skip(self, run), fields(run_id = %run.run_id))]
    fn download_artifacts(&self, run: &Run, dest: &Path) -> Result<(), PromoteError> {
        let mut pending = vec![String::new()];
        while let Some(dir) = pending.pop() {
            for file in self.list_artifacts(run, &dir)? {
                if file.is_dir {
                    pending.push(file.path);
                } else {
                    let target = dest.join(&file.path);
                    self.fetch_artifact(run, &file.path, &target)?;
                }
            }
        }
        Ok(())
    }
}

// ============================================================================
// REST payloads
// ============================================================================

#[derive(Debug, Deserialize)]
struct ExperimentResponse {
    experiment: ExperimentInfo,
}

#[derive(Debug, Deserialize)]
struct ExperimentInfo {
    experiment_id: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    runs: Vec<RunRecord>,
}

#[derive(Debug, Deserialize)]
struct RunRecord {
    info: RunInfo,
}

#[derive(Debug, Deserialize)]
struct RunInfo {
    run_id: String,
    #[serde(default)]
    artifact_uri: String,
    #[serde(default)]
    start_time: i64,
}

#[derive(Debug, Deserialize)]
struct ArtifactListResponse {
    #[serde(default)]
    files: Vec<FileInfo>,
}

#[derive(Debug, Deserialize)]
struct FileInfo {
    path: String,
    #[serde(default)]
    is_dir: bool,
}
