//! S3-compatible HTTP object store.

use std::time::Duration;

use tracing::{debug, instrument};

use super::ObjectStore;
use crate::error::PromoteError;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Object store speaking plain HTTP PUT against an S3-compatible endpoint
/// (MinIO, S3 gateways). Objects land at `<endpoint>/<bucket>/<path>`.
#[derive(Debug)]
pub struct HttpObjectStore {
    client: reqwest::blocking::Client,
    endpoint: String,
    token: Option<String>,
}

impl HttpObjectStore {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, PromoteError> {
        Self::with_timeout(endpoint, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        endpoint: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, PromoteError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("promover/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| PromoteError::Staging {
                detail: format!("failed to build HTTP client: {e}"),
                uploaded: Vec::new(),
            })?;

        Ok(Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Attach a bearer token for authenticated endpoints.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}

impl ObjectStore for HttpObjectStore {
    #[instrument(skip(self, bytes), fields(bytes = bytes.len()))]
    fn put(&self, bucket: &str, path: &str, bytes: &[u8]) -> Result<(), PromoteError> {
        let url = format!("{}/{bucket}/{path}", self.endpoint);
        let builder = self.client.put(&url).body(bytes.to_vec());
        let builder = match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        };

        let response = builder.send().map_err(|e| {
            let detail = if e.is_timeout() {
                format!("upload of '{path}' timed out")
            } else {
                format!("upload of '{path}' failed: {e}")
            };
            PromoteError::Staging {
                detail,
                uploaded: Vec::new(),
            }
        })?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(PromoteError::Auth {
                system: "object storage".to_string(),
                detail: format!("upload of '{path}': HTTP {status}"),
            });
        }
        if !status.is_success() {
            return Err(PromoteError::Staging {
                detail: format!("upload of '{path}': HTTP {status}"),
                uploaded: Vec::new(),
            });
        }

        debug!(bucket, path, "object stored");
        Ok(())
    }
}
