//! Deployment manifest patching
//!
//! Replaces exactly one leaf value in a YAML manifest and serializes the
//! document back. The patch never creates structure: every segment of the
//! field path must already exist, so a typo'd framework key fails loudly
//! instead of silently growing a new manifest subtree.
//!
//! serde_yaml mappings preserve key order, so parse -> patch -> serialize is a
//! structural identity transform on every field outside the target path.

use serde_yaml::Value;

use crate::error::PromoteError;

/// Dotted path to one leaf field, e.g. `spec.predictor.sklearn.storageUri`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    /// Parse a dotted path. Empty paths and empty segments are rejected.
    pub fn parse(path: &str) -> Result<Self, PromoteError> {
        if path.is_empty() || path.split('.').any(str::is_empty) {
            return Err(PromoteError::Schema {
                field_path: path.to_string(),
                detail: "invalid field path".to_string(),
            });
        }
        Ok(Self {
            segments: path.split('.').map(str::to_string).collect(),
        })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl std::fmt::Display for FieldPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

/// The conventional path to a predictor's model location.
pub fn storage_uri_path(framework: &str) -> Result<FieldPath, PromoteError> {
    FieldPath::parse(&format!("spec.predictor.{framework}.storageUri"))
}

/// Replace the leaf at `path` with `new_value`, leaving every other field
/// untouched. Fails if the document does not already contain the full path.
pub fn patch(raw: &str, path: &FieldPath, new_value: &str) -> Result<String, PromoteError> {
    let mut document: Value =
        serde_yaml::from_str(raw).map_err(|e| PromoteError::Schema {
            field_path: path.to_string(),
            detail: format!("manifest is not valid YAML: {e}"),
        })?;

    let mut cursor = &mut document;
    for segment in path.segments() {
        if !cursor.is_mapping() {
            return Err(PromoteError::Schema {
                field_path: path.to_string(),
                detail: format!("'{segment}' is not reachable through a mapping"),
            });
        }
        cursor = cursor
            .get_mut(segment.as_str())
            .ok_or_else(|| PromoteError::Schema {
                field_path: path.to_string(),
                detail: "field not found".to_string(),
            })?;
    }

    *cursor = Value::String(new_value.to_string());

    serde_yaml::to_string(&document).map_err(|e| PromoteError::Schema {
        field_path: path.to_string(),
        detail: format!("failed to serialize manifest: {e}"),
    })
}
