//! Shared parameter and result helpers for the tree tools.

use rmcp::model::{CallToolResult, Content};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domains::trees::{SearchFilter, TreeApiError};

/// Record filters shared by the searching tools, flattened into their
/// parameter structs. Every field is optional; absent fields add no
/// constraint.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct TreeFilterParams {
    #[schemars(description = "Substring match on the French species name, e.g. 'Chêne'")]
    pub species: Option<String>,

    #[schemars(description = "Exact genus, e.g. 'Platanus'")]
    pub genus: Option<String>,

    #[schemars(description = "Exact district as recorded by the provider, e.g. 'PARIS 5E ARR'")]
    pub district: Option<String>,

    #[schemars(description = "Minimum height in meters")]
    pub min_height_m: Option<f64>,

    #[schemars(description = "Maximum height in meters")]
    pub max_height_m: Option<f64>,

    #[schemars(description = "Minimum trunk circumference in centimeters")]
    pub min_circumference_cm: Option<f64>,

    #[schemars(description = "Maximum trunk circumference in centimeters")]
    pub max_circumference_cm: Option<f64>,

    #[schemars(description = "Only heritage-listed (remarkable) trees")]
    #[serde(default)]
    pub remarkable_only: bool,

    #[schemars(description = "Free-text term matched across all fields")]
    pub search: Option<String>,
}

impl TreeFilterParams {
    pub fn to_filter(&self) -> SearchFilter {
        SearchFilter {
            species: self.species.clone(),
            species_exact: None,
            genus: self.genus.clone(),
            district: self.district.clone(),
            min_height_m: self.min_height_m,
            max_height_m: self.max_height_m,
            min_circumference_cm: self.min_circumference_cm,
            max_circumference_cm: self.max_circumference_cm,
            remarkable_only: self.remarkable_only,
            search: self.search.clone(),
        }
    }
}

/// Success result carrying a one-line summary plus the structured payload
/// as pretty-printed JSON.
pub fn structured_result<T: Serialize>(summary: impl Into<String>, data: &T) -> CallToolResult {
    match serde_json::to_string_pretty(data) {
        Ok(json) => CallToolResult::success(vec![Content::text(summary.into()), Content::text(json)]),
        Err(e) => CallToolResult::error(vec![Content::text(format!(
            "[internal] failed to serialize result: {e}"
        ))]),
    }
}

/// Error result tagged with the error kind so the assistant-facing caller
/// can distinguish retryable failures from bad input.
pub fn error_result(error: &TreeApiError) -> CallToolResult {
    warn!(kind = error.kind(), "tool call failed: {error}");
    CallToolResult::error(vec![Content::text(format!("[{}] {error}", error.kind()))])
}

#[cfg(test)]
pub fn result_text(result: &CallToolResult) -> String {
    result
        .content
        .iter()
        .filter_map(|c| match &c.raw {
            rmcp::model::RawContent::Text(t) => Some(t.text.clone()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("\n")
}
