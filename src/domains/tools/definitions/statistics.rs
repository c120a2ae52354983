//! `get_tree_statistics` tool: group-by counts over the matching set.

use std::sync::Arc;

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domains::trees::{
    GroupBucket, TreeApiError, TreeCatalog, buckets_from_group_counts, group_column,
};

use super::common::{TreeFilterParams, error_result, structured_result};

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetTreeStatisticsParams {
    #[schemars(
        description = "Field to group by: species, genus, district, variety or development_stage"
    )]
    pub group_by: String,

    #[serde(flatten)]
    pub filters: TreeFilterParams,

    #[schemars(description = "Keep only the N largest buckets (applied after sorting)")]
    pub top: Option<u32>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct TreeStatisticsResult {
    pub group_by: String,
    /// Exact size of the matching set: the sum of every bucket counted by
    /// the provider, before any `top` truncation.
    pub total_count: u64,
    pub buckets: Vec<GroupBucket>,
}

#[derive(Debug, Clone)]
pub struct GetTreeStatisticsTool;

impl GetTreeStatisticsTool {
    pub const NAME: &'static str = "get_tree_statistics";

    pub const DESCRIPTION: &'static str = "Count Paris trees per distinct value of a field \
        (species, genus, district, variety or development_stage), optionally restricted by the \
        same filters as search_trees. Counts are aggregated by the provider over the full \
        matching set. Buckets are sorted by descending count with ties broken alphabetically; \
        records without a value are counted under 'unspecified'.";

    pub async fn execute(
        catalog: &dyn TreeCatalog,
        params: &GetTreeStatisticsParams,
    ) -> CallToolResult {
        match Self::run(catalog, params).await {
            Ok(result) => {
                let summary = format!(
                    "{} buckets grouped by {} over {} trees",
                    result.buckets.len(),
                    result.group_by,
                    result.total_count
                );
                structured_result(summary, &result)
            }
            Err(e) => error_result(&e),
        }
    }

    async fn run(
        catalog: &dyn TreeCatalog,
        params: &GetTreeStatisticsParams,
    ) -> Result<TreeStatisticsResult, TreeApiError> {
        let group_by = params.group_by.trim();
        let column = group_column(group_by)?;
        let top = match params.top {
            Some(0) => {
                return Err(TreeApiError::invalid_parameter(
                    "top must be positive when given",
                ));
            }
            other => other.map(|n| n as usize),
        };

        let where_clause = params.filters.to_filter().where_clause();
        info!(group_by, ?where_clause, "aggregating trees");

        let rows = catalog.group_counts(where_clause, column).await?;
        let total_count = rows.iter().map(|r| r.count).sum();
        let buckets = buckets_from_group_counts(rows, top);

        Ok(TreeStatisticsResult {
            group_by: group_by.to_string(),
            total_count,
            buckets,
        })
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<GetTreeStatisticsParams>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }

    pub fn create_route<S>(catalog: Arc<dyn TreeCatalog>) -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
    {
        ToolRoute::new_dyn(Self::to_tool(), move |ctx: ToolCallContext<'_, S>| {
            let catalog = catalog.clone();
            let args = ctx.arguments.clone().unwrap_or_default();
            async move {
                let params: GetTreeStatisticsParams =
                    serde_json::from_value(serde_json::Value::Object(args))
                        .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                Ok(Self::execute(catalog.as_ref(), &params).await)
            }
            .boxed()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::trees::GroupCount;
    use crate::domains::trees::client::testing::FakeCatalog;
    use crate::domains::tools::definitions::common::result_text;

    fn params(json: serde_json::Value) -> GetTreeStatisticsParams {
        serde_json::from_value(json).unwrap()
    }

    fn row(value: Option<&str>, count: u64) -> GroupCount {
        GroupCount {
            value: value.map(str::to_string),
            count,
        }
    }

    #[tokio::test]
    async fn test_unknown_group_field_fails_before_network() {
        let catalog = FakeCatalog::default();
        let result =
            GetTreeStatisticsTool::execute(&catalog, &params(serde_json::json!({ "group_by": "color" })))
                .await;
        assert_eq!(result.is_error, Some(true));
        assert!(result_text(&result).contains("[invalid_parameter]"));
        assert!(catalog.recorded_group_queries().is_empty());
    }

    #[tokio::test]
    async fn test_empty_result_set_yields_empty_aggregation() {
        let catalog = FakeCatalog::default().with_groups(vec![vec![]]);
        let result =
            GetTreeStatisticsTool::execute(&catalog, &params(serde_json::json!({ "group_by": "species" })))
                .await;
        assert_ne!(result.is_error, Some(true));
        let text = result_text(&result);
        assert!(text.contains("0 buckets"));
        assert!(text.contains("\"buckets\": []"));
        assert!(text.contains("\"total_count\": 0"));
    }

    #[tokio::test]
    async fn test_counts_include_unspecified_bucket() {
        let catalog = FakeCatalog::default().with_groups(vec![vec![
            row(Some("Platane"), 2),
            row(Some("Tilleul"), 1),
            row(None, 1),
        ]]);
        let result =
            GetTreeStatisticsTool::execute(&catalog, &params(serde_json::json!({ "group_by": "species" })))
                .await;
        let text = result_text(&result);
        assert!(text.contains("unspecified"));
        assert!(text.contains("3 buckets"));
    }

    #[tokio::test]
    async fn test_filters_restrict_the_aggregation() {
        let catalog = FakeCatalog::default().with_groups(vec![vec![]]);
        let result = GetTreeStatisticsTool::execute(
            &catalog,
            &params(serde_json::json!({ "group_by": "district", "remarkable_only": true })),
        )
        .await;
        assert_ne!(result.is_error, Some(true));
        let group_queries = catalog.recorded_group_queries();
        assert_eq!(
            group_queries,
            vec![(
                Some("remarquable=\"OUI\"".to_string()),
                "arrondissement".to_string()
            )]
        );
    }

    #[tokio::test]
    async fn test_top_zero_rejected() {
        let catalog = FakeCatalog::default();
        let result = GetTreeStatisticsTool::execute(
            &catalog,
            &params(serde_json::json!({ "group_by": "species", "top": 0 })),
        )
        .await;
        assert_eq!(result.is_error, Some(true));
        assert!(catalog.recorded_group_queries().is_empty());
    }

    #[tokio::test]
    async fn test_counts_cover_the_full_matching_set() {
        // Dataset-scale counts, far beyond what any record page could hold:
        // the buckets must reflect the provider's aggregation, not a sample.
        let catalog = FakeCatalog::default().with_groups(vec![vec![
            row(Some("Tilleul"), 38000),
            row(Some("Platane"), 42000),
            row(Some("Marronnier"), 27641),
            row(None, 100_000),
        ]]);
        let result =
            GetTreeStatisticsTool::execute(&catalog, &params(serde_json::json!({ "group_by": "species" })))
                .await;
        assert_ne!(result.is_error, Some(true));

        // One aggregation call, no record scans.
        assert!(catalog.recorded_queries().is_empty());
        assert_eq!(catalog.recorded_group_queries().len(), 1);

        let text = result_text(&result);
        let json_start = text.find('{').unwrap();
        let payload: serde_json::Value = serde_json::from_str(&text[json_start..]).unwrap();
        assert_eq!(payload["total_count"], 207641);
        assert_eq!(payload["buckets"][0]["key"], "unspecified");
        assert_eq!(payload["buckets"][0]["count"], 100_000);
        assert_eq!(payload["buckets"][1]["key"], "Platane");
        assert_eq!(payload["buckets"][1]["count"], 42000);
    }
}
