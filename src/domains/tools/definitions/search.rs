//! `search_trees` tool: filtered, sorted, paginated record search.

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

use crate::domains::trees::query::{RecordsQuery, sort_spec};
use crate::domains::trees::{TreeApiError, TreeCatalog, TreeRecord, validate_limit};

use super::common::{TreeFilterParams, error_result, structured_result};

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct SearchTreesParams {
    #[serde(flatten)]
    pub filters: TreeFilterParams,

    #[schemars(
        description = "Sort field: species, genus, district, address, height or circumference"
    )]
    pub sort_by: Option<String>,

    #[schemars(description = "Sort descending instead of ascending")]
    #[serde(default)]
    pub descending: bool,

    #[schemars(description = "Page size (default 20, max 100, must be positive)")]
    pub limit: Option<i64>,

    #[schemars(description = "Pagination offset (default 0)")]
    #[serde(default)]
    pub offset: u64,
}

/// One page of matching trees plus the size of the full matching set.
#[derive(Debug, Serialize, JsonSchema)]
pub struct SearchTreesResult {
    pub total_count: u64,
    pub returned: usize,
    pub offset: u64,
    pub trees: Vec<TreeRecord>,
}

#[derive(Debug, Clone)]
pub struct SearchTreesTool;

impl SearchTreesTool {
    pub const NAME: &'static str = "search_trees";

    pub const DESCRIPTION: &'static str = "Search the Paris tree inventory with optional filters \
        (species, genus, district, height and circumference ranges, heritage status, free text), \
        sorting and pagination. Returns one page of normalized records together with the total \
        number of matches.";

    pub async fn execute(catalog: &dyn TreeCatalog, params: &SearchTreesParams) -> CallToolResult {
        match Self::run(catalog, params).await {
            Ok(result) => {
                let summary = format!(
                    "Found {} matching trees, returning {} (offset {})",
                    result.total_count, result.returned, result.offset
                );
                structured_result(summary, &result)
            }
            Err(e) => error_result(&e),
        }
    }

    async fn run(
        catalog: &dyn TreeCatalog,
        params: &SearchTreesParams,
    ) -> Result<SearchTreesResult, TreeApiError> {
        let limit = validate_limit(params.limit)?;
        let order_by = sort_spec(params.sort_by.as_deref(), params.descending)?;

        let query = RecordsQuery {
            where_clause: params.filters.to_filter().where_clause(),
            order_by,
            limit,
            offset: params.offset,
        };
        info!(?query, "searching trees");

        let page = catalog.records(&query).await?;
        Ok(SearchTreesResult {
            total_count: page.total_count,
            returned: page.results.len(),
            offset: params.offset,
            trees: page.results,
        })
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<SearchTreesParams>(),
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
                let params: SearchTreesParams =
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
    use crate::domains::trees::RecordsPage;
    use crate::domains::trees::client::testing::FakeCatalog;
    use crate::domains::tools::definitions::common::result_text;

    fn params_from(json: serde_json::Value) -> SearchTreesParams {
        serde_json::from_value(json).unwrap()
    }

    #[tokio::test]
    async fn test_invalid_limit_fails_before_network() {
        let catalog = FakeCatalog::default();
        let params = params_from(serde_json::json!({ "limit": 0 }));
        let result = SearchTreesTool::execute(&catalog, &params).await;
        assert_eq!(result.is_error, Some(true));
        assert!(result_text(&result).contains("[invalid_parameter]"));
        assert!(catalog.recorded_queries().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_sort_field_fails_before_network() {
        let catalog = FakeCatalog::default();
        let params = params_from(serde_json::json!({ "sort_by": "hauteurenm" }));
        let result = SearchTreesTool::execute(&catalog, &params).await;
        assert_eq!(result.is_error, Some(true));
        assert!(catalog.recorded_queries().is_empty());
    }

    #[tokio::test]
    async fn test_filters_become_query_predicates() {
        let catalog = FakeCatalog::with_pages(vec![RecordsPage {
            total_count: 523,
            results: vec![
                TreeRecord {
                    species: Some("Chêne".into()),
                    district: Some("PARIS 5E ARR".into()),
                    ..Default::default()
                };
                10
            ],
        }]);
        let params = params_from(serde_json::json!({
            "species": "Chêne",
            "district": "PARIS 5E ARR",
            "limit": 10
        }));
        let result = SearchTreesTool::execute(&catalog, &params).await;
        assert_ne!(result.is_error, Some(true));

        let queries = catalog.recorded_queries();
        assert_eq!(queries.len(), 1);
        let clause = queries[0].where_clause.as_deref().unwrap();
        assert!(clause.contains("libellefrancais like \"Chêne\""));
        assert!(clause.contains("arrondissement=\"PARIS 5E ARR\""));
        assert_eq!(queries[0].limit, 10);

        // Total count reflects the full matching set, not the page.
        let text = result_text(&result);
        assert!(text.contains("Found 523 matching trees"));
        assert!(text.contains("\"total_count\": 523"));
    }

    #[tokio::test]
    async fn test_limit_clamped_to_provider_max() {
        let catalog = FakeCatalog::with_pages(vec![RecordsPage::default()]);
        let params = params_from(serde_json::json!({ "limit": 2500 }));
        SearchTreesTool::execute(&catalog, &params).await;
        assert_eq!(catalog.recorded_queries()[0].limit, 100);
    }

    #[tokio::test]
    async fn test_no_filters_sends_no_where_clause() {
        let catalog = FakeCatalog::with_pages(vec![RecordsPage::default()]);
        let params = SearchTreesParams::default();
        SearchTreesTool::execute(&catalog, &params).await;
        let queries = catalog.recorded_queries();
        assert_eq!(queries[0].where_clause, None);
        assert_eq!(queries[0].limit, 20);
    }

    #[tokio::test]
    async fn test_sort_and_offset_forwarded() {
        let catalog = FakeCatalog::with_pages(vec![RecordsPage::default()]);
        let params = params_from(serde_json::json!({
            "sort_by": "height",
            "descending": true,
            "offset": 40
        }));
        SearchTreesTool::execute(&catalog, &params).await;
        let queries = catalog.recorded_queries();
        assert_eq!(queries[0].order_by.as_deref(), Some("hauteurenm DESC"));
        assert_eq!(queries[0].offset, 40);
    }

    #[tokio::test]
    async fn test_network_error_surfaces_as_retryable() {
        let catalog = FakeCatalog {
            error: Some(|| TreeApiError::TransientNetwork("connection refused".into())),
            ..Default::default()
        };
        let result = SearchTreesTool::execute(&catalog, &SearchTreesParams::default()).await;
        assert_eq!(result.is_error, Some(true));
        assert!(result_text(&result).contains("[transient_network_error]"));
    }
}
