//! `get_dataset_info` tool: dataset-level metadata.

use std::sync::Arc;

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::info;

use crate::domains::trees::TreeCatalog;

use super::common::{error_result, structured_result};

/// `get_dataset_info` takes no parameters.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct GetDatasetInfoParams {}

#[derive(Debug, Clone)]
pub struct GetDatasetInfoTool;

impl GetDatasetInfoTool {
    pub const NAME: &'static str = "get_dataset_info";

    pub const DESCRIPTION: &'static str = "Get metadata about the Paris trees dataset: title, \
        description, total record count, last-modified timestamp and the available fields with \
        their types. Useful for understanding the dataset before making specific queries.";

    pub async fn execute(catalog: &dyn TreeCatalog, _params: &GetDatasetInfoParams) -> CallToolResult {
        info!("fetching dataset metadata");
        match catalog.dataset_info().await {
            Ok(info) => {
                let summary = format!(
                    "Dataset '{}': {} records, {} fields",
                    info.title.as_deref().unwrap_or("les-arbres"),
                    info.records_count.unwrap_or(0),
                    info.fields.len()
                );
                structured_result(summary, &info)
            }
            Err(e) => error_result(&e),
        }
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<GetDatasetInfoParams>(),
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
                let params: GetDatasetInfoParams =
                    serde_json::from_value(serde_json::Value::Object(args))
                        .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                Ok(Self::execute(catalog.as_ref(), &params).await)
            }
            .boxed()
        })
    }
}
