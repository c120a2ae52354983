//! `get_tree_species_info` tool: per-species report.

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

use crate::domains::trees::query::RecordsQuery;
use crate::domains::trees::{
    GroupBucket, SearchFilter, TreeApiError, TreeCatalog, TreeRecord, buckets_from_group_counts,
};

use super::common::{error_result, structured_result};

/// Number of tallest specimens returned as representatives.
const REPRESENTATIVE_COUNT: u32 = 5;

/// Number of districts listed in the distribution.
const DISTRICT_TOP: usize = 10;

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetTreeSpeciesInfoParams {
    #[schemars(
        description = "Exact French species name as recorded in the dataset, e.g. 'Platane', \
                       'Marronnier', 'Tilleul', 'Chêne'"
    )]
    pub species: String,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct SpeciesInfoResult {
    pub species: String,
    /// Trees of this species in the full dataset.
    pub total_count: u64,
    /// Height bounds over specimens with a recorded height, taken from
    /// dedicated ordered queries rather than a sample.
    pub height_min_m: Option<f64>,
    pub height_max_m: Option<f64>,
    pub remarkable_count: u64,
    /// Distribution over the most represented districts.
    pub districts: Vec<GroupBucket>,
    /// Tallest recorded specimens.
    pub tallest: Vec<TreeRecord>,
}

#[derive(Debug, Clone)]
pub struct GetTreeSpeciesInfoTool;

impl GetTreeSpeciesInfoTool {
    pub const NAME: &'static str = "get_tree_species_info";

    pub const DESCRIPTION: &'static str = "Detailed report on one tree species in Paris: total \
        count, height range, number of heritage-listed specimens, distribution across districts \
        and the tallest examples. The species name must match the dataset exactly; use \
        get_tree_statistics grouped by species to list available names.";

    pub async fn execute(
        catalog: &dyn TreeCatalog,
        params: &GetTreeSpeciesInfoParams,
    ) -> CallToolResult {
        match Self::run(catalog, params).await {
            Ok(result) => {
                let summary = format!(
                    "{}: {} trees across {} districts",
                    result.species,
                    result.total_count,
                    result.districts.len()
                );
                structured_result(summary, &result)
            }
            Err(e) => error_result(&e),
        }
    }

    async fn run(
        catalog: &dyn TreeCatalog,
        params: &GetTreeSpeciesInfoParams,
    ) -> Result<SpeciesInfoResult, TreeApiError> {
        let species = params.species.trim();
        if species.is_empty() {
            return Err(TreeApiError::invalid_parameter(
                "species name must not be empty",
            ));
        }

        let filter = SearchFilter {
            species_exact: Some(species.to_string()),
            ..Default::default()
        };
        let where_clause = filter.where_clause();
        info!(species, "building species report");

        // The height bounds come from ordered single-page queries, so they
        // are exact no matter how many specimens the species has. The
        // ascending query keeps the hauteurenm>=0 predicate so unmeasured
        // trees cannot sort ahead of real values.
        let tallest_query = RecordsQuery {
            where_clause: where_clause.clone(),
            order_by: Some("hauteurenm DESC".to_string()),
            limit: REPRESENTATIVE_COUNT,
            offset: 0,
        };
        let tallest = catalog.records(&tallest_query).await?.results;
        let height_max_m = tallest.iter().filter_map(|r| r.height_m).reduce(f64::max);

        let measured = SearchFilter {
            species_exact: Some(species.to_string()),
            min_height_m: Some(0.0),
            ..Default::default()
        };
        let shortest_query = RecordsQuery {
            where_clause: measured.where_clause(),
            order_by: Some("hauteurenm ASC".to_string()),
            limit: 1,
            offset: 0,
        };
        let shortest = catalog.records(&shortest_query).await?.results;
        let height_min_m = shortest.iter().filter_map(|r| r.height_m).reduce(f64::min);

        // Provider-side counts cover the full matching set; their sum is
        // the exact species total.
        let district_rows = catalog
            .group_counts(where_clause.clone(), "arrondissement")
            .await?;
        let total_count = district_rows.iter().map(|r| r.count).sum();
        let districts = buckets_from_group_counts(district_rows, Some(DISTRICT_TOP));

        let remarkable_rows = catalog.group_counts(where_clause, "remarquable").await?;
        let remarkable_count = remarkable_rows
            .iter()
            .filter(|r| {
                r.value
                    .as_deref()
                    .is_some_and(|v| v.eq_ignore_ascii_case("oui"))
            })
            .map(|r| r.count)
            .sum();

        Ok(SpeciesInfoResult {
            species: species.to_string(),
            total_count,
            height_min_m,
            height_max_m,
            remarkable_count,
            districts,
            tallest,
        })
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<GetTreeSpeciesInfoParams>(),
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
                let params: GetTreeSpeciesInfoParams =
                    serde_json::from_value(serde_json::Value::Object(args))
                        .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                Ok(Self::execute(catalog.as_ref(), &params).await)
            }
            .boxed()
        })
    }
}
