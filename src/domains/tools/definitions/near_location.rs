//! `find_trees_near_location` tool: proximity search around a point.

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

use crate::domains::trees::query::{RecordsQuery, distance_order, distance_predicate};
use crate::domains::trees::{
    GeoPoint, GeoQuery, LocatedTree, TreeApiError, TreeCatalog, validate_limit,
};

use super::common::{TreeFilterParams, error_result, structured_result};

fn default_radius_m() -> f64 {
    500.0
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct FindTreesNearLocationParams {
    #[schemars(description = "Latitude in WGS84 decimal degrees, e.g. 48.8584")]
    pub latitude: f64,

    #[schemars(description = "Longitude in WGS84 decimal degrees, e.g. 2.2945")]
    pub longitude: f64,

    #[schemars(description = "Search radius in meters (default 500)")]
    #[serde(default = "default_radius_m")]
    pub radius_m: f64,

    #[serde(flatten)]
    pub filters: TreeFilterParams,

    #[schemars(description = "Maximum number of trees to return (default 20, max 100)")]
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct NearbyTreesResult {
    pub center: GeoPoint,
    pub radius_m: f64,
    /// Full matching set size as reported by the provider.
    pub total_count: u64,
    /// Trees within the radius, nearest first, each with its computed
    /// haversine distance. Records without coordinates are excluded.
    pub trees: Vec<LocatedTree>,
}

#[derive(Debug, Clone)]
pub struct FindTreesNearLocationTool;

impl FindTreesNearLocationTool {
    pub const NAME: &'static str = "find_trees_near_location";

    pub const DESCRIPTION: &'static str = "Find Paris trees within a radius of a geographic \
        point, optionally restricted by the same filters as search_trees. Results carry their \
        computed distance in meters and are sorted nearest first. Famous points: Eiffel Tower \
        48.8584/2.2945, Notre-Dame 48.8530/2.3499, Louvre 48.8606/2.3376.";

    pub async fn execute(
        catalog: &dyn TreeCatalog,
        params: &FindTreesNearLocationParams,
    ) -> CallToolResult {
        match Self::run(catalog, params).await {
            Ok(result) => {
                let summary = format!(
                    "Found {} trees within {}m of ({}, {})",
                    result.trees.len(),
                    result.radius_m,
                    result.center.lat,
                    result.center.lon
                );
                structured_result(summary, &result)
            }
            Err(e) => error_result(&e),
        }
    }

    async fn run(
        catalog: &dyn TreeCatalog,
        params: &FindTreesNearLocationParams,
    ) -> Result<NearbyTreesResult, TreeApiError> {
        let geo = GeoQuery::new(params.latitude, params.longitude, params.radius_m)?;
        let limit = validate_limit(params.limit)?;

        // Provider-side distance() pre-filter keeps the page relevant; the
        // haversine post-filter below enforces the radius contract locally.
        let mut predicates = params.filters.to_filter().predicates();
        predicates.push(distance_predicate(geo.center.lat, geo.center.lon, geo.radius_m));

        let query = RecordsQuery {
            where_clause: Some(predicates.join(" AND ")),
            order_by: Some(distance_order(geo.center.lat, geo.center.lon)),
            limit,
            offset: 0,
        };
        info!(?query, "searching trees near location");

        let page = catalog.records(&query).await?;
        let trees = geo.filter_and_sort(page.results);

        Ok(NearbyTreesResult {
            center: geo.center,
            radius_m: geo.radius_m,
            total_count: page.total_count,
            trees,
        })
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<FindTreesNearLocationParams>(),
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
                let params: FindTreesNearLocationParams =
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
    use crate::domains::trees::client::testing::FakeCatalog;
    use crate::domains::trees::{RecordsPage, TreeRecord};
    use crate::domains::tools::definitions::common::result_text;

    fn params(json: serde_json::Value) -> FindTreesNearLocationParams {
        serde_json::from_value(json).unwrap()
    }

    fn tree_at(lat: f64, lon: f64) -> TreeRecord {
        TreeRecord {
            location: Some(GeoPoint { lat, lon }),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_invalid_coordinates_fail_before_network() {
        let catalog = FakeCatalog::default();
        let result = FindTreesNearLocationTool::execute(
            &catalog,
            &params(serde_json::json!({ "latitude": 95.0, "longitude": 2.29 })),
        )
        .await;
        assert_eq!(result.is_error, Some(true));
        assert!(result_text(&result).contains("[invalid_parameter]"));
        assert!(catalog.recorded_queries().is_empty());
    }

    #[tokio::test]
    async fn test_query_carries_distance_predicate_and_order() {
        let catalog = FakeCatalog::with_pages(vec![RecordsPage::default()]);
        let result = FindTreesNearLocationTool::execute(
            &catalog,
            &params(serde_json::json!({
                "latitude": 48.8584,
                "longitude": 2.2945,
                "radius_m": 500.0,
                "species": "Platane"
            })),
        )
        .await;
        assert_ne!(result.is_error, Some(true));

        let queries = catalog.recorded_queries();
        let clause = queries[0].where_clause.as_deref().unwrap();
        assert!(clause.contains("libellefrancais like \"Platane\""));
        assert!(clause.contains("distance(geo_point_2d, geom'POINT(2.2945 48.8584)', 500m)"));
        assert!(
            queries[0]
                .order_by
                .as_deref()
                .unwrap()
                .starts_with("distance(")
        );
    }

    #[tokio::test]
    async fn test_results_within_radius_sorted_nearest_first() {
        // Eiffel Tower reference point; one record beyond the radius, one
        // without coordinates, two inside.
        let catalog = FakeCatalog::with_pages(vec![RecordsPage {
            total_count: 4,
            results: vec![
                tree_at(48.8600, 2.2970),
                tree_at(48.8584, 2.2945),
                tree_at(48.8530, 2.3499),
                TreeRecord::default(),
            ],
        }]);
        let result = FindTreesNearLocationTool::execute(
            &catalog,
            &params(serde_json::json!({
                "latitude": 48.8584,
                "longitude": 2.2945,
                "radius_m": 500.0
            })),
        )
        .await;
        assert_ne!(result.is_error, Some(true));

        let text = result_text(&result);
        assert!(text.contains("Found 2 trees within 500m"));
        let json_start = text.find('{').unwrap();
        let payload: serde_json::Value = serde_json::from_str(&text[json_start..]).unwrap();
        let trees = payload["trees"].as_array().unwrap();
        assert_eq!(trees.len(), 2);
        let d0 = trees[0]["distance_m"].as_f64().unwrap();
        let d1 = trees[1]["distance_m"].as_f64().unwrap();
        assert!(d0 <= d1);
        assert!(d1 <= 500.0);
    }

    #[tokio::test]
    async fn test_default_radius_applies() {
        let catalog = FakeCatalog::with_pages(vec![RecordsPage::default()]);
        let p = params(serde_json::json!({ "latitude": 48.85, "longitude": 2.35 }));
        assert_eq!(p.radius_m, 500.0);
        let result = FindTreesNearLocationTool::execute(&catalog, &p).await;
        assert_ne!(result.is_error, Some(true));
    }
}
