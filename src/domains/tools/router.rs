//! Tool router - builds the rmcp `ToolRouter` from the tool definitions.
//!
//! Each tool creates its own route; the router just wires them to the shared
//! catalog client.

use std::sync::Arc;

use rmcp::handler::server::tool::ToolRouter;

use crate::domains::trees::TreeCatalog;

use super::definitions::{
    FindTreesNearLocationTool, GetDatasetInfoTool, GetTreeSpeciesInfoTool, GetTreeStatisticsTool,
    SearchTreesTool,
};

/// Build the tool router with all registered tools.
pub fn build_tool_router<S>(catalog: Arc<dyn TreeCatalog>) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    ToolRouter::new()
        .with_route(GetDatasetInfoTool::create_route(catalog.clone()))
        .with_route(SearchTreesTool::create_route(catalog.clone()))
        .with_route(GetTreeStatisticsTool::create_route(catalog.clone()))
        .with_route(FindTreesNearLocationTool::create_route(catalog.clone()))
        .with_route(GetTreeSpeciesInfoTool::create_route(catalog))
}

#[cfg(test)]
mod tests {
    use super::super::registry::ToolRegistry;
    use super::*;
    use crate::domains::trees::client::testing::FakeCatalog;

    struct TestServer {}

    fn test_catalog() -> Arc<dyn TreeCatalog> {
        Arc::new(FakeCatalog::default())
    }

    #[test]
    fn test_build_router() {
        let router: ToolRouter<TestServer> = build_tool_router(test_catalog());
        let tools = router.list_all();
        assert_eq!(tools.len(), 5);

        let names: Vec<_> = tools.iter().map(|t| t.name.as_ref()).collect();
        assert!(names.contains(&"get_dataset_info"));
        assert!(names.contains(&"search_trees"));
        assert!(names.contains(&"get_tree_statistics"));
        assert!(names.contains(&"find_trees_near_location"));
        assert!(names.contains(&"get_tree_species_info"));
    }

    #[test]
    fn test_registry_matches_router() {
        // Ensure registry and router stay in sync
        let registry_names = ToolRegistry::tool_names();

        let router: ToolRouter<TestServer> = build_tool_router(test_catalog());
        let router_tools = router.list_all();
        let router_names: Vec<_> = router_tools.iter().map(|t| t.name.as_ref()).collect();

        assert_eq!(registry_names.len(), router_names.len());
        for name in registry_names {
            assert!(router_names.contains(&name));
        }
    }
}
