//! Tool registry - the single source of truth for tool metadata.
//!
//! Both the router and any listing endpoint derive their tool set from here,
//! so a tool missing from one side shows up as a test failure.

use rmcp::model::Tool;

use super::definitions::{
    FindTreesNearLocationTool, GetDatasetInfoTool, GetTreeSpeciesInfoTool, GetTreeStatisticsTool,
    SearchTreesTool,
};

/// Registry of all available tools.
pub struct ToolRegistry;

impl ToolRegistry {
    /// Names of every registered tool.
    pub fn tool_names() -> Vec<&'static str> {
        vec![
            GetDatasetInfoTool::NAME,
            SearchTreesTool::NAME,
            GetTreeStatisticsTool::NAME,
            FindTreesNearLocationTool::NAME,
            GetTreeSpeciesInfoTool::NAME,
        ]
    }

    /// Metadata for every registered tool.
    pub fn get_all_tools() -> Vec<Tool> {
        vec![
            GetDatasetInfoTool::to_tool(),
            SearchTreesTool::to_tool(),
            GetTreeStatisticsTool::to_tool(),
            FindTreesNearLocationTool::to_tool(),
            GetTreeSpeciesInfoTool::to_tool(),
        ]
    }
}
