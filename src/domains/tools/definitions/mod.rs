//! Tool definitions, one file per tool.
//!
//! Each tool defines its parameter struct, `NAME`/`DESCRIPTION` constants,
//! an `execute()` taking the [`TreeCatalog`](crate::domains::trees::TreeCatalog)
//! seam, and a `create_route()` for the rmcp router.

pub mod common;
pub mod dataset_info;
pub mod near_location;
pub mod search;
pub mod species_info;
pub mod statistics;

pub use common::TreeFilterParams;
pub use dataset_info::GetDatasetInfoTool;
pub use near_location::{FindTreesNearLocationParams, FindTreesNearLocationTool};
pub use search::{SearchTreesParams, SearchTreesTool};
pub use species_info::{GetTreeSpeciesInfoParams, GetTreeSpeciesInfoTool};
pub use statistics::{GetTreeStatisticsParams, GetTreeStatisticsTool};
