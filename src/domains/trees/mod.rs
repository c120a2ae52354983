//! Tree catalog domain.
//!
//! Everything between the tool dispatcher and the open-data provider:
//!
//! - `query` - translation of high-level filters into the provider's ODSQL dialect
//! - `client` - the HTTP adapter behind the narrow [`TreeCatalog`] seam
//! - `model` - normalized record and metadata types
//! - `geo` - haversine distance and radius filtering
//! - `stats` - aggregation bucketing and ordering rules
//! - `error` - the four error kinds surfaced across the tool boundary

pub mod client;
pub mod error;
pub mod geo;
pub mod model;
pub mod query;
pub mod stats;

pub use client::{OpenDataClient, TreeCatalog};
pub use error::TreeApiError;
pub use geo::{GeoQuery, LocatedTree, haversine_km};
pub use model::{DatasetInfo, GeoPoint, GroupCount, RecordsPage, TreeRecord};
pub use query::{RecordsQuery, SearchFilter, validate_limit};
pub use stats::{GroupBucket, buckets_from_group_counts, count_by_group, group_column};
