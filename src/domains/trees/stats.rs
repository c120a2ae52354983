//! Bucket ordering and aggregation rules.
//!
//! Counting happens provider-side (`group_by` queries cover the full
//! matching set), but the presentation rules are applied locally so they
//! hold regardless of provider behavior: buckets sorted by descending count
//! with ties broken by ascending key, absent values collected in an explicit
//! "unspecified" bucket, and bucket counts always summing to the counted
//! total. [`count_by_group`] applies the same rules to a record sequence
//! already in memory.

use std::collections::HashMap;

use schemars::JsonSchema;
use serde::Serialize;

use super::error::TreeApiError;
use super::model::{GroupCount, TreeRecord};

/// Bucket key used for records whose grouping field is absent or blank.
pub const UNSPECIFIED_BUCKET: &str = "unspecified";

/// Fields accepted by `get_tree_statistics`, mapped to provider columns.
const GROUPABLE_FIELDS: &[(&str, &str)] = &[
    ("species", "libellefrancais"),
    ("genus", "genre"),
    ("district", "arrondissement"),
    ("variety", "variete"),
    ("development_stage", "stadedeveloppement"),
];

/// One aggregation bucket: a distinct field value and its record count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct GroupBucket {
    pub key: String,
    pub count: u64,
}

/// Resolve a tool-facing grouping field into the provider column it counts
/// over. Fields outside the allow-list are rejected before any network call.
pub fn group_column(field: &str) -> Result<&'static str, TreeApiError> {
    GROUPABLE_FIELDS
        .iter()
        .find(|(name, _)| *name == field)
        .map(|(_, column)| *column)
        .ok_or_else(|| {
            TreeApiError::invalid_parameter(format!(
                "unknown group field '{field}', expected one of: {}",
                groupable_field_names().join(", ")
            ))
        })
}

/// Names accepted by [`group_column`], for schema descriptions and errors.
pub fn groupable_field_names() -> Vec<&'static str> {
    GROUPABLE_FIELDS.iter().map(|(name, _)| *name).collect()
}

/// Turn raw provider group rows into presentation-ready buckets.
///
/// Null or blank grouped values land in the [`UNSPECIFIED_BUCKET`]; rows
/// that collapse onto the same key are merged. Truncation to `top` buckets
/// happens after sorting, never before.
pub fn buckets_from_group_counts(rows: Vec<GroupCount>, top: Option<usize>) -> Vec<GroupBucket> {
    let mut counts: HashMap<String, u64> = HashMap::new();
    for row in rows {
        let key = row
            .value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(UNSPECIFIED_BUCKET);
        *counts.entry(key.to_string()).or_default() += row.count;
    }

    let mut buckets: Vec<GroupBucket> = counts
        .into_iter()
        .map(|(key, count)| GroupBucket { key, count })
        .collect();
    buckets.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.key.cmp(&b.key)));

    if let Some(top) = top {
        buckets.truncate(top);
    }
    buckets
}

/// Count records per distinct value of `field` over an in-memory sequence,
/// under the same ordering and bucketing rules as the provider-side path.
pub fn count_by_group(field: &str, records: &[TreeRecord], top: Option<usize>) -> Vec<GroupBucket> {
    let rows = records
        .iter()
        .map(|record| GroupCount {
            value: group_key(field, record).map(str::to_string),
            count: 1,
        })
        .collect();
    buckets_from_group_counts(rows, top)
}

fn group_key<'a>(field: &str, record: &'a TreeRecord) -> Option<&'a str> {
    match field {
        "species" => record.species.as_deref(),
        "genus" => record.genus.as_deref(),
        "district" => record.district.as_deref(),
        "variety" => record.variety.as_deref(),
        "development_stage" => record.development_stage.as_deref(),
        _ => None,
    }
}
