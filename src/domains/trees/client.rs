//! HTTP client adapter for the OpenDataSoft Explore API.
//!
//! The provider is hidden behind the narrow [`TreeCatalog`] trait (dataset
//! metadata, one records query, one group-by count) so the query builder,
//! normalizer and aggregation logic can be exercised against a fake without
//! network access.

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use crate::core::config::OpenDataConfig;

use super::error::TreeApiError;
use super::model::{DatasetInfo, DatasetResponse, GroupCount, GroupRowsPage, RecordsPage};
use super::query::{MAX_LIMIT, RecordsQuery};

/// Upper bound on group-by pages fetched per aggregation. The groupable
/// columns of this dataset have at most a few hundred distinct values, well
/// inside this bound.
const MAX_GROUP_PAGES: usize = 20;

/// Alias the provider is asked to put the per-group count under.
const GROUP_COUNT_ALIAS: &str = "tree_count";

/// Cap on the provider message echoed back in error results.
const MAX_ERROR_BODY: usize = 500;

/// The remote catalog as seen by the tool dispatcher.
#[async_trait]
pub trait TreeCatalog: Send + Sync {
    /// Fetch dataset-level metadata.
    async fn dataset_info(&self) -> Result<DatasetInfo, TreeApiError>;

    /// Execute one filtered, paginated records query.
    async fn records(&self, query: &RecordsQuery) -> Result<RecordsPage, TreeApiError>;

    /// Count the records matching `where_clause` per distinct value of
    /// `column`, aggregated provider-side over the full matching set.
    async fn group_counts(
        &self,
        where_clause: Option<String>,
        column: &str,
    ) -> Result<Vec<GroupCount>, TreeApiError>;
}

/// `reqwest`-backed [`TreeCatalog`] implementation.
///
/// One GET per call, bounded timeout, no retry. An API key, when configured,
/// is passed through as an `Authorization: Apikey …` header.
pub struct OpenDataClient {
    http: reqwest::Client,
    base_url: String,
    dataset_id: String,
    api_key: Option<String>,
}

impl OpenDataClient {
    pub fn new(config: &OpenDataConfig) -> crate::core::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| crate::core::Error::config(e.to_string()))?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            dataset_id: config.dataset_id.clone(),
            api_key: config.api_key.clone(),
        })
    }

    fn records_path(&self) -> String {
        format!("/catalog/datasets/{}/records", self.dataset_id)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, TreeApiError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, ?params, "querying open-data provider");

        let mut request = self.http.get(&url).query(params);
        if let Some(key) = &self.api_key {
            request = request.header(AUTHORIZATION, format!("Apikey {key}"));
        }

        let response = request.send().await.map_err(classify_transport_error)?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(TreeApiError::RemoteService {
                status: status.as_u16(),
                message: truncate(message),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| TreeApiError::ResponseParse(e.to_string()))
    }
}

#[async_trait]
impl TreeCatalog for OpenDataClient {
    async fn dataset_info(&self) -> Result<DatasetInfo, TreeApiError> {
        let path = format!("/catalog/datasets/{}", self.dataset_id);
        let response: DatasetResponse = self.get_json(&path, &[]).await?;
        Ok(response.into())
    }

    async fn records(&self, query: &RecordsQuery) -> Result<RecordsPage, TreeApiError> {
        self.get_json(&self.records_path(), &query.to_params()).await
    }

    async fn group_counts(
        &self,
        where_clause: Option<String>,
        column: &str,
    ) -> Result<Vec<GroupCount>, TreeApiError> {
        let path = self.records_path();
        let mut rows = Vec::new();
        let mut offset = 0u64;

        // Group pages are ordered by the grouped column so paging stays
        // stable; presentation order is applied locally afterwards.
        for _ in 0..MAX_GROUP_PAGES {
            let mut params = vec![
                (
                    "select",
                    format!("{column}, count(*) as {GROUP_COUNT_ALIAS}"),
                ),
                ("group_by", column.to_string()),
                ("order_by", format!("{column} ASC")),
                ("limit", MAX_LIMIT.to_string()),
                ("offset", offset.to_string()),
            ];
            if let Some(clause) = &where_clause {
                params.push(("where", clause.clone()));
            }

            let page: GroupRowsPage = self.get_json(&path, &params).await?;
            let fetched = page.results.len();
            for row in page.results {
                rows.push(parse_group_row(row, column)?);
            }

            if fetched < MAX_LIMIT as usize {
                break;
            }
            offset += fetched as u64;
        }

        Ok(rows)
    }
}

fn parse_group_row(
    mut row: serde_json::Map<String, serde_json::Value>,
    column: &str,
) -> Result<GroupCount, TreeApiError> {
    let count = row
        .get(GROUP_COUNT_ALIAS)
        .and_then(serde_json::Value::as_u64)
        .ok_or_else(|| {
            TreeApiError::ResponseParse(format!(
                "group row for '{column}' lacks a numeric {GROUP_COUNT_ALIAS}"
            ))
        })?;
    let value = match row.remove(column) {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    };
    Ok(GroupCount { value, count })
}

fn classify_transport_error(error: reqwest::Error) -> TreeApiError {
    if error.is_decode() {
        TreeApiError::ResponseParse(error.to_string())
    } else {
        // Timeouts, connection refusals and other transport failures are
        // all retryable from the caller's point of view.
        TreeApiError::TransientNetwork(error.to_string())
    }
}

fn truncate(mut message: String) -> String {
    if message.len() > MAX_ERROR_BODY {
        let mut end = MAX_ERROR_BODY;
        while !message.is_char_boundary(end) {
            end -= 1;
        }
        message.truncate(end);
        message.push('…');
    }
    message
}
