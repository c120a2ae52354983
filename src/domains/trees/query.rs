//! Query builder for the OpenDataSoft Explore API v2.1.
//!
//! Translates high-level filters into the provider's ODSQL dialect: a
//! boolean `where` expression of equality, range and substring predicates
//! joined by AND, plus `order_by`/`limit`/`offset` query parameters.

use super::error::TreeApiError;

/// Default page size when the caller does not ask for one.
pub const DEFAULT_LIMIT: u32 = 20;

/// Maximum page size enforced by the provider.
pub const MAX_LIMIT: u32 = 100;

/// Tool-facing sort fields mapped to provider column names.
const SORTABLE_FIELDS: &[(&str, &str)] = &[
    ("species", "libellefrancais"),
    ("genus", "genre"),
    ("district", "arrondissement"),
    ("address", "adresse"),
    ("height", "hauteurenm"),
    ("circumference", "circonferenceencm"),
];

/// Optional record filters, built fresh for each call.
///
/// Absent or blank fields contribute no predicate at all.
#[derive(Debug, Clone, Default)]
pub struct SearchFilter {
    /// Substring match on the French common name.
    pub species: Option<String>,
    /// Exact match on the French common name (used by species reports).
    pub species_exact: Option<String>,
    /// Exact match on the genus.
    pub genus: Option<String>,
    /// Exact match on the district, e.g. "PARIS 5E ARR".
    pub district: Option<String>,
    pub min_height_m: Option<f64>,
    pub max_height_m: Option<f64>,
    pub min_circumference_cm: Option<f64>,
    pub max_circumference_cm: Option<f64>,
    /// Restrict to heritage-listed trees (`remarquable='OUI'`).
    pub remarkable_only: bool,
    /// Free-text term matched across all fields.
    pub search: Option<String>,
}

impl SearchFilter {
    /// Individual ODSQL predicates, one per populated filter.
    pub fn predicates(&self) -> Vec<String> {
        let mut preds = Vec::new();
        if let Some(species) = trimmed(&self.species) {
            preds.push(format!("libellefrancais like {}", string_literal(species)));
        }
        if let Some(species) = trimmed(&self.species_exact) {
            preds.push(format!("libellefrancais={}", string_literal(species)));
        }
        if let Some(genus) = trimmed(&self.genus) {
            preds.push(format!("genre={}", string_literal(genus)));
        }
        if let Some(district) = trimmed(&self.district) {
            preds.push(format!("arrondissement={}", string_literal(district)));
        }
        if let Some(min) = self.min_height_m {
            preds.push(format!("hauteurenm>={min}"));
        }
        if let Some(max) = self.max_height_m {
            preds.push(format!("hauteurenm<={max}"));
        }
        if let Some(min) = self.min_circumference_cm {
            preds.push(format!("circonferenceencm>={min}"));
        }
        if let Some(max) = self.max_circumference_cm {
            preds.push(format!("circonferenceencm<={max}"));
        }
        if self.remarkable_only {
            preds.push("remarquable=\"OUI\"".to_string());
        }
        if let Some(term) = trimmed(&self.search) {
            // A bare quoted string is ODSQL full-text search.
            preds.push(string_literal(term));
        }
        preds
    }

    /// Full `where` expression, or `None` when no filter is populated.
    pub fn where_clause(&self) -> Option<String> {
        let preds = self.predicates();
        if preds.is_empty() {
            None
        } else {
            Some(preds.join(" AND "))
        }
    }
}

/// The parameters of one records request, ready to be sent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordsQuery {
    pub where_clause: Option<String>,
    pub order_by: Option<String>,
    pub limit: u32,
    pub offset: u64,
}

impl RecordsQuery {
    /// Query-string pairs for the provider's `/records` endpoint.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("limit", self.limit.to_string()),
            ("offset", self.offset.to_string()),
        ];
        if let Some(where_clause) = &self.where_clause {
            params.push(("where", where_clause.clone()));
        }
        if let Some(order_by) = &self.order_by {
            params.push(("order_by", order_by.clone()));
        }
        params
    }
}

/// Validate and clamp a caller-supplied page size.
///
/// `None` falls back to [`DEFAULT_LIMIT`]; values above [`MAX_LIMIT`] are
/// clamped; values ≤ 0 are rejected.
pub fn validate_limit(limit: Option<i64>) -> Result<u32, TreeApiError> {
    match limit {
        None => Ok(DEFAULT_LIMIT),
        Some(l) if l <= 0 => Err(TreeApiError::invalid_parameter(format!(
            "limit must be positive, got {l}"
        ))),
        Some(l) => Ok((l as u64).min(MAX_LIMIT as u64) as u32),
    }
}

/// Resolve a tool-facing sort field into an `order_by` expression.
///
/// Unknown fields are rejected rather than passed through to the provider.
pub fn sort_spec(sort_by: Option<&str>, descending: bool) -> Result<Option<String>, TreeApiError> {
    let Some(field) = sort_by.map(str::trim).filter(|f| !f.is_empty()) else {
        return Ok(None);
    };
    let column = SORTABLE_FIELDS
        .iter()
        .find(|(name, _)| *name == field)
        .map(|(_, column)| *column)
        .ok_or_else(|| {
            TreeApiError::invalid_parameter(format!(
                "unknown sort field '{field}', expected one of: {}",
                sortable_field_names().join(", ")
            ))
        })?;
    let direction = if descending { "DESC" } else { "ASC" };
    Ok(Some(format!("{column} {direction}")))
}

/// Names accepted by [`sort_spec`], for schema descriptions and errors.
pub fn sortable_field_names() -> Vec<&'static str> {
    SORTABLE_FIELDS.iter().map(|(name, _)| *name).collect()
}

/// ODSQL predicate restricting records to a radius around a point.
pub fn distance_predicate(lat: f64, lon: f64, radius_m: f64) -> String {
    format!("distance(geo_point_2d, geom'POINT({lon} {lat})', {radius_m}m)")
}

/// `order_by` expression sorting records nearest-first from a point.
pub fn distance_order(lat: f64, lon: f64) -> String {
    format!("distance(geo_point_2d, geom'POINT({lon} {lat})') ASC")
}

/// Quote a string as an ODSQL literal, escaping quotes and backslashes so
/// user input cannot break out of the expression.
pub fn string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

fn trimmed(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
