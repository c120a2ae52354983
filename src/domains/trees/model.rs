//! Data model for the Paris tree inventory.
//!
//! These types are serde views of the OpenDataSoft Explore API v2.1 payloads.
//! In v2.1 the field values sit directly on the record object (not nested
//! under a `fields` key as in v1.x). Every source field is optional: a field
//! the provider did not populate stays `None`, so callers can tell "not
//! provided" apart from a zero value.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// WGS84 coordinates of a tree.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

/// One entry of the tree catalog, normalized to a stable output schema.
///
/// Deserialization reads the provider's French column names; serialization
/// uses the normalized names below.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TreeRecord {
    /// Provider record identifier.
    #[serde(rename(deserialize = "idbase"))]
    pub id: Option<i64>,

    /// French common species name (`libellefrancais`).
    #[serde(rename(deserialize = "libellefrancais"))]
    pub species: Option<String>,

    /// Botanical genus (`genre`).
    #[serde(rename(deserialize = "genre"))]
    pub genus: Option<String>,

    /// Scientific species epithet (`espece`).
    #[serde(rename(deserialize = "espece"))]
    pub scientific_species: Option<String>,

    /// Cultivated variety (`variete`).
    #[serde(rename(deserialize = "variete"))]
    pub variety: Option<String>,

    /// District, e.g. "PARIS 5E ARR" or "BOIS DE BOULOGNE".
    #[serde(rename(deserialize = "arrondissement"))]
    pub district: Option<String>,

    /// Street address of the planting site.
    #[serde(rename(deserialize = "adresse"))]
    pub address: Option<String>,

    /// Height in meters.
    #[serde(rename(deserialize = "hauteurenm"))]
    pub height_m: Option<f64>,

    /// Trunk circumference in centimeters.
    #[serde(rename(deserialize = "circonferenceencm"))]
    pub circumference_cm: Option<f64>,

    /// Development stage (young, adult, mature).
    #[serde(rename(deserialize = "stadedeveloppement"))]
    pub development_stage: Option<String>,

    /// Heritage status as recorded by the provider ("OUI" or empty).
    #[serde(rename(deserialize = "remarquable"))]
    pub remarkable: Option<String>,

    /// Planting date, when the provider recorded one.
    #[serde(rename(deserialize = "dateplantation"))]
    pub planted: Option<String>,

    /// Coordinates of the tree.
    #[serde(rename(deserialize = "geo_point_2d"))]
    pub location: Option<GeoPoint>,
}

impl TreeRecord {
    /// Whether this tree is heritage-listed.
    pub fn is_remarkable(&self) -> bool {
        self.remarkable
            .as_deref()
            .is_some_and(|v| v.eq_ignore_ascii_case("oui"))
    }
}

/// One page of records from the provider.
///
/// `total_count` reflects the full matching set, not just this page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecordsPage {
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub results: Vec<TreeRecord>,
}

/// One provider-side group-by row: the raw grouped value (None when the
/// provider grouped records lacking the field) and its exact count over the
/// full matching set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupCount {
    pub value: Option<String>,
    pub count: u64,
}

/// Raw shape of a grouped `/records` response. The grouped column name
/// varies per query, so rows stay as JSON maps until the client extracts
/// the value and count.
#[derive(Debug, Default, Deserialize)]
pub struct GroupRowsPage {
    #[serde(default)]
    pub results: Vec<serde_json::Map<String, serde_json::Value>>,
}

/// One field of the dataset schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: Option<String>,
    pub label: Option<String>,
}

/// Dataset metadata as returned by `get_dataset_info`.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetInfo {
    pub dataset_id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub records_count: Option<u64>,
    pub modified: Option<DateTime<Utc>>,
    pub fields: Vec<FieldInfo>,
}

// Raw shape of `GET /catalog/datasets/{id}`: the dataset object is wrapped
// under a `dataset` key, with display metadata under `metas.default`.

#[derive(Debug, Deserialize)]
pub struct DatasetResponse {
    pub dataset: DatasetBody,
}

#[derive(Debug, Deserialize)]
pub struct DatasetBody {
    #[serde(default)]
    pub dataset_id: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldInfo>,
    #[serde(default)]
    pub metas: DatasetMetas,
}

#[derive(Debug, Default, Deserialize)]
pub struct DatasetMetas {
    #[serde(default)]
    pub default: DefaultMetas,
}

#[derive(Debug, Default, Deserialize)]
pub struct DefaultMetas {
    pub title: Option<String>,
    pub description: Option<String>,
    pub records_count: Option<u64>,
    pub modified: Option<DateTime<Utc>>,
}

impl From<DatasetResponse> for DatasetInfo {
    fn from(response: DatasetResponse) -> Self {
        let DatasetBody {
            dataset_id,
            fields,
            metas,
        } = response.dataset;
        Self {
            dataset_id,
            title: metas.default.title,
            description: metas.default.description,
            records_count: metas.default.records_count,
            modified: metas.default.modified,
            fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_deserializes_provider_field_names() {
        let json = serde_json::json!({
            "idbase": 2002348,
            "libellefrancais": "Platane",
            "genre": "Platanus",
            "espece": "x hispanica",
            "arrondissement": "PARIS 7E ARR",
            "adresse": "QUAI BRANLY",
            "hauteurenm": 25,
            "circonferenceencm": 320,
            "remarquable": "OUI",
            "geo_point_2d": { "lat": 48.8589, "lon": 2.2937 }
        });
        let record: TreeRecord = serde_json::from_value(json).unwrap();
        assert_eq!(record.id, Some(2002348));
        assert_eq!(record.species.as_deref(), Some("Platane"));
        assert_eq!(record.district.as_deref(), Some("PARIS 7E ARR"));
        assert_eq!(record.height_m, Some(25.0));
        assert!(record.is_remarkable());
        assert_eq!(record.location.unwrap().lat, 48.8589);
    }

    #[test]
    fn test_missing_fields_stay_absent() {
        let record: TreeRecord = serde_json::from_value(serde_json::json!({
            "libellefrancais": "Tilleul"
        }))
        .unwrap();
        assert_eq!(record.height_m, None);
        assert_eq!(record.location, None);
        assert!(!record.is_remarkable());

        // And serialize back out as explicit nulls, never placeholders.
        let out = serde_json::to_value(&record).unwrap();
        assert_eq!(out["height_m"], serde_json::Value::Null);
        assert_eq!(out["species"], "Tilleul");
    }

    #[test]
    fn test_records_page_total_count_passthrough() {
        let page: RecordsPage = serde_json::from_value(serde_json::json!({
            "total_count": 12345,
            "results": [{ "libellefrancais": "Erable" }]
        }))
        .unwrap();
        assert_eq!(page.total_count, 12345);
        assert_eq!(page.results.len(), 1);
    }

    #[test]
    fn test_dataset_response_mapping() {
        let response: DatasetResponse = serde_json::from_value(serde_json::json!({
            "dataset": {
                "dataset_id": "les-arbres",
                "fields": [
                    { "name": "libellefrancais", "type": "text", "label": "Libellé français" }
                ],
                "metas": {
                    "default": {
                        "title": "Les arbres",
                        "records_count": 207641,
                        "modified": "2024-05-03T04:30:02+00:00"
                    }
                }
            }
        }))
        .unwrap();
        let info = DatasetInfo::from(response);
        assert_eq!(info.dataset_id.as_deref(), Some("les-arbres"));
        assert_eq!(info.records_count, Some(207641));
        assert_eq!(info.fields[0].name, "libellefrancais");
        assert!(info.modified.is_some());
    }

    #[test]
    fn test_remarkable_is_case_insensitive() {
        let record = TreeRecord {
            remarkable: Some("Oui".into()),
            ..Default::default()
        };
        assert!(record.is_remarkable());
        let record = TreeRecord {
            remarkable: Some("NON".into()),
            ..Default::default()
        };
        assert!(!record.is_remarkable());
    }
}
