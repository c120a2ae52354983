//! Geographic helpers: haversine distance and radius filtering.

use schemars::JsonSchema;
use serde::Serialize;

use super::error::TreeApiError;
use super::model::{GeoPoint, TreeRecord};

/// Mean Earth radius used by the haversine approximation.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two points, in kilometers.
///
/// Spherical-earth approximation; advisory, not survey-grade.
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat_a = a.lat.to_radians();
    let lat_b = b.lat.to_radians();
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

/// A tree record with its computed distance from a reference point.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct LocatedTree {
    /// Haversine distance from the query point, in meters.
    pub distance_m: f64,
    #[serde(flatten)]
    pub tree: TreeRecord,
}

/// Reference point plus radius for proximity searches.
#[derive(Debug, Clone, Copy)]
pub struct GeoQuery {
    pub center: GeoPoint,
    pub radius_m: f64,
}

impl GeoQuery {
    /// Validate coordinates and radius before any network call.
    pub fn new(lat: f64, lon: f64, radius_m: f64) -> Result<Self, TreeApiError> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(TreeApiError::invalid_parameter(format!(
                "latitude must be within [-90, 90], got {lat}"
            )));
        }
        if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
            return Err(TreeApiError::invalid_parameter(format!(
                "longitude must be within [-180, 180], got {lon}"
            )));
        }
        if !radius_m.is_finite() || radius_m <= 0.0 {
            return Err(TreeApiError::invalid_parameter(format!(
                "radius must be positive, got {radius_m}"
            )));
        }
        Ok(Self {
            center: GeoPoint { lat, lon },
            radius_m,
        })
    }

    /// Attach distances, drop records without coordinates or beyond the
    /// radius, and sort nearest-first.
    pub fn filter_and_sort(&self, records: Vec<TreeRecord>) -> Vec<LocatedTree> {
        let mut located: Vec<LocatedTree> = records
            .into_iter()
            .filter_map(|tree| {
                let point = tree.location?;
                let distance_m = haversine_km(self.center, point) * 1000.0;
                (distance_m <= self.radius_m).then_some(LocatedTree { distance_m, tree })
            })
            .collect();
        located.sort_by(|a, b| a.distance_m.total_cmp(&b.distance_m));
        located
    }
}
