//! Hospital records and the request/result types that flow through the locator.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;

/// Default search radius in metres.
pub const DEFAULT_RADIUS_METERS: u32 = 25_000;

/// Identifier prefix reserved for synthetic (degraded mode) records.
pub const SYNTHETIC_ID_PREFIX: &str = "demo_";

/// A hospital as returned to callers.
///
/// Created by Place Search, completed by Distance Enrichment. Field names on
/// the wire match what the browser frontend consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HospitalRecord {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub address: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub user_ratings_total: u32,
    pub place_id: String,
    #[serde(default)]
    pub types: Vec<String>,

    /// Driving distance in kilometres, one decimal.
    #[serde(rename = "distance", default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directions_url: Option<String>,
    /// Which enrichment tier produced the distance fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_source: Option<DistanceSource>,
}

impl HospitalRecord {
    /// Create a record with no distance information attached yet.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        location: Coordinate,
        address: impl Into<String>,
    ) -> Self {
        let id = id.into();
        Self {
            place_id: id.clone(),
            id,
            name: name.into(),
            lat: location.lat,
            lng: location.lng,
            address: address.into(),
            rating: 0.0,
            user_ratings_total: 0,
            types: Vec::new(),
            distance_km: None,
            distance_text: None,
            duration_text: None,
            directions_url: None,
            distance_source: None,
        }
    }

    pub fn with_rating(mut self, rating: f64, count: u32) -> Self {
        self.rating = rating;
        self.user_ratings_total = count;
        self
    }

    pub fn with_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.types = types.into_iter().map(Into::into).collect();
        self
    }

    pub fn location(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }

    /// True for records produced by the synthetic fallback catalog.
    pub fn is_synthetic(&self) -> bool {
        self.id.starts_with(SYNTHETIC_ID_PREFIX)
    }

    /// True once every distance field has been populated.
    pub fn is_enriched(&self) -> bool {
        self.distance_km.is_some()
            && self.distance_text.is_some()
            && self.duration_text.is_some()
            && self.directions_url.is_some()
    }

    /// Attach a resolved distance to this record.
    pub fn apply_distance(&mut self, result: DistanceResult, source: DistanceSource) {
        self.distance_km = Some(result.distance_km);
        self.distance_text = Some(result.distance_text);
        self.duration_text = Some(result.duration_text);
        self.directions_url = Some(result.directions_url);
        self.distance_source = Some(source);
    }
}

/// Coordinate plus search radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchRequest {
    pub origin: Coordinate,
    pub radius_meters: u32,
}

impl SearchRequest {
    pub fn new(origin: Coordinate, radius_meters: u32) -> Self {
        Self {
            origin,
            radius_meters,
        }
    }

    /// Radius expressed in kilometres.
    pub fn radius_km(&self) -> f64 {
        f64::from(self.radius_meters) / 1000.0
    }
}

/// Driving distance and time produced by one enrichment tier.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteEstimate {
    pub distance_km: f64,
    pub distance_text: String,
    pub duration_text: String,
}

/// Distance fields attached to a single record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceResult {
    pub distance_km: f64,
    pub distance_text: String,
    pub duration_text: String,
    pub directions_url: String,
}

impl DistanceResult {
    pub fn from_estimate(estimate: RouteEstimate, directions_url: String) -> Self {
        Self {
            distance_km: estimate.distance_km,
            distance_text: estimate.distance_text,
            duration_text: estimate.duration_text,
            directions_url,
        }
    }
}

/// Origin of a record's distance fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceSource {
    Routes,
    DistanceMatrix,
    Estimate,
}

impl DistanceSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DistanceSource::Routes => "routes",
            DistanceSource::DistanceMatrix => "distance_matrix",
            DistanceSource::Estimate => "estimate",
        }
    }
}

impl fmt::Display for DistanceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Google Maps driving-directions link between two coordinates.
pub fn directions_url(origin: &Coordinate, destination: &Coordinate) -> String {
    format!(
        "https://www.google.com/maps/dir/{},{}/{},{}",
        origin.lat, origin.lng, destination.lat, destination.lng
    )
}
