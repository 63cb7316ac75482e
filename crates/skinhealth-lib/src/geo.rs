//! Geographic primitives: coordinates and great-circle distance.
//!
//! The Haversine implementation here is the only distance metric used for
//! radius filtering and for the local driving-distance estimate.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A WGS84 latitude/longitude pair in degrees.
///
/// Values are not range-checked; out-of-range input is passed through as-is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Return a coordinate shifted by fixed angular offsets (degrees).
    pub fn offset(&self, dlat: f64, dlng: f64) -> Self {
        Self::new(self.lat + dlat, self.lng + dlng)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

/// Great-circle distance in kilometres between two coordinates.
///
/// ```
/// use skinhealth_lib::geo::{haversine_km, Coordinate};
///
/// let a = Coordinate::new(0.0, 0.0);
/// assert_eq!(haversine_km(&a, &a), 0.0);
/// ```
pub fn haversine_km(a: &Coordinate, b: &Coordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = lat2 - lat1;
    let dlon = b.lng.to_radians() - a.lng.to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// True when `candidate` lies within `radius_meters` of `origin` by Haversine distance.
pub fn within_radius(origin: &Coordinate, candidate: &Coordinate, radius_meters: u32) -> bool {
    haversine_km(origin, candidate) <= f64::from(radius_meters) / 1000.0
}

/// Round to one decimal place.
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
