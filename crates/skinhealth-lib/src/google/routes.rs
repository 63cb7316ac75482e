use serde::{Deserialize, Serialize};

use super::{ensure_success, km_text, MapsClient};
use crate::duration::{format_duration, UNKNOWN_DURATION};
use crate::error::{Error, Result};
use crate::geo::{round_to_tenth, Coordinate};
use crate::hospital::RouteEstimate;

/// Fields requested from `computeRoutes`.
pub const ROUTES_FIELD_MASK: &str = "routes.duration,routes.distanceMeters";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ComputeRoutesBody {
    origin: Waypoint,
    destination: Waypoint,
    travel_mode: &'static str,
    routing_preference: &'static str,
}

#[derive(Debug, Serialize)]
struct Waypoint {
    location: WaypointLocation,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WaypointLocation {
    lat_lng: LatLngLiteral,
}

#[derive(Debug, Serialize)]
struct LatLngLiteral {
    latitude: f64,
    longitude: f64,
}

impl From<Coordinate> for Waypoint {
    fn from(c: Coordinate) -> Self {
        Self {
            location: WaypointLocation {
                lat_lng: LatLngLiteral {
                    latitude: c.lat,
                    longitude: c.lng,
                },
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct ComputeRoutesResponse {
    #[serde(default)]
    routes: Vec<Route>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Route {
    #[serde(default)]
    distance_meters: u64,
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MatrixResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    rows: Vec<MatrixRow>,
}

#[derive(Debug, Deserialize)]
struct MatrixRow {
    #[serde(default)]
    elements: Vec<MatrixElement>,
}

#[derive(Debug, Deserialize)]
struct MatrixElement {
    #[serde(default)]
    status: String,
    distance: Option<TextValue>,
    duration: Option<TextValue>,
}

#[derive(Debug, Deserialize)]
struct TextValue {
    text: Option<String>,
    value: Option<f64>,
}

impl MapsClient {
    /// Driving route between two points via the Routes API.
    pub async fn compute_route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<RouteEstimate> {
        let key = self.api_key("routes")?;
        let body = ComputeRoutesBody {
            origin: origin.into(),
            destination: destination.into(),
            travel_mode: "DRIVE",
            routing_preference: "TRAFFIC_AWARE",
        };

        let response = self
            .http
            .post(format!("{}/directions/v2:computeRoutes", self.routes_url))
            .header("X-Goog-Api-Key", key)
            .header("X-Goog-FieldMask", ROUTES_FIELD_MASK)
            .json(&body)
            .send()
            .await?;
        let payload: ComputeRoutesResponse = ensure_success("routes", response)?.json().await?;

        let route = payload.routes.into_iter().next().ok_or_else(|| Error::NoRoute {
            origin: origin.to_string(),
            destination: destination.to_string(),
        })?;

        let distance_km = round_to_tenth(route.distance_meters as f64 / 1000.0);
        Ok(RouteEstimate {
            distance_km,
            distance_text: km_text(distance_km),
            duration_text: format_duration(route.duration.as_deref().unwrap_or("0s")),
        })
    }

    /// Driving distance via the legacy Distance Matrix API.
    pub async fn distance_matrix(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<RouteEstimate> {
        let key = self.api_key("distance_matrix")?;
        let origins = origin.to_string();
        let destinations = destination.to_string();

        let response = self
            .http
            .get(&self.distance_matrix_url)
            .query(&[
                ("origins", origins.as_str()),
                ("destinations", destinations.as_str()),
                ("mode", "driving"),
                ("units", "metric"),
                ("key", key),
            ])
            .send()
            .await?;
        let payload: MatrixResponse = ensure_success("distance_matrix", response)?.json().await?;

        if payload.status != "OK" {
            return Err(Error::UpstreamPayload {
                service: "distance_matrix",
                message: format!("API status: {}", payload.status),
            });
        }

        let element = payload
            .rows
            .into_iter()
            .next()
            .and_then(|row| row.elements.into_iter().next())
            .filter(|element| element.status == "OK")
            .ok_or_else(|| Error::UpstreamPayload {
                service: "distance_matrix",
                message: "No valid elements in response".to_string(),
            })?;

        let meters = element.distance.as_ref().and_then(|d| d.value).unwrap_or(0.0);
        let distance_km = round_to_tenth(meters / 1000.0);
        let distance_text = element
            .distance
            .and_then(|d| d.text)
            .unwrap_or_else(|| km_text(distance_km));
        let duration_text = element
            .duration
            .and_then(|d| d.text)
            .unwrap_or_else(|| UNKNOWN_DURATION.to_string());

        Ok(RouteEstimate {
            distance_km,
            distance_text,
            duration_text,
        })
    }
}
