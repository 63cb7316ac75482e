use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ensure_success, MapsClient};
use crate::error::{Error, Result};
use crate::geo::Coordinate;
use crate::hospital::{HospitalRecord, SearchRequest};

/// Fields requested from `places:searchText`.
pub const PLACES_FIELD_MASK: &str = "places.id,places.displayName,places.formattedAddress,places.location,places.rating,places.userRatingCount,places.types";

const MAX_RESULT_COUNT: u32 = 20;
const UNKNOWN_NAME: &str = "Unknown Hospital";
const UNKNOWN_ADDRESS: &str = "Address not available";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TextSearchBody {
    text_query: String,
    location_bias: LocationBias,
    max_result_count: u32,
}

#[derive(Debug, Serialize)]
struct LocationBias {
    circle: Circle,
}

#[derive(Debug, Serialize)]
struct Circle {
    center: LatLng,
    radius: f64,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct LatLng {
    #[serde(default)]
    latitude: f64,
    #[serde(default)]
    longitude: f64,
}

#[derive(Debug, Deserialize)]
struct TextSearchResponse {
    #[serde(default)]
    places: Vec<Place>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Place {
    #[serde(default)]
    id: String,
    display_name: Option<LocalizedText>,
    formatted_address: Option<String>,
    #[serde(default)]
    location: LatLng,
    rating: Option<f64>,
    user_rating_count: Option<u32>,
    #[serde(default)]
    types: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct LocalizedText {
    text: Option<String>,
}

impl From<Place> for HospitalRecord {
    fn from(place: Place) -> Self {
        let name = place
            .display_name
            .and_then(|n| n.text)
            .unwrap_or_else(|| UNKNOWN_NAME.to_string());
        HospitalRecord::new(
            place.id,
            name,
            Coordinate::new(place.location.latitude, place.location.longitude),
            place
                .formatted_address
                .unwrap_or_else(|| UNKNOWN_ADDRESS.to_string()),
        )
        .with_rating(place.rating.unwrap_or(0.0), place.user_rating_count.unwrap_or(0))
        .with_types(place.types)
    }
}

#[derive(Debug, Deserialize)]
struct NearbyResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    results: Vec<NearbyPlace>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NearbyPlace {
    #[serde(default)]
    place_id: String,
    name: Option<String>,
    geometry: Option<Geometry>,
    vicinity: Option<String>,
    rating: Option<f64>,
    user_ratings_total: Option<u32>,
    #[serde(default)]
    types: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    #[serde(default)]
    location: LegacyLatLng,
}

#[derive(Debug, Default, Deserialize)]
struct LegacyLatLng {
    #[serde(default)]
    lat: f64,
    #[serde(default)]
    lng: f64,
}

impl From<NearbyPlace> for HospitalRecord {
    fn from(place: NearbyPlace) -> Self {
        let location = place.geometry.map(|g| g.location).unwrap_or_default();
        HospitalRecord::new(
            place.place_id,
            place.name.unwrap_or_else(|| UNKNOWN_NAME.to_string()),
            Coordinate::new(location.lat, location.lng),
            place.vicinity.unwrap_or_else(|| UNKNOWN_ADDRESS.to_string()),
        )
        .with_rating(place.rating.unwrap_or(0.0), place.user_ratings_total.unwrap_or(0))
        .with_types(place.types)
    }
}

impl MapsClient {
    /// Location-biased text search for hospitals. Results are not radius-filtered.
    pub async fn search_text(&self, request: &SearchRequest) -> Result<Vec<HospitalRecord>> {
        let key = self.api_key("places")?;
        let origin = request.origin;
        let body = TextSearchBody {
            text_query: format!("hospitals near {},{}", origin.lat, origin.lng),
            location_bias: LocationBias {
                circle: Circle {
                    center: LatLng {
                        latitude: origin.lat,
                        longitude: origin.lng,
                    },
                    radius: f64::from(request.radius_meters),
                },
            },
            max_result_count: MAX_RESULT_COUNT,
        };

        let response = self
            .http
            .post(format!("{}/v1/places:searchText", self.places_url))
            .header("X-Goog-Api-Key", key)
            .header("X-Goog-FieldMask", PLACES_FIELD_MASK)
            .json(&body)
            .send()
            .await?;
        let payload: TextSearchResponse = ensure_success("places", response)?.json().await?;
        debug!(candidates = payload.places.len(), "places text search answered");

        Ok(payload.places.into_iter().map(HospitalRecord::from).collect())
    }

    /// Legacy nearby search restricted to the `hospital` type.
    ///
    /// `ZERO_RESULTS` is an empty list; any other non-`OK` status is an error.
    pub async fn nearby_search(&self, request: &SearchRequest) -> Result<Vec<HospitalRecord>> {
        let key = self.api_key("places_legacy")?;
        let origin = request.origin;
        let location = format!("{},{}", origin.lat, origin.lng);
        let radius = request.radius_meters.to_string();

        let response = self
            .http
            .get(format!("{}/nearbysearch/json", self.places_legacy_url))
            .query(&[
                ("location", location.as_str()),
                ("radius", radius.as_str()),
                ("type", "hospital"),
                ("key", key),
            ])
            .send()
            .await?;
        let payload: NearbyResponse = ensure_success("places_legacy", response)?.json().await?;

        match payload.status.as_str() {
            "OK" => Ok(payload.results.into_iter().map(HospitalRecord::from).collect()),
            "ZERO_RESULTS" => Ok(Vec::new()),
            status => Err(Error::UpstreamPayload {
                service: "places_legacy",
                message: format!(
                    "{} - {}",
                    status,
                    payload.error_message.as_deref().unwrap_or("Unknown error")
                ),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn place_conversion_applies_defaults() {
        let place: Place = serde_json::from_str(r#"{"id":"p1"}"#).unwrap();
        let record = HospitalRecord::from(place);
        assert_eq!(record.id, "p1");
        assert_eq!(record.place_id, "p1");
        assert_eq!(record.name, "Unknown Hospital");
        assert_eq!(record.address, "Address not available");
        assert_eq!(record.rating, 0.0);
        assert_eq!(record.user_ratings_total, 0);
        assert_eq!(record.location(), Coordinate::new(0.0, 0.0));
    }

    #[test]
    fn place_conversion_reads_every_field() {
        let place: Place = serde_json::from_str(
            r#"{
                "id": "p2",
                "displayName": {"text": "City Hospital", "languageCode": "en"},
                "formattedAddress": "1 Road",
                "location": {"latitude": 13.03, "longitude": 77.55},
                "rating": 4.5,
                "userRatingCount": 120,
                "types": ["hospital", "health"]
            }"#,
        )
        .unwrap();
        let record = HospitalRecord::from(place);
        assert_eq!(record.name, "City Hospital");
        assert_eq!(record.lat, 13.03);
        assert_eq!(record.user_ratings_total, 120);
        assert_eq!(record.types, vec!["hospital", "health"]);
    }

    #[test]
    fn nearby_conversion_uses_vicinity_and_geometry() {
        let place: NearbyPlace = serde_json::from_str(
            r#"{
                "place_id": "n1",
                "name": "Clinic",
                "geometry": {"location": {"lat": 1.5, "lng": 2.5}},
                "vicinity": "Market St",
                "user_ratings_total": 7
            }"#,
        )
        .unwrap();
        let record = HospitalRecord::from(place);
        assert_eq!(record.address, "Market St");
        assert_eq!(record.location(), Coordinate::new(1.5, 2.5));
        assert_eq!(record.user_ratings_total, 7);
    }

    #[test]
    fn text_search_body_uses_camel_case() {
        let body = TextSearchBody {
            text_query: "hospitals near 1,2".into(),
            location_bias: LocationBias {
                circle: Circle {
                    center: LatLng {
                        latitude: 1.0,
                        longitude: 2.0,
                    },
                    radius: 5000.0,
                },
            },
            max_result_count: MAX_RESULT_COUNT,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["textQuery"], "hospitals near 1,2");
        assert_eq!(json["locationBias"]["circle"]["radius"], 5000.0);
        assert_eq!(json["maxResultCount"], 20);
    }
}
