//! Hospital finder endpoints.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::info;

use skinhealth_lib::{Coordinate, HospitalRecord, SearchRequest};
use skinhealth_service_shared::{
    record_distance_lookup, record_hospital_search, record_hospitals_returned, ApiProblem,
    ApiResponse, AppState, NearbyRequest, RequestId,
};

use super::body_or_default;

/// Mathikere, Bangalore.
pub const TEST_LOCATION: Coordinate = Coordinate {
    lat: 13.0358,
    lng: 77.5540,
};
pub const TEST_LOCATION_NAME: &str = "Mathikere, Bangalore";
pub const TEST_RADIUS_METERS: u32 = 10_000;

pub const NO_HOSPITALS_MESSAGE: &str =
    "No hospitals found in the specified area. This could be due to API limits or no hospitals in the area.";

#[derive(Debug, Serialize)]
pub struct UserLocation {
    pub lat: f64,
    pub lng: f64,
}

/// Payload of `POST /api/hospitals/nearby`.
#[derive(Debug, Serialize)]
pub struct NearbyResponse {
    pub data: Vec<HospitalRecord>,
    pub count: usize,
    pub user_location: UserLocation,
    pub search_radius: u32,
    pub message: String,
}

/// Payload of `POST /api/test-location`.
#[derive(Debug, Serialize)]
pub struct TestLocationResponse {
    pub location: &'static str,
    pub coordinates: UserLocation,
    #[serde(flatten)]
    pub results: NearbyResponse,
}

#[derive(Debug, Serialize)]
pub struct DetailResponse {
    pub data: Map<String, Value>,
}

async fn run_search(state: &AppState, request: SearchRequest) -> Vec<HospitalRecord> {
    let outcome = state.locator().locate(request).await;

    record_hospital_search(outcome.search_tier);
    record_hospitals_returned(outcome.records.len());
    for source in outcome.records.iter().filter_map(|r| r.distance_source) {
        record_distance_lookup(source.as_str());
    }
    if outcome.is_degraded() {
        info!("serving demo hospitals");
    }
    outcome.records
}

fn nearby_response(request: &SearchRequest, records: Vec<HospitalRecord>) -> NearbyResponse {
    let count = records.len();
    let message = if count == 0 {
        NO_HOSPITALS_MESSAGE.to_string()
    } else {
        format!("Found {} hospitals with accurate driving distances", count)
    };
    NearbyResponse {
        data: records,
        count,
        user_location: UserLocation {
            lat: request.origin.lat,
            lng: request.origin.lng,
        },
        search_radius: request.radius_meters,
        message,
    }
}

/// Handle `POST /api/hospitals/nearby`.
pub async fn nearby(
    State(state): State<AppState>,
    request_id: RequestId,
    body: Result<Json<NearbyRequest>, JsonRejection>,
) -> Result<ApiResponse<NearbyResponse>, ApiProblem> {
    let request = body_or_default(body)
        .to_search_request(request_id.as_str())
        .map_err(|problem| *problem)?;

    info!(
        request_id = %request_id,
        lat = request.origin.lat,
        lng = request.origin.lng,
        radius = request.radius_meters,
        "finding nearby hospitals"
    );

    let records = run_search(&state, request).await;
    Ok(ApiResponse::new(nearby_response(&request, records)))
}

/// Handle `GET /api/hospitals/{id}`.
///
/// Details are not looked up; the frontend already has every field from the
/// nearby search.
pub async fn details(Path(id): Path<String>, request_id: RequestId) -> ApiResponse<DetailResponse> {
    info!(request_id = %request_id, id = %id, "hospital detail requested");
    ApiResponse::new(DetailResponse { data: Map::new() })
}

/// Handle `POST /api/test-location`.
pub async fn test_location(
    State(state): State<AppState>,
    request_id: RequestId,
) -> ApiResponse<TestLocationResponse> {
    info!(request_id = %request_id, location = TEST_LOCATION_NAME, "running test search");

    let request = SearchRequest::new(TEST_LOCATION, TEST_RADIUS_METERS);
    let records = run_search(&state, request).await;
    let mut results = nearby_response(&request, records);
    if results.count > 0 {
        results.message = format!(
            "Found {} hospitals near Mathikere within 10km",
            results.count
        );
    }

    ApiResponse::new(TestLocationResponse {
        location: TEST_LOCATION_NAME,
        coordinates: UserLocation {
            lat: TEST_LOCATION.lat,
            lng: TEST_LOCATION.lng,
        },
        results,
    })
}
