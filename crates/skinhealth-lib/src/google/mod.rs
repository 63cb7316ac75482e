//! Clients for the Google Maps Platform endpoints used by the locator.
//!
//! [`MapsClient`] speaks four APIs:
//!
//! - Places API (New) `places:searchText`
//! - legacy Places `nearbysearch`
//! - Routes API `directions/v2:computeRoutes`
//! - legacy Distance Matrix
//!
//! Every call is bounded by the configured upstream timeout. Callers decide
//! what a failure means; the clients only report it.

mod places;
mod routes;

use reqwest::{Client, Response};

use crate::config::ProviderConfig;
use crate::error::{Error, Result};

pub use places::PLACES_FIELD_MASK;
pub use routes::ROUTES_FIELD_MASK;

/// Thin HTTP client over the Maps endpoints.
#[derive(Debug, Clone)]
pub struct MapsClient {
    http: Client,
    api_key: Option<String>,
    places_url: String,
    places_legacy_url: String,
    routes_url: String,
    distance_matrix_url: String,
}

impl MapsClient {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let http = Client::builder().timeout(config.upstream_timeout).build()?;
        Ok(Self {
            http,
            api_key: config.maps_api_key.clone(),
            places_url: config.places_url.clone(),
            places_legacy_url: config.places_legacy_url.clone(),
            routes_url: config.routes_url.clone(),
            distance_matrix_url: config.distance_matrix_url.clone(),
        })
    }

    fn api_key(&self, service: &'static str) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or(Error::MissingApiKey { service })
    }
}

/// Map a non-success status to [`Error::UpstreamStatus`].
pub(crate) fn ensure_success(service: &'static str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(Error::UpstreamStatus {
            service,
            status: status.as_u16(),
        })
    }
}

/// `"<km> km"` with one decimal.
pub(crate) fn km_text(distance_km: f64) -> String {
    format!("{distance_km:.1} km")
}
