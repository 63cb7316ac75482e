//! Place Search: find hospital candidates around a coordinate.
//!
//! Tiers, in order:
//!
//! 1. Places API (New) text search, location-biased
//! 2. legacy Places nearby search
//! 3. the synthetic [`catalog`](crate::catalog)
//!
//! The provider bias circle is advisory, so every tier re-filters candidates
//! by Haversine distance against the requested radius. A tier that ends up
//! with zero candidates yields to the next one.

use futures::future::BoxFuture;
use futures::FutureExt;
use tracing::{debug, info};

use crate::catalog::demo_catalog;
use crate::error::Result;
use crate::fallback::{FallbackChain, Resolution, Strategy};
use crate::geo::{haversine_km, within_radius, Coordinate};
use crate::google::MapsClient;
use crate::hospital::{HospitalRecord, SearchRequest};

pub const TIER_PLACES_TEXT: &str = "places_text";
pub const TIER_PLACES_NEARBY: &str = "places_nearby";
pub const TIER_DEMO_CATALOG: &str = "demo_catalog";

/// Keep records inside the request radius; `None` when nothing survives.
fn within_request_radius(
    request: &SearchRequest,
    records: Vec<HospitalRecord>,
) -> Option<Vec<HospitalRecord>> {
    let kept: Vec<HospitalRecord> = records
        .into_iter()
        .filter(|record| {
            let location = record.location();
            let keep = within_radius(&request.origin, &location, request.radius_meters);
            let distance = haversine_km(&request.origin, &location);
            debug!(
                hospital = %record.name,
                distance_km = distance,
                keep,
                "radius check"
            );
            keep
        })
        .collect();

    if kept.is_empty() {
        None
    } else {
        Some(kept)
    }
}

/// Tier 1: Places API (New) text search.
pub struct TextSearchTier {
    client: MapsClient,
}

impl TextSearchTier {
    pub fn new(client: MapsClient) -> Self {
        Self { client }
    }
}

impl Strategy<SearchRequest, Vec<HospitalRecord>> for TextSearchTier {
    fn name(&self) -> &'static str {
        TIER_PLACES_TEXT
    }

    fn attempt<'a>(
        &'a self,
        request: &'a SearchRequest,
    ) -> BoxFuture<'a, Result<Option<Vec<HospitalRecord>>>> {
        async move {
            let candidates = self.client.search_text(request).await?;
            Ok(within_request_radius(request, candidates))
        }
        .boxed()
    }
}

/// Tier 2: legacy nearby search.
pub struct NearbySearchTier {
    client: MapsClient,
}

impl NearbySearchTier {
    pub fn new(client: MapsClient) -> Self {
        Self { client }
    }
}

impl Strategy<SearchRequest, Vec<HospitalRecord>> for NearbySearchTier {
    fn name(&self) -> &'static str {
        TIER_PLACES_NEARBY
    }

    fn attempt<'a>(
        &'a self,
        request: &'a SearchRequest,
    ) -> BoxFuture<'a, Result<Option<Vec<HospitalRecord>>>> {
        async move {
            let candidates = self.client.nearby_search(request).await?;
            Ok(within_request_radius(request, candidates))
        }
        .boxed()
    }
}

/// Tier 3: synthetic catalog. Never fails, may be empty for tiny radii.
pub struct DemoCatalogTier;

impl Strategy<SearchRequest, Vec<HospitalRecord>> for DemoCatalogTier {
    fn name(&self) -> &'static str {
        TIER_DEMO_CATALOG
    }

    fn attempt<'a>(
        &'a self,
        request: &'a SearchRequest,
    ) -> BoxFuture<'a, Result<Option<Vec<HospitalRecord>>>> {
        let catalog = demo_catalog(request.origin);
        async move { Ok(within_request_radius(request, catalog)) }.boxed()
    }
}

/// Candidate search over an ordered set of tiers.
#[derive(Debug)]
pub struct PlaceSearch {
    chain: FallbackChain<SearchRequest, Vec<HospitalRecord>>,
}

impl PlaceSearch {
    /// Standard three-tier search backed by `client`.
    pub fn new(client: MapsClient) -> Self {
        Self::from_chain(
            FallbackChain::new()
                .with(TextSearchTier::new(client.clone()))
                .with(NearbySearchTier::new(client))
                .with(DemoCatalogTier),
        )
    }

    pub fn from_chain(chain: FallbackChain<SearchRequest, Vec<HospitalRecord>>) -> Self {
        Self { chain }
    }

    /// Run the tiers and report which one answered.
    pub async fn resolve(&self, request: &SearchRequest) -> Resolution<Vec<HospitalRecord>> {
        info!(
            origin = %request.origin,
            radius_m = request.radius_meters,
            "searching for hospitals"
        );
        let resolution = self.chain.resolve(request).await;
        match &resolution {
            Resolution::Resolved { tier, value } => {
                info!(tier, count = value.len(), "hospital candidates found")
            }
            Resolution::Exhausted => info!("no hospital candidates from any tier"),
        }
        resolution
    }

    /// Hospitals within `radius_meters` of `origin`; empty when every tier declines.
    pub async fn search(&self, origin: Coordinate, radius_meters: u32) -> Vec<HospitalRecord> {
        self.resolve(&SearchRequest::new(origin, radius_meters))
            .await
            .into_value()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderConfig;

    fn offline_client() -> MapsClient {
        let config = ProviderConfig::default()
            .with_maps_api_key("test-key")
            .with_maps_base_url("http://127.0.0.1:9");
        MapsClient::new(&config).unwrap()
    }

    #[test]
    fn radius_filter_drops_far_candidates() {
        let request = SearchRequest::new(Coordinate::new(0.0, 0.0), 1_000);
        let records = vec![
            HospitalRecord::new("near", "Near", Coordinate::new(0.0, 0.005), "-"),
            HospitalRecord::new("far", "Far", Coordinate::new(0.0, 0.5), "-"),
        ];
        let kept = within_request_radius(&request, records).unwrap();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, "near");
    }

    #[test]
    fn radius_filter_reports_none_when_everything_is_dropped() {
        let request = SearchRequest::new(Coordinate::new(0.0, 0.0), 10);
        let records = vec![HospitalRecord::new("far", "Far", Coordinate::new(1.0, 1.0), "-")];
        assert!(within_request_radius(&request, records).is_none());
    }

    #[tokio::test]
    async fn catalog_tier_far_from_bangalore_keeps_offsets_only() {
        let request = SearchRequest::new(Coordinate::new(48.0, 11.0), 25_000);
        let hospitals = DemoCatalogTier.attempt(&request).await.unwrap().unwrap();
        assert_eq!(hospitals.len(), 4);
        for h in &hospitals {
            assert!(haversine_km(&request.origin, &h.location()) <= 25.0);
        }
    }

    #[tokio::test]
    async fn catalog_tier_near_bangalore_keeps_everything() {
        let request = SearchRequest::new(Coordinate::new(13.0358, 77.5540), 10_000);
        let hospitals = DemoCatalogTier.attempt(&request).await.unwrap().unwrap();
        assert_eq!(hospitals.len(), 8);
    }

    #[tokio::test]
    async fn catalog_tier_small_radius_yields_nothing() {
        let request = SearchRequest::new(Coordinate::new(48.0, 11.0), 100);
        assert!(DemoCatalogTier.attempt(&request).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unreachable_providers_fall_back_to_catalog() {
        let search = PlaceSearch::new(offline_client());
        let request = SearchRequest::new(Coordinate::new(48.0, 11.0), 25_000);
        let resolution = search.resolve(&request).await;
        assert_eq!(resolution.tier(), Some(TIER_DEMO_CATALOG));
        let records = resolution.into_value().unwrap();
        assert!(records.iter().all(HospitalRecord::is_synthetic));
    }

    #[tokio::test]
    async fn tiny_radius_yields_empty_sequence() {
        let search = PlaceSearch::new(offline_client());
        let records = search.search(Coordinate::new(48.0, 11.0), 50).await;
        assert!(records.is_empty());
    }

    #[test]
    fn standard_chain_order() {
        let search = PlaceSearch::new(offline_client());
        assert_eq!(
            search.chain.tier_names(),
            vec![TIER_PLACES_TEXT, TIER_PLACES_NEARBY, TIER_DEMO_CATALOG]
        );
    }
}
