//! Distance Enrichment: attach driving distance, duration and a directions
//! link to every candidate.
//!
//! Each record is resolved independently through its own fallback chain
//! (Routes API, Distance Matrix, local estimate). The last tier cannot fail,
//! so every record leaves enrichment with all distance fields populated.
//! Lookups run with bounded concurrency and results keep their input order.

use futures::future::BoxFuture;
use futures::{stream, FutureExt, StreamExt};
use tracing::{debug, info};

use crate::duration::estimate_duration_text;
use crate::error::Result;
use crate::fallback::{FallbackChain, Resolution, Strategy};
use crate::geo::{haversine_km, round_to_tenth, Coordinate};
use crate::google::{km_text, MapsClient};
use crate::hospital::{directions_url, DistanceResult, DistanceSource, HospitalRecord, RouteEstimate};

/// Straight-line to driving distance factor for the local estimate.
pub const ROAD_FACTOR: f64 = 1.3;

/// Origin and destination of one distance lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnrichTarget {
    pub origin: Coordinate,
    pub destination: Coordinate,
}

/// Local estimate: Haversine scaled by [`ROAD_FACTOR`] at urban speed.
pub fn estimate_route(origin: &Coordinate, destination: &Coordinate) -> RouteEstimate {
    let driving_km = round_to_tenth(haversine_km(origin, destination) * ROAD_FACTOR);
    RouteEstimate {
        distance_km: driving_km,
        distance_text: km_text(driving_km),
        duration_text: estimate_duration_text(driving_km),
    }
}

/// Tier 1: Routes API.
pub struct RoutesTier {
    client: MapsClient,
}

impl RoutesTier {
    pub fn new(client: MapsClient) -> Self {
        Self { client }
    }
}

impl Strategy<EnrichTarget, RouteEstimate> for RoutesTier {
    fn name(&self) -> &'static str {
        DistanceSource::Routes.as_str()
    }

    fn attempt<'a>(
        &'a self,
        target: &'a EnrichTarget,
    ) -> BoxFuture<'a, Result<Option<RouteEstimate>>> {
        async move {
            let estimate = self
                .client
                .compute_route(target.origin, target.destination)
                .await?;
            Ok(Some(estimate))
        }
        .boxed()
    }
}

/// Tier 2: legacy Distance Matrix.
pub struct DistanceMatrixTier {
    client: MapsClient,
}

impl DistanceMatrixTier {
    pub fn new(client: MapsClient) -> Self {
        Self { client }
    }
}

impl Strategy<EnrichTarget, RouteEstimate> for DistanceMatrixTier {
    fn name(&self) -> &'static str {
        DistanceSource::DistanceMatrix.as_str()
    }

    fn attempt<'a>(
        &'a self,
        target: &'a EnrichTarget,
    ) -> BoxFuture<'a, Result<Option<RouteEstimate>>> {
        async move {
            let estimate = self
                .client
                .distance_matrix(target.origin, target.destination)
                .await?;
            Ok(Some(estimate))
        }
        .boxed()
    }
}

/// Tier 3: local estimate. Always resolves.
pub struct EstimateTier;

impl Strategy<EnrichTarget, RouteEstimate> for EstimateTier {
    fn name(&self) -> &'static str {
        DistanceSource::Estimate.as_str()
    }

    fn attempt<'a>(
        &'a self,
        target: &'a EnrichTarget,
    ) -> BoxFuture<'a, Result<Option<RouteEstimate>>> {
        let estimate = estimate_route(&target.origin, &target.destination);
        async move { Ok(Some(estimate)) }.boxed()
    }
}

fn source_for_tier(tier: &str) -> DistanceSource {
    match tier {
        "routes" => DistanceSource::Routes,
        "distance_matrix" => DistanceSource::DistanceMatrix,
        _ => DistanceSource::Estimate,
    }
}

/// Per-record distance resolution.
#[derive(Debug)]
pub struct DistanceEnricher {
    chain: FallbackChain<EnrichTarget, RouteEstimate>,
    concurrency: usize,
}

impl DistanceEnricher {
    /// Standard three-tier enricher backed by `client`.
    pub fn new(client: MapsClient, concurrency: usize) -> Self {
        Self::from_chain(
            FallbackChain::new()
                .with(RoutesTier::new(client.clone()))
                .with(DistanceMatrixTier::new(client))
                .with(EstimateTier),
            concurrency,
        )
    }

    pub fn from_chain(chain: FallbackChain<EnrichTarget, RouteEstimate>, concurrency: usize) -> Self {
        Self {
            chain,
            concurrency: concurrency.max(1),
        }
    }

    /// Resolve the distance from `origin` to `destination`.
    pub async fn resolve(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> (DistanceResult, DistanceSource) {
        let target = EnrichTarget {
            origin,
            destination,
        };
        let (estimate, source) = match self.chain.resolve(&target).await {
            Resolution::Resolved { tier, value } => (value, source_for_tier(tier)),
            // Only reachable with a custom chain lacking the estimate tier.
            Resolution::Exhausted => (
                estimate_route(&origin, &destination),
                DistanceSource::Estimate,
            ),
        };
        let url = directions_url(&origin, &destination);
        (DistanceResult::from_estimate(estimate, url), source)
    }

    /// Populate distance fields on every record, preserving input order.
    pub async fn enrich(
        &self,
        origin: Coordinate,
        records: Vec<HospitalRecord>,
    ) -> Vec<HospitalRecord> {
        if records.is_empty() {
            return records;
        }

        info!(count = records.len(), concurrency = self.concurrency, "enriching distances");
        stream::iter(records)
            .map(|mut record| async move {
                let (result, source) = self.resolve(origin, record.location()).await;
                debug!(
                    hospital = %record.name,
                    tier = source.as_str(),
                    distance_km = result.distance_km,
                    "distance resolved"
                );
                record.apply_distance(result, source);
                record
            })
            .buffered(self.concurrency)
            .collect()
            .await
    }
}
