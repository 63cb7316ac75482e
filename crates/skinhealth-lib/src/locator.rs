//! The hospital locator pipeline: search, enrich, order.

use std::cmp::Ordering;

use tracing::info;

use crate::config::ProviderConfig;
use crate::enrich::DistanceEnricher;
use crate::error::Result;
use crate::google::MapsClient;
use crate::hospital::{HospitalRecord, SearchRequest};
use crate::search::PlaceSearch;

/// Result of one locator run.
#[derive(Debug, Clone, PartialEq)]
pub struct LocatorOutcome {
    /// Enriched records, nearest first.
    pub records: Vec<HospitalRecord>,
    /// Place Search tier that produced the candidates, `None` when every tier declined.
    pub search_tier: Option<&'static str>,
}

impl LocatorOutcome {
    pub fn is_degraded(&self) -> bool {
        self.records.iter().any(HospitalRecord::is_synthetic)
    }
}

/// Sort ascending by distance. Records without a distance go last; ties keep
/// their input order.
pub fn order_by_distance(mut records: Vec<HospitalRecord>) -> Vec<HospitalRecord> {
    records.sort_by(|a, b| match (a.distance_km, b.distance_km) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    records
}

/// Search → enrich → order.
#[derive(Debug)]
pub struct HospitalLocator {
    search: PlaceSearch,
    enricher: DistanceEnricher,
}

impl HospitalLocator {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let client = MapsClient::new(config)?;
        Ok(Self::from_parts(
            PlaceSearch::new(client.clone()),
            DistanceEnricher::new(client, config.enrich_concurrency),
        ))
    }

    pub fn from_parts(search: PlaceSearch, enricher: DistanceEnricher) -> Self {
        Self { search, enricher }
    }

    pub async fn locate(&self, request: SearchRequest) -> LocatorOutcome {
        let resolution = self.search.resolve(&request).await;
        let search_tier = resolution.tier();
        let candidates = resolution.into_value().unwrap_or_default();
        if candidates.is_empty() {
            return LocatorOutcome {
                records: Vec::new(),
                search_tier,
            };
        }

        let enriched = self.enricher.enrich(request.origin, candidates).await;
        let records = order_by_distance(enriched);
        info!(
            count = records.len(),
            tier = search_tier.unwrap_or("none"),
            "hospital search complete"
        );
        LocatorOutcome {
            records,
            search_tier,
        }
    }
}
