//! SkinHealth library entry points.
//!
//! This crate holds the hospital locator pipeline (Place Search, Distance
//! Enrichment, Result Ordering) together with the clients for the external
//! collaborators: the Gemini chat responder and the image classifier proxy.
//! The HTTP service and the CLI should only depend on what is exported here.
//!

#![deny(warnings)]

pub mod catalog;
pub mod chat;
pub mod classifier;
pub mod config;
pub mod duration;
pub mod enrich;
pub mod error;
pub mod fallback;
pub mod geo;
pub mod google;
pub mod hospital;
pub mod locator;
pub mod search;

pub use chat::{ChatResponder, ChatTurn, ModelInfo};
pub use classifier::{normalize_base_url, preprocess_image, validate_upload, ClassifierClient};
pub use config::ProviderConfig;
pub use duration::{format_duration, format_seconds};
pub use enrich::{estimate_route, DistanceEnricher};
pub use error::{Error, Result};
pub use fallback::{FallbackChain, Resolution, Strategy};
pub use geo::{haversine_km, within_radius, Coordinate};
pub use google::MapsClient;
pub use hospital::{
    directions_url, DistanceResult, DistanceSource, HospitalRecord, SearchRequest,
    DEFAULT_RADIUS_METERS,
};
pub use locator::{order_by_distance, HospitalLocator, LocatorOutcome};
pub use search::PlaceSearch;
