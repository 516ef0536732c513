//! Trail data with proximity ranking.
//!
//! `TrailService` wraps the trail endpoints: search pages, details and
//! geometry are cached per key for the configured TTL; nearby lookups always
//! go to the server and are re-ranked locally by haversine distance.

pub mod params;
pub mod service;

pub use params::TrailSearch;
pub use service::{rank_by_distance, TrailService};
