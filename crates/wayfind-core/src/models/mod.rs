//! Data models for wayfind entities.
//!
//! This module contains the value types returned by the data facades:
//!
//! - `Place`: a point of interest with rating, tags and open state
//! - `TrailSummary`, `TrailDetail`: trails and their geometry
//! - `GeoPoint`: latitude/longitude pair with haversine distance
//! - `CursorPage`: one page of a cursor-paginated collection
//!
//! Each type decodes through an explicit serde schema; `decode` holds the
//! few shape coercions the API needs.

pub mod decode;
pub mod geo;
pub mod page;
pub mod place;
pub mod trail;

pub use geo::{GeoPoint, EARTH_RADIUS_KM};
pub use page::{CursorPage, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use place::Place;
pub use trail::{Difficulty, TrailDetail, TrailSummary};
