//! wayfind-core - the data layer behind the wayfind app.
//!
//! Three facades answer the app's read queries and keep writes coherent:
//!
//! - `search::PlaceSearch`: filter and rank places from a dataset provider
//! - `trails::TrailService`: cached trail search and details, nearby trails
//!   ranked by great-circle distance
//! - `wishlist::Wishlist`: the saved-places list with ETag revalidation
//!
//! The two remote-backed facades are written against `api::RemoteSource`;
//! `api::HttpRemote` is the reqwest implementation used in production.

pub mod api;
pub mod cache;
pub mod config;
pub mod models;
pub mod search;
pub mod trails;
pub mod utils;
pub mod wishlist;

pub use api::{ApiError, ApiResult, HttpRemote, RemoteSource};
pub use config::Config;
pub use models::{CursorPage, GeoPoint, Place, TrailDetail, TrailSummary};
pub use search::{PlaceQuery, PlaceSearch};
pub use trails::{TrailSearch, TrailService};
pub use wishlist::Wishlist;
