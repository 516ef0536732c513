//! Local place search.
//!
//! `engine::search` filters an in-memory collection with AND-combined
//! predicates (text, category, emotion, distance, open now, rating) and
//! ranks matches by rating then review count. `PlaceSearch` puts it behind
//! a `DatasetProvider` so callers can search a bundled seed or a remote
//! collection the same way.

pub mod dataset;
pub mod engine;
pub mod places;

pub use dataset::{DatasetProvider, RemoteDataset, StaticDataset};
pub use engine::{search, PlaceQuery};
pub use places::PlaceSearch;
