use tracing::debug;

use crate::api::ApiResult;
use crate::models::{GeoPoint, Place};

use super::dataset::DatasetProvider;
use super::engine::{self, PlaceQuery};

/// Place search facade: loads the dataset, then filters and ranks it.
pub struct PlaceSearch<P> {
    provider: P,
    user_position: Option<GeoPoint>,
}

impl<P: DatasetProvider> PlaceSearch<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            user_position: None,
        }
    }

    /// Measure `distance_from_user` from `position` for places whose
    /// payload did not carry one.
    pub fn with_user_position(mut self, position: GeoPoint) -> Self {
        self.user_position = Some(position);
        self
    }

    pub fn set_user_position(&mut self, position: Option<GeoPoint>) {
        self.user_position = position;
    }

    pub async fn search(&self, query: &PlaceQuery) -> ApiResult<Vec<Place>> {
        let mut places = self.provider.load().await?;
        if let Some(origin) = self.user_position {
            places = places.iter().map(|p| p.with_distance_from(origin)).collect();
        }

        let results = engine::search(&places, query);
        debug!(
            dataset = places.len(),
            matched = results.len(),
            text = %query.text,
            "Place search complete"
        );
        Ok(results)
    }
}
