//! Sources of the place collection the search engine runs over.

use async_trait::async_trait;
use tracing::debug;

use crate::api::{ApiError, ApiResult, RemoteRequest, RemoteSource};
use crate::models::decode::ListPayload;
use crate::models::Place;

/// Supplies the full place collection on demand. Refreshing it is the
/// provider's business; the engine only reads.
#[async_trait]
pub trait DatasetProvider: Send + Sync {
    async fn load(&self) -> ApiResult<Vec<Place>>;
}

/// A fixed collection, typically a seed bundled with the app.
#[derive(Debug, Clone, Default)]
pub struct StaticDataset {
    places: Vec<Place>,
}

impl StaticDataset {
    pub fn new(places: Vec<Place>) -> Self {
        Self { places }
    }

    /// Decode a seed document: a bare array or `{"items": [...]}`.
    pub fn from_json(json: &str) -> ApiResult<Self> {
        let payload: ListPayload<Place> =
            serde_json::from_str(json).map_err(|e| ApiError::decode("place seed", e))?;
        Ok(Self::new(payload.into_vec()))
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }
}

#[async_trait]
impl DatasetProvider for StaticDataset {
    async fn load(&self) -> ApiResult<Vec<Place>> {
        Ok(self.places.clone())
    }
}

/// Fetches the collection from a remote path on every load.
pub struct RemoteDataset<R> {
    remote: R,
    path: String,
}

impl<R: RemoteSource> RemoteDataset<R> {
    pub fn new(remote: R, path: impl Into<String>) -> Self {
        Self {
            remote,
            path: path.into(),
        }
    }
}

#[async_trait]
impl<R: RemoteSource> DatasetProvider for RemoteDataset<R> {
    async fn load(&self) -> ApiResult<Vec<Place>> {
        let response = self
            .remote
            .send(RemoteRequest::get(self.path.clone()))
            .await?
            .error_for_status()?;
        let places = response.json::<ListPayload<Place>>("places")?.into_vec();
        debug!(path = %self.path, count = places.len(), "Loaded place dataset");
        Ok(places)
    }
}
