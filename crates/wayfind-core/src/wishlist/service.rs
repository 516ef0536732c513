use std::sync::{Mutex, MutexGuard};

use chrono::Duration;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::api::remote::IF_NONE_MATCH;
use crate::api::{resource_path, ApiError, ApiResult, RemoteRequest, RemoteResponse, RemoteSource};
use crate::cache::TtlCache;
use crate::models::decode::ListPayload;
use crate::models::{CursorPage, Place, MAX_PAGE_SIZE};

const WISHLIST_PATH: &str = "/wishlist";

/// Cache key of the one collection this service holds.
const LIST_KEY: &str = "wishlist";

/// Last full fetch of the list and the revalidation token that came with it.
#[derive(Debug, Clone)]
struct Snapshot {
    items: Vec<Place>,
    etag: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PlaceRef<'a> {
    place_id: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PlaceRefs<'a> {
    place_ids: &'a [String],
}

#[derive(Serialize)]
struct NotesUpdate<'a> {
    notes: &'a str,
}

#[derive(Deserialize)]
struct CountResponse {
    count: usize,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// The user's saved places, revalidated with conditional GETs.
///
/// `list` always asks the server, sending the stored ETag so an unchanged
/// list costs a 304. Every mutation clears the stored list and token so the
/// next read is a full fetch.
pub struct Wishlist<R> {
    remote: R,
    cache: Mutex<TtlCache<&'static str, Snapshot>>,
}

impl<R: RemoteSource> Wishlist<R> {
    pub fn new(remote: R, ttl: Duration) -> Self {
        Self {
            remote,
            cache: Mutex::new(TtlCache::new(ttl)),
        }
    }

    pub async fn list(&self, use_conditional_get: bool) -> ApiResult<Vec<Place>> {
        let cached = lock(&self.cache).get(&LIST_KEY);
        let token = cached
            .as_ref()
            .and_then(|snapshot| snapshot.etag.clone())
            .filter(|_| use_conditional_get);

        let mut request = RemoteRequest::get(WISHLIST_PATH);
        if let Some(ref token) = token {
            request = request.header(IF_NONE_MATCH, token.clone());
        }
        let response = self.remote.send(request).await?;

        if response.is_not_modified() {
            return match cached {
                Some(snapshot) => {
                    debug!(items = snapshot.items.len(), "Wishlist not modified, using cached list");
                    Ok(snapshot.items)
                }
                None => {
                    warn!(sent_token = token.is_some(), "Not Modified with no cached wishlist");
                    Err(ApiError::ProtocolViolation(
                        "server answered 304 Not Modified but no wishlist is cached".to_string(),
                    ))
                }
            };
        }

        let response = response.error_for_status()?;
        let items = response.json::<ListPayload<Place>>("wishlist")?.into_vec();
        let etag = response.etag().map(str::to_string);
        if etag.is_none() {
            debug!("Wishlist response carried no ETag, next read will be unconditional");
        }
        debug!(items = items.len(), etag = ?etag, "Wishlist fetched");

        lock(&self.cache).put(
            LIST_KEY,
            Snapshot {
                items: items.clone(),
                etag,
            },
        );
        Ok(items)
    }

    /// One page of the list. Always fetched; pages are not cached.
    pub async fn list_page(&self, limit: u32, cursor: Option<&str>) -> ApiResult<CursorPage<Place>> {
        let request = RemoteRequest::get(WISHLIST_PATH)
            .query("limit", limit.clamp(1, MAX_PAGE_SIZE))
            .query_opt("cursor", cursor.filter(|c| !c.is_empty()));

        let response = self.remote.send(request).await?.error_for_status()?;
        response.json("wishlist page")
    }

    pub async fn add(&self, place_id: &str) -> ApiResult<()> {
        let request = RemoteRequest::post(WISHLIST_PATH).json(&PlaceRef { place_id })?;
        self.mutate("add", request).await
    }

    pub async fn remove(&self, place_id: &str) -> ApiResult<()> {
        let request = RemoteRequest::delete(resource_path(WISHLIST_PATH, place_id, &[])?);
        self.mutate("remove", request).await
    }

    /// Add when `on`, remove otherwise.
    pub async fn toggle(&self, place_id: &str, on: bool) -> ApiResult<()> {
        if on {
            self.add(place_id).await
        } else {
            self.remove(place_id).await
        }
    }

    pub async fn add_many(&self, place_ids: &[String]) -> ApiResult<()> {
        let request = RemoteRequest::post(format!("{}/batch", WISHLIST_PATH))
            .json(&PlaceRefs { place_ids })?;
        self.mutate("add_many", request).await
    }

    pub async fn remove_many(&self, place_ids: &[String]) -> ApiResult<()> {
        let request = RemoteRequest::delete(format!("{}/batch", WISHLIST_PATH))
            .json(&PlaceRefs { place_ids })?;
        self.mutate("remove_many", request).await
    }

    pub async fn update_notes(&self, place_id: &str, notes: &str) -> ApiResult<()> {
        let request = RemoteRequest::patch(resource_path(WISHLIST_PATH, place_id, &[])?)
            .json(&NotesUpdate { notes })?;
        self.mutate("update_notes", request).await
    }

    /// Store a new order; `place_ids` lists every saved place, first to last.
    pub async fn reorder(&self, place_ids: &[String]) -> ApiResult<()> {
        let request = RemoteRequest::put(format!("{}/order", WISHLIST_PATH))
            .json(&PlaceRefs { place_ids })?;
        self.mutate("reorder", request).await
    }

    pub async fn count(&self) -> ApiResult<usize> {
        let response = self
            .remote
            .send(RemoteRequest::get(format!("{}/count", WISHLIST_PATH)))
            .await?
            .error_for_status()?;
        Ok(response.json::<CountResponse>("wishlist count")?.count)
    }

    /// Whether `place_id` is saved. Tries a HEAD first and falls back to a
    /// GET when the server does not support HEAD on this route.
    pub async fn exists(&self, place_id: &str) -> ApiResult<bool> {
        let path = resource_path(WISHLIST_PATH, place_id, &[])?;

        let response = self.remote.send(RemoteRequest::head(path.clone())).await?;
        if matches!(response.status, 405 | 501) {
            debug!(place = place_id, status = response.status, "HEAD unsupported, falling back to GET");
            let response = self.remote.send(RemoteRequest::get(path)).await?;
            return Self::interpret_existence(response);
        }
        Self::interpret_existence(response)
    }

    fn interpret_existence(response: RemoteResponse) -> ApiResult<bool> {
        if response.is_not_found() {
            return Ok(false);
        }
        response.error_for_status().map(|_| true)
    }

    /// Number of places in the cached list, if one is held.
    pub fn cached_len(&self) -> Option<usize> {
        lock(&self.cache)
            .get(&LIST_KEY)
            .map(|snapshot| snapshot.items.len())
    }

    /// How long ago the cached list was fetched, e.g. "5m ago".
    pub fn cached_age(&self) -> Option<String> {
        lock(&self.cache)
            .entry(&LIST_KEY)
            .map(|entry| entry.age_display())
    }

    /// Forget the cached list and its token.
    pub fn invalidate(&self) {
        lock(&self.cache).invalidate(&LIST_KEY);
    }

    /// Send a write and keep the cache coherent with whatever it did.
    ///
    /// Only a definitive rejection leaves the cache alone; after a success
    /// or an indeterminate failure the server state may have changed.
    async fn mutate(&self, operation: &str, request: RemoteRequest) -> ApiResult<()> {
        let outcome = match self.remote.send(request).await {
            Ok(response) => response.error_for_status().map(|_| ()),
            Err(e) => Err(e),
        };

        match outcome {
            Err(ref e) if e.is_definitive() => {
                warn!(operation, error = %e, "Wishlist write rejected");
            }
            Err(ref e) => {
                warn!(operation, error = %e, "Wishlist write outcome unknown, invalidating cache");
                self.invalidate();
            }
            Ok(()) => {
                debug!(operation, "Wishlist write applied, invalidating cache");
                self.invalidate();
            }
        }
        outcome
    }
}
