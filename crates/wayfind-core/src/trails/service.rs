use std::sync::{Mutex, MutexGuard};

use chrono::Duration;
use futures::future::try_join_all;
use serde::Deserialize;
use tracing::debug;

use crate::api::{resource_path, ApiResult, RemoteRequest, RemoteSource};
use crate::cache::TtlCache;
use crate::models::decode::ListPayload;
use crate::models::{CursorPage, GeoPoint, TrailDetail, TrailSummary};

use super::params::{normalize_tags, SearchKey, TrailSearch};

const TRAILS_PATH: &str = "/trails";

/// Geometry payload: a bare point list or `{"points": [...]}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum GeometryPayload {
    Bare(Vec<GeoPoint>),
    Wrapped { points: Vec<GeoPoint> },
}

impl GeometryPayload {
    fn into_vec(self) -> Vec<GeoPoint> {
        match self {
            GeometryPayload::Bare(points) => points,
            GeometryPayload::Wrapped { points } => points,
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Trail data facade: cached search pages and details, uncached nearby
/// lookups re-ranked by great-circle distance.
///
/// Concurrent misses for the same key are not coalesced; both requests go
/// out and the last response to arrive is the one cached.
pub struct TrailService<R> {
    remote: R,
    pages: Mutex<TtlCache<SearchKey, CursorPage<TrailSummary>>>,
    details: Mutex<TtlCache<String, TrailDetail>>,
    geometries: Mutex<TtlCache<String, Vec<GeoPoint>>>,
}

impl<R: RemoteSource> TrailService<R> {
    pub fn new(remote: R, ttl: Duration) -> Self {
        Self {
            remote,
            pages: Mutex::new(TtlCache::new(ttl)),
            details: Mutex::new(TtlCache::new(ttl)),
            geometries: Mutex::new(TtlCache::new(ttl)),
        }
    }

    /// One page of search results, served from cache while fresh.
    pub async fn search(&self, params: &TrailSearch) -> ApiResult<CursorPage<TrailSummary>> {
        let key = params.cache_key();
        let cached = lock(&self.pages).get(&key);
        if let Some(page) = cached {
            debug!(query = %params.query, items = page.len(), "Trail search cache hit");
            return Ok(page);
        }
        self.fetch_search(params, key).await
    }

    /// Fetch the page even when a cached copy is fresh, and replace it.
    pub async fn refresh_search(&self, params: &TrailSearch) -> ApiResult<CursorPage<TrailSummary>> {
        self.fetch_search(params, params.cache_key()).await
    }

    async fn fetch_search(
        &self,
        params: &TrailSearch,
        key: SearchKey,
    ) -> ApiResult<CursorPage<TrailSummary>> {
        let n = params.normalized();
        let request = RemoteRequest::get("/trails/search")
            .query("q", &n.query)
            .query_opt("lat", n.center.map(|c| c.lat))
            .query_opt("lng", n.center.map(|c| c.lng))
            .query_opt("radius_km", n.radius_km)
            .query_opt("tags", (!n.tags.is_empty()).then(|| n.tags.join(",")))
            .query("limit", n.limit)
            .query_opt("cursor", n.cursor.as_deref());

        let response = self.remote.send(request).await?.error_for_status()?;
        let page: CursorPage<TrailSummary> = response.json("trail search page")?;
        debug!(
            query = %n.query,
            items = page.len(),
            last = page.is_last(),
            "Trail search fetched"
        );

        lock(&self.pages).put(key, page.clone());
        Ok(page)
    }

    /// Trails around `center`, nearest first, at most `limit` of them.
    ///
    /// Never cached: results depend on the caller's live position. The
    /// radius is passed to the server as a hint and is not re-applied here,
    /// so a server that returns farther trails still has them ranked and
    /// truncated rather than dropped.
    pub async fn nearby(
        &self,
        center: GeoPoint,
        radius_km: f64,
        limit: usize,
        tags: &[String],
    ) -> ApiResult<Vec<TrailSummary>> {
        let tags = normalize_tags(tags);
        let request = RemoteRequest::get("/trails/nearby")
            .query("lat", center.lat)
            .query("lng", center.lng)
            .query("radius_km", radius_km)
            .query("limit", limit)
            .query_opt("tags", (!tags.is_empty()).then(|| tags.join(",")));

        let response = self.remote.send(request).await?.error_for_status()?;
        let candidates = response
            .json::<ListPayload<TrailSummary>>("nearby trails")?
            .into_vec();
        let returned = candidates.len();

        let nearest = rank_by_distance(candidates, center, limit);
        debug!(%center, radius_km, returned, kept = nearest.len(), "Nearby trails ranked");
        Ok(nearest)
    }

    pub async fn trail(&self, id: &str) -> ApiResult<TrailDetail> {
        let cached = lock(&self.details).get(&id.to_string());
        if let Some(detail) = cached {
            debug!(trail = id, "Trail detail cache hit");
            return Ok(detail);
        }

        let response = self
            .remote
            .send(RemoteRequest::get(resource_path(TRAILS_PATH, id, &[])?))
            .await?
            .error_for_status()?;
        let detail: TrailDetail = response.json("trail detail")?;

        lock(&self.details).put(id.to_string(), detail.clone());
        Ok(detail)
    }

    pub async fn geometry(&self, id: &str) -> ApiResult<Vec<GeoPoint>> {
        let cached = lock(&self.geometries).get(&id.to_string());
        if let Some(points) = cached {
            debug!(trail = id, "Trail geometry cache hit");
            return Ok(points);
        }

        let response = self
            .remote
            .send(RemoteRequest::get(resource_path(TRAILS_PATH, id, &["geometry"])?))
            .await?
            .error_for_status()?;
        let points = response.json::<GeometryPayload>("trail geometry")?.into_vec();

        lock(&self.geometries).put(id.to_string(), points.clone());
        Ok(points)
    }

    /// Details for several trails, fetched concurrently. Fails as a whole
    /// if any one fetch fails.
    pub async fn trails(&self, ids: &[String]) -> ApiResult<Vec<TrailDetail>> {
        try_join_all(ids.iter().map(|id| self.trail(id))).await
    }

    /// Drop every cached page, detail and geometry.
    pub fn clear(&self) {
        lock(&self.pages).clear();
        lock(&self.details).clear();
        lock(&self.geometries).clear();
    }
}

/// Stable sort by haversine distance from `center`, truncated to `limit`.
pub fn rank_by_distance(
    trails: Vec<TrailSummary>,
    center: GeoPoint,
    limit: usize,
) -> Vec<TrailSummary> {
    let mut ranked: Vec<(f64, TrailSummary)> = trails
        .into_iter()
        .map(|t| (t.distance_from(center), t))
        .collect();
    ranked.sort_by(|a, b| a.0.total_cmp(&b.0));
    ranked.into_iter().take(limit).map(|(_, t)| t).collect()
}
