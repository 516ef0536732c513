use serde::{Deserialize, Serialize};

use crate::models::page::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::models::GeoPoint;

/// Parameters of a trail search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TrailSearch {
    pub query: String,
    pub center: Option<GeoPoint>,
    pub radius_km: Option<f64>,
    pub tags: Vec<String>,
    pub limit: u32,
    pub cursor: Option<String>,
}

impl Default for TrailSearch {
    fn default() -> Self {
        Self {
            query: String::new(),
            center: None,
            radius_km: None,
            tags: Vec::new(),
            limit: DEFAULT_PAGE_SIZE,
            cursor: None,
        }
    }
}

impl TrailSearch {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    pub fn near(mut self, center: GeoPoint, radius_km: f64) -> Self {
        self.center = Some(center);
        self.radius_km = Some(radius_km);
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// The same search, continued from `cursor`.
    pub fn after(&self, cursor: impl Into<String>) -> Self {
        Self {
            cursor: Some(cursor.into()),
            ..self.clone()
        }
    }

    /// Canonical form: trimmed query, lowercased sorted unique tags, limit
    /// clamped to `1..=MAX_PAGE_SIZE`, blank cursor dropped.
    pub fn normalized(&self) -> TrailSearch {
        TrailSearch {
            query: self.query.trim().to_string(),
            center: self.center,
            radius_km: self.radius_km,
            tags: normalize_tags(&self.tags),
            limit: self.limit.clamp(1, MAX_PAGE_SIZE),
            cursor: self.cursor.clone().filter(|c| !c.is_empty()),
        }
    }

    pub(crate) fn cache_key(&self) -> SearchKey {
        let n = self.normalized();
        SearchKey {
            query: n.query,
            center: n.center.map(|c| (float_bits(c.lat), float_bits(c.lng))),
            radius_km: n.radius_km.map(float_bits),
            tags: n.tags,
            limit: n.limit,
            cursor: n.cursor,
        }
    }
}

pub(crate) fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut tags: Vec<String> = tags
        .iter()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect();
    tags.sort();
    tags.dedup();
    tags
}

/// Hashable identity of a normalized search. Floats are compared by bit
/// pattern, with -0.0 folded into 0.0.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct SearchKey {
    query: String,
    center: Option<(u64, u64)>,
    radius_km: Option<u64>,
    tags: Vec<String>,
    limit: u32,
    cursor: Option<String>,
}

fn float_bits(value: f64) -> u64 {
    (value + 0.0).to_bits()
}
