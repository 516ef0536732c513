use serde::{Deserialize, Serialize};

use super::decode;
use super::geo::GeoPoint;

/// Category value that matches every place.
pub const ALL: &str = "all";

fn default_category() -> String {
    ALL.to_string()
}

/// A point of interest as served by the places API or a bundled seed.
///
/// Values are immutable once decoded; derived data (such as a distance from
/// the user) is attached by building a new value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    #[serde(deserialize_with = "decode::id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub emotions: Vec<String>,
    #[serde(deserialize_with = "decode::rating")]
    pub rating: f64,
    #[serde(default)]
    pub review_count: u32,
    pub location: GeoPoint,
    /// Kilometres from the user, when the source computed it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_from_user: Option<f64>,
    #[serde(default)]
    pub is_open_now: bool,
}

impl Place {
    /// Copy of this place with `distance_from_user` measured from `origin`.
    /// A distance already supplied by the source is kept.
    pub fn with_distance_from(&self, origin: GeoPoint) -> Place {
        let mut place = self.clone();
        if place.distance_from_user.is_none() {
            place.distance_from_user = Some(origin.distance_km(place.location));
        }
        place
    }

    /// Rating formatted for display, e.g. "4.2 (120)".
    pub fn rating_display(&self) -> String {
        format!("{:.1} ({})", self.rating, self.review_count)
    }
}
