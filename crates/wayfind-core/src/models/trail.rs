use serde::{Deserialize, Serialize};

use super::decode;
use super::geo::GeoPoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Moderate,
    Hard,
    #[default]
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "Easy"),
            Difficulty::Moderate => write!(f, "Moderate"),
            Difficulty::Hard => write!(f, "Hard"),
            Difficulty::Unknown => write!(f, "Unknown"),
        }
    }
}

/// A trail as it appears in search and nearby results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrailSummary {
    #[serde(deserialize_with = "decode::id")]
    pub id: String,
    pub name: String,
    pub center: GeoPoint,
    /// Trail length.
    #[serde(default)]
    pub distance_km: f64,
    #[serde(default)]
    pub elevation_gain_m: f64,
    #[serde(default)]
    pub difficulty: Difficulty,
    /// Unrated trails decode as 0.
    #[serde(default, deserialize_with = "decode::rating_or_zero")]
    pub rating: f64,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl TrailSummary {
    pub fn distance_from(&self, point: GeoPoint) -> f64 {
        self.center.distance_km(point)
    }
}

/// A trail with its full geometry and description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrailDetail {
    #[serde(flatten)]
    pub summary: TrailSummary,
    #[serde(default)]
    pub geometry: Vec<GeoPoint>,
    #[serde(default)]
    pub description: String,
}

impl TrailDetail {
    pub fn id(&self) -> &str {
        &self.summary.id
    }

    /// Length of the geometry polyline, summed segment by segment.
    pub fn path_length_km(&self) -> f64 {
        self.geometry
            .windows(2)
            .map(|pair| pair[0].distance_km(pair[1]))
            .sum()
    }
}
