//! Multi-predicate filter and relevance ranking over a place collection.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::models::place::ALL;
use crate::models::Place;
use crate::utils::contains_ignore_case;

/// What to look for. Every supplied predicate must hold for a place to match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlaceQuery {
    pub text: String,
    pub category: String,
    pub emotion: String,
    pub max_distance_km: Option<f64>,
    /// `Some(true)` keeps only open places; `Some(false)` and `None` do not filter.
    pub open_now: Option<bool>,
    pub min_rating: Option<f64>,
}

impl Default for PlaceQuery {
    fn default() -> Self {
        Self {
            text: String::new(),
            category: ALL.to_string(),
            emotion: ALL.to_string(),
            max_distance_km: None,
            open_now: None,
            min_rating: None,
        }
    }
}

impl PlaceQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn emotion(mut self, emotion: impl Into<String>) -> Self {
        self.emotion = emotion.into();
        self
    }

    pub fn max_distance_km(mut self, km: f64) -> Self {
        self.max_distance_km = Some(km);
        self
    }

    pub fn open_now(mut self, open: bool) -> Self {
        self.open_now = Some(open);
        self
    }

    pub fn min_rating(mut self, rating: f64) -> Self {
        self.min_rating = Some(rating);
        self
    }
}

/// A query with its text and emotion lowercased once up front.
struct Matcher<'q> {
    query: &'q PlaceQuery,
    text: String,
    emotion: Option<String>,
}

impl<'q> Matcher<'q> {
    fn new(query: &'q PlaceQuery) -> Self {
        let emotion = (query.emotion != ALL).then(|| query.emotion.to_lowercase());
        Self {
            query,
            text: query.text.trim().to_lowercase(),
            emotion,
        }
    }

    fn matches(&self, place: &Place) -> bool {
        self.matches_text(place)
            && self.matches_category(place)
            && self.matches_emotion(place)
            && self.matches_distance(place)
            && self.matches_open(place)
            && self.matches_rating(place)
    }

    fn matches_text(&self, place: &Place) -> bool {
        self.text.is_empty()
            || contains_ignore_case(&place.name, &self.text)
            || contains_ignore_case(&place.description, &self.text)
            || place.tags.iter().any(|t| contains_ignore_case(t, &self.text))
    }

    fn matches_category(&self, place: &Place) -> bool {
        self.query.category == ALL || place.category == self.query.category
    }

    fn matches_emotion(&self, place: &Place) -> bool {
        match &self.emotion {
            None => true,
            Some(wanted) => place.emotions.iter().any(|e| e.to_lowercase() == *wanted),
        }
    }

    fn matches_distance(&self, place: &Place) -> bool {
        match self.query.max_distance_km {
            None => true,
            // Unknown distance counts as infinitely far
            Some(max) => place.distance_from_user.is_some_and(|d| d <= max),
        }
    }

    fn matches_open(&self, place: &Place) -> bool {
        self.query.open_now != Some(true) || place.is_open_now
    }

    fn matches_rating(&self, place: &Place) -> bool {
        self.query.min_rating.map_or(true, |min| place.rating >= min)
    }
}

/// Rating descending, then review count descending.
fn by_relevance(a: &Place, b: &Place) -> Ordering {
    b.rating
        .total_cmp(&a.rating)
        .then_with(|| b.review_count.cmp(&a.review_count))
}

/// Filter `dataset` by `query` and order the matches by relevance.
///
/// Places that tie on both rating and review count keep their input order.
pub fn search(dataset: &[Place], query: &PlaceQuery) -> Vec<Place> {
    let matcher = Matcher::new(query);
    let mut results: Vec<Place> = dataset
        .iter()
        .filter(|place| matcher.matches(place))
        .cloned()
        .collect();
    // sort_by is stable
    results.sort_by(by_relevance);
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GeoPoint;

    fn place(id: &str, name: &str, rating: f64, reviews: u32) -> Place {
        Place {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            tags: Vec::new(),
            category: "cafe".to_string(),
            emotions: Vec::new(),
            rating,
            review_count: reviews,
            location: GeoPoint::new(0.0, 0.0),
            distance_from_user: None,
            is_open_now: false,
        }
    }

    fn ids(places: &[Place]) -> Vec<&str> {
        places.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_rating_tie_broken_by_review_count() {
        let dataset = vec![
            place("blue", "Blue Cafe", 4.2, 10),
            place("red", "Red Cafe", 4.2, 50),
        ];
        let results = search(&dataset, &PlaceQuery::new().text("cafe"));
        assert_eq!(ids(&results), vec!["red", "blue"]);
    }

    #[test]
    fn test_exact_ties_keep_input_order() {
        let dataset = vec![
            place("a", "A", 4.0, 5),
            place("b", "B", 4.5, 1),
            place("c", "C", 4.0, 5),
            place("d", "D", 4.0, 5),
        ];
        let results = search(&dataset, &PlaceQuery::new());
        assert_eq!(ids(&results), vec!["b", "a", "c", "d"]);
    }

    #[test]
    fn test_text_matches_name_description_or_tag() {
        let mut by_desc = place("desc", "Nook", 3.0, 0);
        by_desc.description = "Great ESPRESSO bar".to_string();
        let mut by_tag = place("tag", "Corner", 3.0, 0);
        by_tag.tags = vec!["Espresso".to_string()];
        let by_name = place("name", "Espresso House", 3.0, 0);
        let miss = place("miss", "Tea Room", 3.0, 0);

        let dataset = vec![by_desc, by_tag, by_name, miss];
        let results = search(&dataset, &PlaceQuery::new().text("  espresso "));
        assert_eq!(ids(&results), vec!["desc", "tag", "name"]);
    }

    #[test]
    fn test_blank_text_matches_everything() {
        let dataset = vec![place("a", "A", 1.0, 0), place("b", "B", 2.0, 0)];
        assert_eq!(search(&dataset, &PlaceQuery::new().text("   ")).len(), 2);
    }

    #[test]
    fn test_category_exact_unless_all() {
        let mut park = place("park", "Park", 3.0, 0);
        park.category = "park".to_string();
        let dataset = vec![park, place("cafe", "Cafe", 3.0, 0)];

        assert_eq!(ids(&search(&dataset, &PlaceQuery::new().category("park"))), vec!["park"]);
        // Exact, so case matters
        assert!(search(&dataset, &PlaceQuery::new().category("Park")).is_empty());
        assert_eq!(search(&dataset, &PlaceQuery::new().category("all")).len(), 2);
    }

    #[test]
    fn test_emotion_case_insensitive() {
        let mut calm = place("calm", "Calm", 3.0, 0);
        calm.emotions = vec!["Relaxed".to_string(), "CALM".to_string()];
        let dataset = vec![calm, place("none", "None", 3.0, 0)];

        assert_eq!(ids(&search(&dataset, &PlaceQuery::new().emotion("calm"))), vec!["calm"]);
        assert!(search(&dataset, &PlaceQuery::new().emotion("excited")).is_empty());
    }

    #[test]
    fn test_missing_distance_excluded_when_bounded() {
        let mut near = place("near", "Near", 3.0, 0);
        near.distance_from_user = Some(2.0);
        let mut far = place("far", "Far", 3.0, 0);
        far.distance_from_user = Some(20.0);
        let mut unknown = place("unknown", "Unknown", 5.0, 999);
        unknown.is_open_now = true;
        let dataset = vec![near, far, unknown];

        let bounded = search(&dataset, &PlaceQuery::new().max_distance_km(10.0));
        assert_eq!(ids(&bounded), vec!["near"]);
        // Without a bound the unknown-distance place is fine
        assert_eq!(search(&dataset, &PlaceQuery::new()).len(), 3);
    }

    #[test]
    fn test_open_now_filter() {
        let mut open = place("open", "Open", 3.0, 0);
        open.is_open_now = true;
        let dataset = vec![open, place("closed", "Closed", 3.0, 0)];

        assert_eq!(ids(&search(&dataset, &PlaceQuery::new().open_now(true))), vec!["open"]);
        assert_eq!(search(&dataset, &PlaceQuery::new().open_now(false)).len(), 2);
    }

    #[test]
    fn test_min_rating_inclusive() {
        let dataset = vec![place("low", "Low", 3.9, 0), place("edge", "Edge", 4.0, 0)];
        assert_eq!(ids(&search(&dataset, &PlaceQuery::new().min_rating(4.0))), vec!["edge"]);
    }

    #[test]
    fn test_predicates_are_and_combined() {
        let mut good = place("good", "Harbour Cafe", 4.5, 10);
        good.emotions = vec!["cozy".to_string()];
        good.distance_from_user = Some(1.0);
        good.is_open_now = true;

        let mut closed = good.clone();
        closed.id = "closed".to_string();
        closed.is_open_now = false;

        let mut low = good.clone();
        low.id = "low".to_string();
        low.rating = 2.0;

        let mut far = good.clone();
        far.id = "far".to_string();
        far.distance_from_user = Some(30.0);

        let mut wrong_mood = good.clone();
        wrong_mood.id = "mood".to_string();
        wrong_mood.emotions = vec!["lively".to_string()];

        let dataset = vec![closed, low, far, wrong_mood, good];
        let query = PlaceQuery::new()
            .text("harbour")
            .category("cafe")
            .emotion("Cozy")
            .max_distance_km(5.0)
            .open_now(true)
            .min_rating(4.0);
        assert_eq!(ids(&search(&dataset, &query)), vec!["good"]);
    }

    #[test]
    fn test_no_match_is_empty_not_error() {
        let dataset = vec![place("a", "A", 1.0, 0)];
        assert!(search(&dataset, &PlaceQuery::new().text("zzz")).is_empty());
        assert!(search(&[], &PlaceQuery::new()).is_empty());
    }

    #[test]
    fn test_query_decodes_with_defaults() {
        let q: PlaceQuery = serde_json::from_str(r#"{"text": "cafe", "openNow": true}"#).unwrap();
        assert_eq!(q.category, "all");
        assert_eq!(q.emotion, "all");
        assert_eq!(q.open_now, Some(true));
    }
}
