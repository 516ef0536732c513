//! Command-line interface parsing for wayfind.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use wayfind_core::GeoPoint;

/// wayfind - search places and trails, manage the wishlist
#[derive(Parser, Debug)]
#[command(name = "wayfind")]
#[command(about = "Search places and trails from the command line")]
#[command(version)]
pub struct Cli {
    /// Print a compact table instead of JSON
    #[arg(long, global = true)]
    pub plain: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Filter and rank places from a JSON seed file
    Places {
        /// Seed file: an array of places or {"items": [...]}
        seed: PathBuf,
        #[arg(long, default_value = "")]
        text: String,
        #[arg(long, default_value = "all")]
        category: String,
        #[arg(long, default_value = "all")]
        emotion: String,
        #[arg(long, value_name = "KM")]
        max_distance: Option<f64>,
        #[arg(long)]
        open_now: bool,
        #[arg(long)]
        min_rating: Option<f64>,
        /// Your position as "lat,lng", used to measure distances
        #[arg(long, value_name = "LAT,LNG")]
        near: Option<GeoPoint>,
    },

    /// Search trails (one page)
    Search {
        query: String,
        #[arg(long, value_name = "LAT,LNG")]
        near: Option<GeoPoint>,
        #[arg(long, value_name = "KM", default_value_t = 25.0)]
        radius: f64,
        #[arg(long = "tag")]
        tags: Vec<String>,
        #[arg(long, default_value_t = wayfind_core::models::DEFAULT_PAGE_SIZE)]
        limit: u32,
        #[arg(long)]
        cursor: Option<String>,
    },

    /// Trails nearest to a point
    Nearby {
        #[arg(allow_hyphen_values = true)]
        lat: f64,
        #[arg(allow_hyphen_values = true)]
        lng: f64,
        #[arg(long, value_name = "KM", default_value_t = 25.0)]
        radius: f64,
        #[arg(long, default_value_t = 10)]
        limit: usize,
        #[arg(long = "tag")]
        tags: Vec<String>,
    },

    /// Show one trail
    Trail {
        id: String,
        /// Print only the geometry
        #[arg(long)]
        geometry: bool,
    },

    /// Saved places
    #[command(subcommand)]
    Wishlist(WishlistCommand),
}

#[derive(Subcommand, Debug)]
pub enum WishlistCommand {
    /// The whole list
    List,
    /// One page of the list
    Page {
        #[arg(long, default_value_t = wayfind_core::models::DEFAULT_PAGE_SIZE)]
        limit: u32,
        #[arg(long)]
        cursor: Option<String>,
    },
    Add {
        #[arg(required = true)]
        place_ids: Vec<String>,
    },
    Remove {
        #[arg(required = true)]
        place_ids: Vec<String>,
    },
    Notes { place_id: String, notes: String },
    /// Every saved place, in the new order
    Reorder {
        #[arg(required = true)]
        place_ids: Vec<String>,
    },
    Count,
    Exists { place_id: String },
}
