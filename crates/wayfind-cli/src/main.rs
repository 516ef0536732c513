//! wayfind - command line front end for the wayfind data layer.
//!
//! Each subcommand drives one of the core facades and prints the result as
//! JSON (or a compact table with `--plain`).

mod cli;

use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use wayfind_core::search::StaticDataset;
use wayfind_core::utils::{format_distance_km, truncate_string};
use wayfind_core::{
    Config, GeoPoint, Place, PlaceQuery, PlaceSearch, TrailDetail, TrailSearch, TrailService,
    TrailSummary, Wishlist,
};

use cli::{Cli, Command, WishlistCommand};

/// Column width for names in `--plain` output
const NAME_WIDTH: usize = 32;

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();
    let cli = Cli::parse();

    let config = Config::load()?;
    info!(base_url = %config.base_url, "wayfind starting");

    match cli.command {
        Command::Places {
            seed,
            text,
            category,
            emotion,
            max_distance,
            open_now,
            min_rating,
            near,
        } => {
            let json = std::fs::read_to_string(&seed)
                .with_context(|| format!("Failed to read seed file: {}", seed.display()))?;
            let mut search = PlaceSearch::new(StaticDataset::from_json(&json)?);
            search.set_user_position(near);

            let query = PlaceQuery {
                text,
                category,
                emotion,
                max_distance_km: max_distance,
                open_now: open_now.then_some(true),
                min_rating,
            };
            let places = search.search(&query).await?;
            if cli.plain {
                print_places(&places);
            } else {
                print_json(&places)?;
            }
        }

        Command::Search {
            query,
            near,
            radius,
            tags,
            limit,
            cursor,
        } => {
            let trails = TrailService::new(config.build_remote()?, config.cache_ttl());
            let params = TrailSearch {
                query,
                center: near,
                radius_km: near.map(|_| radius),
                tags,
                limit,
                cursor,
            };
            let page = trails.search(&params).await?;
            if cli.plain {
                print_trails(&page.items, near);
                if let Some(ref next) = page.next_cursor {
                    println!("next: --cursor {}", next);
                }
            } else {
                print_json(&page)?;
            }
        }

        Command::Nearby {
            lat,
            lng,
            radius,
            limit,
            tags,
        } => {
            let center = GeoPoint::new(lat, lng);
            let trails = TrailService::new(config.build_remote()?, config.cache_ttl());
            let nearest = trails.nearby(center, radius, limit, &tags).await?;
            if cli.plain {
                print_trails(&nearest, Some(center));
            } else {
                print_json(&nearest)?;
            }
        }

        Command::Trail { id, geometry } => {
            let trails = TrailService::new(config.build_remote()?, config.cache_ttl());
            if geometry {
                print_json(&trails.geometry(&id).await?)?;
            } else {
                let detail = trails.trail(&id).await?;
                if cli.plain {
                    print_trail_detail(&detail);
                } else {
                    print_json(&detail)?;
                }
            }
        }

        Command::Wishlist(command) => {
            let wishlist = Wishlist::new(config.build_remote()?, config.cache_ttl());
            run_wishlist(&wishlist, command, cli.plain).await?;
        }
    }

    Ok(())
}

async fn run_wishlist(
    wishlist: &Wishlist<wayfind_core::HttpRemote>,
    command: WishlistCommand,
    plain: bool,
) -> Result<()> {
    match command {
        WishlistCommand::List => {
            let places = wishlist.list(true).await?;
            if plain {
                print_places(&places);
                if let Some(age) = wishlist.cached_age() {
                    println!("{} saved, fetched {}", places.len(), age);
                }
            } else {
                print_json(&places)?;
            }
        }
        WishlistCommand::Page { limit, cursor } => {
            print_json(&wishlist.list_page(limit, cursor.as_deref()).await?)?;
        }
        WishlistCommand::Add { place_ids } => match place_ids.as_slice() {
            [one] => wishlist.add(one).await?,
            many => wishlist.add_many(many).await?,
        },
        WishlistCommand::Remove { place_ids } => match place_ids.as_slice() {
            [one] => wishlist.remove(one).await?,
            many => wishlist.remove_many(many).await?,
        },
        WishlistCommand::Notes { place_id, notes } => {
            wishlist.update_notes(&place_id, &notes).await?;
        }
        WishlistCommand::Reorder { place_ids } => wishlist.reorder(&place_ids).await?,
        WishlistCommand::Count => println!("{}", wishlist.count().await?),
        WishlistCommand::Exists { place_id } => println!("{}", wishlist.exists(&place_id).await?),
    }
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_places(places: &[Place]) {
    for place in places {
        let distance = place
            .distance_from_user
            .map(format_distance_km)
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<name_width$}  {:>10}  {:>9}  {}",
            truncate_string(&place.name, NAME_WIDTH),
            place.rating_display(),
            distance,
            if place.is_open_now { "open" } else { "closed" },
            name_width = NAME_WIDTH,
        );
    }
}

fn print_trails(trails: &[TrailSummary], from: Option<GeoPoint>) {
    for trail in trails {
        let distance = from
            .map(|p| format_distance_km(trail.distance_from(p)))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<name_width$}  {:>9}  {:>8}  {:.1}",
            truncate_string(&trail.name, NAME_WIDTH),
            distance,
            trail.difficulty.to_string(),
            trail.rating,
            name_width = NAME_WIDTH,
        );
    }
}

fn print_trail_detail(detail: &TrailDetail) {
    let summary = &detail.summary;
    println!("{} ({})", summary.name, summary.difficulty);
    println!(
        "length {}, path {} over {} points, +{:.0} m",
        format_distance_km(summary.distance_km),
        format_distance_km(detail.path_length_km()),
        detail.geometry.len(),
        summary.elevation_gain_m,
    );
    if !detail.description.is_empty() {
        println!("{}", detail.description);
    }
}
