//! recipes - print the recipe feed, from the local cache when possible.
//!
//! The first run fetches the feed and keeps a snapshot; later runs print
//! the snapshot without touching the network until `--refresh` is given.

use std::io;

use anyhow::{bail, Result};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use recipes_core::utils::{filter_recipes, group_by_cuisine, truncate_string};
use recipes_core::{Config, Recipe, RecipeManager};

/// Recipe names longer than this are shortened in the listing
const MAX_NAME_WIDTH: usize = 48;

#[derive(Debug, Parser)]
#[command(name = "recipes")]
#[command(about = "Print the recipe feed, served from the local cache when possible")]
#[command(version)]
struct Args {
    /// Fetch from URL instead of the configured endpoint
    #[arg(long, value_name = "URL")]
    endpoint: Option<String>,

    /// Only show recipes whose name or cuisine contains TEXT
    #[arg(long, value_name = "TEXT")]
    search: Option<String>,

    /// Fetch a fresh list; the cached snapshot is replaced only on success
    #[arg(long)]
    refresh: bool,

    /// Fetch from the network without reading or writing the cache
    #[arg(long, conflicts_with = "refresh")]
    no_cache: bool,

    /// Only show the cached snapshot, never touch the network
    #[arg(long, conflicts_with_all = ["refresh", "no_cache"])]
    offline: bool,

    /// Remove the cached snapshot and images, then exit
    #[arg(long)]
    clear_cache: bool,

    /// Download recipe thumbnails into the image cache
    #[arg(long)]
    prefetch_images: bool,
}

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
    let args = Args::parse();

    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();

    let mut config = Config::load()?;
    config.apply_env();
    if let Some(ref endpoint) = args.endpoint {
        config.endpoint = endpoint.clone();
    }
    debug!(endpoint = %config.endpoint, "Loaded configuration");

    let manager = RecipeManager::from_config(&config)?;

    if args.clear_cache {
        manager.clear_cache()?;
        manager.images().clear()?;
        println!("Cache cleared.");
        return Ok(());
    }

    let recipes = if args.offline {
        match manager.load_cached_recipes() {
            Some(recipes) => recipes,
            None => bail!("No cached recipes. Run without --offline to fetch them."),
        }
    } else if args.refresh {
        manager.refresh_recipes(&config.endpoint).await?
    } else {
        manager
            .get_recipes(&config.endpoint, !args.no_cache)
            .await?
    };
    info!(count = recipes.len(), "Loaded recipes");

    if args.prefetch_images {
        let cached = manager.prefetch_images(&recipes).await;
        eprintln!("Cached {} images in {}", cached, manager.images().dir().display());
    }

    print_recipes(&recipes, args.search.as_deref().unwrap_or(""));
    if !args.no_cache {
        println!("\nLast updated: {}", manager.cache_age());
    }
    Ok(())
}

fn print_recipes(recipes: &[Recipe], query: &str) {
    let matches = filter_recipes(recipes, query);
    if matches.is_empty() {
        println!("No recipes found.");
        return;
    }

    for (cuisine, group) in group_by_cuisine(matches.iter().copied()) {
        println!("{}", cuisine);
        for recipe in group {
            let name = truncate_string(&recipe.name, MAX_NAME_WIDTH);
            match recipe.link() {
                Some(link) => println!("  {:<width$}  {}", name, link, width = MAX_NAME_WIDTH),
                None => println!("  {}", name),
            }
        }
    }
}
