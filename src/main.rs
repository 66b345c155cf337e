//! # HN Feeds
//!
//! Pages through the Hacker News "best" and "latest" story feeds, fetching
//! items in small concurrent batches and rendering them incrementally.
//!
//! ## Usage
//!
//! ```sh
//! hn_feeds --more-best 1 -j ./json -m ./feeds.md
//! ```
//!
//! ## Architecture
//!
//! 1. **ID lists**: Each feed loads its ID list once
//! 2. **Pages**: Each feed fetches page 0, then one more page per "load more"
//! 3. **Batches**: Items of a page are fetched `concurrency` at a time, in order
//! 4. **Output**: Rendered feeds go to Markdown and, optionally, JSON
//!
//! Everything runs on one thread; the two feeds interleave at I/O points.

use chrono::{SecondsFormat, Utc};
use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod batch;
mod cli;
mod controller;
mod feed;
mod models;
mod outputs;
mod render;
mod surface;
mod utils;

use api::{ApiClient, HttpTransport, Transport};
use cli::Cli;
use controller::FeedController;
use feed::FeedPolicy;
use models::FeedSnapshot;
use outputs::{json, markdown};
use surface::MemorySurface;
use utils::ensure_writable_dir;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("hn_feeds starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    // Fail early rather than after all the fetching.
    if let Some(dir) = &args.json_output_dir {
        if let Err(e) = ensure_writable_dir(dir).await {
            error!(path = %dir, error = %e, "JSON output directory is not writable");
            return Err(e);
        }
    }

    let api = ApiClient::new(HttpTransport::new(reqwest::Client::new()), args.api_base.clone());
    let snapshots = load_feeds(&api, &args).await;

    for snapshot in &snapshots {
        info!(
            feed = %snapshot.feed,
            items = snapshot.items.len(),
            pages = snapshot.pages,
            more_available = snapshot.more_available,
            "Feed loaded"
        );
    }

    if let Some(dir) = &args.json_output_dir {
        for snapshot in &snapshots {
            if let Err(e) = json::write_snapshot(snapshot, dir).await {
                error!(feed = %snapshot.feed, error = %e, "Failed to write JSON snapshot");
            }
        }
    }

    let md = markdown::feeds_to_markdown(&snapshots);
    match &args.markdown_output {
        Some(path) => {
            tokio::fs::write(path, md).await?;
            info!(%path, "Wrote Markdown");
        }
        None => print!("{md}"),
    }

    let elapsed = start_time.elapsed();
    info!(?elapsed, millis = elapsed.as_millis(), "Execution complete");

    Ok(())
}

/// Initialize both feeds together, apply the requested "load more" actions,
/// and snapshot what each feed rendered.
#[instrument(level = "info", skip_all)]
async fn load_feeds<T>(api: &ApiClient<T>, args: &Cli) -> Vec<FeedSnapshot>
where
    T: Transport,
{
    let config = args.feed_config();
    let best = FeedController::new(
        api,
        FeedPolicy::best(),
        config,
        MemorySurface::new(feed::FeedKind::Best.layout()),
    );
    let latest = FeedController::new(
        api,
        FeedPolicy::latest(args.latest_min_score),
        config,
        MemorySurface::new(feed::FeedKind::Latest.layout()),
    );

    tokio::join!(best.initialize(), latest.initialize());
    tokio::join!(
        load_more(&best, args.more_best),
        load_more(&latest, args.more_latest)
    );

    vec![snapshot(best), snapshot(latest)]
}

/// Press "load more" up to `times` times, stopping early once nothing is left.
async fn load_more<T, S>(feed: &FeedController<'_, T, S>, times: usize)
where
    T: Transport,
    S: surface::Surface,
{
    for _ in 0..times {
        if feed.advance().await.is_none() {
            debug!(feed = %feed.kind(), state = ?feed.state(), ids = feed.id_count(), "Nothing more to load");
            break;
        }
    }
}

fn snapshot<T>(feed: FeedController<'_, T, MemorySurface>) -> FeedSnapshot
where
    T: Transport,
{
    let kind = feed.kind();
    let pages = feed.cursor();
    let surface = feed.into_surface();
    FeedSnapshot {
        feed: kind.name().to_string(),
        layout: surface.layout,
        generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        pages,
        more_available: surface.more_available,
        items: surface.items,
    }
}
