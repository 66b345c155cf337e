//! Command-line interface definitions.
//!
//! All configuration comes from command-line flags; nothing is read from the
//! environment and nothing is persisted.

use crate::api::DEFAULT_API_BASE;
use crate::controller::{DEFAULT_CONCURRENCY, DEFAULT_PAGE_SIZE, FeedConfig};
use clap::Parser;

/// Command-line arguments.
///
/// # Examples
///
/// ```sh
/// # First page of both feeds, printed as Markdown
/// hn_feeds
///
/// # Two extra pages of the best feed, JSON snapshots on disk
/// hn_feeds --more-best 2 -j ./json
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Root of the JSON API
    #[arg(long, default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// IDs requested per page
    #[arg(short = 'p', long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: usize,

    /// Maximum concurrent item fetches
    #[arg(short = 'k', long, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Minimum score for the latest feed
    #[arg(long, default_value_t = 0)]
    pub latest_min_score: i64,

    /// Extra "load more" actions on the best feed after the first page
    #[arg(long, default_value_t = 0)]
    pub more_best: usize,

    /// Extra "load more" actions on the latest feed after the first page
    #[arg(long, default_value_t = 0)]
    pub more_latest: usize,

    /// Output directory for per-feed JSON snapshots
    #[arg(short, long)]
    pub json_output_dir: Option<String>,

    /// Write Markdown here instead of stdout
    #[arg(short, long)]
    pub markdown_output: Option<String>,
}

impl Cli {
    pub fn feed_config(&self) -> FeedConfig {
        FeedConfig::new(self.page_size, self.concurrency)
    }
}
