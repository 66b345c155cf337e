//! Turning validated items into display records.
//!
//! Two layouts exist:
//! - **Gallery** (best feed): escaped title, relative age, and a deterministic
//!   pseudo-image picked by `id % GALLERY_IMAGES.len()`
//! - **List** (latest feed): escaped title, relative age, and the link's
//!   domain with the scheme, path and a leading `www.` stripped

use crate::models::Item;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use url::Url;

/// Fixed image assets the gallery rotates through.
pub const GALLERY_IMAGES: [&str; 5] = [
    "images/story-1.jpg",
    "images/story-2.jpg",
    "images/story-3.jpg",
    "images/story-4.jpg",
    "images/story-5.jpg",
];

const UNTITLED: &str = "(untitled)";

/// Which layout a surface renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    Gallery,
    List,
}

/// One item as appended to a surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedItem {
    pub id: u64,
    /// HTML-escaped title.
    pub title: String,
    pub url: String,
    /// Human relative age, e.g. `3 hours ago`.
    pub age: String,
    /// List layout only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// Gallery layout only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Render `item` for `layout`, measuring its age against the current clock.
pub fn render(item: &Item, layout: Layout) -> RenderedItem {
    render_at(item, layout, Utc::now().timestamp())
}

/// Render `item` for `layout`, measuring its age against `now`.
///
/// # Arguments
///
/// * `item` - A validated item; a missing URL renders as empty
/// * `layout` - Gallery adds the pseudo-image, list adds the domain
/// * `now` - Reference time in unix seconds
///
/// # Returns
///
/// The [`RenderedItem`] with an escaped title and relative age.
pub fn render_at(item: &Item, layout: Layout, now: i64) -> RenderedItem {
    let url = item.url.clone().unwrap_or_default();
    let (domain, image) = match layout {
        Layout::Gallery => (None, Some(pseudo_image(item.id).to_string())),
        Layout::List => (Some(extract_domain(&url)), None),
    };

    RenderedItem {
        id: item.id,
        title: escape_html(item.title.as_deref().unwrap_or(UNTITLED)),
        age: item.time.map(|t| relative_time(t, now)).unwrap_or_default(),
        url,
        domain,
        image,
    }
}

/// Escape text for safe inclusion in HTML.
pub fn escape_html(s: &str) -> String {
    html_escape::encode_safe(s).into_owned()
}

/// Describe how long ago `time` was relative to `now`, both in unix seconds.
///
/// Months are 30 days and years 365 days. Anything under a minute, or in the
/// future, is `just now`.
pub fn relative_time(time: i64, now: i64) -> String {
    const MINUTE: i64 = 60;
    const HOUR: i64 = 60 * MINUTE;
    const DAY: i64 = 24 * HOUR;
    const MONTH: i64 = 30 * DAY;
    const YEAR: i64 = 365 * DAY;

    let elapsed = now.saturating_sub(time);
    let (count, unit) = match elapsed {
        e if e < MINUTE => return "just now".to_string(),
        e if e < HOUR => (e / MINUTE, "minute"),
        e if e < DAY => (e / HOUR, "hour"),
        e if e < MONTH => (e / DAY, "day"),
        e if e < YEAR => (e / MONTH, "month"),
        e => (e / YEAR, "year"),
    };

    if count == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{count} {unit}s ago")
    }
}

/// Extract the bare domain of a link.
///
/// `https://www.example.com/x?y` becomes `example.com`. Links that do not
/// parse as URLs are stripped textually.
pub fn extract_domain(link: &str) -> String {
    let host = match Url::parse(link) {
        Ok(parsed) => parsed.host_str().map(str::to_string),
        Err(_) => None,
    };

    let host = host.unwrap_or_else(|| {
        let without_scheme = link.split_once("://").map_or(link, |(_, rest)| rest);
        without_scheme
            .split(['/', '?', '#'])
            .next()
            .unwrap_or_default()
            .to_string()
    });

    host.strip_prefix("www.").map(str::to_string).unwrap_or(host)
}

/// Pick the gallery image for an item id.
pub fn pseudo_image(id: u64) -> &'static str {
    GALLERY_IMAGES[(id % GALLERY_IMAGES.len() as u64) as usize]
}
