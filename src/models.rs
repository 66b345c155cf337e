//! Data models for remote items and the records rendered from them.
//!
//! - [`Item`]: one decoded record from the item endpoint
//! - [`ItemKind`]: the item's `type` tag
//! - [`FeedSnapshot`]: everything one feed rendered, as written to disk
//!
//! Items are transient: fetched, validated, optionally rendered, then dropped.

use crate::render::{Layout, RenderedItem};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The `type` tag of a remote item.
///
/// Only [`ItemKind::Story`] is ever rendered. Tags this crate does not know
/// about decode as [`ItemKind::Other`] instead of failing the whole record.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Story,
    Comment,
    Job,
    Poll,
    Pollopt,
    #[serde(other)]
    Other,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ItemKind::Story => "story",
            ItemKind::Comment => "comment",
            ItemKind::Job => "job",
            ItemKind::Poll => "poll",
            ItemKind::Pollopt => "pollopt",
            ItemKind::Other => "other",
        };
        f.write_str(s)
    }
}

/// A remote item as returned by `{base}/item/{id}.json`.
///
/// Every field other than `id` and `type` is optional on the wire.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Item {
    /// Numeric item id.
    pub id: u64,
    /// Type tag; only `story` is acceptable for rendering.
    #[serde(rename = "type")]
    pub kind: ItemKind,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    /// Creation time in unix seconds.
    #[serde(default)]
    pub time: Option<i64>,
    #[serde(default)]
    pub score: Option<i64>,
}

impl Item {
    pub fn is_story(&self) -> bool {
        self.kind == ItemKind::Story
    }

    /// Score with an absent value treated as zero.
    pub fn score_or_zero(&self) -> i64 {
        self.score.unwrap_or(0)
    }
}

/// The rendered contents of one feed at the end of a run.
#[derive(Debug, Deserialize, Serialize)]
pub struct FeedSnapshot {
    /// Feed name: `best` or `latest`.
    pub feed: String,
    pub layout: Layout,
    /// When the snapshot was taken, RFC 3339 UTC.
    pub generated_at: String,
    /// Pages attempted.
    pub pages: usize,
    /// Whether "load more" would still fetch anything.
    pub more_available: bool,
    pub items: Vec<RenderedItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_full_story() {
        let json = r#"{"id":42,"type":"story","title":"Hi","url":"https://example.com","time":1700000000,"score":12,"by":"pg"}"#;
        let item: Item = serde_json::from_str(json).unwrap();
        assert_eq!(item.id, 42);
        assert!(item.is_story());
        assert_eq!(item.title.as_deref(), Some("Hi"));
        assert_eq!(item.score_or_zero(), 12);
    }

    #[test]
    fn test_decode_sparse_item() {
        let json = r#"{"id":7,"type":"job"}"#;
        let item: Item = serde_json::from_str(json).unwrap();
        assert_eq!(item.kind, ItemKind::Job);
        assert!(item.url.is_none());
        assert!(item.time.is_none());
        assert_eq!(item.score_or_zero(), 0);
    }

    #[test]
    fn test_decode_unknown_kind() {
        let json = r#"{"id":7,"type":"advert"}"#;
        let item: Item = serde_json::from_str(json).unwrap();
        assert_eq!(item.kind, ItemKind::Other);
        assert!(!item.is_story());
    }

    #[test]
    fn test_missing_type_is_rejected() {
        let json = r#"{"id":7}"#;
        assert!(serde_json::from_str::<Item>(json).is_err());
    }
}
