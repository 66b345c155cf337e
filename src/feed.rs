//! Feed definitions: where a feed's IDs come from, which items it accepts,
//! and how it lays them out.

use crate::models::Item;
use crate::render::Layout;
use std::fmt;

/// The two feeds the application pages through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedKind {
    Best,
    Latest,
}

impl FeedKind {
    /// List endpoint, relative to the API base.
    pub fn endpoint(self) -> &'static str {
        match self {
            FeedKind::Best => "beststories.json",
            FeedKind::Latest => "newstories.json",
        }
    }

    pub fn layout(self) -> Layout {
        match self {
            FeedKind::Best => Layout::Gallery,
            FeedKind::Latest => Layout::List,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FeedKind::Best => "best",
            FeedKind::Latest => "latest",
        }
    }
}

impl fmt::Display for FeedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Validity policy for one feed.
///
/// Every feed requires a `story` with a URL. A feed with `min_score` set
/// additionally requires the item's score (absent counts as 0) to reach it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedPolicy {
    pub kind: FeedKind,
    pub min_score: Option<i64>,
}

impl FeedPolicy {
    pub fn best() -> Self {
        Self {
            kind: FeedKind::Best,
            min_score: None,
        }
    }

    pub fn latest(min_score: i64) -> Self {
        Self {
            kind: FeedKind::Latest,
            min_score: Some(min_score),
        }
    }

    pub fn accepts(&self, item: &Item) -> bool {
        if !item.is_story() || item.url.is_none() {
            return false;
        }
        match self.min_score {
            Some(min) => item.score_or_zero() >= min,
            None => true,
        }
    }
}
