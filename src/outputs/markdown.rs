//! Markdown rendering of feed snapshots.
//!
//! Gallery feeds list the pseudo-image next to each title; list feeds show
//! the link's domain. Titles arrive HTML-escaped, which Markdown renders as
//! the original text.

use crate::models::FeedSnapshot;
use crate::render::Layout;
use itertools::Itertools;
use std::fmt::Write;

/// Render all snapshots as one Markdown document, one section per feed.
pub fn feeds_to_markdown(snapshots: &[FeedSnapshot]) -> String {
    snapshots.iter().map(snapshot_to_markdown).join("\n")
}

/// Render one snapshot as a Markdown section.
pub fn snapshot_to_markdown(snapshot: &FeedSnapshot) -> String {
    let mut md = String::new();
    let _ = writeln!(md, "## {} stories\n", heading(&snapshot.feed));

    if snapshot.items.is_empty() {
        let _ = writeln!(md, "_Nothing to show._");
    }

    for item in &snapshot.items {
        let line = match snapshot.layout {
            Layout::Gallery => [
                format!("![]({})", item.image.as_deref().unwrap_or_default()),
                link(&item.title, &item.url),
                item.age.clone(),
            ]
            .into_iter()
            .filter(|part| !part.is_empty())
            .join(" "),
            Layout::List => [
                link(&item.title, &item.url),
                item.domain.as_deref().map(|d| format!("({d})")).unwrap_or_default(),
                item.age.clone(),
            ]
            .into_iter()
            .filter(|part| !part.is_empty())
            .join(" · "),
        };
        let _ = writeln!(md, "- {line}");
    }

    let footer = if snapshot.more_available {
        "More stories available."
    } else {
        "End of feed."
    };
    let _ = writeln!(md, "\n_{} page(s) loaded. {footer}_", snapshot.pages);
    md
}

/// Markdown link with the text escaped and the destination in angle brackets,
/// so titles with stray brackets and URLs with parentheses stay one link.
fn link(title: &str, url: &str) -> String {
    let text: String = title
        .chars()
        .flat_map(|c| match c {
            '\\' | '[' | ']' => vec!['\\', c],
            _ => vec![c],
        })
        .collect();
    let dest = url
        .replace('<', "%3C")
        .replace('>', "%3E")
        .replace(' ', "%20");
    format!("[{text}](<{dest}>)")
}

fn heading(feed: &str) -> String {
    let mut c = feed.chars();
    match c.next() {
        None => String::new(),
        Some(f) => f.to_uppercase().collect::<String>() + c.as_str(),
    }
}
