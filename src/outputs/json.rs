//! JSON output of feed snapshots.
//!
//! Each feed is written to `{json_output_dir}/{feed}.json`, replacing any
//! previous run's file.

use crate::models::FeedSnapshot;
use std::error::Error;
use std::path::PathBuf;
use tokio::fs;
use tracing::{error, info, instrument};

/// Write a [`FeedSnapshot`] as pretty-printed JSON.
///
/// # Arguments
///
/// * `snapshot` - The feed to serialize; its `feed` name picks the file name
/// * `json_output_dir` - Directory to write into, created if missing
///
/// # Returns
///
/// The path written, or an error if the directory or file could not be
/// written.
#[instrument(level = "info", skip_all, fields(feed = %snapshot.feed, %json_output_dir))]
pub async fn write_snapshot(
    snapshot: &FeedSnapshot,
    json_output_dir: &str,
) -> Result<PathBuf, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(snapshot)?;

    if let Err(e) = fs::create_dir_all(json_output_dir).await {
        error!(error = %e, "Failed to create JSON dir");
        return Err(e.into());
    }

    let path = PathBuf::from(json_output_dir).join(format!("{}.json", snapshot.feed));
    fs::write(&path, json).await?;
    info!(path = %path.display(), items = snapshot.items.len(), "Wrote feed JSON");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{Layout, RenderedItem};

    #[tokio::test]
    async fn test_write_snapshot_round_trips() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("out");
        let snapshot = FeedSnapshot {
            feed: "latest".to_string(),
            layout: Layout::List,
            generated_at: "2026-10-16T00:00:00Z".to_string(),
            pages: 2,
            more_available: true,
            items: vec![RenderedItem {
                id: 42,
                title: "Hello".to_string(),
                url: "https://example.com/x".to_string(),
                age: "1 hour ago".to_string(),
                domain: Some("example.com".to_string()),
                image: None,
            }],
        };

        let path = write_snapshot(&snapshot, dir.to_str().unwrap()).await.unwrap();
        assert!(path.ends_with("latest.json"));

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(!text.contains("\"image\""));
        let back: FeedSnapshot = serde_json::from_str(&text).unwrap();
        assert_eq!(back.items, snapshot.items);
        assert_eq!(back.layout, Layout::List);
        assert!(back.more_available);
    }
}
