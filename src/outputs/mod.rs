//! Output generation for the rendered feeds.
//!
//! # Submodules
//!
//! - [`json`]: Writes each feed's [`FeedSnapshot`](crate::models::FeedSnapshot) to disk
//! - [`markdown`]: Renders both feeds as one Markdown document
//!
//! # Output Structure
//!
//! ```text
//! json_output_dir/
//! ├── best.json
//! └── latest.json
//! ```

pub mod json;
pub mod markdown;
