//! Rendering surfaces the feed controllers append to.
//!
//! A surface only ever receives records in order and a "more available"
//! signal; it is never read back by the controllers.

use crate::render::{Layout, RenderedItem};

/// Append-only target for rendered items.
pub trait Surface {
    /// Append one rendered item after everything appended so far.
    fn append(&mut self, item: RenderedItem);

    /// Show or hide the "load more" affordance.
    fn set_more_available(&mut self, more: bool);
}

/// Surface that keeps everything in memory.
///
/// Used by the binary to collect each feed before writing outputs, and by
/// tests to observe append order.
#[derive(Debug, Clone)]
pub struct MemorySurface {
    pub layout: Layout,
    pub items: Vec<RenderedItem>,
    pub more_available: bool,
}

impl MemorySurface {
    /// New empty surface; the affordance starts hidden.
    pub fn new(layout: Layout) -> Self {
        Self {
            layout,
            items: Vec::new(),
            more_available: false,
        }
    }

    #[cfg(test)]
    pub fn ids(&self) -> Vec<u64> {
        self.items.iter().map(|item| item.id).collect()
    }
}

impl Surface for MemorySurface {
    fn append(&mut self, item: RenderedItem) {
        self.items.push(item);
    }

    fn set_more_available(&mut self, more: bool) {
        self.more_available = more;
    }
}
