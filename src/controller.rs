//! Per-feed pagination.
//!
//! A [`FeedController`] owns one feed's ID list, page cursor and
//! [`FeedState`]. It loads the ID list once, then fetches one page per
//! [`FeedController::advance`] call through [`fetch_batch`], rendering each
//! accepted item onto its [`Surface`].
//!
//! # State Machine
//!
//! ```text
//! Uninitialized -> Loading(0) -> Idle -> Loading(n) -> Idle -> ... -> Exhausted
//! ```
//!
//! `Loading` doubles as the in-flight latch: an `advance` that arrives while a
//! page is loading is ignored. `Exhausted` is terminal.
//!
//! The controller is driven from a single task, so its state lives in
//! `Cell`s and every method takes `&self`; two `advance` futures on the same
//! controller may be polled together and the latch decides which one runs.

use crate::api::{ApiClient, FetchOutcome, Transport};
use crate::batch::fetch_batch;
use crate::feed::{FeedKind, FeedPolicy};
use crate::models::Item;
use crate::render::render;
use crate::surface::Surface;
use std::cell::{Cell, OnceCell, Ref, RefCell};
use tracing::{debug, error, info, instrument};

/// Default IDs per page.
pub const DEFAULT_PAGE_SIZE: usize = 6;
/// Default cap on concurrent item fetches.
pub const DEFAULT_CONCURRENCY: usize = 3;

/// Paging parameters shared by both feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedConfig {
    pub page_size: usize,
    pub concurrency: usize,
}

impl FeedConfig {
    /// Build a config, clamping zero values to one.
    pub fn new(page_size: usize, concurrency: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            concurrency: concurrency.max(1),
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE, DEFAULT_CONCURRENCY)
    }
}

/// Lifecycle of a feed controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedState {
    /// No ID list yet, or the list could not be loaded.
    Uninitialized,
    /// A fetch is in flight; `page` is the page being requested.
    Loading { page: usize },
    /// Ready for the next page.
    Idle,
    /// Every ID has been attempted.
    Exhausted,
}

pub struct FeedController<'a, T, S> {
    api: &'a ApiClient<T>,
    policy: FeedPolicy,
    config: FeedConfig,
    ids: OnceCell<Vec<u64>>,
    cursor: Cell<usize>,
    state: Cell<FeedState>,
    surface: RefCell<S>,
}

impl<'a, T, S> FeedController<'a, T, S>
where
    T: Transport,
    S: Surface,
{
    /// Create an uninitialized controller.
    ///
    /// # Arguments
    ///
    /// * `api` - Client shared with the other feed
    /// * `policy` - Which feed this is and which items it accepts
    /// * `config` - Page size and concurrency cap
    /// * `surface` - Where accepted items are appended
    pub fn new(api: &'a ApiClient<T>, policy: FeedPolicy, config: FeedConfig, surface: S) -> Self {
        Self {
            api,
            policy,
            config,
            ids: OnceCell::new(),
            cursor: Cell::new(0),
            state: Cell::new(FeedState::Uninitialized),
            surface: RefCell::new(surface),
        }
    }

    pub fn kind(&self) -> FeedKind {
        self.policy.kind
    }

    pub fn state(&self) -> FeedState {
        self.state.get()
    }

    /// Number of pages attempted so far.
    pub fn cursor(&self) -> usize {
        self.cursor.get()
    }

    pub fn id_count(&self) -> usize {
        self.ids.get().map_or(0, Vec::len)
    }

    pub fn surface(&self) -> Ref<'_, S> {
        self.surface.borrow()
    }

    pub fn into_surface(self) -> S {
        self.surface.into_inner()
    }

    /// Load the ID list and the first page.
    ///
    /// Does nothing unless the controller is [`FeedState::Uninitialized`]. If
    /// the list comes back empty (or failed to load) the feed is reported
    /// unavailable and stays uninitialized; there is no automatic retry.
    #[instrument(level = "info", skip(self), fields(feed = %self.policy.kind))]
    pub async fn initialize(&self) {
        if self.state.get() != FeedState::Uninitialized {
            debug!(state = ?self.state.get(), "Already initialized; ignoring");
            return;
        }
        self.state.set(FeedState::Loading { page: 0 });

        let ids = match self.api.fetch_id_list(self.policy.kind.endpoint()).await {
            FetchOutcome::Fetched(ids) if !ids.is_empty() => ids,
            _ => {
                error!("Feed unavailable: no IDs to page through");
                self.state.set(FeedState::Uninitialized);
                return;
            }
        };

        info!(count = ids.len(), "Loaded ID list");
        if self.ids.set(ids).is_err() {
            debug!("ID list already present; keeping the first one");
        }
        self.cursor.set(0);
        self.state.set(FeedState::Idle);
        self.advance().await;
    }

    /// Fetch the next page.
    ///
    /// A no-op while a page is loading, before initialization, and once the
    /// feed is exhausted. Otherwise fetches IDs
    /// `[cursor * page_size, (cursor + 1) * page_size)` (the last page may be
    /// short), renders each accepted item, then advances the cursor by one
    /// whatever the number of accepted items.
    ///
    /// # Returns
    ///
    /// `Some(valid_count)` if a page was fetched, `None` for a no-op.
    #[instrument(level = "info", skip(self), fields(feed = %self.policy.kind))]
    pub async fn advance(&self) -> Option<usize> {
        match self.state.get() {
            FeedState::Idle => {}
            state => {
                debug!(?state, "Advance ignored");
                return None;
            }
        }

        let ids = self.ids.get()?;
        let page_size = self.config.page_size;
        let cursor = self.cursor.get();
        let start = cursor * page_size;
        if start >= ids.len() {
            self.state.set(FeedState::Exhausted);
            return None;
        }

        self.state.set(FeedState::Loading { page: cursor });
        let end = (start + page_size).min(ids.len());
        let api = self.api;

        let valid = fetch_batch(
            &ids[start..end],
            self.config.concurrency,
            move |id| async move { api.fetch_item(id).await.into_option() },
            |item| self.render_if_valid(&item),
            |valid| self.finish_page(valid, ids.len()),
        )
        .await;

        Some(valid)
    }

    fn render_if_valid(&self, item: &Item) -> bool {
        if !self.policy.accepts(item) {
            debug!(id = item.id, kind = %item.kind, has_url = item.url.is_some(), "Item filtered out");
            return false;
        }
        let rendered = render(item, self.policy.kind.layout());
        self.surface.borrow_mut().append(rendered);
        true
    }

    fn finish_page(&self, valid: usize, total: usize) {
        let page = self.cursor.get();
        let next = page + 1;
        self.cursor.set(next);

        let exhausted = next * self.config.page_size >= total;
        self.surface.borrow_mut().set_more_available(!exhausted);
        self.state.set(if exhausted {
            FeedState::Exhausted
        } else {
            FeedState::Idle
        });

        info!(page, valid, exhausted, "Page loaded");
    }
}
