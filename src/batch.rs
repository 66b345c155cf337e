//! Bounded-concurrency batch fetching.
//!
//! [`fetch_batch`] turns an ordered list of IDs into items, `concurrency` at
//! a time. Each chunk is issued at once and joined before the next chunk
//! starts, so at most `concurrency` fetches are ever outstanding. Results are
//! handed to the item callback in ID order, not arrival order.

use futures::future::join_all;
use std::future::Future;
use tracing::{debug, instrument};

/// Fetch `ids` in sequential chunks of at most `concurrency` concurrent calls.
///
/// For each chunk every `fetch_one` call is issued together and awaited as a
/// group. A slow or failed fetch does not cancel its siblings; `fetch_one`
/// resolves to `None` instead of erroring. Once the whole chunk has resolved,
/// each `Some` item is passed to `on_item` in the chunk's original order and
/// the `true` answers are counted.
///
/// After the last chunk `on_done` is invoked exactly once with the total valid
/// count, which is also returned.
///
/// # Arguments
///
/// * `ids` - IDs to fetch, in render order
/// * `concurrency` - Maximum outstanding fetches; zero is treated as one
/// * `fetch_one` - Fetches one ID, resolving to `None` on any failure
/// * `on_item` - Called per fetched item; returns whether it was accepted
/// * `on_done` - Called once after the last chunk with the accepted count
///
/// # Returns
///
/// The number of items `on_item` accepted.
#[instrument(level = "debug", skip_all, fields(ids = ids.len(), concurrency = concurrency))]
pub async fn fetch_batch<Id, T, F, Fut, I, D>(
    ids: &[Id],
    concurrency: usize,
    fetch_one: F,
    mut on_item: I,
    on_done: D,
) -> usize
where
    Id: Copy,
    F: Fn(Id) -> Fut,
    Fut: Future<Output = Option<T>>,
    I: FnMut(T) -> bool,
    D: FnOnce(usize),
{
    let mut valid = 0usize;

    for (chunk_index, chunk) in ids.chunks(concurrency.max(1)).enumerate() {
        let resolved = join_all(chunk.iter().map(|&id| fetch_one(id))).await;
        let fetched = resolved.iter().filter(|r| r.is_some()).count();

        let mut accepted = 0usize;
        for item in resolved.into_iter().flatten() {
            if on_item(item) {
                accepted += 1;
            }
        }
        valid += accepted;

        debug!(
            chunk = chunk_index,
            size = chunk.len(),
            fetched,
            accepted,
            "Chunk resolved"
        );
    }

    on_done(valid);
    valid
}
