//! JSON API access for the story feeds.
//!
//! This module wraps the HTTP transport as a capability and exposes the two
//! calls the feed controllers need: fetching a feed's ID list and fetching a
//! single item. Neither call ever returns an error to its caller.
//!
//! # Architecture
//!
//! - [`Transport`]: Core trait defining "GET this URL, give me the body"
//! - [`HttpTransport`]: `reqwest`-backed implementation used at runtime
//! - [`ApiClient`]: Builds endpoint URLs, decodes JSON, and folds every
//!   failure into [`FetchOutcome::Empty`]
//!
//! # Failure Policy
//!
//! - Transport failures, non-success statuses and undecodable payloads are
//!   logged once and substituted with [`FetchOutcome::Empty`]
//! - No retries and no backoff: one failed attempt is final for that call

use crate::models::Item;
use crate::utils::truncate_for_log;
use serde::de::DeserializeOwned;
use std::time::Instant;
use tracing::{debug, instrument, warn};

/// Default public endpoint root.
pub const DEFAULT_API_BASE: &str = "https://hacker-news.firebaseio.com/v0";

/// Everything that can go wrong with a single API call.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("unexpected status code: {0}")]
    HttpStatus(u16),
    #[error("malformed payload: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Result of an API call once failures have been folded away.
///
/// Callers decide explicitly what an [`FetchOutcome::Empty`] means for them
/// (an empty ID list, a skipped item) instead of relying on a swallowed error.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome<T> {
    Fetched(T),
    Empty,
}

impl<T> FetchOutcome<T> {
    pub fn into_option(self) -> Option<T> {
        match self {
            FetchOutcome::Fetched(value) => Some(value),
            FetchOutcome::Empty => None,
        }
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        matches!(self, FetchOutcome::Empty)
    }
}

/// Trait for the HTTP capability the client is built on.
///
/// Implementors fetch the raw body for a URL. A non-success status must be
/// reported as [`ApiError::HttpStatus`].
pub trait Transport {
    /// Fetch the body at `url`.
    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, ApiError>;
}

/// [`Transport`] backed by a shared `reqwest::Client`.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Transport for HttpTransport {
    #[instrument(level = "debug", skip(self))]
    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::HttpStatus(status.as_u16()));
        }
        Ok(response.bytes().await?.to_vec())
    }
}

/// Client for the list and item endpoints.
///
/// All URLs are built from `base`:
/// - lists: `{base}/{endpoint}` (e.g. `beststories.json`)
/// - items: `{base}/item/{id}.json`
#[derive(Debug)]
pub struct ApiClient<T> {
    transport: T,
    base: String,
}

impl<T> ApiClient<T>
where
    T: Transport,
{
    pub fn new(transport: T, base: impl Into<String>) -> Self {
        Self {
            transport,
            base: base.into().trim_end_matches('/').to_string(),
        }
    }

    #[cfg(test)]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn list_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base, endpoint.trim_start_matches('/'))
    }

    pub fn item_url(&self, id: u64) -> String {
        format!("{}/item/{}.json", self.base, id)
    }

    /// Fetch and decode a feed's ID list.
    ///
    /// # Returns
    ///
    /// [`FetchOutcome::Fetched`] with the IDs in server order (possibly an
    /// empty list), or [`FetchOutcome::Empty`] if the request or decode
    /// failed. The failure is logged here and nowhere else.
    #[instrument(level = "info", skip(self))]
    pub async fn fetch_id_list(&self, endpoint: &str) -> FetchOutcome<Vec<u64>> {
        let url = self.list_url(endpoint);
        let t0 = Instant::now();
        match self.get_json::<Vec<u64>>(&url).await {
            Ok(ids) => {
                debug!(
                    %url,
                    count = ids.len(),
                    elapsed_ms = t0.elapsed().as_millis(),
                    "Fetched ID list"
                );
                FetchOutcome::Fetched(ids)
            }
            Err(e) => {
                warn!(%url, error = %e, "ID list fetch failed; treating as empty");
                FetchOutcome::Empty
            }
        }
    }

    /// Fetch and decode a single item.
    ///
    /// The item endpoint answers `null` for unknown IDs; that is folded into
    /// [`FetchOutcome::Empty`] alongside transport and decode failures.
    #[instrument(level = "debug", skip(self))]
    pub async fn fetch_item(&self, id: u64) -> FetchOutcome<Item> {
        let url = self.item_url(id);
        match self.get_json::<Option<Item>>(&url).await {
            Ok(Some(item)) => FetchOutcome::Fetched(item),
            Ok(None) => {
                debug!(id, "Item endpoint returned null");
                FetchOutcome::Empty
            }
            Err(e) => {
                warn!(id, %url, error = %e, "Item fetch failed; skipping");
                FetchOutcome::Empty
            }
        }
    }

    async fn get_json<D>(&self, url: &str) -> Result<D, ApiError>
    where
        D: DeserializeOwned,
    {
        let body = self.transport.get_bytes(url).await?;
        serde_json::from_slice(&body).map_err(|e| {
            debug!(
                %url,
                body = %truncate_for_log(&String::from_utf8_lossy(&body), 200),
                "Undecodable payload"
            );
            ApiError::from(e)
        })
    }
}

/// Scripted in-memory transport for tests.
#[cfg(test)]
pub mod testing {
    use super::{ApiError, Transport};
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;

    enum Scripted {
        Body(Vec<u8>),
        Status(u16),
    }

    /// Answers canned bodies per URL and records every request.
    ///
    /// Latency is simulated with cooperative yields so tests stay
    /// deterministic on a single-threaded runtime. Unscripted URLs answer 404.
    #[derive(Default)]
    pub struct ScriptedTransport {
        responses: HashMap<String, Scripted>,
        latency: HashMap<String, usize>,
        in_flight: Cell<usize>,
        max_in_flight: Cell<usize>,
        requests: RefCell<Vec<String>>,
    }

    impl ScriptedTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_json(mut self, url: &str, value: serde_json::Value) -> Self {
            let body = serde_json::to_vec(&value).unwrap();
            self.responses.insert(url.to_string(), Scripted::Body(body));
            self
        }

        pub fn with_raw(mut self, url: &str, body: &str) -> Self {
            self.responses
                .insert(url.to_string(), Scripted::Body(body.as_bytes().to_vec()));
            self
        }

        pub fn with_status(mut self, url: &str, status: u16) -> Self {
            self.responses.insert(url.to_string(), Scripted::Status(status));
            self
        }

        /// Number of scheduler yields before `url` answers.
        pub fn with_latency(mut self, url: &str, yields: usize) -> Self {
            self.latency.insert(url.to_string(), yields);
            self
        }

        pub fn max_in_flight(&self) -> usize {
            self.max_in_flight.get()
        }

        pub fn requests(&self) -> Vec<String> {
            self.requests.borrow().clone()
        }

        pub fn request_count(&self) -> usize {
            self.requests.borrow().len()
        }
    }

    impl Transport for ScriptedTransport {
        async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, ApiError> {
            self.requests.borrow_mut().push(url.to_string());
            let now = self.in_flight.get() + 1;
            self.in_flight.set(now);
            self.max_in_flight.set(self.max_in_flight.get().max(now));

            for _ in 0..self.latency.get(url).copied().unwrap_or(0) {
                tokio::task::yield_now().await;
            }

            self.in_flight.set(self.in_flight.get() - 1);
            match self.responses.get(url) {
                Some(Scripted::Body(body)) => Ok(body.clone()),
                Some(Scripted::Status(code)) => Err(ApiError::HttpStatus(*code)),
                None => Err(ApiError::HttpStatus(404)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::ScriptedTransport;
    use super::*;
    use crate::models::ItemKind;
    use serde_json::json;

    const BASE: &str = "http://api.test/v0";

    #[test]
    fn test_urls_are_built_from_base() {
        let client = ApiClient::new(ScriptedTransport::new(), "http://api.test/v0/");
        assert_eq!(
            client.list_url("beststories.json"),
            "http://api.test/v0/beststories.json"
        );
        assert_eq!(client.item_url(42), "http://api.test/v0/item/42.json");
    }

    #[tokio::test]
    async fn test_fetch_id_list_success() {
        let transport = ScriptedTransport::new()
            .with_json(&format!("{BASE}/beststories.json"), json!([3, 1, 2]));
        let client = ApiClient::new(transport, BASE);
        let ids = client.fetch_id_list("beststories.json").await;
        assert_eq!(ids, FetchOutcome::Fetched(vec![3, 1, 2]));
    }

    #[tokio::test]
    async fn test_fetch_id_list_status_failure_is_empty() {
        let transport =
            ScriptedTransport::new().with_status(&format!("{BASE}/newstories.json"), 503);
        let client = ApiClient::new(transport, BASE);
        assert!(client.fetch_id_list("newstories.json").await.is_empty());
        assert_eq!(client.transport().request_count(), 1);
    }

    #[tokio::test]
    async fn test_fetch_id_list_malformed_is_empty() {
        let transport = ScriptedTransport::new()
            .with_raw(&format!("{BASE}/beststories.json"), "[1, 2, \"three\"");
        let client = ApiClient::new(transport, BASE);
        assert!(client.fetch_id_list("beststories.json").await.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_item_success() {
        let transport = ScriptedTransport::new().with_json(
            &format!("{BASE}/item/42.json"),
            json!({"id": 42, "type": "story", "title": "Hello", "url": "https://example.com"}),
        );
        let client = ApiClient::new(transport, BASE);
        let item = client.fetch_item(42).await.into_option().unwrap();
        assert_eq!(item.id, 42);
        assert_eq!(item.kind, ItemKind::Story);
    }

    /// Client that never routes through a proxy from the environment.
    fn local_client() -> reqwest::Client {
        reqwest::Client::builder().no_proxy().build().unwrap()
    }

    #[tokio::test]
    async fn test_http_transport_maps_statuses() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v0/newstories.json"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v0/beststories.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[1,2]"))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v0/item/7.json"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let client = ApiClient::new(
            HttpTransport::new(local_client()),
            format!("{}/v0", mock_server.uri()),
        );

        assert!(client.fetch_id_list("newstories.json").await.is_empty());
        assert_eq!(
            client.fetch_id_list("beststories.json").await,
            FetchOutcome::Fetched(vec![1, 2])
        );
        assert!(client.fetch_item(7).await.is_empty());

        let err = client
            .transport()
            .get_bytes(&client.list_url("newstories.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::HttpStatus(500)));
    }

    #[tokio::test]
    async fn test_http_transport_connection_failure_is_empty() {
        // Bind then drop to get a port nothing is listening on.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = ApiClient::new(
            HttpTransport::new(local_client()),
            format!("http://{addr}/v0"),
        );
        let err = client
            .transport()
            .get_bytes(&client.item_url(1))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Request(_)));
        assert!(client.fetch_item(1).await.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_item_null_and_missing_are_empty() {
        let transport = ScriptedTransport::new().with_raw(&format!("{BASE}/item/1.json"), "null");
        let client = ApiClient::new(transport, BASE);
        assert!(client.fetch_item(1).await.is_empty());
        assert!(client.fetch_item(2).await.is_empty());
        assert_eq!(client.transport().request_count(), 2);
    }
}
