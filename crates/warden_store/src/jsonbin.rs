//! HTTP client for a JSONBin-style document endpoint.

use crate::DocumentStore;
use async_trait::async_trait;
use derive_getters::Getters;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use serde_json::Value as JsonValue;
use std::time::Duration;
use tracing::{debug, instrument, warn};
use warden_core::Entry;
use warden_error::{StoreError, StoreErrorKind, StoreResult};

/// Default bound on a single store request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const MASTER_KEY_HEADER: &str = "X-Master-Key";
const BIN_META_HEADER: &str = "X-Bin-Meta";

/// Longest response body kept in a status error.
const MAX_ERROR_BODY: usize = 256;

/// Client for a single JSON document reachable through `GET`/`PUT`.
///
/// Every request carries `Content-Type: application/json`, the master key and
/// `X-Bin-Meta: false` so the endpoint returns the bare document.
///
/// # Example
///
/// ```no_run
/// use warden_store::{DocumentStore, JsonBinStore, DEFAULT_TIMEOUT};
///
/// # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
/// let store = JsonBinStore::new("https://api.jsonbin.io/v3/b/abc", "key", DEFAULT_TIMEOUT)?;
/// let entries = store.fetch().await?;
/// println!("{} entries", entries.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Getters)]
pub struct JsonBinStore {
    #[getter(skip)]
    client: Client,
    url: String,
    timeout: Duration,
}

impl JsonBinStore {
    /// Create a client for the document at `url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is not a valid header value or the
    /// HTTP client cannot be built.
    #[instrument(skip_all, fields(url = %url.as_ref(), timeout_secs = timeout.as_secs()))]
    pub fn new(
        url: impl AsRef<str>,
        api_key: impl AsRef<str>,
        timeout: Duration,
    ) -> StoreResult<Self> {
        let mut key = HeaderValue::from_str(api_key.as_ref()).map_err(|e| {
            StoreError::new(StoreErrorKind::Transport(format!(
                "API key is not a valid header value: {}",
                e
            )))
        })?;
        key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(MASTER_KEY_HEADER, key);
        headers.insert(BIN_META_HEADER, HeaderValue::from_static("false"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| {
                StoreError::new(StoreErrorKind::Transport(format!(
                    "Failed to build HTTP client: {}",
                    e
                )))
            })?;

        debug!("Created JSONBin store client");

        Ok(Self {
            client,
            url: url.as_ref().to_string(),
            timeout,
        })
    }

    #[track_caller]
    fn request_error(&self, err: reqwest::Error) -> StoreError {
        if err.is_timeout() {
            StoreError::new(StoreErrorKind::Timeout(self.timeout.as_secs()))
        } else {
            StoreError::new(StoreErrorKind::Transport(err.to_string()))
        }
    }

    async fn status_error(response: reqwest::Response) -> StoreError {
        let status = response.status().as_u16();
        let mut body = response.text().await.unwrap_or_default();
        let cut = body
            .char_indices()
            .nth(MAX_ERROR_BODY)
            .map_or(body.len(), |(index, _)| index);
        body.truncate(cut);
        StoreError::new(StoreErrorKind::Status { status, body })
    }

    /// Overwrite the document, reporting why it failed.
    ///
    /// # Errors
    ///
    /// Returns an error on timeout, transport failure or non-success status.
    #[instrument(skip(self, entries), fields(url = %self.url, entry_count = entries.len()))]
    pub async fn try_replace(&self, entries: &[Entry]) -> StoreResult<()> {
        let response = self
            .client
            .put(&self.url)
            .json(entries)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        if !response.status().is_success() {
            return Err(Self::status_error(response).await);
        }

        debug!("Document replaced");
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for JsonBinStore {
    #[instrument(skip(self), fields(url = %self.url))]
    async fn fetch(&self) -> StoreResult<Vec<Entry>> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        if !response.status().is_success() {
            return Err(Self::status_error(response).await);
        }

        let payload: JsonValue = response.json().await.map_err(|e| {
            StoreError::new(StoreErrorKind::Decode(format!("Response is not JSON: {}", e)))
        })?;

        let entries = decode_document(payload)?;
        debug!(entry_count = entries.len(), "Fetched document");
        Ok(entries)
    }

    async fn replace(&self, entries: &[Entry]) -> bool {
        match self.try_replace(entries).await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Failed to replace document");
                false
            }
        }
    }

    fn backend_name(&self) -> &'static str {
        "jsonbin"
    }
}

/// Decode a fetched payload into entries.
///
/// A payload that is not a JSON array is treated as an empty document. An
/// array with elements that are not valid entries is an error, so a damaged
/// document is never silently replaced by a shorter one. The error names the
/// position and uid of the first bad element so it can be fixed in the bin.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use warden_store::decode_document;
///
/// assert!(decode_document(json!({"record": []})).unwrap().is_empty());
/// assert!(decode_document(json!([{"uid": 1}])).is_err());
/// ```
pub fn decode_document(payload: JsonValue) -> StoreResult<Vec<Entry>> {
    let JsonValue::Array(items) = payload else {
        warn!("Store payload is not a list, treating it as empty");
        return Ok(Vec::new());
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let uid = item.get("uid").and_then(JsonValue::as_str).map(str::to_string);
            serde_json::from_value::<Entry>(item).map_err(|e| {
                warn!(index, uid = ?uid, error = %e, "Undecodable entry in store document");
                let position = match uid {
                    Some(uid) => format!("entry {} (uid '{}')", index, uid),
                    None => format!("entry {}", index),
                };
                StoreError::new(StoreErrorKind::Decode(format!("{}: {}", position, e)))
            })
        })
        .collect()
}
