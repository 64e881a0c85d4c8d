//! Async client for the Data API.
//!
//! Quick search, asset listing and activation. Every operation sends at most
//! one request at a time through the shared [`Transport`] and narrows the
//! vendor error body right where the request was made.

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::{DataError, Result};
use crate::http::HttpSession;
use crate::items::Items;
use crate::models::{Asset, Item, SearchRequest, DATA_PATH};
use crate::transport::{Request, Transport};
use crate::translate;

/// High-level access to the Data API.
///
/// Cloning is cheap; clones share the transport. Independent operations may
/// run concurrently.
#[derive(Clone)]
pub struct DataClient {
    transport: Arc<dyn Transport>,
}

impl DataClient {
    /// Create a client on top of a session.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Create a client with an [`HttpSession`] configured from the environment.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(Arc::new(HttpSession::from_env()?)))
    }

    fn data_url(&self) -> String {
        format!("{}{}", self.transport.base_url(), DATA_PATH)
    }

    // ── Search ──────────────────────────────────────────────────────

    /// Run a structured item search.
    ///
    /// Returns a lazy cursor; nothing is sent until it is first pulled. A
    /// `BadQuery` from any page carries only the first message of the first
    /// field the server complained about.
    pub fn quick_search(&self, search: &SearchRequest) -> Items {
        let request = search.to_request(self.transport.base_url());
        debug!(item_types = ?search.item_types, limit = ?search.limit, "quick search");
        Items::new(self.transport.clone(), request, search.limit)
    }

    /// Run a structured item search and collect every result.
    pub async fn quick_search_all(&self, search: &SearchRequest) -> Result<Vec<Item>> {
        self.quick_search(search).collect_all().await
    }

    // ── Assets ──────────────────────────────────────────────────────

    /// List the assets of an item, in the order the server lists them.
    pub async fn get_assets(&self, item: &Item) -> Result<Vec<Asset>> {
        let url = format!(
            "{}item-types/{}/items/{}",
            self.data_url(),
            item.item_type(),
            item.id()
        );
        let resp = self
            .transport
            .send(Request::get(url))
            .await
            .map_err(translate::narrow_listing_missing)?;

        let records: serde_json::Map<String, serde_json::Value> = resp.json()?;
        records.into_iter().map(|(_, record)| Asset::from_record(record)).collect()
    }

    /// Fetch one asset of an item by type. Not implemented.
    pub async fn get_asset(&self, _item: &Item, _asset_type: &str) -> Result<Asset> {
        Err(DataError::NotImplemented("get_asset"))
    }

    /// Request activation of an asset.
    ///
    /// Returns the asset records in the activation response; an empty
    /// response body yields an empty list.
    pub async fn activate(&self, asset: &Asset) -> Result<Vec<Asset>> {
        let url = asset.activate_url().ok_or_else(|| {
            DataError::MissingResource(format!(
                "asset {} has no activation link",
                asset.asset_type()
            ))
        })?;
        info!(asset_type = asset.asset_type(), "activating asset");

        let resp = self
            .transport
            .send(Request::get(url))
            .await
            .map_err(translate::narrow_activation_missing)?;

        if resp.is_empty() {
            return Ok(Vec::new());
        }
        let records: Vec<serde_json::Value> = resp.json()?;
        records.into_iter().map(Asset::from_record).collect()
    }

    /// Download an active asset. Not implemented.
    pub async fn download(&self, _asset: &Asset) -> Result<Vec<u8>> {
        Err(DataError::NotImplemented("download"))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
