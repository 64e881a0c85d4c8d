//! Blocking (synchronous) API.
//!
//! Wraps the async [`DataClient`](crate::DataClient) with a Tokio runtime so
//! callers don't need to manage their own async runtime.

#[cfg(feature = "blocking")]
mod inner {
    use crate::client::DataClient;
    use crate::error::{DataError, Result};
    use crate::items::Items;
    use crate::models::{Asset, Item, SearchRequest};

    /// Blocking wrapper around [`DataClient`].
    ///
    /// Uses an internal single-threaded Tokio runtime. Must not be used from
    /// inside another async runtime.
    pub struct DataClientBlocking {
        rt: tokio::runtime::Runtime,
        inner: DataClient,
    }

    impl DataClientBlocking {
        /// Wrap an async client.
        pub fn new(inner: DataClient) -> Result<Self> {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .map_err(|e| DataError::Network(e.to_string()))?;
            Ok(Self { rt, inner })
        }

        /// Client configured from `PL_API_KEY` / `PL_API_BASE_URL`.
        pub fn from_env() -> Result<Self> {
            Self::new(DataClient::from_env()?)
        }

        /// Lazy search results; each page is fetched when iteration reaches it.
        pub fn quick_search(&self, search: &SearchRequest) -> ItemsBlocking<'_> {
            ItemsBlocking {
                rt: &self.rt,
                inner: self.inner.quick_search(search),
            }
        }

        /// Search and collect every result (blocking).
        pub fn quick_search_all(&self, search: &SearchRequest) -> Result<Vec<Item>> {
            self.rt.block_on(self.inner.quick_search_all(search))
        }

        /// List the assets of an item (blocking).
        pub fn get_assets(&self, item: &Item) -> Result<Vec<Asset>> {
            self.rt.block_on(self.inner.get_assets(item))
        }

        /// Fetch one asset by type. Not implemented.
        pub fn get_asset(&self, item: &Item, asset_type: &str) -> Result<Asset> {
            self.rt.block_on(self.inner.get_asset(item, asset_type))
        }

        /// Request activation of an asset (blocking).
        pub fn activate(&self, asset: &Asset) -> Result<Vec<Asset>> {
            self.rt.block_on(self.inner.activate(asset))
        }

        /// Download an asset. Not implemented.
        pub fn download(&self, asset: &Asset) -> Result<Vec<u8>> {
            self.rt.block_on(self.inner.download(asset))
        }
    }

    /// Blocking iterator over search results.
    pub struct ItemsBlocking<'a> {
        rt: &'a tokio::runtime::Runtime,
        inner: Items,
    }

    impl Iterator for ItemsBlocking<'_> {
        type Item = Result<Item>;

        fn next(&mut self) -> Option<Self::Item> {
            self.rt.block_on(self.inner.next()).transpose()
        }
    }

}

#[cfg(feature = "blocking")]
pub use inner::*;
