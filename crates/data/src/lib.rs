//! # planet-data
//!
//! Async client for the Planet Data API: structured quick search with lazy
//! pagination, asset listing and asset activation.
//!
//! ```no_run
//! use futures::TryStreamExt;
//! use planet_data::{DataClient, SearchRequest, SortOrder};
//!
//! # async fn run() -> planet_data::Result<()> {
//! let client = DataClient::from_env()?;
//! let filter = serde_json::json!({"type": "AndFilter", "config": []});
//! let search = SearchRequest::new(filter, &["PSScene"])
//!     .sort(SortOrder::AcquiredDesc)
//!     .limit(10);
//!
//! let items: Vec<_> = client.quick_search(&search).into_stream().try_collect().await?;
//! for item in &items {
//!     for asset in client.get_assets(item).await? {
//!         println!("{} {} {:?}", item.id(), asset.asset_type(), asset.status());
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! - `blocking`: synchronous wrappers via a tokio current-thread runtime

pub mod auth;
pub mod client;
pub mod error;
pub mod http;
pub mod items;
pub mod models;
pub mod sync_api;
pub mod translate;
pub mod transport;

pub use client::DataClient;
pub use error::{DataError, Result};
pub use http::{HttpSession, SessionOptions};
pub use items::Items;
pub use models::{Asset, AssetStatus, Item, Page, SearchRequest, SortOrder};
pub use transport::{Request, Response, Transport};

/// Blocking API re-exported as `blocking` module.
#[cfg(feature = "blocking")]
pub mod blocking {
    pub use crate::sync_api::*;
}
