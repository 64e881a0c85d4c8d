//! Data API types.
//!
//! Serde models for quick-search pages, items and assets, plus the
//! [`SearchRequest`] builder that turns caller parameters into a quick-search
//! submission.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DataError, Result};
use crate::transport::Request;

/// Path prefix of every Data API endpoint, relative to the session base URL.
pub const DATA_PATH: &str = "data/v1/";

// ---------------------------------------------------------------------------
// Search request
// ---------------------------------------------------------------------------

/// Sort orders accepted by quick search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortOrder {
    AcquiredAsc,
    AcquiredDesc,
    PublishedAsc,
    PublishedDesc,
}

impl SortOrder {
    pub const ALL: [SortOrder; 4] = [
        Self::AcquiredAsc,
        Self::AcquiredDesc,
        Self::PublishedAsc,
        Self::PublishedDesc,
    ];

    /// Wire form, e.g. `"acquired asc"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AcquiredAsc => "acquired asc",
            Self::AcquiredDesc => "acquired desc",
            Self::PublishedAsc => "published asc",
            Self::PublishedDesc => "published desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|order| order.as_str() == s)
            .ok_or_else(|| DataError::InvalidSort(s.to_string()))
    }
}

/// Parameters of a quick search.
///
/// The filter is an opaque predicate tree handed to the server as is. Apart
/// from the sort order (enforced by [`SortOrder`]) nothing is validated
/// locally.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub filter: serde_json::Value,
    pub item_types: Vec<String>,
    pub name: Option<String>,
    /// Results per page. The server default is 250 and the value must be
    /// smaller than that.
    pub page_size: Option<u32>,
    pub sort: Option<SortOrder>,
    /// Strictly remove false positives from the geo intersection.
    pub strict: Option<bool>,
    /// Stop after this many items. `None` walks every page.
    pub limit: Option<usize>,
}

impl SearchRequest {
    /// Search `item_types` with a structured filter.
    pub fn new(filter: serde_json::Value, item_types: &[&str]) -> Self {
        Self {
            filter,
            item_types: item_types.iter().map(|s| s.to_string()).collect(),
            name: None,
            page_size: None,
            sort: None,
            strict: None,
            limit: None,
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn page_size(mut self, n: u32) -> Self {
        self.page_size = Some(n);
        self
    }

    pub fn sort(mut self, order: SortOrder) -> Self {
        self.sort = Some(order);
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = Some(strict);
        self
    }

    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    /// JSON body of the submission.
    pub fn body(&self) -> serde_json::Value {
        serde_json::json!({
            "filter": self.filter,
            "item_types": self.item_types,
        })
    }

    /// Build the `POST quick-search` submission against `base_url`.
    ///
    /// The limit is not sent; it only bounds iteration.
    pub fn to_request(&self, base_url: &str) -> Request {
        let url = format!("{base_url}{DATA_PATH}quick-search");
        let mut req = Request::post(url, self.body());
        if let Some(ref name) = self.name {
            req = req.query("name", name.as_str());
        }
        if let Some(n) = self.page_size {
            req = req.query("_page_size", n.to_string());
        }
        if let Some(order) = self.sort {
            req = req.query("_sort", order.as_str());
        }
        if let Some(strict) = self.strict {
            req = req.query("strict", strict.to_string());
        }
        req
    }
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// One page of quick-search results (GeoJSON FeatureCollection).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Page {
    #[serde(rename = "_links", default)]
    pub links: PageLinks,

    #[serde(default)]
    pub features: Vec<Item>,
}

impl Page {
    /// URL of the following page, if the server sent one.
    pub fn next_link(&self) -> Option<&str> {
        self.links.next.as_deref()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Navigation links of a result page.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PageLinks {
    #[serde(rename = "_self", skip_serializing_if = "Option::is_none")]
    pub self_: Option<String>,

    #[serde(rename = "_first", skip_serializing_if = "Option::is_none")]
    pub first: Option<String>,

    #[serde(rename = "_next", skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

/// One search result: an imagery capture.
///
/// Built from a server record and read-only afterwards.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Item {
    id: String,

    properties: ItemProperties,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    geometry: Option<serde_json::Value>,

    #[serde(rename = "_links", default)]
    links: ItemLinks,

    #[serde(rename = "_permissions", default)]
    permissions: Vec<String>,
}

impl Item {
    /// Decode an item from a raw server record.
    pub fn from_record(record: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(record)?)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Item type, e.g. `"PSScene"`.
    pub fn item_type(&self) -> &str {
        &self.properties.item_type
    }

    pub fn properties(&self) -> &ItemProperties {
        &self.properties
    }

    pub fn geometry(&self) -> Option<&serde_json::Value> {
        self.geometry.as_ref()
    }

    /// URL of the item's asset listing, as linked by the server.
    pub fn assets_url(&self) -> Option<&str> {
        self.links.assets.as_deref()
    }

    pub fn permissions(&self) -> &[String] {
        &self.permissions
    }
}

/// Item metadata.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ItemProperties {
    pub item_type: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub acquired: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cloud_cover: Option<f64>,

    /// All other properties we don't model explicitly.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
struct ItemLinks {
    #[serde(rename = "_self", skip_serializing_if = "Option::is_none")]
    self_: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    assets: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    thumbnail: Option<String>,
}

/// Activation state of an asset.
///
/// Statuses this client doesn't know are kept verbatim in `Unknown`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum AssetStatus {
    Inactive,
    Activating,
    Active,
    Unknown(String),
}

impl AssetStatus {
    /// Wire form, e.g. `"active"`.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Inactive => "inactive",
            Self::Activating => "activating",
            Self::Active => "active",
            Self::Unknown(s) => s.as_str(),
        }
    }
}

impl From<String> for AssetStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "inactive" => Self::Inactive,
            "activating" => Self::Activating,
            "active" => Self::Active,
            _ => Self::Unknown(s),
        }
    }
}

impl From<AssetStatus> for String {
    fn from(status: AssetStatus) -> Self {
        match status {
            AssetStatus::Unknown(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A downloadable product of an item.
///
/// The server changes an asset's status through activation; this client only
/// reads it.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Asset {
    #[serde(rename = "type")]
    asset_type: String,

    status: AssetStatus,

    #[serde(rename = "_links", default)]
    links: AssetLinks,

    #[serde(rename = "_permissions", default)]
    permissions: Vec<String>,

    /// Download URL, present once the asset is active.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    location: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    expires_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    md5_digest: Option<String>,
}

impl Asset {
    /// Decode an asset from a raw server record.
    pub fn from_record(record: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(record)?)
    }

    /// Asset type, e.g. `"ortho_analytic_4b"`.
    pub fn asset_type(&self) -> &str {
        &self.asset_type
    }

    pub fn status(&self) -> &AssetStatus {
        &self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == AssetStatus::Active
    }

    /// Server-supplied activation URL.
    pub fn activate_url(&self) -> Option<&str> {
        self.links.activate.as_deref()
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn expires_at(&self) -> Option<&str> {
        self.expires_at.as_deref()
    }

    pub fn md5_digest(&self) -> Option<&str> {
        self.md5_digest.as_deref()
    }

    pub fn permissions(&self) -> &[String] {
        &self.permissions
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
struct AssetLinks {
    #[serde(rename = "_self", skip_serializing_if = "Option::is_none")]
    self_: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    activate: Option<String>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    type_: Option<String>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
