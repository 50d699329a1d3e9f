//! Raw response shapes of the cloud API.

use serde::{Deserialize, Deserializer};

/// Child counters of a folder listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct ItemCount {
    #[serde(default)]
    pub folders: u32,
    #[serde(default)]
    pub files: u32,
}

/// Listing order reported by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ItemSort {
    /// "asc" or "desc"
    #[serde(default)]
    pub order: String,
    /// Sort key, e.g. "name"
    #[serde(rename = "type", default)]
    pub by: String,
}

/// One item of the cloud structure, as returned by the folder listing.
///
/// A listed folder carries its children in `list`; children themselves come
/// back without a nested list.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CloudItem {
    #[serde(default)]
    pub name: String,
    /// Full path of the item
    #[serde(default)]
    pub home: String,
    /// "file" or "folder"
    #[serde(rename = "type", default)]
    pub item_type: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub size: i64,
    /// Public link suffix, empty when unpublished
    #[serde(default)]
    pub weblink: String,
    /// Modification time (Unix seconds), files only
    #[serde(default)]
    pub mtime: i64,
    #[serde(default)]
    pub hash: String,
    #[serde(default)]
    pub count: Option<ItemCount>,
    #[serde(default)]
    pub sort: Option<ItemSort>,
    #[serde(default)]
    pub tree: String,
    #[serde(default)]
    pub rev: i64,
    #[serde(default)]
    pub grev: i64,
    #[serde(default)]
    pub virus_scan: String,
    #[serde(default)]
    pub list: Option<Vec<CloudItem>>,
}

impl CloudItem {
    pub fn is_file(&self) -> bool {
        self.item_type == "file"
    }

    pub fn is_folder(&self) -> bool {
        self.item_type == "folder"
    }
}

/// One revision of a file, as returned by the history endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct HistoryRecord {
    #[serde(rename = "uid", default)]
    pub id: i64,
    #[serde(rename = "rev", default)]
    pub revision: i64,
    #[serde(rename = "path", default)]
    pub full_path: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub hash: String,
    /// Size in bytes
    #[serde(default)]
    pub size: i64,
    /// Unix seconds
    #[serde(default)]
    pub time: i64,
}

/// Billing period of a tariff.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct BillingDuration {
    #[serde(default)]
    pub days_count: u32,
    #[serde(default)]
    pub months_count: u32,
}

/// Price option of a tariff.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CostItem {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub cost: f64,
    #[serde(default)]
    pub special_cost: f64,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub duration: Option<BillingDuration>,
    #[serde(default)]
    pub special_duration: Option<BillingDuration>,
}

/// Tariff as returned by the billing endpoint.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RateRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub available: bool,
    /// Extra storage granted, in bytes
    #[serde(default)]
    pub size: i64,
    #[serde(default)]
    pub cost: Vec<CostItem>,
}

/// Disk space report; values are megabytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct SpaceRecord {
    #[serde(default)]
    pub bytes_total: f64,
    #[serde(default)]
    pub bytes_used: f64,
    #[serde(default)]
    pub overquota: bool,
}

/// `{ "token": .. }` body of the token endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TokenRecord {
    #[serde(default)]
    pub token: String,
}

/// Accept a number or a numeric string.
pub(crate) fn lenient_u64<'de, D>(deserializer: D) -> std::result::Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(u64),
        Text(String),
    }

    Ok(match Option::<NumberOrString>::deserialize(deserializer)? {
        Some(NumberOrString::Number(n)) => Some(n),
        Some(NumberOrString::Text(s)) => s.trim().parse().ok(),
        None => None,
    })
}
