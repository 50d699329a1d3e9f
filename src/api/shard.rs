//! Shard discovery.
//!
//! The dispatcher endpoint maps an operation category to the hosts that serve
//! it. The map is fetched on every call: the topology can rotate between
//! requests, so nothing here caches it.

use std::collections::HashMap;

use serde::Deserialize;
use tracing::debug;

use super::client::ApiClient;
use super::endpoints::DISPATCHER;
use super::envelope::decode_envelope;
use super::types::lenient_u64;
use crate::error::{CloudError, Result};

/// Operation categories served by dedicated shards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShardKind {
    Video,
    ViewDirect,
    WeblinkView,
    WeblinkVideo,
    WeblinkGet,
    Stock,
    WeblinkThumbnails,
    Web,
    Auth,
    View,
    Get,
    Upload,
    Thumbnails,
}

impl ShardKind {
    /// Category key used by the dispatcher.
    pub fn as_str(&self) -> &'static str {
        match self {
            ShardKind::Video => "video",
            ShardKind::ViewDirect => "view_direct",
            ShardKind::WeblinkView => "weblink_view",
            ShardKind::WeblinkVideo => "weblink_video",
            ShardKind::WeblinkGet => "weblink_get",
            ShardKind::Stock => "stock",
            ShardKind::WeblinkThumbnails => "weblink_thumbnails",
            ShardKind::Web => "web",
            ShardKind::Auth => "auth",
            ShardKind::View => "view",
            ShardKind::Get => "get",
            ShardKind::Upload => "upload",
            ShardKind::Thumbnails => "thumbnails",
        }
    }
}

/// One endpoint of a category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ShardInfo {
    /// Base URL of the shard
    pub url: String,
    /// Capacity hint reported by the dispatcher
    #[serde(rename = "count", default, deserialize_with = "lenient_u64")]
    pub capacity_hint: Option<u64>,
}

/// Category → ordered endpoints, as returned by the dispatcher.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct ShardMap {
    shards: HashMap<String, Vec<ShardInfo>>,
}

impl ShardMap {
    /// Endpoints of a category, in dispatcher order.
    pub fn endpoints(&self, kind: ShardKind) -> &[ShardInfo] {
        self.shards
            .get(kind.as_str())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Base URL of the first endpoint of a category.
    pub fn url(&self, kind: ShardKind) -> Result<&str> {
        self.endpoints(kind)
            .first()
            .map(|shard| shard.url.as_str())
            .ok_or_else(|| CloudError::ShardNotFound(kind.as_str().to_string()))
    }
}

impl ApiClient {
    /// Fetch the current shard map.
    pub async fn shard_map(&self) -> Result<ShardMap> {
        let url = self.url(DISPATCHER, &[("token", self.token_or_empty())])?;
        let response = self.get(&url).await?;
        if !response.is_success() {
            return Err(CloudError::HttpError(response.status));
        }
        let map: ShardMap = decode_envelope(&response.body)?;
        debug!(categories = map.shards.len(), "shard map fetched");
        Ok(map)
    }

    /// Resolve the base URL serving `kind`.
    pub async fn shard_url(&self, kind: ShardKind) -> Result<String> {
        let map = self.shard_map().await?;
        map.url(kind).map(str::to_string)
    }
}
