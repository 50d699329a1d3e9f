//! Client configuration.

use std::time::Duration;

/// Base URL of the cloud web API.
pub const DEFAULT_CLOUD_BASE: &str = "https://cloud.mail.ru";
/// Base URL of the login service.
pub const DEFAULT_AUTH_BASE: &str = "https://auth.mail.ru";
/// Every public link starts with this prefix.
pub const DEFAULT_PUBLIC_LINK_PREFIX: &str = "https://cloud.mail.ru/public/";
/// User-Agent sent with every request.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/67.0.3396.87 Safari/537.36";

/// Endpoints and transport options shared by a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloudConfig {
    /// Cloud API host, without trailing slash.
    pub cloud_base: String,
    /// Login host, without trailing slash.
    pub auth_base: String,
    /// Prefix prepended to server-issued weblinks.
    pub public_link_prefix: String,
    /// User-Agent header value.
    pub user_agent: String,
    /// Optional HTTP/SOCKS proxy URL.
    pub proxy: Option<String>,
    /// Per-request timeout. `None` means transfers may run indefinitely.
    pub timeout: Option<Duration>,
    /// Single-file upload ceiling in bytes, applied below the tariff ceiling.
    pub max_upload_size: Option<i64>,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            cloud_base: DEFAULT_CLOUD_BASE.to_string(),
            auth_base: DEFAULT_AUTH_BASE.to_string(),
            public_link_prefix: DEFAULT_PUBLIC_LINK_PREFIX.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            proxy: None,
            timeout: None,
            max_upload_size: None,
        }
    }
}

impl CloudConfig {
    /// Route all requests through a proxy (e.g. "http://proxy:8080" or "socks5://proxy:1080").
    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Abort any request that takes longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Refuse uploads larger than `bytes`, even when the tariff allows more.
    pub fn with_max_upload_size(mut self, bytes: i64) -> Self {
        self.max_upload_size = Some(bytes);
        self
    }

    /// Upload ceiling for an account whose tariff allows `tariff_ceiling` bytes.
    pub(crate) fn upload_ceiling(&self, tariff_ceiling: i64) -> i64 {
        self.max_upload_size
            .map_or(tariff_ceiling, |limit| limit.min(tariff_ceiling))
    }

    /// Point the client at another cloud host. The public-link prefix follows it.
    pub fn with_cloud_base(mut self, base: impl Into<String>) -> Self {
        let base = base.into().trim_end_matches('/').to_string();
        self.public_link_prefix = format!("{base}/public/");
        self.cloud_base = base;
        self
    }

    /// Full URL for a cloud API path.
    pub(crate) fn cloud_url(&self, path: &str) -> String {
        format!("{}{}", self.cloud_base, path)
    }

    /// Full URL for a login service path.
    pub(crate) fn auth_url(&self, path: &str) -> String {
        format!("{}{}", self.auth_base, path)
    }
}
