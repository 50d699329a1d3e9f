//! Cloud API client with request/response handling.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use reqwest::Url;
use tracing::debug;

use super::endpoints::API_VERSION;
use crate::config::CloudConfig;
use crate::error::{CloudError, Result};
use crate::http::{HttpClient, HttpResponse, StreamingResponse, Transport};

/// Conflict policy for entry creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictPolicy {
    /// Server picks a free name on collision
    Rename,
    /// Server overwrites the existing entry
    Rewrite,
}

impl ConflictPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConflictPolicy::Rename => "rename",
            ConflictPolicy::Rewrite => "rewrite",
        }
    }
}

/// Ordered `application/x-www-form-urlencoded` fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    fields: Vec<(String, String)>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, replacing any previous value.
    pub fn set(&mut self, key: &str, value: impl ToString) -> &mut Self {
        let value = value.to_string();
        match self.fields.iter_mut().find(|(k, _)| k == key) {
            Some(field) => field.1 = value,
            None => self.fields.push((key.to_string(), value)),
        }
        self
    }

    pub fn remove(&mut self, key: &str) -> &mut Self {
        self.fields.retain(|(k, _)| k != key);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn as_slice(&self) -> &[(String, String)] {
        &self.fields
    }
}

/// Cloud API client.
///
/// Holds the transport, the endpoint configuration and the account identity.
/// The auth token is attached once login has obtained it.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    config: Arc<CloudConfig>,
    email: String,
    token: Option<String>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("email", &self.email)
            .field("has_token", &self.token.is_some())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a new API client over an existing transport.
    pub fn new(transport: Arc<dyn Transport>, config: Arc<CloudConfig>, email: &str) -> Self {
        Self {
            transport,
            config,
            email: email.to_string(),
            token: None,
        }
    }

    /// Create a new API client backed by reqwest.
    pub fn with_http(config: CloudConfig, email: &str) -> Result<Self> {
        let transport = Arc::new(HttpClient::new(&config)?);
        Ok(Self::new(transport, Arc::new(config), email))
    }

    /// Set the auth token for authenticated requests.
    pub fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    /// Clear the auth token.
    pub fn clear_token(&mut self) {
        self.token = None;
    }

    /// Get the current auth token, if any.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub(crate) fn token_or_empty(&self) -> &str {
        self.token.as_deref().unwrap_or("")
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn config(&self) -> &CloudConfig {
        &self.config
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// Build a cloud API URL with query parameters.
    pub(crate) fn url(&self, path: &str, query: &[(&str, &str)]) -> Result<String> {
        absolute_url(&self.config.cloud_url(path), query)
    }

    /// Form fields every authenticated call carries.
    ///
    /// Includes `conflict=rename`; calls that must not send a conflict policy
    /// remove it.
    pub(crate) fn default_form(&self, home: Option<&str>) -> FormData {
        let mut form = FormData::new();
        form.set("conflict", ConflictPolicy::Rename.as_str())
            .set("api", API_VERSION)
            .set("token", self.token_or_empty())
            .set("email", &self.email)
            .set("x-email", &self.email);
        if let Some(home) = home.filter(|h| !h.is_empty()) {
            form.set("home", home);
        }
        form
    }

    /// GET a URL and buffer the response.
    pub async fn get(&self, url: &str) -> Result<HttpResponse> {
        debug!(endpoint = redact(url), "api GET");
        let response = self.transport.get(url).await?;
        debug!(status = response.status, bytes = response.body.len(), "api response");
        Ok(response)
    }

    /// POST a form to a cloud API path and buffer the response.
    pub async fn post_form(&self, path: &str, form: &FormData) -> Result<HttpResponse> {
        self.post_form_url(&self.config.cloud_url(path), form).await
    }

    /// POST a form to an absolute URL and buffer the response.
    pub async fn post_form_url(&self, url: &str, form: &FormData) -> Result<HttpResponse> {
        debug!(endpoint = redact(url), "api POST");
        let response = self.transport.post_form(url, form.as_slice()).await?;
        debug!(status = response.status, bytes = response.body.len(), "api response");
        Ok(response)
    }

    /// PUT raw content to an absolute URL and buffer the response.
    pub async fn put(&self, url: &str, body: Bytes) -> Result<HttpResponse> {
        debug!(endpoint = redact(url), bytes = body.len(), "api PUT");
        let response = self.transport.put(url, body).await?;
        debug!(status = response.status, bytes = response.body.len(), "api response");
        Ok(response)
    }

    /// GET a URL and return once headers arrive.
    pub async fn get_stream(&self, url: &str) -> Result<StreamingResponse> {
        debug!(endpoint = redact(url), "api GET (stream)");
        self.transport.get_stream(url).await
    }
}

/// Append query parameters to an absolute URL.
pub(crate) fn absolute_url(base: &str, query: &[(&str, &str)]) -> Result<String> {
    let url = if query.is_empty() {
        Url::parse(base)
    } else {
        Url::parse_with_params(base, query)
    }
    .map_err(|e| CloudError::Custom(format!("Invalid URL {}: {}", base, e)))?;
    Ok(url.to_string())
}

/// Append a `/`-separated cloud path to a base URL, percent-encoding each segment.
pub(crate) fn join_path(base: &str, relative: &str) -> Result<String> {
    let mut url =
        Url::parse(base).map_err(|e| CloudError::Custom(format!("Invalid URL {}: {}", base, e)))?;
    url.path_segments_mut()
        .map_err(|_| CloudError::Custom(format!("URL {} cannot take a path", base)))?
        .pop_if_empty()
        .extend(relative.split('/').filter(|segment| !segment.is_empty()));
    Ok(url.to_string())
}

/// Strip the query string so tokens never reach the logs.
fn redact(url: &str) -> &str {
    url.split('?').next().unwrap_or(url)
}
