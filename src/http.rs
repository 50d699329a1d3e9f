//! HTTP transport used for every cloud request.
//!
//! The session talks to the network only through the [`Transport`] trait, so the
//! reqwest-backed [`HttpClient`] can be replaced by an in-memory server in tests.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use futures::stream::BoxStream;
use reqwest::Client;
use reqwest::cookie::Jar;

use crate::config::CloudConfig;
use crate::error::{CloudError, Result};

/// Live response body, consumed chunk by chunk.
pub type ByteStream = BoxStream<'static, Result<Bytes>>;

/// Fully buffered HTTP response.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Status code
    pub status: u16,
    /// Response body
    pub body: Bytes,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Check for a 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Response whose body has not been read yet.
pub struct StreamingResponse {
    /// Status code
    pub status: u16,
    /// Declared Content-Length, if the server sent one
    pub content_length: Option<u64>,
    /// Body stream; owned by the caller
    pub body: ByteStream,
}

impl fmt::Debug for StreamingResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamingResponse")
            .field("status", &self.status)
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}

/// Authenticated HTTP pipeline shared by one session.
///
/// Implementations carry the cookie jar; callers must not drive two request
/// pipelines that mutate the jar concurrently unless the implementation
/// synchronizes it.
#[async_trait]
pub trait Transport: Send + Sync {
    /// GET and buffer the body.
    async fn get(&self, url: &str) -> Result<HttpResponse>;

    /// POST an `application/x-www-form-urlencoded` body and buffer the response.
    async fn post_form(&self, url: &str, form: &[(String, String)]) -> Result<HttpResponse>;

    /// PUT raw bytes with a declared Content-Length and buffer the response.
    async fn put(&self, url: &str, body: Bytes) -> Result<HttpResponse>;

    /// GET and return as soon as headers arrive.
    async fn get_stream(&self, url: &str) -> Result<StreamingResponse>;
}

/// reqwest-backed transport with a persistent cookie jar.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    cookies: Arc<Jar>,
}

impl HttpClient {
    /// Create a new HTTP client from the session configuration.
    pub fn new(config: &CloudConfig) -> Result<Self> {
        let cookies = Arc::new(Jar::default());
        let mut builder = Client::builder()
            .cookie_provider(cookies.clone())
            .user_agent(config.user_agent.clone());

        if let Some(proxy) = &config.proxy {
            let proxy = reqwest::Proxy::all(proxy)
                .map_err(|e| CloudError::Custom(format!("Invalid proxy: {}", e)))?;
            builder = builder.proxy(proxy);
        }
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| CloudError::Custom(format!("Failed to build client: {}", e)))?;

        Ok(Self { client, cookies })
    }

    /// Cookie jar shared by every request made through this client.
    pub fn cookies(&self) -> Arc<Jar> {
        self.cookies.clone()
    }

    async fn buffer(response: reqwest::Response) -> Result<HttpResponse> {
        let status = response.status().as_u16();
        let body = response.bytes().await?;
        Ok(HttpResponse { status, body })
    }
}

#[async_trait]
impl Transport for HttpClient {
    async fn get(&self, url: &str) -> Result<HttpResponse> {
        let response = self.client.get(url).send().await?;
        Self::buffer(response).await
    }

    async fn post_form(&self, url: &str, form: &[(String, String)]) -> Result<HttpResponse> {
        let response = self.client.post(url).form(form).send().await?;
        Self::buffer(response).await
    }

    async fn put(&self, url: &str, body: Bytes) -> Result<HttpResponse> {
        let response = self
            .client
            .put(url)
            .header(reqwest::header::CONTENT_LENGTH, body.len())
            .body(body)
            .send()
            .await?;
        Self::buffer(response).await
    }

    async fn get_stream(&self, url: &str) -> Result<StreamingResponse> {
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let content_length = response.content_length();
        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(CloudError::RequestError))
            .boxed();
        Ok(StreamingResponse {
            status,
            content_length,
            body,
        })
    }
}
