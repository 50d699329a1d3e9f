//! Download operations.

use std::fmt;

use bytes::{Bytes, BytesMut};
use futures::StreamExt;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, info};

use super::utils::require;
use crate::api::ShardKind;
use crate::api::client::join_path;
use crate::api::endpoints::STATUS_SIZE_LIMIT;
use crate::client::CloudClient;
use crate::error::{CloudError, ErrorKind, Result};
use crate::http::ByteStream;

/// Upper bound on the buffer reserved up front from a declared length.
const MAX_PREALLOCATION: u64 = 8 * 1024 * 1024;

/// A download whose body has not been read yet.
///
/// The body observes the client's cancellation signal.
pub struct Download {
    content_length: u64,
    body: ByteStream,
}

impl fmt::Debug for Download {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Download")
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}

impl Download {
    pub(crate) fn new(content_length: u64, body: ByteStream) -> Self {
        Self {
            content_length,
            body,
        }
    }

    /// Declared length in bytes; 0 when unknown.
    ///
    /// For zip archives this is an estimate from the item sizes.
    pub fn content_length(&self) -> u64 {
        self.content_length
    }

    pub fn into_stream(self) -> ByteStream {
        self.body
    }

    /// Copy the whole body into `writer` and return the number of bytes written.
    pub async fn write_to<W: AsyncWrite + Unpin + ?Sized>(self, writer: &mut W) -> Result<u64> {
        let mut body = self.body;
        let mut written = 0u64;
        while let Some(chunk) = body.next().await {
            let chunk = chunk?;
            writer.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        writer.flush().await?;
        Ok(written)
    }

    /// Read the whole body into memory.
    ///
    /// The declared length is only a capacity hint; the buffer grows with the body.
    pub async fn bytes(self) -> Result<Bytes> {
        let mut body = self.body;
        let hint = self.content_length.min(MAX_PREALLOCATION);
        let mut buffer = BytesMut::with_capacity(usize::try_from(hint).unwrap_or(0));
        while let Some(chunk) = body.next().await {
            buffer.extend_from_slice(&chunk?);
        }
        Ok(buffer.freeze())
    }
}

impl CloudClient {
    /// Start downloading the file at `path`.
    ///
    /// Returns once response headers arrive; the caller drives the body.
    pub async fn download_file(&self, path: &str) -> Result<Download> {
        require(path, "File path cannot be empty", "path")?;
        let relative = path.trim_start_matches('/');
        self.session().check_authorization().await?;

        let shard = self.api().shard_url(ShardKind::Get).await?;
        let url = join_path(&shard, relative)?;
        let download = self.open_stream(&url, "path").await?;
        info!("Downloading {} ({} bytes)", path, download.content_length());
        Ok(download)
    }

    /// Download the file at `path` into `writer`.
    pub async fn download_file_to_writer<W: AsyncWrite + Unpin + ?Sized>(
        &self,
        path: &str,
        writer: &mut W,
    ) -> Result<u64> {
        self.download_file(path).await?.write_to(writer).await
    }

    /// GET a transfer URL under the cancellation signal.
    pub(crate) async fn open_stream(&self, url: &str, argument: &str) -> Result<Download> {
        let cancel = self.cancel_signal();
        let response = cancel.run(self.api().get_stream(url)).await?;
        debug!("Transfer answered {}", response.status);
        match response.status {
            STATUS_SIZE_LIMIT => Err(CloudError::client_arg(
                ErrorKind::DownloadingSizeLimit,
                "Maximum download size is 4GB",
                argument,
            )),
            404 => Err(CloudError::client_arg(
                ErrorKind::PathNotExists,
                "File does not exist in the cloud",
                argument,
            )),
            status if !(200..300).contains(&status) => Err(CloudError::HttpError(status)),
            _ => Ok(Download::new(
                response.content_length.unwrap_or(0),
                cancel.guard_stream(response.body),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    fn download(chunks: &[&'static [u8]]) -> Download {
        download_with_length(0, chunks)
    }

    fn download_with_length(content_length: u64, chunks: &[&'static [u8]]) -> Download {
        let body = stream::iter(
            chunks
                .iter()
                .map(|chunk| Ok(Bytes::from_static(chunk)))
                .collect::<Vec<_>>(),
        )
        .boxed();
        Download::new(content_length, body)
    }

    #[tokio::test]
    async fn test_write_to_counts_bytes() {
        let mut out = Vec::new();
        let written = download(&[b"hello ", b"world"]).write_to(&mut out).await.unwrap();
        assert_eq!(written, 11);
        assert_eq!(out, b"hello world");
    }

    #[tokio::test]
    async fn test_bytes_collects_body() {
        let body = download(&[b"a", b"b", b"c"]).bytes().await.unwrap();
        assert_eq!(&body[..], b"abc");
    }

    #[tokio::test]
    async fn test_bytes_ignores_oversized_length() {
        let download = download_with_length(u64::MAX / 2, &[b"P", b"K"]);
        assert_eq!(download.content_length(), u64::MAX / 2);
        let body = download.bytes().await.unwrap();
        assert_eq!(&body[..], b"PK");
    }
}
