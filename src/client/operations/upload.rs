//! Upload operations.

use std::path::Path;

use bytes::Bytes;
use chrono::Utc;
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::info;

use super::dir_ops::EntryKind;
use super::utils::{check_upload_size, derive_name, parse_upload_hash, require};
use crate::api::client::absolute_url;
use crate::api::{ConflictPolicy, ShardKind};
use crate::client::CloudClient;
use crate::error::{CloudError, ErrorKind, Result};
use crate::fs::path::{base_name, normalize};
use crate::fs::{EntryCore, File, Size};
use crate::progress::TransferProgress;
use crate::session::upload_ceiling;

impl CloudClient {
    /// Upload a local file into `dest_folder`.
    ///
    /// An empty `dest_name` keeps the local file name; a given name gets the
    /// local extension appended when it lacks it.
    ///
    /// # Example
    /// ```no_run
    /// # async fn example(client: mailrulib::CloudClient) -> mailrulib::Result<()> {
    /// let file = client.upload_file("", "report.pdf", "/Documents").await?;
    /// println!("Uploaded {} ({})", file.full_path(), file.size());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn upload_file<P: AsRef<Path>>(
        &self,
        dest_name: &str,
        local_path: P,
        dest_folder: &str,
    ) -> Result<File> {
        let local_path = local_path.as_ref();
        let local_name = local_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        require(&local_name, "Source file path cannot be empty", "local_path")?;

        let name = derive_name(&local_name, dest_name);
        let file = tokio::fs::File::open(local_path).await?;
        self.upload_from_stream(&name, file, dest_folder).await
    }

    /// Upload everything `reader` yields as `dest_name` into `dest_folder`.
    ///
    /// The content is buffered first: the transfer needs its length up front.
    pub async fn upload_from_stream<R: AsyncRead + Unpin>(
        &self,
        dest_name: &str,
        mut reader: R,
        dest_folder: &str,
    ) -> Result<File> {
        require(dest_name, "File name cannot be empty", "dest_name")?;
        let mut content = Vec::new();
        reader.read_to_end(&mut content).await?;
        self.upload_bytes(dest_name, Bytes::from(content), dest_folder)
            .await
    }

    /// Upload in-memory content as `dest_name` into `dest_folder`.
    pub async fn upload_bytes(
        &self,
        dest_name: &str,
        content: Bytes,
        dest_folder: &str,
    ) -> Result<File> {
        require(dest_name, "File name cannot be empty", "dest_name")?;
        if content.is_empty() {
            return Err(CloudError::client_arg(
                ErrorKind::PathNotExists,
                "Content cannot be empty",
                "content",
            ));
        }
        require(dest_folder, "Destination folder cannot be empty", "dest_folder")?;
        self.session().check_authorization().await?;

        let dest_folder = normalize(dest_folder, true, true);
        if self.fetch_listing(&dest_folder).await?.is_none() {
            return Err(CloudError::client_arg(
                ErrorKind::PathNotExists,
                "Destination folder does not exist",
                "dest_folder",
            ));
        }

        let size = content.len() as i64;
        let tariff_ceiling = upload_ceiling(self.session().activated_tariffs());
        check_upload_size(size, self.session().config().upload_ceiling(tariff_ceiling))?;

        let shard = self.api().shard_url(ShardKind::Upload).await?;
        let url = absolute_url(
            &shard,
            &[("cloud_domain", "2"), ("x-email", self.api().email())],
        )?;

        self.report_progress(&TransferProgress::new(0, size, dest_name));
        let response = self
            .cancel_signal()
            .run(self.api().put(&url, content))
            .await?;
        if !response.is_success() {
            return Err(CloudError::HttpError(response.status));
        }
        let hash = parse_upload_hash(&response.body)?;

        let created = self
            .create_entry(
                EntryKind::File,
                &format!("{dest_folder}{dest_name}"),
                &hash,
                size,
                ConflictPolicy::Rename,
            )
            .await?;
        self.report_progress(&TransferProgress::new(size, size, dest_name));
        info!("Uploaded {} ({} bytes)", created, size);

        let core = EntryCore {
            name: base_name(&created).to_string(),
            full_path: created,
            size: Size::new(size),
            ..Default::default()
        };
        Ok(File::new(core, hash, Utc::now(), self.downgrade()))
    }
}
