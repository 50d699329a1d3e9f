//! File handle.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tokio::io::AsyncWrite;
use tracing::debug;

use super::entry::{ConfirmedChange, EntryCore};
use super::history::unix_to_utc;
use super::{History, Size};
use crate::api::CloudItem;
use crate::client::{ClientRef, Download};
use crate::error::Result;

/// A file in the cloud.
#[derive(Debug, Clone)]
pub struct File {
    core: EntryCore,
    hash: String,
    last_modified: DateTime<Utc>,
    client: ClientRef,
}

impl File {
    pub(crate) fn new(
        core: EntryCore,
        hash: String,
        last_modified: DateTime<Utc>,
        client: ClientRef,
    ) -> Self {
        Self {
            core,
            hash,
            last_modified,
            client,
        }
    }

    pub(crate) fn from_item(item: &CloudItem, link_prefix: &str, client: ClientRef) -> Self {
        Self::new(
            EntryCore::from_item(item, link_prefix),
            item.hash.clone(),
            unix_to_utc(item.mtime),
            client,
        )
    }

    pub fn core(&self) -> &EntryCore {
        &self.core
    }

    pub(crate) fn core_mut(&mut self) -> &mut EntryCore {
        &mut self.core
    }

    pub fn name(&self) -> &str {
        &self.core.name
    }

    pub fn full_path(&self) -> &str {
        &self.core.full_path
    }

    pub fn public_link(&self) -> Option<&str> {
        self.core.public_link.as_deref()
    }

    pub fn size(&self) -> Size {
        self.core.size
    }

    /// Server-computed content hash.
    pub fn hash(&self) -> &str {
        &self.hash
    }

    pub fn last_modified(&self) -> DateTime<Utc> {
        self.last_modified
    }

    /// Publish the file; the public link is stored on this handle.
    pub async fn publish(&mut self) -> Result<()> {
        let published = self.client.upgrade()?.publish(&self.core.full_path).await?;
        self.core.public_link = published.core().public_link.clone();
        Ok(())
    }

    /// Withdraw the public link. Does nothing when the file is not published.
    pub async fn unpublish(&mut self) -> Result<()> {
        let Some(link) = self.core.public_link.clone() else {
            return Ok(());
        };
        let unpublished = self.client.upgrade()?.unpublish(&link).await?;
        self.core.public_link = unpublished.core().public_link.clone();
        Ok(())
    }

    pub async fn rename(&mut self, new_name: &str) -> Result<()> {
        let renamed = self
            .client
            .upgrade()?
            .rename(&self.core.full_path, new_name)
            .await?;
        self.core = ConfirmedChange::of(renamed.core()).apply(&self.core);
        Ok(())
    }

    /// Copy into `dest_folder`, returning the new file. This handle is unchanged.
    pub async fn copy(&self, dest_folder: &str) -> Result<File> {
        let copied = self
            .client
            .upgrade()?
            .copy_entry(&self.core.full_path, dest_folder)
            .await?;
        Ok(File::new(
            ConfirmedChange::of(copied.core()).apply(&self.core),
            self.hash.clone(),
            self.last_modified,
            self.client.clone(),
        ))
    }

    /// Move into `dest_folder`; this handle follows the file.
    pub async fn move_to(&mut self, dest_folder: &str) -> Result<()> {
        let moved = self
            .client
            .upgrade()?
            .move_entry(&self.core.full_path, dest_folder)
            .await?;
        self.core = ConfirmedChange::of(moved.core()).apply(&self.core);
        Ok(())
    }

    pub async fn remove(&self) -> Result<()> {
        self.client.upgrade()?.remove(&self.core.full_path).await
    }

    pub async fn history(&self) -> Result<Vec<History>> {
        self.client
            .upgrade()?
            .get_file_history(&self.core.full_path)
            .await
    }

    /// See [`CloudClient::restore_file_from_history`](crate::CloudClient::restore_file_from_history).
    pub async fn restore_from_history(
        &self,
        revision: i64,
        rewrite_existing: bool,
        new_name: &str,
    ) -> Result<File> {
        self.client
            .upgrade()?
            .restore_file_from_history(&self.core.full_path, revision, rewrite_existing, new_name)
            .await
    }

    /// One-time anonymous download link; the file must be published.
    pub async fn one_time_direct_link(&self) -> Result<String> {
        let link = self.core.public_link.as_deref().unwrap_or_default();
        self.client
            .upgrade()?
            .get_file_one_time_direct_link(link)
            .await
    }

    pub async fn download(&self) -> Result<Download> {
        self.client.upgrade()?.download_file(&self.core.full_path).await
    }

    pub async fn download_to_writer<W: AsyncWrite + Unpin + ?Sized>(
        &self,
        writer: &mut W,
    ) -> Result<u64> {
        self.download().await?.write_to(writer).await
    }

    /// Download into `dest_dir`, named `file_name` or the cloud name.
    ///
    /// The body goes to a `.part` file that is renamed once complete.
    pub async fn download_to_file<P: AsRef<Path>>(
        &self,
        dest_dir: P,
        file_name: Option<&str>,
    ) -> Result<PathBuf> {
        let name = file_name.filter(|n| !n.is_empty()).unwrap_or(self.name());
        let target = dest_dir.as_ref().join(name);
        let partial = dest_dir.as_ref().join(format!(".{name}.part"));

        let download = self.download().await?;
        let mut out = tokio::fs::File::create(&partial).await?;
        let written = match download.write_to(&mut out).await {
            Ok(written) => written,
            Err(e) => {
                drop(out);
                let _ = tokio::fs::remove_file(&partial).await;
                return Err(e);
            }
        };
        drop(out);
        tokio::fs::rename(&partial, &target).await?;
        debug!("Wrote {} bytes to {:?}", written, target);
        Ok(target)
    }

    /// Abort every in-flight transfer of the owning client.
    pub fn abort_all_async_tasks(&self) {
        if let Ok(client) = self.client.upgrade() {
            client.abort_all_async_tasks();
        }
    }
}
