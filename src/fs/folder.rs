//! Folder handle with its cached listing.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, warn};

use super::entry::{ConfirmedChange, EntryCore};
use super::path::{base_name, normalize};
use super::tree_cache::{StalenessPolicy, TreeCache};
use super::{File, Size};
use crate::api::CloudItem;
use crate::client::{ClientRef, CloudClient, Download};
use crate::error::{CloudError, ErrorKind, Result};

/// A folder in the cloud.
///
/// Holds at most one level of children. Sub-folders are listed when they are
/// themselves accessed.
#[derive(Debug, Clone)]
pub struct Folder {
    core: EntryCore,
    cache: TreeCache,
    client: ClientRef,
}

impl Folder {
    /// Folder returned by a listing call, children included.
    pub(crate) fn from_listing(mut item: CloudItem, link_prefix: &str, client: ClientRef) -> Self {
        let children = item.list.take();
        let mut folder = Self {
            core: EntryCore::from_item(&item, link_prefix),
            cache: TreeCache::default(),
            client,
        };
        if let Some(children) = children {
            folder.store_listing(children);
        }
        folder
    }

    /// Child folder seen in a parent listing; not listed yet.
    pub(crate) fn from_item(item: &CloudItem, link_prefix: &str, client: ClientRef) -> Self {
        Self::from_listing(item.clone(), link_prefix, client)
    }

    /// Folder just created at `path`.
    pub(crate) fn created(path: &str, client: ClientRef) -> Self {
        Self {
            core: EntryCore {
                name: base_name(path).to_string(),
                full_path: path.trim_end_matches('/').to_string(),
                ..Default::default()
            },
            cache: TreeCache::default(),
            client,
        }
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

    pub fn files_count(&self) -> u32 {
        self.core.files_count
    }

    pub fn folders_count(&self) -> u32 {
        self.core.folders_count
    }

    /// Raw children of the last listing, without refreshing.
    pub fn cached_items(&self) -> Option<&[CloudItem]> {
        self.cache.items()
    }

    /// Replace the policy that decides when the listing is refetched.
    pub fn with_staleness_policy(mut self, policy: Arc<dyn StalenessPolicy>) -> Self {
        self.cache.set_policy(policy);
        self
    }

    /// Files of this folder, refreshing the listing when it is stale.
    ///
    /// A failed refresh is logged and the previous listing is used.
    pub async fn files(&mut self) -> Vec<File> {
        self.update(false).await;
        let prefix = self.link_prefix();
        self.children(CloudItem::is_file)
            .map(|item| File::from_item(item, &prefix, self.client.clone()))
            .collect()
    }

    /// Sub-folders of this folder, refreshing the listing when it is stale.
    pub async fn folders(&mut self) -> Vec<Folder> {
        self.update(false).await;
        let prefix = self.link_prefix();
        self.children(CloudItem::is_folder)
            .map(|item| Folder::from_item(item, &prefix, self.client.clone()))
            .collect()
    }

    /// Fetch the listing now, reporting failures.
    pub async fn refresh(&mut self) -> Result<()> {
        let client = self.client.upgrade()?;
        let fresh = client.fetch_folder(&self.core.full_path).await?.ok_or_else(|| {
            CloudError::client_arg(
                ErrorKind::PathNotExists,
                "Folder does not exist in the cloud",
                "path",
            )
        })?;
        self.apply_listing(fresh);
        Ok(())
    }

    pub async fn publish(&mut self) -> Result<()> {
        let published = self.client()?.publish(&self.core.full_path).await?;
        self.core.public_link = published.core().public_link.clone();
        Ok(())
    }

    /// Withdraw the public link. Does nothing when the folder is not published.
    pub async fn unpublish(&mut self) -> Result<()> {
        let Some(link) = self.core.public_link.clone() else {
            return Ok(());
        };
        let unpublished = self.client()?.unpublish(&link).await?;
        self.core.public_link = unpublished.core().public_link.clone();
        Ok(())
    }

    pub async fn remove(&mut self) -> Result<()> {
        self.client()?.remove(&self.core.full_path).await?;
        self.update(true).await;
        Ok(())
    }

    pub async fn rename(&mut self, new_name: &str) -> Result<()> {
        let renamed = self.client()?.rename(&self.core.full_path, new_name).await?;
        self.core = ConfirmedChange::of(renamed.core()).apply(&self.core);
        self.update(true).await;
        Ok(())
    }

    /// Copy into `dest_folder`, returning the new folder. This handle is unchanged.
    pub async fn copy(&self, dest_folder: &str) -> Result<Folder> {
        let copied = self
            .client()?
            .copy_entry(&self.core.full_path, dest_folder)
            .await?;
        Ok(Folder {
            core: ConfirmedChange::of(copied.core()).apply(&self.core),
            cache: TreeCache::default(),
            client: self.client.clone(),
        })
    }

    /// Move into `dest_folder`; this handle follows the folder.
    pub async fn move_to(&mut self, dest_folder: &str) -> Result<()> {
        let moved = self
            .client()?
            .move_entry(&self.core.full_path, dest_folder)
            .await?;
        self.core = ConfirmedChange::of(moved.core()).apply(&self.core);
        self.update(true).await;
        Ok(())
    }

    /// Create a direct sub-folder. Nested paths are rejected.
    pub async fn create_folder(&mut self, name: &str) -> Result<Folder> {
        if name.contains('/') {
            return Err(CloudError::client_arg(
                ErrorKind::PathNotExists,
                "Nested folders are not allowed here; use CloudClient::create_folder",
                "name",
            ));
        }
        let created = self
            .client()?
            .create_folder(&format!("{}/{}", self.core.full_path, name))
            .await?;
        self.update(true).await;
        Ok(created)
    }

    /// Upload a local file into this folder under its local name.
    pub async fn upload_file<P: AsRef<Path>>(&mut self, local_path: P) -> Result<File> {
        let uploaded = self
            .client()?
            .upload_file("", local_path, &self.core.full_path)
            .await?;
        self.update(true).await;
        Ok(uploaded)
    }

    pub async fn upload_from_stream<R: AsyncRead + Unpin>(
        &mut self,
        file_name: &str,
        reader: R,
    ) -> Result<File> {
        let uploaded = self
            .client()?
            .upload_from_stream(file_name, reader, &self.core.full_path)
            .await?;
        self.update(true).await;
        Ok(uploaded)
    }

    /// Download children `names` of this folder as `archive_name` into `dest_dir`.
    pub async fn download_items_as_zip<S, P>(
        &self,
        names: &[S],
        archive_name: &str,
        dest_dir: P,
    ) -> Result<PathBuf>
    where
        S: AsRef<str>,
        P: AsRef<Path>,
    {
        let paths: Vec<String> = names
            .iter()
            .map(|name| normalize(&format!("{}/{}", self.core.full_path, name.as_ref()), true, false))
            .collect();
        let target = dest_dir.as_ref().join(archive_name);
        let partial = dest_dir.as_ref().join(format!(".{archive_name}.part"));

        let download = self.client()?.download_items_as_zip_archive(&paths).await?;
        let mut out = tokio::fs::File::create(&partial).await?;
        if let Err(e) = download.write_to(&mut out).await {
            drop(out);
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(e);
        }
        drop(out);
        tokio::fs::rename(&partial, &target).await?;
        Ok(target)
    }

    /// Start downloading this folder as a zip archive.
    pub async fn download_as_zip(&self) -> Result<Download> {
        self.client()?
            .download_items_as_zip_archive(&[self.core.full_path.as_str()])
            .await
    }

    pub async fn download_as_zip_to_writer<W: AsyncWrite + Unpin + ?Sized>(
        &self,
        writer: &mut W,
    ) -> Result<u64> {
        self.download_as_zip().await?.write_to(writer).await
    }

    /// Abort every in-flight transfer of the owning client.
    pub fn abort_all_async_tasks(&self) {
        if let Ok(client) = self.client.upgrade() {
            client.abort_all_async_tasks();
        }
    }

    fn client(&self) -> Result<CloudClient> {
        self.client.upgrade()
    }

    fn link_prefix(&self) -> String {
        self.client
            .upgrade()
            .map(|client| client.public_link_prefix().to_string())
            .unwrap_or_default()
    }

    fn children(&self, pred: fn(&CloudItem) -> bool) -> impl Iterator<Item = &CloudItem> {
        self.cache.items().unwrap_or_default().iter().filter(move |item| pred(item))
    }

    fn store_listing(&mut self, items: Vec<CloudItem>) {
        self.core.files_count = items.iter().filter(|item| item.is_file()).count() as u32;
        self.core.folders_count = items.iter().filter(|item| item.is_folder()).count() as u32;
        self.cache.store(items);
    }

    fn apply_listing(&mut self, fresh: Folder) {
        self.core.size = fresh.core.size;
        self.core.public_link = fresh.core.public_link;
        self.core.files_count = fresh.core.files_count;
        self.core.folders_count = fresh.core.folders_count;
        self.cache.store(fresh.cache.items().map(<[CloudItem]>::to_vec).unwrap_or_default());
    }

    /// Refresh the listing when the staleness policy says so.
    async fn update(&mut self, forced: bool) {
        let Ok(client) = self.client.upgrade() else {
            debug!("Client dropped; keeping cached listing of {}", self.core.full_path);
            return;
        };

        let mut check = self.cache.check(forced);
        let mut probed_usage = None;
        if self.cache.policy().wants_probe(&check) {
            match client.session().disk_usage().await {
                Ok(usage) => {
                    let used = usage.used.bytes();
                    check.usage_changed = Some(self.cache.usage_changed(used));
                    probed_usage = Some(used);
                }
                Err(e) => warn!("Disk usage probe failed: {}", e),
            }
        }

        if self.cache.policy().is_stale(&check) {
            match client.fetch_folder(&self.core.full_path).await {
                Ok(Some(fresh)) => self.apply_listing(fresh),
                Ok(None) => warn!("Folder {} is gone; keeping cached listing", self.core.full_path),
                Err(e) => warn!("Refreshing {} failed: {}", self.core.full_path, e),
            }
        }

        if let Some(used) = probed_usage {
            self.cache.record_usage(used);
        }
    }
}
