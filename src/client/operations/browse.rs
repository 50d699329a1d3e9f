//! Folder listing and existence resolution.

use tracing::debug;

use crate::api::endpoints::FOLDER;
use crate::api::{CloudItem, decode_envelope};
use crate::client::CloudClient;
use crate::error::{CloudError, ErrorKind, Result};
use crate::fs::path::{base_name, normalize, parent_of};
use crate::fs::{Entry, File, Folder};

impl CloudClient {
    /// Get a folder with its first level of children.
    ///
    /// Returns `Ok(None)` when the server has no folder at `path`. An empty
    /// path is the root.
    pub async fn get_folder(&self, path: &str) -> Result<Option<Folder>> {
        self.session().check_authorization().await?;
        self.fetch_folder(path).await
    }

    pub(crate) async fn fetch_folder(&self, path: &str) -> Result<Option<Folder>> {
        Ok(self.fetch_listing(path).await?.map(|item| {
            Folder::from_listing(item, self.public_link_prefix(), self.downgrade())
        }))
    }

    /// Raw listing of a folder; `None` on any non-200 answer.
    pub(crate) async fn fetch_listing(&self, path: &str) -> Result<Option<CloudItem>> {
        let path = normalize(path, true, true);
        let api = self.api();
        let url = api.url(FOLDER, &[("token", api.token_or_empty()), ("home", &path)])?;
        let response = api.get(&url).await?;
        if response.status != 200 {
            debug!("No folder at {} (status {})", path, response.status);
            return Ok(None);
        }
        Ok(Some(decode_envelope(&response.body)?))
    }

    /// Find the file or folder at `path`.
    ///
    /// There is no stat endpoint: the parent is listed and its files, then its
    /// folders, are matched by name.
    pub async fn resolve_existing(&self, path: &str) -> Result<Entry> {
        self.session().check_authorization().await?;
        self.resolve(path).await
    }

    pub(crate) async fn resolve(&self, path: &str) -> Result<Entry> {
        let not_found = || {
            CloudError::client_arg(
                ErrorKind::PathNotExists,
                "Source item does not exist in the cloud",
                "path",
            )
        };
        let parent = parent_of(path);
        let name = base_name(path);
        let listing = self.fetch_listing(&parent).await?.ok_or_else(not_found)?;
        let children = listing.list.unwrap_or_default();

        let prefix = self.public_link_prefix();
        let file = children
            .iter()
            .filter(|item| item.is_file())
            .find(|item| item.name == name)
            .map(|item| Entry::File(File::from_item(item, prefix, self.downgrade())));
        if let Some(entry) = file {
            return Ok(entry);
        }
        children
            .iter()
            .filter(|item| item.is_folder())
            .find(|item| item.name == name)
            .map(|item| Entry::Folder(Folder::from_item(item, prefix, self.downgrade())))
            .ok_or_else(not_found)
    }
}
