//! Zip bundling of sibling items.

use chrono::Utc;
use tokio::io::AsyncWrite;
use tracing::info;

use super::Download;
use super::utils::{common_parent, home_list, zip_archive_name};
use crate::api::FormData;
use crate::api::decode_envelope;
use crate::api::endpoints::{API_VERSION, STATUS_SIZE_LIMIT, ZIP};
use crate::client::CloudClient;
use crate::error::{CloudError, ErrorKind, Result};
use crate::fs::path::normalize;

impl CloudClient {
    /// Anonymous direct link to a zip archive of `paths`.
    ///
    /// Every path must be non-empty, not the root, and all of them must share
    /// one parent folder. Without `archive_name` the current Unix time is used.
    pub async fn get_direct_link_zip_archive<S: AsRef<str>>(
        &self,
        paths: &[S],
        archive_name: Option<&str>,
    ) -> Result<String> {
        if paths.is_empty() {
            return Err(CloudError::client_arg(
                ErrorKind::PathNotExists,
                "Path list cannot be empty",
                "paths",
            ));
        }
        if paths
            .iter()
            .any(|path| normalize(path.as_ref(), true, false) == "/")
        {
            return Err(CloudError::client_arg(
                ErrorKind::PathNotExists,
                "A path is empty or points to the root folder",
                "paths",
            ));
        }
        self.session().check_authorization().await?;

        let name = zip_archive_name(archive_name, Utc::now().timestamp());
        common_parent(paths)?;

        let api = self.api();
        let mut form = FormData::new();
        form.set("home_list", home_list(paths)?)
            .set("name", &name)
            .set("api", API_VERSION)
            .set("token", api.token_or_empty())
            .set("email", api.email());
        let response = api.post_form(ZIP, &form).await?;
        if response.status == STATUS_SIZE_LIMIT {
            return Err(CloudError::client_arg(
                ErrorKind::DownloadingSizeLimit,
                "Maximum download size is 4GB",
                "paths",
            ));
        }
        if !response.is_success() {
            return Err(CloudError::HttpError(response.status));
        }
        let link: String = decode_envelope(&response.body)?;
        info!("Prepared archive {} of {} items", name, paths.len());
        Ok(link)
    }

    /// Start downloading `paths` as one zip archive.
    ///
    /// The content length is the sum of the item sizes in the shared parent
    /// listing; the real archive size differs.
    pub async fn download_items_as_zip_archive<S: AsRef<str>>(
        &self,
        paths: &[S],
    ) -> Result<Download> {
        let link = self.get_direct_link_zip_archive(paths, None).await?;
        let download = self.open_stream(&link, "paths").await?;
        let estimate = self.estimate_archive_size(paths).await;
        Ok(Download::new(estimate, download.into_stream()))
    }

    /// Download `paths` as one zip archive into `writer`.
    pub async fn download_items_as_zip_archive_to_writer<S, W>(
        &self,
        paths: &[S],
        writer: &mut W,
    ) -> Result<u64>
    where
        S: AsRef<str>,
        W: AsyncWrite + Unpin + ?Sized,
    {
        self.download_items_as_zip_archive(paths)
            .await?
            .write_to(writer)
            .await
    }

    async fn estimate_archive_size<S: AsRef<str>>(&self, paths: &[S]) -> u64 {
        let Ok(parent) = common_parent(paths) else {
            return 0;
        };
        let Ok(Some(listing)) = self.fetch_listing(&parent).await else {
            return 0;
        };
        let wanted: Vec<String> = paths
            .iter()
            .map(|path| {
                let path = normalize(path.as_ref(), true, false);
                match path.strip_suffix('/') {
                    Some(trimmed) if !trimmed.is_empty() => trimmed.to_string(),
                    _ => path,
                }
            })
            .collect();
        listing
            .list
            .unwrap_or_default()
            .iter()
            .filter(|item| wanted.iter().any(|path| *path == item.home))
            .map(|item| item.size.max(0) as u64)
            .sum()
    }
}
