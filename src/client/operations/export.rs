//! Public links: publish, unpublish and one-time direct links.

use tracing::info;

use super::utils::require;
use crate::api::endpoints::{DOWNLOAD_TOKEN, FILE_PUBLISH, FILE_UNPUBLISH};
use crate::api::{ShardKind, TokenRecord, decode_envelope};
use crate::client::CloudClient;
use crate::error::{CloudError, ErrorKind, Result};
use crate::fs::Entry;
use crate::fs::entry::public_link;
use crate::fs::path::normalize;

/// Statuses the server uses for "no such item" on (un)publish.
fn is_missing_item(status: u16) -> bool {
    matches!(status, 400 | 404 | 422)
}

impl CloudClient {
    /// Publish a file or folder and return it with its public link.
    pub async fn publish(&self, path: &str) -> Result<Entry> {
        require(path, "Path cannot be empty", "path")?;
        self.session().check_authorization().await?;

        let path = normalize(path, true, false);
        let mut entry = self.resolve(&path).await?;

        let mut form = self.api().default_form(Some(&path));
        form.remove("conflict");
        let response = self.api().post_form(FILE_PUBLISH, &form).await?;
        if is_missing_item(response.status) {
            return Err(CloudError::client_arg(
                ErrorKind::PathNotExists,
                "No item exists at the given path",
                "path",
            ));
        }
        if !response.is_success() {
            return Err(CloudError::HttpError(response.status));
        }
        let weblink: String = decode_envelope(&response.body)?;
        entry.core_mut().public_link = public_link(self.public_link_prefix(), &weblink);
        info!("Published {}", path);
        Ok(entry)
    }

    /// Withdraw a public link and return the now unpublished item.
    ///
    /// Accepts the full link or the bare suffix.
    pub async fn unpublish(&self, link: &str) -> Result<Entry> {
        let weblink = link.strip_prefix(self.public_link_prefix()).unwrap_or(link);
        if weblink.is_empty() {
            return Err(CloudError::client_arg(
                ErrorKind::PublicLinkNotExists,
                "Public link cannot be empty",
                "link",
            ));
        }
        self.session().check_authorization().await?;

        let mut form = self.api().default_form(None);
        form.remove("conflict").set("weblink", weblink);
        let response = self.api().post_form(FILE_UNPUBLISH, &form).await?;
        if is_missing_item(response.status) {
            return Err(CloudError::client_arg(
                ErrorKind::PublicLinkNotExists,
                "No item exists for the given public link",
                "link",
            ));
        }
        if !response.is_success() {
            return Err(CloudError::HttpError(response.status));
        }
        let path: String = decode_envelope(&response.body)?;
        info!("Unpublished {}", path);
        self.resolve(&path).await
    }

    /// One-time anonymous direct download link for a published file.
    pub async fn get_file_one_time_direct_link(&self, public_link: &str) -> Result<String> {
        let suffix = public_link
            .strip_prefix(self.public_link_prefix())
            .filter(|suffix| !suffix.is_empty())
            .ok_or_else(|| {
                CloudError::client_arg(
                    ErrorKind::PublicLinkNotExists,
                    "Invalid public link",
                    "public_link",
                )
            })?;
        self.session().check_authorization().await?;

        let mut form = self.api().default_form(None);
        form.remove("conflict");
        let response = self.api().post_form(DOWNLOAD_TOKEN, &form).await?;
        if !response.is_success() {
            return Err(CloudError::HttpError(response.status));
        }
        let token: TokenRecord = decode_envelope(&response.body)?;
        if token.token.is_empty() {
            return Err(CloudError::InvalidResponse);
        }

        let shard = self.api().shard_url(ShardKind::WeblinkGet).await?;
        Ok(format!("{}/{}?key={}", shard, suffix, token.token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_item_statuses() {
        assert!(is_missing_item(400));
        assert!(is_missing_item(404));
        assert!(is_missing_item(422));
        assert!(!is_missing_item(500));
        assert!(!is_missing_item(200));
    }
}
