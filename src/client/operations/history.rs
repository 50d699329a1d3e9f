//! File revision history and restore.

use tracing::info;

use super::dir_ops::EntryKind;
use super::utils::{derive_name, require};
use crate::api::endpoints::{API_VERSION, FILE_HISTORY};
use crate::api::{ConflictPolicy, HistoryRecord, decode_envelope};
use crate::client::CloudClient;
use crate::error::{CloudError, ErrorKind, Result};
use crate::fs::path::{base_name, normalize, parent_of};
use crate::fs::{EntryCore, File, History, history};

impl CloudClient {
    /// Get the revisions of a file, newest first.
    ///
    /// The first element is the current version.
    pub async fn get_file_history(&self, path: &str) -> Result<Vec<History>> {
        require(path, "Path cannot be empty", "path")?;
        self.session().check_authorization().await?;

        let path = normalize(path, true, false);
        let api = self.api();
        let url = api.url(
            FILE_HISTORY,
            &[
                ("home", path.as_str()),
                ("api", API_VERSION),
                ("email", api.email()),
                ("x-email", api.email()),
                ("token", api.token_or_empty()),
            ],
        )?;
        let mut form = api.default_form(Some(&path));
        form.remove("conflict");
        let response = api.post_form_url(&url, &form).await?;
        if response.status == 404 {
            return Err(CloudError::client_arg(
                ErrorKind::PathNotExists,
                "File does not exist at the given path",
                "path",
            ));
        }
        if !response.is_success() {
            return Err(CloudError::HttpError(response.status));
        }
        let records: Vec<HistoryRecord> = decode_envelope(&response.body)?;
        Ok(history::from_records(records))
    }

    /// Materialize an old revision of a file.
    ///
    /// With `rewrite_existing` the revision replaces the file in place;
    /// otherwise it is created next to it as `new_name` (the original name when
    /// empty, with the original extension carried over). Not available to
    /// capacity-limited accounts.
    pub async fn restore_file_from_history(
        &self,
        path: &str,
        revision: i64,
        rewrite_existing: bool,
        new_name: &str,
    ) -> Result<File> {
        if revision <= 0 {
            return Err(CloudError::client_arg(
                ErrorKind::HistoryNotExists,
                "Revision must be greater than 0",
                "revision",
            ));
        }
        if self.session().has_size_limit() {
            return Err(CloudError::client(
                ErrorKind::NotSupportedOperation,
                "Restoring from history is not available for this account; upgrade the tariff",
            ));
        }

        let histories = self.get_file_history(path).await?;
        let revision = histories
            .into_iter()
            .find(|h| h.revision == revision)
            .ok_or_else(|| {
                CloudError::client_arg(
                    ErrorKind::HistoryNotExists,
                    "No history entry with the given revision",
                    "revision",
                )
            })?;

        let path = normalize(path, true, false);
        let name = derive_name(base_name(&path), new_name);
        let target = if rewrite_existing {
            path.clone()
        } else {
            format!("{}{}", parent_of(&path), name)
        };
        let conflict = if rewrite_existing {
            ConflictPolicy::Rewrite
        } else {
            ConflictPolicy::Rename
        };

        let created = self
            .create_entry(
                EntryKind::File,
                &target,
                &revision.hash,
                revision.size.bytes(),
                conflict,
            )
            .await?;
        info!("Restored revision {} of {} as {}", revision.revision, path, created);

        let core = EntryCore {
            name: base_name(&created).to_string(),
            full_path: created,
            size: revision.size,
            ..Default::default()
        };
        Ok(File::new(
            core,
            revision.hash,
            revision.last_modified,
            self.downgrade(),
        ))
    }
}
