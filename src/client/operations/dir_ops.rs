//! Entry creation and mutation: mkdir, add, remove, rename, move and copy.

use tracing::{debug, info};

use super::utils::{derive_name, require};
use crate::api::endpoints::{
    FILE_ADD, FILE_COPY, FILE_MOVE, FILE_REMOVE, FILE_RENAME, FOLDER_ADD,
};
use crate::api::{ConflictPolicy, FormData, decode_envelope};
use crate::client::CloudClient;
use crate::error::{CloudError, ErrorKind, Result};
use crate::fs::path::normalize;
use crate::fs::{ConfirmedChange, Entry, Folder};

/// What an add request creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EntryKind {
    File,
    Folder,
}

impl CloudClient {
    /// Create a folder, including any missing parents.
    ///
    /// On a name collision the server picks a free name; the returned folder
    /// carries the name it actually got.
    pub async fn create_folder(&self, path: &str) -> Result<Folder> {
        require(path, "Path cannot be empty", "path")?;
        self.session().check_authorization().await?;

        let path = normalize(path, true, true);
        let created = self
            .create_entry(EntryKind::Folder, &path, "", 0, ConflictPolicy::Rename)
            .await?;
        info!("Created folder {}", created);
        Ok(Folder::created(&created, self.downgrade()))
    }

    /// Add a file or folder entry and return the path the server assigned.
    ///
    /// File entries carry the content hash and size so no bytes are sent.
    pub(crate) async fn create_entry(
        &self,
        kind: EntryKind,
        path: &str,
        hash: &str,
        size: i64,
        conflict: ConflictPolicy,
    ) -> Result<String> {
        let mut form = self.api().default_form(Some(path));
        form.set("conflict", conflict.as_str());
        if kind == EntryKind::File && !hash.is_empty() && size != 0 {
            form.set("hash", hash).set("size", size);
        }
        let endpoint = match kind {
            EntryKind::File => FILE_ADD,
            EntryKind::Folder => FOLDER_ADD,
        };
        self.post_for_path(endpoint, &form).await
    }

    /// Remove a file or folder.
    ///
    /// Removing a path that does not exist is not reported as an error.
    pub async fn remove(&self, path: &str) -> Result<()> {
        require(path, "Path cannot be empty", "path")?;
        self.session().check_authorization().await?;

        let path = normalize(path, true, false);
        let form = self.api().default_form(Some(&path));
        let response = self.api().post_form(FILE_REMOVE, &form).await?;
        debug!("Remove {} answered {}", path, response.status);
        info!("Removed {}", path);
        Ok(())
    }

    /// Rename a file or folder.
    ///
    /// A missing extension of the current name is carried over to `new_name`.
    pub async fn rename(&self, path: &str, new_name: &str) -> Result<Entry> {
        require(path, "Path cannot be empty", "path")?;
        require(new_name, "Name cannot be empty", "name")?;
        self.session().check_authorization().await?;

        let path = normalize(path, true, false);
        let mut entry = self.resolve(&path).await?;
        let name = derive_name(entry.name(), new_name);

        let mut form = self.api().default_form(Some(&path));
        form.set("name", &name);
        let new_path = self.post_for_path(FILE_RENAME, &form).await?;
        info!("Renamed {} to {}", path, new_path);

        apply_relocation(&mut entry, &new_path);
        Ok(entry)
    }

    /// Copy a file or folder into `dest_folder`.
    pub async fn copy_entry(&self, path: &str, dest_folder: &str) -> Result<Entry> {
        self.move_or_copy(path, dest_folder, false).await
    }

    /// Move a file or folder into `dest_folder`.
    pub async fn move_entry(&self, path: &str, dest_folder: &str) -> Result<Entry> {
        self.move_or_copy(path, dest_folder, true).await
    }

    async fn move_or_copy(&self, path: &str, dest_folder: &str, is_move: bool) -> Result<Entry> {
        require(path, "Path cannot be empty", "path")?;
        require(dest_folder, "Destination folder cannot be empty", "dest_folder")?;
        self.session().check_authorization().await?;

        let path = normalize(path, true, false);
        let dest_folder = normalize(dest_folder, true, false);
        let mut entry = self.resolve(&path).await?;
        if self.fetch_listing(&dest_folder).await?.is_none() {
            return Err(CloudError::client_arg(
                ErrorKind::PathNotExists,
                "Destination folder does not exist in the cloud",
                "dest_folder",
            ));
        }

        let mut form = self.api().default_form(Some(&path));
        form.set("folder", &dest_folder);
        let (endpoint, verb) = if is_move {
            (FILE_MOVE, "Moved")
        } else {
            (FILE_COPY, "Copied")
        };
        let new_path = self.post_for_path(endpoint, &form).await?;
        info!("{} {} to {}", verb, path, new_path);

        apply_relocation(&mut entry, &new_path);
        Ok(entry)
    }

    /// POST a form whose answer is the resulting path.
    pub(crate) async fn post_for_path(&self, endpoint: &str, form: &FormData) -> Result<String> {
        let response = self.api().post_form(endpoint, form).await?;
        if !response.is_success() {
            return Err(CloudError::HttpError(response.status));
        }
        decode_envelope(&response.body)
    }
}

fn apply_relocation(entry: &mut Entry, new_path: &str) {
    let core = entry.core_mut();
    *core = ConfirmedChange::relocated(new_path).apply(core);
}
