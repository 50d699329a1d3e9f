//! Fields shared by files and folders.

use super::path::base_name;
use super::{File, Folder, Size};
use crate::api::CloudItem;

/// Attributes common to every cloud item.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryCore {
    pub name: String,
    pub full_path: String,
    /// Always starts with the public-link prefix when present
    pub public_link: Option<String>,
    pub size: Size,
    pub files_count: u32,
    pub folders_count: u32,
}

impl EntryCore {
    pub(crate) fn from_item(item: &CloudItem, link_prefix: &str) -> Self {
        let count = item.count.unwrap_or_default();
        Self {
            name: item.name.clone(),
            full_path: item.home.clone(),
            public_link: public_link(link_prefix, &item.weblink),
            size: Size::new(item.size),
            files_count: count.files,
            folders_count: count.folders,
        }
    }

    pub fn is_published(&self) -> bool {
        self.public_link.is_some()
    }
}

/// Attach the public-link prefix to a server weblink suffix.
pub(crate) fn public_link(prefix: &str, weblink: &str) -> Option<String> {
    (!weblink.is_empty()).then(|| format!("{prefix}{weblink}"))
}

/// Identity fields the server confirmed after a rename, move or (un)publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmedChange {
    pub full_path: String,
    pub name: String,
    pub public_link: Option<String>,
}

impl ConfirmedChange {
    /// The item now lives at `new_path`; any public link is gone.
    pub fn relocated(new_path: &str) -> Self {
        Self {
            full_path: new_path.to_string(),
            name: base_name(new_path).to_string(),
            public_link: None,
        }
    }

    /// Identity fields of a server-confirmed entry.
    pub fn of(core: &EntryCore) -> Self {
        Self {
            full_path: core.full_path.clone(),
            name: core.name.clone(),
            public_link: core.public_link.clone(),
        }
    }

    /// New core: identity from the change, everything else from `old`.
    pub fn apply(&self, old: &EntryCore) -> EntryCore {
        EntryCore {
            name: self.name.clone(),
            full_path: self.full_path.clone(),
            public_link: self.public_link.clone(),
            ..old.clone()
        }
    }
}

/// A file or a folder.
#[derive(Debug, Clone)]
pub enum Entry {
    File(File),
    Folder(Folder),
}

impl Entry {
    pub fn core(&self) -> &EntryCore {
        match self {
            Entry::File(file) => file.core(),
            Entry::Folder(folder) => folder.core(),
        }
    }

    pub(crate) fn core_mut(&mut self) -> &mut EntryCore {
        match self {
            Entry::File(file) => file.core_mut(),
            Entry::Folder(folder) => folder.core_mut(),
        }
    }

    pub fn name(&self) -> &str {
        &self.core().name
    }

    pub fn full_path(&self) -> &str {
        &self.core().full_path
    }

    pub fn public_link(&self) -> Option<&str> {
        self.core().public_link.as_deref()
    }

    pub fn is_file(&self) -> bool {
        matches!(self, Entry::File(_))
    }

    pub fn into_file(self) -> Option<File> {
        match self {
            Entry::File(file) => Some(file),
            Entry::Folder(_) => None,
        }
    }

    pub fn into_folder(self) -> Option<Folder> {
        match self {
            Entry::Folder(folder) => Some(folder),
            Entry::File(_) => None,
        }
    }
}
