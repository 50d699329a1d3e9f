//! Cloud filesystem model: sizes, paths and entry handles.

pub(crate) mod entry;
mod file;
mod folder;
pub(crate) mod history;
pub mod path;
mod size;
pub mod tree_cache;

pub use entry::{ConfirmedChange, Entry, EntryCore};
pub use file::File;
pub use folder::Folder;
pub use history::History;
pub use size::{Size, StorageUnit};
pub use tree_cache::{CacheCheck, DiskUsagePolicy, StalenessPolicy, TreeCache};
