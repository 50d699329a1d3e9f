//! # mailrulib
//!
//! Async Rust client library for Mail.ru Cloud.
//!
//! ## Features
//!
//! - **Authentication**: Login with e-mail/password (optionally through a proxy),
//!   authorization probing, disk usage and tariff information.
//! - **Filesystem Operations**:
//!   - Browse folders one level at a time, with a cached listing per folder.
//!   - Create folders, rename, move, copy and remove files and folders.
//!   - File revision history and restore of old revisions.
//! - **File Transfers**:
//!   - Upload from local files, readers or memory (2 GB or 32 GB per file,
//!     depending on the tariff).
//!   - Streamed downloads and zip archives of sibling items.
//!   - Progress callbacks and session-wide cancellation.
//! - **Sharing**: Publish and unpublish items, one-time direct download links.
//!
//! The cloud has no stat endpoint: existence of a path is established by
//! listing its parent, and folder listings are refreshed only when stale.
//!
//! ## Example: Basic Usage
//!
//! ```no_run
//! use mailrulib::CloudClient;
//!
//! # async fn example() -> mailrulib::Result<()> {
//! let client = CloudClient::login("user@mail.ru", "password").await?;
//!
//! // Create a folder and upload a file into it
//! let mut folder = client.create_folder("/backup").await?;
//! let mut file = folder.upload_file("notes.txt").await?;
//!
//! // Share it
//! file.publish().await?;
//! println!("Public link: {}", file.public_link().unwrap_or_default());
//!
//! // List the folder
//! for file in folder.files().await {
//!     println!("{} ({})", file.name(), file.size());
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod cancel;
pub mod client;
pub mod config;
pub mod error;
pub mod fs;
pub mod http;
pub mod progress;
pub mod session;

// Re-export commonly used types
pub use client::{CloudClient, Download};
pub use config::CloudConfig;
pub use error::{CloudError, ErrorKind, Result};
pub use fs::{Entry, File, Folder, History, Size, StorageUnit};
pub use progress::{ProgressCallback, TransferProgress};
pub use session::{DiskUsage, Rate, SessionHandle};
