//! Paths of the cloud and login endpoints, relative to their host.

/// Credential form (login host)
pub const AUTH: &str = "/cgi-bin/auth";
/// SDC cookie bootstrap (login host)
pub const ENSURE_SDC: &str = "/sdc";
/// Redirect target passed to the SDC bootstrap
pub const ENSURE_SDC_FROM: &str = "https://cloud.mail.ru/home";
/// CSRF token used as the API token
pub const CSRF_TOKEN: &str = "/api/v2/tokens/csrf";
/// Disk usage; doubles as the authorization probe
pub const DISK_SPACE: &str = "/api/v2/user/space";
/// Folder listing
pub const FOLDER: &str = "/api/v2/folder";
/// Shard dispatcher
pub const DISPATCHER: &str = "/api/v2/dispatcher";
/// Create a folder entry
pub const FOLDER_ADD: &str = "/api/v2/folder/add";
/// Create a file entry from an uploaded hash
pub const FILE_ADD: &str = "/api/v2/file/add";
/// Zip bundling of sibling items
pub const ZIP: &str = "/api/v2/zip";
pub const FILE_RENAME: &str = "/api/v2/file/rename";
pub const FILE_REMOVE: &str = "/api/v2/file/remove";
pub const FILE_MOVE: &str = "/api/v2/file/move";
pub const FILE_COPY: &str = "/api/v2/file/copy";
pub const FILE_PUBLISH: &str = "/api/v2/file/publish";
pub const FILE_UNPUBLISH: &str = "/api/v2/file/unpublish";
pub const FILE_HISTORY: &str = "/api/v2/file/history";
/// Tariffs of the account
pub const BILLING_RATES: &str = "/api/v2/billing/rates";
/// One-time token for anonymous weblink downloads
pub const DOWNLOAD_TOKEN: &str = "/api/v2/tokens/download";

/// API version sent with every request.
pub const API_VERSION: &str = "2";

/// HTTP status the server uses for "exceeds the download size limit".
pub const STATUS_SIZE_LIMIT: u16 = 422;
