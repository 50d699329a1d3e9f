//! Shared helpers for cloud operations.

use crate::api::decode_envelope;
use crate::error::{CloudError, ErrorKind, Result};
use crate::fs::Size;
use crate::fs::path::{extension, normalize, parent_of, with_extension};

/// Fail with `PathNotExists` naming `argument` when `value` is empty.
pub(crate) fn require(value: &str, message: &str, argument: &str) -> Result<()> {
    if value.is_empty() {
        return Err(CloudError::client_arg(ErrorKind::PathNotExists, message, argument));
    }
    Ok(())
}

/// Final name for an item derived from `original`.
///
/// An empty `requested` keeps the original name; otherwise the original
/// extension is appended unless `requested` already ends with it.
pub(crate) fn derive_name(original: &str, requested: &str) -> String {
    if requested.is_empty() {
        original.to_string()
    } else {
        with_extension(requested, extension(original))
    }
}

/// The one parent folder all `paths` share.
pub(crate) fn common_parent<S: AsRef<str>>(paths: &[S]) -> Result<String> {
    let mut parents = paths
        .iter()
        .map(|path| parent_of(&normalize(path.as_ref(), true, false)));
    let first = parents.next().unwrap_or_else(|| "/".to_string());
    if parents.any(|parent| parent != first) {
        return Err(CloudError::client_arg(
            ErrorKind::DifferentParentPaths,
            "Items have different parent folders; all of them must share one",
            "paths",
        ));
    }
    Ok(first)
}

/// Archive name with a `.zip` suffix; the Unix time when none is given.
pub(crate) fn zip_archive_name(name: Option<&str>, now_unix: i64) -> String {
    let name = match name.filter(|name| !name.is_empty()) {
        Some(name) => name.to_string(),
        None => now_unix.to_string(),
    };
    with_extension(&name, ".zip")
}

/// JSON array of rooted paths, as the zip endpoint expects.
pub(crate) fn home_list<S: AsRef<str>>(paths: &[S]) -> Result<String> {
    let normalized: Vec<String> = paths
        .iter()
        .map(|path| normalize(path.as_ref(), true, false))
        .collect();
    Ok(serde_json::to_string(&normalized)?)
}

/// Reject content above the upload ceiling.
pub(crate) fn check_upload_size(size: i64, ceiling: i64) -> Result<()> {
    if size > ceiling {
        return Err(CloudError::client_arg(
            ErrorKind::UploadingSizeLimit,
            format!("Maximum upload size is {}", Size::new(ceiling)),
            "content",
        ));
    }
    Ok(())
}

/// Content hash from an upload response.
///
/// The upload shard answers with the bare hash; accept an envelope too.
pub(crate) fn parse_upload_hash(body: &[u8]) -> Result<String> {
    if let Ok(hash) = decode_envelope::<String>(body) {
        if !hash.is_empty() {
            return Ok(hash);
        }
    }
    let text = String::from_utf8_lossy(body).trim().to_string();
    if text.is_empty() {
        return Err(CloudError::InvalidResponse);
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_name() {
        assert_eq!(derive_name("a.txt", ""), "a.txt");
        assert_eq!(derive_name("a.txt", "b"), "b.txt");
        assert_eq!(derive_name("a.txt", "b.TXT"), "b.TXT");
        assert_eq!(derive_name("folder", "other"), "other");
    }

    #[test]
    fn test_common_parent() {
        assert_eq!(common_parent(&["/f/a.txt", "/f/b.txt"]).unwrap(), "/f/");
        let err = common_parent(&["/f/a.txt", "/g/b.txt"]).unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::DifferentParentPaths));
        assert_eq!(err.argument(), Some("paths"));
        assert_eq!(common_parent(&["/f/sub/", "/f/x"]).unwrap(), "/f/");
    }

    #[test]
    fn test_zip_archive_name() {
        assert_eq!(zip_archive_name(None, 1_700_000_000), "1700000000.zip");
        assert_eq!(zip_archive_name(Some(""), 5), "5.zip");
        assert_eq!(zip_archive_name(Some("photos"), 5), "photos.zip");
        assert_eq!(zip_archive_name(Some("photos.ZIP"), 5), "photos.ZIP");
    }

    #[test]
    fn test_home_list_is_json() {
        assert_eq!(
            home_list(&["f/a.txt", "/f//b \"q\".txt"]).unwrap(),
            r#"["/f/a.txt","/f/b \"q\".txt"]"#
        );
    }

    #[test]
    fn test_upload_ceiling_message() {
        let limit = 2048 * 1024 * 1024;
        assert!(check_upload_size(limit, limit).is_ok());
        let err = check_upload_size(limit + 1, limit).unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::UploadingSizeLimit));
        assert_eq!(err.to_string(), "Maximum upload size is 2 GB (argument: content)");
    }

    #[test]
    fn test_parse_upload_hash() {
        assert_eq!(parse_upload_hash(b"ABCDEF0123\r\n").unwrap(), "ABCDEF0123");
        assert_eq!(parse_upload_hash(br#"{"body":"H1"}"#).unwrap(), "H1");
        assert_eq!(parse_upload_hash(br#""H2""#).unwrap(), "H2");
        assert!(parse_upload_hash(b"  ").is_err());
    }
}
