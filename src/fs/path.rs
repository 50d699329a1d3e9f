//! Cloud path helpers.
//!
//! Cloud paths are `/`-separated and rooted at `/`. Nothing here touches the
//! network; existence checks live on the client (`resolve_existing`).

/// Normalize a cloud path.
///
/// Optionally prepends and appends a `/`, then collapses every run of `/` or `\`
/// into a single `/`. Total and idempotent for any flag combination.
pub fn normalize(path: &str, leading_slash: bool, trailing_slash: bool) -> String {
    let mut joined = String::with_capacity(path.len() + 2);
    if leading_slash {
        joined.push('/');
    }
    joined.push_str(path);
    if trailing_slash {
        joined.push('/');
    }

    let mut result = String::with_capacity(joined.len());
    let mut in_separator = false;
    for ch in joined.chars() {
        if ch == '/' || ch == '\\' {
            if !in_separator {
                result.push('/');
            }
            in_separator = true;
        } else {
            result.push(ch);
            in_separator = false;
        }
    }
    result
}

/// Parent folder of a path, always ending with `/`.
///
/// One trailing slash is ignored; a path without any `/` has the root as parent.
pub fn parent_of(path: &str) -> String {
    let trimmed = path.strip_suffix('/').unwrap_or(path);
    match trimmed.rfind('/') {
        Some(idx) => trimmed[..=idx].to_string(),
        None => "/".to_string(),
    }
}

/// Last element of a path, ignoring trailing slashes.
pub fn base_name(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(idx) => &trimmed[idx + 1..],
        None => trimmed,
    }
}

/// Extension of the last path element, including the dot. Empty if there is none.
pub fn extension(path: &str) -> &str {
    let name = base_name(path);
    match name.rfind('.') {
        Some(idx) => &name[idx..],
        None => "",
    }
}

/// Append `ext` to `name` unless it already ends with it (case-insensitive).
pub fn with_extension(name: &str, ext: &str) -> String {
    if ext.is_empty() || name.to_lowercase().ends_with(&ext.to_lowercase()) {
        name.to_string()
    } else {
        format!("{name}{ext}")
    }
}
