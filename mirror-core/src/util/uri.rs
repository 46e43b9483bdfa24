use std::path::{Path, PathBuf};

/// Last non-empty `/` segment of a URI or server path.
pub fn uri_last(uri: &str) -> &str {
    uri.trim_end_matches('/').rsplit('/').next().unwrap_or("")
}

/// POSIX dirname of a `/` separated server path. Empty when there is no separator.
pub fn dirname(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) => "/",
        Some(i) => &path[..i],
        None => "",
    }
}

/// Strip `root` and the following separator from `path`.
pub fn relative<'a>(path: &'a str, root: &str) -> Option<&'a str> {
    let root = root.trim_end_matches('/');
    let rest = path.strip_prefix(root)?;
    if root.is_empty() {
        return Some(rest.trim_start_matches('/'));
    }
    let rest = rest.strip_prefix('/')?;
    if rest.is_empty() { None } else { Some(rest) }
}

/// Append a `/` separated relative path onto `base`, one component at a time.
pub fn join_local(base: &Path, rel: &str) -> PathBuf {
    let mut out = base.to_path_buf();
    for part in rel.split('/').filter(|p| !p.is_empty() && *p != ".") {
        out.push(part);
    }
    out
}
