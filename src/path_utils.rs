//! Separator normalization and path comparison helpers shared by the rest of
//! the engine. Kept small and dependency-free, the way `rustree`'s own
//! `core::util` keeps filesystem-adjacent string helpers out of the bigger
//! modules that use them.

/// Normalizes `\` to `/` so the rest of the engine can reason about a single
/// separator character. Both separators are accepted as equivalent on every
/// platform per spec.md §3 ("forward or backward slashes as separators,
/// equivalent").
pub fn normalize_separators(path: &str) -> String {
    path.replace('\\', "/")
}

/// True iff `a` and `b` denote the same path once separators are normalized
/// and a single trailing separator is ignored. Does not touch case; callers
/// that need case-insensitive comparison lowercase first.
pub fn paths_equal(a: &str, b: &str) -> bool {
    trim_trailing_slash(&normalize_separators(a)) == trim_trailing_slash(&normalize_separators(b))
}

/// Removes exactly one trailing `/` (after normalization), if present.
/// `"a/b/"` becomes `"a/b"`; `"a/b"` and `"/"` are returned unchanged (the
/// latter because trimming it would make it empty, changing its meaning).
pub fn trim_trailing_slash(path: &str) -> &str {
    if path.len() > 1 {
        path.strip_suffix('/').unwrap_or(path)
    } else {
        path
    }
}

/// Strips a leading `project_directory` prefix from `path`, honoring
/// whether the prefix itself already ends in a separator (spec.md §6).
/// Returns `path` unchanged if it is not actually rooted under `project_directory`.
pub fn strip_project_directory<'a>(path: &'a str, project_directory: &str) -> &'a str {
    if project_directory.is_empty() {
        return path;
    }
    let norm_path = normalize_separators(path);
    let mut norm_dir = normalize_separators(project_directory);
    if !norm_dir.ends_with('/') {
        norm_dir.push('/');
    }
    if norm_path.starts_with(&norm_dir) {
        &path[norm_dir.len()..]
    } else {
        path
    }
}

/// True iff `path` begins with a UNC prefix (`//server/share` after
/// normalization).
pub fn is_unc(path: &str) -> bool {
    let n = normalize_separators(path);
    n.starts_with("//") && !n.starts_with("///")
}

/// True iff `path` begins with a Windows drive letter root, e.g. `C:/`.
pub fn is_drive_root(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

/// True iff `path` is already rooted: starts with `/`, is a UNC path, or has
/// a drive-letter root. A rooted `fixedDir` is never joined to a
/// `projectDirectory` (spec.md §6).
pub fn is_rooted(path: &str) -> bool {
    path.starts_with('/') || is_unc(path) || is_drive_root(path)
}

/// Joins a (non-rooted) `fixed_dir` under `project_directory`, the way
/// `get_files` resolves a relative `fixedDir` before walking (spec.md §6).
/// Leaves `fixed_dir` unchanged if it is already rooted.
pub fn resolve_under_project_directory(fixed_dir: &str, project_directory: Option<&str>) -> String {
    match project_directory {
        Some(proj) if !is_rooted(fixed_dir) => {
            if fixed_dir.is_empty() {
                format!("{}/", proj.trim_end_matches('/'))
            } else {
                format!("{}/{}", proj.trim_end_matches('/'), fixed_dir)
            }
        }
        _ => fixed_dir.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_backslashes() {
        assert_eq!(normalize_separators(r"a\b\c"), "a/b/c");
    }

    #[test]
    fn slash_equivalence() {
        assert!(paths_equal(r"a\b\c", "a/b/c"));
        assert!(paths_equal("a/b/", "a/b"));
    }

    #[test]
    fn trims_single_trailing_slash() {
        assert_eq!(trim_trailing_slash("a/b/"), "a/b");
        assert_eq!(trim_trailing_slash("/"), "/");
        assert_eq!(trim_trailing_slash("a/b"), "a/b");
    }

    #[test]
    fn strips_project_directory_prefix() {
        assert_eq!(strip_project_directory("proj/src/a.rs", "proj"), "src/a.rs");
        assert_eq!(strip_project_directory("proj/src/a.rs", "proj/"), "src/a.rs");
        assert_eq!(strip_project_directory("other/a.rs", "proj"), "other/a.rs");
    }

    #[test]
    fn recognizes_unc_and_drive_roots() {
        assert!(is_unc(r"\\server\share\dir"));
        assert!(!is_unc("/a/b"));
        assert!(is_drive_root("C:/a"));
        assert!(!is_drive_root("/a"));
    }
}
