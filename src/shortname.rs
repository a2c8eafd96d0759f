//! Short-name (`~`-segment) resolution (spec.md §4.4).
//!
//! Legacy platform matchers (DOS 8.3 short names) let a directory segment
//! like `PROGRA~1` stand in for `Program Files`. This module replaces each
//! such segment with its canonical long name by probing the filesystem
//! adapter, preserving UNC and drive-letter roots.

use crate::fs_adapter::{EntityType, FileSystemAdapter};

/// Resolves every `~`-containing path segment in `path` to its canonical
/// long name, probing `adapter` for each. Segments with no match are left
/// untouched, along with everything after them (spec.md: "keep the
/// remainder of the path verbatim").
///
/// # Panics
/// Panics if `path` contains a `*` or `?` wildcard: the short-name resolver
/// is only ever called on an already-isolated `fixedDir`, which by
/// construction never contains wildcards. Being called with one is a
/// programmer error (spec.md §7's "Programmer error" taxonomy entry), not a
/// recoverable condition.
pub fn resolve_short_names(path: &str, adapter: &dyn FileSystemAdapter) -> std::io::Result<String> {
    debug_assert!(
        !path.contains('*') && !path.contains('?'),
        "resolve_short_names called with a wildcard-bearing path: {path}"
    );

    if !path.contains('~') {
        return Ok(path.to_string());
    }

    let (root, rest) = split_root(path);
    let mut resolved = root.to_string();
    let mut stop_resolving = false;

    for segment in rest.split('/').filter(|s| !s.is_empty()) {
        if stop_resolving || !segment.contains('~') {
            push_segment(&mut resolved, segment);
            continue;
        }

        let parent = if resolved.is_empty() { "." } else { resolved.trim_end_matches('/') };
        let matches = adapter.list(EntityType::Both, parent, segment)?;
        match matches.as_slice() {
            [single] => push_segment(&mut resolved, single),
            _ => {
                // No unique match: keep this and all following segments verbatim.
                push_segment(&mut resolved, segment);
                stop_resolving = true;
            }
        }
    }

    Ok(resolved)
}

/// Splits off a UNC (`//server/share/`) or drive-letter (`C:/`) root so it
/// survives untouched, returning `(root, rest)`.
fn split_root(path: &str) -> (&str, &str) {
    if path.starts_with("//") {
        // //server/share/...  -- keep the first two components as the root.
        let mut idx = 2;
        let bytes = path.as_bytes();
        let mut seps = 0;
        while idx < bytes.len() && seps < 2 {
            if bytes[idx] == b'/' {
                seps += 1;
            }
            idx += 1;
        }
        return (&path[..idx], &path[idx..]);
    }
    if path.len() >= 2 && path.as_bytes()[1] == b':' {
        let end = if path.len() >= 3 && path.as_bytes()[2] == b'/' { 3 } else { 2 };
        return (&path[..end], &path[end..]);
    }
    ("", path)
}

fn push_segment(acc: &mut String, segment: &str) {
    if !acc.is_empty() && !acc.ends_with('/') {
        acc.push('/');
    }
    acc.push_str(segment);
    acc.push('/');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs_adapter::OsFileSystemAdapter;

    #[test]
    fn no_tilde_is_unchanged() {
        let r = resolve_short_names("src/sub/", &OsFileSystemAdapter).unwrap();
        assert_eq!(r, "src/sub/");
    }

    #[test]
    fn preserves_drive_root() {
        let (root, rest) = split_root("C:/PROGRA~1/sub/");
        assert_eq!(root, "C:/");
        assert_eq!(rest, "PROGRA~1/sub/");
    }

    #[test]
    fn preserves_unc_root() {
        let (root, rest) = split_root("//server/share/PROGRA~1/");
        assert_eq!(root, "//server/share/");
        assert_eq!(rest, "PROGRA~1/");
    }

    #[test]
    #[should_panic]
    fn panics_on_wildcard_input() {
        let _ = resolve_short_names("src/*~1/", &OsFileSystemAdapter);
    }
}
