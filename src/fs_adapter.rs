//! Pluggable filesystem enumeration interface (spec.md §4.2).
//!
//! The walker never touches `std::fs` directly; every listing goes through
//! a `FileSystemAdapter`, the way `rustree`'s CLI layer keeps its `ignore`/
//! `walkdir` usage behind a narrow seam the core can be tested against with
//! a fake. The default adapter here is OS-backed; tests substitute an
//! in-memory fake so the walker's recursion and pruning logic can be
//! exercised without touching disk.

use crate::wildcard::wildcard_match;
use std::path::Path;

/// What kind of directory entries a `list` call should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityType {
    Files,
    Directories,
    Both,
}

/// The enumeration seam the walker is built against.
///
/// Implementations MUST swallow access-denied and missing-directory errors
/// into an empty result (spec.md's `InaccessibleEntry` / `DirectoryMissing`
/// taxonomy); any other I/O error should propagate so the walker's
/// I/O-fault boundary can catch it and fall back per spec.md §4.6.
pub trait FileSystemAdapter {
    /// Lists the names of entries of `entity_type` directly inside `dir`
    /// whose filename matches `pattern` (a `*`/`?` filename pattern, never
    /// containing a separator). Returns `Ok(vec![])` on access-denied or a
    /// missing directory.
    fn list(
        &self,
        entity_type: EntityType,
        dir: &str,
        pattern: &str,
    ) -> std::io::Result<Vec<String>>;

    /// Probes whether `dir` exists and is a directory.
    fn directory_exists(&self, dir: &str) -> bool;
}

/// Default adapter backed by the real filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsFileSystemAdapter;

impl FileSystemAdapter for OsFileSystemAdapter {
    fn list(
        &self,
        entity_type: EntityType,
        dir: &str,
        pattern: &str,
    ) -> std::io::Result<Vec<String>> {
        let dir_for_read = if dir.is_empty() { "." } else { dir };
        let read_dir = match std::fs::read_dir(dir_for_read) {
            Ok(rd) => rd,
            Err(e) if is_access_or_missing(&e) => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let mut names = Vec::new();
        for entry in read_dir {
            let entry = match entry {
                Ok(e) => e,
                Err(e) if is_access_or_missing(&e) => continue,
                Err(e) => return Err(e),
            };
            let file_type = entry.file_type()?;
            let keep = match entity_type {
                EntityType::Files => file_type.is_file(),
                EntityType::Directories => file_type.is_dir(),
                EntityType::Both => true,
            };
            if !keep {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if matches_raw_pattern(&name, pattern) {
                names.push(name);
            }
        }

        // §4.2: re-filter through the wildcard matcher for patterns where
        // the OS's own glob semantics are looser than ours.
        if needs_compatibility_refilter(pattern) {
            names.retain(|n| wildcard_match(n, pattern));
        }

        // Implicit-cwd listings strip a leading "./" unless the caller
        // itself supplied one.
        if dir.is_empty() {
            for n in &mut names {
                if let Some(stripped) = n.strip_prefix("./") {
                    *n = stripped.to_string();
                }
            }
        }

        Ok(names)
    }

    fn directory_exists(&self, dir: &str) -> bool {
        let d = if dir.is_empty() { "." } else { dir };
        Path::new(d).is_dir()
    }
}

fn is_access_or_missing(e: &std::io::Error) -> bool {
    matches!(
        e.kind(),
        std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied
    )
}

/// The OS listing is trusted as a first pass: apply the pattern with our
/// own matcher up front too so fakes/tests and the OS path behave
/// identically regardless of platform glob quirks.
fn matches_raw_pattern(name: &str, pattern: &str) -> bool {
    wildcard_match(name, pattern)
}

/// Platform-compatibility cases from spec.md §4.2 where OS listing may be
/// looser than our matcher and a re-filter is required.
fn needs_compatibility_refilter(pattern: &str) -> bool {
    if pattern.ends_with('?') {
        return true;
    }
    if let Some(dot) = pattern.rfind('.') {
        let ext = &pattern[dot + 1..];
        if ext.ends_with('?') {
            return true;
        }
        if ext.len() == 3 && pattern[..dot].contains('*') {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_compatibility_cases() {
        assert!(needs_compatibility_refilter("file.tx?"));
        assert!(needs_compatibility_refilter("*.htm"));
        assert!(needs_compatibility_refilter("foo?"));
        assert!(!needs_compatibility_refilter("*.html"));
        assert!(!needs_compatibility_refilter("*.cs"));
    }
}
