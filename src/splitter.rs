//! Filespec splitting (spec.md §4.3) and the legality checks from §3's
//! invariants that can be decided without touching the filesystem.

use crate::error::IllegalFilespecReason;
use crate::fs_adapter::FileSystemAdapter;
use crate::path_utils::normalize_separators;
use crate::shortname::resolve_short_names;

/// The result of splitting a filespec into its three parts (spec.md §3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSpecParts {
    pub fixed_dir: String,
    pub wildcard_dir: String,
    pub filename: String,
}

/// Checks the filespec-wide illegality rules that don't depend on how the
/// spec is split: colon position, the `...` substring, and reserved
/// regex-compiler tag sequences. Run before splitting; see `check_split_legality`
/// for the checks that depend on the split result.
pub fn check_basic_legality(spec: &str) -> Result<(), IllegalFilespecReason> {
    if spec.contains("...") {
        return Err(IllegalFilespecReason::TripleDot);
    }
    if spec.contains("<:") && spec.contains(":>") {
        return Err(IllegalFilespecReason::ReservedTagCollision);
    }
    for (i, c) in spec.chars().enumerate() {
        if c == ':' && i != 1 {
            return Err(IllegalFilespecReason::MisplacedColon);
        }
    }
    Ok(())
}

/// Splits `spec` into `(fixedDir, wildcardDir, filename)` per the four
/// cases of spec.md §4.3, resolving `~` segments in the fixed directory via
/// `adapter`, and validating the `..`/`**`-placement invariants from §3.
pub fn split_filespec(
    spec: &str,
    adapter: &dyn FileSystemAdapter,
) -> Result<FileSpecParts, IllegalFilespecReason> {
    check_basic_legality(spec)?;

    let norm = normalize_separators(spec);
    let last_sep = norm.rfind('/');
    let first_wild = norm.find(['*', '?']);

    let (mut fixed_dir, mut wildcard_dir, mut filename) = match (last_sep, first_wild) {
        (None, _) => (String::new(), String::new(), norm.clone()),
        (Some(ls), None) => (norm[..=ls].to_string(), String::new(), norm[ls + 1..].to_string()),
        (Some(ls), Some(fw)) if fw > ls => {
            (norm[..=ls].to_string(), String::new(), norm[ls + 1..].to_string())
        }
        (Some(ls), Some(fw)) => {
            // Wildcard appears before the last separator.
            let before_first_wild = &norm[..fw];
            match before_first_wild.rfind('/') {
                None => (String::new(), norm[..=ls].to_string(), norm[ls + 1..].to_string()),
                Some(sep_before_wild) => (
                    norm[..=sep_before_wild].to_string(),
                    norm[sep_before_wild + 1..=ls].to_string(),
                    norm[ls + 1..].to_string(),
                ),
            }
        }
    };

    // Special case: filename == "**" moves into wildcardDir as "**/" and
    // filename becomes "*.*".
    if filename == "**" {
        wildcard_dir.push_str("**/");
        filename = "*.*".to_string();
    }

    if fixed_dir.contains("..") {
        // fixedDir must never contain `..` per spec.md §3.
        return Err(IllegalFilespecReason::DotDotInWildcardDir);
    }
    if wildcard_dir.contains("..") {
        return Err(IllegalFilespecReason::DotDotInWildcardDir);
    }

    validate_double_star_placement(&wildcard_dir)?;

    if fixed_dir.contains('~') {
        fixed_dir = resolve_short_names(&fixed_dir, adapter)
            .map_err(|_| IllegalFilespecReason::DotDotInWildcardDir)?;
    }

    Ok(FileSpecParts {
        fixed_dir,
        wildcard_dir,
        filename,
    })
}

/// `**` may appear only as an entire path segment (spec.md §3).
fn validate_double_star_placement(wildcard_dir: &str) -> Result<(), IllegalFilespecReason> {
    for segment in wildcard_dir.split('/') {
        if segment.is_empty() {
            continue;
        }
        if segment.contains("**") && segment != "**" {
            return Err(IllegalFilespecReason::DoubleStarNotWholeSegment);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs_adapter::OsFileSystemAdapter;

    fn split(spec: &str) -> FileSpecParts {
        split_filespec(spec, &OsFileSystemAdapter).unwrap()
    }

    #[test]
    fn no_separator_case() {
        let p = split("*.cs");
        assert_eq!(p.fixed_dir, "");
        assert_eq!(p.wildcard_dir, "");
        assert_eq!(p.filename, "*.cs");
    }

    #[test]
    fn no_wildcard_case() {
        let p = split("src/sub/file.cs");
        assert_eq!(p.fixed_dir, "src/sub/");
        assert_eq!(p.wildcard_dir, "");
        assert_eq!(p.filename, "file.cs");
    }

    #[test]
    fn wildcard_before_last_separator_no_separator_before_first_wildcard() {
        let p = split("sr*c/file.cs");
        assert_eq!(p.fixed_dir, "");
        assert_eq!(p.wildcard_dir, "sr*c/");
        assert_eq!(p.filename, "file.cs");
    }

    #[test]
    fn general_case() {
        let p = split("src/**/sub*/file.cs");
        assert_eq!(p.fixed_dir, "src/");
        assert_eq!(p.wildcard_dir, "**/sub*/");
        assert_eq!(p.filename, "file.cs");
    }

    #[test]
    fn trailing_double_star_becomes_directory_wildcard() {
        let p = split("src/**");
        assert_eq!(p.fixed_dir, "src/");
        assert_eq!(p.wildcard_dir, "**/");
        assert_eq!(p.filename, "*.*");
    }

    #[test]
    fn rejects_dotdot_in_wildcard_dir() {
        let err = split_filespec("src/../**/x.cs", &OsFileSystemAdapter);
        assert!(err.is_err());
    }

    #[test]
    fn rejects_double_star_mid_segment() {
        let err = split_filespec("src/foo**bar/x.cs", &OsFileSystemAdapter);
        assert!(err.is_err());
    }

    #[test]
    fn rejects_triple_dot() {
        assert!(check_basic_legality("src/.../x.cs").is_err());
    }

    #[test]
    fn rejects_misplaced_colon() {
        assert!(check_basic_legality(r"a:\b:\c").is_err());
        assert!(check_basic_legality(r"a:\b\c").is_ok());
    }
}
