//! `globtree` is a library for matching and enumerating filesystem paths
//! against glob filespecs (`*`, `?`, and recursive `**` segments), with
//! exclude-filespec support and a process-wide result cache.
//!
//! It is the file-selection primitive a project-oriented build system would
//! use when evaluating item specifications: given an include filespec and a
//! set of exclude filespecs, it returns the set of paths that match the
//! include and none of the excludes.
//!
//! # Key features
//!
//! - Filespec parsing and splitting into `fixedDir` / `wildcardDir` / `filename`.
//! - A standalone `*`/`?` wildcard matcher for bare filenames.
//! - A regex compiler that models legacy normalization rules (`**` collapse,
//!   trailing-dot files, UNC prefixes) for recursive patterns.
//! - A recursive walker that prunes subtrees dominated by exclude filespecs.
//! - A pluggable [`FileSystemAdapter`] so callers can substitute a fake for
//!   testing or a non-OS-backed source.
//! - A process-wide, per-key-locked result cache, toggled by the
//!   `GLOBTREE_CACHE_ENUMERATIONS` environment variable.
//!
//! # Example
//!
//! ```no_run
//! use globtree::get_files;
//!
//! let matches = get_files(None, "src/**/*.rs", &[]);
//! for path in matches {
//!     println!("{path}");
//! }
//! ```
//!
//! # Non-goals
//!
//! This crate does not expand project variables (`$(...)`, `@(...)`) —
//! callers pre-expand them — does not filter on file content, does not
//! guarantee result ordering, and does not follow symlinks specially.

pub mod cache;
pub mod config;
pub mod error;
pub mod exclude;
pub mod fs_adapter;
pub mod path_utils;
pub mod regex_compiler;
pub mod shortname;
pub mod splitter;
pub mod walker;
pub mod wildcard;

pub use error::{GlobError, IllegalFilespecReason};
pub use fs_adapter::{EntityType, FileSystemAdapter, OsFileSystemAdapter};
pub use splitter::FileSpecParts;

use regex_compiler::SearchData;
use walker::{SearchState, WalkSpec};

/// Full legality/compile diagnostics for a filespec (spec.md §6's
/// `GetFileSpecInfo`). Computable without consulting the filesystem except
/// for short-name resolution on `fixed_dir` (spec.md §8's "legality is
/// decidable before I/O").
#[derive(Debug, Clone)]
pub struct FileSpecInfo {
    pub is_legal_file_spec: bool,
    pub fixed_dir: String,
    pub wildcard_dir: String,
    pub filename: String,
    pub regex_string: Option<String>,
    pub needs_recursion: bool,
}

/// The result of matching a single candidate path against a filespec
/// (spec.md §3's "Match result").
#[derive(Debug, Clone)]
pub struct MatchResult {
    pub is_legal_file_spec: bool,
    pub is_match: bool,
    pub is_file_spec_recursive: bool,
    pub fixed_directory_part: String,
    pub wildcard_directory_part: String,
    pub filename_part: String,
}

/// True iff `spec` contains a `*` or `?` wildcard (spec.md §6).
pub fn has_wildcards(spec: &str) -> bool {
    spec.contains('*') || spec.contains('?')
}

/// True iff `spec` contains a `*`, `?`, `;`, `$(`, or `@(` — the superset a
/// caller uses to decide whether a string needs any of glob expansion,
/// semicolon-list splitting, or item/property reference expansion before
/// being handed to this engine (spec.md §6).
pub fn has_wildcards_semicolon_item_or_property_references(spec: &str) -> bool {
    has_wildcards(spec) || spec.contains(';') || spec.contains("$(") || spec.contains("@(")
}

/// Splits and compiles `spec`, reporting its legality and compiled parts
/// without walking the filesystem (spec.md §6's `GetFileSpecInfo`).
pub fn get_file_spec_info(spec: &str) -> FileSpecInfo {
    let adapter = OsFileSystemAdapter;
    match splitter::split_filespec(spec, &adapter) {
        Err(_) => FileSpecInfo {
            is_legal_file_spec: false,
            fixed_dir: String::new(),
            wildcard_dir: String::new(),
            filename: spec.to_string(),
            regex_string: None,
            needs_recursion: false,
        },
        Ok(parts) => match regex_compiler::compile(&parts) {
            Err(_) => FileSpecInfo {
                is_legal_file_spec: false,
                fixed_dir: parts.fixed_dir,
                wildcard_dir: parts.wildcard_dir,
                filename: parts.filename,
                regex_string: None,
                needs_recursion: false,
            },
            Ok(data) => {
                let needs_recursion = data.needs_recursion();
                let regex_string = match &data {
                    SearchData::Regex { regex, .. } => Some(regex.as_str().to_string()),
                    SearchData::FilenamePattern { .. } => None,
                };
                FileSpecInfo {
                    is_legal_file_spec: true,
                    fixed_dir: parts.fixed_dir,
                    wildcard_dir: parts.wildcard_dir,
                    filename: parts.filename,
                    regex_string,
                    needs_recursion,
                }
            }
        },
    }
}

/// Compiles `spec` and matches it against `candidate_path`, short-name
/// resolving the candidate first (spec.md §6's `FileMatch`).
pub fn file_match(spec: &str, candidate_path: &str) -> MatchResult {
    let adapter = OsFileSystemAdapter;
    let candidate = shortname::resolve_short_names(candidate_path, &adapter)
        .unwrap_or_else(|_| candidate_path.to_string());
    let candidate_norm = path_utils::normalize_separators(&candidate);

    let Ok(parts) = splitter::split_filespec(spec, &adapter) else {
        return MatchResult {
            is_legal_file_spec: false,
            is_match: false,
            is_file_spec_recursive: false,
            fixed_directory_part: String::new(),
            wildcard_directory_part: String::new(),
            filename_part: spec.to_string(),
        };
    };

    let Ok(data) = regex_compiler::compile(&parts) else {
        return MatchResult {
            is_legal_file_spec: false,
            is_match: false,
            is_file_spec_recursive: false,
            fixed_directory_part: parts.fixed_dir,
            wildcard_directory_part: parts.wildcard_dir,
            filename_part: parts.filename,
        };
    };

    let is_match = matches_compiled(&data, &parts, &candidate_norm);

    MatchResult {
        is_legal_file_spec: true,
        is_match,
        is_file_spec_recursive: data.needs_recursion(),
        fixed_directory_part: parts.fixed_dir,
        wildcard_directory_part: parts.wildcard_dir,
        filename_part: parts.filename,
    }
}

/// Tests a compiled filespec against an already-normalized candidate path,
/// the shared core of [`file_match`] and the literal-include/exclude check
/// in [`get_files_with_adapter`] (spec.md §6's "compile-and-apply").
fn matches_compiled(data: &SearchData, parts: &splitter::FileSpecParts, candidate_norm: &str) -> bool {
    match data {
        SearchData::FilenamePattern { pattern, .. } => {
            let file_name = candidate_norm.rsplit('/').next().unwrap_or(candidate_norm);
            let expected_dir = parts.fixed_dir.trim_end_matches('/');
            let candidate_dir = candidate_norm
                .rsplit_once('/')
                .map(|x| x.0)
                .unwrap_or("")
                .trim_end_matches('/');
            (expected_dir.is_empty() || expected_dir.eq_ignore_ascii_case(candidate_dir))
                && wildcard::wildcard_match(file_name, pattern)
        }
        SearchData::Regex { regex, .. } => regex.is_match(candidate_norm),
    }
}

/// True iff `exclude_spec` (a possibly-wildcarded filespec) matches the
/// literal `candidate_path`, used to decide whether a non-wildcard
/// `includeFilespec` is excluded (spec.md §6: "unless it matches any
/// exclude"). Unlike [`file_match`], this does not short-name-resolve the
/// candidate: a non-wildcard include is returned verbatim, untouched by the
/// filesystem, so the exclude check must compare it exactly as given.
fn exclude_matches_literal(exclude_spec: &str, candidate_path: &str, adapter: &dyn FileSystemAdapter) -> bool {
    if path_utils::paths_equal(exclude_spec, candidate_path) {
        return true;
    }
    if !has_wildcards(exclude_spec) {
        return false;
    }
    let Ok(parts) = splitter::split_filespec(exclude_spec, adapter) else {
        return false;
    };
    let Ok(data) = regex_compiler::compile(&parts) else {
        return false;
    };
    let candidate_norm = path_utils::normalize_separators(candidate_path);
    matches_compiled(&data, &parts, &candidate_norm)
}

/// Resolves the set of filesystem paths matching `include_filespec` and
/// none of `exclude_filespecs` (spec.md §6's `GetFiles`, the engine's
/// primary operation).
///
/// `project_directory`, if given, anchors a relative `fixedDir` and causes
/// results to be returned relative to it (the leading directory is
/// stripped). Degenerate and error cases degrade per spec.md §7 rather than
/// panicking or returning `Err`: an illegal filespec, or any I/O fault
/// during the walk, yields `[include_filespec]` verbatim; a missing fixed
/// directory yields `[]`.
pub fn get_files(
    project_directory: Option<&str>,
    include_filespec: &str,
    exclude_filespecs: &[String],
) -> Vec<String> {
    let adapter = OsFileSystemAdapter;
    get_files_with_adapter(project_directory, include_filespec, exclude_filespecs, &adapter)
}

/// Same as [`get_files`] but against a caller-supplied [`FileSystemAdapter`]
/// — the seam tests use to run the whole engine against an in-memory fake.
pub fn get_files_with_adapter(
    project_directory: Option<&str>,
    include_filespec: &str,
    exclude_filespecs: &[String],
    adapter: &dyn FileSystemAdapter,
) -> Vec<String> {
    if !has_wildcards(include_filespec) {
        let literally_excluded = exclude_filespecs
            .iter()
            .any(|x| exclude_matches_literal(x, include_filespec, adapter));
        return if literally_excluded {
            Vec::new()
        } else {
            vec![include_filespec.to_string()]
        };
    }

    let Ok(include_parts) = splitter::split_filespec(include_filespec, adapter) else {
        return vec![include_filespec.to_string()];
    };

    let resolved_fixed_dir =
        path_utils::resolve_under_project_directory(&include_parts.fixed_dir, project_directory);

    let probe_dir = resolved_fixed_dir.trim_end_matches('/');
    if !probe_dir.is_empty() && !adapter.directory_exists(probe_dir) {
        return Vec::new();
    }

    let key = cache::cache_key(project_directory, include_filespec, exclude_filespecs);
    cache::get_or_compute(&key, || {
        run_walk(
            include_filespec,
            &include_parts,
            &resolved_fixed_dir,
            exclude_filespecs,
            project_directory,
            adapter,
        )
    })
}

fn run_walk(
    include_filespec: &str,
    include_parts: &splitter::FileSpecParts,
    resolved_fixed_dir: &str,
    exclude_filespecs: &[String],
    project_directory: Option<&str>,
    adapter: &dyn FileSystemAdapter,
) -> Vec<String> {
    // The regex's FIXEDDIR capture must line up with the actual paths the
    // walk will produce, which are rooted at `resolved_fixed_dir` (possibly
    // project-directory-joined), not the filespec's original, possibly
    // relative, `fixedDir`.
    let rooted_parts = splitter::FileSpecParts {
        fixed_dir: resolved_fixed_dir.to_string(),
        ..include_parts.clone()
    };

    let Ok(data) = regex_compiler::compile(&rooted_parts) else {
        return vec![include_filespec.to_string()];
    };

    let plan = exclude::plan_excludes(
        include_filespec,
        &rooted_parts,
        resolved_fixed_dir,
        exclude_filespecs,
        project_directory,
        adapter,
    );
    if plan.short_circuit_to_empty {
        return Vec::new();
    }

    let include_spec = WalkSpec {
        data,
        filename_pattern: include_parts.filename.clone(),
    };
    let state = SearchState {
        base_directory: resolved_fixed_dir.trim_end_matches('/').to_string(),
        remaining_wildcard_directory: include_parts.wildcard_dir.clone(),
    };

    let mut results = Vec::new();
    if walker::walk(&mut results, adapter, &include_spec, &state, plan.lockstep, &plan.deferred)
        .is_err()
    {
        // spec.md §4.6 / §7: any I/O fault during the walk falls back to
        // the original filespec, verbatim, rather than a partial result.
        return vec![include_filespec.to_string()];
    }

    results.retain(|r| !plan.results_to_exclude.iter().any(|x| path_utils::paths_equal(x, r)));

    if let Some(proj) = project_directory {
        for r in &mut results {
            *r = path_utils::strip_project_directory(r, proj).to_string();
        }
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_wildcards_detects_star_and_question() {
        assert!(has_wildcards("*.cs"));
        assert!(has_wildcards("a?.cs"));
        assert!(!has_wildcards("a.cs"));
    }

    #[test]
    fn semicolon_item_property_superset() {
        assert!(has_wildcards_semicolon_item_or_property_references("a;b"));
        assert!(has_wildcards_semicolon_item_or_property_references("$(Foo)"));
        assert!(has_wildcards_semicolon_item_or_property_references("@(Foo)"));
        assert!(!has_wildcards_semicolon_item_or_property_references("a.cs"));
    }

    #[test]
    fn literal_filespec_without_wildcards_is_returned_verbatim() {
        let results = get_files(None, "a-literal-path-that-does-not-exist.md", &[]);
        assert_eq!(
            results,
            vec!["a-literal-path-that-does-not-exist.md".to_string()]
        );
    }

    #[test]
    fn illegal_filespec_is_returned_verbatim() {
        let spec = r"a:\b:\c";
        assert_eq!(get_files(None, spec, &[]), vec![spec.to_string()]);
    }

    #[test]
    fn literal_include_excluded_by_wildcarded_exclude_pattern() {
        let results = get_files(None, "readme.md", &["*.md".to_string()]);
        assert!(results.is_empty());
    }

    #[test]
    fn literal_include_not_excluded_by_non_matching_wildcard_exclude() {
        let results = get_files(None, "readme.md", &["*.txt".to_string()]);
        assert_eq!(results, vec!["readme.md".to_string()]);
    }

    #[test]
    fn get_file_spec_info_reports_illegal_filespecs() {
        let info = get_file_spec_info(r"a:\b:\c");
        assert!(!info.is_legal_file_spec);
    }

    #[test]
    fn get_file_spec_info_reports_recursive_legal_filespecs() {
        let info = get_file_spec_info("src/**/*.cs");
        assert!(info.is_legal_file_spec);
        assert!(info.needs_recursion);
        assert!(info.regex_string.is_some());
    }
}
