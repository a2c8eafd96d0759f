//! The recursive walker (spec.md §4.6): steps through `wildcardDir` one
//! segment at a time, merges a parallel set of exclude walks, and prunes
//! whole subtrees once an exclude provably dominates the include.

use crate::fs_adapter::{EntityType, FileSystemAdapter};
use crate::regex_compiler::SearchData;
use crate::wildcard::wildcard_match;
use std::collections::HashMap;

/// An include or exclude filespec paired with the pattern its matching mode
/// was compiled from. `filename_pattern` is kept even in regex mode,
/// because the exclude-dominance check (spec.md §4.6 step 2) compares
/// filename patterns directly regardless of which mode either side is in.
#[derive(Debug, Clone)]
pub struct WalkSpec {
    pub data: SearchData,
    pub filename_pattern: String,
}

/// Per-active-walk state: which directory is being scanned, and how much of
/// `wildcardDir` is still unconsumed.
#[derive(Debug, Clone)]
pub struct SearchState {
    pub base_directory: String,
    pub remaining_wildcard_directory: String,
}

/// A lockstep exclude: a `WalkSpec` plus the state it has reached so far,
/// advancing alongside the include at each recursion step.
#[derive(Debug, Clone)]
struct LockstepExclude {
    spec: WalkSpec,
    state: SearchState,
}

/// An exclude whose base directory lies below the include's; it starts
/// walking, as a fresh lockstep exclude, only once the include's walk
/// reaches `activation_dir`.
#[derive(Debug, Clone)]
pub struct DeferredExclude {
    pub spec: WalkSpec,
    pub initial_remaining_wildcard_directory: String,
    pub activation_dir: String,
}

/// Decision produced from a `SearchState` for one directory (spec.md §4.6.1).
struct StepDecision {
    consider_files: bool,
    directory_pattern: Option<String>,
    next_remaining: String,
    need_directory_recursion: bool,
}

fn decide_step(remaining: &str, needs_recursion: bool) -> StepDecision {
    let consider_files = remaining.is_empty() || remaining.starts_with("**");

    if !needs_recursion || remaining.is_empty() {
        return StepDecision {
            consider_files,
            directory_pattern: None,
            next_remaining: remaining.to_string(),
            need_directory_recursion: false,
        };
    }

    if remaining.trim_end_matches('/') == "**" || remaining.starts_with("**/") {
        // Whole-segment "**": recurse into every subdirectory. Whether or
        // not more of wildcardDir follows, the remainder is carried forward
        // unchanged: "**" may match zero or more directories, so the same
        // state must remain reachable at every depth (spec.md §4.6.1).
        return StepDecision {
            consider_files,
            directory_pattern: None,
            next_remaining: remaining.to_string(),
            need_directory_recursion: true,
        };
    }

    // Peel the leftmost concrete segment.
    let sep = remaining.find('/').unwrap_or(remaining.len());
    let segment = remaining[..sep].to_string();
    let next_remaining = if sep < remaining.len() {
        remaining[sep + 1..].to_string()
    } else {
        String::new()
    };
    StepDecision {
        consider_files,
        directory_pattern: Some(segment),
        next_remaining,
        need_directory_recursion: true,
    }
}

/// True iff `exclude_pattern` dominates `include_pattern` for the purposes
/// of the early-exit in spec.md §4.6 step 2: the exclude is `*`, `*.*`, or
/// textually equal to the include's filename pattern.
fn exclude_dominates(exclude_pattern: &str, include_pattern: &str) -> bool {
    exclude_pattern == "*" || exclude_pattern == "*.*" || exclude_pattern == include_pattern
}

fn matches_filename(data: &SearchData, candidate_path: &str, filename: &str) -> bool {
    match data {
        SearchData::FilenamePattern { pattern, .. } => wildcard_match(filename, pattern),
        SearchData::Regex { regex, .. } => regex.is_match(candidate_path),
    }
}

/// Walks the filesystem from `state`, appending matching, non-excluded
/// paths to `results`. `lockstep` is the set of exclude walks advancing in
/// parallel with the include; `deferred` maps a normalized directory path
/// to excludes that should start walking, lockstep, from that point on.
///
/// Any I/O error aborts the walk; callers at the public-API boundary catch
/// it and fall back to returning the original filespec (spec.md §4.6's
/// "legacy behavior").
#[allow(clippy::too_many_arguments)]
pub fn walk(
    results: &mut Vec<String>,
    adapter: &dyn FileSystemAdapter,
    include: &WalkSpec,
    state: &SearchState,
    lockstep: Vec<LockstepExcludeHandle>,
    deferred: &HashMap<String, Vec<DeferredExclude>>,
) -> std::io::Result<()> {
    let include_step = decide_step(&state.remaining_wildcard_directory, include.data.needs_recursion());

    let exclude_steps: Vec<(StepDecision, &LockstepExcludeHandle)> = lockstep
        .iter()
        .map(|ex| {
            (
                decide_step(&ex.0.state.remaining_wildcard_directory, ex.0.spec.data.needs_recursion()),
                ex,
            )
        })
        .collect();

    // Early exit: any exclude with the same remaining wildcardDir and a
    // dominating filename pattern means nothing here or below can survive.
    for (_ex_step, ex) in &exclude_steps {
        if ex.0.state.remaining_wildcard_directory == state.remaining_wildcard_directory
            && exclude_dominates(&ex.0.spec.filename_pattern, &include.filename_pattern)
        {
            return Ok(());
        }
    }

    if include_step.consider_files {
        let list_pattern = match &include.data {
            SearchData::FilenamePattern { pattern, .. } => pattern.as_str(),
            SearchData::Regex { .. } => "*",
        };
        let names = adapter.list(EntityType::Files, &state.base_directory, list_pattern)?;

        for name in names {
            let candidate_path = join_path(&state.base_directory, &name);
            if !matches_filename(&include.data, &candidate_path, &name) {
                continue;
            }

            let mut excluded = false;
            for (ex_step, ex) in &exclude_steps {
                if !ex_step.consider_files {
                    continue;
                }
                if matches_filename(&ex.0.spec.data, &candidate_path, &name) {
                    excluded = true;
                    break;
                }
            }
            if !excluded {
                results.push(candidate_path);
            }
        }
    }

    if include_step.need_directory_recursion {
        let dir_pattern = include_step.directory_pattern.as_deref().unwrap_or("*");
        let subdirs = adapter.list(EntityType::Directories, &state.base_directory, dir_pattern)?;

        for subdir_name in subdirs {
            let subdir_path = join_path(&state.base_directory, &subdir_name);

            let mut next_lockstep = Vec::new();
            for (ex_step, ex) in &exclude_steps {
                if !ex_step.need_directory_recursion {
                    continue;
                }
                let matches_dir = match &ex_step.directory_pattern {
                    None => true,
                    Some(p) => wildcard_match(&subdir_name, p),
                };
                if matches_dir {
                    next_lockstep.push(LockstepExcludeHandle(LockstepExclude {
                        spec: ex.0.spec.clone(),
                        state: SearchState {
                            base_directory: subdir_path.clone(),
                            remaining_wildcard_directory: ex_step.next_remaining.clone(),
                        },
                    }));
                }
            }

            if let Some(activated) = deferred.get(&crate::path_utils::normalize_separators(&subdir_path)) {
                for d in activated {
                    next_lockstep.push(LockstepExcludeHandle(LockstepExclude {
                        spec: d.spec.clone(),
                        state: SearchState {
                            base_directory: subdir_path.clone(),
                            remaining_wildcard_directory: d.initial_remaining_wildcard_directory.clone(),
                        },
                    }));
                }
            }

            let next_state = SearchState {
                base_directory: subdir_path,
                remaining_wildcard_directory: include_step.next_remaining.clone(),
            };
            walk(results, adapter, include, &next_state, next_lockstep, deferred)?;
        }
    }

    Ok(())
}

/// Newtype wrapper so `walk`'s recursive calls can move ownership of the
/// per-directory exclude list without fighting borrowck over the `&self`
/// tuple references used for the early-exit and filtering passes above.
#[derive(Debug, Clone)]
pub struct LockstepExcludeHandle(LockstepExclude);

impl LockstepExcludeHandle {
    pub fn new(spec: WalkSpec, state: SearchState) -> Self {
        LockstepExcludeHandle(LockstepExclude { spec, state })
    }
}

fn join_path(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        name.to_string()
    } else if dir.ends_with('/') {
        format!("{dir}{name}")
    } else {
        format!("{dir}/{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs_adapter::{EntityType as ET, FileSystemAdapter};
    use crate::regex_compiler::compile;
    use crate::splitter::FileSpecParts;
    use std::cell::RefCell;
    use std::collections::HashMap as Map;

    /// An in-memory filesystem fake: maps a directory path to its entries.
    struct FakeFs {
        dirs: RefCell<Map<String, Vec<(String, bool)>>>, // name -> is_dir
    }

    impl FakeFs {
        fn new(tree: &[(&str, &[(&str, bool)])]) -> Self {
            let mut dirs = Map::new();
            for (dir, entries) in tree {
                dirs.insert(
                    dir.to_string(),
                    entries.iter().map(|(n, d)| (n.to_string(), *d)).collect(),
                );
            }
            FakeFs {
                dirs: RefCell::new(dirs),
            }
        }
    }

    impl FileSystemAdapter for FakeFs {
        fn list(&self, entity_type: ET, dir: &str, pattern: &str) -> std::io::Result<Vec<String>> {
            let dirs = self.dirs.borrow();
            let Some(entries) = dirs.get(dir) else {
                return Ok(Vec::new());
            };
            Ok(entries
                .iter()
                .filter(|(_, is_dir)| match entity_type {
                    ET::Files => !is_dir,
                    ET::Directories => *is_dir,
                    ET::Both => true,
                })
                .map(|(n, _)| n.clone())
                .filter(|n| wildcard_match(n, pattern))
                .collect())
        }

        fn directory_exists(&self, dir: &str) -> bool {
            self.dirs.borrow().contains_key(dir)
        }
    }

    fn spec(fixed: &str, wildcard: &str, filename: &str) -> WalkSpec {
        let parts = FileSpecParts {
            fixed_dir: fixed.to_string(),
            wildcard_dir: wildcard.to_string(),
            filename: filename.to_string(),
        };
        WalkSpec {
            data: compile(&parts).unwrap(),
            filename_pattern: filename.to_string(),
        }
    }

    #[test]
    fn recursive_star_dot_cs_under_src() {
        let fs = FakeFs::new(&[
            ("src", &[("a.cs", false), ("b.txt", false), ("sub", true)]),
            ("src/sub", &[("c.cs", false)]),
        ]);
        let include = spec("src/", "**/", "*.cs");
        let state = SearchState {
            base_directory: "src".to_string(),
            remaining_wildcard_directory: "**/".to_string(),
        };
        let mut results = Vec::new();
        walk(&mut results, &fs, &include, &state, Vec::new(), &Map::new()).unwrap();
        results.sort();
        assert_eq!(results, vec!["src/a.cs", "src/sub/c.cs"]);
    }

    #[test]
    fn non_recursive_star_dot_cs_stops_at_top_level() {
        let fs = FakeFs::new(&[
            ("src", &[("a.cs", false), ("b.txt", false), ("sub", true)]),
            ("src/sub", &[("c.cs", false)]),
        ]);
        let include = spec("src/", "", "*.cs");
        let state = SearchState {
            base_directory: "src".to_string(),
            remaining_wildcard_directory: String::new(),
        };
        let mut results = Vec::new();
        walk(&mut results, &fs, &include, &state, Vec::new(), &Map::new()).unwrap();
        assert_eq!(results, vec!["src/a.cs"]);
    }

    #[test]
    fn lockstep_exclude_prunes_subdirectory() {
        let fs = FakeFs::new(&[
            ("src", &[("a.cs", false), ("sub", true)]),
            ("src/sub", &[("c.cs", false)]),
        ]);
        let include = spec("src/", "**/", "*.cs");
        let exclude = spec("src/", "sub/**/", "*.cs");
        let state = SearchState {
            base_directory: "src".to_string(),
            remaining_wildcard_directory: "**/".to_string(),
        };
        let lockstep = vec![LockstepExcludeHandle::new(
            exclude,
            SearchState {
                base_directory: "src".to_string(),
                remaining_wildcard_directory: "sub/**/".to_string(),
            },
        )];
        let mut results = Vec::new();
        walk(&mut results, &fs, &include, &state, lockstep, &Map::new()).unwrap();
        assert_eq!(results, vec!["src/a.cs"]);
    }
}
