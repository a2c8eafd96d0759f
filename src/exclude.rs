//! Exclude planning (spec.md §4.7): classifies each exclude filespec
//! against the include by comparing their `fixedDir`s and `wildcardDir`s,
//! deciding whether to run it lockstep, defer it to a deeper subdirectory,
//! apply it only as a post-filter, or drop it entirely.

use crate::fs_adapter::FileSystemAdapter;
use crate::path_utils::{normalize_separators, paths_equal, resolve_under_project_directory};
use crate::regex_compiler::compile;
use crate::splitter::{split_filespec, FileSpecParts};
use crate::walker::{DeferredExclude, LockstepExcludeHandle, SearchState, WalkSpec};
use std::collections::HashMap;

/// Everything the walker needs to run the excludes alongside an include.
pub struct ExcludePlan {
    pub lockstep: Vec<LockstepExcludeHandle>,
    pub deferred: HashMap<String, Vec<DeferredExclude>>,
    /// Literal paths to drop from the final result set: illegal excludes,
    /// which spec.md §4.7 says are treated as literal paths.
    pub results_to_exclude: Vec<String>,
    /// True when an exclude is textually path-equal to the include: the
    /// whole enumeration short-circuits to empty (spec.md §4.7).
    pub short_circuit_to_empty: bool,
}

/// Builds an [`ExcludePlan`] for `excludes` relative to the already-split
/// `include`. `include_base` is the include's normalized `fixedDir` after
/// project-directory resolution, used for the relationship table in
/// spec.md §4.7.
pub fn plan_excludes(
    include_spec: &str,
    include: &FileSpecParts,
    include_base: &str,
    excludes: &[String],
    project_directory: Option<&str>,
    adapter: &dyn FileSystemAdapter,
) -> ExcludePlan {
    let mut plan = ExcludePlan {
        lockstep: Vec::new(),
        deferred: HashMap::new(),
        results_to_exclude: Vec::new(),
        short_circuit_to_empty: false,
    };

    for exclude_spec in excludes {
        if paths_equal(exclude_spec, include_spec) {
            plan.short_circuit_to_empty = true;
            return plan;
        }

        let Ok(mut parts) = split_filespec(exclude_spec, adapter) else {
            plan.results_to_exclude.push(exclude_spec.clone());
            continue;
        };
        parts.fixed_dir = resolve_under_project_directory(&parts.fixed_dir, project_directory);

        let exclude_base = normalize_separators(&parts.fixed_dir);
        let include_base_norm = normalize_separators(include_base);

        if paths_equal(&exclude_base, &include_base_norm) {
            push_lockstep(&mut plan, &parts, include);
            continue;
        }

        if exclude_base.len() == include_base_norm.len() {
            // Same length, different paths: unrelated directory, drop.
            continue;
        }

        if let Some(remainder) = strip_prefix_dir(&exclude_base, &include_base_norm) {
            // Exclude base is strictly deeper than (a descendant of) the
            // include base: defer until the walk reaches it.
            let activation_dir = format!("{include_base_norm}{remainder}")
                .trim_end_matches('/')
                .to_string();
            let Ok(data) = compile(&parts) else {
                plan.results_to_exclude.push(exclude_spec.clone());
                continue;
            };
            plan.deferred
                .entry(normalize_separators(&activation_dir))
                .or_default()
                .push(DeferredExclude {
                    spec: WalkSpec {
                        data,
                        filename_pattern: parts.filename.clone(),
                    },
                    initial_remaining_wildcard_directory: parts.wildcard_dir.clone(),
                    activation_dir,
                });
            continue;
        }

        if strip_prefix_dir(&include_base_norm, &exclude_base).is_none() {
            // Exclude base is deeper but not a descendant (diverging
            // paths), or shallower and not a prefix: unrelated, drop.
            continue;
        }

        // Exclude base is shallower than (an ancestor of) the include base.
        if parts.wildcard_dir.is_empty() {
            // Refers only to files directly above the include: drop.
            continue;
        }
        if parts.wildcard_dir.trim_end_matches('/') == "**" {
            // Promote: rebase to the include's base, keep lockstep.
            parts.fixed_dir = include_base_norm.clone();
            push_lockstep(&mut plan, &parts, include);
            continue;
        }
        // Non-"**" wildcard dir above the include: promote with rebase and
        // force "**/" plus regex mode, since the exact intervening
        // directories no longer line up with the include's own split.
        parts.fixed_dir = include_base_norm.clone();
        parts.wildcard_dir = "**/".to_string();
        push_lockstep(&mut plan, &parts, include);
    }

    plan
}

fn push_lockstep(plan: &mut ExcludePlan, parts: &FileSpecParts, include: &FileSpecParts) {
    let Ok(data) = compile(parts) else {
        return;
    };
    plan.lockstep.push(LockstepExcludeHandle::new(
        WalkSpec {
            data,
            filename_pattern: parts.filename.clone(),
        },
        SearchState {
            base_directory: include.fixed_dir.trim_end_matches('/').to_string(),
            remaining_wildcard_directory: parts.wildcard_dir.clone(),
        },
    ));
}

/// If `longer` is `shorter` plus a non-empty remainder (i.e. `shorter` is a
/// strict directory-prefix of `longer`), returns that remainder.
fn strip_prefix_dir<'a>(longer: &'a str, shorter: &str) -> Option<&'a str> {
    if shorter.is_empty() {
        return if longer.is_empty() { None } else { Some(longer) };
    }
    let shorter = if shorter.ends_with('/') {
        shorter.to_string()
    } else {
        format!("{shorter}/")
    };
    longer.strip_prefix(shorter.as_str()).filter(|r| !r.is_empty())
}
