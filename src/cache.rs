//! Process-wide result cache (spec.md §4.8), keyed by a textual digest of
//! `(projectDirectory, include, excludes)`. Guarantees at most one
//! concurrent enumeration per key: the outer map is consulted without a
//! lock on a cache hit; on a miss, a per-key `OnceLock` is populated
//! exactly once, and every other caller for the same key blocks on it
//! until the first completes.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

struct Cache {
    entries: Mutex<HashMap<String, Arc<OnceLock<Vec<String>>>>>,
}

static CACHE: OnceLock<Cache> = OnceLock::new();

fn cache() -> &'static Cache {
    CACHE.get_or_init(|| Cache {
        entries: Mutex::new(HashMap::new()),
    })
}

/// Builds the cache key from the project directory, include, and excludes,
/// matching spec.md §4.8's "concatenation of project directory, include,
/// and all excludes".
pub fn cache_key(project_directory: Option<&str>, include: &str, excludes: &[String]) -> String {
    let mut key = String::new();
    key.push_str(project_directory.unwrap_or(""));
    key.push('\u{0}');
    key.push_str(include);
    for exclude in excludes {
        key.push('\u{0}');
        key.push_str(exclude);
    }
    key
}

/// Returns the cached array for `key` if present, or runs `compute` exactly
/// once across all concurrent callers for this key and caches the result.
/// The returned vector is always a fresh copy, so callers may freely
/// mutate it without corrupting the cache (spec.md §4.8).
pub fn get_or_compute(key: &str, compute: impl FnOnce() -> Vec<String>) -> Vec<String> {
    if !crate::config::cache_enabled() {
        return compute();
    }

    let slot = {
        let mut entries = cache().entries.lock().unwrap();
        entries
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(OnceLock::new()))
            .clone()
    };

    slot.get_or_init(compute).clone()
}

/// Test-only hook to clear the cache between test cases, per spec.md §4.8.
#[cfg(test)]
pub fn clear_for_test() {
    cache().entries.lock().unwrap().clear();
}
