//! The engine's one environment knob (spec.md §6): whether the result
//! cache is used at all. Read once and cached, the way `rustree`'s
//! `config::file` module centralizes environment lookups behind a typed
//! accessor instead of scattering `std::env::var` calls through the code.

use std::sync::OnceLock;

const CACHE_ENV_VAR: &str = "GLOBTREE_CACHE_ENUMERATIONS";

static CACHE_ENABLED: OnceLock<bool> = OnceLock::new();

/// Whether `get_files` results should be served from / stored in the
/// process-wide cache. Defaults to enabled; set
/// `GLOBTREE_CACHE_ENUMERATIONS=0` (or `false`) to disable it, e.g. in
/// tests that need every call to hit the filesystem adapter fresh.
pub fn cache_enabled() -> bool {
    *CACHE_ENABLED.get_or_init(|| match std::env::var(CACHE_ENV_VAR) {
        Ok(v) => !matches!(v.trim(), "0" | "false" | "FALSE" | "False"),
        Err(_) => true,
    })
}
