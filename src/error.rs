//! Error types for the glob matching and enumeration engine.

use thiserror::Error;

/// Errors that can occur while splitting, compiling, or matching a filespec.
///
/// Most public entry points (see [`crate::get_files`], [`crate::file_match`])
/// do not propagate these as `Err` — per the engine's fallback rules they
/// degrade to a documented sentinel value instead. `GlobError` is reserved
/// for callers who want the structured reason behind an `IllegalFilespec`,
/// and for genuine I/O faults surfaced by the filesystem adapter.
#[derive(Error, Debug)]
pub enum GlobError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("regex compilation error: {0}")]
    Regex(#[from] regex::Error),

    #[error("illegal filespec: {0}")]
    IllegalFilespec(#[from] IllegalFilespecReason),
}

/// Why a filespec was rejected as structurally invalid.
///
/// Mirrors the taxonomy in spec.md §3's invariants: each variant names a
/// single violated rule so callers (and tests) can assert on *why* a
/// filespec is illegal, not just that it is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IllegalFilespecReason {
    #[error("wildcard directory part contains '..'")]
    DotDotInWildcardDir,

    #[error("'**' appears somewhere other than as an entire path segment")]
    DoubleStarNotWholeSegment,

    #[error("colon appears outside position 2 of the filespec")]
    MisplacedColon,

    #[error("filespec contains the substring '...'")]
    TripleDot,

    #[error("filespec contains an internal regex-compiler tag sequence")]
    ReservedTagCollision,
}
