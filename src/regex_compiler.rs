//! Translates a split filespec into a single anchored regex with named
//! capture groups `FIXEDDIR`, `WILDCARDDIR`, `FILENAME` (spec.md §4.5).
//!
//! Rather than the legacy textual `<:tag:>`-substitution approach spec.md's
//! design notes describe, this builds a small staged token representation
//! (`Segment`) for the wildcard-directory portion, collapses it to a fixed
//! point, and only then emits regex syntax — so there is no risk of an
//! internal placeholder colliding with user input (spec.md §9).

use crate::error::IllegalFilespecReason;
use crate::splitter::FileSpecParts;
use regex::Regex;

/// A compiled filespec: either a bare filename pattern (no separators) or a
/// full-path regex, per spec.md §3's "exactly one of filespec and regex".
#[derive(Debug, Clone)]
pub enum SearchData {
    /// Filename-pattern mode: `wildcardDir` was empty at compile time, so
    /// matching reduces to the wildcard matcher applied to bare filenames.
    FilenamePattern {
        pattern: String,
        needs_recursion: bool,
    },
    /// Regex mode: `wildcardDir` was non-empty, so the walker matches the
    /// full candidate path against a compiled regex.
    Regex {
        regex: Regex,
        needs_recursion: bool,
    },
}

impl SearchData {
    pub fn needs_recursion(&self) -> bool {
        match self {
            SearchData::FilenamePattern { needs_recursion, .. } => *needs_recursion,
            SearchData::Regex { needs_recursion, .. } => *needs_recursion,
        }
    }
}

/// A single `wildcardDir` path segment after parsing, before collapse.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    /// `**` as a whole segment: matches zero or more directory components.
    DoubleStar,
    /// Any other segment, possibly containing `*`/`?`.
    Concrete(String),
}

/// Compiles `parts` into `SearchData`. If `wildcardDir` is empty, the
/// result is a filename-pattern matcher (cheaper, and what the walker's
/// per-step protocol prefers per spec.md §4.6.1). Otherwise a full regex is
/// built over `fixedDir + wildcardDir + filename`.
pub fn compile(parts: &FileSpecParts) -> Result<SearchData, IllegalFilespecReason> {
    let needs_recursion = !parts.wildcard_dir.is_empty();

    if !needs_recursion {
        return Ok(SearchData::FilenamePattern {
            pattern: parts.filename.clone(),
            needs_recursion,
        });
    }

    let pattern_str = build_regex_string(parts)?;
    let regex = Regex::new(&pattern_str).map_err(|_| IllegalFilespecReason::ReservedTagCollision)?;
    Ok(SearchData::Regex {
        regex,
        needs_recursion,
    })
}

fn build_regex_string(parts: &FileSpecParts) -> Result<String, IllegalFilespecReason> {
    let fixed_regex = emit_fixed_dir(&parts.fixed_dir);
    let wildcard_regex = emit_wildcard_dir(&parts.wildcard_dir)?;
    let filename_regex = emit_filename(&parts.filename);

    Ok(format!(
        "(?i)^(?P<FIXEDDIR>{fixed_regex})(?P<WILDCARDDIR>{wildcard_regex})(?P<FILENAME>{filename_regex})$"
    ))
}

/// `fixedDir` never contains wildcards (it's been resolved/validated by the
/// splitter), so it is emitted as an escaped literal. A leading UNC `//` is
/// preserved exactly, matching spec.md rule 4 ("Preserve UNC prefix").
fn emit_fixed_dir(fixed_dir: &str) -> String {
    if let Some(rest) = fixed_dir.strip_prefix("//") {
        format!("//{}", escape_literal(rest))
    } else {
        escape_literal(fixed_dir)
    }
}

/// Parses `wildcard_dir` into segments, collapses `**/**` → `**` to a fixed
/// point, then emits each segment's regex. A leading `**` is a "left-dirs"
/// token (any prefix of directories, including none); any other `**` is a
/// "middle-dirs" token (zero or more intermediate directories). Both emit
/// the same regex shape since both sit between two separators once the
/// trailing/leading slash bookkeeping is accounted for.
fn emit_wildcard_dir(wildcard_dir: &str) -> Result<String, IllegalFilespecReason> {
    let mut segments: Vec<Segment> = wildcard_dir
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|s| {
            if s == "**" {
                Segment::DoubleStar
            } else {
                Segment::Concrete(s.to_string())
            }
        })
        .collect();

    // Drop bare "." segments (spec.md §4.5 rule 5: "/./ -> /" and other
    // identity redundancies) before the "**" collapse, so interior "./"
    // insertions never reach the regex as a literal directory name.
    segments.retain(|seg| !matches!(seg, Segment::Concrete(s) if s == "."));

    // Collapse consecutive DoubleStar segments to a single one (handles
    // a/**/**/b -> a/**/b, and chains of more than two).
    collapse_adjacent_double_stars(&mut segments);

    // Any remaining "**" must be a whole segment; anything else already
    // failed in the splitter, but double-check post-collapse per spec.md
    // rule 8 ("if any ** remains outside a recognized position, illegal").
    for seg in &segments {
        if let Segment::Concrete(s) = seg
            && s.contains("**")
        {
            return Err(IllegalFilespecReason::DoubleStarNotWholeSegment);
        }
    }

    let mut out = String::new();
    for seg in &segments {
        match seg {
            Segment::DoubleStar => out.push_str("(?:[^/]+/)*"),
            Segment::Concrete(s) => {
                out.push_str(&emit_concrete_segment(s));
                out.push('/');
            }
        }
    }
    Ok(out)
}

fn collapse_adjacent_double_stars(segments: &mut Vec<Segment>) {
    let mut changed = true;
    while changed {
        changed = false;
        let mut i = 0;
        while i + 1 < segments.len() {
            if segments[i] == Segment::DoubleStar && segments[i + 1] == Segment::DoubleStar {
                segments.remove(i + 1);
                changed = true;
            } else {
                i += 1;
            }
        }
    }
}

fn emit_concrete_segment(segment: &str) -> String {
    let mut out = String::new();
    for c in segment.chars() {
        match c {
            '*' => out.push_str("[^/]*"),
            '?' => out.push_str("[^/]"),
            other => out.push_str(&regex::escape(&other.to_string())),
        }
    }
    out
}

/// Emits the filename regex, applying the trailing-dot convention from
/// spec.md rule 2: if `filename` ends with `.`, `*` becomes "any run of
/// non-dot characters", `?` becomes "any single non-dot character", and the
/// trailing `.` itself is dropped (`foo.` matches `foo` but not `foo.txt`).
fn emit_filename(filename: &str) -> String {
    if let Some(body) = filename.strip_suffix('.') {
        let mut out = String::new();
        for c in body.chars() {
            match c {
                '*' => out.push_str("[^.]*"),
                '?' => out.push_str("[^.]"),
                other => out.push_str(&regex::escape(&other.to_string())),
            }
        }
        return out;
    }

    let mut out = String::new();
    for c in filename.chars() {
        match c {
            '*' => out.push_str("[^/]*"),
            '?' => out.push('.'),
            other => out.push_str(&regex::escape(&other.to_string())),
        }
    }
    out
}

fn escape_literal(s: &str) -> String {
    s.chars().map(|c| regex::escape(&c.to_string())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::splitter::FileSpecParts;

    fn parts(fixed: &str, wildcard: &str, filename: &str) -> FileSpecParts {
        FileSpecParts {
            fixed_dir: fixed.to_string(),
            wildcard_dir: wildcard.to_string(),
            filename: filename.to_string(),
        }
    }

    #[test]
    fn no_wildcard_dir_is_filename_pattern_mode() {
        let data = compile(&parts("src/", "", "*.cs")).unwrap();
        assert!(!data.needs_recursion());
        matches!(data, SearchData::FilenamePattern { .. });
    }

    #[test]
    fn recursive_regex_matches_expected_paths() {
        let data = compile(&parts("src/", "**/", "*.cs")).unwrap();
        let SearchData::Regex { regex, needs_recursion } = data else {
            panic!("expected regex mode");
        };
        assert!(needs_recursion);
        assert!(regex.is_match("src/a.cs"));
        assert!(regex.is_match("src/sub/c.cs"));
        assert!(!regex.is_match("src/b.txt"));
    }

    #[test]
    fn double_star_collapse_is_equivalent() {
        let a = compile(&parts("", "a/**/**/", "b")).unwrap();
        let b = compile(&parts("", "a/**/", "b")).unwrap();
        let (SearchData::Regex { regex: ra, .. }, SearchData::Regex { regex: rb, .. }) = (a, b)
        else {
            panic!("expected regex mode");
        };
        assert_eq!(ra.as_str(), rb.as_str());
    }

    #[test]
    fn trailing_dot_filename_excludes_extension() {
        let data = compile(&parts("", "**/", "*.")).unwrap();
        let SearchData::Regex { regex, .. } = data else {
            panic!("expected regex mode");
        };
        assert!(regex.is_match("foo"));
        assert!(!regex.is_match("foo.txt"));
    }

    #[test]
    fn interior_dot_segment_is_collapsed() {
        let a = compile(&parts("", "*/./sub/", "*.cs")).unwrap();
        let b = compile(&parts("", "*/sub/", "*.cs")).unwrap();
        let (SearchData::Regex { regex: ra, .. }, SearchData::Regex { regex: rb, .. }) = (a, b)
        else {
            panic!("expected regex mode");
        };
        assert_eq!(ra.as_str(), rb.as_str());
        assert!(ra.is_match("x/sub/a.cs"));
    }

    #[test]
    fn unc_prefix_is_preserved() {
        let data = compile(&parts(r"//server/share/", "**/", "*.cs")).unwrap();
        let SearchData::Regex { regex, .. } = data else {
            panic!("expected regex mode");
        };
        assert!(regex.is_match("//server/share/a.cs"));
    }
}
