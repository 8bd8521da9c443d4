//! Commit identifiers.
//!
//! Commit ids are hyphenated UUID v4 strings. The same shape check splits
//! top-level listings into commits vs branches AND rejects branch names that
//! would land in the id space, so the two namespaces stay disjoint by
//! construction rather than by accident.

use uuid::Uuid;

/// Fresh commit id (hyphenated v4, 36 chars).
pub fn new_commit_id() -> String {
    Uuid::new_v4().to_string()
}

/// True when `name` has the exact hyphenated UUID shape.
///
/// Strict on purpose: `Uuid::try_parse` alone also accepts simple/braced/urn
/// forms, which would misclassify a 32-hex branch name as a commit.
pub fn is_commit_id(name: &str) -> bool {
    let b = name.as_bytes();
    if b.len() != 36 {
        return false;
    }
    if b[8] != b'-' || b[13] != b'-' || b[18] != b'-' || b[23] != b'-' {
        return false;
    }
    Uuid::try_parse(name).is_ok()
}
