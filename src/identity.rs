//! Anonymous project identity.
//!
//! A project is identified by a hash of its working path so events from the
//! same checkout can be grouped without ever transmitting the path itself.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Identifier used when no working path is configured.
pub const UNKNOWN_PROJECT_ID: &str = "unknown-project-id";

/// Hash a working path into a decimal project identifier.
///
/// The value is stable for a given path within one build of the tool. It is
/// not meant to be compared across builds.
pub fn hashed_working_path(working_path: &str) -> String {
    if working_path.is_empty() {
        return UNKNOWN_PROJECT_ID.to_string();
    }

    let mut hasher = DefaultHasher::new();
    working_path.hash(&mut hasher);
    hasher.finish().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_path_uses_sentinel() {
        assert_eq!(hashed_working_path(""), "unknown-project-id");
    }

    #[test]
    fn test_hash_is_deterministic() {
        let a = hashed_working_path("/home/dev/project");
        let b = hashed_working_path("/home/dev/project");
        assert_eq!(a, b);
        assert!(a.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_distinct_paths_differ() {
        assert_ne!(
            hashed_working_path("/home/dev/project-a"),
            hashed_working_path("/home/dev/project-b")
        );
    }
}
