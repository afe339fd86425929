//! Route matching logic.
//!
//! # Design Decisions
//! - Path matching is a literal, case-sensitive prefix test
//! - The catch-all is a distinct variant, not an empty prefix
//! - No regex to guarantee O(n) matching

/// Condition a request path is tested against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathMatcher {
    /// Matches any path starting with the literal prefix.
    Prefix(String),
    /// Matches every path.
    CatchAll,
}

impl PathMatcher {
    pub fn prefix(prefix: impl Into<String>) -> Self {
        Self::Prefix(prefix.into())
    }

    /// Returns true if `path` satisfies this condition.
    pub fn matches(&self, path: &str) -> bool {
        match self {
            Self::Prefix(prefix) => path.starts_with(prefix.as_str()),
            Self::CatchAll => true,
        }
    }

    /// Length of the literal prefix; the catch-all is least specific.
    pub fn specificity(&self) -> usize {
        match self {
            Self::Prefix(prefix) => prefix.len(),
            Self::CatchAll => 0,
        }
    }

    /// Human-readable form used in logs.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Prefix(prefix) => prefix,
            Self::CatchAll => "/*",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_matcher() {
        let matcher = PathMatcher::prefix("/locations");
        assert!(matcher.matches("/locations"));
        assert!(matcher.matches("/locations/42"));
        assert!(!matcher.matches("/api/locations"));
        assert!(!matcher.matches("/Locations/42")); // Case sensitive
    }

    #[test]
    fn test_catch_all_matcher() {
        assert!(PathMatcher::CatchAll.matches("/"));
        assert!(PathMatcher::CatchAll.matches("/anything/at/all"));
        assert!(PathMatcher::CatchAll.matches(""));
    }

    #[test]
    fn catch_all_is_least_specific() {
        assert!(PathMatcher::prefix("/").specificity() > PathMatcher::CatchAll.specificity());
    }
}
