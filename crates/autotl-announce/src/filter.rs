//! User-configured name filters and the fixed language exclusion.

use regex::Regex;

use crate::error::{AnnounceError, AnnounceResult};

/// Lower-case marker that excludes an announcement regardless of filters.
pub const BLOCKED_LANGUAGE: &str = "french";

/// Whether the name carries the excluded language marker in any case.
#[must_use]
pub fn contains_blocked_language(name: &str) -> bool {
    name.to_lowercase().contains(BLOCKED_LANGUAGE)
}

/// Ordered filter patterns, compiled once.
#[derive(Debug, Clone)]
pub struct FilterSet {
    patterns: Vec<Regex>,
}

impl FilterSet {
    /// Compile every pattern in order.
    ///
    /// # Errors
    ///
    /// Returns [`AnnounceError::InvalidFilter`] for the first pattern that
    /// fails to compile.
    pub fn compile(patterns: &[String]) -> AnnounceResult<Self> {
        let patterns = patterns
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|source| AnnounceError::InvalidFilter {
                    pattern: pattern.clone(),
                    source,
                })
            })
            .collect::<AnnounceResult<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    /// First pattern that matches `name`, in configured order.
    #[must_use]
    pub fn first_match(&self, name: &str) -> Option<&str> {
        self.patterns
            .iter()
            .find(|pattern| pattern.is_match(name))
            .map(Regex::as_str)
    }

    /// Number of compiled patterns.
    pub(crate) const fn len(&self) -> usize {
        self.patterns.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(patterns: &[&str]) -> FilterSet {
        let owned: Vec<String> = patterns.iter().map(ToString::to_string).collect();
        FilterSet::compile(&owned).expect("patterns should compile")
    }

    #[test]
    fn any_pattern_accepts() {
        let filters = set(&["^Ubuntu", "CentOS", r"S\d{2}E\d{2}"]);
        assert!(filters.first_match("CentOS 7.0 x64").is_some());
        assert!(filters.first_match("Show S01E02 720p").is_some());
        assert!(filters.first_match("Debian 12").is_none());
        assert_eq!(filters.len(), 3);
    }

    #[test]
    fn first_match_reports_earliest_pattern() {
        let filters = set(&["x64", "CentOS"]);
        assert_eq!(filters.first_match("CentOS 7.0 x64"), Some("x64"));
        assert_eq!(filters.first_match("CentOS 7.0"), Some("CentOS"));
        assert_eq!(filters.first_match("Fedora"), None);
    }

    #[test]
    fn invalid_pattern_names_the_culprit() {
        let err = FilterSet::compile(&["ok".to_string(), "(broken".to_string()])
            .expect_err("unbalanced group should fail");
        match err {
            AnnounceError::InvalidFilter { pattern, .. } => assert_eq!(pattern, "(broken"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn language_marker_is_case_insensitive() {
        assert!(contains_blocked_language("Movie 2017 FRENCH 1080p"));
        assert!(contains_blocked_language("Movie.TrueFrench.720p"));
        assert!(!contains_blocked_language("Movie 2017 GERMAN"));
    }
}
