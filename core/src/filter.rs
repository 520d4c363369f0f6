//! Include/exclude name filters.
//!
//! The same rule applies to command names and script names: an empty
//! include list admits every name, a non-empty one admits only the listed
//! names, and an exclusion always wins.
//!
//! ```
//! # use commander_core::NameFilter;
//! let filter = NameFilter::parse("a,b", "b").unwrap();
//! assert!(filter.matches("a"));
//! assert!(!filter.matches("b"));
//! assert!(!filter.matches("c"));
//! ```

use std::collections::BTreeSet;

use crate::error::ConfigError;

/// A parsed pair of include and exclude name sets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameFilter {
    includes: BTreeSet<String>,
    excludes: BTreeSet<String>,
}

impl NameFilter {
    /// Returns a filter that admits every name.
    pub fn allow_all() -> Self {
        Self::default()
    }

    /// Parses two comma-separated lists.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidFilter`] if a non-blank list contains an
    /// empty entry.
    pub fn parse(includes: &str, excludes: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            includes: parse_list(includes)?,
            excludes: parse_list(excludes)?,
        })
    }

    /// Builds a filter from already-split names.
    pub fn from_lists<I, E>(includes: I, excludes: E) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
        E: IntoIterator,
        E::Item: Into<String>,
    {
        Self {
            includes: includes.into_iter().map(Into::into).collect(),
            excludes: excludes.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns `true` if `name` is explicitly excluded.
    pub fn is_excluded(&self, name: &str) -> bool {
        self.excludes.contains(name)
    }

    /// Returns `true` if `name` passes the filter.
    pub fn matches(&self, name: &str) -> bool {
        if self.is_excluded(name) {
            return false;
        }
        self.includes.is_empty() || self.includes.contains(name)
    }

    /// Included names, sorted.
    pub fn includes(&self) -> impl Iterator<Item = &str> {
        self.includes.iter().map(String::as_str)
    }

    /// Excluded names, sorted.
    pub fn excludes(&self) -> impl Iterator<Item = &str> {
        self.excludes.iter().map(String::as_str)
    }
}

/// Splits a comma-separated list, trimming each entry.
///
/// A blank string is an empty list.
pub(crate) fn parse_list(raw: &str) -> Result<BTreeSet<String>, ConfigError> {
    if raw.trim().is_empty() {
        return Ok(BTreeSet::new());
    }
    raw.split(',')
        .map(|entry| {
            let entry = entry.trim();
            if entry.is_empty() {
                Err(ConfigError::InvalidFilter(raw.to_string()))
            } else {
                Ok(entry.to_string())
            }
        })
        .collect()
}
