//! Entry selection predicates.

use globset::{Glob, GlobSet, GlobSetBuilder};
use meff_core::errors::{ErrorInfo, MeffError};

/// Decides whether an archive or directory entry is a configuration source.
pub trait EntrySelector: Send + Sync {
    /// Returns true when the entry named `name` (slash-separated, relative to
    /// the source root) should be ingested.
    fn select(&self, name: &str) -> bool;
}

impl<F> EntrySelector for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn select(&self, name: &str) -> bool {
        self(name)
    }
}

fn build_globset(patterns: &[String], fallback: Option<&str>) -> Result<GlobSet, MeffError> {
    let mut builder = GlobSetBuilder::new();
    let fallback = fallback.filter(|_| patterns.is_empty());
    for pattern in patterns.iter().map(String::as_str).chain(fallback) {
        let glob = Glob::new(pattern).map_err(|err| {
            MeffError::Configuration(
                ErrorInfo::new("invalid-glob", err.to_string()).with_context("pattern", pattern),
            )
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|err| {
        MeffError::Configuration(ErrorInfo::new("invalid-glob", err.to_string()))
    })
}

/// Include/exclude glob selection.
///
/// An entry is selected when it matches an include pattern and no exclude
/// pattern. An empty include list selects every entry.
#[derive(Debug, Clone)]
pub struct GlobSelector {
    include: GlobSet,
    exclude: GlobSet,
}

impl GlobSelector {
    /// Compiles the include and exclude patterns.
    pub fn new(include: &[String], exclude: &[String]) -> Result<Self, MeffError> {
        Ok(Self {
            include: build_globset(include, Some("**/*"))?,
            exclude: build_globset(exclude, None)?,
        })
    }
}

impl EntrySelector for GlobSelector {
    fn select(&self, name: &str) -> bool {
        self.include.is_match(name) && !self.exclude.is_match(name)
    }
}
