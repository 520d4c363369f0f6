//! Script discovery across one or more sources.
//!
//! [`discover`] lists every source, keeps file names that match the
//! [`ScriptPattern`] and pass the [`NameFilter`], sorts the survivors by
//! name and reads them. The sort is stable, so a name present in several
//! sources appears once per source, adjacent, in source order.
//!
//! Nothing is cached here; callers decide whether to keep the result.
//!
//! ```no_run
//! use commander_core::NameFilter;
//! use commander_scripts::{DirectorySource, ScriptPattern, ScriptRepository};
//!
//! let repository = ScriptRepository::new(ScriptPattern::any(), NameFilter::allow_all())
//!     .with_source(DirectorySource::new("/etc/commander/sql"));
//!
//! for script in repository.discover().unwrap() {
//!     println!("{} ({} bytes)", script.name, script.body.len());
//! }
//! ```

use commander_core::NameFilter;
use tracing::debug;

use crate::error::Result;
use crate::pattern::ScriptPattern;
use crate::source::ScriptSource;

/// One discovered SQL script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    /// File name, used for filtering and ordering.
    pub name: String,
    /// Where the script was read from.
    pub location: String,
    /// Raw SQL text.
    pub body: String,
}

/// Discovers scripts from an ordered list of sources.
pub struct ScriptRepository {
    sources: Vec<Box<dyn ScriptSource>>,
    pattern: ScriptPattern,
    filter: NameFilter,
}

impl ScriptRepository {
    /// Creates a repository with no sources.
    pub fn new(pattern: ScriptPattern, filter: NameFilter) -> Self {
        Self {
            sources: Vec::new(),
            pattern,
            filter,
        }
    }

    /// Appends a source. Sources are enumerated in the order they are added.
    pub fn with_source(mut self, source: impl ScriptSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Labels of the configured sources, in enumeration order.
    pub fn source_labels(&self) -> Vec<String> {
        self.sources.iter().map(|s| s.label()).collect()
    }

    /// The file name pattern.
    pub fn pattern(&self) -> &ScriptPattern {
        &self.pattern
    }

    /// Discovers, filters, sorts and reads every matching script.
    ///
    /// # Errors
    ///
    /// Returns the first [`DiscoveryError`](crate::DiscoveryError) raised by
    /// any source; no partial result is returned.
    pub fn discover(&self) -> Result<Vec<Script>> {
        discover(&self.sources, &self.pattern, &self.filter)
    }
}

/// Discovers scripts from `sources` matching `pattern` and `filter`.
pub fn discover(
    sources: &[Box<dyn ScriptSource>],
    pattern: &ScriptPattern,
    filter: &NameFilter,
) -> Result<Vec<Script>> {
    let mut matched: Vec<(&dyn ScriptSource, String)> = Vec::new();

    for source in sources {
        debug!(source = %source.label(), pattern = %pattern.glob(), "listing scripts");
        let mut names: Vec<String> = source
            .list()?
            .into_iter()
            .filter(|name| pattern.matches(name) && filter.matches(name))
            .collect();
        // Fix the in-source order so ties never depend on directory order.
        names.sort();
        matched.extend(names.into_iter().map(|name| (source.as_ref(), name)));
    }

    matched.sort_by(|(_, a), (_, b)| a.cmp(b));

    matched
        .into_iter()
        .map(|(source, name)| -> Result<Script> {
            let body = source.read(&name)?;
            Ok(Script {
                location: source.location(&name),
                name,
                body,
            })
        })
        .collect()
}
