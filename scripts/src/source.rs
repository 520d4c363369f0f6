//! Places scripts are listed and read from.
//!
//! Two sources ship with the crate:
//!
//! - [`EmbeddedSource`]: scripts compiled into the binary (the "bundled"
//!   location), typically generated by a build script with `include_str!`.
//! - [`DirectorySource`]: an external directory scanned at discovery time.
//!
//! Both enumerate file names only; the repository applies the pattern and
//! name filter, then reads the survivors by name.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::error::{DiscoveryError, Result};

/// A location scripts can be listed and read from.
pub trait ScriptSource: Send + Sync {
    /// Short label used in logs (`bundled`, a directory path, ...).
    fn label(&self) -> String;

    /// Lists the file names available in this source.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError`] if the location is missing or cannot be
    /// enumerated.
    fn list(&self) -> Result<Vec<String>>;

    /// Reads the full UTF-8 contents of `name`.
    fn read(&self, name: &str) -> Result<String>;

    /// Human-readable location of `name` within this source.
    fn location(&self, name: &str) -> String {
        format!("{}:{name}", self.label())
    }
}

/// Scripts compiled into the binary as `(file name, contents)` pairs.
///
/// # Examples
///
/// ```
/// use commander_scripts::{EmbeddedSource, ScriptSource};
///
/// static SCRIPTS: &[(&str, &str)] = &[("001_init.sql", "CREATE TABLE t (id INTEGER);")];
///
/// let source = EmbeddedSource::new(SCRIPTS);
/// assert_eq!(source.list().unwrap(), vec!["001_init.sql"]);
/// assert_eq!(source.location("001_init.sql"), "bundled:001_init.sql");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct EmbeddedSource {
    scripts: &'static [(&'static str, &'static str)],
}

impl EmbeddedSource {
    /// Wraps a static script table.
    pub const fn new(scripts: &'static [(&'static str, &'static str)]) -> Self {
        Self { scripts }
    }

    /// Number of embedded scripts.
    pub fn len(&self) -> usize {
        self.scripts.len()
    }

    /// Returns `true` if nothing is embedded.
    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
    }
}

impl ScriptSource for EmbeddedSource {
    fn label(&self) -> String {
        "bundled".to_string()
    }

    fn list(&self) -> Result<Vec<String>> {
        Ok(self.scripts.iter().map(|(name, _)| name.to_string()).collect())
    }

    fn read(&self, name: &str) -> Result<String> {
        self.scripts
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, body)| body.to_string())
            .ok_or_else(|| DiscoveryError::ReadFailed {
                location: self.location(name),
                source: std::io::Error::new(ErrorKind::NotFound, "no such embedded script"),
            })
    }
}

/// An external directory of `.sql` files.
///
/// Only regular files directly inside the directory are listed; nested
/// directories are ignored.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    /// Creates a source rooted at `root`. The directory is checked when
    /// listing, not here.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ScriptSource for DirectorySource {
    fn label(&self) -> String {
        self.root.display().to_string()
    }

    fn list(&self) -> Result<Vec<String>> {
        let list_failed = |source: std::io::Error| DiscoveryError::ListFailed {
            location: self.label(),
            source,
        };

        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(DiscoveryError::MissingLocation(self.root.clone()));
            }
            Err(e) => return Err(list_failed(e)),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(list_failed)?;
            let file_type = entry.file_type().map_err(list_failed)?;
            if file_type.is_dir() {
                continue;
            }
            // Non-UTF-8 file names cannot match a UTF-8 pattern.
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
        Ok(names)
    }

    fn read(&self, name: &str) -> Result<String> {
        let path = self.root.join(name);
        fs::read_to_string(&path).map_err(|source| DiscoveryError::ReadFailed {
            location: path.display().to_string(),
            source,
        })
    }

    fn location(&self, name: &str) -> String {
        self.root.join(name).display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static SCRIPTS: &[(&str, &str)] = &[
        ("002_seed.sql", "INSERT INTO t VALUES (1);"),
        ("001_init.sql", "CREATE TABLE t (id INTEGER);"),
    ];

    #[test]
    fn test_embedded_list_and_read() {
        let source = EmbeddedSource::new(SCRIPTS);
        assert_eq!(source.len(), 2);
        assert_eq!(source.list().unwrap(), vec!["002_seed.sql", "001_init.sql"]);
        assert_eq!(source.read("001_init.sql").unwrap(), "CREATE TABLE t (id INTEGER);");
    }

    #[test]
    fn test_embedded_read_unknown() {
        let source = EmbeddedSource::new(SCRIPTS);
        let err = source.read("missing.sql").unwrap_err();
        assert!(matches!(
            err,
            DiscoveryError::ReadFailed { location, .. } if location == "bundled:missing.sql"
        ));
    }

    #[test]
    fn test_directory_lists_files_only() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.sql"), "SELECT 1;").unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();
        fs::create_dir(dir.path().join("nested.sql")).unwrap();

        let source = DirectorySource::new(dir.path());
        let mut names = source.list().unwrap();
        names.sort();
        assert_eq!(names, vec!["a.sql", "notes.txt"]);
        assert_eq!(source.read("a.sql").unwrap(), "SELECT 1;");
    }

    #[test]
    fn test_directory_missing_is_error() {
        let source = DirectorySource::new("/nonexistent/commander/sql");
        let err = source.list().unwrap_err();
        assert!(matches!(err, DiscoveryError::MissingLocation(_)));
    }

    #[test]
    fn test_directory_rejects_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bad.sql"), [0xff, 0xfe, 0x00]).unwrap();

        let source = DirectorySource::new(dir.path());
        let err = source.read("bad.sql").unwrap_err();
        assert!(matches!(err, DiscoveryError::ReadFailed { .. }));
    }
}
