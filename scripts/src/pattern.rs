//! File name pattern `{prefix}*{suffix}.sql`.

use commander_core::ConfigError;
use regex::Regex;

/// Matches script file names of the form `{prefix}*{suffix}.sql`.
///
/// The wildcard matches any run of characters (including none) except a
/// path separator. Both fragments are literal.
///
/// # Examples
///
/// ```
/// # use commander_scripts::ScriptPattern;
/// let pattern = ScriptPattern::new("V", "_data").unwrap();
/// assert!(pattern.matches("V1_data.sql"));
/// assert!(!pattern.matches("V1_schema.sql"));
/// assert_eq!(pattern.glob(), "V*_data.sql");
/// ```
#[derive(Debug, Clone)]
pub struct ScriptPattern {
    prefix: String,
    suffix: String,
    regex: Regex,
}

impl ScriptPattern {
    /// Builds a pattern from its fixed fragments.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPattern`] if either fragment contains
    /// `/`, `\` or `*`.
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Result<Self, ConfigError> {
        let prefix = prefix.into();
        let suffix = suffix.into();
        for fragment in [&prefix, &suffix] {
            if fragment.contains(['/', '\\', '*']) {
                return Err(ConfigError::InvalidPattern(fragment.clone()));
            }
        }
        let source = format!(
            r"^{}[^/\\]*{}\.sql$",
            regex::escape(&prefix),
            regex::escape(&suffix)
        );
        // Both fragments are escaped, so the expression is always valid.
        let regex = Regex::new(&source).map_err(|_| ConfigError::InvalidPattern(source.clone()))?;
        Ok(Self {
            prefix,
            suffix,
            regex,
        })
    }

    /// Pattern matching every `*.sql` file.
    pub fn any() -> Self {
        Self::new("", "").unwrap_or_else(|_| unreachable!("empty fragments are valid"))
    }

    /// Returns `true` if `file_name` matches.
    pub fn matches(&self, file_name: &str) -> bool {
        self.regex.is_match(file_name)
    }

    /// Glob form of the pattern, for logs.
    pub fn glob(&self) -> String {
        format!("{}*{}.sql", self.prefix, self.suffix)
    }
}

impl Default for ScriptPattern {
    fn default() -> Self {
        Self::any()
    }
}
