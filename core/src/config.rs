//! Static configuration read once at startup.
//!
//! # Example YAML
//!
//! ```yaml
//! cmd:
//!   includes: ""
//!   excludes: SQL_SCRIPT
//! script:
//!   includes: [001_init.sql, 002_seed.sql]
//!   excludes: ""
//!   prefix: "0"
//!   suffix: ""
//!   path: /etc/commander/sql
//!   always-reload: false
//!   delimiter: ";"
//! database:
//!   path: commander.db
//! server:
//!   bind: 127.0.0.1:8080
//! ```
//!
//! Name lists accept either a comma-separated string or a YAML sequence.
//! Every key is optional.

use std::collections::BTreeSet;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer};

use crate::error::ConfigError;
use crate::filter::{NameFilter, parse_list};

/// Default statement delimiter.
pub const DEFAULT_DELIMITER: &str = ";";

/// Default SQLite database file.
pub const DEFAULT_DATABASE_PATH: &str = "commander.db";

/// Default HTTP listen address.
pub const DEFAULT_BIND: &str = "127.0.0.1:8080";

/// Command-name filter settings (`cmd.*`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CommandConfig {
    /// Only these commands run (empty = all).
    #[serde(deserialize_with = "name_list")]
    pub includes: Vec<String>,
    /// These commands never run.
    #[serde(deserialize_with = "name_list")]
    pub excludes: Vec<String>,
}

/// Script discovery and execution settings (`script.*`).
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct ScriptConfig {
    /// Only these script file names run (empty = all).
    #[serde(deserialize_with = "name_list")]
    pub includes: Vec<String>,
    /// These script file names never run.
    #[serde(deserialize_with = "name_list")]
    pub excludes: Vec<String>,
    /// Fixed start of matching file names.
    pub prefix: String,
    /// Fixed end of matching file names, before `.sql`.
    pub suffix: String,
    /// External directory scanned in addition to the bundled scripts.
    #[serde(deserialize_with = "optional_path")]
    pub path: Option<PathBuf>,
    /// Rediscover scripts on every run instead of caching the first load.
    pub always_reload: bool,
    /// Statement delimiter.
    pub delimiter: String,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            includes: Vec::new(),
            excludes: Vec::new(),
            prefix: String::new(),
            suffix: String::new(),
            path: None,
            always_reload: false,
            delimiter: DEFAULT_DELIMITER.to_string(),
        }
    }
}

/// Database connection settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    /// SQLite database file.
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DATABASE_PATH),
        }
    }
}

/// HTTP trigger settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Listen address, `host:port`.
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

/// Top-level configuration.
///
/// # Examples
///
/// ```
/// use commander_core::CommanderConfig;
///
/// let config = CommanderConfig::from_yaml_str("cmd:\n  excludes: SQL_SCRIPT\n").unwrap();
/// assert!(!config.command_filter().matches("SQL_SCRIPT"));
/// assert!(!config.script.always_reload);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CommanderConfig {
    /// `cmd.*` settings.
    pub cmd: CommandConfig,
    /// `script.*` settings.
    pub script: ScriptConfig,
    /// `database.*` settings.
    pub database: DatabaseConfig,
    /// `server.*` settings.
    pub server: ServerConfig,
}

impl CommanderConfig {
    /// Loads and validates configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if it does not parse, or a validation error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = std::fs::File::open(path)?;
        let config: Self = serde_yaml::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    /// Parses and validates configuration from a YAML string.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks invariants that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.script.delimiter.is_empty() {
            return Err(ConfigError::InvalidDelimiter);
        }
        for fragment in [&self.script.prefix, &self.script.suffix] {
            if fragment.contains(['/', '\\', '*']) {
                return Err(ConfigError::InvalidPattern(fragment.clone()));
            }
        }
        Ok(())
    }

    /// Filter applied to command names.
    pub fn command_filter(&self) -> NameFilter {
        NameFilter::from_lists(self.cmd.includes.clone(), self.cmd.excludes.clone())
    }

    /// Filter applied to script file names.
    pub fn script_filter(&self) -> NameFilter {
        NameFilter::from_lists(self.script.includes.clone(), self.script.excludes.clone())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawNameList {
    Csv(String),
    List(Vec<String>),
}

fn name_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawNameList>::deserialize(deserializer)?;
    let names = match raw {
        None => return Ok(Vec::new()),
        Some(RawNameList::Csv(s)) => parse_list(&s),
        Some(RawNameList::List(items)) => items
            .iter()
            .map(|item| match item.trim() {
                "" => Err(ConfigError::InvalidFilter(format!("[{}]", items.join(", ")))),
                name => Ok(name.to_string()),
            })
            .collect::<Result<BTreeSet<_>, _>>(),
    };
    names
        .map(|set| set.into_iter().collect())
        .map_err(serde::de::Error::custom)
}

fn optional_path<'de, D>(deserializer: D) -> Result<Option<PathBuf>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.trim().is_empty()).map(PathBuf::from))
}
