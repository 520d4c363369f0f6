//! The `SQL_SCRIPT` command.
//!
//! Wraps a [`ScriptRepository`] behind the [`Command`] contract. In
//! [`LoadPolicy::Cached`] mode scripts are discovered once and the same
//! list is executed on every run; in [`LoadPolicy::AlwaysReload`] mode they
//! are rediscovered on every run.
//!
//! A successful discovery is cached even when it finds nothing, so an empty
//! script set never triggers another discovery. A failed discovery is not
//! cached and is retried on the next run.

use std::sync::{Arc, Mutex, PoisonError};

use commander_core::{Command, CommandError, DEFAULT_DELIMITER, SqlExecutor};
use tracing::{debug, error, info};

use crate::error::Result;
use crate::repository::{Script, ScriptRepository};
use crate::split::split_statements;

/// When scripts are (re)discovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPolicy {
    /// Discover once, then reuse the result on every run.
    #[default]
    Cached,
    /// Discover again on every run.
    AlwaysReload,
}

impl LoadPolicy {
    /// Maps the `script.always-reload` flag to a policy.
    pub fn from_always_reload(always_reload: bool) -> Self {
        if always_reload {
            Self::AlwaysReload
        } else {
            Self::Cached
        }
    }
}

/// Runs every discovered SQL script, statement by statement.
pub struct SqlScriptCommand {
    repository: ScriptRepository,
    policy: LoadPolicy,
    delimiter: String,
    cache: Mutex<Option<Arc<[Script]>>>,
}

impl SqlScriptCommand {
    /// Name used by the command filter.
    pub const NAME: &'static str = "SQL_SCRIPT";

    /// Creates the command. Nothing is discovered until [`preload`] or the
    /// first run.
    ///
    /// [`preload`]: Self::preload
    pub fn new(repository: ScriptRepository, policy: LoadPolicy) -> Self {
        Self {
            repository,
            policy,
            delimiter: DEFAULT_DELIMITER.to_string(),
            cache: Mutex::new(None),
        }
    }

    /// Overrides the statement delimiter.
    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    /// The active load policy.
    pub fn policy(&self) -> LoadPolicy {
        self.policy
    }

    /// Discovers and caches scripts ahead of the first run.
    ///
    /// Returns the number of cached scripts. Does nothing and returns `0` in
    /// [`LoadPolicy::AlwaysReload`] mode.
    ///
    /// # Errors
    ///
    /// Returns the discovery error; nothing is cached in that case.
    pub fn preload(&self) -> Result<usize> {
        match self.policy {
            LoadPolicy::AlwaysReload => Ok(0),
            LoadPolicy::Cached => self.cached_scripts().map(|scripts| scripts.len()),
        }
    }

    /// Returns the scripts the next run would execute.
    ///
    /// In cached mode this fills the cache if it is empty.
    pub fn scripts(&self) -> Result<Arc<[Script]>> {
        match self.policy {
            LoadPolicy::AlwaysReload => self.repository.discover().map(Arc::from),
            LoadPolicy::Cached => self.cached_scripts(),
        }
    }

    fn cached_scripts(&self) -> Result<Arc<[Script]>> {
        // Held across discovery so concurrent callers never discover twice.
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(scripts) = cache.as_ref() {
            return Ok(Arc::clone(scripts));
        }

        let scripts: Arc<[Script]> = self.repository.discover()?.into();
        info!(
            count = scripts.len(),
            scripts = %scripts.iter().map(|s| s.name.as_str()).collect::<Vec<_>>().join(","),
            "loaded scripts"
        );
        *cache = Some(Arc::clone(&scripts));
        Ok(scripts)
    }

    fn run_script(
        &self,
        script: &Script,
        db: &dyn SqlExecutor,
    ) -> std::result::Result<(), CommandError> {
        debug!(script = %script.name, location = %script.location, "executing script");
        let statements = split_statements(&script.body, &self.delimiter)
            .map_err(|e| CommandError::Failed(format!("script '{}': {e}", script.name)))?;

        for (index, statement) in statements.into_iter().enumerate() {
            if let Err(source) = db.execute(&statement) {
                error!(
                    script = %script.name,
                    statement = index + 1,
                    error = %source,
                    "statement failed"
                );
                return Err(CommandError::Statement {
                    script: script.name.clone(),
                    index: index + 1,
                    statement,
                    source,
                });
            }
        }
        Ok(())
    }
}

impl Command for SqlScriptCommand {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn order(&self) -> i32 {
        i32::MIN
    }

    fn execute(&self, db: &dyn SqlExecutor) -> std::result::Result<(), CommandError> {
        let scripts = self.scripts().map_err(|e| {
            error!(error = %e, "script discovery failed");
            CommandError::from(e)
        })?;
        for script in scripts.iter() {
            self.run_script(script, db)?;
        }
        Ok(())
    }
}
