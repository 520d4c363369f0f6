//! Assembles the command pipeline from configuration.
//!
//! Registration is explicit: every command the binary knows about is added
//! to the [`CommandRegistry`] in [`build_pipeline`], and the registry orders
//! them by [`Command::order`](commander_core::Command::order).

use commander_core::{CommandRegistry, CommanderConfig, Pipeline};
use commander_scripts::{
    DirectorySource, EmbeddedSource, LoadPolicy, ScriptPattern, ScriptRepository, SqlScriptCommand,
};
use commander_sqlite::SqliteUnitOfWork;
use tracing::info;

use crate::bundled::BUNDLED_SCRIPTS;
use crate::error::AppResult;

/// Builds the script repository described by `config`.
///
/// `bundled` is the embedded script table; the binary passes the scripts
/// compiled in by its build script.
pub fn script_repository(
    config: &CommanderConfig,
    bundled: &'static [(&'static str, &'static str)],
) -> AppResult<ScriptRepository> {
    let pattern = ScriptPattern::new(&config.script.prefix, &config.script.suffix)?;
    let mut repository = ScriptRepository::new(pattern, config.script_filter())
        .with_source(EmbeddedSource::new(bundled));
    if let Some(path) = &config.script.path {
        repository = repository.with_source(DirectorySource::new(path));
    }
    Ok(repository)
}

/// Builds the `SQL_SCRIPT` command and, in cache mode, loads its scripts.
///
/// # Errors
///
/// Discovery errors are fatal here in cache mode; in reload mode they
/// surface on the first run instead.
pub fn sql_script_command(
    config: &CommanderConfig,
    bundled: &'static [(&'static str, &'static str)],
) -> AppResult<SqlScriptCommand> {
    let repository = script_repository(config, bundled)?;
    let sources = repository.source_labels().join(",");
    let pattern = repository.pattern().glob();
    let command = SqlScriptCommand::new(
        repository,
        LoadPolicy::from_always_reload(config.script.always_reload),
    )
    .with_delimiter(&config.script.delimiter);
    info!(%sources, %pattern, policy = ?command.policy(), "configured script sources");
    command.preload()?;
    Ok(command)
}

/// Registers every command and builds the filtered pipeline.
pub fn build_pipeline(
    config: &CommanderConfig,
    bundled: &'static [(&'static str, &'static str)],
) -> AppResult<Pipeline> {
    let filter = config.command_filter();
    info!(
        includes = %filter.includes().collect::<Vec<_>>().join(","),
        excludes = %filter.excludes().collect::<Vec<_>>().join(","),
        "command filter"
    );
    let registry = CommandRegistry::new().register(sql_script_command(config, bundled)?);
    Ok(registry.build(filter))
}

/// A pipeline paired with the connection it runs against.
pub struct Runner {
    pipeline: Pipeline,
    unit_of_work: SqliteUnitOfWork,
}

impl Runner {
    /// Pairs an assembled pipeline with a unit of work.
    pub fn new(pipeline: Pipeline, unit_of_work: SqliteUnitOfWork) -> Self {
        Self {
            pipeline,
            unit_of_work,
        }
    }

    /// Builds the pipeline from `config` with the compiled-in scripts and
    /// opens the configured database.
    pub fn from_config(config: &CommanderConfig) -> AppResult<Self> {
        let pipeline = build_pipeline(config, BUNDLED_SCRIPTS)?;
        let unit_of_work = SqliteUnitOfWork::open(&config.database.path)?;
        info!(database = %config.database.path.display(), "opened database");
        Ok(Self::new(pipeline, unit_of_work))
    }

    /// The assembled pipeline.
    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Runs the pipeline once.
    pub fn run(&mut self) -> AppResult<()> {
        self.pipeline.execute(&mut self.unit_of_work)?;
        Ok(())
    }

    /// Consumes the runner and returns its unit of work.
    pub fn into_unit_of_work(self) -> SqliteUnitOfWork {
        self.unit_of_work
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::error::AppError;

    static BUNDLED: &[(&str, &str)] = &[
        ("002_seed.sql", "INSERT INTO t VALUES (1);INSERT INTO t VALUES (2);"),
        ("001_init.sql", "CREATE TABLE t (id INTEGER PRIMARY KEY);"),
    ];

    #[test]
    fn test_pipeline_contains_sql_script() {
        let config = CommanderConfig::default();
        let pipeline = build_pipeline(&config, BUNDLED).unwrap();
        assert_eq!(pipeline.commands(), vec!["SQL_SCRIPT"]);
        assert_eq!(pipeline.effective_commands(), vec!["SQL_SCRIPT"]);
    }

    #[test]
    fn test_policy_follows_always_reload() {
        let cached = sql_script_command(&CommanderConfig::default(), BUNDLED).unwrap();
        assert_eq!(cached.policy(), LoadPolicy::Cached);

        let config = CommanderConfig::from_yaml_str("script:\n  always-reload: true\n").unwrap();
        let reload = sql_script_command(&config, BUNDLED).unwrap();
        assert_eq!(reload.policy(), LoadPolicy::AlwaysReload);
    }

    #[test]
    fn test_command_filter_from_config() {
        let config = CommanderConfig::from_yaml_str("cmd:\n  excludes: SQL_SCRIPT\n").unwrap();
        let pipeline = build_pipeline(&config, BUNDLED).unwrap();
        assert!(pipeline.effective_commands().is_empty());
    }

    #[test]
    fn test_external_path_is_added_after_bundled() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("001_init.sql"), "SELECT 1;").unwrap();
        let yaml = format!("script:\n  path: {}\n", dir.path().display());
        let config = CommanderConfig::from_yaml_str(&yaml).unwrap();

        let repository = script_repository(&config, BUNDLED).unwrap();
        let labels = repository.source_labels();
        assert_eq!(labels[0], "bundled");
        assert_eq!(labels.len(), 2);

        let names: Vec<String> = repository
            .discover()
            .unwrap()
            .into_iter()
            .map(|s| s.location)
            .collect();
        assert_eq!(names[0], "bundled:001_init.sql");
        assert!(names[1].ends_with("001_init.sql"));
        assert_eq!(names[2], "bundled:002_seed.sql");
    }

    #[test]
    fn test_missing_external_path_is_fatal_in_cache_mode() {
        let yaml = "script:\n  path: /nonexistent/commander/sql\n";
        let config = CommanderConfig::from_yaml_str(yaml).unwrap();
        let err = build_pipeline(&config, BUNDLED)
            .err()
            .expect("expected build_pipeline to fail");
        assert!(matches!(err, AppError::Discovery(_)));
    }

    #[test]
    fn test_missing_external_path_is_deferred_in_reload_mode() {
        let config = CommanderConfig::from_yaml_str(
            "script:\n  path: /nonexistent/commander/sql\n  always-reload: true\n",
        )
        .unwrap();
        let pipeline = build_pipeline(&config, BUNDLED).unwrap();
        let mut runner = Runner::new(pipeline, SqliteUnitOfWork::open_in_memory().unwrap());
        let err = runner.run().unwrap_err();
        assert!(matches!(err, AppError::Pipeline(_)));
    }

    #[test]
    fn test_runner_executes_scripts() {
        let pipeline = build_pipeline(&CommanderConfig::default(), BUNDLED).unwrap();
        let mut runner = Runner::new(pipeline, SqliteUnitOfWork::open_in_memory().unwrap());
        runner.run().unwrap();

        let conn = runner.into_unit_of_work().into_connection();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM t", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 2);
    }
}
