//! Ordered, filtered, transactional execution of registered commands.
//!
//! Commands are collected in a [`CommandRegistry`] and frozen into a
//! [`Pipeline`] together with the command-name filter. Every call to
//! [`Pipeline::execute`] runs the surviving commands inside a single
//! [`UnitOfWork`]; the first failure stops the run and rolls the unit of
//! work back.
//!
//! # Example
//!
//! ```
//! use commander_core::{Command, CommandError, CommandRegistry, NameFilter, SqlExecutor};
//!
//! struct Touch;
//!
//! impl Command for Touch {
//!     fn name(&self) -> &str {
//!         "TOUCH"
//!     }
//!
//!     fn execute(&self, db: &dyn SqlExecutor) -> Result<(), CommandError> {
//!         db.execute("UPDATE heartbeat SET at = CURRENT_TIMESTAMP")
//!             .map(|_| ())
//!             .map_err(|e| CommandError::Failed(e.to_string()))
//!     }
//! }
//!
//! let pipeline = CommandRegistry::new()
//!     .register(Touch)
//!     .build(NameFilter::allow_all());
//! assert_eq!(pipeline.effective_commands(), vec!["TOUCH"]);
//! ```

use tracing::{debug, error, info};

use crate::command::{Command, SqlExecutor, UnitOfWork};
use crate::error::{PipelineError, Result};
use crate::filter::NameFilter;

/// Collects commands before the pipeline is assembled.
#[derive(Default)]
pub struct CommandRegistry {
    commands: Vec<Box<dyn Command>>,
}

impl CommandRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a command.
    pub fn register(mut self, command: impl Command + 'static) -> Self {
        self.commands.push(Box::new(command));
        self
    }

    /// Sorts the commands by [`Command::order`] and builds the pipeline.
    ///
    /// The sort is stable, so commands with equal order keep their
    /// registration order.
    pub fn build(mut self, filter: NameFilter) -> Pipeline {
        self.commands.sort_by_key(|command| command.order());
        Pipeline::new(self.commands, filter)
    }
}

/// Filters and executes an ordered list of commands.
pub struct Pipeline {
    commands: Vec<Box<dyn Command>>,
    filter: NameFilter,
}

impl Pipeline {
    /// Creates a pipeline that runs `commands` in the given order.
    pub fn new(commands: Vec<Box<dyn Command>>, filter: NameFilter) -> Self {
        info!(
            commands = %join_names(commands.iter().map(|c| c.name())),
            "registered (ordered) commands"
        );
        Self { commands, filter }
    }

    /// Names of all registered commands, in execution order.
    pub fn commands(&self) -> Vec<&str> {
        self.commands.iter().map(|c| c.name()).collect()
    }

    /// Names of the commands that survive the filter, in execution order.
    pub fn effective_commands(&self) -> Vec<&str> {
        self.effective().map(|c| c.name()).collect()
    }

    /// Runs every command that passes the filter inside one unit of work.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::CommandFailed`] for the first failing command
    /// (later commands are not attempted and the unit of work rolls back),
    /// or [`PipelineError::Transaction`] if the transaction itself fails.
    pub fn execute(&self, unit_of_work: &mut dyn UnitOfWork) -> Result<()> {
        let mut executed = 0usize;
        unit_of_work.run(&mut |db: &dyn SqlExecutor| {
            executed = 0;
            for command in self.effective() {
                debug!(command = command.name(), "executing command");
                if let Err(source) = command.execute(db) {
                    error!(command = command.name(), error = %source, "command failed");
                    return Err(PipelineError::CommandFailed {
                        command: command.name().to_string(),
                        source,
                    });
                }
                executed += 1;
            }
            Ok(())
        })?;
        info!(executed, "pipeline run committed");
        Ok(())
    }

    fn effective(&self) -> impl Iterator<Item = &dyn Command> {
        self.commands
            .iter()
            .map(|c| c.as_ref())
            .filter(|c| self.filter.matches(c.name()))
    }
}

fn join_names<'a>(names: impl Iterator<Item = &'a str>) -> String {
    names.collect::<Vec<_>>().join(",")
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::error::{CommandError, ExecutionError};

    /// Unit of work that stages statements and only keeps them on commit.
    #[derive(Default)]
    struct StagingDb {
        committed: Vec<String>,
        rollbacks: usize,
    }

    struct Staging<'a>(&'a RefCell<Vec<String>>);

    impl SqlExecutor for Staging<'_> {
        fn execute(&self, sql: &str) -> std::result::Result<usize, ExecutionError> {
            if sql.starts_with("FAIL") {
                return Err(ExecutionError::new(format!("rejected: {sql}")));
            }
            self.0.borrow_mut().push(sql.to_string());
            Ok(1)
        }
    }

    impl UnitOfWork for StagingDb {
        fn run(
            &mut self,
            work: &mut dyn FnMut(&dyn SqlExecutor) -> Result<()>,
        ) -> Result<()> {
            let staged = RefCell::new(Vec::new());
            match work(&Staging(&staged)) {
                Ok(()) => {
                    self.committed.extend(staged.into_inner());
                    Ok(())
                }
                Err(e) => {
                    self.rollbacks += 1;
                    Err(e)
                }
            }
        }
    }

    /// Command that issues one statement and records that it ran.
    struct Step {
        name: &'static str,
        order: i32,
        sql: &'static str,
        log: Arc<Mutex<Vec<&'static str>>>,
    }

    impl Command for Step {
        fn name(&self) -> &str {
            self.name
        }

        fn order(&self) -> i32 {
            self.order
        }

        fn execute(&self, db: &dyn SqlExecutor) -> std::result::Result<(), CommandError> {
            self.log.lock().unwrap().push(self.name);
            db.execute(self.sql)
                .map(|_| ())
                .map_err(|e| CommandError::Failed(e.to_string()))
        }
    }

    fn step(
        name: &'static str,
        order: i32,
        sql: &'static str,
        log: &Arc<Mutex<Vec<&'static str>>>,
    ) -> Step {
        Step {
            name,
            order,
            sql,
            log: Arc::clone(log),
        }
    }

    #[test]
    fn test_commands_run_in_order_and_commit() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let pipeline = CommandRegistry::new()
            .register(step("B", 1, "insert b", &log))
            .register(step("A", 0, "insert a", &log))
            .build(NameFilter::allow_all());

        let mut db = StagingDb::default();
        pipeline.execute(&mut db).unwrap();

        assert_eq!(*log.lock().unwrap(), vec!["A", "B"]);
        assert_eq!(db.committed, vec!["insert a", "insert b"]);
        assert_eq!(db.rollbacks, 0);
    }

    #[test]
    fn test_equal_order_keeps_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let pipeline = CommandRegistry::new()
            .register(step("X", 5, "x", &log))
            .register(step("Y", 5, "y", &log))
            .register(step("FIRST", i32::MIN, "first", &log))
            .build(NameFilter::allow_all());

        assert_eq!(pipeline.commands(), vec!["FIRST", "X", "Y"]);
    }

    #[test]
    fn test_failure_stops_run_and_rolls_back() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let pipeline = CommandRegistry::new()
            .register(step("A", 0, "insert a", &log))
            .register(step("B", 1, "FAIL b", &log))
            .register(step("C", 2, "insert c", &log))
            .build(NameFilter::allow_all());

        let mut db = StagingDb::default();
        let err = pipeline.execute(&mut db).unwrap_err();

        assert_eq!(err.command(), Some("B"));
        assert!(err.to_string().contains("command 'B' failed"));
        assert_eq!(*log.lock().unwrap(), vec!["A", "B"]);
        assert!(db.committed.is_empty());
        assert_eq!(db.rollbacks, 1);
    }

    #[test]
    fn test_excluded_command_is_skipped() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let pipeline = CommandRegistry::new()
            .register(step("SQL_SCRIPT", i32::MIN, "create", &log))
            .register(step("OTHER", 0, "other", &log))
            .build(NameFilter::parse("", "SQL_SCRIPT").unwrap());

        let mut db = StagingDb::default();
        pipeline.execute(&mut db).unwrap();

        assert_eq!(pipeline.effective_commands(), vec!["OTHER"]);
        assert_eq!(*log.lock().unwrap(), vec!["OTHER"]);
        assert_eq!(db.committed, vec!["other"]);
    }

    #[test]
    fn test_includes_limit_commands() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let pipeline = CommandRegistry::new()
            .register(step("A", 0, "a", &log))
            .register(step("B", 1, "b", &log))
            .register(step("C", 2, "c", &log))
            .build(NameFilter::parse("A,C", "C").unwrap());

        let mut db = StagingDb::default();
        pipeline.execute(&mut db).unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["A"]);
    }

    #[test]
    fn test_empty_pipeline_commits_nothing() {
        let pipeline = CommandRegistry::new().build(NameFilter::allow_all());
        let mut db = StagingDb::default();
        pipeline.execute(&mut db).unwrap();
        assert!(db.committed.is_empty());
        assert_eq!(db.rollbacks, 0);
    }
}
