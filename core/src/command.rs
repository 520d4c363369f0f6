//! The command contract and the two database capabilities commands rely on.

use crate::error::{CommandError, ExecutionError, PipelineError};

/// Runs one SQL statement.
///
/// Implementations are handed to commands for the duration of a single
/// unit of work, so every statement issued through them belongs to the
/// same transaction.
pub trait SqlExecutor {
    /// Executes `sql` and returns the number of affected rows.
    fn execute(&self, sql: &str) -> Result<usize, ExecutionError>;
}

/// Runs a unit of work inside a transaction.
///
/// The transaction commits when `work` returns `Ok` and rolls back when it
/// returns `Err`; the error is passed through unchanged.
pub trait UnitOfWork {
    /// Opens a transaction, runs `work` against it and commits or rolls back.
    fn run(
        &mut self,
        work: &mut dyn FnMut(&dyn SqlExecutor) -> Result<(), PipelineError>,
    ) -> Result<(), PipelineError>;
}

/// A named, orderable unit of startup work.
///
/// Commands are built once with their configuration baked in and executed
/// on every pipeline run. `execute` takes `&self`; any state a command keeps
/// between runs needs interior mutability.
pub trait Command: Send + Sync {
    /// Stable identifier used by the command filter.
    fn name(&self) -> &str;

    /// Position in the pipeline. Lower values run first.
    fn order(&self) -> i32 {
        0
    }

    /// Runs the command against the current transaction.
    fn execute(&self, db: &dyn SqlExecutor) -> Result<(), CommandError>;
}
