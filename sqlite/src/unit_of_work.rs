//! Transactional unit of work backed by a SQLite connection.
//!
//! # Example
//!
//! ```no_run
//! use commander_core::{CommandRegistry, NameFilter};
//! use commander_sqlite::SqliteUnitOfWork;
//!
//! let mut unit_of_work = SqliteUnitOfWork::open("commander.db").unwrap();
//! let pipeline = CommandRegistry::new().build(NameFilter::allow_all());
//! pipeline.execute(&mut unit_of_work).unwrap();
//! ```

use std::path::Path;

use commander_core::{ExecutionError, PipelineError, SqlExecutor, UnitOfWork};
use rusqlite::{Connection, TransactionBehavior};
use tracing::{debug, warn};

use crate::error::Result;
use crate::executor::SqliteExecutor;

/// Owns a connection and runs each unit of work in its own transaction.
///
/// Transactions are opened `IMMEDIATE`, so the write lock is taken before
/// the first command runs. SQLite DDL is transactional: a failed run leaves
/// tables created earlier in the same run rolled back as well.
pub struct SqliteUnitOfWork {
    conn: Connection,
}

impl SqliteUnitOfWork {
    /// Wraps an existing connection and enables foreign key enforcement.
    pub fn new(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self { conn })
    }

    /// Opens (or creates) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::new(Connection::open(path)?)
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        Self::new(Connection::open_in_memory()?)
    }

    /// Returns a reference to the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Consumes the unit of work and returns the underlying connection.
    pub fn into_connection(self) -> Connection {
        self.conn
    }
}

impl UnitOfWork for SqliteUnitOfWork {
    fn run(
        &mut self,
        work: &mut dyn FnMut(&dyn SqlExecutor) -> std::result::Result<(), PipelineError>,
    ) -> std::result::Result<(), PipelineError> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| {
                PipelineError::Transaction(ExecutionError::with_source(
                    format!("failed to begin transaction: {e}"),
                    e,
                ))
            })?;

        match work(&SqliteExecutor::new(&tx)) {
            Ok(()) => {
                tx.commit().map_err(|e| {
                    PipelineError::Transaction(ExecutionError::with_source(
                        format!("failed to commit transaction: {e}"),
                        e,
                    ))
                })?;
                debug!("transaction committed");
                Ok(())
            }
            Err(err) => {
                match tx.rollback() {
                    Ok(()) => debug!("transaction rolled back"),
                    Err(e) => warn!(error = %e, "failed to roll back transaction"),
                }
                Err(err)
            }
        }
    }
}
