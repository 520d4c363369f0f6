//! Single-statement execution on a SQLite connection.

use commander_core::{ExecutionError, SqlExecutor};
use rusqlite::Connection;

/// Runs statements on a borrowed connection (or transaction).
///
/// Statements that return rows (`SELECT`, some `PRAGMA`s) are stepped to
/// completion and their rows discarded.
#[derive(Clone, Copy)]
pub struct SqliteExecutor<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteExecutor<'c> {
    /// Wraps a connection. A [`rusqlite::Transaction`] derefs to one.
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }
}

impl SqlExecutor for SqliteExecutor<'_> {
    fn execute(&self, sql: &str) -> Result<usize, ExecutionError> {
        let mut stmt = self.conn.prepare(sql).map_err(to_error)?;
        if stmt.column_count() == 0 {
            return stmt.execute([]).map_err(to_error);
        }

        // Stepping the one prepared statement runs it exactly once.
        let mut rows = stmt.query([]).map_err(to_error)?;
        while rows.next().map_err(to_error)?.is_some() {}
        Ok(0)
    }
}

fn to_error(e: rusqlite::Error) -> ExecutionError {
    ExecutionError::with_source(e.to_string(), e)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execute_returns_changed_rows() {
        let conn = Connection::open_in_memory().unwrap();
        let executor = SqliteExecutor::new(&conn);
        executor.execute("CREATE TABLE t (id INTEGER)").unwrap();
        assert_eq!(executor.execute("INSERT INTO t VALUES (1)").unwrap(), 1);
        assert_eq!(
            executor.execute("INSERT INTO t SELECT id + 1 FROM t").unwrap(),
            1
        );
    }

    #[test]
    fn test_execute_accepts_queries() {
        let conn = Connection::open_in_memory().unwrap();
        let executor = SqliteExecutor::new(&conn);
        assert_eq!(executor.execute("SELECT 1").unwrap(), 0);
        assert_eq!(executor.execute("PRAGMA user_version").unwrap(), 0);
    }

    #[test]
    fn test_insert_returning_runs_once() {
        let conn = Connection::open_in_memory().unwrap();
        let executor = SqliteExecutor::new(&conn);
        executor
            .execute("CREATE TABLE t (id INTEGER PRIMARY KEY AUTOINCREMENT, v TEXT)")
            .unwrap();
        assert_eq!(
            executor
                .execute("INSERT INTO t (v) VALUES ('x') RETURNING id")
                .unwrap(),
            0
        );

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM t", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_execute_reports_sql_errors() {
        let conn = Connection::open_in_memory().unwrap();
        let executor = SqliteExecutor::new(&conn);
        let err = executor.execute("INSERT INTO missing VALUES (1)").unwrap_err();
        assert!(err.message().contains("no such table"));
    }
}
