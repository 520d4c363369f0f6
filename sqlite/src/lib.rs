//! SQLite backend for the command pipeline.
//!
//! This crate implements the two database capabilities the pipeline
//! consumes:
//!
//! - **`executor`**: [`SqliteExecutor`], a
//!   [`SqlExecutor`](commander_core::SqlExecutor) over a borrowed connection.
//! - **`unit_of_work`**: [`SqliteUnitOfWork`], a
//!   [`UnitOfWork`](commander_core::UnitOfWork) that owns the connection and
//!   wraps every pipeline run in one transaction.
//!
//! # Quick start
//!
//! ```no_run
//! use commander_core::{CommandRegistry, NameFilter};
//! use commander_scripts::{EmbeddedSource, LoadPolicy, ScriptPattern, ScriptRepository, SqlScriptCommand};
//! use commander_sqlite::SqliteUnitOfWork;
//!
//! static SCRIPTS: &[(&str, &str)] = &[("001_init.sql", "CREATE TABLE IF NOT EXISTS t (id INTEGER);")];
//!
//! let repository = ScriptRepository::new(ScriptPattern::any(), NameFilter::allow_all())
//!     .with_source(EmbeddedSource::new(SCRIPTS));
//! let pipeline = CommandRegistry::new()
//!     .register(SqlScriptCommand::new(repository, LoadPolicy::Cached))
//!     .build(NameFilter::allow_all());
//!
//! let mut unit_of_work = SqliteUnitOfWork::open("commander.db").unwrap();
//! pipeline.execute(&mut unit_of_work).unwrap();
//! ```

mod error;
mod executor;
mod unit_of_work;

pub use error::{Result, SqliteError};
pub use executor::SqliteExecutor;
pub use unit_of_work::SqliteUnitOfWork;
