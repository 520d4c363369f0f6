//! Command pipeline primitives for startup orchestration.
//!
//! This crate defines the pieces every command runner is assembled from:
//!
//! - [`Command`]: a named, ordered unit of work run by the pipeline.
//! - [`SqlExecutor`] and [`UnitOfWork`]: the two database capabilities
//!   commands consume (run one statement, run a closure inside a
//!   transaction).
//! - [`NameFilter`]: include/exclude filtering by name, shared by the
//!   command filter and the script filter.
//! - [`CommandRegistry`] / [`Pipeline`]: ordering, filtering and
//!   transactional execution with stop-on-first-failure.
//! - [`CommanderConfig`]: the YAML configuration read at startup.
//!
//! # Example
//!
//! ```
//! use commander_core::*;
//!
//! struct Noop;
//!
//! impl Command for Noop {
//!     fn name(&self) -> &str {
//!         "NOOP"
//!     }
//!
//!     fn execute(&self, _db: &dyn SqlExecutor) -> Result<(), CommandError> {
//!         Ok(())
//!     }
//! }
//!
//! let config = CommanderConfig::from_yaml_str("cmd:\n  excludes: NOOP\n").unwrap();
//! let pipeline = CommandRegistry::new()
//!     .register(Noop)
//!     .build(config.command_filter());
//! assert!(pipeline.effective_commands().is_empty());
//! ```

mod command;
mod config;
mod error;
mod filter;
mod pipeline;

pub use command::{Command, SqlExecutor, UnitOfWork};
pub use config::{
    CommandConfig, CommanderConfig, DEFAULT_BIND, DEFAULT_DATABASE_PATH, DEFAULT_DELIMITER,
    DatabaseConfig, ScriptConfig, ServerConfig,
};
pub use error::{BoxError, CommandError, ConfigError, ExecutionError, PipelineError};
pub use filter::NameFilter;
pub use pipeline::{CommandRegistry, Pipeline};
