//! SQL script discovery and execution.
//!
//! This crate provides the script side of the command runner:
//!
//! - **`source`**: where scripts come from: [`EmbeddedSource`] for scripts
//!   compiled into the binary and [`DirectorySource`] for an external
//!   directory.
//! - **`pattern`**: the `{prefix}*{suffix}.sql` file name pattern.
//! - **`repository`**: [`ScriptRepository`], which merges, filters, sorts
//!   and reads scripts from every source.
//! - **`split`**: [`split_statements`], a literal- and comment-aware
//!   statement splitter.
//! - **`command`**: [`SqlScriptCommand`], the `SQL_SCRIPT` command with its
//!   cache/reload policy.
//!
//! # Quick start
//!
//! ```no_run
//! use commander_core::{CommandRegistry, NameFilter};
//! use commander_scripts::{
//!     DirectorySource, LoadPolicy, ScriptPattern, ScriptRepository, SqlScriptCommand,
//! };
//!
//! let repository = ScriptRepository::new(ScriptPattern::any(), NameFilter::allow_all())
//!     .with_source(DirectorySource::new("sql/"));
//! let command = SqlScriptCommand::new(repository, LoadPolicy::Cached);
//! command.preload().unwrap();
//!
//! let pipeline = CommandRegistry::new()
//!     .register(command)
//!     .build(NameFilter::allow_all());
//! ```

mod command;
mod error;
mod pattern;
mod repository;
mod source;
mod split;

pub use command::{LoadPolicy, SqlScriptCommand};
pub use error::{DiscoveryError, Result};
pub use pattern::ScriptPattern;
pub use repository::{Script, ScriptRepository, discover};
pub use source::{DirectorySource, EmbeddedSource, ScriptSource};
pub use split::{SplitError, split_statements};
