//! Runner for the startup command pipeline.
//!
//! The `commander` binary loads [`CommanderConfig`](commander_core::CommanderConfig),
//! registers its commands ([`app::build_pipeline`]) and either runs the
//! pipeline once or serves the `POST /execute` trigger ([`server`]).

pub mod app;
mod bundled;
pub mod error;
pub mod server;

pub use bundled::BUNDLED_SCRIPTS;
