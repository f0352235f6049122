//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations. Running without a subcommand is
//! the same as `cacheprobe run`.

pub mod dispatcher;
pub mod inventory;
pub mod list;
pub mod run;

pub use dispatcher::{Command, CommandContext, CommandDispatcher, CommandResult};
