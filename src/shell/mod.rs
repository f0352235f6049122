//! External process execution and platform helpers.

pub mod command;
pub mod platform;
pub mod signal;

pub use command::{
    CommandResult, CommandSpec, ProcessRunner, DEFAULT_TIMEOUT, SYNTHETIC_EXIT_CODE,
};
pub use platform::{is_ci, is_writable, make_executable, CI_ENV_VARS};
pub use signal::{install_interrupt_handler, interrupted, CancellationToken};
