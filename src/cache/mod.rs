//! Cache directory measurement.
//!
//! [`DirectorySizer`] turns a path into a human-readable size, and
//! [`CacheInventory`] snapshots every configured cache directory for the
//! report and the `inventory` command.

pub mod inventory;
pub mod size;

pub use inventory::{CacheDirectoryInfo, CacheInventory};
pub use size::{format_size, DirectorySizer, UNKNOWN_SIZE, ZERO_SIZE};
