//! Harness configuration.
//!
//! - Override file schema in [`schema`]
//! - File discovery and loading in [`loader`]
//! - The resolved, read-only [`HarnessConfig`] in [`harness`]
//!
//! Configuration is resolved once at startup and passed explicitly to the
//! orchestrator and probes.
//!
//! # Example
//!
//! ```
//! use cacheprobe::config::{HarnessConfig, PIP_CACHE};
//!
//! let config = HarnessConfig::new("/work/project", "/home/dev");
//! assert_eq!(
//!     config.cache_dir(PIP_CACHE),
//!     Some(std::path::Path::new("/home/dev/.cache/pip"))
//! );
//! ```

pub mod harness;
pub mod loader;
pub mod schema;

pub use harness::{
    CacheDirectory, HarnessConfig, Timeouts, DEMO_APPS, LOCAL_SITE_PACKAGES, LOGS, NPM_CACHE,
    PIP_CACHE, TEST_REPORTS, YARN_CACHE,
};
pub use loader::{find_config_file, load_config_file, load_overrides, CONFIG_FILE_NAME};
pub use schema::{CliSection, ConfigFile, TimeoutSection};
