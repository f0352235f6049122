//! Schema for the optional `.cacheprobe.yml` override file.
//!
//! Every field is optional; anything left out keeps its built-in default.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Top-level override file.
///
/// ```yaml
/// python: python3.12
/// test_package: six
/// cli:
///   name: agentic-iac
///   module: agentic_iac.cli
/// cache_dirs:
///   poetry: ~/.cache/pypoetry
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    /// Interpreter used for every Python probe.
    pub python: Option<String>,

    /// `major.minor` used to locate user site-packages.
    pub python_version: Option<String>,

    /// Node.js executable used for detection.
    pub node: Option<String>,

    /// Small package installed to exercise the pip cache.
    pub test_package: Option<String>,

    /// Module imported to confirm project sources are importable.
    pub project_import: Option<String>,

    /// Demo application used for the setup check.
    pub demo_name: Option<String>,

    /// Directory where reports are written (relative to project root).
    pub report_dir: Option<PathBuf>,

    /// Project CLI settings.
    pub cli: Option<CliSection>,

    /// Extra or replacement cache directories by name.
    pub cache_dirs: BTreeMap<String, PathBuf>,

    /// Timeout overrides in seconds.
    pub timeouts: Option<TimeoutSection>,
}

/// Project CLI settings.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CliSection {
    /// Executable in the project root.
    pub name: Option<String>,

    /// Module for the `python -m` fallback form.
    pub module: Option<String>,
}

/// Timeout overrides in seconds.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct TimeoutSection {
    pub command: Option<u64>,
    pub package_install: Option<u64>,
    pub manifest_install: Option<u64>,
    pub minimal_install: Option<u64>,
    pub quick: Option<u64>,
}
