//! Resolved, read-only configuration for one run.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::loader::load_overrides;
use crate::config::schema::ConfigFile;
use crate::error::{CacheProbeError, Result};

/// Cache directory name for pip's download/wheel cache.
pub const PIP_CACHE: &str = "pip";
/// Cache directory name for user site-packages.
pub const LOCAL_SITE_PACKAGES: &str = "local_site_packages";
/// Cache directory name for npm's cache.
pub const NPM_CACHE: &str = "npm";
/// Cache directory name for yarn's cache.
pub const YARN_CACHE: &str = "yarn";
/// Directory demo applications are set up into.
pub const DEMO_APPS: &str = "demo_apps";
/// Directory for test reports.
pub const TEST_REPORTS: &str = "test_reports";
/// Directory for logs.
pub const LOGS: &str = "logs";

/// A named directory inventoried in every report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheDirectory {
    pub name: String,
    pub path: PathBuf,
}

/// Timeouts applied to the external commands probes run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Version checks and other short commands.
    pub command: Duration,
    /// Single test package install.
    pub package_install: Duration,
    /// Full manifest install.
    pub manifest_install: Duration,
    /// Fallback install from the minimal manifest.
    pub minimal_install: Duration,
    /// CLI, demo runner and simulation invocations.
    pub quick: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            command: Duration::from_secs(60),
            package_install: Duration::from_secs(120),
            manifest_install: Duration::from_secs(300),
            minimal_install: Duration::from_secs(180),
            quick: Duration::from_secs(30),
        }
    }
}

/// Everything probes need to know about the environment, resolved once.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Project root; every command runs from here.
    pub project_root: PathBuf,
    /// User home directory.
    pub home: PathBuf,
    /// Python interpreter.
    pub python: String,
    /// `major.minor` used for the user site-packages path.
    pub python_version: String,
    /// Node.js executable.
    pub node: String,
    /// Package installed by the pip cache probe.
    pub test_package: String,
    /// Project CLI executable name.
    pub cli_name: String,
    /// Module for the `python -m` CLI fallback.
    pub cli_module: String,
    /// Module whose import proves project sources are importable.
    pub project_import: String,
    /// Demo used for the setup check.
    pub demo_name: String,
    /// Directory reports are written to.
    pub report_dir: PathBuf,
    /// Command timeouts.
    pub timeouts: Timeouts,
    cache_dirs: Vec<CacheDirectory>,
}

impl HarnessConfig {
    /// Built-in defaults for a project and home directory.
    pub fn new(project_root: impl Into<PathBuf>, home: impl Into<PathBuf>) -> Self {
        let project_root = project_root.into();
        let home = home.into();
        let python_version = "3.11".to_string();

        let cache_dirs = default_cache_dirs(&project_root, &home, &python_version);

        Self {
            report_dir: project_root.clone(),
            project_root,
            home,
            python: "python3".to_string(),
            python_version,
            node: "node".to_string(),
            test_package: "six".to_string(),
            cli_name: "agentic-iac".to_string(),
            cli_module: "agentic_iac.cli".to_string(),
            project_import: "agentic_iac.utils.logger".to_string(),
            demo_name: "simple-nodejs-api".to_string(),
            timeouts: Timeouts::default(),
            cache_dirs,
        }
    }

    /// Resolve configuration from the environment and override file.
    pub fn resolve(project_root: &Path, config_path: Option<&Path>) -> Result<Self> {
        let home = dirs::home_dir().ok_or(CacheProbeError::HomeNotFound)?;
        let overrides = load_overrides(project_root, config_path)?;
        Ok(Self::new(project_root, home).with_overrides(overrides))
    }

    /// Apply values from an override file.
    pub fn with_overrides(mut self, file: ConfigFile) -> Self {
        if let Some(python) = file.python {
            self.python = python;
        }
        if let Some(version) = file.python_version {
            self.python_version = version;
            self.cache_dirs =
                default_cache_dirs(&self.project_root, &self.home, &self.python_version);
        }
        if let Some(node) = file.node {
            self.node = node;
        }
        if let Some(package) = file.test_package {
            self.test_package = package;
        }
        if let Some(import) = file.project_import {
            self.project_import = import;
        }
        if let Some(demo) = file.demo_name {
            self.demo_name = demo;
        }
        if let Some(dir) = file.report_dir {
            self.report_dir = self.resolve_path(&dir);
        }
        if let Some(cli) = file.cli {
            if let Some(name) = cli.name {
                self.cli_name = name;
            }
            if let Some(module) = cli.module {
                self.cli_module = module;
            }
        }
        for (name, path) in file.cache_dirs {
            let path = self.resolve_path(&path);
            self.set_cache_dir(&name, path);
        }
        if let Some(t) = file.timeouts {
            let secs = |v: Option<u64>, current: Duration| v.map(Duration::from_secs).unwrap_or(current);
            self.timeouts = Timeouts {
                command: secs(t.command, self.timeouts.command),
                package_install: secs(t.package_install, self.timeouts.package_install),
                manifest_install: secs(t.manifest_install, self.timeouts.manifest_install),
                minimal_install: secs(t.minimal_install, self.timeouts.minimal_install),
                quick: secs(t.quick, self.timeouts.quick),
            };
        }
        self
    }

    /// Inventoried directories, in declaration order.
    pub fn cache_dirs(&self) -> &[CacheDirectory] {
        &self.cache_dirs
    }

    /// Path of a named cache directory.
    pub fn cache_dir(&self, name: &str) -> Option<&Path> {
        self.cache_dirs
            .iter()
            .find(|d| d.name == name)
            .map(|d| d.path.as_path())
    }

    /// Replace a named directory, or append it when new.
    pub fn set_cache_dir(&mut self, name: &str, path: PathBuf) {
        match self.cache_dirs.iter_mut().find(|d| d.name == name) {
            Some(existing) => existing.path = path,
            None => self.cache_dirs.push(CacheDirectory {
                name: name.to_string(),
                path,
            }),
        }
    }

    /// Remove every inventoried directory.
    pub fn clear_cache_dirs(&mut self) {
        self.cache_dirs.clear();
    }

    /// pip cache path; falls back to the default location when unconfigured.
    pub fn pip_cache(&self) -> PathBuf {
        self.cache_dir(PIP_CACHE)
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.home.join(".cache").join("pip"))
    }

    /// npm cache path; falls back to the default location when unconfigured.
    pub fn npm_cache(&self) -> PathBuf {
        self.cache_dir(NPM_CACHE)
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.home.join(".npm"))
    }

    /// Directory demos are set up into.
    pub fn demo_apps_dir(&self) -> PathBuf {
        self.cache_dir(DEMO_APPS)
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.project_root.join("demo-apps"))
    }

    /// Project source directory added to `PYTHONPATH`.
    pub fn src_dir(&self) -> PathBuf {
        self.project_root.join("src")
    }

    fn resolve_path(&self, path: &Path) -> PathBuf {
        if let Ok(rest) = path.strip_prefix("~") {
            self.home.join(rest)
        } else if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_root.join(path)
        }
    }
}

fn default_cache_dirs(project_root: &Path, home: &Path, python_version: &str) -> Vec<CacheDirectory> {
    let dir = |name: &str, path: PathBuf| CacheDirectory {
        name: name.to_string(),
        path,
    };
    vec![
        dir(PIP_CACHE, home.join(".cache").join("pip")),
        dir(
            LOCAL_SITE_PACKAGES,
            home.join(".local")
                .join("lib")
                .join(format!("python{}", python_version))
                .join("site-packages"),
        ),
        dir(NPM_CACHE, home.join(".npm")),
        dir(YARN_CACHE, home.join(".yarn").join("cache")),
        dir(DEMO_APPS, project_root.join("demo-apps")),
        dir(TEST_REPORTS, project_root.join("test-reports")),
        dir(LOGS, project_root.join("logs")),
    ]
}
