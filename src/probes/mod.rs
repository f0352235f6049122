//! Diagnostic probes.
//!
//! A [`Probe`] is one independently runnable check that produces a
//! [`ProbeResult`]. Expected failures (a missing dependency, a failing
//! command) are reported through the result's status; an `Err` from
//! [`Probe::run`] means the probe itself is defective, and the orchestrator
//! turns it into a synthetic `failed` result.
//!
//! # Modules
//!
//! - [`result`] - Result records and status classification
//! - [`python_env`], [`pip_cache`], [`requirements`], [`imports`] - Python toolchain checks
//! - [`demo_apps`], [`cli_commands`] - Project executables
//! - [`nodejs`] - Secondary ecosystem detection
//! - [`ci_simulation`] - CI environment simulation

pub mod ci_simulation;
pub mod cli_commands;
pub mod demo_apps;
pub mod imports;
pub mod nodejs;
pub mod pip_cache;
pub mod python_env;
pub mod requirements;
pub mod result;

pub use ci_simulation::CiSimulationProbe;
pub use cli_commands::CliCommandsProbe;
pub use demo_apps::DemoApplicationsProbe;
pub use imports::PythonImportsProbe;
pub use nodejs::NodeDetectionProbe;
pub use pip_cache::PipCacheProbe;
pub use python_env::PythonEnvironmentProbe;
pub use requirements::RequirementsInstallProbe;
pub use result::{truncate, ProbeResult, ProbeStatus, ProbeTimer};

use std::ffi::OsString;
use std::sync::LazyLock;

use regex::Regex;

use crate::cache::DirectorySizer;
use crate::config::HarnessConfig;
use crate::error::Result;
use crate::shell::{CommandSpec, ProcessRunner};

static VERSION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"v?(\d+\.\d+(?:\.\d+)?)").expect("VERSION_REGEX must compile"));

/// Shared, read-only collaborators handed to every probe.
#[derive(Debug, Clone, Copy)]
pub struct ProbeContext<'a> {
    pub config: &'a HarnessConfig,
    pub runner: &'a ProcessRunner,
    pub sizer: &'a DirectorySizer,
}

impl<'a> ProbeContext<'a> {
    /// Bundle the collaborators.
    pub fn new(
        config: &'a HarnessConfig,
        runner: &'a ProcessRunner,
        sizer: &'a DirectorySizer,
    ) -> Self {
        Self {
            config,
            runner,
            sizer,
        }
    }

    /// An interpreter invocation with the command timeout.
    pub fn python(&self) -> CommandSpec {
        CommandSpec::new(self.config.python.clone()).timeout(self.config.timeouts.command)
    }

    /// `PYTHONPATH` with the project's `src` directory prepended.
    pub fn python_path(&self) -> OsString {
        let mut entries = vec![self.config.src_dir()];
        if let Some(existing) = std::env::var_os("PYTHONPATH") {
            entries.extend(std::env::split_paths(&existing));
        }
        std::env::join_paths(entries).unwrap_or_else(|_| self.config.src_dir().into_os_string())
    }
}

/// One diagnostic check.
pub trait Probe {
    /// Identifier used in results and reports.
    fn name(&self) -> &str;

    /// Human-readable title for progress output.
    fn title(&self) -> &str;

    /// Run the check.
    fn run(&self, ctx: &ProbeContext<'_>) -> Result<ProbeResult>;
}

/// A probe backed by a closure, for ad-hoc checks and tests.
pub struct FnProbe<F> {
    name: String,
    title: String,
    body: F,
}

impl<F> FnProbe<F>
where
    F: Fn(&ProbeContext<'_>) -> Result<ProbeResult>,
{
    /// Create a probe from a closure.
    pub fn new(name: impl Into<String>, title: impl Into<String>, body: F) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            body,
        }
    }
}

impl<F> Probe for FnProbe<F>
where
    F: Fn(&ProbeContext<'_>) -> Result<ProbeResult>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn run(&self, ctx: &ProbeContext<'_>) -> Result<ProbeResult> {
        (self.body)(ctx)
    }
}

/// The eight built-in probes, in declaration order.
///
/// Order matters: later probes may rely on artifacts left by earlier ones
/// (for example the CI simulation imports packages the install probes
/// provided).
pub fn default_probes() -> Vec<Box<dyn Probe>> {
    vec![
        Box::new(PythonEnvironmentProbe),
        Box::new(PipCacheProbe),
        Box::new(RequirementsInstallProbe),
        Box::new(PythonImportsProbe),
        Box::new(DemoApplicationsProbe),
        Box::new(CliCommandsProbe),
        Box::new(NodeDetectionProbe),
        Box::new(CiSimulationProbe),
    ]
}

/// Extract a dotted version number from tool output.
///
/// Falls back to the trimmed text when no version-like token is present.
pub fn extract_version(output: &str) -> String {
    VERSION_REGEX
        .captures(output)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| output.trim().to_string())
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::path::Path;

    /// Collaborators rooted at a temp project with an isolated home.
    pub struct Fixture {
        pub config: HarnessConfig,
        pub runner: ProcessRunner,
        pub sizer: DirectorySizer,
    }

    impl Fixture {
        pub fn new(root: &Path) -> Self {
            let config = HarnessConfig::new(root, root.join("home"));
            Self::with_config(config)
        }

        pub fn with_config(config: HarnessConfig) -> Self {
            let runner = ProcessRunner::new(&config.project_root);
            let sizer = DirectorySizer::walk_only(runner.clone());
            Self {
                config,
                runner,
                sizer,
            }
        }

        pub fn ctx(&self) -> ProbeContext<'_> {
            ProbeContext::new(&self.config, &self.runner, &self.sizer)
        }
    }

    /// Write an executable shell script into `dir`.
    #[cfg(unix)]
    pub fn write_script(dir: &Path, name: &str, body: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        crate::shell::make_executable(&path).unwrap();
        path
    }
}
