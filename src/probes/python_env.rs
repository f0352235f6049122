//! Interpreter and package manager sanity check.

use std::fs;

use super::{extract_version, Probe, ProbeContext, ProbeResult, ProbeTimer};
use crate::error::Result;

/// Checks the interpreter and pip respond, and prepares the pip cache dir.
pub struct PythonEnvironmentProbe;

impl PythonEnvironmentProbe {
    pub const NAME: &'static str = "python_environment";
}

impl Probe for PythonEnvironmentProbe {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn title(&self) -> &str {
        "Python Environment"
    }

    fn run(&self, ctx: &ProbeContext<'_>) -> Result<ProbeResult> {
        let timer = ProbeTimer::start(Self::NAME);

        let result = ctx.runner.run_spec(&ctx.python().arg("--version"));
        if !result.success() {
            return Ok(timer.failed(format!("Python not working: {}", result.stderr.trim())));
        }
        // Python 2 prints its version on stderr.
        let raw = if result.stdout.trim().is_empty() {
            &result.stderr
        } else {
            &result.stdout
        };
        let python_version = extract_version(raw);
        tracing::info!("Python version: {}", python_version);

        let result = ctx
            .runner
            .run_spec(&ctx.python().args(["-m", "pip", "--version"]));
        if !result.success() {
            return Ok(timer.failed(format!("Pip not working: {}", result.stderr.trim())));
        }
        tracing::info!("Pip version: {}", result.stdout.trim());

        let pip_cache = ctx.config.pip_cache();
        if !pip_cache.exists() {
            fs::create_dir_all(&pip_cache)?;
            tracing::info!("Created pip cache directory: {}", pip_cache.display());
        }

        Ok(timer.passed(format!("Python {} ready", python_version)))
    }
}
