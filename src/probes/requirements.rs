//! Dependency manifest installation check.

use std::path::{Path, PathBuf};
use std::time::Duration;

use super::{truncate, Probe, ProbeContext, ProbeResult, ProbeTimer};
use crate::error::Result;
use crate::shell::CommandSpec;

/// Primary dependency manifest.
pub const MANIFEST: &str = "requirements.txt";

/// Minimal fallback manifest.
pub const MINIMAL_MANIFEST: &str = "requirements-minimal.txt";

const MAX_STDERR: usize = 500;

/// Installs the project manifest through the pip cache.
///
/// Falls back to the minimal manifest when the full install fails.
pub struct RequirementsInstallProbe;

impl RequirementsInstallProbe {
    pub const NAME: &'static str = "requirements_install";
}

impl Probe for RequirementsInstallProbe {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn title(&self) -> &str {
        "Requirements Installation"
    }

    fn run(&self, ctx: &ProbeContext<'_>) -> Result<ProbeResult> {
        let timer = ProbeTimer::start(Self::NAME);
        let root = &ctx.config.project_root;

        let Some(manifest) = [MANIFEST, MINIMAL_MANIFEST]
            .iter()
            .map(|name| root.join(name))
            .find(|path| path.exists())
        else {
            return Ok(timer.skipped(format!("No {} found", MANIFEST)));
        };

        let manifest_name = file_name(&manifest);
        tracing::info!("Installing requirements from: {}", manifest_name);

        let mut attempts = vec![install_spec(ctx, &manifest, ctx.config.timeouts.manifest_install)];
        let minimal = root.join(MINIMAL_MANIFEST);
        if minimal.exists() && minimal != manifest {
            attempts.push(install_spec(ctx, &minimal, ctx.config.timeouts.minimal_install));
        }

        let Some(result) = ctx.runner.run_first_success(&attempts) else {
            return Ok(timer.failed("No install attempts available"));
        };

        if !result.success() {
            return Ok(timer.failed(format!(
                "Requirements install failed: {}",
                truncate(result.stderr.trim(), MAX_STDERR)
            )));
        }

        let cache_hits = result.stdout.matches("Using cached").count();
        let already_satisfied = result.stdout.matches("Requirement already satisfied").count();

        Ok(timer.passed(format!(
            "Cache hits: {}, Already satisfied: {}",
            cache_hits, already_satisfied
        )))
    }
}

fn install_spec(ctx: &ProbeContext<'_>, manifest: &Path, timeout: Duration) -> CommandSpec {
    let pip_cache: PathBuf = ctx.config.pip_cache();
    ctx.python()
        .args(["-m", "pip", "install", "--user", "--cache-dir"])
        .arg(pip_cache.to_string_lossy())
        .arg("-r")
        .arg(manifest.to_string_lossy())
        .timeout(timeout)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
