//! pip cache behaviour check.

use super::{Probe, ProbeContext, ProbeResult, ProbeTimer};
use crate::error::Result;

/// Markers in pip output showing a download was avoided.
const CACHE_MARKERS: [&str; 2] = ["Using cached", "Requirement already satisfied"];

/// Installs a small package through the pip cache and reports its growth.
pub struct PipCacheProbe;

impl PipCacheProbe {
    pub const NAME: &'static str = "pip_cache";
}

impl Probe for PipCacheProbe {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn title(&self) -> &str {
        "Pip Cache Behavior"
    }

    fn run(&self, ctx: &ProbeContext<'_>) -> Result<ProbeResult> {
        let timer = ProbeTimer::start(Self::NAME);
        let pip_cache = ctx.config.pip_cache();

        let initial_size = ctx.sizer.size_of(&pip_cache);
        tracing::info!("Initial pip cache size: {}", initial_size);

        let package = &ctx.config.test_package;
        tracing::info!("Installing test package: {}", package);
        let spec = ctx
            .python()
            .args(["-m", "pip", "install", "--user", "--cache-dir"])
            .arg(pip_cache.to_string_lossy())
            .arg(package.as_str())
            .timeout(ctx.config.timeouts.package_install);
        let result = ctx.runner.run_spec(&spec);

        if !result.success() {
            return Ok(timer.failed(format!(
                "Package install failed: {}",
                result.stderr.trim()
            )));
        }

        let cache_used = CACHE_MARKERS.iter().any(|m| result.stdout.contains(m));

        let final_size = ctx.sizer.size_of(&pip_cache);
        tracing::info!("Final pip cache size: {}", final_size);

        Ok(timer.passed(format!(
            "Cache used: {}, Size: {} -> {}",
            cache_used, initial_size, final_size
        )))
    }
}
