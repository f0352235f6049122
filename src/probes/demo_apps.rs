//! Demo runner check.

use std::fs;

use super::{truncate, Probe, ProbeContext, ProbeResult, ProbeTimer};
use crate::error::Result;
use crate::shell::{make_executable, CommandSpec};

/// Demo runner executable in the project root.
pub const DEMO_RUNNER: &str = "demo-runner";

const MAX_STDERR: usize = 200;

/// Lists demos and sets one up into the demo apps directory.
pub struct DemoApplicationsProbe;

impl DemoApplicationsProbe {
    pub const NAME: &'static str = "demo_applications";
}

impl Probe for DemoApplicationsProbe {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn title(&self) -> &str {
        "Demo Applications"
    }

    fn run(&self, ctx: &ProbeContext<'_>) -> Result<ProbeResult> {
        let timer = ProbeTimer::start(Self::NAME);

        let demo_runner = ctx.config.project_root.join(DEMO_RUNNER);
        if !demo_runner.exists() {
            return Ok(timer.skipped(format!("{} not found", DEMO_RUNNER)));
        }
        make_executable(&demo_runner)?;
        let program = demo_runner.to_string_lossy().into_owned();

        tracing::info!("Testing demo list command...");
        let list = CommandSpec::new(program.clone())
            .arg("list")
            .timeout(ctx.config.timeouts.quick);
        let result = ctx.runner.run_spec(&list);
        if !result.success() {
            return Ok(timer.failed(format!("Demo list failed: {}", result.stderr.trim())));
        }

        let demo = &ctx.config.demo_name;
        let target = ctx.config.demo_apps_dir().join(format!("test-{}", demo));
        if target.exists() {
            fs::remove_dir_all(&target)?;
        }

        tracing::info!("Testing demo setup: {}", demo);
        let setup = CommandSpec::new(program)
            .args(["setup", demo.as_str(), "--target-dir"])
            .arg(target.to_string_lossy())
            .timeout(ctx.config.timeouts.package_install);
        let result = ctx.runner.run_spec(&setup);

        if result.success() && target.exists() {
            Ok(timer.passed(format!(
                "Demo setup successful, directory created: {}",
                ctx.sizer.size_of(&target)
            )))
        } else {
            Ok(timer.warning(format!(
                "Demo setup issues but may work in CI: {}",
                truncate(result.stderr.trim(), MAX_STDERR)
            )))
        }
    }
}
