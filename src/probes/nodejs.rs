//! Node.js detection.

use std::time::Duration;

use super::{extract_version, Probe, ProbeContext, ProbeResult, ProbeTimer};
use crate::error::Result;
use crate::shell::CommandSpec;

/// Marker file and the package manager it implies.
pub const PACKAGE_MANAGER_MARKERS: &[(&str, &str)] = &[
    ("package.json", "npm"),
    ("yarn.lock", "yarn"),
    ("pnpm-lock.yaml", "pnpm"),
];

const NODE_VERSION_TIMEOUT: Duration = Duration::from_secs(10);

/// Detects JavaScript package managers and checks Node.js is installed.
pub struct NodeDetectionProbe;

impl NodeDetectionProbe {
    pub const NAME: &'static str = "nodejs_detection";
}

impl Probe for NodeDetectionProbe {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn title(&self) -> &str {
        "Node.js Detection"
    }

    fn run(&self, ctx: &ProbeContext<'_>) -> Result<ProbeResult> {
        let timer = ProbeTimer::start(Self::NAME);

        let detected = detect_managers(ctx);
        if detected.is_empty() {
            return Ok(timer.passed("No Node.js detected (Python-only project)"));
        }
        tracing::info!("Node.js package managers detected: {}", detected.join(", "));

        let spec = CommandSpec::new(ctx.config.node.as_str())
            .arg("--version")
            .timeout(NODE_VERSION_TIMEOUT);
        let result = ctx.runner.run_spec(&spec);
        if !result.success() {
            return Ok(timer.warning(format!(
                "Node.js files detected ({}) but Node.js not installed",
                detected.join(", ")
            )));
        }

        let version = extract_version(&result.stdout);
        let npm_cache_size = ctx.sizer.size_of(&ctx.config.npm_cache());
        Ok(timer.passed(format!(
            "Node.js {} available, npm cache: {}",
            version, npm_cache_size
        )))
    }
}

fn detect_managers(ctx: &ProbeContext<'_>) -> Vec<&'static str> {
    PACKAGE_MANAGER_MARKERS
        .iter()
        .filter(|(file, _)| ctx.config.project_root.join(file).exists())
        .map(|(_, manager)| *manager)
        .collect()
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::config::HarnessConfig;
    use crate::probes::testing::{write_script, Fixture};
    use crate::probes::ProbeStatus;
    use std::fs;
    use tempfile::TempDir;

    fn fixture(temp: &TempDir, node_body: Option<&str>) -> Fixture {
        let mut config = HarnessConfig::new(temp.path(), temp.path().join("home"));
        config.node = match node_body {
            Some(body) => write_script(temp.path(), "fake-node", body)
                .to_string_lossy()
                .into_owned(),
            None => "no-such-node-xyz".to_string(),
        };
        Fixture::with_config(config)
    }

    #[test]
    fn python_only_project_passes() {
        let temp = TempDir::new().unwrap();
        let fixture = fixture(&temp, None);

        let result = NodeDetectionProbe.run(&fixture.ctx()).unwrap();

        assert_eq!(result.status(), ProbeStatus::Passed);
        assert_eq!(result.message(), "No Node.js detected (Python-only project)");
    }

    #[test]
    fn installed_node_reports_version_and_cache() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("package.json"), "{}").unwrap();
        let fixture = fixture(&temp, Some("echo v20.11.1"));

        let result = NodeDetectionProbe.run(&fixture.ctx()).unwrap();

        assert_eq!(result.status(), ProbeStatus::Passed);
        assert_eq!(
            result.message(),
            "Node.js 20.11.1 available, npm cache: 0 B"
        );
    }

    #[test]
    fn missing_node_is_warning_naming_managers() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("package.json"), "{}").unwrap();
        fs::write(temp.path().join("yarn.lock"), "").unwrap();
        let fixture = fixture(&temp, None);

        let result = NodeDetectionProbe.run(&fixture.ctx()).unwrap();

        assert_eq!(result.status(), ProbeStatus::Warning);
        assert_eq!(
            result.message(),
            "Node.js files detected (npm, yarn) but Node.js not installed"
        );
    }
}
