//! Module import check.
//!
//! Each module is imported in a fresh interpreter so one broken package
//! cannot mask another, and so the harness never shares state with the
//! interpreter under test.

use super::{Probe, ProbeContext, ProbeResult, ProbeTimer};
use crate::error::Result;

/// Modules the project cannot run without: (module, provider).
pub const CRITICAL_MODULES: &[(&str, &str)] = &[
    ("yaml", "PyYAML"),
    ("requests", "requests"),
    ("click", "click"),
    ("json", "built-in"),
    ("pathlib", "built-in"),
    ("asyncio", "built-in"),
];

/// Modules that enable optional integrations.
pub const OPTIONAL_MODULES: &[(&str, &str)] = &[
    ("boto3", "AWS SDK"),
    ("google.cloud", "Google Cloud SDK"),
    ("kubernetes", "Kubernetes client"),
    ("docker", "Docker SDK"),
    ("pytest", "testing framework"),
];

/// Imports critical, optional and project modules.
pub struct PythonImportsProbe;

impl PythonImportsProbe {
    pub const NAME: &'static str = "python_imports";
}

impl Probe for PythonImportsProbe {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn title(&self) -> &str {
        "Python Imports"
    }

    fn run(&self, ctx: &ProbeContext<'_>) -> Result<ProbeResult> {
        let timer = ProbeTimer::start(Self::NAME);

        let mut failed_imports = Vec::new();
        for (module, description) in CRITICAL_MODULES {
            match try_import(ctx, module) {
                Ok(()) => tracing::info!("✓ {} ({})", module, description),
                Err(e) => {
                    tracing::info!("✗ {}: {}", module, e);
                    failed_imports.push(format!("{}: {}", module, e));
                }
            }
        }

        let mut optional = 0;
        for (module, description) in OPTIONAL_MODULES {
            match try_import(ctx, module) {
                Ok(()) => {
                    optional += 1;
                    tracing::info!("✓ {} ({})", module, description);
                }
                Err(_) => tracing::info!("⚠ {} not available (optional)", module),
            }
        }

        let project_ok = match try_import(ctx, &ctx.config.project_import) {
            Ok(()) => {
                tracing::info!("✓ Project modules importable");
                true
            }
            Err(e) => {
                tracing::info!("⚠ Project modules: {}", e);
                false
            }
        };

        let result = match (failed_imports.is_empty(), project_ok) {
            (true, true) => timer.passed(format!(
                "All critical imports OK, {} optional modules available",
                optional
            )),
            (true, false) => timer.warning("Critical imports OK but project modules have issues"),
            (false, _) => timer.failed(format!(
                "Missing critical imports: {}",
                failed_imports.join("; ")
            )),
        };
        Ok(result)
    }
}

/// Import `module` in a fresh interpreter; the error is the last stderr line.
fn try_import(ctx: &ProbeContext<'_>, module: &str) -> std::result::Result<(), String> {
    let spec = ctx
        .python()
        .arg("-c")
        .arg(format!("import {}", module))
        .env("PYTHONPATH", ctx.python_path().to_string_lossy());
    let result = ctx.runner.run_spec(&spec);
    if result.success() {
        return Ok(());
    }
    Err(result
        .stderr
        .lines()
        .rev()
        .find(|line| !line.trim().is_empty())
        .unwrap_or("import failed")
        .trim()
        .to_string())
}
