//! Report assembly.

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use crate::cache::{CacheInventory, DirectorySizer, ZERO_SIZE};
use crate::config::HarnessConfig;
use crate::probes::{extract_version, ProbeResult, ProbeStatus};
use crate::runner::{Run, StatusCounts, Verdict};
use crate::shell::{CommandSpec, ProcessRunner};

/// Header line preceding failed probes.
pub const FAILED_HEADER: &str = "🔴 Fix failed probes before deploying to CI";
/// Header line preceding warnings.
pub const WARNING_HEADER: &str = "🟡 Address warnings to improve reliability";
/// Shown when nothing failed or warned.
pub const ALL_PASSED: &str = "✅ All probes passed - ready for CI deployment";
/// Shown when the pip cache holds nothing.
pub const EMPTY_PIP_CACHE: &str = "💡 Pip cache is empty - first CI run will be slower";

const UNKNOWN_VERSION: &str = "unknown";

/// The persisted outcome of a run.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub timestamp: DateTime<Utc>,
    pub project_root: PathBuf,
    pub python_version: String,
    pub cache_directories: CacheInventory,
    pub test_results: Vec<ProbeResult>,
    pub recommendations: Vec<String>,
    pub summary: StatusCounts,
    pub verdict: Verdict,
    pub interrupted: bool,
    #[serde(serialize_with = "serialize_secs")]
    pub total_duration: Duration,
}

fn serialize_secs<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}

/// Turns a finished [`Run`] into a [`Report`].
///
/// Building takes a fresh inventory of the cache directories, so two builds
/// against the same run and filesystem differ only in `timestamp`.
pub struct ReportBuilder<'a> {
    config: &'a HarnessConfig,
    runner: &'a ProcessRunner,
    sizer: &'a DirectorySizer,
}

impl<'a> ReportBuilder<'a> {
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

    /// Assemble the report.
    pub fn build(&self, run: &Run) -> Report {
        let inventory = CacheInventory::collect(self.config, self.sizer);
        let pip_size = inventory.pip_cache_size(self.config, self.sizer);

        Report {
            timestamp: Utc::now(),
            project_root: self.config.project_root.clone(),
            python_version: self.python_version(),
            recommendations: recommendations(run.results(), &pip_size),
            cache_directories: inventory,
            test_results: run.results().to_vec(),
            summary: run.counts(),
            verdict: run.verdict(),
            interrupted: run.interrupted(),
            total_duration: run.total_duration(),
        }
    }

    fn python_version(&self) -> String {
        let spec = CommandSpec::new(self.config.python.as_str())
            .arg("--version")
            .timeout(self.config.timeouts.quick);
        let result = self.runner.run_spec(&spec);
        if !result.success() {
            return UNKNOWN_VERSION.to_string();
        }
        let raw = if result.stdout.trim().is_empty() {
            &result.stderr
        } else {
            &result.stdout
        };
        extract_version(raw)
    }
}

/// Prioritized recommendations: failures, then warnings, then the cache note.
pub fn recommendations(results: &[ProbeResult], pip_cache_size: &str) -> Vec<String> {
    let mut lines = Vec::new();

    let with_status = |status: ProbeStatus| {
        results
            .iter()
            .filter(move |r| r.status() == status)
            .map(|r| format!("   - {}: {}", r.name(), r.message()))
    };

    let failed: Vec<_> = with_status(ProbeStatus::Failed).collect();
    let warnings: Vec<_> = with_status(ProbeStatus::Warning).collect();

    if !failed.is_empty() {
        lines.push(FAILED_HEADER.to_string());
        lines.extend(failed.iter().cloned());
    }
    if !warnings.is_empty() {
        lines.push(WARNING_HEADER.to_string());
        lines.extend(warnings.iter().cloned());
    }
    if failed.is_empty() && warnings.is_empty() {
        lines.push(ALL_PASSED.to_string());
    }

    if pip_cache_size == ZERO_SIZE {
        lines.push(EMPTY_PIP_CACHE.to_string());
    } else {
        lines.push(format!(
            "✅ Pip cache active ({}) - subsequent runs will be faster",
            pip_cache_size
        ));
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn result(name: &str, status: ProbeStatus, message: &str) -> ProbeResult {
        ProbeResult::new(name, status, Duration::from_millis(5), message)
    }

    fn fixture(temp: &TempDir) -> (HarnessConfig, ProcessRunner, DirectorySizer) {
        let mut config = HarnessConfig::new(temp.path(), temp.path().join("home"));
        config.python = "no-such-python-xyz".to_string();
        let runner = ProcessRunner::new(temp.path());
        let sizer = DirectorySizer::walk_only(runner.clone());
        (config, runner, sizer)
    }

    #[test]
    fn empty_run_recommends_ready_and_cache_note() {
        assert_eq!(
            recommendations(&[], "0 B"),
            vec![ALL_PASSED.to_string(), EMPTY_PIP_CACHE.to_string()]
        );
    }

    #[test]
    fn failures_come_before_warnings() {
        let results = vec![
            result("python_imports", ProbeStatus::Warning, "project modules have issues"),
            result("pip_cache", ProbeStatus::Failed, "Package install failed: boom"),
            result("python_environment", ProbeStatus::Passed, "Python 3.11.4 ready"),
        ];

        insta::assert_json_snapshot!(recommendations(&results, "12.5 MB"), @r#"
        [
          "🔴 Fix failed probes before deploying to CI",
          "   - pip_cache: Package install failed: boom",
          "🟡 Address warnings to improve reliability",
          "   - python_imports: project modules have issues",
          "✅ Pip cache active (12.5 MB) - subsequent runs will be faster"
        ]
        "#);
    }

    #[test]
    fn report_carries_results_and_summary() {
        let temp = TempDir::new().unwrap();
        let (config, runner, sizer) = fixture(&temp);
        let run = Run::new(
            vec![
                result("python_environment", ProbeStatus::Passed, "Python 3.11.4 ready"),
                result("requirements_install", ProbeStatus::Skipped, "No requirements.txt found"),
            ],
            Utc::now(),
            Duration::from_secs(3),
            false,
        );

        let report = ReportBuilder::new(&config, &runner, &sizer).build(&run);

        assert_eq!(report.python_version, "unknown");
        assert_eq!(report.verdict, Verdict::Ready);
        assert_eq!(report.cache_directories.len(), config.cache_dirs().len());
        insta::assert_json_snapshot!(report.test_results, {
            "[].timestamp" => "[timestamp]",
            "[].duration" => "[duration]",
        }, @r#"
        [
          {
            "name": "python_environment",
            "status": "passed",
            "duration": "[duration]",
            "message": "Python 3.11.4 ready",
            "timestamp": "[timestamp]"
          },
          {
            "name": "requirements_install",
            "status": "skipped",
            "duration": "[duration]",
            "message": "No requirements.txt found",
            "timestamp": "[timestamp]"
          }
        ]
        "#);
        insta::assert_json_snapshot!(report.summary, @r#"
        {
          "passed": 1,
          "warning": 0,
          "failed": 0,
          "skipped": 1,
          "total": 2
        }
        "#);
    }

    #[test]
    fn build_is_idempotent_apart_from_timestamp() {
        let temp = TempDir::new().unwrap();
        let (config, runner, sizer) = fixture(&temp);
        fs::create_dir_all(config.pip_cache()).unwrap();
        fs::write(config.pip_cache().join("wheel"), vec![0u8; 4096]).unwrap();
        let run = Run::new(
            vec![result("pip_cache", ProbeStatus::Failed, "broken")],
            Utc::now(),
            Duration::from_secs(1),
            false,
        );
        let builder = ReportBuilder::new(&config, &runner, &sizer);

        let first = serde_json::to_value(builder.build(&run)).unwrap();
        let second = serde_json::to_value(builder.build(&run)).unwrap();

        assert_eq!(first["cache_directories"], second["cache_directories"]);
        assert_eq!(first["test_results"], second["test_results"]);
        assert_eq!(first["recommendations"], second["recommendations"]);
        assert_eq!(
            first["recommendations"].as_array().unwrap().last().unwrap(),
            "✅ Pip cache active (4.0 KB) - subsequent runs will be faster"
        );
    }

    #[test]
    fn report_shape_has_expected_keys() {
        let temp = TempDir::new().unwrap();
        let (config, runner, sizer) = fixture(&temp);
        let run = Run::new(vec![], Utc::now(), Duration::ZERO, true);

        let value = serde_json::to_value(ReportBuilder::new(&config, &runner, &sizer).build(&run))
            .unwrap();

        for key in [
            "timestamp",
            "project_root",
            "python_version",
            "cache_directories",
            "test_results",
            "recommendations",
            "summary",
            "verdict",
            "interrupted",
            "total_duration",
        ] {
            assert!(value.get(key).is_some(), "missing {}", key);
        }
        assert_eq!(value["interrupted"], true);
        assert_eq!(value["verdict"], "ready");
    }

    #[cfg(unix)]
    #[test]
    fn python_version_comes_from_interpreter() {
        let temp = TempDir::new().unwrap();
        let (mut config, runner, sizer) = fixture(&temp);
        let python = crate::probes::testing::write_script(
            temp.path(),
            "fake-python",
            "echo 'Python 3.12.2'",
        );
        config.python = python.to_string_lossy().into_owned();
        let run = Run::new(vec![], Utc::now(), Duration::ZERO, false);

        let report = ReportBuilder::new(&config, &runner, &sizer).build(&run);

        assert_eq!(report.python_version, "3.12.2");
    }
}
