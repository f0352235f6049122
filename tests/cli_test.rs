//! Integration tests for the cacheprobe binary.
// The cargo_bin function is marked deprecated in favor of cargo_bin! macro,
// but both work correctly. Suppressing until assert_cmd stabilizes the new API.
#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A project directory with an isolated home.
struct Project {
    temp: TempDir,
}

impl Project {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("home")).unwrap();
        Self { temp }
    }

    fn root(&self) -> &Path {
        self.temp.path()
    }

    fn home(&self) -> PathBuf {
        self.root().join("home")
    }

    fn config(&self, yaml: &str) {
        fs::write(self.root().join(".cacheprobe.yml"), yaml).unwrap();
    }

    #[cfg(unix)]
    fn fake_python(&self, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = self.root().join("fake-python");
        fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::new(cargo_bin("cacheprobe"));
        cmd.current_dir(self.root())
            .env("HOME", self.home())
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG");
        cmd
    }

    fn reports(&self, dir: &Path) -> Vec<PathBuf> {
        if !dir.exists() {
            return Vec::new();
        }
        fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().path())
            .filter(|p| {
                p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with("cache-test-report-"))
            })
            .collect()
    }
}

const PASSING_PYTHON: &str = r#"echo "Python 3.11.4""#;

#[test]
fn cli_shows_help() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("cacheprobe"));
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Local CI readiness checks"))
        .stdout(predicate::str::contains("inventory"));
    Ok(())
}

#[test]
fn cli_shows_version() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("cacheprobe"));
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    Ok(())
}

#[test]
fn cli_list_shows_probes_in_order() -> Result<(), Box<dyn std::error::Error>> {
    let project = Project::new();
    let output = project.cmd().arg("list").output()?;
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout)?;
    let position = |name: &str| stdout.find(name).unwrap();
    assert!(position("python_environment") < position("pip_cache"));
    assert!(position("pip_cache") < position("requirements_install"));
    assert!(position("cli_commands") < position("nodejs_detection"));
    assert!(position("nodejs_detection") < position("github_actions_simulation"));
    Ok(())
}

#[test]
fn cli_list_json() -> Result<(), Box<dyn std::error::Error>> {
    let project = Project::new();
    let output = project.cmd().args(["list", "--json"]).output()?;
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    let names: Vec<_> = value
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names.len(), 8);
    assert_eq!(names[0], "python_environment");
    assert_eq!(names[7], "github_actions_simulation");
    Ok(())
}

#[test]
fn cli_inventory_json_uses_home() -> Result<(), Box<dyn std::error::Error>> {
    let project = Project::new();
    let pip = project.home().join(".cache/pip");
    fs::create_dir_all(&pip)?;
    fs::write(pip.join("wheel"), vec![0u8; 4096])?;

    let output = project.cmd().args(["inventory", "--json"]).output()?;
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(value["pip"]["exists"], true);
    assert_eq!(value["pip"]["path"], pip.to_string_lossy().as_ref());
    assert_eq!(value["yarn"]["exists"], false);
    assert_eq!(value["yarn"]["size"], "0 B");
    assert!(value.get("demo_apps").is_some());
    Ok(())
}

#[test]
fn cli_inventory_table() -> Result<(), Box<dyn std::error::Error>> {
    let project = Project::new();
    project
        .cmd()
        .arg("inventory")
        .assert()
        .success()
        .stdout(predicate::str::contains("NAME"))
        .stdout(predicate::str::contains("local_site_packages"));
    Ok(())
}

#[cfg(unix)]
#[test]
fn cli_run_writes_report() -> Result<(), Box<dyn std::error::Error>> {
    let project = Project::new();
    let python = project.fake_python(PASSING_PYTHON);
    let report_dir = project.root().join("reports");

    project
        .cmd()
        .args(["run", "--only", "python_environment", "--python"])
        .arg(&python)
        .arg("--report-dir")
        .arg(&report_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Report saved to"));

    let reports = project.reports(&report_dir);
    assert_eq!(reports.len(), 1);
    let report: serde_json::Value = serde_json::from_str(&fs::read_to_string(&reports[0])?)?;
    assert_eq!(report["verdict"], "ready");
    assert_eq!(report["python_version"], "3.11.4");
    assert_eq!(report["test_results"][0]["name"], "python_environment");
    assert_eq!(report["test_results"][0]["status"], "passed");
    assert_eq!(report["summary"]["total"], 1);
    assert!(project.home().join(".cache/pip").is_dir());
    Ok(())
}

#[cfg(unix)]
#[test]
fn cli_run_failing_probe_exits_one() -> Result<(), Box<dyn std::error::Error>> {
    let project = Project::new();
    let python = project.fake_python("echo 'broken interpreter' >&2; exit 3");
    project.config(&format!("python: {}\n", python.display()));

    project
        .cmd()
        .args(["run", "--only", "python_environment", "--no-report"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Python not working: broken interpreter"));

    assert!(project.reports(project.root()).is_empty());
    Ok(())
}

#[cfg(unix)]
#[test]
fn cli_run_json_prints_only_report() -> Result<(), Box<dyn std::error::Error>> {
    let project = Project::new();
    let python = project.fake_python(PASSING_PYTHON);

    let output = project
        .cmd()
        .args(["run", "--json", "--no-report", "--only", "python_environment", "--python"])
        .arg(&python)
        .output()?;
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(report["verdict"], "ready");
    assert_eq!(report["interrupted"], false);
    assert!(report["recommendations"]
        .as_array()
        .unwrap()
        .iter()
        .any(|r| r == "✅ All probes passed - ready for CI deployment"));
    Ok(())
}

#[cfg(unix)]
#[test]
fn cli_repeated_runs_never_overwrite() -> Result<(), Box<dyn std::error::Error>> {
    let project = Project::new();
    let python = project.fake_python(PASSING_PYTHON);
    project.config(&format!("python: {}\nreport_dir: out\n", python.display()));

    for _ in 0..2 {
        project
            .cmd()
            .args(["run", "--only", "python_environment", "-q"])
            .assert()
            .success();
    }

    assert_eq!(project.reports(&project.root().join("out")).len(), 2);
    Ok(())
}

#[cfg(unix)]
#[test]
fn cli_no_subcommand_runs_every_probe() -> Result<(), Box<dyn std::error::Error>> {
    let project = Project::new();
    let python = project.fake_python(PASSING_PYTHON);
    project.config(&format!("python: {}\n", python.display()));

    project.cmd().output()?;

    let reports = project.reports(project.root());
    assert_eq!(reports.len(), 1);
    let report: serde_json::Value = serde_json::from_str(&fs::read_to_string(&reports[0])?)?;
    let results = report["test_results"].as_array().unwrap();
    assert_eq!(results.len(), 8);
    assert_eq!(results[2]["status"], "skipped");
    assert_eq!(results[2]["message"], "No requirements.txt found");
    Ok(())
}

#[test]
fn cli_unknown_probe_fails() -> Result<(), Box<dyn std::error::Error>> {
    let project = Project::new();
    project
        .cmd()
        .args(["run", "--only", "nope"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unknown probe: nope"));
    assert!(project.reports(project.root()).is_empty());
    Ok(())
}

#[test]
fn cli_missing_explicit_config_fails() -> Result<(), Box<dyn std::error::Error>> {
    let project = Project::new();
    project
        .cmd()
        .args(["inventory", "--config", "missing.yml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Configuration not found"));
    Ok(())
}

#[test]
fn cli_rejects_unknown_config_keys() -> Result<(), Box<dyn std::error::Error>> {
    let project = Project::new();
    project.config("pythn: python3\n");
    project
        .cmd()
        .arg("list")
        .assert()
        .success();
    project
        .cmd()
        .arg("inventory")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to parse config"));
    Ok(())
}

#[test]
fn cli_project_flag_overrides_cwd() -> Result<(), Box<dyn std::error::Error>> {
    let project = Project::new();
    let other = TempDir::new()?;
    fs::write(other.path().join(".cacheprobe.yml"), "bogus: 1\n")?;
    project
        .cmd()
        .arg("--project")
        .arg(other.path())
        .arg("inventory")
        .assert()
        .code(1)
        .stderr(predicate::str::contains(".cacheprobe.yml"));
    Ok(())
}
