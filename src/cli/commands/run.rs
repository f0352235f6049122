//! Run command implementation.
//!
//! The `cacheprobe run` command executes the probes, prints a summary and
//! persists the JSON report.

use crate::cli::args::RunArgs;
use crate::config::HarnessConfig;
use crate::error::{CacheProbeError, Result};
use crate::report::{write_report, ReportBuilder};
use crate::runner::Orchestrator;
use crate::shell::ProcessRunner;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandContext, CommandResult};

/// The run command implementation.
pub struct RunCommand {
    context: CommandContext,
    args: RunArgs,
}

impl RunCommand {
    /// Create a new run command.
    pub fn new(context: CommandContext, args: RunArgs) -> Self {
        Self { context, args }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &RunArgs {
        &self.args
    }

    /// Apply command-line overrides on top of the resolved config.
    fn apply_args(&self, mut config: HarnessConfig) -> HarnessConfig {
        if let Some(ref python) = self.args.python {
            config.python = python.clone();
        }
        if let Some(ref dir) = self.args.report_dir {
            config.report_dir = dir.clone();
        }
        config
    }

    fn run_with(
        &self,
        mut orchestrator: Orchestrator,
        ui: &mut dyn UserInterface,
    ) -> Result<CommandResult> {
        orchestrator.select(&self.args.only, &self.args.skip)?;

        ui.show_header(&format!(
            "Cache probe: {}",
            orchestrator.config().project_root.display()
        ));
        let run = orchestrator.run_all(ui)?;

        let config = orchestrator.config();
        let runner = ProcessRunner::new(&config.project_root);
        let report = ReportBuilder::new(config, &runner, orchestrator.sizer()).build(&run);

        if self.args.json {
            ui.data(&serde_json::to_string_pretty(&report)?);
        } else {
            ui.message("");
            for line in &report.recommendations {
                ui.message(line);
            }
        }

        let mut exit_code = run.exit_code();
        if !self.args.no_report {
            match write_report(&report, &config.report_dir) {
                Ok(path) => ui.message(&format!("Report saved to {}", path.display())),
                Err(e) => {
                    ui.error(&e.to_string());
                    exit_code = 1;
                }
            }
        }

        if run.interrupted() {
            ui.warning(&format!("{}, report is partial", CacheProbeError::Interrupted));
        }

        Ok(if exit_code == 0 {
            CommandResult::success()
        } else {
            CommandResult::failure(exit_code)
        })
    }
}

impl Command for RunCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = self.apply_args(self.context.load_config()?);
        self.run_with(Orchestrator::new(config), ui)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::DirectorySizer;
    use crate::probes::{FnProbe, Probe, ProbeResult, ProbeStatus};
    use crate::report::REPORT_PREFIX;
    use crate::shell::CancellationToken;
    use crate::ui::MockUI;
    use std::fs;
    use std::path::PathBuf;
    use std::time::Duration;
    use tempfile::TempDir;

    fn probe(name: &'static str, status: ProbeStatus) -> Box<dyn Probe> {
        Box::new(FnProbe::new(name, name, move |_ctx| {
            Ok(ProbeResult::new(name, status, Duration::from_millis(1), "done"))
        }))
    }

    fn config(temp: &TempDir) -> HarnessConfig {
        let mut config = HarnessConfig::new(temp.path(), temp.path().join("home"));
        config.python = "no-such-python-xyz".to_string();
        config
    }

    fn orchestrator_with(config: HarnessConfig, probes: Vec<Box<dyn Probe>>) -> Orchestrator {
        let sizer = DirectorySizer::walk_only(ProcessRunner::new(&config.project_root));
        Orchestrator::new(config)
            .with_probes(probes)
            .with_sizer(sizer)
            .with_cancellation(CancellationToken::manual())
    }

    fn orchestrator(temp: &TempDir, probes: Vec<Box<dyn Probe>>) -> Orchestrator {
        orchestrator_with(config(temp), probes)
    }

    fn reports_in(dir: &std::path::Path) -> Vec<PathBuf> {
        fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().path())
            .filter(|p| {
                p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with(REPORT_PREFIX))
            })
            .collect()
    }

    #[test]
    fn passing_run_writes_report_and_succeeds() {
        let temp = TempDir::new().unwrap();
        let cmd = RunCommand::new(CommandContext::new(temp.path()), RunArgs::default());
        let mut ui = MockUI::new();

        let result = cmd
            .run_with(
                orchestrator(
                    &temp,
                    vec![probe("a", ProbeStatus::Passed), probe("b", ProbeStatus::Warning)],
                ),
                &mut ui,
            )
            .unwrap();

        assert!(result.success);
        assert_eq!(reports_in(temp.path()).len(), 1);
        assert!(ui.messages().iter().any(|m| m.starts_with("Report saved to")));
        assert!(ui
            .messages()
            .iter()
            .any(|m| m == "🟡 Address warnings to improve reliability"));
    }

    #[test]
    fn failing_probe_exits_one() {
        let temp = TempDir::new().unwrap();
        let args = RunArgs {
            no_report: true,
            ..Default::default()
        };
        let cmd = RunCommand::new(CommandContext::new(temp.path()), args);
        let mut ui = MockUI::new();

        let result = cmd
            .run_with(
                orchestrator(
                    &temp,
                    vec![probe("a", ProbeStatus::Passed), probe("b", ProbeStatus::Failed)],
                ),
                &mut ui,
            )
            .unwrap();

        assert!(!result.success);
        assert_eq!(result.exit_code, 1);
        assert!(reports_in(temp.path()).is_empty());
    }

    #[test]
    fn json_goes_to_data_output() {
        let temp = TempDir::new().unwrap();
        let args = RunArgs {
            json: true,
            no_report: true,
            ..Default::default()
        };
        let cmd = RunCommand::new(CommandContext::new(temp.path()), args);
        let mut ui = MockUI::new();

        cmd.run_with(orchestrator(&temp, vec![probe("a", ProbeStatus::Passed)]), &mut ui)
            .unwrap();

        assert_eq!(ui.data_output().len(), 1);
        let report: serde_json::Value = serde_json::from_str(&ui.data_output()[0]).unwrap();
        assert_eq!(report["verdict"], "ready");
        assert_eq!(report["test_results"][0]["name"], "a");
    }

    #[test]
    fn unknown_probe_is_rejected_before_running() {
        let temp = TempDir::new().unwrap();
        let args = RunArgs {
            only: vec!["nope".to_string()],
            ..Default::default()
        };
        let cmd = RunCommand::new(CommandContext::new(temp.path()), args);
        let mut ui = MockUI::new();

        let err = cmd
            .run_with(orchestrator(&temp, vec![probe("a", ProbeStatus::Passed)]), &mut ui)
            .unwrap_err();

        assert!(matches!(err, CacheProbeError::UnknownProbe { .. }));
        assert!(ui.probe_lines().is_empty());
    }

    #[test]
    fn report_write_failure_exits_one() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, "file").unwrap();
        let cmd = RunCommand::new(CommandContext::new(temp.path()), RunArgs::default());
        let mut config = config(&temp);
        config.report_dir = blocker.join("reports");
        let orch = orchestrator_with(config, vec![probe("a", ProbeStatus::Passed)]);
        let mut ui = MockUI::new();

        let result = cmd.run_with(orch, &mut ui).unwrap();

        assert_eq!(result.exit_code, 1);
        assert_eq!(ui.errors().len(), 1);
    }

    #[test]
    fn interrupted_run_still_writes_partial_report() {
        let temp = TempDir::new().unwrap();
        let token = CancellationToken::manual();
        token.cancel();
        let cmd = RunCommand::new(CommandContext::new(temp.path()), RunArgs::default());
        let mut ui = MockUI::new();

        let result = cmd
            .run_with(
                orchestrator(&temp, vec![probe("a", ProbeStatus::Passed)]).with_cancellation(token),
                &mut ui,
            )
            .unwrap();

        assert_eq!(result.exit_code, 1);
        let reports = reports_in(temp.path());
        assert_eq!(reports.len(), 1);
        let report: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&reports[0]).unwrap()).unwrap();
        assert_eq!(report["interrupted"], true);
        assert_eq!(report["test_results"].as_array().unwrap().len(), 0);
        assert!(ui.has_warning("Run interrupted, report is partial"));
    }

    #[test]
    fn args_override_config() {
        let temp = TempDir::new().unwrap();
        let args = RunArgs {
            python: Some("/opt/python3.12".to_string()),
            report_dir: Some(PathBuf::from("/tmp/reports")),
            ..Default::default()
        };
        let cmd = RunCommand::new(CommandContext::new(temp.path()), args);

        let config = cmd.apply_args(HarnessConfig::new(temp.path(), temp.path().join("home")));

        assert_eq!(config.python, "/opt/python3.12");
        assert_eq!(config.report_dir, PathBuf::from("/tmp/reports"));
    }
}
