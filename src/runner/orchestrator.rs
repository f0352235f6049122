//! Sequential probe execution.

use std::any::Any;
use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use super::verdict::{StatusCounts, Verdict};
use crate::cache::DirectorySizer;
use crate::config::HarnessConfig;
use crate::error::{CacheProbeError, Result};
use crate::probes::{default_probes, Probe, ProbeContext, ProbeResult, ProbeStatus};
use crate::shell::{CancellationToken, ProcessRunner};
use crate::ui::{RunSummary, UserInterface};

/// Lifecycle of an [`Orchestrator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Constructed, nothing has run.
    Idle,
    /// `run_all` started.
    Running,
    /// A probe is executing.
    Executing,
    /// The last probe's result was recorded.
    Recorded,
    /// Tallying results.
    Finalizing,
    /// Finished; no further probes will run.
    Done,
}

/// Outcome of one orchestrated run.
#[derive(Debug, Clone)]
pub struct Run {
    results: Vec<ProbeResult>,
    started_at: DateTime<Utc>,
    total_duration: Duration,
    interrupted: bool,
}

impl Run {
    pub fn new(
        results: Vec<ProbeResult>,
        started_at: DateTime<Utc>,
        total_duration: Duration,
        interrupted: bool,
    ) -> Self {
        Self {
            results,
            started_at,
            total_duration,
            interrupted,
        }
    }

    /// Results in execution order.
    pub fn results(&self) -> &[ProbeResult] {
        &self.results
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn total_duration(&self) -> Duration {
        self.total_duration
    }

    /// Whether the run stopped early on user request.
    pub fn interrupted(&self) -> bool {
        self.interrupted
    }

    pub fn counts(&self) -> StatusCounts {
        StatusCounts::tally(&self.results)
    }

    pub fn verdict(&self) -> Verdict {
        Verdict::from_counts(&self.counts())
    }

    /// 0 when nothing failed and the run completed, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.interrupted || self.counts().failed > 0 {
            1
        } else {
            0
        }
    }

    /// Totals for the UI.
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            counts: self.counts(),
            verdict: self.verdict(),
            total_duration: self.total_duration,
            interrupted: self.interrupted,
        }
    }
}

/// Runs probes one at a time and isolates their defects.
pub struct Orchestrator {
    config: HarnessConfig,
    runner: ProcessRunner,
    sizer: DirectorySizer,
    probes: Vec<Box<dyn Probe>>,
    cancel: CancellationToken,
    state: RunState,
}

impl Orchestrator {
    /// Orchestrator over the built-in probes, cancelled by SIGINT.
    pub fn new(config: HarnessConfig) -> Self {
        let runner = ProcessRunner::new(&config.project_root);
        let sizer = DirectorySizer::new(runner.clone());
        let cancel = CancellationToken::from_signal();
        Self {
            config,
            runner: runner.with_cancellation(cancel.clone()),
            sizer,
            probes: default_probes(),
            cancel,
            state: RunState::Idle,
        }
    }

    /// Replace the probe list.
    pub fn with_probes(mut self, probes: Vec<Box<dyn Probe>>) -> Self {
        self.probes = probes;
        self
    }

    pub fn with_sizer(mut self, sizer: DirectorySizer) -> Self {
        self.sizer = sizer;
        self
    }

    /// Cancel through `token`, both between probes and inside running commands.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.runner = self.runner.with_cancellation(token.clone());
        self.cancel = token;
        self
    }

    /// Restrict the run to `only` (when non-empty), minus `skip`.
    ///
    /// Declared order is kept. Every name must match a declared probe.
    pub fn select(&mut self, only: &[String], skip: &[String]) -> Result<()> {
        for name in only.iter().chain(skip) {
            if !self.probes.iter().any(|p| p.name() == name) {
                return Err(CacheProbeError::UnknownProbe { name: name.clone() });
            }
        }
        self.probes.retain(|p| {
            let name = p.name();
            (only.is_empty() || only.iter().any(|n| n == name)) && !skip.iter().any(|n| n == name)
        });
        Ok(())
    }

    pub fn probes(&self) -> &[Box<dyn Probe>] {
        &self.probes
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub fn sizer(&self) -> &DirectorySizer {
        &self.sizer
    }

    /// Run every selected probe in order.
    ///
    /// May be called once. A probe that returns `Err` or panics is recorded
    /// as a synthetic `failed` result and the run continues. Cancellation is
    /// checked between probes and kills the command in flight; the probe it
    /// interrupts is recorded as `skipped` and nothing after it runs.
    ///
    /// A panicking probe is reported through the log, not the default
    /// panic hook.
    pub fn run_all(&mut self, ui: &mut dyn UserInterface) -> Result<Run> {
        if self.state != RunState::Idle {
            return Err(anyhow::anyhow!("probes have already run").into());
        }
        self.state = RunState::Running;

        let started_at = Utc::now();
        let start = Instant::now();
        info!(
            "Running {} probes in {}",
            self.probes.len(),
            self.config.project_root.display()
        );

        let ctx = ProbeContext::new(&self.config, &self.runner, &self.sizer);
        let mut results = Vec::with_capacity(self.probes.len());
        let mut interrupted = false;

        for probe in &self.probes {
            if self.cancel.is_cancelled() {
                warn!("Interrupted before {}", probe.name());
                interrupted = true;
                break;
            }

            self.state = RunState::Executing;
            debug!("Running probe: {}", probe.name());
            let mut spinner = ui.start_spinner(probe.title());
            let mut result = run_isolated(probe.as_ref(), &ctx);
            spinner.finish_and_clear();

            if self.cancel.is_cancelled() {
                warn!("Interrupted during {}", probe.name());
                interrupted = true;
                result = ProbeResult::new(
                    probe.name(),
                    ProbeStatus::Skipped,
                    result.duration(),
                    "Interrupted",
                );
            }

            ui.show_probe_result(probe.title(), &result);
            results.push(result);
            self.state = RunState::Recorded;
            if interrupted {
                break;
            }
        }

        self.state = RunState::Finalizing;
        let run = Run::new(results, started_at, start.elapsed(), interrupted);
        let counts = run.counts();
        info!(
            "Probes finished in {:.2}s: {} passed, {} warnings, {} failed, {} skipped",
            run.total_duration().as_secs_f64(),
            counts.passed,
            counts.warnings,
            counts.failed,
            counts.skipped
        );
        ui.show_run_summary(&run.summary());

        self.state = RunState::Done;
        Ok(run)
    }
}

thread_local! {
    static ISOLATING: Cell<bool> = const { Cell::new(false) };
}

static PANIC_HOOK: Once = Once::new();

/// Wrap the current panic hook once, process-wide. Panics raised on a thread
/// inside [`run_isolated`] are logged at debug level; every other panic
/// reaches the previous hook unchanged.
fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if ISOLATING.with(Cell::get) {
                debug!("{}", info);
            } else {
                previous(info);
            }
        }));
    });
}

/// Run one probe behind the isolation boundary.
fn run_isolated(probe: &dyn Probe, ctx: &ProbeContext<'_>) -> ProbeResult {
    install_panic_hook();
    let start = Instant::now();
    ISOLATING.with(|flag| flag.set(true));
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| probe.run(ctx)));
    ISOLATING.with(|flag| flag.set(false));
    let message = match outcome {
        Ok(Ok(result)) => return result,
        Ok(Err(e)) => e.to_string(),
        Err(payload) => panic_message(payload.as_ref()),
    };

    warn!(
        "{}",
        CacheProbeError::ProbeDefect {
            probe: probe.name().to_string(),
            message: message.clone(),
        }
    );
    ProbeResult::new(probe.name(), ProbeStatus::Failed, start.elapsed(), message)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "probe panicked".to_string()
    }
}
