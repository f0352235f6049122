//! External command execution.
//!
//! Commands are always spawned directly from an argument vector, never
//! through a shell. Every invocation is bounded by a timeout, and launch
//! failures, timeouts and cancellations are folded into a synthetic
//! [`CommandResult`] instead of surfacing as errors, so probes only ever
//! inspect exit codes.

use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use super::signal::CancellationToken;

/// Exit code reported when a command timed out, was cancelled or could not
/// be launched.
///
/// Real processes never report a negative exit code, so this value is
/// distinct from every genuine outcome.
pub const SYNTHETIC_EXIT_CODE: i32 = -1;

/// Default timeout for a single command.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Result of executing an external command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code, or [`SYNTHETIC_EXIT_CODE`] on timeout or launch failure.
    pub exit_code: i32,

    /// Standard output.
    pub stdout: String,

    /// Standard error, or the timeout/launch error message.
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,
}

impl CommandResult {
    /// Create a result for a command that ran to completion.
    pub fn completed(exit_code: i32, stdout: String, stderr: String, duration: Duration) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            duration,
        }
    }

    /// Create a synthetic failure (timeout or launch failure).
    pub fn synthetic_failure(message: impl Into<String>, duration: Duration) -> Self {
        Self {
            exit_code: SYNTHETIC_EXIT_CODE,
            stdout: String::new(),
            stderr: message.into(),
            duration,
        }
    }

    /// Whether the command exited with code 0.
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Whether this result was synthesized rather than produced by the process.
    pub fn is_synthetic(&self) -> bool {
        self.exit_code == SYNTHETIC_EXIT_CODE
    }
}

/// One invocation form: program, discrete arguments, timeout and env overrides.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    /// Program to execute (name resolved via PATH, or a path).
    pub program: String,

    /// Arguments, passed verbatim.
    pub args: Vec<String>,

    /// Maximum time to wait for the process.
    pub timeout: Duration,

    /// Environment variables merged over the inherited environment.
    pub env: HashMap<String, String>,
}

impl CommandSpec {
    /// Create a spec with the default timeout and no env overrides.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
            env: HashMap::new(),
        }
    }

    /// Build a spec from an argv sequence. Returns `None` for an empty argv.
    pub fn from_argv(argv: &[String]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(Self::new(program.clone()).args(args.iter().cloned()))
    }

    /// Append a single argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set the timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set an environment variable for this invocation.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Render the command line for logs and messages.
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Runs external commands from a fixed working directory.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    cwd: PathBuf,
    cancel: Option<CancellationToken>,
}

impl ProcessRunner {
    /// Create a runner rooted at the given working directory.
    ///
    /// The runner ignores cancellation until one is attached with
    /// [`ProcessRunner::with_cancellation`].
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: cwd.into(),
            cancel: None,
        }
    }

    /// Kill in-flight commands once `token` is cancelled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// The working directory used for every command.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Run an argv with a timeout.
    pub fn run(&self, command: &[String], timeout: Duration) -> CommandResult {
        match CommandSpec::from_argv(command) {
            Some(spec) => self.run_spec(&spec.timeout(timeout)),
            None => CommandResult::synthetic_failure("Empty command", Duration::ZERO),
        }
    }

    /// Run a fully described invocation.
    pub fn run_spec(&self, spec: &CommandSpec) -> CommandResult {
        let start = Instant::now();
        tracing::debug!("Running `{}` (timeout {:?})", spec.display(), spec.timeout);

        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args)
            .current_dir(&self.cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        for (key, value) in &spec.env {
            cmd.env(key, value);
        }

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                tracing::debug!("Failed to launch `{}`: {}", spec.program, e);
                return CommandResult::synthetic_failure(e.to_string(), start.elapsed());
            }
        };

        let (tx, rx) = mpsc::channel();
        if let Some(stdout) = child.stdout.take() {
            spawn_reader(Stream::Stdout, stdout, tx.clone());
        }
        if let Some(stderr) = child.stderr.take() {
            spawn_reader(Stream::Stderr, stderr, tx);
        }

        let deadline = start + spec.timeout;
        let status = match wait_until(&mut child, deadline, self.cancel.as_ref()) {
            Ok(Wait::Exited(status)) => status,
            Ok(Wait::TimedOut) => {
                tracing::debug!("`{}` timed out", spec.display());
                return CommandResult::synthetic_failure(
                    format!("Command timed out after {}", format_timeout(spec.timeout)),
                    start.elapsed(),
                );
            }
            Ok(Wait::Cancelled) => {
                tracing::debug!("`{}` cancelled", spec.display());
                return CommandResult::synthetic_failure("Command interrupted", start.elapsed());
            }
            Err(e) => return CommandResult::synthetic_failure(e.to_string(), start.elapsed()),
        };

        // Readers finish when the pipes close; a grandchild holding a pipe
        // open must not extend the wait past the deadline.
        let mut stdout = String::new();
        let mut stderr = String::new();
        for _ in 0..2 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match rx.recv_timeout(remaining.max(POLL_INTERVAL)) {
                Ok((Stream::Stdout, text)) => stdout = text,
                Ok((Stream::Stderr, text)) => stderr = text,
                Err(_) => break,
            }
        }

        CommandResult::completed(exit_code(status), stdout, stderr, start.elapsed())
    }

    /// Try each invocation in order until one exits 0.
    ///
    /// Returns the first successful result, or the last failure when every
    /// form fails. Returns `None` only for an empty list.
    pub fn run_first_success(&self, specs: &[CommandSpec]) -> Option<CommandResult> {
        let mut last = None;
        for spec in specs {
            let result = self.run_spec(spec);
            if result.success() {
                return Some(result);
            }
            tracing::debug!(
                "`{}` exited with {}, trying next form",
                spec.display(),
                result.exit_code
            );
            last = Some(result);
        }
        last
    }
}

#[derive(Debug, Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

fn spawn_reader<R>(stream: Stream, mut source: R, tx: mpsc::Sender<(Stream, String)>)
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = source.read_to_end(&mut buf);
        let _ = tx.send((stream, String::from_utf8_lossy(&buf).into_owned()));
    });
}

enum Wait {
    Exited(ExitStatus),
    TimedOut,
    Cancelled,
}

/// Poll the child until it exits, the deadline passes or `cancel` fires.
///
/// On timeout or cancellation the child is killed and reaped.
fn wait_until(
    child: &mut Child,
    deadline: Instant,
    cancel: Option<&CancellationToken>,
) -> std::io::Result<Wait> {
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Wait::Exited(status));
        }
        let outcome = if cancel.is_some_and(CancellationToken::is_cancelled) {
            Wait::Cancelled
        } else if Instant::now() >= deadline {
            Wait::TimedOut
        } else {
            thread::sleep(POLL_INTERVAL);
            continue;
        };
        let _ = child.kill();
        let _ = child.wait();
        return Ok(outcome);
    }
}

#[cfg(unix)]
fn exit_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    status
        .code()
        .or_else(|| status.signal().map(|sig| 128 + sig))
        .unwrap_or(SYNTHETIC_EXIT_CODE)
}

#[cfg(not(unix))]
fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(SYNTHETIC_EXIT_CODE)
}

fn format_timeout(timeout: Duration) -> String {
    if timeout.subsec_millis() == 0 {
        format!("{}s", timeout.as_secs())
    } else {
        format!("{:.1}s", timeout.as_secs_f64())
    }
}
