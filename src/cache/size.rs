//! Human-readable directory sizing.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use walkdir::WalkDir;

use crate::shell::{CommandSpec, ProcessRunner};

/// Size reported for a directory that does not exist.
pub const ZERO_SIZE: &str = "0 B";

/// Size reported when the directory cannot be measured at all.
pub const UNKNOWN_SIZE: &str = "unknown";

const DU_TIMEOUT: Duration = Duration::from_secs(60);

/// Format a byte count with 1024-based units and one decimal place.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    if bytes == 0 {
        return ZERO_SIZE.to_string();
    }
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{size:.1} {}", UNITS[unit])
}

/// Measures directories, preferring `du` and falling back to a manual walk.
#[derive(Debug)]
pub struct DirectorySizer {
    runner: ProcessRunner,
    du_program: Option<String>,
    external_calls: AtomicUsize,
}

impl DirectorySizer {
    /// Create a sizer that uses `du` from PATH.
    pub fn new(runner: ProcessRunner) -> Self {
        Self {
            runner,
            du_program: Some("du".to_string()),
            external_calls: AtomicUsize::new(0),
        }
    }

    /// Create a sizer that only walks the filesystem.
    pub fn walk_only(runner: ProcessRunner) -> Self {
        Self {
            runner,
            du_program: None,
            external_calls: AtomicUsize::new(0),
        }
    }

    /// Use a specific `du`-compatible program (`<program> -sk <path>`).
    pub fn with_du_program(mut self, program: impl Into<String>) -> Self {
        self.du_program = Some(program.into());
        self
    }

    /// Number of external utility invocations made so far.
    pub fn external_calls(&self) -> usize {
        self.external_calls.load(Ordering::Relaxed)
    }

    /// Human-readable size of `path`.
    ///
    /// Never fails: a missing path is [`ZERO_SIZE`], an unmeasurable one is
    /// [`UNKNOWN_SIZE`].
    pub fn size_of(&self, path: &Path) -> String {
        if !path.exists() {
            return ZERO_SIZE.to_string();
        }

        if let Some(bytes) = self.du_bytes(path) {
            return format_size(bytes);
        }

        match walk_bytes(path) {
            Some(bytes) => format_size(bytes),
            None => UNKNOWN_SIZE.to_string(),
        }
    }

    fn du_bytes(&self, path: &Path) -> Option<u64> {
        let program = self.du_program.as_ref()?;
        self.external_calls.fetch_add(1, Ordering::Relaxed);

        let spec = CommandSpec::new(program.clone())
            .arg("-sk")
            .arg(path.to_string_lossy())
            .timeout(DU_TIMEOUT);
        let result = self.runner.run_spec(&spec);
        if !result.success() {
            tracing::debug!(
                "{} failed for {} ({}), walking instead",
                program,
                path.display(),
                result.exit_code
            );
            return None;
        }

        let kib = parse_du_kib(&result.stdout);
        if kib.is_none() {
            tracing::debug!("Unparseable du output: {:?}", result.stdout);
        }
        kib.map(|k| k.saturating_mul(1024))
    }
}

/// Parse the leading KiB count from `du -sk` output.
fn parse_du_kib(stdout: &str) -> Option<u64> {
    stdout.split_whitespace().next()?.parse().ok()
}

/// Sum file sizes below `path`, skipping entries that vanish or cannot be read.
///
/// Returns `None` only when the root itself cannot be read.
fn walk_bytes(path: &Path) -> Option<u64> {
    let mut total: u64 = 0;
    for entry in WalkDir::new(path).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                tracing::debug!("Cannot read {}: {}", path.display(), e);
                return None;
            }
            Err(_) => continue,
        };
        if !entry.file_type().is_file() {
            continue;
        }
        if let Ok(meta) = entry.metadata() {
            total = total.saturating_add(meta.len());
        }
    }
    Some(total)
}
