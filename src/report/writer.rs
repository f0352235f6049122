//! Report persistence.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use super::builder::Report;
use crate::error::{CacheProbeError, Result};

/// File name prefix of persisted reports.
pub const REPORT_PREFIX: &str = "cache-test-report-";

const MAX_COLLISIONS: u32 = 1000;

/// Candidate file name for attempt `n` (0 is the plain name).
pub fn report_file_name(unix_secs: i64, n: u32) -> String {
    if n == 0 {
        format!("{}{}.json", REPORT_PREFIX, unix_secs)
    } else {
        format!("{}{}-{}.json", REPORT_PREFIX, unix_secs, n)
    }
}

/// Write `report` as pretty JSON into `dir`, never overwriting an existing file.
///
/// Returns the path written.
pub fn write_report(report: &Report, dir: &Path) -> Result<PathBuf> {
    let fail = |path: &Path, e: &dyn std::fmt::Display| CacheProbeError::ReportWriteFailed {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    fs::create_dir_all(dir).map_err(|e| fail(dir, &e))?;

    let secs = report.timestamp.timestamp();
    let (path, file) = create_unique(dir, secs).map_err(|e| fail(dir, &e))?;

    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, report).map_err(|e| fail(&path, &e))?;
    writer
        .write_all(b"\n")
        .and_then(|_| writer.flush())
        .map_err(|e| fail(&path, &e))?;

    tracing::info!("Report written to {}", path.display());
    Ok(path)
}

fn create_unique(dir: &Path, secs: i64) -> io::Result<(PathBuf, File)> {
    for n in 0..MAX_COLLISIONS {
        let path = dir.join(report_file_name(secs, n));
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e),
        }
    }
    Err(io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!("too many reports for timestamp {}", secs),
    ))
}
