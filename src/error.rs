//! Error types for cacheprobe operations.
//!
//! This module defines [`CacheProbeError`], the primary error type used
//! throughout the harness, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Expected probe failures are never errors: they become `failed` or
//!   `warning` probe results
//! - `CacheProbeError` covers defects and top-level failures that need
//!   distinct handling (config, report persistence, interruption)
//! - Use `anyhow::Error` (via `CacheProbeError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for cacheprobe operations.
#[derive(Debug, Error)]
pub enum CacheProbeError {
    /// Explicitly requested configuration file does not exist.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse a configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// The home directory could not be determined.
    #[error("Could not determine home directory")]
    HomeNotFound,

    /// A probe name given on the command line is not declared.
    #[error("Unknown probe: {name}")]
    UnknownProbe { name: String },

    /// A probe hit an internal defect instead of reporting a result.
    #[error("Probe '{probe}' failed unexpectedly: {message}")]
    ProbeDefect { probe: String, message: String },

    /// Failed to write the report file.
    #[error("Failed to write report to {path}: {message}")]
    ReportWriteFailed { path: PathBuf, message: String },

    /// The run was interrupted by the user.
    #[error("Run interrupted")]
    Interrupted,

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for cacheprobe operations.
pub type Result<T> = std::result::Result<T, CacheProbeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_not_found_displays_path() {
        let err = CacheProbeError::ConfigNotFound {
            path: PathBuf::from("/foo/.cacheprobe.yml"),
        };
        assert!(err.to_string().contains("/foo/.cacheprobe.yml"));
    }

    #[test]
    fn config_parse_error_displays_path_and_message() {
        let err = CacheProbeError::ConfigParseError {
            path: PathBuf::from("/config.yml"),
            message: "invalid syntax".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/config.yml"));
        assert!(msg.contains("invalid syntax"));
    }

    #[test]
    fn probe_defect_displays_probe_and_message() {
        let err = CacheProbeError::ProbeDefect {
            probe: "pip_cache".into(),
            message: "index out of bounds".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("pip_cache"));
        assert!(msg.contains("index out of bounds"));
    }

    #[test]
    fn unknown_probe_displays_name() {
        let err = CacheProbeError::UnknownProbe {
            name: "pip_cahce".into(),
        };
        assert_eq!(err.to_string(), "Unknown probe: pip_cahce");
    }

    #[test]
    fn report_write_failed_displays_path() {
        let err = CacheProbeError::ReportWriteFailed {
            path: PathBuf::from("/readonly/report.json"),
            message: "permission denied".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/readonly/report.json"));
        assert!(msg.contains("permission denied"));
    }

    #[test]
    fn interrupted_display() {
        assert_eq!(CacheProbeError::Interrupted.to_string(), "Run interrupted");
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: CacheProbeError = io_err.into();
        assert!(matches!(err, CacheProbeError::Io(_)));
    }

    #[test]
    fn anyhow_error_is_transparent() {
        let err: CacheProbeError = anyhow::anyhow!("something odd").into();
        assert_eq!(err.to_string(), "something odd");
    }
}
