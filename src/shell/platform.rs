//! Platform-specific helpers.

use std::path::Path;

/// Environment variables that mark a CI environment.
pub const CI_ENV_VARS: &[&str] = &[
    "CI",
    "GITHUB_ACTIONS",
    "GITLAB_CI",
    "CIRCLECI",
    "TRAVIS",
    "JENKINS_URL",
];

/// Check if running in a CI environment.
///
/// Used in `main()` to pick plain output, since spinners produce noisy
/// output in log-based environments.
pub fn is_ci() -> bool {
    CI_ENV_VARS.iter().any(|var| std::env::var(var).is_ok())
}

/// Check whether the current process may write to `path`.
pub fn is_writable(path: &Path) -> bool {
    #[cfg(unix)]
    {
        use std::ffi::CString;
        use std::os::unix::ffi::OsStrExt;

        let Ok(c_path) = CString::new(path.as_os_str().as_bytes()) else {
            return false;
        };
        // SAFETY: access() only reads the NUL-terminated path we own.
        unsafe { libc::access(c_path.as_ptr(), libc::W_OK) == 0 }
    }

    #[cfg(not(unix))]
    {
        path.metadata()
            .map(|m| !m.permissions().readonly())
            .unwrap_or(false)
    }
}

/// Mark a file as executable (0o755). No-op on platforms without mode bits.
pub fn make_executable(path: &Path) -> std::io::Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
    }

    #[cfg(not(unix))]
    {
        let _ = path;
        Ok(())
    }
}
