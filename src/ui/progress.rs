//! Progress line formatting.

use std::time::Duration;

use crate::probes::ProbeResult;

/// Format a duration for display.
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 1.0 {
        format!("{}ms", d.as_millis())
    } else if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        let mins = secs / 60.0;
        format!("{:.1}m", mins)
    }
}

/// `"{title}: {STATUS} ({duration})"`, without icon or styling.
pub fn format_probe_line(title: &str, result: &ProbeResult) -> String {
    format!(
        "{}: {} ({})",
        title,
        result.status().as_str().to_uppercase(),
        format_duration(result.duration())
    )
}

/// Whether a finished probe's line is shown in the given mode.
pub(crate) fn shows_probe(mode: super::OutputMode, result: &ProbeResult) -> bool {
    use crate::probes::ProbeStatus;

    mode.shows_progress()
        || (mode.shows_status()
            && matches!(result.status(), ProbeStatus::Failed | ProbeStatus::Warning))
}

/// Whether a finished probe's detail message is shown in the given mode.
pub(crate) fn shows_detail(mode: super::OutputMode, result: &ProbeResult) -> bool {
    !result.message().is_empty()
        && (mode.shows_details()
            || (shows_probe(mode, result)
                && result.status() != crate::probes::ProbeStatus::Passed))
}
