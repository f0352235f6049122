//! Run reports.
//!
//! [`ReportBuilder`] turns a finished run into a [`Report`] with a fresh
//! cache inventory and prioritized recommendations; [`write_report`]
//! persists it as `cache-test-report-{unix_seconds}.json`.

pub mod builder;
pub mod writer;

pub use builder::{recommendations, Report, ReportBuilder};
pub use writer::{report_file_name, write_report, REPORT_PREFIX};
