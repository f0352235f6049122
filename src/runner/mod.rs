//! Probe orchestration.

pub mod orchestrator;
pub mod verdict;

pub use orchestrator::{Orchestrator, Run, RunState};
pub use verdict::{StatusCounts, Verdict};
