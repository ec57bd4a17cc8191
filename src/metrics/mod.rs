//! Delivery-performance metrics over a chronological execution history.
//!
//! Every function here expects executions ordered oldest first (see
//! [`crate::fetch::chronological`]). Elapsed times are whole minutes,
//! truncated toward zero. A metric whose denominator is empty (no successes,
//! no failures, no recovery windows, no executions) is `None` rather than a
//! non-finite number.

pub mod humanize;

use serde::Serialize;

use crate::source::{ExecutionStatus, ExecutionSummary};

/// A metric value in minutes together with its human-readable rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub minutes: Option<f64>,
    pub human: String,
}

impl Metric {
    pub fn from_minutes(minutes: Option<f64>) -> Self {
        Self {
            human: humanize::humanize_opt(minutes),
            minutes,
        }
    }
}

/// The six metrics computed for one pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsReport {
    pub cycle_time: Metric,
    pub lead_time: Metric,
    pub mean_time_between_failure: Metric,
    pub mean_time_to_recover: Metric,
    pub duration: Metric,
    pub feedback_time: Metric,
}

impl MetricsReport {
    pub fn compute(executions: &[ExecutionSummary]) -> Self {
        Self {
            cycle_time: Metric::from_minutes(cycle_time(executions)),
            lead_time: Metric::from_minutes(lead_time(executions)),
            mean_time_between_failure: Metric::from_minutes(mean_time_between_failure(
                executions,
            )),
            mean_time_to_recover: Metric::from_minutes(mean_time_to_recover(executions)),
            duration: Metric::from_minutes(total_duration(executions).map(|m| m as f64)),
            feedback_time: Metric::from_minutes(feedback_time(executions)),
        }
    }
}

fn minutes_between(from: &ExecutionSummary, to: &ExecutionSummary) -> i64 {
    (to.last_update_time - from.start_time).num_minutes()
}

fn count_status(executions: &[ExecutionSummary], status: &ExecutionStatus) -> usize {
    executions.iter().filter(|e| &e.status == status).count()
}

fn mean(lengths: &[i64]) -> Option<f64> {
    if lengths.is_empty() {
        return None;
    }
    let total: i64 = lengths.iter().sum();
    Some(total as f64 / lengths.len() as f64)
}

fn per_status(executions: &[ExecutionSummary], status: ExecutionStatus) -> Option<f64> {
    let total = total_duration(executions)?;
    match count_status(executions, &status) {
        0 => None,
        n => Some(total as f64 / n as f64),
    }
}

/// Minutes from the first run's start to the last run's final update.
pub fn total_duration(executions: &[ExecutionSummary]) -> Option<i64> {
    let first = executions.first()?;
    let last = executions.last()?;
    Some(minutes_between(first, last))
}

/// Total duration divided by the number of successful runs.
pub fn cycle_time(executions: &[ExecutionSummary]) -> Option<f64> {
    per_status(executions, ExecutionStatus::Succeeded)
}

/// Total duration divided by the number of failed runs.
pub fn mean_time_between_failure(executions: &[ExecutionSummary]) -> Option<f64> {
    per_status(executions, ExecutionStatus::Failed)
}

/// Lengths of every failure-to-recovery window.
///
/// A window opens at the first failure seen while none is open and closes at
/// the next success. Later failures inside an open window keep its anchor.
pub fn recovery_windows(executions: &[ExecutionSummary]) -> Vec<i64> {
    let mut lengths = Vec::new();
    let mut anchor: Option<&ExecutionSummary> = None;

    for execution in executions {
        match execution.status {
            ExecutionStatus::Failed if anchor.is_none() => anchor = Some(execution),
            ExecutionStatus::Succeeded => {
                if let Some(start) = anchor.take() {
                    lengths.push(minutes_between(start, execution));
                }
            }
            _ => {}
        }
    }

    lengths
}

/// Mean length of the recovery windows.
pub fn mean_time_to_recover(executions: &[ExecutionSummary]) -> Option<f64> {
    mean(&recovery_windows(executions))
}

/// Lengths of every work window ending in a success.
///
/// A window opens at whichever run comes first while none is open,
/// regardless of its status, and closes at the next success (possibly the
/// same run).
pub fn lead_windows(executions: &[ExecutionSummary]) -> Vec<i64> {
    let mut lengths = Vec::new();
    let mut anchor: Option<&ExecutionSummary> = None;

    for execution in executions {
        let start = *anchor.get_or_insert(execution);
        if execution.status == ExecutionStatus::Succeeded {
            lengths.push(minutes_between(start, execution));
            anchor = None;
        }
    }

    lengths
}

/// Mean length of the work windows.
pub fn lead_time(executions: &[ExecutionSummary]) -> Option<f64> {
    mean(&lead_windows(executions))
}

/// Mean elapsed time of a single run, whatever its outcome.
pub fn feedback_time(executions: &[ExecutionSummary]) -> Option<f64> {
    let lengths: Vec<i64> = executions.iter().map(|e| e.elapsed_minutes()).collect();
    mean(&lengths)
}
