//! Rendering of pipeline reports for the terminal.

use anyhow::Result;

use crate::config::OutputFormat;
use crate::metrics::Metric;
use crate::runner::PipelineReport;

/// Render all reports in the requested format.
pub fn render(reports: &[PipelineReport], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(reports)?),
        OutputFormat::Text => Ok(reports
            .iter()
            .map(format_summary)
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

/// Format one pipeline's metrics as an aligned text block.
pub fn format_summary(report: &PipelineReport) -> String {
    let m = &report.metrics;
    let rows = [
        ("Cycle time", &m.cycle_time),
        ("Lead time", &m.lead_time),
        ("Mean time between failure", &m.mean_time_between_failure),
        ("Mean time to recover", &m.mean_time_to_recover),
        ("Duration", &m.duration),
        ("Feedback time", &m.feedback_time),
    ];

    let mut out = format!(
        "=== {} ({} execution{}) ===\n",
        report.pipeline,
        report.executions,
        if report.executions == 1 { "" } else { "s" },
    );
    for (label, metric) in rows {
        out.push_str(&format!("{:<27}: {}\n", label, format_metric(metric)));
    }
    out
}

fn format_metric(metric: &Metric) -> String {
    match metric.minutes {
        Some(minutes) => format!("{} ({:.1} min)", metric.human, minutes),
        None => metric.human.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::MetricsReport;

    fn sample_report() -> PipelineReport {
        let metric = |m: Option<f64>| Metric::from_minutes(m);
        PipelineReport {
            pipeline: "checkout-service".to_string(),
            executions: 1,
            metrics: MetricsReport {
                cycle_time: metric(Some(90.0)),
                lead_time: metric(Some(90.0)),
                mean_time_between_failure: metric(None),
                mean_time_to_recover: metric(None),
                duration: metric(Some(90.0)),
                feedback_time: metric(Some(90.0)),
            },
        }
    }

    #[test]
    fn test_format_summary() {
        let summary = format_summary(&sample_report());
        assert!(summary.contains("checkout-service (1 execution)"));
        assert!(summary.contains("2 hours (90.0 min)"));
        assert!(summary.contains("Mean time to recover       : n/a"));
    }

    #[test]
    fn test_render_json_uses_null_for_undefined() {
        let json = render(&[sample_report()], OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value[0]["pipeline"], "checkout-service");
        assert_eq!(value[0]["metrics"]["cycle_time"]["minutes"], 90.0);
        assert!(value[0]["metrics"]["mean_time_between_failure"]["minutes"].is_null());
        assert_eq!(value[0]["metrics"]["mean_time_to_recover"]["human"], "n/a");
    }
}
