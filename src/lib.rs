//! pipemetrics -- delivery-performance metrics from pipeline execution history.
//!
//! This crate pages through a pipeline service's execution listings and
//! computes cycle time, lead time, mean time between failure, mean time to
//! recover, feedback time and total duration for one pipeline or a whole
//! account.

pub mod config;
pub mod fetch;
pub mod metrics;
pub mod report;
pub mod runner;
pub mod source;

use anyhow::Result;

use config::AppConfig;
use runner::{PipelineReport, Target};
use source::codepipeline::CodePipelineSource;

/// Connect to AWS CodePipeline and compute metrics for `target`.
pub async fn run(target: &Target, config: &AppConfig) -> Result<Vec<PipelineReport>> {
    tracing::info!(region = %config.aws.region, ?target, "Collecting pipeline metrics");
    let source = CodePipelineSource::connect(&config.aws).await;

    runner::analyze(
        &source,
        target,
        &config.fetch_options(),
        config.fleet.concurrency,
    )
    .await
}
